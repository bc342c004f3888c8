//! 结果展示 - 边界接口
//!
//! 每个完成的周期恰好调用其中一个方法

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::{QuestionKind, RemoteRecord, SaveOutcome};

/// 结果展示接口
#[async_trait]
pub trait ResultPresenter: Send + Sync {
    /// 高亮题库记录中的正确答案（`kind` 为页面上识别出的题型）
    async fn on_highlight(&self, kind: QuestionKind, answers: &BTreeSet<String>) -> Result<()>;

    /// 题库有题但没有正确答案
    async fn on_missing_answers(&self) -> Result<()>;

    /// 题库（或页面）中没有这道题
    async fn on_not_found(&self) -> Result<()>;

    /// 匹配到多条记录
    async fn on_ambiguous(&self, candidates: &[RemoteRecord]) -> Result<()>;

    /// 提交周期写入完成
    async fn on_saved(&self, outcome: &SaveOutcome) -> Result<()>;
}

/// 通知内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub message: &'static str,
    pub duration_ms: u64,
}

impl Notice {
    pub const NOT_FOUND: Notice = Notice {
        title: "Вопрос не найден!",
        message: "Пожалуйста, добавьте новый вопрос с выбраными ответами.",
        duration_ms: 5_000,
    };

    pub const MISSING_ANSWERS: Notice = Notice {
        title: "Правильные ответы не найдены!",
        message: "Пожалуйста, выберите правильный ответ и обновите.",
        duration_ms: 5_000,
    };

    pub const AMBIGUOUS: Notice = Notice {
        title: "Найдены несколько ответов:",
        message: "Правильные ответы:",
        duration_ms: 20_000,
    };

    pub const CREATED: Notice = Notice {
        title: "Ответ успешно отправлен!",
        message: "Вопрос добавлен в базу.",
        duration_ms: 5_000,
    };

    pub const UPDATED: Notice = Notice {
        title: "Ответ успешно обновлен!",
        message: "Правильные ответы сохранены.",
        duration_ms: 5_000,
    };

    pub const UNCHANGED: Notice = Notice {
        title: "Вопрос уже в базе.",
        message: "Сохранённые ответы совпадают с выбранными.",
        duration_ms: 5_000,
    };

    /// 提交结果对应的通知
    pub fn for_saved(outcome: &SaveOutcome) -> Notice {
        match outcome {
            SaveOutcome::Created(_) => Notice::CREATED,
            SaveOutcome::Updated(_) => Notice::UPDATED,
            SaveOutcome::Unchanged(_) => Notice::UNCHANGED,
        }
    }
}

/// 只写日志的展示实现（无浏览器时使用）
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPresenter;

#[async_trait]
impl ResultPresenter for LogPresenter {
    async fn on_highlight(&self, kind: QuestionKind, answers: &BTreeSet<String>) -> Result<()> {
        info!("💡 {}", kind.hints_title());
        for answer in answers {
            info!("✅ 正确答案: {}", answer);
        }
        Ok(())
    }

    async fn on_missing_answers(&self) -> Result<()> {
        warn!("⚠️ {} {}", Notice::MISSING_ANSWERS.title, Notice::MISSING_ANSWERS.message);
        Ok(())
    }

    async fn on_not_found(&self) -> Result<()> {
        warn!("⚠️ {} {}", Notice::NOT_FOUND.title, Notice::NOT_FOUND.message);
        Ok(())
    }

    async fn on_ambiguous(&self, candidates: &[RemoteRecord]) -> Result<()> {
        info!("🔀 {} {}", Notice::AMBIGUOUS.title, candidates.len());
        for (i, record) in candidates.iter().enumerate() {
            info!("  {}. {}", i + 1, record);
        }
        Ok(())
    }

    async fn on_saved(&self, outcome: &SaveOutcome) -> Result<()> {
        let notice = Notice::for_saved(outcome);
        info!("💾 {} {}", notice.title, outcome.record());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RemoteRecord {
        RemoteRecord {
            id: 9,
            question_type: None,
            question_text: "Q".to_string(),
            answers: vec![],
            correct_answers: BTreeSet::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_saved_notice_by_outcome() {
        assert_eq!(Notice::for_saved(&SaveOutcome::Created(record())), Notice::CREATED);
        assert_eq!(Notice::for_saved(&SaveOutcome::Updated(record())), Notice::UPDATED);
        assert_eq!(Notice::for_saved(&SaveOutcome::Unchanged(record())), Notice::UNCHANGED);
    }

    #[test]
    fn test_log_presenter_never_fails() {
        let presenter = LogPresenter;
        tokio_test::block_on(async {
            presenter
                .on_highlight(QuestionKind::Sequence, &BTreeSet::from(["A".to_string()]))
                .await
                .unwrap();
            presenter.on_missing_answers().await.unwrap();
            presenter.on_not_found().await.unwrap();
            presenter.on_ambiguous(&[record(), record()]).await.unwrap();
            presenter.on_saved(&SaveOutcome::Created(record())).await.unwrap();
        });
    }
}
