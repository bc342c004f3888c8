//! 单次同步周期内的派生结果
//!
//! 这些类型只在一个周期内存在，不做持久化

use std::collections::BTreeSet;

use super::question::RemoteRecord;

/// 远端搜索结果的匹配情况
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// 题库中没有该题
    NotFound,
    /// 恰好一条记录
    Single(RemoteRecord),
    /// 多条记录（保持题库返回的顺序）
    Multiple(Vec<RemoteRecord>),
}

impl MatchOutcome {
    /// 匹配到的记录数量
    pub fn len(&self) -> usize {
        match self {
            MatchOutcome::NotFound => 0,
            MatchOutcome::Single(_) => 1,
            MatchOutcome::Multiple(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MatchOutcome::NotFound)
    }
}

/// 同步决策的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// 新建题目
    Create(RemoteRecord),
    /// 更新已有题目
    Update { id: i64, draft: RemoteRecord },
    /// 在页面上高亮这些正确答案
    Highlight(BTreeSet<String>),
    /// 题库中有题但缺少正确答案
    ReportMissingCorrectAnswers,
    /// 题库中没有这道题
    ReportNotFound,
    /// 匹配到多条，交给用户判断
    ReportAmbiguous(Vec<RemoteRecord>),
    /// 题库记录与页面一致，无需写入
    Unchanged(RemoteRecord),
}

impl SyncAction {
    /// 是否需要写入题库
    pub fn is_write(&self) -> bool {
        matches!(self, SyncAction::Create(_) | SyncAction::Update { .. })
    }

    /// 拆分为展示类动作或写入类动作
    pub fn effect(&self) -> ActionEffect<'_> {
        match self {
            SyncAction::Create(draft) => ActionEffect::Write(StoreWrite::Create(draft)),
            SyncAction::Update { id, draft } => ActionEffect::Write(StoreWrite::Update {
                id: *id,
                draft,
            }),
            SyncAction::Unchanged(record) => ActionEffect::Write(StoreWrite::Skip(record)),
            SyncAction::Highlight(answers) => ActionEffect::Present(Presentation::Highlight(answers)),
            SyncAction::ReportMissingCorrectAnswers => {
                ActionEffect::Present(Presentation::MissingCorrectAnswers)
            }
            SyncAction::ReportNotFound => ActionEffect::Present(Presentation::NotFound),
            SyncAction::ReportAmbiguous(candidates) => {
                ActionEffect::Present(Presentation::Ambiguous(candidates))
            }
        }
    }

    /// 日志用的简短名称
    pub fn label(&self) -> &'static str {
        match self {
            SyncAction::Create(_) => "create",
            SyncAction::Update { .. } => "update",
            SyncAction::Highlight(_) => "highlight",
            SyncAction::ReportMissingCorrectAnswers => "missing-correct-answers",
            SyncAction::ReportNotFound => "not-found",
            SyncAction::ReportAmbiguous(_) => "ambiguous",
            SyncAction::Unchanged(_) => "unchanged",
        }
    }
}

/// 同步动作的效果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEffect<'a> {
    /// 只需要交给展示接口
    Present(Presentation<'a>),
    /// 涉及题库写入（或确认无需写入）
    Write(StoreWrite<'a>),
}

/// 展示类动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation<'a> {
    Highlight(&'a BTreeSet<String>),
    MissingCorrectAnswers,
    NotFound,
    Ambiguous(&'a [RemoteRecord]),
}

/// 写入类动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreWrite<'a> {
    Create(&'a RemoteRecord),
    Update { id: i64, draft: &'a RemoteRecord },
    /// 题库记录与页面一致
    Skip(&'a RemoteRecord),
}

/// 提交周期的写入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(RemoteRecord),
    Updated(RemoteRecord),
    Unchanged(RemoteRecord),
}

impl SaveOutcome {
    pub fn record(&self) -> &RemoteRecord {
        match self {
            SaveOutcome::Created(r) | SaveOutcome::Updated(r) | SaveOutcome::Unchanged(r) => r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> RemoteRecord {
        RemoteRecord {
            id,
            question_type: None,
            question_text: "Q".to_string(),
            answers: vec![],
            correct_answers: BTreeSet::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_effect_splits_writes_from_presentations() {
        let update = SyncAction::Update { id: 4, draft: record(0) };
        assert!(matches!(
            update.effect(),
            ActionEffect::Write(StoreWrite::Update { id: 4, .. })
        ));
        assert!(update.is_write());

        let unchanged = SyncAction::Unchanged(record(4));
        assert!(matches!(unchanged.effect(), ActionEffect::Write(StoreWrite::Skip(r)) if r.id == 4));
        assert!(!unchanged.is_write());

        let ambiguous = SyncAction::ReportAmbiguous(vec![record(1), record(2)]);
        assert!(matches!(
            ambiguous.effect(),
            ActionEffect::Present(Presentation::Ambiguous(c)) if c.len() == 2
        ));
        assert_eq!(
            SyncAction::ReportNotFound.effect(),
            ActionEffect::Present(Presentation::NotFound)
        );
    }

    #[test]
    fn test_match_outcome_len() {
        assert!(MatchOutcome::NotFound.is_empty());
        assert_eq!(MatchOutcome::Single(record(1)).len(), 1);
        assert_eq!(MatchOutcome::Multiple(vec![record(1), record(2)]).len(), 2);
    }
}
