//! 同步决策 - 业务能力层
//!
//! 根据页面观察结果和题库匹配情况决定下一步动作。
//! 歧义总是交给用户，从不自动挑选候选记录。

use chrono::{DateTime, Utc};

use crate::models::{MatchOutcome, ObservedQuestion, RemoteRecord, SyncAction};

/// 查询周期的决策
///
/// | 匹配情况 | 动作 |
/// |---|---|
/// | NotFound | `ReportNotFound`（自动同步不会新建题目） |
/// | Single，有正确答案 | `Highlight` |
/// | Single，无正确答案 | `ReportMissingCorrectAnswers` |
/// | Multiple | `ReportAmbiguous` |
pub fn decide(_observed: &ObservedQuestion, outcome: MatchOutcome) -> SyncAction {
    match outcome {
        MatchOutcome::NotFound => SyncAction::ReportNotFound,
        MatchOutcome::Single(record) if !record.correct_answers.is_empty() => {
            SyncAction::Highlight(record.correct_answers)
        }
        MatchOutcome::Single(_) => SyncAction::ReportMissingCorrectAnswers,
        MatchOutcome::Multiple(records) => SyncAction::ReportAmbiguous(records),
    }
}

/// 提交周期的决策（新建还是更新）
///
/// 由用户显式触发；页面上没有选中答案时不写入任何内容。
pub fn decide_write(
    observed: &ObservedQuestion,
    outcome: MatchOutcome,
    now: DateTime<Utc>,
) -> SyncAction {
    if !observed.has_marked_correct() {
        return SyncAction::ReportMissingCorrectAnswers;
    }

    match outcome {
        MatchOutcome::NotFound => SyncAction::Create(RemoteRecord::draft(observed, now)),
        MatchOutcome::Single(record) if record.matches_observed(observed) => {
            SyncAction::Unchanged(record)
        }
        MatchOutcome::Single(record) => SyncAction::Update {
            id: record.id,
            draft: RemoteRecord::draft(observed, now),
        },
        MatchOutcome::Multiple(records) => SyncAction::ReportAmbiguous(records),
    }
}
