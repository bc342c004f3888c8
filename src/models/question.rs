//! 题目数据模型
//!
//! 页面观察到的题目、题库记录以及原始页面文本

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::truncate_text;

/// 题目缺失时显示的占位文本（是否缺失由 [`ObservedQuestion::is_text_missing`] 判断）
pub const QUESTION_NOT_FOUND: &str = "Вопрос не найден";

/// 题型（封闭集合）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    /// 判断题
    #[default]
    #[serde(rename = "TF")]
    TrueFalse,
    /// 单选题
    #[serde(rename = "MC")]
    SingleChoice,
    /// 多选题
    #[serde(rename = "MR")]
    MultipleChoice,
    /// 排序题
    #[serde(rename = "SEQ")]
    Sequence,
    /// 填空（数字）题
    #[serde(rename = "NUMG")]
    NumericEntry,
}

impl QuestionKind {
    /// 题库中使用的类型代码
    pub fn code(self) -> &'static str {
        match self {
            QuestionKind::TrueFalse => "TF",
            QuestionKind::SingleChoice => "MC",
            QuestionKind::MultipleChoice => "MR",
            QuestionKind::Sequence => "SEQ",
            QuestionKind::NumericEntry => "NUMG",
        }
    }

    /// 从类型代码解析
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TF" => Some(QuestionKind::TrueFalse),
            "MC" => Some(QuestionKind::SingleChoice),
            "MR" => Some(QuestionKind::MultipleChoice),
            "SEQ" => Some(QuestionKind::Sequence),
            "NUMG" => Some(QuestionKind::NumericEntry),
            _ => None,
        }
    }

    /// 页面上显示的作答说明
    pub fn help_text(self) -> &'static str {
        match self {
            QuestionKind::TrueFalse | QuestionKind::SingleChoice => {
                "Выберите один правильный ответ и нажмите кнопку \"Подтвердить\""
            }
            QuestionKind::MultipleChoice => {
                "Выберите несколько правильных ответов и нажмите кнопку \"Подтвердить\""
            }
            QuestionKind::Sequence => {
                "Упорядочите варианты в правильной последовательности и нажмите кнопку \"Подтвердить\""
            }
            QuestionKind::NumericEntry => {
                "Введите правильный ответ и нажмите кнопку \"Подтвердить\""
            }
        }
    }

    /// 提示框标题
    pub fn hints_title(self) -> &'static str {
        match self {
            QuestionKind::TrueFalse | QuestionKind::SingleChoice => {
                "Подсказка. Выберите один из вариантов:"
            }
            QuestionKind::MultipleChoice => "Подсказка. Выберите несколько вариантов:",
            QuestionKind::Sequence => "Подсказка. Упорядочите варианты:",
            QuestionKind::NumericEntry => "Подсказка. Введите ответ:",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 页面抓取到的原始文本（DOM 协作方的输出）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPage {
    /// 题型说明文本
    #[serde(default)]
    pub description: Option<String>,
    /// 题干
    #[serde(default)]
    pub question_text: Option<String>,
    /// 全部选项（按显示顺序）
    #[serde(default)]
    pub options: Vec<String>,
    /// 页面上已被标记为正确的选项
    #[serde(default)]
    pub marked: Vec<String>,
}

/// 单次检查中观察到的题目
///
/// 只能通过 [`crate::services::QuestionExtractor`] 构建，构建后不可变。
/// 保证 `marked_correct ⊆ options`。
/// 题干缺失时 `text` 为占位文本，缺失标记单独保存，不与真实题干混淆。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedQuestion {
    text: String,
    missing: bool,
    kind: QuestionKind,
    options: Vec<String>,
    marked_correct: BTreeSet<String>,
}

impl ObservedQuestion {
    pub(crate) fn from_parts(
        text: Option<String>,
        kind: QuestionKind,
        options: Vec<String>,
        marked_correct: BTreeSet<String>,
    ) -> Self {
        Self {
            missing: text.is_none(),
            text: text.unwrap_or_else(|| QUESTION_NOT_FOUND.to_string()),
            kind,
            options,
            marked_correct,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn marked_correct(&self) -> &BTreeSet<String> {
        &self.marked_correct
    }

    /// 页面上是否没有找到题干
    pub fn is_text_missing(&self) -> bool {
        self.missing
    }

    /// 页面上是否已经选中了正确答案
    pub fn has_marked_correct(&self) -> bool {
        !self.marked_correct.is_empty()
    }
}

/// 题库中的题目记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub question_text: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub answers: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub correct_answers: BTreeSet<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RemoteRecord {
    /// 根据观察到的题目构建待提交的草稿
    ///
    /// `id` 为 0，由题库分配；时间戳同样由题库覆盖。
    pub fn draft(observed: &ObservedQuestion, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            question_type: Some(observed.kind().code().to_string()),
            question_text: observed.text().to_string(),
            answers: observed.options().to_vec(),
            correct_answers: observed.marked_correct().clone(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// 记录中的题型（无法识别时为 None）
    pub fn kind(&self) -> Option<QuestionKind> {
        self.question_type.as_deref().and_then(QuestionKind::from_code)
    }

    /// 记录的选项和正确答案是否与观察结果一致
    pub fn matches_observed(&self, observed: &ObservedQuestion) -> bool {
        self.answers.as_slice() == observed.options()
            && &self.correct_answers == observed.marked_correct()
    }
}

impl fmt::Display for RemoteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}] {} [正确答案: {}]",
            self.id,
            self.kind().map_or("?", QuestionKind::code),
            truncate_text(&self.question_text, 80),
            self.correct_answers.len()
        )
    }
}

// null 视为默认值
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 时间戳既可能是 RFC 3339，也可能是不带时区的 ISO 8601（按 UTC 处理）
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| D::Error::custom(format!("无法解析时间戳 '{}': {}", raw, e)))
}
