//! 题型识别 - 业务能力层
//!
//! 只负责"从说明文字判断题型"，不关心页面和题库

use phf::phf_ordered_map;
use tracing::debug;

use crate::models::QuestionKind;

/// 题型识别器
///
/// 换成其他识别方式（例如页面提供结构化元数据）时只需替换实现
pub trait TypeClassifier: Send + Sync {
    /// 总是返回一个题型，不会失败
    fn classify(&self, description: &str) -> QuestionKind;
}

/// 按顺序匹配的短语规则，先匹配者优先；大小写敏感
static PHRASE_RULES: phf::OrderedMap<&'static str, QuestionKind> = phf_ordered_map! {
    "один правильный ответ" => QuestionKind::SingleChoice,
    "несколько правильных ответов" => QuestionKind::MultipleChoice,
    "упорядочите варианты" => QuestionKind::Sequence,
    "Упорядочите варианты" => QuestionKind::Sequence,
    "введите правильный ответ" => QuestionKind::NumericEntry,
    "Введите правильный ответ" => QuestionKind::NumericEntry,
};

/// 基于短语包含关系的题型识别器
#[derive(Debug, Clone, Copy, Default)]
pub struct PhraseClassifier;

impl PhraseClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl TypeClassifier for PhraseClassifier {
    fn classify(&self, description: &str) -> QuestionKind {
        for (phrase, kind) in PHRASE_RULES.entries() {
            if description.contains(phrase) {
                return *kind;
            }
        }

        debug!(
            "未识别的题型说明，按 {} 处理: {:?}",
            QuestionKind::default(),
            description
        );
        QuestionKind::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> QuestionKind {
        PhraseClassifier::new().classify(text)
    }

    #[test]
    fn test_each_help_text_maps_to_its_kind() {
        for kind in [
            QuestionKind::SingleChoice,
            QuestionKind::MultipleChoice,
            QuestionKind::Sequence,
            QuestionKind::NumericEntry,
        ] {
            assert_eq!(classify(kind.help_text()), kind);
        }
    }

    #[test]
    fn test_multiple_choice_phrase_with_surrounding_text() {
        assert_eq!(
            classify("Выберите несколько правильных ответов"),
            QuestionKind::MultipleChoice
        );
        assert_eq!(
            classify("  Задание 3. несколько правильных ответов (2 балла)"),
            QuestionKind::MultipleChoice
        );
    }

    #[test]
    fn test_case_sensitive_decoy_falls_back() {
        assert_eq!(
            classify("Выберите НЕСКОЛЬКО ПРАВИЛЬНЫХ ОТВЕТОВ"),
            QuestionKind::TrueFalse
        );
    }

    #[test]
    fn test_priority_single_before_multiple() {
        // 同时包含两种短语时按规则顺序取第一条
        assert_eq!(
            classify("один правильный ответ или несколько правильных ответов"),
            QuestionKind::SingleChoice
        );
    }

    #[test]
    fn test_unknown_and_empty_default_to_true_false() {
        assert_eq!(classify(""), QuestionKind::TrueFalse);
        assert_eq!(classify("Верно или неверно?"), QuestionKind::TrueFalse);
    }
}
