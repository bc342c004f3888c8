//! 题目提取 - 业务能力层
//!
//! 把页面抓到的原始文本整理成 [`ObservedQuestion`]，不访问网络和 DOM

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::models::{ObservedQuestion, QuestionKind, RawPage};
use crate::services::classifier::{PhraseClassifier, TypeClassifier};

/// 题目提取器
pub struct QuestionExtractor {
    classifier: Arc<dyn TypeClassifier>,
}

impl QuestionExtractor {
    pub fn new(classifier: Arc<dyn TypeClassifier>) -> Self {
        Self { classifier }
    }

    /// 从一次页面抓取结果构建题目（包括题型识别）
    pub fn observe(&self, raw: &RawPage) -> ObservedQuestion {
        let kind = self
            .classifier
            .classify(raw.description.as_deref().unwrap_or("").trim());

        extract(raw.question_text.as_deref(), &raw.options, &raw.marked, kind)
    }
}

impl Default for QuestionExtractor {
    fn default() -> Self {
        Self::new(Arc::new(PhraseClassifier::new()))
    }
}

/// 规范化原始文本
///
/// - 所有字符串去除首尾空白
/// - 题干缺失或为空时标记为缺失（显示占位文本）
/// - 不在选项中的"已选中"文本视为抓取噪声，直接丢弃
pub fn extract(
    raw_text: Option<&str>,
    raw_options: &[String],
    raw_marked: &[String],
    kind: QuestionKind,
) -> ObservedQuestion {
    let text = match raw_text.map(str::trim) {
        Some(t) if !t.is_empty() => Some(t.to_string()),
        _ => None,
    };

    let options: Vec<String> = raw_options.iter().map(|o| o.trim().to_string()).collect();

    let mut marked_correct = BTreeSet::new();
    for marked in raw_marked.iter().map(|m| m.trim()) {
        if options.iter().any(|o| o == marked) {
            marked_correct.insert(marked.to_string());
        } else {
            debug!("丢弃不在选项中的已选答案: {:?}", marked);
        }
    }

    ObservedQuestion::from_parts(text, kind, options, marked_correct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QUESTION_NOT_FOUND;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_trims_every_field() {
        let q = extract(
            Some("  Столица Франции?\n"),
            &strings(&[" Париж ", "Лион\t"]),
            &strings(&["Париж  "]),
            QuestionKind::SingleChoice,
        );

        assert_eq!(q.text(), "Столица Франции?");
        assert_eq!(q.options(), &strings(&["Париж", "Лион"])[..]);
        assert!(q.marked_correct().contains("Париж"));
        assert!(!q.is_text_missing());
    }

    #[test]
    fn test_missing_text_becomes_sentinel() {
        for raw in [None, Some(""), Some("   ")] {
            let q = extract(raw, &[], &[], QuestionKind::TrueFalse);
            assert_eq!(q.text(), QUESTION_NOT_FOUND);
            assert!(q.is_text_missing());
        }
    }

    #[test]
    fn test_placeholder_text_on_page_is_a_real_question() {
        let q = extract(
            Some(QUESTION_NOT_FOUND),
            &strings(&["Да"]),
            &[],
            QuestionKind::TrueFalse,
        );

        assert_eq!(q.text(), QUESTION_NOT_FOUND);
        assert!(!q.is_text_missing());
    }

    #[test]
    fn test_marked_outside_options_dropped() {
        let options = strings(&["A", "B", "C"]);
        let marked = strings(&["B", "Z", "b", " C "]);

        let q = extract(Some("Q"), &options, &marked, QuestionKind::MultipleChoice);

        assert_eq!(q.marked_correct().len(), 2);
        for m in q.marked_correct() {
            assert!(q.options().contains(m));
        }
    }

    #[test]
    fn test_options_keep_display_order() {
        let q = extract(
            Some("Q"),
            &strings(&["третий", "первый", "второй"]),
            &[],
            QuestionKind::Sequence,
        );
        assert_eq!(q.options(), &strings(&["третий", "первый", "второй"])[..]);
        assert!(!q.has_marked_correct());
    }

    #[test]
    fn test_observe_classifies_description() {
        let extractor = QuestionExtractor::default();
        let raw = RawPage {
            description: Some("Выберите несколько правильных ответов".to_string()),
            question_text: Some("Какие буквы?".to_string()),
            options: strings(&["A", "B", "C"]),
            marked: strings(&["B"]),
        };

        let q = extractor.observe(&raw);

        assert_eq!(q.kind(), QuestionKind::MultipleChoice);
        assert_eq!(q.options(), &strings(&["A", "B", "C"])[..]);
        assert_eq!(q.marked_correct().iter().collect::<Vec<_>>(), vec!["B"]);
    }
}
