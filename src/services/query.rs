//! 搜索关键字构建

use crate::models::ObservedQuestion;

/// 题库搜索关键字
///
/// 页面上没有题干时返回 `None`，调用方必须跳过搜索。
/// URL 编码属于传输层，这里原样返回题干。
pub fn build_search_key(question: &ObservedQuestion) -> Option<&str> {
    if question.is_text_missing() {
        None
    } else {
        Some(question.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionKind;
    use crate::services::extractor::extract;

    #[test]
    fn test_key_is_verbatim_text() {
        let q = extract(Some("Сколько будет 2+2 & 3?"), &[], &[], QuestionKind::NumericEntry);
        assert_eq!(build_search_key(&q), Some("Сколько будет 2+2 & 3?"));
    }

    #[test]
    fn test_sentinel_has_no_key() {
        let q = extract(None, &[], &[], QuestionKind::TrueFalse);
        assert_eq!(build_search_key(&q), None);
    }
}
