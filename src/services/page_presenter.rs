//! 页面展示 - 在测验页面上高亮答案和弹出通知

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::PageSelectors;
use crate::infrastructure::{with_payload, JsExecutor};
use crate::models::{QuestionKind, RemoteRecord, SaveOutcome};
use crate::services::presenter::{Notice, ResultPresenter};

const HIGHLIGHT_CLASS: &str = "correct-answer";
const HINT_DURATION_MS: u64 = 20_000;

const STYLE: &str = r#"
.correct-answer {
    border: 2px solid #52c41a !important;
    background-color: #f6ffed !important;
    box-shadow: 0 0 5px rgba(82, 196, 26, 0.5);
}
.correct-answer .ant-typography { color: #135200; }
.pse-notification {
    position: fixed; top: 20px; right: 20px; z-index: 1000;
    background-color: #fff; border: 1px solid #ccc; border-radius: 5px;
    box-shadow: 0 2px 10px rgba(0, 0, 0, 0.1);
    padding: 15px; width: 300px; max-height: 80vh; overflow-y: auto;
}
.pse-notification h4 { margin: 0 0 10px; }
.pse-notification .question-item { margin-bottom: 10px; }
.pse-notification .question-item strong { display: block; margin-bottom: 5px; }
"#;

// 样式只注入一次
const ENSURE_STYLE: &str = r#"    if (!document.getElementById("pse-style")) {
        const style = document.createElement("style");
        style.id = "pse-style";
        style.textContent = payload.style;
        document.head.appendChild(style);
    }"#;

/// 候选记录的展示内容
#[derive(Debug, Serialize)]
struct CandidateView<'a> {
    question_text: &'a str,
    correct_answers: &'a BTreeSet<String>,
}

/// 在浏览器页面中展示结果
pub struct PagePresenter {
    executor: Arc<JsExecutor>,
    selectors: PageSelectors,
}

impl PagePresenter {
    pub fn new(executor: Arc<JsExecutor>, selectors: PageSelectors) -> Self {
        Self {
            executor,
            selectors,
        }
    }

    async fn notify(&self, notice: &Notice, candidates: &[RemoteRecord]) -> Result<()> {
        let script = build_notice_script(notice, candidates)?;
        self.executor.eval(script).await?;
        debug!("已显示通知: {}", notice.title);
        Ok(())
    }
}

#[async_trait]
impl ResultPresenter for PagePresenter {
    async fn on_highlight(&self, kind: QuestionKind, answers: &BTreeSet<String>) -> Result<()> {
        let script = build_highlight_script(&self.selectors, answers)?;
        let marked = self.executor.eval(script).await?.as_u64().unwrap_or(0);
        info!("✅ 已高亮 {} 个正确答案", marked);

        // 没有可高亮的选项（例如填空题）时改为提示框
        if marked == 0 {
            self.executor.eval(build_hint_script(kind, answers)?).await?;
            debug!("已显示提示: {}", kind.hints_title());
        }
        Ok(())
    }

    async fn on_missing_answers(&self) -> Result<()> {
        self.notify(&Notice::MISSING_ANSWERS, &[]).await
    }

    async fn on_not_found(&self) -> Result<()> {
        self.notify(&Notice::NOT_FOUND, &[]).await
    }

    async fn on_ambiguous(&self, candidates: &[RemoteRecord]) -> Result<()> {
        self.notify(&Notice::AMBIGUOUS, candidates).await
    }

    async fn on_saved(&self, outcome: &SaveOutcome) -> Result<()> {
        self.notify(&Notice::for_saved(outcome), &[]).await
    }
}

/// 构建高亮脚本，返回被高亮的元素数量
fn build_highlight_script(selectors: &PageSelectors, answers: &BTreeSet<String>) -> Result<String> {
    let payload = json!({
        "style": STYLE,
        "selector": selectors.answer,
        "className": HIGHLIGHT_CLASS,
        "answers": answers,
    });

    with_payload(
        &payload,
        &format!(
            r#"{}
    let count = 0;
    document.querySelectorAll(payload.selector).forEach((el) => {{
        if (payload.answers.includes(el.textContent.trim())) {{
            el.classList.add(payload.className);
            count += 1;
        }}
    }});
    return count;"#,
            ENSURE_STYLE
        ),
    )
}

/// 构建答案提示框脚本，标题随题型变化
fn build_hint_script(kind: QuestionKind, answers: &BTreeSet<String>) -> Result<String> {
    let payload = json!({
        "style": STYLE,
        "title": kind.hints_title(),
        "answers": answers,
        "duration": HINT_DURATION_MS,
    });

    with_payload(
        &payload,
        &format!(
            r#"{}
    const box = document.createElement("div");
    box.className = "pse-notification";
    const title = document.createElement("h4");
    title.textContent = payload.title;
    box.appendChild(title);
    const list = document.createElement("ul");
    for (const answer of payload.answers) {{
        const item = document.createElement("li");
        item.textContent = answer;
        list.appendChild(item);
    }}
    box.appendChild(list);
    document.body.appendChild(box);
    setTimeout(() => box.remove(), payload.duration);
    return true;"#,
            ENSURE_STYLE
        ),
    )
}

/// 构建通知脚本；候选列表非空时附加每条记录的题干和正确答案
fn build_notice_script(notice: &Notice, candidates: &[RemoteRecord]) -> Result<String> {
    let views: Vec<CandidateView<'_>> = candidates
        .iter()
        .map(|r| CandidateView {
            question_text: &r.question_text,
            correct_answers: &r.correct_answers,
        })
        .collect();

    let payload = json!({
        "style": STYLE,
        "title": notice.title,
        "message": notice.message,
        "duration": notice.duration_ms,
        "candidates": views,
    });

    with_payload(
        &payload,
        &format!(
            r#"{}
    const el = (tag, text) => {{
        const node = document.createElement(tag);
        if (text !== undefined) node.textContent = text;
        return node;
    }};
    const box = el("div");
    box.className = "pse-notification";
    box.appendChild(el("h4", payload.title));
    if (payload.candidates.length === 0) {{
        box.appendChild(el("p", payload.message));
    }}
    for (const q of payload.candidates) {{
        const item = el("div");
        item.className = "question-item";
        item.appendChild(el("strong", q.question_text));
        item.appendChild(el("em", payload.message));
        const list = el("ul");
        for (const answer of q.correct_answers) list.appendChild(el("li", answer));
        item.appendChild(list);
        box.appendChild(item);
    }}
    document.body.appendChild(box);
    const timer = setTimeout(() => box.remove(), payload.duration);
    box.addEventListener("click", () => {{
        clearTimeout(timer);
        box.remove();
    }});
    return true;"#,
            ENSURE_STYLE
        ),
    )
}
