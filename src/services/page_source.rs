//! 页面读取 - DOM 协作方
//!
//! 只负责从页面抓取原始文本，不做任何规范化

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::config::PageSelectors;
use crate::infrastructure::{with_payload, JsExecutor};
use crate::models::RawPage;

/// 页面文本来源
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn read(&self) -> Result<RawPage>;
}

/// 通过浏览器读取测验页面
pub struct BrowserPageSource {
    executor: Arc<JsExecutor>,
    script: String,
}

impl BrowserPageSource {
    pub fn new(executor: Arc<JsExecutor>, selectors: &PageSelectors) -> Result<Self> {
        Ok(Self {
            executor,
            script: build_read_script(selectors)?,
        })
    }
}

#[async_trait]
impl PageSource for BrowserPageSource {
    async fn read(&self) -> Result<RawPage> {
        let raw: RawPage = self
            .executor
            .eval_as(self.script.as_str())
            .await
            .context("无法读取测验页面")?;

        debug!(
            "读取页面: 选项 {} 个, 已选 {} 个",
            raw.options.len(),
            raw.marked.len()
        );
        Ok(raw)
    }
}

/// 构建读取页面的脚本
fn build_read_script(selectors: &PageSelectors) -> Result<String> {
    with_payload(
        selectors,
        r#"    const text = (el) => (el ? el.textContent : null);
    const texts = (selector) =>
        Array.from(document.querySelectorAll(selector)).map((el) => el.textContent || "");
    return {
        description: text(document.querySelector(payload.question_type)),
        questionText: text(document.querySelector(payload.question)),
        options: texts(payload.answer_text),
        marked: texts(payload.selected_answer_text),
    };"#,
    )
}
