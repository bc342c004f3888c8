//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：连接浏览器、创建 JsExecutor、题库客户端和展示实现
//! 2. **监视模式**：定时读取页面，题目变化（翻页）时启动新的查询周期
//! 3. **提交模式**：对当前页面执行一次提交周期后退出
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有 Browser 的模块
//! - **周期互不阻塞**：每个周期单独 spawn，新周期使旧周期的结果过期
//! - **向下委托**：具体流程由 workflow::QuestionFlow 完成

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::browser;
use crate::clients::StoreClient;
use crate::config::{Config, RunMode};
use crate::infrastructure::JsExecutor;
use crate::models::RawPage;
use crate::services::{BrowserPageSource, PagePresenter, PageSource, QuestionExtractor};
use crate::utils::logging::log_startup;
use crate::workflow::{CycleReport, QuestionFlow};

/// 应用主结构
pub struct App {
    config: Config,
    _browser: Browser,
    source: BrowserPageSource,
    flow: Arc<QuestionFlow>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let (browser, page) = browser::connect_to_browser_and_page(
            config.browser_debug_port,
            config.target_url.as_deref(),
            config.target_title.as_deref(),
        )
        .await?;

        let executor = Arc::new(JsExecutor::new(page));
        let source = BrowserPageSource::new(executor.clone(), &config.selectors)?;
        let presenter = Arc::new(PagePresenter::new(executor, config.selectors.clone()));
        let store = Arc::new(StoreClient::new(&config)?);

        let flow = Arc::new(QuestionFlow::new(
            QuestionExtractor::default(),
            store,
            presenter,
        ));

        Ok(Self {
            config,
            _browser: browser,
            source,
            flow,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        match self.config.run_mode {
            RunMode::Watch => self.watch().await,
            RunMode::Submit => self.submit_current().await,
        }
    }

    /// 监视页面，每道新题启动一次查询周期，Ctrl-C 退出
    async fn watch(&self) -> Result<()> {
        info!(
            "👀 开始监视测验页面 (每 {} 毫秒检查一次)",
            self.config.poll_interval_ms
        );

        let mut ticker = interval(Duration::from_millis(self.config.poll_interval_ms.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_seen: Option<RawPage> = None;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("收到退出信号，停止监视");
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            let raw = match self.source.read().await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("⚠️ 读取页面失败: {:#}", e);
                    continue;
                }
            };

            if !question_changed(last_seen.as_ref(), &raw) {
                continue;
            }
            last_seen = Some(raw.clone());

            // 在 spawn 之前领取编号，周期顺序与翻页顺序一致
            let ticket = self.flow.guard().begin();
            let flow = self.flow.clone();
            tokio::spawn(async move {
                match flow.lookup_with(ticket, &raw).await {
                    Ok(CycleReport::Stale) => {}
                    Ok(report) => log_report(&report),
                    Err(e) if e.is_transport() => warn!("⚠️ 题库暂不可用: {}", e),
                    Err(e) => error!("❌ 查询周期失败: {}", e),
                }
            });
        }
    }

    /// 提交当前页面上选中的答案
    async fn submit_current(&self) -> Result<()> {
        let raw = self.source.read().await?;
        let report = self
            .flow
            .submit(&raw)
            .await
            .context("提交周期失败")?;
        log_report(&report);
        Ok(())
    }
}

/// 题干或选项变化即视为新题；只改变选中状态不算
pub fn question_changed(previous: Option<&RawPage>, current: &RawPage) -> bool {
    match previous {
        None => true,
        Some(prev) => {
            prev.question_text != current.question_text || prev.options != current.options
        }
    }
}

fn log_report(report: &CycleReport) {
    match report {
        CycleReport::Completed(action) => info!("周期完成: {}", action.label()),
        CycleReport::NoQuestion => info!("周期完成: 页面上没有题目"),
        CycleReport::Stale => info!("周期已过期"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str, options: &[&str], marked: &[&str]) -> RawPage {
        RawPage {
            description: None,
            question_text: Some(text.to_string()),
            options: options.iter().map(|s| s.to_string()).collect(),
            marked: marked.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_first_read_is_a_change() {
        assert!(question_changed(None, &raw("Q", &["A"], &[])));
    }

    #[test]
    fn test_selection_alone_is_not_a_change() {
        let before = raw("Q", &["A", "B"], &[]);
        let after = raw("Q", &["A", "B"], &["B"]);
        assert!(!question_changed(Some(&before), &after));
    }

    #[test]
    fn test_navigation_is_a_change() {
        let before = raw("Q1", &["A", "B"], &[]);
        assert!(question_changed(Some(&before), &raw("Q2", &["A", "B"], &[])));
        assert!(question_changed(Some(&before), &raw("Q1", &["C", "D"], &[])));
    }
}
