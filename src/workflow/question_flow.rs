//! 题目同步流程 - 流程层
//!
//! 核心职责：定义"一次同步周期"的完整流程
//!
//! 查询周期：
//! 1. 整理页面文本 → 识别题型
//! 2. 搜索题库（题干缺失时跳过）
//! 3. 判断匹配情况 → 决策 → 展示
//!
//! 提交周期（用户显式触发）：
//! 1. 整理页面文本 → 识别题型
//! 2. 搜索题库 → 新建 / 更新 / 不变
//! 3. 展示写入结果
//!
//! 每个完成的周期恰好调用一次展示接口；过期的周期不调用。
//! 搜索与写入之间没有事务保证，两次请求之间题库可能被修改。

use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::clients::QuestionStore;
use crate::error::AppResult;
use crate::models::{
    ActionEffect, ObservedQuestion, Presentation, RawPage, SaveOutcome, StoreWrite, SyncAction,
};
use crate::services::{
    build_search_key, decide, decide_write, interpret, QuestionExtractor, ResultPresenter,
};
use crate::utils::truncate_text;
use crate::workflow::cycle_ctx::CycleCtx;
use crate::workflow::cycle_guard::{CycleGuard, CycleTicket};

/// 周期结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    /// 周期完成
    Completed(SyncAction),
    /// 页面上没有题干，未搜索题库
    NoQuestion,
    /// 已开始更新的周期，本次结果被丢弃
    Stale,
}

/// 题目同步流程
///
/// - 不持有页面资源，只依赖题库端口和展示接口
/// - 周期之间不共享可变状态（除了过期保护计数器）
pub struct QuestionFlow {
    extractor: QuestionExtractor,
    store: Arc<dyn QuestionStore>,
    presenter: Arc<dyn ResultPresenter>,
    guard: CycleGuard,
}

impl QuestionFlow {
    pub fn new(
        extractor: QuestionExtractor,
        store: Arc<dyn QuestionStore>,
        presenter: Arc<dyn ResultPresenter>,
    ) -> Self {
        Self {
            extractor,
            store,
            presenter,
            guard: CycleGuard::new(),
        }
    }

    /// 过期保护计数器；调用方可以先领取周期编号再异步执行
    pub fn guard(&self) -> &CycleGuard {
        &self.guard
    }

    /// 查询周期：找到题库中的正确答案并展示
    pub async fn lookup(&self, raw: &RawPage) -> AppResult<CycleReport> {
        self.lookup_with(self.guard.begin(), raw).await
    }

    /// 使用已领取的周期编号执行查询周期
    pub async fn lookup_with(&self, ticket: CycleTicket, raw: &RawPage) -> AppResult<CycleReport> {
        let observed = self.observe(ticket, raw);
        let ctx = CycleCtx::new(ticket, observed.kind());

        let Some(key) = build_search_key(&observed) else {
            warn!("{} ⚠️ 页面上没有找到题干，跳过搜索", ctx);
            self.presenter.on_not_found().await?;
            return Ok(CycleReport::NoQuestion);
        };

        info!("{} 🔍 正在题库中搜索...", ctx);
        let results = self.store.search(key).await;
        if !self.guard.is_current(ticket) {
            debug!("{} 已有新的周期，丢弃搜索结果", ctx);
            return Ok(CycleReport::Stale);
        }
        let results = results.map_err(|e| {
            error!("{} ❌ 搜索失败: {}", ctx, e);
            e
        })?;

        let outcome = interpret(results);
        if outcome.is_empty() {
            info!("{} ✓ 搜索完成，没有匹配记录", ctx);
        } else {
            info!("{} ✓ 搜索完成，找到 {} 条记录", ctx, outcome.len());
        }

        let action = decide(&observed, outcome);
        match action.effect() {
            ActionEffect::Present(presentation) => {
                self.present(&ctx, &observed, presentation).await?
            }
            ActionEffect::Write(_) => {
                return Err(anyhow!("查询周期不能产生写入动作: {}", action.label()).into());
            }
        }

        Ok(CycleReport::Completed(action))
    }

    /// 提交周期：把页面上选中的答案写入题库
    pub async fn submit(&self, raw: &RawPage) -> AppResult<CycleReport> {
        let ticket = self.guard.begin();
        let observed = self.observe(ticket, raw);
        let ctx = CycleCtx::new(ticket, observed.kind());

        let Some(key) = build_search_key(&observed) else {
            warn!("{} ⚠️ 页面上没有找到题干，无法提交", ctx);
            self.presenter.on_not_found().await?;
            return Ok(CycleReport::NoQuestion);
        };

        info!("{} 🔍 提交前检查题库...", ctx);
        let results = self.store.search(key).await;
        if !self.guard.is_current(ticket) {
            debug!("{} 已有新的周期，放弃提交", ctx);
            return Ok(CycleReport::Stale);
        }
        let outcome = interpret(results?);

        let action = decide_write(&observed, outcome, Utc::now());
        info!(
            "{} 决策: {}{}",
            ctx,
            action.label(),
            if action.is_write() { " (写入题库)" } else { "" }
        );

        let write = match action.effect() {
            ActionEffect::Present(presentation) => {
                self.present(&ctx, &observed, presentation).await?;
                return Ok(CycleReport::Completed(action));
            }
            ActionEffect::Write(write) => write,
        };

        let saved = match write {
            StoreWrite::Create(draft) => {
                info!("{} 📤 正在新建题目...", ctx);
                let created = self.store.create(draft).await;
                if !self.guard.is_current(ticket) {
                    debug!("{} 已有新的周期，不再展示新建结果", ctx);
                    return Ok(CycleReport::Stale);
                }
                let created = created?;
                info!("{} ✓ 题目已新建: #{}", ctx, created.id);
                SaveOutcome::Created(created)
            }
            StoreWrite::Update { id, draft } => {
                info!("{} 📤 正在更新题目 #{}...", ctx, id);
                let updated = self.store.update(id, draft).await;
                if !self.guard.is_current(ticket) {
                    debug!("{} 已有新的周期，不再展示更新结果", ctx);
                    return Ok(CycleReport::Stale);
                }
                let updated = updated?;
                info!("{} ✓ 题目已更新: #{}", ctx, updated.id);
                SaveOutcome::Updated(updated)
            }
            StoreWrite::Skip(record) => {
                info!("{} 题库记录 #{} 与页面一致，无需写入", ctx, record.id);
                SaveOutcome::Unchanged(record.clone())
            }
        };
        self.presenter.on_saved(&saved).await?;

        Ok(CycleReport::Completed(action))
    }

    /// 整理页面文本
    fn observe(&self, ticket: CycleTicket, raw: &RawPage) -> ObservedQuestion {
        let observed = self.extractor.observe(raw);

        let ctx = CycleCtx::new(ticket, observed.kind());
        info!("{} 题干: {}", ctx, truncate_text(observed.text(), 80));
        debug!(
            "{} 选项 {} 个, 已选正确答案 {} 个",
            ctx,
            observed.options().len(),
            observed.marked_correct().len()
        );

        observed
    }

    /// 把展示类动作交给展示接口
    async fn present(
        &self,
        ctx: &CycleCtx,
        observed: &ObservedQuestion,
        presentation: Presentation<'_>,
    ) -> AppResult<()> {
        match presentation {
            Presentation::Highlight(answers) => {
                info!("{} ✅ 找到 {} 个正确答案", ctx, answers.len());
                self.presenter.on_highlight(observed.kind(), answers).await?;
            }
            Presentation::MissingCorrectAnswers => {
                warn!("{} ⚠️ 没有正确答案", ctx);
                self.presenter.on_missing_answers().await?;
            }
            Presentation::NotFound => {
                warn!("{} ⚠️ 题库中没有这道题", ctx);
                self.presenter.on_not_found().await?;
            }
            Presentation::Ambiguous(candidates) => {
                warn!("{} 🔀 匹配到 {} 条记录，交给用户判断", ctx, candidates.len());
                self.presenter.on_ambiguous(candidates).await?;
            }
        }
        Ok(())
    }
}
