//! # PSE Sync
//!
//! 识别测验页面上的当前题目，与远端题库同步，并重新展示之前记录的正确答案
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有测验页面（Page），只暴露执行脚本的能力
//! - `browser/` - 连接已打开调试端口的浏览器
//! - `clients/` - 题库端口 `QuestionStore` 及其 HTTP 实现
//!
//! ### ② 业务能力层（Services）
//! - `TypeClassifier` - 从说明文字识别题型
//! - `QuestionExtractor` - 把页面文本整理成 `ObservedQuestion`
//! - `build_search_key` / `interpret` / `decide` - 搜索关键字、匹配判断、同步决策
//! - `ResultPresenter` - 展示接口（页面实现和日志实现）
//!
//! ### ③ 流程层（Workflow）
//! - `QuestionFlow` - 一次查询周期或提交周期
//! - `CycleGuard` - 过期响应保护
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 监视页面、按运行模式触发周期
//!
//! ## 模块结构

pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{QuestionStore, StoreClient};
pub use config::{Config, RunMode};
pub use error::{AppError, AppResult, TransportError};
pub use models::{
    MatchOutcome, ObservedQuestion, QuestionKind, RawPage, RemoteRecord, SaveOutcome, SyncAction,
};
pub use orchestrator::App;
pub use services::{QuestionExtractor, ResultPresenter, TypeClassifier};
pub use workflow::{CycleReport, QuestionFlow};
