//! 编排层（Orchestration Layer）
//!
//! 负责资源管理和周期调度，不做具体业务判断
//!
//! ```text
//! orchestrator::App (监视页面 / 触发提交)
//!     ↓
//! workflow::QuestionFlow (单个同步周期)
//!     ↓
//! services (能力层：识别 / 提取 / 匹配 / 决策 / 展示)
//!     ↓
//! clients + infrastructure (题库 HTTP / JsExecutor)
//! ```

pub mod app;

pub use app::{question_changed, App};
