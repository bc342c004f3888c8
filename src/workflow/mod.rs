pub mod cycle_ctx;
pub mod cycle_guard;
pub mod question_flow;

pub use cycle_ctx::CycleCtx;
pub use cycle_guard::{CycleGuard, CycleTicket};
pub use question_flow::{CycleReport, QuestionFlow};
