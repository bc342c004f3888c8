//! 同步周期上下文
//!
//! 封装"这是第几个周期、处理的是什么题型"这一信息

use std::fmt::Display;

use crate::models::QuestionKind;
use crate::workflow::cycle_guard::CycleTicket;

/// 同步周期上下文（仅用于日志）
#[derive(Debug, Clone, Copy)]
pub struct CycleCtx {
    pub ticket: CycleTicket,
    pub kind: QuestionKind,
}

impl CycleCtx {
    pub fn new(ticket: CycleTicket, kind: QuestionKind) -> Self {
        Self { ticket, kind }
    }
}

impl Display for CycleCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[周期 #{} 题型 {}]", self.ticket.id(), self.kind)
    }
}
