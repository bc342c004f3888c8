//! 过期响应保护
//!
//! 每开始一个周期计数器加一；请求返回时只有最新的周期才能继续

use std::sync::atomic::{AtomicU64, Ordering};

/// 周期编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CycleTicket(u64);

impl CycleTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// 单调递增的周期计数器
#[derive(Debug, Default)]
pub struct CycleGuard {
    latest: AtomicU64,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始新周期，之前的周期全部过期
    pub fn begin(&self) -> CycleTicket {
        CycleTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// 该周期是否仍是最新的
    pub fn is_current(&self, ticket: CycleTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_increase_monotonically() {
        let guard = CycleGuard::new();
        let first = guard.begin();
        let second = guard.begin();

        assert!(second > first);
        assert_eq!(first.id(), 1);
        assert_eq!(second.id(), 2);
    }

    #[test]
    fn test_new_cycle_invalidates_previous() {
        let guard = CycleGuard::new();
        let first = guard.begin();
        assert!(guard.is_current(first));

        let second = guard.begin();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }
}
