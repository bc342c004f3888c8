//! 题库匹配结果判断
//!
//! 只看结果数量，不做模糊匹配和排序，相关性由题库负责

use crate::models::{MatchOutcome, RemoteRecord};

/// 根据搜索结果数量得出匹配情况
pub fn interpret(results: Vec<RemoteRecord>) -> MatchOutcome {
    match results.len() {
        0 => MatchOutcome::NotFound,
        1 => results
            .into_iter()
            .next()
            .map_or(MatchOutcome::NotFound, MatchOutcome::Single),
        _ => MatchOutcome::Multiple(results),
    }
}
