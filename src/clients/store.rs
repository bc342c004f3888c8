//! 题库端口
//!
//! 流程层只依赖这个 trait，传输细节由实现决定

use async_trait::async_trait;

use crate::error::TransportError;
use crate::models::RemoteRecord;

/// 远端题库的逻辑操作
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// 按题干搜索，结果保持题库返回的顺序
    async fn search(&self, key: &str) -> Result<Vec<RemoteRecord>, TransportError>;

    /// 新建题目
    async fn create(&self, draft: &RemoteRecord) -> Result<RemoteRecord, TransportError>;

    /// 更新指定题目
    async fn update(&self, id: i64, draft: &RemoteRecord) -> Result<RemoteRecord, TransportError>;
}
