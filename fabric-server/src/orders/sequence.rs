//! 订单序号分配器
//!
//! 全局唯一计数器 `orderId`，只能通过数据库单条原子语句修改：
//! - `allocate`: upsert + RETURNING，并发调用不会拿到相同的值
//! - `reset_if_no_orders`: 检查 + 归零在同一条语句内完成
//!
//! 序号在订单写入之前分配；写入失败时该号作废 (留下空号)，不做补偿回退。

use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::db::repository::{RepoResult, counter};

/// 订单序号计数器名称
pub const ORDER_COUNTER: &str = "orderId";

#[derive(Debug, Clone)]
pub struct SequenceAllocator {
    pool: SqlitePool,
    name: &'static str,
}

impl SequenceAllocator {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            name: ORDER_COUNTER,
        }
    }

    #[cfg(test)]
    pub(crate) fn named(pool: SqlitePool, name: &'static str) -> Self {
        Self { pool, name }
    }

    /// 原子递增并返回新值 (首次调用返回 1)
    pub async fn allocate(&self) -> RepoResult<i64> {
        counter::increment(&self.pool, self.name).await
    }

    /// 分配并渲染为订单号 ("001", "002", ... "1000")
    pub async fn allocate_number(&self) -> RepoResult<String> {
        let seq = self.allocate().await?;
        Ok(shared::util::format_sequence(seq))
    }

    /// 无条件归零 (测试用；业务路径只走 reset_in / reset_if_no_orders)
    #[cfg(test)]
    pub(crate) async fn reset(&self) -> RepoResult<()> {
        counter::reset(&self.pool, self.name).await
    }

    /// 在调用方事务内归零 (批量删除订单时使用)
    pub async fn reset_in(&self, tx: &mut Transaction<'_, Sqlite>) -> RepoResult<()> {
        counter::reset(&mut **tx, self.name).await
    }

    /// 仅当订单表为空时归零，返回是否执行了归零
    pub async fn reset_if_no_orders(&self) -> RepoResult<bool> {
        counter::reset_if_no_orders(&self.pool, self.name).await
    }

    /// 当前值 (最后发出的序号)
    pub async fn current(&self) -> RepoResult<i64> {
        counter::current(&self.pool, self.name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use std::collections::HashSet;

    async fn allocator() -> (tempfile::TempDir, SequenceAllocator) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("seq.db").display());
        let db = DbService::new(&url).await.unwrap();
        (dir, SequenceAllocator::new(db.pool))
    }

    #[tokio::test]
    async fn test_concurrent_allocations_are_distinct() {
        let (_dir, seq) = allocator().await;

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let seq = seq.clone();
                tokio::spawn(async move { seq.allocate().await })
            })
            .collect();

        let mut values = HashSet::new();
        for handle in handles {
            let value = handle.await.unwrap().unwrap();
            assert!(values.insert(value), "duplicate sequence value {value}");
        }
        assert_eq!(values.len(), 100);
        assert_eq!(values.iter().copied().min(), Some(1));
        assert_eq!(values.iter().copied().max(), Some(100));
        assert_eq!(seq.current().await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_sequential_allocations_are_gap_free() {
        let (_dir, seq) = allocator().await;
        seq.reset().await.unwrap();

        let mut got = Vec::new();
        for _ in 0..25 {
            got.push(seq.allocate().await.unwrap());
        }
        assert_eq!(got, (1..=25).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_number_rendering_and_reset() {
        let (_dir, seq) = allocator().await;
        assert_eq!(seq.current().await.unwrap(), 0);
        assert_eq!(seq.allocate_number().await.unwrap(), "001");
        assert_eq!(seq.allocate_number().await.unwrap(), "002");

        seq.reset().await.unwrap();
        assert_eq!(seq.current().await.unwrap(), 0);
        assert_eq!(seq.allocate_number().await.unwrap(), "001");
    }

    #[tokio::test]
    async fn test_reset_if_no_orders_on_empty_table() {
        let (_dir, seq) = allocator().await;
        seq.allocate().await.unwrap();
        seq.allocate().await.unwrap();

        assert!(seq.reset_if_no_orders().await.unwrap());
        assert_eq!(seq.current().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_named_counters_are_independent() {
        let (_dir, seq) = allocator().await;
        let other = SequenceAllocator::named(seq.pool.clone(), "labNumber");
        seq.allocate().await.unwrap();
        seq.allocate().await.unwrap();
        assert_eq!(other.allocate().await.unwrap(), 1);
    }
}
