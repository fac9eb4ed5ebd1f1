//! OrdersManager - 订单生命周期
//!
//! 每个操作的流程：
//!
//! ```text
//! op(input, origin)
//!     ├─ 1. 输入校验 (不访问存储)
//!     ├─ 2. 引用检查 (party / quality / order 是否存在)
//!     ├─ 3. 写入 (带时间预算；多步写入放在一个事务里)
//!     ├─ 4. 审计 (fire-and-forget，成功/失败都记录)
//!     └─ 5. 返回结果
//! ```
//!
//! 状态机: `nonexistent → pending ⇄ delivered`，任一状态都可被删除。

mod validation;

#[cfg(test)]
mod tests;

pub use validation::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, OrderListQuery};

use std::time::Duration;

use serde_json::json;
use shared::models::{
    BulkOrderCreate, DeleteAllResult, Lab, LabCreate, Order, OrderCreate, OrderPage, OrderStatus,
    OrderStatusChanged, OrderStatusUpdate, OrderType, Pagination,
};
use sqlx::SqlitePool;

use super::sequence::SequenceAllocator;
use crate::audit::{AuditAction, AuditEvent, AuditService, Origin, Severity};
use crate::db::repository::{RepoError, lab, order, party, quality};
use crate::utils::validation::parse_id;
use crate::utils::{AppError, AppResult, ErrorCode, with_budget};
use validation::{ValidatedOrder, list_filter, parse_status, validate_bulk, validate_lab, validate_order};

/// 审计中的资源类型
pub const RESOURCE_ORDER: &str = "order";
pub const RESOURCE_COUNTER: &str = "counter";
pub const RESOURCE_LAB: &str = "lab";

/// 散货订单号前缀
pub const BULK_ID_PREFIX: &str = "BULK-";

#[derive(Clone)]
pub struct OrdersManager {
    pool: SqlitePool,
    sequence: SequenceAllocator,
    audit: AuditService,
    read_budget: Duration,
    write_budget: Duration,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("read_budget", &self.read_budget)
            .field("write_budget", &self.write_budget)
            .finish_non_exhaustive()
    }
}

impl OrdersManager {
    pub fn new(
        pool: SqlitePool,
        audit: AuditService,
        read_budget: Duration,
        write_budget: Duration,
    ) -> Self {
        Self {
            sequence: SequenceAllocator::new(pool.clone()),
            pool,
            audit,
            read_budget,
            write_budget,
        }
    }

    pub fn sequence(&self) -> &SequenceAllocator {
        &self.sequence
    }

    // ========== Create ==========

    /// 创建订单
    ///
    /// 普通订单从计数器分配序号；Bulk 类型使用 `BULK-<snowflake>`，不占用序号。
    pub async fn create(&self, input: OrderCreate, origin: &Origin) -> AppResult<Order> {
        let result = match validate_order(&input) {
            Ok(validated) => self.persist_new(validated).await,
            Err(e) => Err(e),
        };
        self.audit_create(&result, origin, "create");
        result
    }

    /// 散货快捷下单 (单条明细)
    pub async fn create_bulk(&self, input: BulkOrderCreate, origin: &Origin) -> AppResult<Order> {
        let result = match validate_bulk(&input) {
            Ok(validated) => self.persist_new(validated).await,
            Err(e) => Err(e),
        };
        self.audit_create(&result, origin, "create_bulk");
        result
    }

    async fn persist_new(&self, validated: ValidatedOrder) -> AppResult<Order> {
        let party_name = self
            .check_references(validated.record.party_id, &validated.quality_ids)
            .await?;

        let record = validated.record;
        let id = shared::util::snowflake_id();
        let now = shared::util::now_millis();

        let order_id = with_budget(self.write_budget, "create order", async {
            // 先分配序号再写入；写入失败则该号作废
            let order_id = match record.order_type {
                OrderType::Bulk => format!("{BULK_ID_PREFIX}{}", shared::util::snowflake_id()),
                _ => self.sequence.allocate_number().await?,
            };

            order::insert(&self.pool, id, &order_id, &record, now)
                .await
                .map_err(|e| match e {
                    RepoError::Duplicate(_) => AppError::with_message(
                        ErrorCode::OrderSequenceConflict,
                        format!("Order number {order_id} already exists"),
                    ),
                    other => other.into(),
                })?;

            tracing::info!(order = id, order_id = %order_id, order_type = %record.order_type, "Order created");
            Ok::<_, AppError>(order_id)
        })
        .await?;

        // 已落库：直接由写入的数据构造，不再回读
        Ok(Order {
            id,
            order_id,
            order_type: record.order_type,
            arrival_date: record.arrival_date,
            delivery_date: record.delivery_date,
            po_number: record.po_number,
            style_no: record.style_no,
            party_id: record.party_id,
            party_name: Some(party_name),
            items: record.items,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// party 必须存在；非散货明细引用的 quality 必须存在。返回 party 名称
    async fn check_references(&self, party_id: i64, quality_ids: &[i64]) -> AppResult<String> {
        with_budget(self.read_budget, "check references", async {
            let Some(party) = party::find_by_id(&self.pool, party_id).await? else {
                return Err(AppError::with_message(
                    ErrorCode::PartyNotFound,
                    format!("Party {party_id} not found"),
                ));
            };
            let missing = quality::find_missing(&self.pool, quality_ids).await?;
            if let Some(first) = missing.first() {
                return Err(AppError::with_message(
                    ErrorCode::QualityNotFound,
                    format!("Quality {first} not found"),
                )
                .with_detail("missing", missing.clone()));
            }
            Ok::<_, AppError>(party.name)
        })
        .await
    }

    fn audit_create(&self, result: &AppResult<Order>, origin: &Origin, kind: &str) {
        let event = AuditEvent::new(AuditAction::Create, RESOURCE_ORDER).origin(origin);
        let event = match result {
            Ok(order) => event.resource_id(order.id).details(json!({
                "kind": kind,
                "orderId": order.order_id,
                "orderType": order.order_type,
                "partyId": order.party_id,
                "items": order.items.len(),
            })),
            Err(e) => event.details(json!({ "kind": kind })).failed(e.message.clone()),
        };
        self.audit.record(event);
    }

    // ========== Read ==========

    /// 单个订单 (含 party 名称)
    pub async fn get(&self, id: i64) -> AppResult<Order> {
        with_budget(self.read_budget, "get order", order::find_by_id(&self.pool, id))
            .await?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
            })
    }

    /// 分页列表 (新 → 旧)
    pub async fn list(&self, query: &OrderListQuery) -> AppResult<OrderPage> {
        let (page, limit, filter) = list_filter(query)?;
        let (orders, total) =
            with_budget(self.read_budget, "list orders", order::find_page(&self.pool, &filter))
                .await?;
        Ok(OrderPage {
            orders,
            pagination: Pagination::new(page, limit, total),
        })
    }

    /// 订单下未软删除的 lab；订单不存在时返回空列表
    pub async fn labs_for_order(&self, order_id: i64) -> AppResult<Vec<Lab>> {
        with_budget(
            self.read_budget,
            "list labs",
            lab::find_active_by_order(&self.pool, order_id),
        )
        .await
    }

    // ========== Update ==========

    /// 整单替换：序号与状态保持不变
    pub async fn replace(&self, id: i64, input: OrderCreate, origin: &Origin) -> AppResult<Order> {
        let result = self.replace_inner(id, &input).await;
        let event = AuditEvent::new(AuditAction::Update, RESOURCE_ORDER)
            .origin(origin)
            .resource_id(id);
        let event = match &result {
            Ok(order) => event.details(json!({
                "kind": "replace",
                "orderId": order.order_id,
                "partyId": order.party_id,
                "items": order.items.len(),
            })),
            Err(e) => event.details(json!({ "kind": "replace" })).failed(e.message.clone()),
        };
        self.audit.record(event);
        result
    }

    async fn replace_inner(&self, id: i64, input: &OrderCreate) -> AppResult<Order> {
        let validated = validate_order(input)?;
        let existing = self.get(id).await?;

        // 类型决定编号体系，不允许在散货与普通订单之间切换
        let was_bulk = existing.order_type == OrderType::Bulk;
        let is_bulk = validated.record.order_type == OrderType::Bulk;
        if was_bulk != is_bulk {
            return Err(AppError::with_message(
                ErrorCode::InvalidOrderType,
                "Cannot change order type between Bulk and sequenced types",
            ));
        }

        let party_name = self
            .check_references(validated.record.party_id, &validated.quality_ids)
            .await?;

        let now = shared::util::now_millis();
        let updated = with_budget(
            self.write_budget,
            "replace order",
            order::replace(&self.pool, id, &validated.record, now),
        )
        .await?;
        if !updated {
            return Err(AppError::with_message(
                ErrorCode::OrderNotFound,
                format!("Order {id} not found"),
            ));
        }

        let record = validated.record;
        Ok(Order {
            order_type: record.order_type,
            arrival_date: record.arrival_date,
            delivery_date: record.delivery_date,
            po_number: record.po_number,
            style_no: record.style_no,
            party_id: record.party_id,
            party_name: Some(party_name),
            items: record.items,
            updated_at: now,
            ..existing
        })
    }

    /// 仅修改状态；非法状态在访问存储前拒绝
    pub async fn update_status(
        &self,
        input: OrderStatusUpdate,
        origin: &Origin,
    ) -> AppResult<OrderStatusChanged> {
        let result = self.update_status_inner(&input).await;
        let event = AuditEvent::new(AuditAction::Update, RESOURCE_ORDER).origin(origin);
        let event = match &result {
            Ok(changed) => event.resource_id(changed.id).details(json!({
                "kind": "status",
                "orderId": changed.order_id,
                "status": changed.status,
            })),
            Err(e) => {
                let event = match input.order_id.parse() {
                    Some(id) => event.resource_id(id),
                    None => event,
                };
                event
                    .details(json!({ "kind": "status", "status": input.status }))
                    .failed(e.message.clone())
            }
        };
        self.audit.record(event);
        result
    }

    async fn update_status_inner(&self, input: &OrderStatusUpdate) -> AppResult<OrderStatusChanged> {
        let status: OrderStatus = parse_status(&input.status)?;
        let id = parse_id(&input.order_id, "orderId", ErrorCode::InvalidRequest)?;
        let now = shared::util::now_millis();

        with_budget(
            self.write_budget,
            "update order status",
            order::update_status(&self.pool, id, status, now),
        )
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found")))
    }

    // ========== Delete ==========

    /// 删除单个订单，并在同一事务内软删除其 lab
    pub async fn delete_one(&self, id: i64, origin: &Origin) -> AppResult<String> {
        let result = self.delete_one_inner(id).await;
        let event = AuditEvent::new(AuditAction::Delete, RESOURCE_ORDER)
            .origin(origin)
            .resource_id(id);
        let event = match &result {
            Ok((order_id, labs)) => event.details(json!({
                "orderId": order_id,
                "labsSoftDeleted": labs,
            })),
            Err(e) => event.failed(e.message.clone()),
        };
        self.audit.record(event);
        result.map(|(order_id, _)| order_id)
    }

    async fn delete_one_inner(&self, id: i64) -> AppResult<(String, u64)> {
        let now = shared::util::now_millis();
        with_budget(self.write_budget, "delete order", async {
            let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

            let Some(order_id) = order::delete(&mut *tx, id).await? else {
                return Err(AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {id} not found"),
                ));
            };
            let labs = lab::soft_delete_by_order(&mut *tx, id, now).await?;

            tx.commit().await.map_err(RepoError::from)?;
            tracing::info!(order = id, order_id = %order_id, labs_soft_deleted = labs, "Order deleted");
            Ok::<_, AppError>((order_id, labs))
        })
        .await
    }

    /// 删除全部订单并把序号归零 (不可恢复)
    ///
    /// 没有订单时拒绝，避免空操作重置计数器。
    pub async fn delete_all(&self, origin: &Origin) -> AppResult<DeleteAllResult> {
        let result = self.delete_all_inner().await;
        let event = AuditEvent::new(AuditAction::DeleteAll, RESOURCE_ORDER)
            .origin(origin)
            .severity(Severity::Critical);
        let event = match &result {
            Ok((deleted, labs)) => event.details(json!({
                "deletedCount": deleted,
                "labsSoftDeleted": labs,
                "counterReset": true,
            })),
            Err(e) => event.failed(e.message.clone()),
        };
        self.audit.record(event);
        result.map(|(deleted_count, _)| DeleteAllResult { deleted_count })
    }

    async fn delete_all_inner(&self) -> AppResult<(u64, u64)> {
        let now = shared::util::now_millis();
        with_budget(self.write_budget, "delete all orders", async {
            let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

            let deleted = order::delete_all(&mut *tx).await?;
            if deleted == 0 {
                // tx 被 drop → 回滚
                return Err(AppError::with_message(
                    ErrorCode::NoOrdersToDelete,
                    "No orders to delete",
                ));
            }
            let labs = lab::soft_delete_all(&mut *tx, now).await?;
            self.sequence.reset_in(&mut tx).await?;

            tx.commit().await.map_err(RepoError::from)?;
            tracing::warn!(deleted, labs_soft_deleted = labs, "All orders deleted, order counter reset");
            Ok::<_, AppError>((deleted, labs))
        })
        .await
    }

    /// 计数器归零；仍有订单时拒绝
    pub async fn reset_counter(&self, origin: &Origin) -> AppResult<()> {
        let result = with_budget(
            self.write_budget,
            "reset counter",
            self.sequence.reset_if_no_orders(),
        )
        .await
        .and_then(|reset| {
            if reset {
                Ok(())
            } else {
                Err(AppError::business_rule(
                    ErrorCode::OrdersExist,
                    "Cannot reset counter while orders exist",
                ))
            }
        });

        let event = AuditEvent::new(AuditAction::ResetCounter, RESOURCE_COUNTER)
            .origin(origin)
            .resource_id(super::sequence::ORDER_COUNTER)
            .severity(Severity::Warning);
        let event = match &result {
            Ok(()) => event,
            Err(e) => event.failed(e.message.clone()),
        };
        self.audit.record(event);

        if result.is_ok() {
            tracing::warn!("Order counter reset");
        }
        result
    }

    // ========== Labs ==========

    /// 新建 lab：订单必须存在且包含该明细
    pub async fn create_lab(&self, input: LabCreate, origin: &Origin) -> AppResult<Lab> {
        let result = self.create_lab_inner(&input).await;
        let event = AuditEvent::new(AuditAction::Create, RESOURCE_LAB).origin(origin);
        let event = match &result {
            Ok(lab) => event.resource_id(lab.id).details(json!({
                "orderId": lab.order_id,
                "orderItemId": lab.order_item_id,
                "status": lab.status,
            })),
            Err(e) => event.failed(e.message.clone()),
        };
        self.audit.record(event);
        result
    }

    async fn create_lab_inner(&self, input: &LabCreate) -> AppResult<Lab> {
        let record = validate_lab(input)?;
        let parent = self.get(record.order_id).await?;
        if !parent.items.iter().any(|item| item.id == record.order_item_id) {
            return Err(item_not_found(&record));
        }

        let id = shared::util::snowflake_id();
        let now = shared::util::now_millis();
        let inserted = with_budget(
            self.write_budget,
            "create lab",
            lab::insert(&self.pool, id, &record, now),
        )
        .await?;

        match inserted {
            Some(lab) => Ok(lab),
            // 检查之后订单被删除或明细被替换
            None => match self.get(record.order_id).await {
                Ok(_) => Err(item_not_found(&record)),
                Err(e) => Err(e),
            },
        }
    }
}

fn item_not_found(record: &lab::LabRecord) -> AppError {
    AppError::with_message(
        ErrorCode::OrderItemNotFound,
        format!(
            "Item {} not found in order {}",
            record.order_item_id, record.order_id
        ),
    )
}
