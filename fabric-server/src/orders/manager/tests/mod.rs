use super::*;
use crate::audit::AuditWorker;
use crate::db::DbService;
use shared::models::{IdInput, LabCreate, OrderItemInput, PartyCreate, QualityCreate};
use tokio::task::JoinHandle;

mod test_core;
mod test_flows;

struct TestEnv {
    _dir: tempfile::TempDir,
    pool: SqlitePool,
    manager: OrdersManager,
    audit: AuditService,
    party_id: i64,
    quality_id: i64,
    _worker: Option<JoinHandle<()>>,
}

async fn open_pool() -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("orders.db").display());
    let db = DbService::new(&url).await.unwrap();
    (dir, db.pool)
}

async fn seed_catalog(pool: &SqlitePool) -> (i64, i64) {
    let party = party::create(
        pool,
        PartyCreate {
            name: "Acme Textiles".into(),
            contact_name: None,
            contact_phone: None,
            address: None,
        },
    )
    .await
    .unwrap();
    let quality = quality::create(
        pool,
        QualityCreate {
            name: "Cotton 40s".into(),
            weaver: Some("North Mill".into()),
            description: None,
        },
    )
    .await
    .unwrap();
    (party.id, quality.id)
}

async fn setup_with_budget(read_budget: Duration) -> TestEnv {
    let (dir, pool) = open_pool().await;
    let (party_id, quality_id) = seed_catalog(&pool).await;

    let (audit, rx) = AuditService::new(pool.clone(), 256, Duration::from_secs(5));
    let worker = tokio::spawn(AuditWorker::new(audit.storage().clone()).run(rx));
    let manager = OrdersManager::new(
        pool.clone(),
        audit.clone(),
        read_budget,
        Duration::from_secs(10),
    );

    TestEnv {
        _dir: dir,
        pool,
        manager,
        audit,
        party_id,
        quality_id,
        _worker: Some(worker),
    }
}

async fn setup() -> TestEnv {
    setup_with_budget(Duration::from_secs(5)).await
}

fn origin() -> Origin {
    Origin::system()
}

fn dying_order(party_id: i64, quality_id: i64) -> OrderCreate {
    OrderCreate {
        order_type: "Dying".into(),
        arrival_date: None,
        delivery_date: None,
        po_number: Some("PO-7781".into()),
        style_no: Some("ST-12".into()),
        party: IdInput::from(party_id),
        items: vec![OrderItemInput {
            id: None,
            quality: Some(IdInput::from(quality_id)),
            quantity: 250.0,
            image_urls: vec![],
            description: Some("navy".into()),
            lab_dip: None,
        }],
    }
}

fn bulk_order(party_id: i64, quantity: f64) -> BulkOrderCreate {
    BulkOrderCreate {
        order_type: "Bulk".into(),
        party: IdInput::from(party_id),
        quantity,
    }
}

fn lab_for(order: &Order) -> LabCreate {
    LabCreate {
        order_id: IdInput::from(order.id),
        order_item_id: IdInput::from(order.items[0].id),
        status: None,
        lab_send_date: None,
        lab_send_number: Some("L-1".into()),
        remarks: None,
    }
}

/// 等待审计 worker 把已投递的事件落库
async fn flush_audit() {
    tokio::time::sleep(Duration::from_millis(150)).await;
}
