use super::*;

#[tokio::test]
async fn test_delete_all_resets_numbering() {
    let env = setup().await;
    let mut numbers = Vec::new();
    for _ in 0..3 {
        let order = env
            .manager
            .create(dying_order(env.party_id, env.quality_id), &origin())
            .await
            .unwrap();
        numbers.push(order.order_id);
    }
    assert_eq!(numbers, vec!["001", "002", "003"]);

    let result = env.manager.delete_all(&origin()).await.unwrap();
    assert_eq!(result.deleted_count, 3);
    assert_eq!(env.manager.sequence().current().await.unwrap(), 0);

    let again = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();
    assert_eq!(again.order_id, "001");
}

#[tokio::test]
async fn test_delete_all_with_no_orders_is_rejected() {
    let env = setup().await;
    env.manager.sequence().allocate().await.unwrap();

    let err = env.manager.delete_all(&origin()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NoOrdersToDelete);
    assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    // 空操作不重置计数器
    assert_eq!(env.manager.sequence().current().await.unwrap(), 1);
}

#[tokio::test]
async fn test_reset_counter_guarded_by_existing_orders() {
    let env = setup().await;
    let order = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();

    let err = env.manager.reset_counter(&origin()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrdersExist);
    assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    assert_eq!(env.manager.sequence().current().await.unwrap(), 1);

    env.manager.delete_one(order.id, &origin()).await.unwrap();
    env.manager.reset_counter(&origin()).await.unwrap();
    assert_eq!(env.manager.sequence().current().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_one_soft_deletes_labs() {
    let env = setup().await;
    let order = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();
    let other = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();

    env.manager.create_lab(lab_for(&order), &origin()).await.unwrap();
    env.manager.create_lab(lab_for(&order), &origin()).await.unwrap();
    env.manager.create_lab(lab_for(&other), &origin()).await.unwrap();
    assert_eq!(env.manager.labs_for_order(order.id).await.unwrap().len(), 2);

    let deleted = env.manager.delete_one(order.id, &origin()).await.unwrap();
    assert_eq!(deleted, order.order_id);

    assert!(env.manager.labs_for_order(order.id).await.unwrap().is_empty());
    // 文档仍在，只是标记为软删除
    let all = lab::find_all_by_order(&env.pool, order.id).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|l| l.soft_deleted));
    // 其它订单的 lab 不受影响
    assert_eq!(env.manager.labs_for_order(other.id).await.unwrap().len(), 1);

    let err = env.manager.get(order.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
    let err = env.manager.delete_one(order.id, &origin()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
}

#[tokio::test]
async fn test_delete_all_soft_deletes_every_lab() {
    let env = setup().await;
    let order = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();
    env.manager.create_lab(lab_for(&order), &origin()).await.unwrap();

    env.manager.delete_all(&origin()).await.unwrap();
    assert!(env.manager.labs_for_order(order.id).await.unwrap().is_empty());
    assert_eq!(lab::find_all_by_order(&env.pool, order.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_lab_checks_parent() {
    let env = setup().await;
    let order = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();

    let lab = env.manager.create_lab(lab_for(&order), &origin()).await.unwrap();
    assert_eq!(lab.status, shared::models::LabStatus::Sent);
    assert!(!lab.soft_deleted);

    let mut input = lab_for(&order);
    input.order_item_id = IdInput::from(order.items[0].id + 1);
    let err = env.manager.create_lab(input, &origin()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderItemNotFound);

    let mut input = lab_for(&order);
    input.order_id = IdInput::from(order.id + 1);
    let err = env.manager.create_lab(input, &origin()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);

    let mut input = lab_for(&order);
    input.status = Some("lost".into());
    let err = env.manager.create_lab(input, &origin()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidLabStatus);
}

#[tokio::test]
async fn test_lab_insert_requires_live_order_item() {
    let env = setup().await;
    let order = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();
    let record = lab::LabRecord {
        order_id: order.id,
        order_item_id: order.items[0].id,
        status: shared::models::LabStatus::Sent,
        lab_send_date: None,
        lab_send_number: None,
        remarks: None,
    };

    let wrong_item = lab::LabRecord {
        order_item_id: order.items[0].id + 1,
        ..record.clone()
    };
    let now = shared::util::now_millis();
    let inserted = lab::insert(&env.pool, shared::util::snowflake_id(), &wrong_item, now)
        .await
        .unwrap();
    assert!(inserted.is_none());

    env.manager.delete_one(order.id, &origin()).await.unwrap();

    // 订单删除后，迟到的插入不会留下活动 lab
    let inserted = lab::insert(&env.pool, shared::util::snowflake_id(), &record, now)
        .await
        .unwrap();
    assert!(inserted.is_none());
    assert!(lab::find_all_by_order(&env.pool, order.id).await.unwrap().is_empty());

    let err = env.manager.create_lab(lab_for(&order), &origin()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
}

#[tokio::test]
async fn test_create_succeeds_when_audit_storage_fails() {
    let env = setup().await;
    sqlx::query("DROP TABLE audit_log")
        .execute(&env.pool)
        .await
        .unwrap();

    let order = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();
    assert_eq!(order.order_id, "001");
    flush_audit().await;

    let second = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();
    assert_eq!(second.order_id, "002");
}

#[tokio::test]
async fn test_create_succeeds_when_audit_channel_closed() {
    let (_dir, pool) = open_pool().await;
    let (party_id, quality_id) = seed_catalog(&pool).await;
    let (audit, rx) = AuditService::new(pool.clone(), 1, Duration::from_secs(5));
    drop(rx);

    let manager = OrdersManager::new(pool, audit, Duration::from_secs(5), Duration::from_secs(5));
    let order = manager
        .create(dying_order(party_id, quality_id), &origin())
        .await
        .unwrap();
    assert_eq!(order.order_id, "001");
}

#[tokio::test]
async fn test_operations_are_audited_per_order() {
    let env = setup().await;
    let order = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();
    env.manager
        .update_status(
            OrderStatusUpdate {
                order_id: IdInput::from(order.id),
                status: "delivered".into(),
            },
            &origin(),
        )
        .await
        .unwrap();
    flush_audit().await;

    let history = env
        .audit
        .for_resource(RESOURCE_ORDER, &order.id.to_string(), 50)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    let actions: Vec<&str> = history.iter().map(|e| e.action.as_str()).collect();
    assert!(actions.contains(&"create"));
    assert!(actions.contains(&"update"));
    assert!(history.iter().all(|e| e.success));
}

#[tokio::test]
async fn test_failed_delete_all_is_audited_as_critical() {
    let env = setup().await;
    let _ = env.manager.delete_all(&origin()).await;
    flush_audit().await;

    let stats = env.audit.stats(10).await.unwrap();
    assert_eq!(stats.by_action.get("delete_all"), Some(&1));
    let entry = &stats.recent[0];
    assert!(!entry.success);
    assert_eq!(entry.severity, "critical");
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_numbers() {
    let env = setup().await;
    let handles: Vec<_> = (0..20)
        .map(|_| {
            let manager = env.manager.clone();
            let input = dying_order(env.party_id, env.quality_id);
            tokio::spawn(async move { manager.create(input, &Origin::system()).await })
        })
        .collect();

    let mut numbers = std::collections::HashSet::new();
    for handle in handles {
        let order = handle.await.unwrap().unwrap();
        assert!(numbers.insert(order.order_id));
    }
    assert_eq!(numbers.len(), 20);
    assert_eq!(env.manager.sequence().current().await.unwrap(), 20);
}
