use super::*;

#[tokio::test]
async fn test_create_assigns_sequential_numbers() {
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
}

#[tokio::test]
async fn test_created_order_is_populated() {
    let env = setup().await;
    let order = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.order_type, OrderType::Dying);
    assert_eq!(order.party_name.as_deref(), Some("Acme Textiles"));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quality, Some(env.quality_id));

    let fetched = env.manager.get(order.id).await.unwrap();
    assert_eq!(fetched.order_id, order.order_id);
    assert_eq!(fetched.po_number.as_deref(), Some("PO-7781"));
}

#[tokio::test]
async fn test_bulk_orders_do_not_consume_sequence() {
    let env = setup().await;
    let bulk = env
        .manager
        .create_bulk(bulk_order(env.party_id, 500.0), &origin())
        .await
        .unwrap();
    assert!(bulk.order_id.starts_with(BULK_ID_PREFIX));
    assert_eq!(bulk.order_type, OrderType::Bulk);
    assert!(bulk.items[0].quality.is_none());
    assert_eq!(env.manager.sequence().current().await.unwrap(), 0);

    let normal = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();
    assert_eq!(normal.order_id, "001");
}

#[tokio::test]
async fn test_bulk_route_rejects_sequenced_types() {
    let env = setup().await;
    let mut input = bulk_order(env.party_id, 500.0);
    input.order_type = "Dying".into();
    let err = env.manager.create_bulk(input, &origin()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidOrderType);
    assert_eq!(env.manager.sequence().current().await.unwrap(), 0);
    assert_eq!(order::count_all(&env.pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_write_results_match_stored_orders() {
    let env = setup().await;
    let created = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();
    let stored = env.manager.get(created.id).await.unwrap();
    assert_eq!(
        serde_json::to_value(&created).unwrap(),
        serde_json::to_value(&stored).unwrap()
    );

    let bulk = env
        .manager
        .create_bulk(bulk_order(env.party_id, 80.0), &origin())
        .await
        .unwrap();
    let stored = env.manager.get(bulk.id).await.unwrap();
    assert_eq!(
        serde_json::to_value(&bulk).unwrap(),
        serde_json::to_value(&stored).unwrap()
    );

    let mut input = dying_order(env.party_id, env.quality_id);
    input.po_number = Some("PO-9000".into());
    input.items[0].id = Some(created.items[0].id);
    let replaced = env.manager.replace(created.id, input, &origin()).await.unwrap();
    let stored = env.manager.get(created.id).await.unwrap();
    assert_eq!(
        serde_json::to_value(&replaced).unwrap(),
        serde_json::to_value(&stored).unwrap()
    );
    assert_eq!(replaced.created_at, created.created_at);

    flush_audit().await;
    let history = env
        .audit
        .for_resource(RESOURCE_ORDER, &created.id.to_string(), 50)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|e| e.success));
}

#[tokio::test]
async fn test_missing_party_rejected_before_allocation() {
    let env = setup().await;
    let err = env
        .manager
        .create(dying_order(env.party_id + 1, env.quality_id), &origin())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PartyNotFound);

    let err = env
        .manager
        .create_bulk(bulk_order(env.party_id + 1, 10.0), &origin())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PartyNotFound);

    assert_eq!(env.manager.sequence().current().await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_quality_rejected() {
    let env = setup().await;
    let err = env
        .manager
        .create(dying_order(env.party_id, env.quality_id + 1), &origin())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::QualityNotFound);
    assert_eq!(env.manager.sequence().current().await.unwrap(), 0);
}

#[tokio::test]
async fn test_validation_errors_touch_nothing() {
    let env = setup().await;
    let mut input = dying_order(env.party_id, env.quality_id);
    input.order_type = "Weaving".into();
    let err = env.manager.create(input, &origin()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidOrderType);

    let mut input = dying_order(env.party_id, env.quality_id);
    input.party = IdInput::Text("abc".into());
    let err = env.manager.create(input, &origin()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidPartyId);
    assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

    assert_eq!(env.manager.sequence().current().await.unwrap(), 0);
    assert_eq!(order::count_all(&env.pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_missing_order() {
    let env = setup().await;
    let err = env.manager.get(12345).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
}

#[tokio::test]
async fn test_replace_keeps_number_status_and_item_ids() {
    let env = setup().await;
    let created = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();
    env.manager
        .update_status(
            OrderStatusUpdate {
                order_id: IdInput::from(created.id),
                status: "delivered".into(),
            },
            &origin(),
        )
        .await
        .unwrap();

    let mut input = dying_order(env.party_id, env.quality_id);
    input.order_type = "Printing".into();
    input.po_number = Some("PO-9000".into());
    input.items[0].id = Some(created.items[0].id);
    input.items[0].quantity = 300.0;

    let replaced = env.manager.replace(created.id, input, &origin()).await.unwrap();
    assert_eq!(replaced.order_id, created.order_id);
    assert_eq!(replaced.status, OrderStatus::Delivered);
    assert_eq!(replaced.order_type, OrderType::Printing);
    assert_eq!(replaced.po_number.as_deref(), Some("PO-9000"));
    assert_eq!(replaced.items[0].id, created.items[0].id);
    assert_eq!(replaced.items[0].quantity, 300.0);
}

#[tokio::test]
async fn test_replace_cannot_switch_numbering() {
    let env = setup().await;
    let created = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();
    let mut input = dying_order(env.party_id, env.quality_id);
    input.order_type = "Bulk".into();
    let err = env.manager.replace(created.id, input, &origin()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidOrderType);

    let err = env
        .manager
        .replace(999, dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
}

#[tokio::test]
async fn test_update_status_transitions() {
    let env = setup().await;
    let created = env
        .manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();

    // 非法状态：拒绝且不改动
    let err = env
        .manager
        .update_status(
            OrderStatusUpdate {
                order_id: IdInput::from(created.id),
                status: "archived".into(),
            },
            &origin(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidOrderStatus);
    assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
    assert_eq!(env.manager.get(created.id).await.unwrap().status, OrderStatus::Pending);

    let changed = env
        .manager
        .update_status(
            OrderStatusUpdate {
                order_id: IdInput::Text(created.id.to_string()),
                status: "delivered".into(),
            },
            &origin(),
        )
        .await
        .unwrap();
    assert_eq!(changed.id, created.id);
    assert_eq!(changed.order_id, "001");
    assert_eq!(changed.status, OrderStatus::Delivered);
    assert_eq!(env.manager.get(created.id).await.unwrap().status, OrderStatus::Delivered);

    let err = env
        .manager
        .update_status(
            OrderStatusUpdate {
                order_id: IdInput::from(created.id + 1),
                status: "pending".into(),
            },
            &origin(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderNotFound);
}

#[tokio::test]
async fn test_list_clamps_limit_and_paginates() {
    let env = setup().await;
    for i in 0..105 {
        env.manager
            .create_bulk(bulk_order(env.party_id, 1.0 + i as f64), &origin())
            .await
            .unwrap();
    }

    let page = env
        .manager
        .list(&OrderListQuery {
            limit: Some("500".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.orders.len(), 100);
    assert_eq!(page.pagination.total_count, 105);
    assert_eq!(page.pagination.total_pages, 2);
    assert!(page.pagination.has_next_page);

    let second = env
        .manager
        .list(&OrderListQuery {
            page: Some("2".into()),
            limit: Some("100".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(second.orders.len(), 5);
    assert!(second.pagination.has_prev_page);
    assert!(!second.pagination.has_next_page);
}

#[tokio::test]
async fn test_list_filters_by_type() {
    let env = setup().await;
    env.manager
        .create(dying_order(env.party_id, env.quality_id), &origin())
        .await
        .unwrap();
    env.manager
        .create_bulk(bulk_order(env.party_id, 3.0), &origin())
        .await
        .unwrap();

    let page = env
        .manager
        .list(&OrderListQuery {
            order_type: Some("Dying".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.orders.len(), 1);
    assert_eq!(page.orders[0].order_id, "001");

    // 时间窗口不含今天 → 空
    let page = env
        .manager
        .list(&OrderListQuery {
            start_date: Some("2000-01-01".into()),
            end_date: Some("2000-01-31".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(page.orders.is_empty());
    assert_eq!(page.pagination.total_count, 0);
}

#[tokio::test]
async fn test_list_times_out_distinctly() {
    let env = setup_with_budget(Duration::ZERO).await;
    let err = env.manager.list(&OrderListQuery::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::QueryTimeout);
    assert!(err.is_timeout());
    assert_eq!(err.http_status(), http::StatusCode::GATEWAY_TIMEOUT);
}
