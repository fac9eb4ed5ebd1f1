//! 输入校验：在任何存储访问之前完成
//!
//! 只做格式/取值检查；party / quality 是否存在由 manager 查库确认。

use std::collections::HashSet;
use std::str::FromStr;

use serde::Deserialize;
use shared::models::{
    BulkOrderCreate, LabCreate, LabStatus, OrderCreate, OrderItem, OrderItemInput, OrderStatus,
    OrderType,
};

use crate::db::repository::lab::LabRecord;
use crate::db::repository::order::{OrderFilter, OrderRecord};
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};
use crate::utils::validation::{
    MAX_IMAGES_PER_ITEM, MAX_ITEMS_PER_ORDER, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN,
    parse_id, validate_optional_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// 默认分页大小
pub const DEFAULT_PAGE_SIZE: i64 = 50;
/// 分页上限
pub const MAX_PAGE_SIZE: i64 = 100;

/// 已校验的订单写入数据 + 需要确认存在的 quality
#[derive(Debug)]
pub(crate) struct ValidatedOrder {
    pub record: OrderRecord,
    pub quality_ids: Vec<i64>,
}

pub(crate) fn parse_order_type(raw: &str) -> AppResult<OrderType> {
    OrderType::from_str(raw.trim()).map_err(|msg| {
        AppError::with_message(ErrorCode::InvalidOrderType, msg).with_detail("field", "orderType")
    })
}

pub(crate) fn parse_status(raw: &str) -> AppResult<OrderStatus> {
    OrderStatus::from_str(raw.trim()).map_err(|msg| {
        AppError::with_message(ErrorCode::InvalidOrderStatus, msg).with_detail("field", "status")
    })
}

fn validate_quantity(quantity: f64, field: &str) -> AppResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!("{field} must be a positive number"),
        )
        .with_detail("field", field));
    }
    Ok(())
}

fn build_item(
    index: usize,
    input: &OrderItemInput,
    order_type: OrderType,
) -> AppResult<(OrderItem, Option<i64>)> {
    validate_quantity(input.quantity, &format!("items[{index}].quantity"))?;
    validate_optional_text(&input.description, "description", MAX_NOTE_LEN)?;
    if input.image_urls.len() > MAX_IMAGES_PER_ITEM {
        return Err(AppError::validation(format!(
            "items[{index}] has too many images (max {MAX_IMAGES_PER_ITEM})"
        )));
    }
    if input.image_urls.iter().any(|u| u.len() > MAX_URL_LEN) {
        return Err(AppError::validation(format!(
            "items[{index}] image url is too long (max {MAX_URL_LEN})"
        )));
    }

    // 散货明细不挂 quality
    let quality = match (order_type, &input.quality) {
        (OrderType::Bulk, _) => None,
        (_, Some(q)) => Some(parse_id(q, "quality", ErrorCode::InvalidRequest)?),
        (_, None) => {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                format!("items[{index}].quality is required"),
            )
            .with_detail("field", "quality"));
        }
    };

    let item = OrderItem {
        id: input
            .id
            .filter(|id| *id > 0)
            .unwrap_or_else(shared::util::snowflake_id),
        quality,
        quantity: input.quantity,
        image_urls: input.image_urls.clone(),
        description: input.description.clone(),
        lab_dip: input.lab_dip.clone(),
    };
    Ok((item, quality))
}

/// 校验创建/替换订单的输入
pub(crate) fn validate_order(input: &OrderCreate) -> AppResult<ValidatedOrder> {
    let order_type = parse_order_type(&input.order_type)?;
    let party_id = parse_id(&input.party, "party", ErrorCode::InvalidPartyId)?;
    validate_optional_text(&input.po_number, "poNumber", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.style_no, "styleNo", MAX_SHORT_TEXT_LEN)?;

    if input.items.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::OrderEmpty,
            "Order must contain at least one item",
        ));
    }
    if input.items.len() > MAX_ITEMS_PER_ORDER {
        return Err(AppError::validation(format!(
            "Too many items ({}, max {MAX_ITEMS_PER_ORDER})",
            input.items.len()
        )));
    }
    if let (Some(arrival), Some(delivery)) = (input.arrival_date, input.delivery_date)
        && delivery < arrival
    {
        return Err(AppError::validation("deliveryDate must not be before arrivalDate")
            .with_detail("field", "deliveryDate"));
    }

    let mut items = Vec::with_capacity(input.items.len());
    let mut quality_ids = Vec::new();
    let mut seen_items = HashSet::new();
    for (index, item_input) in input.items.iter().enumerate() {
        let (item, quality) = build_item(index, item_input, order_type)?;
        if !seen_items.insert(item.id) {
            return Err(AppError::validation(format!("Duplicate item id {}", item.id)));
        }
        if let Some(q) = quality
            && !quality_ids.contains(&q)
        {
            quality_ids.push(q);
        }
        items.push(item);
    }

    Ok(ValidatedOrder {
        record: OrderRecord {
            order_type,
            arrival_date: input.arrival_date,
            delivery_date: input.delivery_date,
            po_number: input.po_number.clone(),
            style_no: input.style_no.clone(),
            party_id,
            items,
        },
        quality_ids,
    })
}

/// 散货快捷下单：单条明细，无 quality。只接受 Bulk 类型
pub(crate) fn validate_bulk(input: &BulkOrderCreate) -> AppResult<ValidatedOrder> {
    let order_type = parse_order_type(&input.order_type)?;
    if order_type != OrderType::Bulk {
        return Err(AppError::with_message(
            ErrorCode::InvalidOrderType,
            format!("Bulk route only accepts Bulk orders, got {order_type}"),
        )
        .with_detail("field", "orderType"));
    }
    let party_id = parse_id(&input.party, "party", ErrorCode::InvalidPartyId)?;
    validate_quantity(input.quantity, "quantity")?;

    let item = OrderItem {
        id: shared::util::snowflake_id(),
        quality: None,
        quantity: input.quantity,
        image_urls: Vec::new(),
        description: None,
        lab_dip: None,
    };

    Ok(ValidatedOrder {
        record: OrderRecord {
            order_type,
            arrival_date: None,
            delivery_date: None,
            po_number: None,
            style_no: None,
            party_id,
            items: vec![item],
        },
        quality_ids: Vec::new(),
    })
}

/// 校验 lab 输入 (状态缺省为 sent)
pub(crate) fn validate_lab(input: &LabCreate) -> AppResult<LabRecord> {
    let order_id = parse_id(&input.order_id, "orderId", ErrorCode::InvalidRequest)?;
    let order_item_id = parse_id(&input.order_item_id, "orderItemId", ErrorCode::InvalidRequest)?;
    let status = match &input.status {
        Some(raw) => LabStatus::from_str(raw.trim()).map_err(|msg| {
            AppError::with_message(ErrorCode::InvalidLabStatus, msg).with_detail("field", "status")
        })?,
        None => LabStatus::default(),
    };
    validate_optional_text(&input.lab_send_number, "labSendNumber", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.remarks, "remarks", MAX_NOTE_LEN)?;

    Ok(LabRecord {
        order_id,
        order_item_id,
        status,
        lab_send_date: input.lab_send_date,
        lab_send_number: input.lab_send_number.clone(),
        remarks: input.remarks.clone(),
    })
}

/// 订单列表查询参数 (query string)
///
/// 全部按字符串接收，非法值报校验错误而不是 extractor 拒绝。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub order_type: Option<String>,
}

fn parse_number(raw: &Option<String>, field: &str, default: i64) -> AppResult<i64> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => s.parse::<i64>().map_err(|_| {
            AppError::validation(format!("{field} must be an integer, got '{s}'"))
                .with_detail("field", field)
        }),
    }
}

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// 解析列表参数 → (page, limit, filter)；limit 截断到 1..=100
pub(crate) fn list_filter(query: &OrderListQuery) -> AppResult<(i64, i64, OrderFilter)> {
    let page = parse_number(&query.page, "page", 1)?.max(1);
    let limit = parse_number(&query.limit, "limit", DEFAULT_PAGE_SIZE)?.clamp(1, MAX_PAGE_SIZE);

    let order_type = non_empty(&query.order_type).map(parse_order_type).transpose()?;
    let start = non_empty(&query.start_date).map(parse_date).transpose()?;
    let end = non_empty(&query.end_date).map(parse_date).transpose()?;
    if let (Some(s), Some(e)) = (start, end)
        && e < s
    {
        return Err(AppError::validation("endDate must not be before startDate"));
    }

    let filter = OrderFilter {
        order_type,
        from: start.map(day_start_millis),
        to: end.map(day_end_millis),
        limit,
        offset: (page - 1).saturating_mul(limit),
    };
    Ok((page, limit, filter))
}
