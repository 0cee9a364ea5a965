use axum::{extract::State, http::StatusCode, response::Json, Extension};
use chrono::{DateTime, NaiveDate, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

use crate::errors::{AppError, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::order::{CreateOrderRequest, CreateOrderResponse, Order, OrderResponse};
use crate::models::transaction::{Transaction, DEBIT};
use crate::models::user::User;
use crate::state::AppState;

/// A booking with every required field present, extracted from the raw
/// request at the boundary.
struct Booking {
    name: String,
    phone: String,
    address: String,
    pickup_date: DateTime<Utc>,
    pickup_time: String,
    service_type: String,
    weight: f64,
    express: bool,
    total_amount: f64,
    payment_method: String,
}

// Zero is rejected along with absent values ("falsy" semantics), so a
// weight or amount of 0 reads as a missing field.
fn require_number(value: Option<f64>) -> Option<f64> {
    value.filter(|n| *n != 0.0)
}

fn require_string(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn parse_pickup_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn validate_booking(payload: CreateOrderRequest) -> Result<Booking> {
    let missing = || AppError::Validation("All fields are required".to_string());

    let pickup_date = require_string(payload.pickup_date)
        .ok_or_else(missing)
        .and_then(|raw| {
            parse_pickup_date(&raw)
                .ok_or_else(|| AppError::Validation("Invalid pickup date".to_string()))
        })?;

    Ok(Booking {
        name: require_string(payload.name).ok_or_else(missing)?,
        phone: require_string(payload.phone).ok_or_else(missing)?,
        address: require_string(payload.address).ok_or_else(missing)?,
        pickup_date,
        pickup_time: require_string(payload.pickup_time).ok_or_else(missing)?,
        service_type: require_string(payload.service_type).ok_or_else(missing)?,
        weight: require_number(payload.weight).ok_or_else(missing)?,
        express: payload.express.unwrap_or(false),
        total_amount: require_number(payload.total_amount).ok_or_else(missing)?,
        payment_method: require_string(payload.payment_method).ok_or_else(missing)?,
    })
}

pub async fn create_order(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>)> {
    tracing::info!("Booking request received");

    let booking = validate_booking(payload)?;
    let user_id = user
        .id
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

    let users: Collection<User> = state.db.collection("users");

    // Balance is re-read here rather than taken from the auth context,
    // so the check sees the latest committed value.
    let user = users
        .find_one(doc! { "_id": user_id })
        .await?
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

    let mut new_balance = user.wallet_balance;

    if booking.payment_method == "wallet" {
        if user.wallet_balance < booking.total_amount {
            return Err(AppError::InsufficientFunds {
                required: booking.total_amount,
                available: user.wallet_balance,
            });
        }

        // The debit, ledger append, and order insert below are three
        // independent writes with no transaction around them; a failure
        // in between leaves a debited wallet with no order.
        let updated = users
            .find_one_and_update(
                doc! { "_id": user_id },
                doc! { "$inc": { "walletBalance": -booking.total_amount } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| AppError::Auth("User not found".to_string()))?;
        new_balance = updated.wallet_balance;

        let transaction = Transaction {
            id: Some(ObjectId::new()),
            user_id: user_id.to_hex(),
            kind: DEBIT.to_string(),
            amount: booking.total_amount,
            description: "Laundry Service Payment".to_string(),
            payment_method: Some("wallet".to_string()),
            created_at: Utc::now(),
        };
        state
            .db
            .collection::<Transaction>("transactions")
            .insert_one(&transaction)
            .await?;
    }

    let order = Order {
        id: Some(ObjectId::new()),
        user_id: user_id.to_hex(),
        name: booking.name,
        phone: booking.phone,
        address: booking.address,
        pickup_date: booking.pickup_date,
        pickup_time: booking.pickup_time,
        service_type: booking.service_type,
        weight: booking.weight,
        express: booking.express,
        total_amount: booking.total_amount,
        payment_method: booking.payment_method,
        status: "scheduled".to_string(),
        created_at: Utc::now(),
    };

    let orders: Collection<Order> = state.db.collection("orders");
    orders.insert_one(&order).await?;

    tracing::info!(
        "Order created for user {}: ₹{}",
        user_id.to_hex(),
        order.total_amount
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            message: "Order created successfully".to_string(),
            order: OrderResponse::from(order),
            new_balance,
        }),
    ))
}

pub async fn get_orders(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<OrderResponse>>> {
    let user_id = user
        .id
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

    let collection: Collection<Order> = state.db.collection("orders");
    let cursor = collection
        .find(doc! { "userId": user_id.to_hex() })
        .sort(doc! { "createdAt": -1 })
        .await?;

    let orders: Vec<Order> = cursor.try_collect().await?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateOrderRequest {
        CreateOrderRequest {
            name: Some("Asha".to_string()),
            phone: Some("9876543210".to_string()),
            address: Some("12 MG Road".to_string()),
            pickup_date: Some("2026-09-15".to_string()),
            pickup_time: Some("10:00 AM".to_string()),
            service_type: Some("wash-fold".to_string()),
            weight: Some(4.5),
            express: None,
            total_amount: Some(450.0),
            payment_method: Some("wallet".to_string()),
        }
    }

    #[test]
    fn complete_payload_is_accepted() {
        let booking = validate_booking(payload()).unwrap();
        assert_eq!(booking.total_amount, 450.0);
        assert_eq!(booking.payment_method, "wallet");
    }

    #[test]
    fn express_defaults_to_false() {
        let booking = validate_booking(payload()).unwrap();
        assert!(!booking.express);
    }

    #[test]
    fn missing_field_is_rejected() {
        let mut req = payload();
        req.payment_method = None;
        assert!(validate_booking(req).is_err());
    }

    #[test]
    fn zero_weight_is_rejected_as_missing() {
        let mut req = payload();
        req.weight = Some(0.0);
        assert!(validate_booking(req).is_err());
    }

    #[test]
    fn zero_amount_is_rejected_as_missing() {
        let mut req = payload();
        req.total_amount = Some(0.0);
        assert!(validate_booking(req).is_err());
    }

    #[test]
    fn pickup_date_accepts_plain_dates_and_rfc3339() {
        assert!(parse_pickup_date("2026-09-15").is_some());
        assert!(parse_pickup_date("2026-09-15T08:30:00Z").is_some());
        assert!(parse_pickup_date("next tuesday").is_none());
    }
}
