use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// An `orders` document. `user_id` is stored as the owner's hex id string,
/// matching the document shape queried by the feedback lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub pickup_date: DateTime<Utc>,

    pub pickup_time: String,
    pub service_type: String,
    pub weight: f64,
    #[serde(default)]
    pub express: bool,
    pub total_amount: f64,
    pub payment_method: String,
    pub status: String,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub pickup_date: Option<String>,
    pub pickup_time: Option<String>,
    pub service_type: Option<String>,
    pub weight: Option<f64>,
    pub express: Option<bool>,
    pub total_amount: Option<f64>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub service_type: String,
    pub weight: f64,
    pub express: bool,
    pub total_amount: f64,
    pub payment_method: String,
    pub status: String,
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: order.user_id,
            name: order.name,
            phone: order.phone,
            address: order.address,
            pickup_date: order.pickup_date.to_rfc3339(),
            pickup_time: order.pickup_time,
            service_type: order.service_type,
            weight: order.weight,
            express: order.express,
            total_amount: order.total_amount,
            payment_method: order.payment_method,
            status: order.status,
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub message: String,
    pub order: OrderResponse,
    pub new_balance: f64,
}
