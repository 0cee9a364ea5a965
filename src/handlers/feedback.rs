use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::feedback::{
    Feedback, FeedbackResponse, SubmitFeedbackRequest, SubmitFeedbackResponse,
};
use crate::models::order::Order;
use crate::state::AppState;

const GENERAL_FEEDBACK: &str = "General Feedback";

/// Display snapshot for a rated order, frozen into the feedback record.
fn order_summary(order: &Order) -> String {
    let service_name = if order.service_type == "dry-clean" {
        "Dry Cleaning"
    } else {
        "Wash & Fold"
    };

    let hex = order.id.map(|id| id.to_hex()).unwrap_or_default();
    let short_id = &hex[hex.len().saturating_sub(6)..];

    format!(
        "Order #{} - {} - ₹{}",
        short_id, service_name, order.total_amount
    )
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<SubmitFeedbackResponse>)> {
    payload.validate()?;

    let user_id = user
        .id
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

    let rating = payload
        .rating
        .ok_or_else(|| AppError::Validation("Rating must be between 1 and 5".to_string()))?;

    let order_id = payload
        .order_id
        .as_deref()
        .and_then(|raw| ObjectId::parse_str(raw).ok());

    // An order belonging to another user is treated the same as one
    // that does not exist.
    let mut order_details = None;
    if let Some(order_id) = order_id {
        let orders: Collection<Order> = state.db.collection("orders");
        let order = orders
            .find_one(doc! { "_id": order_id, "userId": user_id.to_hex() })
            .await?;

        order_details = order.as_ref().map(order_summary);
    }

    let feedback = Feedback {
        id: Some(ObjectId::new()),
        user_id,
        order_id,
        order_details: order_details.unwrap_or_else(|| GENERAL_FEEDBACK.to_string()),
        rating,
        comments: payload.comments.unwrap_or_default(),
        service_quality: payload.service_quality,
        recommend: payload.recommend.unwrap_or_else(|| "yes".to_string()),
        created_at: Utc::now(),
    };

    let collection: Collection<Feedback> = state.db.collection("feedbacks");
    collection.insert_one(&feedback).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitFeedbackResponse {
            message: "Feedback submitted successfully".to_string(),
            feedback: FeedbackResponse::from(feedback),
        }),
    ))
}

pub async fn get_feedback(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<FeedbackResponse>>> {
    let user_id = user
        .id
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

    let collection: Collection<Feedback> = state.db.collection("feedbacks");
    let cursor = collection
        .find(doc! { "userId": user_id })
        .sort(doc! { "createdAt": -1 })
        .limit(20)
        .await?;

    let feedbacks: Vec<Feedback> = cursor.try_collect().await?;

    Ok(Json(
        feedbacks.into_iter().map(FeedbackResponse::from).collect(),
    ))
}

pub async fn get_order_feedback(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(order_id): Path<String>,
) -> Result<Json<FeedbackResponse>> {
    let not_found = || AppError::NotFound("No feedback found for this order".to_string());

    let user_id = user
        .id
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;
    let order_id = ObjectId::parse_str(&order_id).map_err(|_| not_found())?;

    let collection: Collection<Feedback> = state.db.collection("feedbacks");
    let feedback = collection
        .find_one(doc! { "userId": user_id, "orderId": order_id })
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(FeedbackResponse::from(feedback)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(service_type: &str, total_amount: f64) -> Order {
        Order {
            id: Some(ObjectId::parse_str("65f2b4a1c9e77d0012ab34cd").unwrap()),
            user_id: ObjectId::new().to_hex(),
            name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            address: "12 MG Road".to_string(),
            pickup_date: Utc::now(),
            pickup_time: "10:00 AM".to_string(),
            service_type: service_type.to_string(),
            weight: 4.5,
            express: false,
            total_amount,
            payment_method: "wallet".to_string(),
            status: "scheduled".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn summary_names_dry_cleaning() {
        let summary = order_summary(&order("dry-clean", 600.0));
        assert_eq!(summary, "Order #ab34cd - Dry Cleaning - ₹600");
    }

    #[test]
    fn summary_defaults_to_wash_and_fold() {
        let summary = order_summary(&order("wash-fold", 450.0));
        assert_eq!(summary, "Order #ab34cd - Wash & Fold - ₹450");

        let summary = order_summary(&order("ironing", 450.0));
        assert!(summary.contains("Wash & Fold"));
    }

    #[test]
    fn summary_embeds_the_literal_amount() {
        let summary = order_summary(&order("dry-clean", 1234.5));
        assert!(summary.contains("₹1234.5"));
    }
}
