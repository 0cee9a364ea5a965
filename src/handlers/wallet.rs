use axum::{extract::State, response::Json, Extension};
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::transaction::{Transaction, TransactionResponse, CREDIT};
use crate::models::user::User;
use crate::state::AppState;

const MIN_TOP_UP: f64 = 100.0;
const MAX_TOP_UP: f64 = 10000.0;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMoneyRequest {
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMoneyResponse {
    pub message: String,
    pub new_balance: f64,
}

// Bounds are inclusive on both ends.
fn validate_amount(amount: Option<f64>) -> Result<f64> {
    match amount {
        Some(amount) if (MIN_TOP_UP..=MAX_TOP_UP).contains(&amount) => Ok(amount),
        _ => Err(AppError::Validation(
            "Amount must be between ₹100 and ₹10,000".to_string(),
        )),
    }
}

pub async fn add_money(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<AddMoneyRequest>,
) -> Result<Json<AddMoneyResponse>> {
    let amount = validate_amount(payload.amount)?;
    let user_id = user
        .id
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

    let users: Collection<User> = state.db.collection("users");
    let updated = users
        .find_one_and_update(
            doc! { "_id": user_id },
            doc! { "$inc": { "walletBalance": amount } },
        )
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

    let transaction = Transaction {
        id: Some(ObjectId::new()),
        user_id: user_id.to_hex(),
        kind: CREDIT.to_string(),
        amount,
        description: "Wallet Top-up".to_string(),
        payment_method: payload.payment_method,
        created_at: Utc::now(),
    };

    let transactions: Collection<Transaction> = state.db.collection("transactions");
    transactions.insert_one(&transaction).await?;

    tracing::info!("Wallet credited for user {}: ₹{}", user_id.to_hex(), amount);

    Ok(Json(AddMoneyResponse {
        message: "Money added successfully".to_string(),
        new_balance: updated.wallet_balance,
    }))
}

pub async fn get_transactions(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<TransactionResponse>>> {
    let user_id = user
        .id
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

    let collection: Collection<Transaction> = state.db.collection("transactions");
    let cursor = collection
        .find(doc! { "userId": user_id.to_hex() })
        .sort(doc! { "createdAt": -1 })
        .limit(10)
        .await?;

    let transactions: Vec<Transaction> = cursor.try_collect().await?;

    Ok(Json(
        transactions
            .into_iter()
            .map(TransactionResponse::from)
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_inside_bounds_are_accepted() {
        assert_eq!(validate_amount(Some(100.0)).unwrap(), 100.0);
        assert_eq!(validate_amount(Some(10000.0)).unwrap(), 10000.0);
        assert_eq!(validate_amount(Some(2500.0)).unwrap(), 2500.0);
    }

    #[test]
    fn amounts_outside_bounds_are_rejected() {
        assert!(validate_amount(Some(99.0)).is_err());
        assert!(validate_amount(Some(10001.0)).is_err());
    }

    #[test]
    fn missing_amount_is_rejected() {
        assert!(validate_amount(None).is_err());
    }
}
