use axum::{extract::State, response::Json, Extension};
use bcrypt::{hash, DEFAULT_COST};
use mongodb::bson::doc;
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use serde::Serialize;

use crate::errors::{AppError, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::user::{UpdateProfileRequest, User, UserResponse};
use crate::state::AppState;

pub async fn get_profile(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Partial update: absent or empty fields are left unchanged. Email is
/// not editable here.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>> {
    let user_id = user
        .id
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

    let mut updates = doc! {};
    if let Some(name) = payload.name.filter(|s| !s.is_empty()) {
        updates.insert("name", name);
    }
    if let Some(phone) = payload.phone.filter(|s| !s.is_empty()) {
        updates.insert("phone", phone);
    }
    if let Some(address) = payload.address.filter(|s| !s.is_empty()) {
        updates.insert("address", address);
    }
    if let Some(password) = payload.password.filter(|s| !s.is_empty()) {
        updates.insert("password", hash(&password, DEFAULT_COST)?);
    }

    let collection: Collection<User> = state.db.collection("users");

    let updated = if updates.is_empty() {
        user
    } else {
        collection
            .find_one_and_update(doc! { "_id": user_id }, doc! { "$set": updates })
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| AppError::Auth("User not found".to_string()))?
    };

    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully".to_string(),
        user: UserResponse::from(updated),
    }))
}
