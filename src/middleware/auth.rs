use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;

use crate::errors::{AppError, Result};
use crate::models::user::{Claims, User};
use crate::state::AppState;

/// The authenticated caller, resolved from the bearer token and made
/// available to handlers through request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Auth("No token provided".to_string()))?;

    let decoding_key = DecodingKey::from_secret(state.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256))
        .map_err(|_| AppError::Auth("Invalid token".to_string()))?;

    let user_id = ObjectId::parse_str(&token_data.claims.user_id)
        .map_err(|_| AppError::Auth("Invalid token".to_string()))?;

    let collection: Collection<User> = state.db.collection("users");
    let user = collection
        .find_one(doc! { "_id": user_id })
        .await?
        .ok_or_else(|| AppError::Auth("User not found".to_string()))?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
