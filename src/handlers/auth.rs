use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;

use crate::errors::{AppError, Result};
use crate::models::user::{
    AuthResponse, Claims, LoginRequest, SignupRequest, User, UserResponse,
    STARTING_WALLET_BALANCE,
};
use crate::state::AppState;

const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

pub fn issue_token(user_id: &ObjectId, secret: &str) -> Result<String> {
    let claims = Claims {
        user_id: user_id.to_hex(),
        exp: (Utc::now().timestamp() + TOKEN_TTL_SECS) as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

struct SignupFields {
    name: String,
    email: String,
    phone: String,
    address: String,
    password: String,
}

fn validate_signup(payload: SignupRequest) -> Result<SignupFields> {
    match (
        payload.name.filter(|s| !s.is_empty()),
        payload.email.filter(|s| !s.is_empty()),
        payload.phone.filter(|s| !s.is_empty()),
        payload.address.filter(|s| !s.is_empty()),
        payload.password.filter(|s| !s.is_empty()),
    ) {
        (Some(name), Some(email), Some(phone), Some(address), Some(password)) => {
            Ok(SignupFields {
                name,
                email,
                phone,
                address,
                password,
            })
        }
        _ => Err(AppError::Validation("All fields are required".to_string())),
    }
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let fields = validate_signup(payload)?;

    let collection: Collection<User> = state.db.collection("users");

    let existing = collection.find_one(doc! { "email": &fields.email }).await?;
    if existing.is_some() {
        return Err(AppError::Validation("Email already registered".to_string()));
    }

    let id = ObjectId::new();
    let user = User {
        id: Some(id),
        name: fields.name,
        email: fields.email,
        phone: fields.phone,
        address: fields.address,
        password: hash(&fields.password, DEFAULT_COST)?,
        wallet_balance: STARTING_WALLET_BALANCE,
        created_at: Utc::now(),
    };

    collection.insert_one(&user).await?;
    tracing::info!("New user registered: {}", id.to_hex());

    let token = issue_token(&id, &state.jwt_secret)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            token,
            user: UserResponse::from(user),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (email, password) = match (
        payload.email.filter(|s| !s.is_empty()),
        payload.password.filter(|s| !s.is_empty()),
    ) {
        (Some(email), Some(password)) => (email, password),
        _ => {
            return Err(AppError::Validation(
                "Email and password required".to_string(),
            ))
        }
    };

    let collection: Collection<User> = state.db.collection("users");

    // Unknown email and wrong password produce the same message.
    let user = collection
        .find_one(doc! { "email": &email })
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify(&password, &user.password)? {
        return Err(AppError::InvalidCredentials);
    }

    let user_id = user.id.ok_or(AppError::InvalidCredentials)?;
    let token = issue_token(&user_id, &state.jwt_secret)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: UserResponse::from(user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    #[test]
    fn issued_token_round_trips() {
        let user_id = ObjectId::new();
        let token = issue_token(&user_id, "test-secret").unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        assert_eq!(decoded.claims.user_id, user_id.to_hex());
    }

    #[test]
    fn token_expires_in_seven_days() {
        let token = issue_token(&ObjectId::new(), "test-secret").unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();

        let expected = Utc::now().timestamp() + TOKEN_TTL_SECS;
        let delta = decoded.claims.exp as i64 - expected;
        assert!(delta.abs() <= 5, "exp off by {} seconds", delta);
    }

    #[test]
    fn token_fails_with_wrong_secret() {
        let token = issue_token(&ObjectId::new(), "test-secret").unwrap();

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::new(Algorithm::HS256),
        );

        assert!(result.is_err());
    }

    #[test]
    fn signup_requires_every_field() {
        let payload = SignupRequest {
            name: Some("Asha".to_string()),
            email: Some("asha@example.com".to_string()),
            phone: Some("9876543210".to_string()),
            address: None,
            password: Some("hunter2".to_string()),
        };
        assert!(validate_signup(payload).is_err());
    }

    #[test]
    fn signup_rejects_empty_strings() {
        let payload = SignupRequest {
            name: Some("Asha".to_string()),
            email: Some("".to_string()),
            phone: Some("9876543210".to_string()),
            address: Some("12 MG Road".to_string()),
            password: Some("hunter2".to_string()),
        };
        assert!(validate_signup(payload).is_err());
    }

    #[test]
    fn signup_accepts_complete_payload() {
        let payload = SignupRequest {
            name: Some("Asha".to_string()),
            email: Some("asha@example.com".to_string()),
            phone: Some("9876543210".to_string()),
            address: Some("12 MG Road".to_string()),
            password: Some("hunter2".to_string()),
        };
        let fields = validate_signup(payload).unwrap();
        assert_eq!(fields.email, "asha@example.com");
    }
}
