//! Public account endpoints: registration, login, and the mocked OTP
//! password-reset flow.

use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::error::ApiError;
use crate::handlers::validators;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::otp::{OtpCheck, OtpStore};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

/// POST /api/auth/register - Create a user account and return a token
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<Value> {
    if payload.username.trim().is_empty() || payload.email.is_empty() || payload.password.is_empty()
    {
        return Err(ApiError::validation_error(
            "Username, email, and password required",
        ));
    }
    if !validators::is_valid_email(&payload.email) {
        return Err(ApiError::validation_error("Invalid email format"));
    }
    if !validators::is_valid_password(&payload.password) {
        return Err(ApiError::validation_error(
            "Password must be at least 6 characters",
        ));
    }
    if let Some(phone) = payload.phone.as_deref() {
        if !validators::is_valid_phone(phone) {
            return Err(ApiError::validation_error("Invalid phone number"));
        }
    }

    let pool = DatabaseManager::pool().await?;

    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 OR username = $2")
            .bind(&payload.email)
            .bind(&payload.username)
            .fetch_optional(&pool)
            .await?;

    if existing.is_some() {
        return Err(ApiError::conflict("Email or username already exists"));
    }

    let password_hash = auth::hash_password(&payload.password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal_server_error("Registration failed")
    })?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO users (username, email, password_hash, full_name, phone)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(&payload.username)
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(&payload.full_name)
    .bind(&payload.phone)
    .fetch_one(&pool)
    .await?;

    let claims = Claims::new(
        user_id,
        payload.username.clone(),
        payload.email.clone(),
        "user".to_string(),
    );
    let token = auth::generate_jwt(&claims).map_err(|e| {
        tracing::error!("JWT generation failed: {}", e);
        ApiError::internal_server_error("Registration failed")
    })?;

    tracing::info!(%user_id, username = %payload.username, "user registered");

    Ok(ApiResponse::created(json!({
        "token": token,
        "user_id": user_id,
    })))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login - Verify credentials and return a token.
/// Responds 401 without revealing whether the email or password was wrong.
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<Value> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation_error("Email and password required"));
    }

    let pool = DatabaseManager::pool().await?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&pool)
        .await?;

    let user = user.ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let valid = auth::verify_password(&payload.password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification failed: {}", e);
        ApiError::internal_server_error("Login failed")
    })?;
    if !valid {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let claims = Claims::new(
        user.id,
        user.username.clone(),
        user.email.clone(),
        user.role.clone(),
    );
    let token = auth::generate_jwt(&claims).map_err(|e| {
        tracing::error!("JWT generation failed: {}", e);
        ApiError::internal_server_error("Login failed")
    })?;

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": {
            "user_id": user.id,
            "username": user.username,
            "email": user.email,
            "full_name": user.full_name,
            "role": user.role,
        }
    })))
}

#[derive(Debug, Deserialize)]
pub struct RequestOtpRequest {
    pub phone: String,
}

/// POST /api/auth/request-otp - Issue a password-reset code.
/// SMS delivery is mocked: the code is logged and echoed in the response.
pub async fn request_otp(Json(payload): Json<RequestOtpRequest>) -> ApiResult<Value> {
    if payload.phone.is_empty() {
        return Err(ApiError::validation_error("Phone number is required"));
    }

    let pool = DatabaseManager::pool().await?;

    let user: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE phone = $1")
        .bind(&payload.phone)
        .fetch_optional(&pool)
        .await?;

    if user.is_none() {
        return Err(ApiError::not_found("Phone number not registered"));
    }

    let code = OtpStore::instance().issue(&payload.phone);
    tracing::info!(phone = %payload.phone, code = %code, "[MOCK SMS] password-reset OTP issued");

    Ok(ApiResponse::success(json!({
        "message": "OTP sent successfully",
        "mock_otp": code,
    })))
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub code: String,
}

/// POST /api/auth/verify-otp - Check a submitted code without consuming it
pub async fn verify_otp(Json(payload): Json<VerifyOtpRequest>) -> ApiResult<Value> {
    match OtpStore::instance().verify(&payload.phone, &payload.code) {
        OtpCheck::Valid => Ok(ApiResponse::success(json!({ "message": "OTP verified" }))),
        OtpCheck::WrongCode => Err(ApiError::bad_request("Invalid OTP")),
        OtpCheck::ExpiredOrMissing => Err(ApiError::bad_request("OTP expired or not requested")),
    }
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub phone: String,
    pub new_password: String,
}

/// POST /api/auth/reset-password - Set a new password after OTP verification.
/// Requires a live OTP entry for the phone and consumes it on success.
pub async fn reset_password(Json(payload): Json<ResetPasswordRequest>) -> ApiResult<Value> {
    if !validators::is_valid_password(&payload.new_password) {
        return Err(ApiError::validation_error(
            "Password must be at least 6 characters",
        ));
    }

    let store = OtpStore::instance();
    if !store.has_live_entry(&payload.phone) {
        return Err(ApiError::bad_request(
            "Session expired, please request OTP again",
        ));
    }

    let password_hash = auth::hash_password(&payload.new_password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal_server_error("Password reset failed")
    })?;

    let pool = DatabaseManager::pool().await?;
    let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE phone = $2")
        .bind(&password_hash)
        .bind(&payload.phone)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Phone number not registered"));
    }

    store.consume(&payload.phone);

    Ok(ApiResponse::success(json!({
        "message": "Password reset successfully"
    })))
}
