use crate::{
    auth::{AuthResponse, AuthenticatedUserId, LoginRequest, RegisterRequest, UpdateProfileRequest},
    error::AppError,
    state::AppState,
};
use actix_web::{get, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Register a new user
///
/// Creates an account and logs it in: the response carries the user view and an
/// access token.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let session = state.auth.register(register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(AuthResponse::new("User registered successfully", session)))
}

/// Login user
///
/// Authenticates a user and returns an access token.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let session = state.auth.login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AuthResponse::new("Login successful", session)))
}

#[get("/profile")]
pub async fn get_profile(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let user = state.auth.get_profile(user_id.0).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "user": user })))
}

/// Update the current user's name and/or email.
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
    update_data: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, AppError> {
    let user = state
        .auth
        .update_profile(user_id.0, update_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "user": user
    })))
}

/// Confirms the bearer token is still good. The guard has already done the work;
/// this only returns the current user.
#[post("/verify-token")]
pub async fn verify_token(
    state: web::Data<AppState>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let user = state.auth.get_profile(user_id.0).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Token is valid",
        "user": user
    })))
}
