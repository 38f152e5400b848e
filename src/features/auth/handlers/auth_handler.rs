use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppForm, AppJson};
use crate::features::auth::dtos::{
    LoginRequestDto, MeResponseDto, RegisterRequestDto, TokenFormDto, TokenResponseDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::features::users::dtos::UserResponseDto;
use crate::shared::types::ApiResponse;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error or unknown role"),
        (status = 409, description = "Email or username already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(user),
            Some("User registered successfully".to_string()),
            None,
        )),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<TokenResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Incorrect email or password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<TokenResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let token = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(token), None, None)))
}

/// OAuth2 password grant
///
/// Answers with a bare token object rather than the response envelope so
/// standard OAuth2 clients (including Swagger UI) can consume it.
#[utoipa::path(
    post,
    path = "/api/auth/token",
    request_body(content = TokenFormDto, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = TokenResponseDto),
        (status = 400, description = "Malformed form"),
        (status = 401, description = "Incorrect email or password")
    ),
    tag = "auth"
)]
pub async fn token(
    State(service): State<Arc<AuthService>>,
    AppForm(form): AppForm<TokenFormDto>,
) -> Result<Json<TokenResponseDto>> {
    form.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let token = service.login(form.into()).await?;
    Ok(Json(token))
}

/// Get current authenticated user info
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<MeResponseDto>),
        (status = 401, description = "Unauthorized or account removed")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    State(service): State<Arc<AuthService>>,
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<MeResponseDto>>> {
    let me = service.current_user(&user).await?;
    Ok(Json(ApiResponse::success(Some(me), None, None)))
}
