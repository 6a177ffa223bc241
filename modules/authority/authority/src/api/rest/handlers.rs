use std::sync::Arc;

use authority_sdk::{
    AuthenticationApi, LoginRequest, TokenResponse, ValidateTokenResponse, WhoAmIResponse,
};
use axum::{Json, extract::State, http::StatusCode};
use tessera_auth::axum_ext::Operator;
use tracing::info;

use super::dto::{LoginBody, ValidateBody};
use super::error::ApiError;

pub(super) type ApiResult<T> = Result<T, ApiError>;
pub(super) type ApiState = Arc<dyn AuthenticationApi>;

pub(super) async fn login(
    State(svc): State<ApiState>,
    Json(body): Json<LoginBody>,
) -> ApiResult<Json<TokenResponse>> {
    let req = LoginRequest::try_from(body)?;
    info!(grant_type = ?req.grant_type, username = ?req.username, "login requested");
    Ok(Json(svc.login(req).await?))
}

pub(super) async fn refresh(
    State(svc): State<ApiState>,
    Json(body): Json<LoginBody>,
) -> ApiResult<Json<TokenResponse>> {
    let req = LoginRequest::try_from(body)?;
    Ok(Json(svc.refresh_token(req).await?))
}

pub(super) async fn logout(
    State(svc): State<ApiState>,
    Operator(op): Operator,
) -> ApiResult<StatusCode> {
    svc.logout(&op).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn validate(
    State(svc): State<ApiState>,
    Json(body): Json<ValidateBody>,
) -> ApiResult<Json<ValidateTokenResponse>> {
    Ok(Json(svc.validate_token(&body.token).await?))
}

pub(super) async fn whoami(
    State(svc): State<ApiState>,
    Operator(op): Operator,
) -> ApiResult<Json<WhoAmIResponse>> {
    Ok(Json(svc.who_am_i(&op).await?))
}
