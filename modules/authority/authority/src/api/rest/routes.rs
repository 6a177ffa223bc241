//! Route table.
//!
//! `logout` and `whoami` sit behind [`bearer_operator`], which turns the
//! bearer access token into operator metadata before the handler runs.
//! The other routes are public.

use std::sync::Arc;

use authority_sdk::AuthenticationApi;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tessera_auth::{TokenValidator, axum_ext::bearer_operator};

use super::handlers;

pub fn router(svc: Arc<dyn AuthenticationApi>, validator: Arc<dyn TokenValidator>) -> Router {
    let protected = Router::new()
        .route("/auth/v1/logout", post(handlers::logout))
        .route("/auth/v1/whoami", get(handlers::whoami))
        .route_layer(from_fn_with_state(validator, bearer_operator));

    Router::new()
        .route("/auth/v1/login", post(handlers::login))
        .route("/auth/v1/refresh", post(handlers::refresh))
        .route("/auth/v1/validate", post(handlers::validate))
        .merge(protected)
        .with_state(svc)
}
