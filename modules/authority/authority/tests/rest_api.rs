#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end behaviour of the REST routes with a real Axum Router.

mod support;

use authority::infra::storage::Assignment;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tessera_auth::TokenKind;
use tessera_security::DataScope;
use tower::ServiceExt;

async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_bearer(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn password_body(username: &str) -> Value {
    json!({
        "grant_type": "password",
        "username": username,
        "password": support::PASSWORD,
    })
}

#[tokio::test]
async fn granting_super_admin_unlocks_login() {
    let db = support::inmem_db().await;
    let module = support::module(&db);
    let router = module.router();
    let user_id = support::seed_member(&module, 0, "root").await;

    let (status, body) = call(&router, post_json("/auth/v1/login", &password_body("root"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["reason"], json!("INSUFFICIENT_AUTHORITY"));
    assert_eq!(body["error"], json!("insufficient authority"));

    let role = support::seed_role(&db, 0, "super_admin", "SELF", "SYSTEM").await;
    module
        .memberships()
        .assign_roles(user_id, 0, &[role], &Assignment::default())
        .await
        .unwrap();

    let (status, body) = call(&router, post_json("/auth/v1/login", &password_body("root"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], json!("bearer"));

    let access = body["access_token"].as_str().unwrap();
    let claims = support::jwt().parse(access, TokenKind::Access).unwrap();
    assert!(claims.is_platform_admin);
    assert_eq!(claims.data_scope, DataScope::All);
}

#[tokio::test]
async fn session_lifecycle_over_http() {
    let db = support::inmem_db().await;
    let module = support::module(&db);
    let router = module.router();
    let role = support::seed_role(&db, 7, "tenant_admin", "UNIT_AND_CHILD", "TENANT").await;
    let user_id = support::seed_member_with_roles(&module, 7, "carol", &[role]).await;

    let (status, tokens) = call(&router, post_json("/auth/v1/login", &password_body("carol"))).await;
    assert_eq!(status, StatusCode::OK);
    let access = tokens["access_token"].as_str().unwrap().to_owned();
    let refresh = tokens["refresh_token"].as_str().unwrap().to_owned();

    let (status, me) = call(&router, with_bearer("GET", "/auth/v1/whoami", &access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me, json!({"user_id": user_id, "username": "carol"}));

    let (status, checked) = call(
        &router,
        post_json("/auth/v1/validate", &json!({"token": &access})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(checked["is_valid"], json!(true));
    assert_eq!(checked["claims"]["tenant_id"], json!(7));
    assert_eq!(checked["claims"]["data_scope"], json!("UNIT_AND_CHILD"));
    assert_eq!(checked["claims"]["is_tenant_admin"], json!(true));

    let (status, rotated) = call(
        &router,
        post_json(
            "/auth/v1/refresh",
            &json!({"grant_type": "refresh_token", "refresh_token": &refresh}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_access = rotated["access_token"].as_str().unwrap().to_owned();
    let new_refresh = rotated["refresh_token"].as_str().unwrap().to_owned();

    let (status, body) = call(
        &router,
        post_json(
            "/auth/v1/refresh",
            &json!({"grant_type": "refresh_token", "refresh_token": &refresh}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["reason"], json!("INCORRECT_REFRESH_TOKEN"));

    let (status, _) = call(&router, with_bearer("POST", "/auth/v1/logout", &new_access)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(
        &router,
        post_json(
            "/auth/v1/refresh",
            &json!({"grant_type": "refresh_token", "refresh_token": &new_refresh}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["reason"], json!("INCORRECT_REFRESH_TOKEN"));
}

#[tokio::test]
async fn grant_type_errors() {
    let db = support::inmem_db().await;
    let router = support::module(&db).router();

    for grant in ["client_credentials", "implicit"] {
        let (status, body) = call(
            &router,
            post_json("/auth/v1/login", &json!({"grant_type": grant})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{grant}");
        assert_eq!(body["reason"], json!("INVALID_GRANT_TYPE"));
    }

    let (status, body) = call(&router, post_json("/auth/v1/refresh", &password_body("root"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], json!("INVALID_GRANT_TYPE"));
}

#[tokio::test]
async fn protected_routes_need_an_access_token() {
    let db = support::inmem_db().await;
    let router = support::module(&db).router();

    let (status, body) = call(
        &router,
        Request::builder()
            .uri("/auth/v1/whoami")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["reason"], json!("UNAUTHORIZED"));

    let (status, _) = call(&router, with_bearer("POST", "/auth/v1/logout", "not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let db = support::inmem_db().await;
    let module = support::module(&db);
    let router = module.router();
    support::seed_member(&module, 3, "bob").await;

    let (status, body) = call(
        &router,
        post_json(
            "/auth/v1/login",
            &json!({"grant_type": "password", "username": "bob", "password": "nope"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["reason"], json!("INVALID_CREDENTIALS"));
}
