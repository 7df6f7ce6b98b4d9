mod common;

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode, header},
    routing::get,
};
use serde_json::{Value, json};
use todo_authorizer::{api::v1::extractors::AuthCtxExtractor, middleware::auth::access};
use tower::ServiceExt;

use common::*;

fn authorize_request(event: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/authorize")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(event.to_string()))
        .expect("request")
}

#[tokio::test]
async fn health_reports_ok() {
    let server = jwks_server().await;
    let app = test_app(&server, lazy_pool(&test_config(&server)));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(
        response.headers().get("x-content-type-options").map(|v| v.as_bytes()),
        Some(&b"nosniff"[..])
    );
    assert_eq!(json_body(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn authorize_endpoint_returns_allow_policy() {
    let server = jwks_server().await;
    mount_jwks(&server, vec![signing_jwk("abc", CERT_A_PEM)], 1).await;
    let app = test_app(&server, lazy_pool(&test_config(&server)));

    let token = sign(KEY_A_PEM, Some("abc"), &valid_claims("user123"));
    let response = app
        .oneshot(authorize_request(json!({
            "type": "TOKEN",
            "authorizationToken": bearer(&token),
            "methodArn": "arn:aws:execute-api:us-east-1:123456789012:api/dev/GET/todos"
        })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "principalId": "user123",
            "policyDocument": {
                "Version": "2012-10-17",
                "Statement": [{
                    "Action": "execute-api:Invoke",
                    "Effect": "Allow",
                    "Resource": "*"
                }]
            }
        })
    );
}

#[tokio::test]
async fn authorize_endpoint_denies_with_200() {
    let server = jwks_server().await;
    mount_jwks(&server, vec![signing_jwk("abc", CERT_A_PEM)], 0).await;
    let app = test_app(&server, lazy_pool(&test_config(&server)));

    let response = app
        .oneshot(authorize_request(json!({
            "type": "TOKEN",
            "authorizationToken": "Basic dXNlcjpwYXNz",
            "methodArn": "arn:aws:execute-api:us-east-1:123456789012:api/dev/GET/todos"
        })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["principalId"], "user");
    assert_eq!(body["policyDocument"]["Statement"][0]["Effect"], "Deny");
}

#[tokio::test]
async fn unreadable_authorizer_event_is_denied() {
    let server = jwks_server().await;
    let app = test_app(&server, lazy_pool(&test_config(&server)));

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/authorize")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["policyDocument"]["Statement"][0]["Effect"], "Deny");
}

#[tokio::test]
async fn todos_require_a_bearer_token() {
    let server = jwks_server().await;
    let app = test_app(&server, lazy_pool(&test_config(&server)));

    let response = app
        .oneshot(Request::get("/api/v1/todos").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn todos_reject_an_expired_token() {
    let server = jwks_server().await;
    mount_jwks(&server, vec![signing_jwk("abc", CERT_A_PEM)], 1).await;
    let app = test_app(&server, lazy_pool(&test_config(&server)));

    let expired = sign(
        KEY_A_PEM,
        Some("abc"),
        &json!({ "sub": "user123", "exp": now() - 60 }),
    );
    let request = Request::get("/api/v1/todos")
        .header(header::AUTHORIZATION, bearer(&expired))
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn attachment_upload_is_unavailable_without_a_bucket() {
    let server = jwks_server().await;
    mount_jwks(&server, vec![signing_jwk("abc", CERT_A_PEM)], 1).await;
    let app = test_app(&server, lazy_pool(&test_config(&server)));

    let token = sign(KEY_A_PEM, Some("abc"), &valid_claims("user123"));
    let request = Request::post(
        "/api/v1/todos/7f1f0a4e-9c3b-4c55-8a8e-1f6f0f4a2b10/attachment",
    )
    .header(header::AUTHORIZATION, bearer(&token))
    .body(Body::empty())
    .expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        json_body(response).await["error"]["code"],
        "SERVICE_UNAVAILABLE"
    );
}

#[tokio::test]
async fn patch_without_fields_is_rejected_before_the_database() {
    let server = jwks_server().await;
    mount_jwks(&server, vec![signing_jwk("abc", CERT_A_PEM)], 1).await;
    let app = test_app(&server, lazy_pool(&test_config(&server)));

    let token = sign(KEY_A_PEM, Some("abc"), &valid_claims("user123"));
    let request = Request::patch("/api/v1/todos/7f1f0a4e-9c3b-4c55-8a8e-1f6f0f4a2b10")
        .header(header::AUTHORIZATION, bearer(&token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "INVALID_TODO");
    assert_eq!(body["error"]["message"], "no fields to update");
}

#[tokio::test]
async fn protected_handlers_receive_the_token_principal_and_kid() {
    async fn whoami(AuthCtxExtractor(auth): AuthCtxExtractor) -> Json<Value> {
        Json(json!({ "userId": auth.user_id, "kid": auth.kid }))
    }

    let server = jwks_server().await;
    mount_jwks(&server, vec![signing_jwk("abc", CERT_A_PEM)], 1).await;
    let state = test_state(&server, lazy_pool(&test_config(&server)));
    let app: Router = access::apply(Router::new().route("/whoami", get(whoami)), state.clone())
        .with_state(state);

    let token = sign(KEY_A_PEM, Some("abc"), &valid_claims("auth0|user123"));
    let request = Request::get("/whoami")
        .header(header::AUTHORIZATION, bearer(&token))
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "userId": "auth0|user123", "kid": "abc" })
    );
}
