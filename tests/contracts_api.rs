//! # HTTP tests
//!
//! Drives the full router (access gate, handlers, response layers) with
//! `tower::ServiceExt::oneshot`. Most tests use the development echo decoder so
//! that the bearer token is just the user's email; the JWT tests sign HS256 tokens.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

use contracts_api::api::extractors::AuthSessionExtractor;
use contracts_api::middleware::auth::policy::AccessPolicy;
use contracts_api::services::auth::{
    AuthenticationManager, EchoEmailDecoder, JwtAuthenticationConverter, JwtDecoder,
    StaticUserDirectory, TokenDecoder, UserDirectory, UserRecord, authority::authorities,
    decoder::jwt::JwtExpectations, directory::DirectoryError,
};
use contracts_api::state::AppState;

struct BrokenDirectory;

#[async_trait]
impl UserDirectory for BrokenDirectory {
    async fn find_by_subject(&self, _subject: &str) -> Result<Option<UserRecord>, DirectoryError> {
        Err(DirectoryError::Backend("directory offline".into()))
    }
}

fn manager_with(
    decoder: Arc<dyn TokenDecoder>,
    directory: Arc<dyn UserDirectory>,
) -> Arc<AuthenticationManager> {
    let mut converter = JwtAuthenticationConverter::new();
    converter.set_principal_claim_name("email").unwrap();
    Arc::new(AuthenticationManager::new(decoder, converter, directory))
}

fn manager(directory: Arc<dyn UserDirectory>) -> Arc<AuthenticationManager> {
    manager_with(Arc::new(EchoEmailDecoder::default()), directory)
}

fn seeded_state() -> AppState {
    AppState::new(manager(Arc::new(StaticUserDirectory::seeded())))
}

fn test_app() -> Router {
    contracts_api::app(seeded_state())
}

fn get_request(uri: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn assert_valid_contracts(body: &Value) {
    let contracts = body.as_array().expect("array body");
    assert!(contracts.len() < 20);

    for (i, contract) in contracts.iter().enumerate() {
        assert_eq!(contract["id"], i);

        let number = contract["contractNumber"].as_str().unwrap();
        assert!((1..=20).contains(&number.len()), "{number}");
        assert!(number.chars().all(|c| c.is_ascii_alphabetic()));

        let country = contract["country"].as_str().unwrap();
        assert!((2..=3).contains(&country.len()), "{country}");
        assert!(country.chars().all(|c| c.is_ascii_alphabetic()));
    }
}

// -- GET /contracts -----------------------------------------------------------

#[tokio::test]
async fn known_user_gets_contracts() {
    let response = test_app()
        .oneshot(get_request("/contracts", Some("Bearer user@company.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_valid_contracts(&body_json(response).await);
}

#[tokio::test]
async fn admin_gets_contracts_and_user_id_is_ignored() {
    let response = test_app()
        .oneshot(get_request(
            "/contracts?userId=somebody",
            Some("Bearer admin@company.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_valid_contracts(&body_json(response).await);
}

#[tokio::test]
async fn unknown_user_is_unauthorized() {
    let response = test_app()
        .oneshot(get_request("/contracts", Some("Bearer someoneelse@other.org")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn missing_authorization_is_unauthorized() {
    let response = test_app()
        .oneshot(get_request("/contracts", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let response = test_app()
        .oneshot(get_request("/contracts", Some("Basic dXNlcjpwYXNz")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn directory_failure_is_internal_error() {
    let app = contracts_api::app(AppState::new(manager(Arc::new(BrokenDirectory))));

    let response = app
        .oneshot(get_request("/contracts", Some("Bearer user@company.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INTERNAL");
}

// -- Authority rules ----------------------------------------------------------

fn admin_only_app() -> Router {
    let policy = AccessPolicy::default()
        .has_any_authority("/contracts", authorities(["ROLE_ADMIN"]))
        .unwrap();
    contracts_api::app(seeded_state().with_access_policy(policy))
}

#[tokio::test]
async fn authenticated_user_without_authority_is_forbidden() {
    let response = admin_only_app()
        .oneshot(get_request("/contracts", Some("Bearer user@company.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let challenge = response.headers()[header::WWW_AUTHENTICATE]
        .to_str()
        .unwrap()
        .to_string();
    assert!(challenge.contains("insufficient_scope"));
}

#[tokio::test]
async fn authority_rule_admits_matching_role() {
    let response = admin_only_app()
        .oneshot(get_request("/contracts", Some("Bearer admin@company.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn session_carries_directory_authorities() {
    async fn whoami(AuthSessionExtractor(session): AuthSessionExtractor) -> Json<Value> {
        Json(json!({
            "subject": session.subject,
            "authorities": session
                .authorities
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
        }))
    }

    let state = seeded_state();
    let routes: Router<AppState> = Router::new().route("/whoami", get(whoami));
    let app: Router =
        contracts_api::middleware::auth::access::apply(routes, state.clone()).with_state(state);

    let response = app
        .oneshot(get_request("/whoami", Some("Bearer admin")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["subject"], "admin@company.com");
    assert_eq!(body["authorities"], json!(["ROLE_ADMIN"]));
}

// -- Public paths and response layers -----------------------------------------

#[tokio::test]
async fn public_paths_skip_authentication() {
    for uri in ["/error", "/actuator/health", "/actuator/info"] {
        let response = test_app().oneshot(get_request(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }

    let response = test_app()
        .oneshot(get_request("/actuator/health", None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["status"], "UP");
}

#[tokio::test]
async fn public_paths_ignore_bad_credentials() {
    let response = test_app()
        .oneshot(get_request("/error", Some("Bearer someoneelse@other.org")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_security_headers_and_request_id() {
    let response = test_app()
        .oneshot(get_request("/contracts", None))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn incoming_request_id_is_propagated() {
    let request = Request::builder()
        .uri("/actuator/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
}

// -- Signed JWTs --------------------------------------------------------------

const JWT_SECRET: &[u8] = b"contracts-api-http-secret";

fn jwt_app() -> Router {
    let decoder = JwtDecoder::from_hs256_secret(JWT_SECRET, &JwtExpectations::default()).unwrap();
    let manager = manager_with(Arc::new(decoder), Arc::new(StaticUserDirectory::seeded()));
    contracts_api::app(AppState::new(manager))
}

fn sign(email: &str, expires_in: i64) -> String {
    let now = Utc::now().timestamp();
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &json!({ "email": email, "iat": now, "exp": now + expires_in }),
        &EncodingKey::from_secret(JWT_SECRET),
    )
    .unwrap()
}

#[tokio::test]
async fn signed_jwt_for_known_user_gets_contracts() {
    let token = sign("admin@company.com", 60);
    let response = jwt_app()
        .oneshot(get_request("/contracts", Some(&*format!("Bearer {token}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_valid_contracts(&body_json(response).await);
}

#[tokio::test]
async fn expired_jwt_is_unauthorized() {
    let token = sign("admin@company.com", -3600);
    let response = jwt_app()
        .oneshot(get_request("/contracts", Some(&*format!("Bearer {token}"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    assert_eq!(body_json(response).await["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn unsigned_token_is_unauthorized_under_jwt_decoder() {
    let response = jwt_app()
        .oneshot(get_request("/contracts", Some("Bearer admin@company.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// -- Request errors -----------------------------------------------------------

#[tokio::test]
async fn unknown_path_is_json_not_found() {
    let response = test_app()
        .oneshot(get_request("/nope", Some("Bearer user@company.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unknown_path_still_requires_authentication() {
    let response = test_app()
        .oneshot(get_request("/nope", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unsupported_method_is_json_method_not_allowed() {
    let request = Request::builder()
        .method("POST")
        .uri("/contracts")
        .header(header::AUTHORIZATION, "Bearer user@company.com")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body_json(response).await["error"]["code"],
        "METHOD_NOT_ALLOWED"
    );
}

#[tokio::test]
async fn malformed_query_is_json_bad_request() {
    let response = test_app()
        .oneshot(get_request(
            "/contracts?userId=a&userId=b",
            Some("Bearer user@company.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"].as_str().unwrap().contains("userId"));
}

#[tokio::test]
async fn request_timeout_is_json() {
    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "late"
    }

    let app = contracts_api::middleware::http::apply(
        Router::new().route("/slow", get(slow)),
        Duration::from_millis(20),
    );

    let response = app.oneshot(get_request("/slow", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(
        body_json(response).await["error"]["code"],
        "REQUEST_TIMEOUT"
    );
}
