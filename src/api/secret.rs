//! Encrypt/decrypt endpoints for password-protected URLs.
//!
//! - `GET  /secret/encrypt` - Encrypt form; with `url` and `password` query
//!   parameters it encrypts right away and redirects to the decrypt page
//! - `POST /secret/encrypt` - JSON API: `{url, password}` -> `{url: <decrypt link>}`
//! - `GET  /secret/encrypt/view` - Same as `GET /secret/encrypt`
//! - `POST /secret/encrypt/view` - Encrypt form submission
//! - `GET  /secret/decrypt` - Decrypt form, `secret` taken from the query
//! - `POST /secret/decrypt` - Decrypt form submission

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Form, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use url::Url;

use crate::secrets;
use crate::util::non_blank;

use super::pages::{self, DecryptView};
use super::routes::AppState;
use super::types::{
    DecryptForm, DecryptQuery, EncryptParams, EncryptRequest, EncryptResponse, ErrorResponse,
};

/// Path of the decrypt page, relative to the site origin.
pub const DECRYPT_PATH: &str = "/secret/decrypt";

const INVALID_JSON: &str = "Invalid JSON payload. Expected url and password fields.";
const ENCRYPT_FAILED: &str = "Failed to encrypt URL with the provided password.";
const BOTH_REQUIRED: &str = "Both URL and password are required.";
const ENCRYPT_RETRY: &str = "Failed to encrypt. Please try again.";
const SECRET_REQUIRED: &str = "A secret is required before decryption can begin.";
const PASSWORD_REQUIRED: &str = "Password is required to decrypt the secret.";
const DECRYPT_FAILED: &str = "Incorrect password or invalid secret.";

/// Create the secret routes (nested under `/secret`).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/encrypt", get(encrypt_page).post(encrypt_json))
        .route("/encrypt/view", get(encrypt_view).post(encrypt_submit))
        .route("/decrypt", get(decrypt_page).post(decrypt_submit))
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

/// Build the "Missing required field(s): ..." message.
fn missing_fields_message(url_missing: bool, password_missing: bool) -> String {
    let missing: Vec<&str> = [("url", url_missing), ("password", password_missing)]
        .into_iter()
        .filter_map(|(name, is_missing)| is_missing.then_some(name))
        .collect();
    let plural = if missing.len() > 1 { "s" } else { "" };
    format!("Missing required field{}: {}.", plural, missing.join(" and "))
}

/// Origin that generated links should point at.
///
/// Prefers the configured `PUBLIC_BASE_URL`; otherwise uses the request's
/// `Host` header and `X-Forwarded-Proto`, falling back to the bind address
/// when the header is missing or does not form a valid origin.
fn request_origin(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base) = &state.config.public_base_url {
        return base.clone();
    }

    let fallback = || format!("http://{}", state.config.bind_addr());
    let Some(host) = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())
    else {
        return fallback();
    };
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|p| matches!(*p, "http" | "https"))
        .unwrap_or("http");

    let origin = format!("{}://{}", scheme, host);
    match Url::parse(&origin) {
        Ok(_) => origin,
        Err(e) => {
            tracing::warn!("Ignoring unusable Host header: {}", e);
            fallback()
        }
    }
}

/// Absolute decrypt link carrying `secret` as its only query parameter.
pub fn build_decrypt_url(origin: &str, secret: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(origin)?.join(DECRYPT_PATH)?;
    url.set_query(None);
    url.query_pairs_mut().append_pair("secret", secret);
    Ok(url.to_string())
}

/// Relative decrypt link used for in-site redirects.
fn decrypt_redirect(secret: &str) -> Redirect {
    Redirect::to(&format!(
        "{}?secret={}",
        DECRYPT_PATH,
        urlencoding::encode(secret)
    ))
}

/// POST /secret/encrypt
/// Encrypt a URL and return the decrypt link as JSON.
async fn encrypt_json(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<EncryptRequest>, JsonRejection>,
) -> Result<Json<EncryptResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| {
        tracing::error!("Failed to parse JSON body for POST /secret/encrypt: {}", e);
        api_error(StatusCode::BAD_REQUEST, INVALID_JSON)
    })?;

    let (url, password) = match (body.url(), body.password()) {
        (Some(url), Some(password)) => (url, password),
        (url, password) => {
            let message = missing_fields_message(url.is_none(), password.is_none());
            return Err(api_error(StatusCode::BAD_REQUEST, message));
        }
    };

    let secret = secrets::seal(url, password).await.map_err(|e| {
        tracing::error!("Failed to encrypt URL via POST /secret/encrypt: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, ENCRYPT_FAILED)
    })?;

    let origin = request_origin(&state, &headers);
    let decrypt_url = build_decrypt_url(&origin, &secret).map_err(|e| {
        tracing::error!("Failed to build decrypt URL from origin {}: {}", origin, e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, ENCRYPT_FAILED)
    })?;

    tracing::debug!("Issued secret ({} chars)", secret.len());
    Ok(Json(EncryptResponse { url: decrypt_url }))
}

/// Encrypt and redirect to the decrypt page, or re-render the form on failure.
///
/// With `require_both` unset (query-string entry points) a missing field just
/// shows the form; a field that is present but blank is still an error.
async fn encrypt_and_redirect(params: EncryptParams, require_both: bool) -> Response {
    let blank_supplied = [&params.url, &params.password]
        .into_iter()
        .any(|value| value.as_deref().is_some_and(|v| v.trim().is_empty()));
    let url = non_blank(params.url.as_deref());
    let password = non_blank(params.password.as_deref());

    let (url, password) = match (url, password) {
        (Some(url), Some(password)) => (url, password),
        (url, _) => {
            let prefill = url.unwrap_or_default();
            return if require_both || blank_supplied {
                pages::encrypt_form(&prefill, Some(BOTH_REQUIRED))
                    .with_status(StatusCode::BAD_REQUEST)
                    .into_response()
            } else {
                pages::encrypt_form(&prefill, None).into_response()
            };
        }
    };

    match secrets::seal(url.clone(), password).await {
        Ok(secret) => decrypt_redirect(&secret).into_response(),
        Err(e) => {
            tracing::error!("Failed to encrypt URL: {}", e);
            pages::encrypt_form(&url, Some(ENCRYPT_RETRY))
                .with_status(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response()
        }
    }
}

/// GET /secret/encrypt
/// Show the encrypt form, or encrypt straight away when both query params are given.
async fn encrypt_page(Query(params): Query<EncryptParams>) -> Response {
    encrypt_and_redirect(params, false).await
}

/// GET /secret/encrypt/view
async fn encrypt_view(Query(params): Query<EncryptParams>) -> Response {
    encrypt_and_redirect(params, false).await
}

/// POST /secret/encrypt/view
async fn encrypt_submit(Form(params): Form<EncryptParams>) -> Response {
    encrypt_and_redirect(params, true).await
}

/// GET /secret/decrypt
async fn decrypt_page(Query(query): Query<DecryptQuery>) -> Response {
    let secret = query.secret.unwrap_or_default();
    pages::decrypt_form(DecryptView {
        secret: secret.trim(),
        ..Default::default()
    })
    .into_response()
}

/// POST /secret/decrypt
/// Decrypt the posted secret and show the recovered URL as a link.
async fn decrypt_submit(Form(form): Form<DecryptForm>) -> Response {
    let secret = non_blank(form.secret.as_deref());
    let password = non_blank(form.password.as_deref());

    let failure = |secret: &str, message: &str| {
        pages::decrypt_form(DecryptView {
            secret,
            error: Some(message),
            resolved_url: None,
        })
        .with_status(StatusCode::BAD_REQUEST)
        .into_response()
    };

    let Some(secret) = secret else {
        return failure("", SECRET_REQUIRED);
    };
    let Some(password) = password else {
        return failure(secret.as_str(), PASSWORD_REQUIRED);
    };

    match secrets::open(secret.clone(), password).await {
        Ok(url) => pages::decrypt_form(DecryptView {
            secret: &secret,
            error: None,
            resolved_url: Some(&url),
        })
        .into_response(),
        Err(e) if !e.is_user_error() => {
            tracing::error!("Failed to decrypt secret: {}", e);
            pages::decrypt_form(DecryptView {
                secret: &secret,
                error: Some(DECRYPT_FAILED),
                resolved_url: None,
            })
            .with_status(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to decrypt secret: {:?}", e);
            failure(secret.as_str(), DECRYPT_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::router;
    use crate::config::Config;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(AppState {
            config: Config::new(),
        }))
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/secret/encrypt")
            .header("host", "example.test")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_form(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn missing_fields_message_variants() {
        assert_eq!(missing_fields_message(true, false), "Missing required field: url.");
        assert_eq!(
            missing_fields_message(false, true),
            "Missing required field: password."
        );
        assert_eq!(
            missing_fields_message(true, true),
            "Missing required fields: url and password."
        );
    }

    #[test]
    fn build_decrypt_url_replaces_path_and_query() {
        let url = build_decrypt_url("https://share.example.com", "abc-_123").unwrap();
        assert_eq!(url, "https://share.example.com/secret/decrypt?secret=abc-_123");
    }

    #[tokio::test]
    async fn encrypt_json_returns_decrypt_link() {
        let response = app()
            .oneshot(post_json(
                r#"{"url":"https://example.com/private","password":"super-secret"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let payload: EncryptResponse = serde_json::from_str(&body_string(response).await).unwrap();
        let parsed = Url::parse(&payload.url).unwrap();
        assert_eq!(parsed.host_str(), Some("example.test"));
        assert_eq!(parsed.path(), "/secret/decrypt");

        let secret = parsed
            .query_pairs()
            .find(|(k, _)| k == "secret")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert!(!secret.is_empty());
        assert_eq!(
            secrets::decrypt(&secret, "super-secret").unwrap(),
            "https://example.com/private"
        );
    }

    #[tokio::test]
    async fn encrypt_json_uses_public_base_url() {
        let mut config = Config::new();
        config.public_base_url = Some("https://share.example.com".to_string());
        let app = router(Arc::new(AppState { config }));

        let response = app
            .oneshot(post_json(r#"{"url":"https://example.com","password":"pw"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let payload: EncryptResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(payload
            .url
            .starts_with("https://share.example.com/secret/decrypt?secret="));
    }

    #[tokio::test]
    async fn encrypt_json_falls_back_to_bind_address_for_bad_host() {
        let request = Request::builder()
            .method("POST")
            .uri("/secret/encrypt")
            .header("host", "bad host")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"url":"https://example.com","password":"pw"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let payload: EncryptResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(payload
            .url
            .starts_with("http://127.0.0.1:3000/secret/decrypt?secret="));
    }

    #[tokio::test]
    async fn encrypt_json_requires_url() {
        let response = app().oneshot(post_json(r#"{"password":"pw"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(payload.error.to_lowercase().contains("url"));
    }

    #[tokio::test]
    async fn encrypt_json_requires_password() {
        let response = app()
            .oneshot(post_json(r#"{"url":"https://example.com","password":"   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(payload.error, "Missing required field: password.");
    }

    #[tokio::test]
    async fn encrypt_json_treats_non_strings_as_missing() {
        let response = app()
            .oneshot(post_json(r#"{"url":42,"password":true}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(payload.error, "Missing required fields: url and password.");
    }

    #[tokio::test]
    async fn encrypt_json_rejects_invalid_json() {
        let response = app().oneshot(post_json("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload: ErrorResponse = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(payload.error, INVALID_JSON);
    }

    #[tokio::test]
    async fn encrypt_query_redirects_to_decrypt_page() {
        for path in ["/secret/encrypt", "/secret/encrypt/view"] {
            let request = Request::builder()
                .uri(format!(
                    "{}?url=https%3A%2F%2Fexample.com%2Fprivate&password=super-secret",
                    path
                ))
                .body(Body::empty())
                .unwrap();
            let response = app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");

            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap()
                .to_string();
            let secret = location.strip_prefix("/secret/decrypt?secret=").unwrap();
            assert_eq!(
                secrets::decrypt(secret, "super-secret").unwrap(),
                "https://example.com/private"
            );
        }
    }

    #[tokio::test]
    async fn encrypt_query_with_blank_field_shows_error() {
        for uri in [
            "/secret/encrypt/view?url=https%3A%2F%2Fexample.com&password=%20%20",
            "/secret/encrypt?url=&password=pw",
        ] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = app().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert!(body_string(response).await.contains(BOTH_REQUIRED));
        }
    }

    #[tokio::test]
    async fn encrypt_view_without_params_renders_bare_form() {
        let request = Request::builder()
            .uri("/secret/encrypt/view")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(r#"action="/secret/encrypt/view""#));
        assert!(!html.contains(BOTH_REQUIRED));
    }

    #[tokio::test]
    async fn encrypt_page_without_params_renders_form() {
        let request = Request::builder()
            .uri("/secret/encrypt?url=https%3A%2F%2Fexample.com")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(r#"value="https://example.com""#));
        assert!(!html.contains(BOTH_REQUIRED));
    }

    #[tokio::test]
    async fn encrypt_submit_requires_both_fields() {
        let response = app()
            .oneshot(post_form("/secret/encrypt/view", "url=https%3A%2F%2Fexample.com".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains(BOTH_REQUIRED));
    }

    #[tokio::test]
    async fn decrypt_submit_reveals_url() {
        let secret = secrets::encrypt("https://example.com/private", "super-secret").unwrap();
        let body = format!("secret={}&password=super-secret", secret);

        let response = app().oneshot(post_form("/secret/decrypt", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(r#"href="https://example.com/private""#));
    }

    #[tokio::test]
    async fn decrypt_submit_hides_failure_reason() {
        let secret = secrets::encrypt("https://example.com/private", "super-secret").unwrap();

        let wrong_password = app()
            .oneshot(post_form("/secret/decrypt", format!("secret={}&password=wrong", secret)))
            .await
            .unwrap();
        let malformed = app()
            .oneshot(post_form("/secret/decrypt", "secret=abc&password=wrong".to_string()))
            .await
            .unwrap();

        for response in [wrong_password, malformed] {
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let html = body_string(response).await;
            assert!(html.contains(DECRYPT_FAILED));
            assert!(!html.contains("https://example.com/private"));
        }
    }

    #[tokio::test]
    async fn decrypt_submit_requires_secret_and_password() {
        let response = app()
            .oneshot(post_form("/secret/decrypt", "password=pw".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_string(response).await;
        assert!(html.contains(SECRET_REQUIRED));
        assert!(!html.contains("A secret query parameter is required"));

        let response = app()
            .oneshot(post_form("/secret/decrypt", "secret=abc".to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains(PASSWORD_REQUIRED));
    }

    #[tokio::test]
    async fn decrypt_page_prefills_secret() {
        let request = Request::builder()
            .uri("/secret/decrypt?secret=abc-_123")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains(">abc-_123</textarea>"));
    }
}
