//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::Value;

use crate::inbound::http::state::HttpState;
use crate::server::build_memory_state;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build handler state backed by a fresh in-memory store.
///
/// All services share the one store, so a test can register through the
/// auth endpoints and immediately observe the member through the others.
pub fn memory_state() -> HttpState {
    build_memory_state()
}

/// Find the session cookie set by a response.
pub fn session_cookie(response: &actix_web::dev::ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Register a member through the HTTP surface.
///
/// Returns the created projection and the session cookie, so tests can act
/// as the new member straight away. The app must mount the auth handlers
/// under `/api`.
pub async fn register_member(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    username: &str,
    invite_token: Option<&str>,
) -> (Value, Cookie<'static>) {
    let mut payload = serde_json::json!({ "username": username });
    if let Some(token) = invite_token {
        payload["inviteToken"] = Value::String(token.to_owned());
    }
    let request = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&payload)
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie(&response);
    let body = actix_test::read_body(response).await;
    let value: Value = serde_json::from_slice(&body).expect("member payload");
    (value, cookie)
}

/// Parse the `id` field of a member payload.
pub fn member_id_of(member: &Value) -> crate::domain::MemberId {
    member
        .get("id")
        .and_then(Value::as_str)
        .expect("member id")
        .parse()
        .expect("uuid id")
}
