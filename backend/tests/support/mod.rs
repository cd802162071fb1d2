//! Shared helpers for the HTTP integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the app assembly and session plumbing live here rather than being
//! repeated per scenario file. The app mirrors the server's production
//! mount: every handler under `/api`, the health probes beside it, and the
//! same session middleware with a per-test key.

use actix_http::Request;
use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::Value;

use conclave_backend::Trace;
use conclave_backend::inbound::http::auth::{
    current_user, login, logout, register, setup_required,
};
use conclave_backend::inbound::http::governance::{bootstrap_promote, governance_summary};
use conclave_backend::inbound::http::health::{HealthState, live, ready};
use conclave_backend::inbound::http::invites::{create_invite, list_invites, preview_invite};
use conclave_backend::inbound::http::promotions::{
    cast_vote, create_promotion, list_promotions, promotion_detail,
};
use conclave_backend::inbound::http::state::HttpState;
use conclave_backend::inbound::http::stats::stats_overview;
use conclave_backend::inbound::http::users::{
    level_history, list_members, member_invitees, member_profile, set_member_level,
};

/// Assemble the full application surface the server mounts.
///
/// Uses a fresh session key per invocation and a plain-HTTP cookie so the
/// test client can replay it.
pub async fn full_app(
    state: HttpState,
    health: web::Data<HealthState>,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api")
        .wrap(session)
        .service(setup_required)
        .service(register)
        .service(login)
        .service(logout)
        .service(current_user)
        .service(list_members)
        .service(member_profile)
        .service(member_invitees)
        .service(level_history)
        .service(set_member_level)
        .service(list_invites)
        .service(create_invite)
        .service(preview_invite)
        .service(list_promotions)
        .service(promotion_detail)
        .service(create_promotion)
        .service(cast_vote)
        .service(governance_summary)
        .service(bootstrap_promote)
        .service(stats_overview);

    actix_test::init_service(
        App::new()
            .app_data(health)
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live),
    )
    .await
}

/// Find the session cookie set by a response.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Read a response body as JSON.
pub async fn read_json(response: ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("json body")
}

/// Register a member through the HTTP surface.
///
/// Returns the created projection and the session cookie, so tests can act
/// as the new member straight away.
pub async fn register_member(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
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
    let member = read_json(response).await;
    (member, cookie)
}

/// Mint a single-use invite as `inviter` and register `username` through it.
pub async fn invite_in(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    inviter: &Cookie<'static>,
    username: &str,
) -> (Value, Cookie<'static>) {
    let response = post_as(app, inviter, "/api/invites", &serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let link = read_json(response).await;
    let token = link["token"].as_str().expect("invite token").to_owned();
    register_member(app, username, Some(&token)).await
}

/// Issue a GET with a session cookie attached.
pub async fn get_as(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: &Cookie<'static>,
    path: &str,
) -> ServiceResponse {
    let request = actix_test::TestRequest::get()
        .uri(path)
        .cookie(cookie.clone())
        .to_request();
    actix_test::call_service(app, request).await
}

/// Issue a POST with a session cookie and JSON body attached.
pub async fn post_as(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: &Cookie<'static>,
    path: &str,
    body: &Value,
) -> ServiceResponse {
    let request = actix_test::TestRequest::post()
        .uri(path)
        .cookie(cookie.clone())
        .set_json(body)
        .to_request();
    actix_test::call_service(app, request).await
}

/// Parse the `id` field of a member payload.
pub fn id_of(member: &Value) -> String {
    member
        .get("id")
        .and_then(Value::as_str)
        .expect("member id")
        .to_owned()
}
