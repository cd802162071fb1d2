//! Auth API handlers.
//!
//! ```text
//! GET  /api/auth/setup-required  Whether the next registration founds the directory
//! POST /api/auth/register        Register a member and start a session
//! POST /api/auth/login           Resolve a handle and start a session
//! POST /api/auth/logout          Drop the session
//! GET  /api/auth/user            The authenticated member's own page
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::invite::InviteToken;
use crate::domain::member::{EmailAddress, Username};
use crate::domain::ports::{NewRegistration, OwnProfile};
use crate::domain::visibility::FullMember;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error};

/// Registration request body for `POST /api/auth/register`.
///
/// Example JSON:
/// `{"username":"quorra","inviteToken":"2b6f..."}`
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    /// Optional contact address.
    #[serde(default)]
    pub email: Option<String>,
    /// Invite being redeemed. Required unless the directory is empty.
    #[serde(default)]
    pub invite_token: Option<String>,
}

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
}

/// Response body for `GET /api/auth/setup-required`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequiredResponse {
    /// Whether the directory is empty and the next registration founds it.
    pub setup_required: bool,
}

fn parse_registration(payload: RegisterRequest) -> Result<NewRegistration, Error> {
    let username = Username::parse(&payload.username)
        .map_err(|err| invalid_field_error(FieldName::new("username"), "invalid_username", err))?;
    let email = payload
        .email
        .as_deref()
        .map(EmailAddress::parse)
        .transpose()
        .map_err(|err| invalid_field_error(FieldName::new("email"), "invalid_email", err))?;
    let invite_token = payload
        .invite_token
        .as_deref()
        .map(InviteToken::parse)
        .transpose()
        .map_err(|err| {
            invalid_field_error(FieldName::new("inviteToken"), "invalid_invite_token", err)
        })?;
    Ok(NewRegistration {
        username,
        email,
        invite_token,
    })
}

/// Report whether the directory still awaits its founding member.
///
/// Clients use this to decide whether to render the open founding form or
/// the invite-gated one.
#[utoipa::path(
    get,
    path = "/api/auth/setup-required",
    responses(
        (status = 200, description = "Founding state", body = SetupRequiredResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "setupRequired",
    security([])
)]
#[get("/auth/setup-required")]
pub async fn setup_required(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<SetupRequiredResponse>> {
    let setup_required = state.onboarding.setup_required().await?;
    Ok(web::Json(SetupRequiredResponse { setup_required }))
}

/// Register a member and establish a session.
///
/// An empty directory admits the registrant as the founding admin with no
/// invite. Otherwise `inviteToken` is mandatory and the member starts at
/// the lowest level.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (
            status = 201,
            description = "Member registered and logged in",
            body = FullMember,
            headers(("Set-Cookie" = String, description = "Session cookie"))
        ),
        (status = 400, description = "Invalid request or missing invite", body = Error),
        (status = 404, description = "Unknown invite token", body = Error),
        (status = 409, description = "Username taken", body = Error),
        (status = 410, description = "Invite exhausted", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = parse_registration(payload.into_inner())?;
    let member = state.onboarding.register(registration).await?;
    session.persist_member(member.id())?;
    Ok(HttpResponse::Created().json(FullMember::from(&member)))
}

/// Resolve a handle to a member and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unknown handle", body = Error),
        (status = 403, description = "Member not in active standing", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let username = Username::parse(&payload.username)
        .map_err(|err| invalid_field_error(FieldName::new("username"), "invalid_username", err))?;
    let member = state.login.authenticate(&username).await?;
    session.persist_member(member.id())?;
    Ok(HttpResponse::Ok().finish())
}

/// Drop the session. Succeeds whether or not one was established.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session dropped"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    Ok(HttpResponse::Ok().finish())
}

/// The authenticated member's own page, never sanitized.
#[utoipa::path(
    get,
    path = "/api/auth/user",
    responses(
        (status = 200, description = "Own profile", body = OwnProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/user")]
pub async fn current_user(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<OwnProfile>> {
    let member_id = session.require_member_id()?;
    let profile = state.members.own_profile(member_id).await?;
    Ok(web::Json(profile))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
