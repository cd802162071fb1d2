//! Users API handlers.
//!
//! ```text
//! GET  /api/users                Visible members, newest first
//! GET  /api/users/{id}           One member's directory page
//! GET  /api/users/{id}/invitees  Visible invitees of a member
//! GET  /api/users/{id}/history   A member's level ledger
//! POST /api/users/{id}/level     Set a member's level directly
//! ```
//!
//! Every response is filtered through the visibility rules for the session
//! member, so the handlers never see more than the viewer may.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::ports::{LevelHistoryEntry, ManualLevelChange, MemberProfile};
use crate::domain::visibility::MemberView;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_level, parse_member_id};

/// Query string for `GET /api/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListMembersQuery {
    /// Restrict the listing to one level.
    #[serde(default)]
    pub level: Option<u8>,
}

/// Request body for `POST /api/users/{id}/level`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetLevelRequest {
    /// Level to set. Admin-tier changes are refused here.
    pub new_level: u8,
    /// Explanation recorded in the ledger.
    pub reason: String,
}

/// List members visible to the session member, newest first.
///
/// Filtering by a level above the viewer's own yields an empty list rather
/// than an error.
#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("level" = Option<u8>, Query, description = "Restrict the listing to one level")
    ),
    responses(
        (status = 200, description = "Visible members", body = [MemberView]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listMembers"
)]
#[get("/users")]
pub async fn list_members(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<ListMembersQuery>,
) -> ApiResult<web::Json<Vec<MemberView>>> {
    let viewer = session.require_member_id()?;
    let level = query
        .into_inner()
        .level
        .map(|raw| parse_level(raw, FieldName::new("level")))
        .transpose()?;
    let members = state.members.list_members(viewer, level).await?;
    Ok(web::Json(members))
}

/// One member's directory page: the member, their inviter, and invitees.
///
/// Members outside the viewer's visibility are reported as absent, exactly
/// like ids that never existed.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(
        ("id" = String, Path, description = "Member id")
    ),
    responses(
        (status = 200, description = "Member page", body = MemberProfile),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "memberProfile"
)]
#[get("/users/{id}")]
pub async fn member_profile(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MemberProfile>> {
    let viewer = session.require_member_id()?;
    let id = parse_member_id(&path, FieldName::new("id"))?;
    let profile = state.members.member_profile(viewer, id).await?;
    Ok(web::Json(profile))
}

/// Visible invitees of a visible member, newest first.
#[utoipa::path(
    get,
    path = "/api/users/{id}/invitees",
    params(
        ("id" = String, Path, description = "Member id")
    ),
    responses(
        (status = 200, description = "Visible invitees", body = [MemberView]),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "memberInvitees"
)]
#[get("/users/{id}/invitees")]
pub async fn member_invitees(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<MemberView>>> {
    let viewer = session.require_member_id()?;
    let id = parse_member_id(&path, FieldName::new("id"))?;
    let invitees = state.members.member_invitees(viewer, id).await?;
    Ok(web::Json(invitees))
}

/// Level ledger of a visible member, newest first.
#[utoipa::path(
    get,
    path = "/api/users/{id}/history",
    params(
        ("id" = String, Path, description = "Member id")
    ),
    responses(
        (status = 200, description = "Level changes", body = [LevelHistoryEntry]),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "memberLevelHistory"
)]
#[get("/users/{id}/history")]
pub async fn level_history(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<LevelHistoryEntry>>> {
    let viewer = session.require_member_id()?;
    let id = parse_member_id(&path, FieldName::new("id"))?;
    let history = state.members.level_history(viewer, id).await?;
    Ok(web::Json(history))
}

/// Set a member's level directly, bypassing the vote path.
///
/// Admin-tier only. Transitions into or out of level 5 are refused; those
/// go through a promotion vote or the bootstrap path.
#[utoipa::path(
    post,
    path = "/api/users/{id}/level",
    request_body = SetLevelRequest,
    params(
        ("id" = String, Path, description = "Member id")
    ),
    responses(
        (status = 200, description = "Updated member", body = MemberView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Admin tier required", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Concurrent level change", body = Error),
        (status = 422, description = "Admin-tier transition refused", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "setMemberLevel"
)]
#[post("/users/{id}/level")]
pub async fn set_member_level(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<SetLevelRequest>,
) -> ApiResult<web::Json<MemberView>> {
    let actor = session.require_member_id()?;
    let member_id = parse_member_id(&path, FieldName::new("id"))?;
    let body = payload.into_inner();
    let new_level = parse_level(body.new_level, FieldName::new("newLevel"))?;
    let updated = state
        .member_level
        .set_member_level(
            actor,
            ManualLevelChange {
                member_id,
                new_level,
                reason: body.reason,
            },
        )
        .await?;
    Ok(web::Json(updated))
}
