//! Admin-tier governance API handlers.
//!
//! ```text
//! GET  /api/level5-governance                     Rules currently in force
//! POST /api/level5-governance/bootstrap-promote   Seat a second admin directly
//! ```
//!
//! Both operations answer 404 to members below the top level, so the
//! surface cannot be probed into existence.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::ports::{BootstrapPromotion, GovernanceSummary};
use crate::domain::visibility::MemberView;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_member_id};

/// Request body for `POST /api/level5-governance/bootstrap-promote`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapPromoteRequest {
    /// Member to seat at the top level.
    pub candidate_user_id: String,
    /// Explanation recorded in the level ledger.
    pub reason: String,
}

/// The governance rules the live census currently implies.
#[utoipa::path(
    get,
    path = "/api/level5-governance",
    responses(
        (status = 200, description = "Rules in force", body = GovernanceSummary),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["governance"],
    operation_id = "governanceSummary"
)]
#[get("/level5-governance")]
pub async fn governance_summary(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<GovernanceSummary>> {
    let viewer = session.require_member_id()?;
    let summary = state.governance_query.summary(viewer).await?;
    Ok(web::Json(summary))
}

/// Promote a member directly to the top level, without a vote.
///
/// Available only while the admin tier holds exactly one member; the
/// census is re-derived atomically so the window closes after one use.
#[utoipa::path(
    post,
    path = "/api/level5-governance/bootstrap-promote",
    request_body = BootstrapPromoteRequest,
    responses(
        (status = 200, description = "Candidate promoted", body = MemberView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Bootstrap window closed", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 422, description = "Candidate already at the top level", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["governance"],
    operation_id = "bootstrapPromote"
)]
#[post("/level5-governance/bootstrap-promote")]
pub async fn bootstrap_promote(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<BootstrapPromoteRequest>,
) -> ApiResult<web::Json<MemberView>> {
    let actor = session.require_member_id()?;
    let body = payload.into_inner();
    let candidate_id = parse_member_id(&body.candidate_user_id, FieldName::new("candidateUserId"))?;
    let promoted = state
        .governance
        .bootstrap_promote(
            actor,
            BootstrapPromotion {
                candidate_id,
                reason: body.reason,
            },
        )
        .await?;
    Ok(web::Json(promoted))
}
