//! Promotions API handlers.
//!
//! ```text
//! GET  /api/promotions             Visible requests, optionally by status
//! GET  /api/promotions/{id}        One request with its ballots
//! POST /api/promotions             Open a promotion request
//! POST /api/promotions/{id}/vote   Cast a ballot
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::ports::{PromotionProposal, PromotionRequestView, VoteOutcome, VoteSubmission};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_member_id, parse_request_id, parse_request_status, parse_request_type,
    parse_vote_choice,
};

/// Query string for `GET /api/promotions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPromotionsQuery {
    /// Restrict the listing to one lifecycle state.
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for `POST /api/promotions`.
///
/// The vote threshold and voter floor are assigned by the engine from the
/// request type and the admin census; clients cannot pick them.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromotionRequest {
    /// Member the request is about.
    pub candidate_user_id: String,
    /// One of `PROMOTE`, `DEMOTE`, `PROMOTE_TO_5`, `DEMOTE_FROM_5`.
    pub request_type: String,
    /// Level argued for.
    pub proposed_level: u8,
    /// Candidate level the sponsor believes current.
    #[serde(default)]
    pub current_level: Option<u8>,
    /// Sponsor's argument.
    pub justification: String,
}

/// Request body for `POST /api/promotions/{id}/vote`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    /// Either `for` or `against`.
    pub vote: String,
    /// Optional remark recorded with the ballot.
    #[serde(default)]
    pub comment: Option<String>,
}

/// List promotion requests whose candidates are visible to the caller.
#[utoipa::path(
    get,
    path = "/api/promotions",
    params(
        ("status" = Option<String>, Query, description = "One of open, approved, rejected, expired")
    ),
    responses(
        (status = 200, description = "Visible requests", body = [PromotionRequestView]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["promotions"],
    operation_id = "listPromotions"
)]
#[get("/promotions")]
pub async fn list_promotions(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<ListPromotionsQuery>,
) -> ApiResult<web::Json<Vec<PromotionRequestView>>> {
    let viewer = session.require_member_id()?;
    let status = query
        .into_inner()
        .status
        .map(|raw| parse_request_status(&raw, FieldName::new("status")))
        .transpose()?;
    let requests = state.promotions_query.list_requests(viewer, status).await?;
    Ok(web::Json(requests))
}

/// One promotion request with its visible ballots and tallies.
#[utoipa::path(
    get,
    path = "/api/promotions/{id}",
    params(
        ("id" = String, Path, description = "Request id")
    ),
    responses(
        (status = 200, description = "The request", body = PromotionRequestView),
        (status = 400, description = "Invalid id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["promotions"],
    operation_id = "promotionDetail"
)]
#[get("/promotions/{id}")]
pub async fn promotion_detail(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PromotionRequestView>> {
    let viewer = session.require_member_id()?;
    let id = parse_request_id(&path, FieldName::new("id"))?;
    let request = state.promotions_query.request_detail(viewer, id).await?;
    Ok(web::Json(request))
}

/// Open a promotion request.
///
/// The engine derives the transition's vote threshold and voter floor, and
/// refuses proposals that disagree with the candidate's current level.
#[utoipa::path(
    post,
    path = "/api/promotions",
    request_body = CreatePromotionRequest,
    responses(
        (status = 201, description = "Request opened", body = PromotionRequestView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Candidate not visible or admin proposal refused", body = Error),
        (status = 409, description = "Level snapshot out of date or bootstrap applies", body = Error),
        (status = 422, description = "Transition not expressible", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["promotions"],
    operation_id = "createPromotion"
)]
#[post("/promotions")]
pub async fn create_promotion(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<CreatePromotionRequest>,
) -> ApiResult<HttpResponse> {
    let creator = session.require_member_id()?;
    let body = payload.into_inner();
    let candidate_id = parse_member_id(&body.candidate_user_id, FieldName::new("candidateUserId"))?;
    let request_type = parse_request_type(&body.request_type, FieldName::new("requestType"))?;
    let proposal = PromotionProposal {
        candidate_id,
        request_type,
        proposed_level: body.proposed_level,
        current_level: body.current_level,
        justification: body.justification,
    };
    let request = state.promotions.create_request(creator, proposal).await?;
    Ok(HttpResponse::Created().json(request))
}

/// Cast a ballot on an open request.
///
/// A ballot that completes the threshold resolves the request in the same
/// call; the outcome carries the status the request ended up in.
#[utoipa::path(
    post,
    path = "/api/promotions/{id}/vote",
    request_body = CastVoteRequest,
    params(
        ("id" = String, Path, description = "Request id")
    ),
    responses(
        (status = 200, description = "Ballot recorded", body = VoteOutcome),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Below the voter floor", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Already voted or no longer open", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["promotions"],
    operation_id = "castVote"
)]
#[post("/promotions/{id}/vote")]
pub async fn cast_vote(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CastVoteRequest>,
) -> ApiResult<web::Json<VoteOutcome>> {
    let voter = session.require_member_id()?;
    let request_id = parse_request_id(&path, FieldName::new("id"))?;
    let body = payload.into_inner();
    let choice = parse_vote_choice(&body.vote, FieldName::new("vote"))?;
    let outcome = state
        .promotions
        .cast_vote(
            voter,
            VoteSubmission {
                request_id,
                choice,
                comment: body.comment,
            },
        )
        .await?;
    Ok(web::Json(outcome))
}

#[cfg(test)]
#[path = "promotions_tests.rs"]
mod tests;
