//! Dashboard statistics API handlers.
//!
//! ```text
//! GET /api/stats   Viewer-scoped dashboard numbers
//! ```

use actix_web::{get, web};

use crate::domain::Error;
use crate::domain::ports::StatsOverview;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Dashboard numbers computed from the caller's vantage point.
///
/// Totals, the level distribution, and the pending queues cover only
/// members the caller may see.
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Dashboard numbers", body = StatsOverview),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["stats"],
    operation_id = "statsOverview"
)]
#[get("/stats")]
pub async fn stats_overview(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<StatsOverview>> {
    let viewer = session.require_member_id()?;
    let overview = state.stats.overview(viewer).await?;
    Ok(web::Json(overview))
}
