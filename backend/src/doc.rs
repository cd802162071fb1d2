//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer
//! - **Schemas**: Domain and port types that appear on the wire
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::error::{Error, ErrorCode};
use crate::domain::invite::{InviteStatus, InviteToken};
use crate::domain::level::Level;
use crate::domain::member::{EmailAddress, MemberId, MemberStatus, Username};
use crate::domain::promotion::{RequestStatus, RequestType, VoteChoice};
use crate::domain::ports::{
    GovernanceSummary, InviteLinkSummary, InvitePreview, LevelHistoryEntry, MemberProfile,
    OwnProfile, PromotionRequestView, StatsOverview, VoteOutcome, VoteView,
};
use crate::domain::visibility::{FullMember, LevelCount, MemberView, PublicMember};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest, SetupRequiredResponse};
use crate::inbound::http::governance::BootstrapPromoteRequest;
use crate::inbound::http::promotions::{CastVoteRequest, CreatePromotionRequest};
use crate::inbound::http::users::SetLevelRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Conclave backend API",
        description = "HTTP interface for the invite-gated member directory, \
                       peer-voted promotions, and admin tier governance.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::setup_required,
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::users::list_members,
        crate::inbound::http::users::member_profile,
        crate::inbound::http::users::member_invitees,
        crate::inbound::http::users::level_history,
        crate::inbound::http::users::set_member_level,
        crate::inbound::http::invites::list_invites,
        crate::inbound::http::invites::create_invite,
        crate::inbound::http::invites::preview_invite,
        crate::inbound::http::promotions::list_promotions,
        crate::inbound::http::promotions::promotion_detail,
        crate::inbound::http::promotions::create_promotion,
        crate::inbound::http::promotions::cast_vote,
        crate::inbound::http::governance::governance_summary,
        crate::inbound::http::governance::bootstrap_promote,
        crate::inbound::http::stats::stats_overview,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Level,
        MemberId,
        MemberStatus,
        Username,
        EmailAddress,
        InviteStatus,
        InviteToken,
        RequestStatus,
        RequestType,
        VoteChoice,
        FullMember,
        PublicMember,
        MemberView,
        LevelCount,
        OwnProfile,
        MemberProfile,
        LevelHistoryEntry,
        InviteLinkSummary,
        InvitePreview,
        PromotionRequestView,
        VoteView,
        VoteOutcome,
        GovernanceSummary,
        StatsOverview,
        RegisterRequest,
        LoginRequest,
        SetupRequiredResponse,
        SetLevelRequest,
        CreatePromotionRequest,
        CastVoteRequest,
        BootstrapPromoteRequest,
    )),
    tags(
        (name = "auth", description = "Registration, login, and the current session"),
        (name = "users", description = "The member directory and level changes"),
        (name = "invites", description = "Invite links and their redemption"),
        (name = "promotions", description = "Peer-voted level change requests"),
        (name = "governance", description = "Admin tier rules and the bootstrap promotion"),
        (name = "stats", description = "Viewer-scoped dashboard numbers"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema and path registration.

    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn openapi_member_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let member_schema = schemas.get("FullMember").expect("FullMember schema");

        assert_object_schema_has_field(member_schema, "id");
        assert_object_schema_has_field(member_schema, "username");
        assert_object_schema_has_field(member_schema, "level");
    }

    #[test]
    fn openapi_paths_cover_the_surface() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/auth/setup-required",
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/logout",
            "/api/auth/user",
            "/api/users",
            "/api/users/{id}",
            "/api/users/{id}/invitees",
            "/api/users/{id}/history",
            "/api/users/{id}/level",
            "/api/invites",
            "/api/invite/{token}",
            "/api/promotions",
            "/api/promotions/{id}",
            "/api/promotions/{id}/vote",
            "/api/level5-governance",
            "/api/level5-governance/bootstrap-promote",
            "/api/stats",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains_key(path), "missing path '{path}'");
        }
    }

    #[test]
    fn openapi_declares_the_session_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
