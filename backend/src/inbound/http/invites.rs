//! Invites API handlers.
//!
//! ```text
//! GET  /api/invites         The caller's invite links
//! POST /api/invites         Mint a single-use invite link
//! GET  /api/invite/{token}  Public pre-registration check
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::Error;
use crate::domain::invite::InviteToken;
use crate::domain::ports::{InviteLinkSummary, InvitePreview};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// List the caller's invite links, newest first.
#[utoipa::path(
    get,
    path = "/api/invites",
    responses(
        (status = 200, description = "The caller's links", body = [InviteLinkSummary]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invites"],
    operation_id = "listInvites"
)]
#[get("/invites")]
pub async fn list_invites(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<InviteLinkSummary>>> {
    let owner = session.require_member_id()?;
    let links = state.invites_query.list_links(owner).await?;
    Ok(web::Json(links))
}

/// Mint a single-use invite link owned by the caller.
#[utoipa::path(
    post,
    path = "/api/invites",
    responses(
        (status = 201, description = "Link minted", body = InviteLinkSummary),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Member not in active standing", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invites"],
    operation_id = "createInvite"
)]
#[post("/invites")]
pub async fn create_invite(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_member_id()?;
    let link = state.invites.create_link(owner).await?;
    Ok(HttpResponse::Created().json(InviteLinkSummary::from_link(&link, None)))
}

/// Check an invite token before registering.
///
/// Public: prospective members hold a token, not a session. Tokens that do
/// not resolve to a redeemable link are reported as absent.
#[utoipa::path(
    get,
    path = "/api/invite/{token}",
    params(
        ("token" = String, Path, description = "Invite token from the link")
    ),
    responses(
        (status = 200, description = "Redeemable invite", body = InvitePreview),
        (status = 404, description = "Invalid or expired invite link", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["invites"],
    operation_id = "previewInvite",
    security([])
)]
#[get("/invite/{token}")]
pub async fn preview_invite(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<InvitePreview>> {
    // A token that cannot exist is reported exactly like one that does not.
    let token = InviteToken::parse(&path)
        .map_err(|_| Error::not_found("Invalid or expired invite link"))?;
    let preview = state.invites_query.preview(&token).await?;
    Ok(web::Json(preview))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use serde_json::Value;

    use crate::inbound::http::state::HttpState;
    use crate::inbound::http::test_utils::{
        memory_state, register_member, test_session_middleware,
    };

    use super::*;

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .service(
                web::scope("/api")
                    .service(crate::inbound::http::auth::register)
                    .service(list_invites)
                    .service(create_invite)
                    .service(preview_invite),
            )
    }

    async fn mint_link(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        cookie: &actix_web::cookie::Cookie<'static>,
    ) -> Value {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/invites")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        actix_test::read_body_json(response).await
    }

    #[actix_web::test]
    async fn minting_requires_a_session() {
        let app = actix_test::init_service(test_app(memory_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post().uri("/api/invites").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn minted_links_appear_in_the_owners_listing() {
        let app = actix_test::init_service(test_app(memory_state())).await;
        let (founder, cookie) = register_member(&app, "quorra", None).await;

        let link = mint_link(&app, &cookie).await;
        assert_eq!(link.get("usesCount").and_then(Value::as_u64), Some(0));
        assert_eq!(link.get("maxUses").and_then(Value::as_u64), Some(1));
        assert_eq!(link.get("status").and_then(Value::as_str), Some("active"));
        assert_eq!(
            link.get("invitedByUserId").and_then(Value::as_str),
            founder.get("id").and_then(Value::as_str)
        );
        assert!(link.get("usedByName").is_none());

        let listing = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/invites")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(listing.status(), StatusCode::OK);
        let links: Value = actix_test::read_body_json(listing).await;
        let entries = links.as_array().expect("link list");
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].get("token").and_then(Value::as_str),
            link.get("token").and_then(Value::as_str)
        );
    }

    #[actix_web::test]
    async fn preview_is_public_and_names_the_inviter() {
        let app = actix_test::init_service(test_app(memory_state())).await;
        let (_, cookie) = register_member(&app, "quorra", None).await;
        let link = mint_link(&app, &cookie).await;
        let token = link.get("token").and_then(Value::as_str).expect("token");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/invite/{token}"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let preview: Value = actix_test::read_body_json(response).await;
        assert_eq!(preview.get("valid").and_then(Value::as_bool), Some(true));
        assert_eq!(
            preview.get("inviterName").and_then(Value::as_str),
            Some("quorra")
        );
    }

    #[actix_web::test]
    async fn spent_and_fabricated_tokens_preview_alike() {
        let app = actix_test::init_service(test_app(memory_state())).await;
        let (_, cookie) = register_member(&app, "quorra", None).await;
        let link = mint_link(&app, &cookie).await;
        let token = link
            .get("token")
            .and_then(Value::as_str)
            .expect("token")
            .to_owned();
        register_member(&app, "newcomer", Some(&token)).await;

        let spent = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/invite/{token}"))
                .to_request(),
        )
        .await;
        assert_eq!(spent.status(), StatusCode::NOT_FOUND);
        let spent_body = actix_test::read_body(spent).await;

        let fabricated = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/invite/deadbeef")
                .to_request(),
        )
        .await;
        assert_eq!(fabricated.status(), StatusCode::NOT_FOUND);
        let fabricated_body = actix_test::read_body(fabricated).await;

        assert_eq!(spent_body, fabricated_body);
    }

    #[actix_web::test]
    async fn redeemed_links_name_the_redeemer() {
        let app = actix_test::init_service(test_app(memory_state())).await;
        let (_, cookie) = register_member(&app, "quorra", None).await;
        let link = mint_link(&app, &cookie).await;
        let token = link
            .get("token")
            .and_then(Value::as_str)
            .expect("token")
            .to_owned();
        register_member(&app, "newcomer", Some(&token)).await;

        let listing = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/invites")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let links: Value = actix_test::read_body_json(listing).await;
        let entries = links.as_array().expect("link list");
        assert_eq!(entries[0].get("status").and_then(Value::as_str), Some("used"));
        assert_eq!(entries[0].get("usesCount").and_then(Value::as_u64), Some(1));
        assert_eq!(
            entries[0].get("usedByName").and_then(Value::as_str),
            Some("newcomer")
        );
    }
}
