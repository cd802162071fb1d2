//! Builders for HTTP state ports backed by the shared store.

use std::sync::Arc;

use actix_web::web;

use crate::domain::{
    DirectoryService, GovernanceService, InviteService, PromotionService, RegistrationService,
    StatsService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::MemoryStore;

/// Build the shared HTTP state for the server factory.
pub(super) fn build_http_state() -> web::Data<HttpState> {
    web::Data::new(build_memory_state())
}

/// Assemble the full port set over one fresh in-memory store.
///
/// Every service shares the same store instance, so rules the store
/// enforces inside its atomic sections hold across the whole API surface.
/// A database-backed deployment would swap the store behind the same
/// service constructors.
pub fn build_memory_state() -> HttpState {
    let store = Arc::new(MemoryStore::new());
    let registration = Arc::new(RegistrationService::new(
        Arc::clone(&store),
        Arc::clone(&store),
    ));
    let directory = Arc::new(DirectoryService::new(Arc::clone(&store)));
    let invites = Arc::new(InviteService::new(Arc::clone(&store), Arc::clone(&store)));
    let promotions = Arc::new(PromotionService::new(
        Arc::clone(&store),
        Arc::clone(&store),
    ));
    let governance = Arc::new(GovernanceService::new(Arc::clone(&store)));
    let stats = Arc::new(StatsService::new(Arc::clone(&store), Arc::clone(&store)));
    HttpState {
        onboarding: registration.clone(),
        login: registration,
        members: directory.clone(),
        member_level: directory,
        invites: invites.clone(),
        invites_query: invites,
        promotions: promotions.clone(),
        promotions_query: promotions,
        governance: governance.clone(),
        governance_query: governance,
        stats,
    }
}
