//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod governance;
pub mod health;
pub mod invites;
pub mod promotions;
pub mod session;
pub mod state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
