//! Domain model of the membership governance engine.
//!
//! Purpose: strongly typed entities, pure policy, and the services that
//! drive them. Validation lives at the edges (raw strings become value
//! types before they reach a service), mutation semantics live behind the
//! ports, and everything user-visible passes through the visibility filter
//! on the way out.
//!
//! Layout:
//! - value types and entities: [`level`], [`member`], [`invite`],
//!   [`promotion`], [`audit`]
//! - pure policy: [`governance`] (admin census rules), [`visibility`]
//!   (projections and filtering)
//! - [`error`] — transport-agnostic error payload with stable codes
//! - [`ports`] — driving use-case traits and driven store traits
//! - `*_service` — implementations of the driving ports on top of the
//!   driven ones

pub mod audit;
pub mod error;
pub mod governance;
pub(crate) mod ids;
pub mod invite;
pub mod level;
pub mod member;
pub mod ports;
pub mod promotion;
pub mod visibility;

pub mod directory_service;
pub mod governance_service;
pub mod invite_service;
pub mod promotion_service;
pub mod registration_service;
pub(crate) mod service_support;
pub mod stats_service;

pub use self::directory_service::DirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::governance::AdminCensus;
pub use self::governance_service::GovernanceService;
pub use self::invite_service::InviteService;
pub use self::level::{Level, LevelValidationError};
pub use self::member::{Member, MemberId, MemberStatus, Username};
pub use self::promotion_service::PromotionService;
pub use self::registration_service::RegistrationService;
pub use self::stats_service::StatsService;
