//! Invite links gating registration.
//!
//! Every link carries an unguessable token and a use budget. Redemption is a
//! state transition owned by [`InviteLink::redeem`]; stores replay it inside
//! their own atomic section so concurrent redemptions of the same link
//! serialise cleanly.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::define_id;
use super::member::MemberId;

define_id! {
    /// Identifier of an invite link.
    pub struct InviteId;
}

/// Number of random bytes behind a token.
pub const TOKEN_BYTE_LEN: usize = 16;
/// Upper bound accepted when parsing tokens from the wire.
pub const TOKEN_MAX_LEN: usize = 128;

/// Validation errors for [`InviteToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteTokenValidationError {
    Empty,
    TooLong { max: usize },
}

impl std::fmt::Display for InviteTokenValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "invite token must not be empty"),
            Self::TooLong { max } => {
                write!(f, "invite token must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for InviteTokenValidationError {}

/// Unguessable token identifying an invite link on the wire.
///
/// Freshly generated tokens are 16 bytes of OS randomness rendered as hex.
/// Parsing is permissive beyond emptiness and length so unknown tokens fall
/// through to a lookup miss rather than a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct InviteToken(String);

impl InviteToken {
    /// Generate a fresh token from OS randomness.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Validate a raw token received from the wire.
    pub fn parse(raw: &str) -> Result<Self, InviteTokenValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InviteTokenValidationError::Empty);
        }
        if trimmed.chars().count() > TOKEN_MAX_LEN {
            return Err(InviteTokenValidationError::TooLong { max: TOKEN_MAX_LEN });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for InviteToken {
    type Error = InviteTokenValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<InviteToken> for String {
    fn from(value: InviteToken) -> Self {
        value.0
    }
}

impl std::fmt::Display for InviteToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of an invite link.
///
/// `disabled` and `expired` are honoured on redemption but no operation in
/// this service sets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    /// Redeemable.
    Active,
    /// Switched off by its owner.
    Disabled,
    /// Past its validity window.
    Expired,
    /// Use budget fully consumed.
    Used,
}

impl std::fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::Disabled => "disabled",
            Self::Expired => "expired",
            Self::Used => "used",
        };
        write!(f, "{label}")
    }
}

/// Reasons a redemption attempt is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemError {
    /// The link is not in its active state.
    NotActive { status: InviteStatus },
    /// The use budget is already spent.
    Exhausted,
}

impl std::fmt::Display for RedeemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotActive { status } => write!(f, "invite link is {status}"),
            Self::Exhausted => write!(f, "invite link has no remaining uses"),
        }
    }
}

impl std::error::Error for RedeemError {}

/// Input for creating an invite link.
#[derive(Debug, Clone)]
pub struct NewInviteLink {
    /// Identifier minted by the caller.
    pub id: InviteId,
    /// Token the invitee presents.
    pub token: InviteToken,
    /// Member issuing the invite.
    pub invited_by: MemberId,
    /// Use budget, `None` for unlimited.
    pub max_uses: Option<u32>,
}

/// An invite link and its redemption state.
#[derive(Debug, Clone, PartialEq)]
pub struct InviteLink {
    id: InviteId,
    token: InviteToken,
    invited_by: MemberId,
    max_uses: Option<u32>,
    uses_count: u32,
    status: InviteStatus,
    used_by: Option<MemberId>,
    created_at: DateTime<Utc>,
}

impl InviteLink {
    /// Materialise a link from a creation draft.
    pub fn create(draft: NewInviteLink, created_at: DateTime<Utc>) -> Self {
        let NewInviteLink {
            id,
            token,
            invited_by,
            max_uses,
        } = draft;
        Self {
            id,
            token,
            invited_by,
            max_uses,
            uses_count: 0,
            status: InviteStatus::Active,
            used_by: None,
            created_at,
        }
    }

    /// Unique identifier.
    pub fn id(&self) -> InviteId {
        self.id
    }

    /// Token the invitee presents.
    pub fn token(&self) -> &InviteToken {
        &self.token
    }

    /// Member who issued the link.
    pub fn invited_by(&self) -> MemberId {
        self.invited_by
    }

    /// Use budget, `None` for unlimited.
    pub fn max_uses(&self) -> Option<u32> {
        self.max_uses
    }

    /// Redemptions so far.
    pub fn uses_count(&self) -> u32 {
        self.uses_count
    }

    /// Lifecycle state.
    pub fn status(&self) -> InviteStatus {
        self.status
    }

    /// Whether the link can currently be redeemed.
    pub fn is_active(&self) -> bool {
        matches!(self.status, InviteStatus::Active)
    }

    /// Most recent redeemer.
    pub fn used_by(&self) -> Option<MemberId> {
        self.used_by
    }

    /// Moment the link was issued.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Consume one use of the link.
    ///
    /// Increments the counter, records the redeemer, and flips the link to
    /// `used` when the budget is spent. Must be applied inside the store's
    /// atomic section so the count never over-runs the budget.
    pub fn redeem(self, redeemer: MemberId) -> Result<Self, RedeemError> {
        if !self.is_active() {
            return Err(RedeemError::NotActive {
                status: self.status,
            });
        }
        if let Some(max) = self.max_uses {
            if self.uses_count >= max {
                return Err(RedeemError::Exhausted);
            }
        }
        let uses_count = self.uses_count.saturating_add(1);
        let status = match self.max_uses {
            Some(max) if uses_count >= max => InviteStatus::Used,
            _ => InviteStatus::Active,
        };
        Ok(Self {
            uses_count,
            status,
            used_by: Some(redeemer),
            ..self
        })
    }
}
