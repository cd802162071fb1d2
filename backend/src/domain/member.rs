//! Core member model for the directory.
//!
//! A member joins through an invite (or as the founding member), sits at a
//! level between 1 and 5, and is only visible to peers at their level or
//! above. Validation happens at the edges: raw strings become [`Username`]
//! and [`EmailAddress`] values before they reach the services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::define_id;
use super::level::Level;

define_id! {
    /// Identifier of a directory member.
    pub struct MemberId;
}

/// Account standing of a member.
///
/// Only `active` members may sign in or act. The other states are honoured
/// wherever standing is checked but no operation in this service sets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Member in good standing.
    Active,
    /// Temporarily barred from acting.
    Suspended,
    /// Permanently removed from the community.
    Expelled,
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Expelled => "expelled",
        };
        write!(f, "{label}")
    }
}

/// Validation errors for [`Username`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameValidationError {
    TooShort { min: usize },
    TooLong { max: usize },
    InvalidCharacters,
}

impl std::fmt::Display for UsernameValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::TooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::InvalidCharacters => write!(
                f,
                "username may only contain lowercase letters, digits, and underscores"
            ),
        }
    }
}

impl std::error::Error for UsernameValidationError {}

/// Unique handle a member signs in with.
///
/// Input is normalised (trimmed, lowercased) before validation, so mixed-case
/// submissions resolve to the same handle.
///
/// # Examples
/// ```
/// use conclave_backend::domain::Username;
///
/// let name = Username::parse("  Quorra_9 ").expect("normalises to a valid handle");
/// assert_eq!(name.as_str(), "quorra_9");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

/// Minimum length of a normalised username.
pub const USERNAME_MIN_LEN: usize = 3;
/// Maximum length of a normalised username.
pub const USERNAME_MAX_LEN: usize = 30;

impl Username {
    /// Normalise and validate a raw username.
    pub fn parse(raw: &str) -> Result<Self, UsernameValidationError> {
        let normalised = raw.trim().to_lowercase();
        let length = normalised.chars().count();
        if length < USERNAME_MIN_LEN {
            return Err(UsernameValidationError::TooShort {
                min: USERNAME_MIN_LEN,
            });
        }
        if length > USERNAME_MAX_LEN {
            return Err(UsernameValidationError::TooLong {
                max: USERNAME_MAX_LEN,
            });
        }
        let valid = normalised
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid {
            return Err(UsernameValidationError::InvalidCharacters);
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised handle.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for [`EmailAddress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    Empty,
    MissingAtSign,
    TooLong { max: usize },
}

impl std::fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "email address must not be empty"),
            Self::MissingAtSign => {
                write!(f, "email address must contain a local part and a domain")
            }
            Self::TooLong { max } => {
                write!(f, "email address must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for EmailValidationError {}

/// Maximum accepted email address length.
pub const EMAIL_MAX_LEN: usize = 254;

/// Contact address stored for a member.
///
/// Only visible to admin-tier viewers; lower-level viewers receive member
/// projections without this field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate a raw email address.
    ///
    /// Checks are deliberately shallow: addresses arrive from a registration
    /// form, and deliverability is not this service's concern.
    pub fn parse(raw: &str) -> Result<Self, EmailValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if trimmed.chars().count() > EMAIL_MAX_LEN {
            return Err(EmailValidationError::TooLong { max: EMAIL_MAX_LEN });
        }
        let mut parts = trimmed.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() {
            return Err(EmailValidationError::MissingAtSign);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input for inserting a member into the directory.
///
/// The caller mints the identifier up front so related records (for example
/// the invite consumed during registration) can reference it before the
/// insert lands.
#[derive(Debug, Clone)]
pub struct NewMember {
    /// Identifier minted by the caller.
    pub id: MemberId,
    /// Normalised unique handle.
    pub username: Username,
    /// Optional unique contact address.
    pub email: Option<EmailAddress>,
    /// Level the member starts at.
    pub level: Level,
    /// Inviter, absent only for the founding member.
    pub invited_by: Option<MemberId>,
}

/// A member of the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    id: MemberId,
    username: Username,
    email: Option<EmailAddress>,
    level: Level,
    status: MemberStatus,
    invited_by: Option<MemberId>,
    created_at: DateTime<Utc>,
}

impl Member {
    /// Materialise a member from an insert draft.
    ///
    /// New members always start in the `active` state.
    pub fn create(draft: NewMember, created_at: DateTime<Utc>) -> Self {
        let NewMember {
            id,
            username,
            email,
            level,
            invited_by,
        } = draft;
        Self {
            id,
            username,
            email,
            level,
            status: MemberStatus::Active,
            invited_by,
            created_at,
        }
    }

    /// Unique identifier.
    pub fn id(&self) -> MemberId {
        self.id
    }

    /// Sign-in handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address, when one was registered.
    pub fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Current membership level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Account standing.
    pub fn status(&self) -> MemberStatus {
        self.status
    }

    /// Whether the member may act (sign in, invite, propose, vote).
    pub fn is_active(&self) -> bool {
        matches!(self.status, MemberStatus::Active)
    }

    /// Member who issued the invite this member joined through.
    pub fn invited_by(&self) -> Option<MemberId> {
        self.invited_by
    }

    /// Moment the member joined.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this member at a different level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Copy of this member with a different standing.
    pub fn with_status(mut self, status: MemberStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests;
