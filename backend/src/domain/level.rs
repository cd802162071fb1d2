//! Membership levels.
//!
//! Levels order the directory into tiers 1 through 5. Level 5 is the admin
//! tier whose composition is changed only through the governed promotion
//! paths.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lowest assignable membership level.
pub const LEVEL_MIN: u8 = 1;
/// Highest assignable membership level.
pub const LEVEL_MAX: u8 = 5;

/// Membership level between [`LEVEL_MIN`] and [`LEVEL_MAX`] inclusive.
///
/// # Examples
/// ```
/// use conclave_backend::domain::Level;
///
/// let level = Level::new(3).expect("3 is in range");
/// assert!(level < Level::ADMIN);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

/// Validation errors for [`Level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelValidationError {
    OutOfRange { value: u8 },
}

impl std::fmt::Display for LevelValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { value } => write!(
                f,
                "level must be between {LEVEL_MIN} and {LEVEL_MAX}, got {value}"
            ),
        }
    }
}

impl std::error::Error for LevelValidationError {}

impl Level {
    /// Entry level assigned to newly invited members.
    pub const MIN: Self = Self(LEVEL_MIN);
    /// Admin tier governed by the census policy.
    pub const ADMIN: Self = Self(LEVEL_MAX);

    /// Validate a raw value into a level.
    pub fn new(value: u8) -> Result<Self, LevelValidationError> {
        if !(LEVEL_MIN..=LEVEL_MAX).contains(&value) {
            return Err(LevelValidationError::OutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Numeric value of the level.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Whether this is the admin tier.
    pub fn is_admin(self) -> bool {
        self.0 == LEVEL_MAX
    }

    /// All levels in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (LEVEL_MIN..=LEVEL_MAX).map(Self)
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(value: Level) -> Self {
        value.0
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
