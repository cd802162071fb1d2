//! Admin-tier governance policy.
//!
//! Every rule here is a pure function of the live census of level 5 members.
//! Nothing is persisted: eligibility windows close by themselves as soon as
//! the census moves, which is what makes the bootstrap path one-shot.

use super::level::LEVEL_MAX;

/// Votes required when the tier holds exactly two members.
pub const PAIR_VOTE_THRESHOLD: u32 = 2;
/// Votes required once the tier holds three members or more.
pub const COUNCIL_VOTE_THRESHOLD: u32 = 3;

/// Live count of admin-tier members and the rules it implies.
///
/// # Examples
/// ```
/// use conclave_backend::domain::AdminCensus;
///
/// let census = AdminCensus::new(1);
/// assert!(census.can_bootstrap());
/// assert!(!census.can_demote_admin());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminCensus(u64);

impl AdminCensus {
    /// Wrap a live census count.
    pub fn new(count: u64) -> Self {
        Self(count)
    }

    /// Number of members currently at level 5.
    pub fn count(self) -> u64 {
        self.0
    }

    /// Votes in favour required to change the tier's composition.
    ///
    /// Two admins must be unanimous; three or more form a fixed council
    /// quorum. Below two the value is nominal: governed requests cannot be
    /// opened in that window because bootstrap supersedes them.
    pub fn vote_threshold(self) -> u32 {
        match self.0 {
            0 | 1 => 1,
            2 => PAIR_VOTE_THRESHOLD,
            _ => COUNCIL_VOTE_THRESHOLD,
        }
    }

    /// Whether a sole admin may directly seat a second one.
    pub fn can_bootstrap(self) -> bool {
        self.0 == 1
    }

    /// Whether demoting an admin is permitted at all.
    ///
    /// The last member of the tier can never be demoted; that would lock
    /// everyone out of governance permanently.
    pub fn can_demote_admin(self) -> bool {
        self.0 > 1
    }

    /// Human-readable summary of the rules in force.
    pub fn rules_description(self) -> String {
        match self.0 {
            0 => format!(
                "No level {LEVEL_MAX} members exist; the first registered member \
                 founds the tier."
            ),
            1 => format!(
                "A sole level {LEVEL_MAX} member may bootstrap-promote exactly one \
                 candidate directly; voting reopens once the tier has two members."
            ),
            2 => format!(
                "Changes to level {LEVEL_MAX} require a unanimous vote of both \
                 current members."
            ),
            _ => format!(
                "Changes to level {LEVEL_MAX} require {COUNCIL_VOTE_THRESHOLD} \
                 votes in favour from current members."
            ),
        }
    }
}
