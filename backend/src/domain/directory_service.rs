//! Member directory service.
//!
//! Read side of the directory (profiles, listings, level ledger) plus the
//! direct level change admins may apply inside levels 1 through 4. Every
//! read is shaped by the viewer's level: members above it are absent from
//! responses, and the ones below are projected through the visibility
//! filter.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Error;
use crate::domain::audit::LevelChange;
use crate::domain::level::Level;
use crate::domain::member::{Member, MemberId};
use crate::domain::ports::{
    DirectoryRepository, LevelHistoryEntry, ManualLevelChange, MemberLevelCommand, MemberProfile,
    MembersQuery, OwnProfile,
};
use crate::domain::service_support::{map_directory_error, require_active, require_member};
use crate::domain::visibility::{self, FullMember, MemberView};

/// Implements [`MembersQuery`] and [`MemberLevelCommand`] over the
/// directory store.
#[derive(Clone)]
pub struct DirectoryService<D> {
    directory: Arc<D>,
}

impl<D> DirectoryService<D>
where
    D: DirectoryRepository,
{
    /// Build the service over its store.
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Look up a member, treating invisible and missing alike.
    async fn find_visible(&self, viewer_level: Level, id: MemberId) -> Result<Member, Error> {
        self.directory
            .find_member(&id)
            .await
            .map_err(map_directory_error)?
            .filter(|member| visibility::can_see(viewer_level, member))
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Resolve a member's inviter, when the viewer may see them.
    async fn visible_inviter(
        &self,
        viewer_level: Level,
        member: &Member,
    ) -> Result<Option<MemberView>, Error> {
        let Some(inviter_id) = member.invited_by() else {
            return Ok(None);
        };
        let inviter = self
            .directory
            .find_member(&inviter_id)
            .await
            .map_err(map_directory_error)?;
        Ok(inviter
            .filter(|inviter| visibility::can_see(viewer_level, inviter))
            .map(|inviter| visibility::sanitize(viewer_level, &inviter)))
    }

    /// List a member's invitees, filtered to the ones the viewer may see.
    async fn visible_invitees(
        &self,
        viewer_level: Level,
        inviter: MemberId,
    ) -> Result<Vec<MemberView>, Error> {
        let invitees = self
            .directory
            .list_invitees(&inviter)
            .await
            .map_err(map_directory_error)?;
        Ok(visibility::filter_and_sanitize(viewer_level, &invitees))
    }
}

#[async_trait]
impl<D> MembersQuery for DirectoryService<D>
where
    D: DirectoryRepository,
{
    async fn own_profile(&self, viewer_id: MemberId) -> Result<OwnProfile, Error> {
        let member = require_member(self.directory.as_ref(), viewer_id).await?;
        let inviter = self.visible_inviter(member.level(), &member).await?;
        let invitees = self.visible_invitees(member.level(), member.id()).await?;
        Ok(OwnProfile {
            member: FullMember::from(&member),
            inviter,
            invite_count: invitees.len() as u64,
        })
    }

    async fn list_members(
        &self,
        viewer_id: MemberId,
        level: Option<Level>,
    ) -> Result<Vec<MemberView>, Error> {
        let viewer = require_member(self.directory.as_ref(), viewer_id).await?;
        // A filter above the viewer's own level answers empty rather than
        // erroring, so the response never confirms the tier is populated.
        if level.is_some_and(|level| level > viewer.level()) {
            return Ok(Vec::new());
        }
        let members = self
            .directory
            .list_members(level)
            .await
            .map_err(map_directory_error)?;
        Ok(visibility::filter_and_sanitize(viewer.level(), &members))
    }

    async fn member_profile(
        &self,
        viewer_id: MemberId,
        id: MemberId,
    ) -> Result<MemberProfile, Error> {
        let viewer = require_member(self.directory.as_ref(), viewer_id).await?;
        let subject = self.find_visible(viewer.level(), id).await?;
        let inviter = self.visible_inviter(viewer.level(), &subject).await?;
        let invitees = self.visible_invitees(viewer.level(), subject.id()).await?;
        let invite_count = invitees.len() as u64;
        Ok(MemberProfile {
            member: visibility::sanitize(viewer.level(), &subject),
            inviter,
            invitees,
            invite_count,
        })
    }

    async fn member_invitees(
        &self,
        viewer_id: MemberId,
        id: MemberId,
    ) -> Result<Vec<MemberView>, Error> {
        let viewer = require_member(self.directory.as_ref(), viewer_id).await?;
        let subject = self.find_visible(viewer.level(), id).await?;
        self.visible_invitees(viewer.level(), subject.id()).await
    }

    async fn level_history(
        &self,
        viewer_id: MemberId,
        id: MemberId,
    ) -> Result<Vec<LevelHistoryEntry>, Error> {
        let viewer = require_member(self.directory.as_ref(), viewer_id).await?;
        let subject = self.find_visible(viewer.level(), id).await?;
        let records = self
            .directory
            .level_history(&subject.id())
            .await
            .map_err(map_directory_error)?;
        let mut entries = Vec::with_capacity(records.len());
        for record in &records {
            let actor = self
                .directory
                .find_member(&record.changed_by())
                .await
                .map_err(map_directory_error)?;
            let actor_visible =
                actor.is_some_and(|actor| visibility::can_see(viewer.level(), &actor));
            entries.push(LevelHistoryEntry::from_record(record, actor_visible));
        }
        Ok(entries)
    }
}

#[async_trait]
impl<D> MemberLevelCommand for DirectoryService<D>
where
    D: DirectoryRepository,
{
    async fn set_member_level(
        &self,
        actor_id: MemberId,
        change: ManualLevelChange,
    ) -> Result<MemberView, Error> {
        let actor = require_member(self.directory.as_ref(), actor_id).await?;
        if !actor.level().is_admin() {
            return Err(Error::forbidden("Level 5 required"));
        }
        require_active(&actor)?;
        let reason = change.reason.trim();
        if reason.is_empty() {
            return Err(Error::validation_error("reason is required"));
        }
        let target = self
            .directory
            .find_member(&change.member_id)
            .await
            .map_err(map_directory_error)?
            .ok_or_else(|| Error::not_found("User not found"))?;
        if target.level().is_admin() || change.new_level.is_admin() {
            return Err(Error::invalid_transition(
                "Level 5 changes must go through a promotion vote or bootstrap",
            ));
        }
        let updated = self
            .directory
            .apply_level_change(LevelChange {
                member_id: target.id(),
                expected_level: Some(target.level()),
                new_level: change.new_level,
                changed_by: actor.id(),
                reason: reason.to_owned(),
            })
            .await
            .map_err(map_directory_error)?;
        info!(
            member_id = %updated.id(),
            new_level = %updated.level(),
            actor_id = %actor.id(),
            "member level set directly"
        );
        Ok(visibility::sanitize(actor.level(), &updated))
    }
}

#[cfg(test)]
#[path = "directory_service_tests.rs"]
mod tests;
