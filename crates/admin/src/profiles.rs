//! Profiles page.

use adminconsole_client::AdminApi;
use adminconsole_core::{Profile, ProfileDraft, ProfileId, Resource};

use crate::AdminResult;
use crate::validation::{check_unique_name, require};

pub struct ProfilesView<'a, A> {
    api: &'a A,
    profiles: Vec<Profile>,
}

impl<'a, A: AdminApi> ProfilesView<'a, A> {
    pub async fn load(api: &'a A) -> AdminResult<Self> {
        let profiles = api.list::<Profile>().await?;
        Ok(Self { api, profiles })
    }

    pub async fn refresh(&mut self) -> AdminResult<()> {
        self.profiles = self.api.list::<Profile>().await?;
        Ok(())
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn active(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter().filter(|p| p.is_active())
    }

    pub fn find(&self, id: ProfileId) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Validate a form against a fresh list of profiles.
    async fn prepare(&self, mut draft: ProfileDraft, editing: Option<ProfileId>) -> AdminResult<ProfileDraft> {
        require("profile name", &draft.name)?;
        draft.name = draft.name.trim().to_string();
        let current = self.api.list::<Profile>().await?;
        check_unique_name(&current, |p| p.name.as_str(), &draft.name, editing)?;
        Ok(draft)
    }

    /// Re-read after a mutation that already succeeded; a failed read is
    /// only logged.
    async fn settle(&mut self) {
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "could not refresh profiles after saving");
        }
    }

    pub async fn create(&mut self, draft: ProfileDraft) -> AdminResult<()> {
        let draft = self.prepare(draft, None).await?;
        self.api.create::<Profile>(&draft).await?;
        tracing::info!(name = %draft.name, "profile created");
        self.settle().await;
        Ok(())
    }

    pub async fn update(&mut self, id: ProfileId, draft: ProfileDraft) -> AdminResult<()> {
        let draft = self.prepare(draft, Some(id)).await?;
        self.api.update::<Profile>(id, &draft).await?;
        tracing::info!(%id, name = %draft.name, "profile updated");
        self.settle().await;
        Ok(())
    }

    pub async fn delete(&mut self, id: ProfileId) -> AdminResult<()> {
        self.api.delete::<Profile>(id).await?;
        tracing::info!(%id, "profile deleted");
        self.settle().await;
        Ok(())
    }
}
