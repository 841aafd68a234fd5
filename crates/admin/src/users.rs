//! Users page: list, filter, stats and the user form.

use std::collections::BTreeMap;

use adminconsole_client::AdminApi;
use adminconsole_core::{
    DomainError, DomainResult, Profile, ProfileId, Resource, Status, User, UserDraft, UserId,
    names_match,
};

use crate::validation::{check_password, require};
use crate::{AdminError, AdminResult};

/// Label shown when a user's profile is unset or unknown.
pub const NO_PROFILE: &str = "No profile";

/// A user joined with the name of their profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub user: User,
    pub profile_name: String,
}

/// List filter.
///
/// With no `status` only active users are shown; setting one replaces that
/// default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub profile: Option<ProfileId>,
    pub status: Option<Status>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        let wanted = self.status.unwrap_or(Status::Active);
        user.status == wanted && self.profile.is_none_or(|p| user.profile_id == Some(p))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// Row count per profile name.
    pub per_profile: BTreeMap<String, usize>,
}

impl UserStats {
    pub fn of(rows: &[UserRow]) -> Self {
        let mut stats = Self {
            total: rows.len(),
            ..Self::default()
        };
        for row in rows {
            if row.user.status.is_active() {
                stats.active += 1;
            } else {
                stats.inactive += 1;
            }
            *stats.per_profile.entry(row.profile_name.clone()).or_default() += 1;
        }
        stats
    }
}

/// Check a user form and normalise it for sending.
///
/// Text fields are trimmed. On update a blank password means "keep the
/// current one" and is dropped from the body.
pub fn validate_user(mut draft: UserDraft, creating: bool) -> DomainResult<UserDraft> {
    require("first name", &draft.first_name)?;
    require("last names", &draft.last_name)?;
    require("document id", &draft.document_id)?;
    require("login", &draft.login)?;
    if draft.profile_id.is_none() {
        return Err(DomainError::validation("profile is required"));
    }

    draft.first_name = draft.first_name.trim().to_string();
    draft.last_name = draft.last_name.trim().to_string();
    draft.document_id = draft.document_id.trim().to_string();
    draft.phone = draft.phone.trim().to_string();
    draft.login = draft.login.trim().to_string();

    if draft.password.as_deref().is_some_and(str::is_empty) {
        draft.password = None;
    }
    match draft.password.as_deref() {
        Some(password) => check_password(password)?,
        None if creating => return Err(DomainError::validation("password is required")),
        None => {}
    }
    Ok(draft)
}

/// Snapshot of users and profiles for the users page.
pub struct UsersView<'a, A> {
    api: &'a A,
    users: Vec<User>,
    profiles: Vec<Profile>,
}

impl<'a, A: AdminApi> UsersView<'a, A> {
    pub async fn load(api: &'a A) -> AdminResult<Self> {
        let mut view = Self {
            api,
            users: Vec::new(),
            profiles: Vec::new(),
        };
        view.refresh().await?;
        Ok(view)
    }

    pub async fn refresh(&mut self) -> AdminResult<()> {
        let (users, profiles) = tokio::try_join!(self.api.list::<User>(), self.api.list::<Profile>())?;
        tracing::debug!(users = users.len(), profiles = profiles.len(), "users page loaded");
        self.users = users;
        self.profiles = profiles;
        Ok(())
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn find(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn profile_name(&self, id: Option<ProfileId>) -> String {
        id.and_then(|id| self.profiles.iter().find(|p| p.id == id))
            .map_or_else(|| NO_PROFILE.to_string(), |p| p.name.clone())
    }

    fn row(&self, user: &User) -> UserRow {
        UserRow {
            user: user.clone(),
            profile_name: self.profile_name(user.profile_id),
        }
    }

    /// Every user, unfiltered.
    pub fn rows(&self) -> Vec<UserRow> {
        self.users.iter().map(|u| self.row(u)).collect()
    }

    pub fn filtered(&self, filter: &UserFilter) -> Vec<UserRow> {
        self.users
            .iter()
            .filter(|u| filter.matches(u))
            .map(|u| self.row(u))
            .collect()
    }

    /// Profiles a user may be assigned to.
    pub fn assignable_profiles(&self) -> Vec<&Profile> {
        self.profiles.iter().filter(|p| p.is_active()).collect()
    }

    pub async fn create(&mut self, draft: UserDraft) -> AdminResult<()> {
        let draft = validate_user(draft, true)?;
        self.ensure_login_free(&draft.login).await?;

        self.api.create::<User>(&draft).await?;
        tracing::info!(login = %draft.login, "user created");
        self.settle().await;
        Ok(())
    }

    pub async fn update(&mut self, id: UserId, draft: UserDraft) -> AdminResult<()> {
        let draft = validate_user(draft, false)?;
        self.api.update::<User>(id, &draft).await?;
        tracing::info!(%id, "user updated");
        self.settle().await;
        Ok(())
    }

    pub async fn delete(&mut self, id: UserId) -> AdminResult<()> {
        self.api.delete::<User>(id).await?;
        tracing::info!(%id, "user deleted");
        self.settle().await;
        Ok(())
    }

    /// Re-read after a saved change. A failed read only leaves the snapshot
    /// stale.
    async fn settle(&mut self) {
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "could not refresh users after saving");
        }
    }

    /// Scan a fresh user list for the login. A failed fetch does not block
    /// the save; the backend has the last word.
    async fn ensure_login_free(&self, login: &str) -> AdminResult<()> {
        match self.api.list::<User>().await {
            Ok(users) if users.iter().any(|u| names_match(&u.login, login)) => Err(
                AdminError::Domain(DomainError::duplicate(format!("login \"{login}\" already exists"))),
            ),
            Ok(_) => Ok(()),
            Err(err) => {
                tracing::warn!(error = %err, "could not check for duplicate login; saving anyway");
                Ok(())
            }
        }
    }
}
