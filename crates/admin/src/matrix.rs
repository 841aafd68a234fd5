//! Permission matrix: profiles × modules.
//!
//! The backend stores access as a sparse list of grants. This view lays it
//! out as a grid (one row per module, one column per profile) and edits it
//! one grant at a time.

use std::collections::HashSet;

use adminconsole_client::{AdminApi, ApiError};
use adminconsole_core::{
    AccessGrant, DomainError, GrantDraft, Module, ModuleId, Profile, ProfileId, Resource, Status,
    find_grant, has_access, sort_by_order,
};

use crate::{AdminError, AdminResult};

/// One grid row: a module and whether each profile column may open it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow<'m> {
    pub module: &'m Module,
    /// Same order as [`AccessMatrix::profiles`].
    pub cells: Vec<bool>,
}

/// What a permission copy changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Profiles that received the copy.
    pub targets: usize,
    pub created: usize,
    pub reactivated: usize,
    /// Grants that were already active.
    pub unchanged: usize,
}

impl CopyReport {
    pub fn applied(&self) -> usize {
        self.created + self.reactivated
    }
}

pub struct AccessMatrix<'a, A> {
    api: &'a A,
    profiles: Vec<Profile>,
    modules: Vec<Module>,
    grants: Vec<AccessGrant>,
}

impl<'a, A: AdminApi> AccessMatrix<'a, A> {
    pub async fn load(api: &'a A) -> AdminResult<Self> {
        let mut matrix = Self {
            api,
            profiles: Vec::new(),
            modules: Vec::new(),
            grants: Vec::new(),
        };
        matrix.refresh().await?;
        Ok(matrix)
    }

    /// Re-read profiles, modules and grants. Only active profiles and
    /// modules take part in the grid.
    pub async fn refresh(&mut self) -> AdminResult<()> {
        let (profiles, modules, grants) = tokio::try_join!(
            self.api.list::<Profile>(),
            self.api.list::<Module>(),
            self.api.list::<AccessGrant>(),
        )?;

        self.profiles = profiles.into_iter().filter(|p| p.is_active()).collect();
        self.modules = modules.into_iter().filter(|m| m.is_active()).collect();
        sort_by_order(&mut self.modules);
        self.grants = grants;

        tracing::debug!(
            profiles = self.profiles.len(),
            modules = self.modules.len(),
            grants = self.grants.len(),
            "access matrix loaded"
        );
        Ok(())
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn grants(&self) -> &[AccessGrant] {
        &self.grants
    }

    pub fn has_access(&self, profile: ProfileId, module: ModuleId) -> bool {
        has_access(&self.grants, profile, module)
    }

    pub fn grid(&self) -> Vec<MatrixRow<'_>> {
        self.modules
            .iter()
            .map(|module| MatrixRow {
                module,
                cells: self
                    .profiles
                    .iter()
                    .map(|p| self.has_access(p.id, module.id))
                    .collect(),
            })
            .collect()
    }

    /// Flip one cell.
    ///
    /// An existing grant (whatever its status) is updated with the opposite
    /// status; otherwise an active grant is created. Returns whether the
    /// profile has access afterwards, as recorded by the backend, or as
    /// written when the matrix cannot be re-read.
    pub async fn toggle(&mut self, profile: ProfileId, module: ModuleId) -> AdminResult<bool> {
        let granted = match find_grant(&self.grants, profile, module) {
            Some(grant) => {
                let draft = grant.with_status(grant.status.flipped());
                self.api.update::<AccessGrant>(grant.id, &draft).await?;
                tracing::info!(%profile, %module, grant = %grant.id, status = %draft.status, "grant toggled");
                draft.status.is_active()
            }
            None => {
                self.api
                    .create::<AccessGrant>(&GrantDraft::active(profile, module))
                    .await?;
                tracing::info!(%profile, %module, "grant created");
                true
            }
        };

        match self.refresh().await {
            Ok(()) => Ok(self.has_access(profile, module)),
            Err(err) => {
                tracing::warn!(error = %err, "could not refresh the matrix after toggling");
                Ok(granted)
            }
        }
    }

    /// Give every other active profile the modules `source` can open.
    ///
    /// Runs one request at a time and stops at the first failure; changes
    /// made before it stay in place and are counted in
    /// [`AdminError::CopyInterrupted`]. The snapshot is refreshed either way.
    pub async fn copy_permissions(&mut self, source: ProfileId) -> AdminResult<CopyReport> {
        if !self.profiles.iter().any(|p| p.id == source) {
            return Err(DomainError::not_found(format!("profile {source} is not an active profile")).into());
        }

        let mut seen = HashSet::new();
        let source_modules: Vec<ModuleId> = self
            .grants
            .iter()
            .filter(|g| g.profile_id == source && g.status.is_active())
            .map(|g| g.module_id)
            .filter(|m| seen.insert(*m))
            .collect();
        let targets: Vec<ProfileId> = self
            .profiles
            .iter()
            .map(|p| p.id)
            .filter(|p| *p != source)
            .collect();

        let mut report = CopyReport {
            targets: targets.len(),
            ..CopyReport::default()
        };
        let outcome = self.apply_copy(&targets, &source_modules, &mut report).await;

        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "could not refresh the matrix after copying");
        }

        match outcome {
            Ok(()) => {
                tracing::info!(
                    %source,
                    targets = report.targets,
                    created = report.created,
                    reactivated = report.reactivated,
                    unchanged = report.unchanged,
                    "permissions copied"
                );
                Ok(report)
            }
            Err(source_err) => {
                tracing::warn!(%source, applied = report.applied(), error = %source_err, "permission copy interrupted");
                Err(AdminError::CopyInterrupted {
                    applied: report.applied(),
                    source: source_err,
                })
            }
        }
    }

    async fn apply_copy(
        &self,
        targets: &[ProfileId],
        modules: &[ModuleId],
        report: &mut CopyReport,
    ) -> Result<(), ApiError> {
        for &profile in targets {
            for &module in modules {
                match find_grant(&self.grants, profile, module) {
                    Some(grant) if grant.status.is_active() => report.unchanged += 1,
                    Some(grant) => {
                        let draft = grant.with_status(Status::Active);
                        self.api.update::<AccessGrant>(grant.id, &draft).await?;
                        report.reactivated += 1;
                    }
                    None => {
                        self.api
                            .create::<AccessGrant>(&GrantDraft::active(profile, module))
                            .await?;
                        report.created += 1;
                    }
                }
            }
        }
        Ok(())
    }

    /// Modules the backend lets `profile` open.
    pub async fn allowed_modules(&self, profile: ProfileId) -> AdminResult<Vec<Module>> {
        crate::session::allowed_modules(self.api, profile).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminconsole_client::InMemoryBackend;
    use adminconsole_core::GrantId;

    fn profile(id: i64, status: Status) -> Profile {
        Profile {
            id: ProfileId::new(id),
            name: format!("P{id}"),
            status,
        }
    }

    fn module(id: i64, order: i32) -> Module {
        Module {
            id: ModuleId::new(id),
            name: format!("M{id}"),
            order: Some(order),
            status: Status::Active,
        }
    }

    fn grant(id: i64, profile: i64, module: i64, status: Status) -> AccessGrant {
        AccessGrant {
            id: GrantId::new(id),
            profile_id: ProfileId::new(profile),
            module_id: ModuleId::new(module),
            status,
        }
    }

    /// Profiles 1-3 active, 4 inactive; modules 10 and 11.
    /// Profile 1 has both modules, profile 2 has an inactive grant for 10.
    fn backend() -> InMemoryBackend {
        let api = InMemoryBackend::new();
        for p in [
            profile(1, Status::Active),
            profile(2, Status::Active),
            profile(3, Status::Active),
            profile(4, Status::Inactive),
        ] {
            api.seed(&p).unwrap();
        }
        api.seed(&module(11, 2)).unwrap();
        api.seed(&module(10, 1)).unwrap();
        for g in [
            grant(100, 1, 10, Status::Active),
            grant(101, 1, 11, Status::Active),
            grant(102, 1, 11, Status::Active),
            grant(103, 2, 10, Status::Inactive),
        ] {
            api.seed(&g).unwrap();
        }
        api
    }

    #[tokio::test]
    async fn grid_has_a_row_per_module() {
        let api = backend();
        let matrix = AccessMatrix::load(&api).await.unwrap();

        assert_eq!(matrix.profiles().len(), 3);
        let grid = matrix.grid();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].module.id, ModuleId::new(10));
        assert_eq!(grid[0].cells, [true, false, false]);
        assert_eq!(grid[1].cells, [true, false, false]);
    }

    #[tokio::test]
    async fn toggle_creates_then_flips() {
        let api = backend();
        let mut matrix = AccessMatrix::load(&api).await.unwrap();
        let (p3, m10) = (ProfileId::new(3), ModuleId::new(10));

        assert!(matrix.toggle(p3, m10).await.unwrap());
        let created: Vec<_> = matrix.grants().iter().filter(|g| g.links(p3, m10)).collect();
        assert_eq!(created.len(), 1);
        let created_id = created[0].id;

        assert!(!matrix.toggle(p3, m10).await.unwrap());
        let after = matrix.grants().iter().filter(|g| g.links(p3, m10)).count();
        assert_eq!(after, 1);
        assert_eq!(
            api.snapshot::<AccessGrant>()
                .into_iter()
                .find(|g| g.id == created_id)
                .unwrap()
                .status,
            Status::Inactive
        );
    }

    #[tokio::test]
    async fn toggle_reactivates_an_inactive_grant() {
        let api = backend();
        let mut matrix = AccessMatrix::load(&api).await.unwrap();
        assert!(matrix.toggle(ProfileId::new(2), ModuleId::new(10)).await.unwrap());
        assert_eq!(matrix.grants().len(), 4);
    }

    #[tokio::test]
    async fn copy_grants_source_modules_to_other_active_profiles() {
        let api = backend();
        let mut matrix = AccessMatrix::load(&api).await.unwrap();

        let report = matrix.copy_permissions(ProfileId::new(1)).await.unwrap();
        assert_eq!(
            report,
            CopyReport {
                targets: 2,
                created: 3,
                reactivated: 1,
                unchanged: 0,
            }
        );
        for row in matrix.grid() {
            assert!(row.cells.iter().all(|c| *c), "module {} not copied", row.module.id);
        }
        // The inactive profile is left alone.
        assert!(!matrix.has_access(ProfileId::new(4), ModuleId::new(10)));

        // Running it again changes nothing.
        let again = matrix.copy_permissions(ProfileId::new(1)).await.unwrap();
        assert_eq!(again.applied(), 0);
        assert_eq!(again.unchanged, 4);
    }

    #[tokio::test]
    async fn copy_stops_at_the_first_failure_and_keeps_applied_changes() {
        let api = backend();
        let mut matrix = AccessMatrix::load(&api).await.unwrap();
        api.fail_mutations_after(2);

        let err = matrix.copy_permissions(ProfileId::new(1)).await.unwrap_err();
        match err {
            AdminError::CopyInterrupted { applied, source } => {
                assert_eq!(applied, 2);
                assert!(matches!(source, ApiError::Status { status: 500, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(api.mutation_count(), 2);
        // Profile 2 got both modules before the failure; profile 3 got none.
        assert!(matrix.has_access(ProfileId::new(2), ModuleId::new(10)));
        assert!(matrix.has_access(ProfileId::new(2), ModuleId::new(11)));
        assert!(!matrix.has_access(ProfileId::new(3), ModuleId::new(10)));
    }

    #[tokio::test]
    async fn copy_from_unknown_profile_is_rejected() {
        let api = backend();
        let mut matrix = AccessMatrix::load(&api).await.unwrap();
        let err = matrix.copy_permissions(ProfileId::new(4)).await.unwrap_err();
        assert!(matches!(err, AdminError::Domain(DomainError::NotFound(_))));
        assert_eq!(api.mutation_count(), 0);
    }

    #[tokio::test]
    async fn allowed_modules_follow_active_grants() {
        let api = backend();
        let matrix = AccessMatrix::load(&api).await.unwrap();
        let allowed = matrix.allowed_modules(ProfileId::new(1)).await.unwrap();
        let ids: Vec<_> = allowed.iter().map(|m| m.id).collect();
        assert_eq!(ids, [ModuleId::new(10), ModuleId::new(11)]);
        assert!(matrix.allowed_modules(ProfileId::new(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggle_reports_the_saved_state_when_the_refresh_fails() {
        let api = backend();
        let mut matrix = AccessMatrix::load(&api).await.unwrap();
        api.fail_reads(true);

        assert!(matrix.toggle(ProfileId::new(3), ModuleId::new(10)).await.unwrap());
        assert!(!matrix.toggle(ProfileId::new(1), ModuleId::new(10)).await.unwrap());
        let saved = api.snapshot::<AccessGrant>();
        assert!(has_access(&saved, ProfileId::new(3), ModuleId::new(10)));
        assert!(!has_access(&saved, ProfileId::new(1), ModuleId::new(10)));
    }

    #[tokio::test]
    async fn failed_toggle_surfaces_the_api_error() {
        let api = backend();
        let mut matrix = AccessMatrix::load(&api).await.unwrap();
        api.fail_mutations_after(0);
        let err = matrix.toggle(ProfileId::new(3), ModuleId::new(10)).await.unwrap_err();
        assert!(matches!(err, AdminError::Api(ApiError::Status { status: 500, .. })));
    }
}
