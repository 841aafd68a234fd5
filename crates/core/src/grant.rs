//! Access grants: the profile × module association.

use serde::{Deserialize, Serialize};

use crate::{GrantId, ModuleId, ProfileId, Resource, Status};

/// Record making a module visible to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    #[serde(rename = "idAcceso")]
    pub id: GrantId,
    #[serde(rename = "idPerfil")]
    pub profile_id: ProfileId,
    #[serde(rename = "idModulo")]
    pub module_id: ModuleId,
    #[serde(rename = "estado", default = "Status::absent")]
    pub status: Status,
}

impl AccessGrant {
    /// Whether this record is for the given (profile, module) pair,
    /// regardless of status.
    pub fn links(&self, profile: ProfileId, module: ModuleId) -> bool {
        self.profile_id == profile && self.module_id == module
    }

    /// Same grant with a different status, ready to be sent as an update.
    pub fn with_status(&self, status: Status) -> GrantDraft {
        GrantDraft {
            profile_id: self.profile_id,
            module_id: self.module_id,
            status,
        }
    }
}

/// Create/update body for a grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantDraft {
    #[serde(rename = "idPerfil")]
    pub profile_id: ProfileId,
    #[serde(rename = "idModulo")]
    pub module_id: ModuleId,
    #[serde(rename = "estado")]
    pub status: Status,
}

impl GrantDraft {
    /// A new, active grant.
    pub fn active(profile_id: ProfileId, module_id: ModuleId) -> Self {
        Self {
            profile_id,
            module_id,
            status: Status::Active,
        }
    }
}

impl Resource for AccessGrant {
    type Id = GrantId;
    type Draft = GrantDraft;

    const COLLECTION: &'static str = "/accesos";
    const ID_FIELD: &'static str = "idAcceso";
    const KIND: &'static str = "access grant";

    fn id(&self) -> GrantId {
        self.id
    }

    fn status(&self) -> Status {
        self.status
    }
}

/// First grant recorded for a (profile, module) pair, whatever its status.
///
/// Duplicate pairs are tolerated: the earliest record wins.
pub fn find_grant(
    grants: &[AccessGrant],
    profile: ProfileId,
    module: ModuleId,
) -> Option<&AccessGrant> {
    grants.iter().find(|g| g.links(profile, module))
}

/// Whether any active grant exists for the pair.
pub fn has_access(grants: &[AccessGrant], profile: ProfileId, module: ModuleId) -> bool {
    grants
        .iter()
        .any(|g| g.links(profile, module) && g.status.is_active())
}
