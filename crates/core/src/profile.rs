//! Profile (role) records.

use serde::{Deserialize, Serialize};

use crate::wire::null_as_empty;
use crate::{ProfileId, Resource, Status};

/// A named role grouping module permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "idPerfil")]
    pub id: ProfileId,
    #[serde(rename = "nombrePerfil", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "estado", default = "Status::absent")]
    pub status: Status,
}

/// Create/update body for a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    #[serde(rename = "nombrePerfil")]
    pub name: String,
    #[serde(rename = "estado")]
    pub status: Status,
}

impl ProfileDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Status::Active,
        }
    }
}

impl From<&Profile> for ProfileDraft {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            status: profile.status,
        }
    }
}

impl Resource for Profile {
    type Id = ProfileId;
    type Draft = ProfileDraft;

    const COLLECTION: &'static str = "/perfiles";
    const ID_FIELD: &'static str = "idPerfil";
    const KIND: &'static str = "profile";

    fn id(&self) -> ProfileId {
        self.id
    }

    fn status(&self) -> Status {
        self.status
    }
}
