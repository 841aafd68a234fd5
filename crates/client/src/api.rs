//! The backend seam.

use async_trait::async_trait;

use adminconsole_auth::{Credentials, LoginResponse};
use adminconsole_core::{Module, ProfileId, Resource};

use crate::ApiError;

/// Everything the console asks of the backend.
///
/// Mutations return nothing: callers re-fetch their snapshot afterwards, so
/// the backend's echo (if any) is never relied upon.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `POST /restful/usuarios/login`.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError>;

    async fn get<R: Resource>(&self, id: R::Id) -> Result<R, ApiError>;

    async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<(), ApiError>;

    async fn update<R: Resource>(&self, id: R::Id, draft: &R::Draft) -> Result<(), ApiError>;

    async fn delete<R: Resource>(&self, id: R::Id) -> Result<(), ApiError>;

    /// Modules a profile is allowed to see (derived server-side from its
    /// active grants).
    async fn modules_for_profile(&self, profile: ProfileId) -> Result<Vec<Module>, ApiError>;
}

/// Path of one record inside a collection.
pub fn item_path<R: Resource>(id: R::Id) -> String {
    format!("{}/{}", R::COLLECTION, id)
}

/// Path of the derived "modules for profile" endpoint.
pub fn profile_modules_path(profile: ProfileId) -> String {
    format!("/accesos/perfil/{profile}/modulos")
}

/// Login endpoint.
pub const LOGIN_PATH: &str = "/restful/usuarios/login";
