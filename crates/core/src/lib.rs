//! `adminconsole-core`: records and identifiers shared by every layer.
//!
//! This crate contains the backend's entity shapes (as seen on the wire) and
//! the small amount of pure logic attached to them. No IO lives here.

pub mod error;
pub mod grant;
pub mod id;
pub mod module;
pub mod name;
pub mod profile;
pub mod resource;
pub mod status;
pub mod user;
mod wire;

pub use error::{DomainError, DomainResult};
pub use grant::{AccessGrant, GrantDraft, find_grant, has_access};
pub use id::{BranchId, GrantId, ModuleId, ProfileId, UserId};
pub use module::{Module, ModuleDraft, sort_by_order};
pub use name::names_match;
pub use profile::{Profile, ProfileDraft};
pub use resource::Resource;
pub use status::Status;
pub use user::{User, UserDraft};
