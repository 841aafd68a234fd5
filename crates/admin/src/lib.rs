//! `adminconsole-admin`: view-models for the administration console.
//!
//! Each view owns the snapshot it fetched, validates forms locally, sends
//! the mutation through an [`AdminApi`](adminconsole_client::AdminApi) and
//! re-fetches. Outcomes are reported as [`Notice`]s for the surface to show.

pub mod error;
pub mod listing;
pub mod matrix;
pub mod modules;
pub mod notice;
pub mod profiles;
pub mod session;
pub mod users;
pub mod validation;

pub use error::{AdminError, AdminResult};
pub use listing::{DEFAULT_PAGE_SIZE, Page, paginate};
pub use matrix::{AccessMatrix, CopyReport, MatrixRow};
pub use modules::ModulesView;
pub use notice::{Notice, NoticeLevel};
pub use profiles::ProfilesView;
pub use users::{UserFilter, UserRow, UserStats, UsersView};
