//! `adminconsole-client`
//!
//! **Responsibility:** talk to the administration backend.
//!
//! - [`AdminApi`]: the seam every view-model is written against
//! - [`HttpBackend`]: the REST implementation (bearer auth, timeout, GET retry,
//!   401 handling)
//! - [`InMemoryBackend`]: an in-process stand-in with the same observable
//!   behaviour, for tests and demos

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;

pub use api::AdminApi;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::HttpBackend;
pub use memory::InMemoryBackend;
