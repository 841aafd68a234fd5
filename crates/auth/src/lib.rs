//! `adminconsole-auth`: the operator's session.
//!
//! Holds the bearer token and the signed-in user, persists them locally so a
//! later run starts authenticated, and forgets them on logout or when the
//! backend rejects the token. No HTTP lives here.

pub mod holder;
pub mod session;
pub mod store;

pub use holder::SessionHolder;
pub use session::{Credentials, LoginResponse, Session, SessionUser};
pub use store::{FileSessionStore, MemorySessionStore, SessionError, SessionStore};
