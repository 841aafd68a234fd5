//! Resource trait: a record type served by one REST collection.

use core::fmt::{Debug, Display};
use core::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::Status;

/// A backend collection and the record it serves.
///
/// Every resource maps one to one onto a REST collection:
/// `GET|POST {COLLECTION}` and `GET|PUT|DELETE {COLLECTION}/{id}`.
pub trait Resource: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Strongly-typed record identifier.
    type Id: Copy + Eq + Hash + Debug + Display + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Create/update body (the record without its id).
    type Draft: Serialize + Debug + Send + Sync;

    /// Collection path, relative to the API base URL.
    const COLLECTION: &'static str;

    /// Name of the JSON field holding the record id.
    const ID_FIELD: &'static str;

    /// Short human name used in logs and notices.
    const KIND: &'static str;

    fn id(&self) -> Self::Id;

    fn status(&self) -> Status;

    fn is_active(&self) -> bool {
        self.status().is_active()
    }
}
