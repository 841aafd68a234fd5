//! In-process backend.
//!
//! Stores every collection as JSON objects keyed by id, so it behaves like
//! the real backend at the wire level: ids are assigned on create, updates
//! merge over the stored record, and passwords are accepted but never read
//! back.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use adminconsole_auth::{Credentials, LoginResponse, SessionUser};
use adminconsole_core::{
    AccessGrant, Module, Profile, ProfileId, Resource, User, UserId, has_access, sort_by_order,
};

use crate::{AdminApi, ApiError};

const PASSWORD_FIELD: &str = "contrasena";

#[derive(Default)]
struct MemoryState {
    collections: HashMap<&'static str, BTreeMap<i64, Map<String, Value>>>,
    next_id: i64,
    mutations: usize,
    fail_after: Option<usize>,
    reads_down: bool,
}

impl MemoryState {
    fn collection(&mut self, name: &'static str) -> &mut BTreeMap<i64, Map<String, Value>> {
        self.collections.entry(name).or_default()
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Count a mutation, failing it once the injected budget is spent.
    fn admit_mutation(&mut self) -> Result<(), ApiError> {
        if let Some(limit) = self.fail_after {
            if self.mutations >= limit {
                return Err(ApiError::status(500, "injected failure"));
            }
        }
        self.mutations += 1;
        Ok(())
    }

    fn admit_read(&self) -> Result<(), ApiError> {
        if self.reads_down {
            return Err(ApiError::status(503, "injected read failure"));
        }
        Ok(())
    }
}

/// An [`AdminApi`] that keeps everything in memory.
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<MemoryState>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert a record as-is (its id included). Seeding does not count as a
    /// mutation.
    pub fn seed<R: Resource>(&self, record: &R) -> Result<(), ApiError> {
        let object = to_object(record)?;
        let id = id_key::<R>(record.id())?;
        let mut state = self.lock();
        state.next_id = state.next_id.max(id);
        state.collection(R::COLLECTION).insert(id, object);
        Ok(())
    }

    /// Seed a user together with the password it logs in with.
    pub fn seed_user(&self, user: &User, password: &str) -> Result<(), ApiError> {
        let mut object = to_object(user)?;
        object.insert(PASSWORD_FIELD.to_string(), Value::from(password));
        let mut state = self.lock();
        state.next_id = state.next_id.max(user.id.get());
        state.collection(User::COLLECTION).insert(user.id.get(), object);
        Ok(())
    }

    /// Make every mutation after the first `n` fail with a 500.
    pub fn fail_mutations_after(&self, n: usize) {
        self.lock().fail_after = Some(n);
    }

    /// Make every read (`list`, `get`, derived endpoint) fail with a 503
    /// while `down` is set. Mutations are unaffected.
    pub fn fail_reads(&self, down: bool) {
        self.lock().reads_down = down;
    }

    /// Number of mutations accepted so far.
    pub fn mutation_count(&self) -> usize {
        self.lock().mutations
    }

    /// Synchronous view of a collection.
    pub fn snapshot<R: Resource>(&self) -> Vec<R> {
        let mut state = self.lock();
        state
            .collection(R::COLLECTION)
            .values()
            .filter_map(|object| decode::<R>(object).ok())
            .collect()
    }

    /// Stored password for a user, if any (lets tests check what was sent).
    pub fn stored_password(&self, user: UserId) -> Option<String> {
        let mut state = self.lock();
        state
            .collection(User::COLLECTION)
            .get(&user.get())
            .and_then(|o| o.get(PASSWORD_FIELD))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>, ApiError> {
    match serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::Decode(format!("expected a JSON object, got {other}"))),
    }
}

fn id_key<R: Resource>(id: R::Id) -> Result<i64, ApiError> {
    serde_json::to_value(id)
        .ok()
        .and_then(|v| v.as_i64())
        .ok_or_else(|| ApiError::Decode(format!("{} id is not an integer", R::KIND)))
}

fn decode<R: Resource>(object: &Map<String, Value>) -> Result<R, ApiError> {
    let mut visible = object.clone();
    visible.remove(PASSWORD_FIELD);
    serde_json::from_value(Value::Object(visible)).map_err(|e| ApiError::Decode(e.to_string()))
}

fn not_found<R: Resource>(id: i64) -> ApiError {
    ApiError::status(404, format!("{} {} not found", R::KIND, id))
}

#[async_trait]
impl AdminApi for InMemoryBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let mut state = self.lock();

        let (id, record) = state
            .collection(User::COLLECTION)
            .iter()
            .find(|(_, o)| {
                o.get("nombreUsuarioLogin").and_then(Value::as_str) == Some(credentials.login.as_str())
                    && o.get(PASSWORD_FIELD).and_then(Value::as_str) == Some(credentials.password.as_str())
                    && o.get("estado").and_then(Value::as_i64) == Some(1)
            })
            .map(|(id, o)| (*id, o.clone()))
            .ok_or(ApiError::InvalidCredentials)?;

        let user: User = decode(&record)?;
        let profile_name = user.profile_id.and_then(|pid| {
            state
                .collection(Profile::COLLECTION)
                .get(&pid.get())
                .and_then(|p| p.get("nombrePerfil"))
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        Ok(LoginResponse {
            token: format!("memory-token-{id}"),
            user: SessionUser {
                id: Some(user.id),
                first_name: Some(user.first_name),
                login: Some(user.login),
                profile_name,
                profile_id: user.profile_id,
                extra: Map::new(),
            },
        })
    }

    async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        let mut state = self.lock();
        state.admit_read()?;
        state
            .collection(R::COLLECTION)
            .values()
            .map(decode::<R>)
            .collect()
    }

    async fn get<R: Resource>(&self, id: R::Id) -> Result<R, ApiError> {
        let key = id_key::<R>(id)?;
        let mut state = self.lock();
        state.admit_read()?;
        let object = state
            .collection(R::COLLECTION)
            .get(&key)
            .ok_or_else(|| not_found::<R>(key))?;
        decode(object)
    }

    async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<(), ApiError> {
        let mut object = to_object(draft)?;
        let mut state = self.lock();
        state.admit_mutation()?;

        let id = state.allocate_id();
        object.insert(R::ID_FIELD.to_string(), Value::from(id));
        state.collection(R::COLLECTION).insert(id, object);
        Ok(())
    }

    async fn update<R: Resource>(&self, id: R::Id, draft: &R::Draft) -> Result<(), ApiError> {
        let key = id_key::<R>(id)?;
        let changes = to_object(draft)?;
        let mut state = self.lock();
        if !state.collection(R::COLLECTION).contains_key(&key) {
            return Err(not_found::<R>(key));
        }
        state.admit_mutation()?;

        if let Some(stored) = state.collection(R::COLLECTION).get_mut(&key) {
            for (field, value) in changes {
                stored.insert(field, value);
            }
            stored.insert(R::ID_FIELD.to_string(), Value::from(key));
        }
        Ok(())
    }

    async fn delete<R: Resource>(&self, id: R::Id) -> Result<(), ApiError> {
        let key = id_key::<R>(id)?;
        let mut state = self.lock();
        if !state.collection(R::COLLECTION).contains_key(&key) {
            return Err(not_found::<R>(key));
        }
        state.admit_mutation()?;
        state.collection(R::COLLECTION).remove(&key);
        Ok(())
    }

    async fn modules_for_profile(&self, profile: ProfileId) -> Result<Vec<Module>, ApiError> {
        let grants: Vec<AccessGrant> = self.list().await?;
        let modules: Vec<Module> = self.list().await?;

        let mut allowed: Vec<Module> = modules
            .into_iter()
            .filter(|m| m.status.is_active())
            .filter(|m| has_access(&grants, profile, m.id))
            .collect();
        sort_by_order(&mut allowed);
        Ok(allowed)
    }
}
