//! User account records.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wire::null_as_empty;
use crate::{BranchId, ProfileId, Resource, Status, UserId};

/// A user account as returned by the backend.
///
/// The password is write-only: the backend never returns it and this record
/// has no field for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "idUsuario")]
    pub id: UserId,
    #[serde(rename = "nombreUsuario", default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(rename = "apellidos", default, deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(rename = "dniUsuario", default, deserialize_with = "null_as_empty")]
    pub document_id: String,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "nombreUsuarioLogin", default, deserialize_with = "null_as_empty")]
    pub login: String,
    #[serde(rename = "rolId", default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<ProfileId>,
    #[serde(rename = "idSucursal", default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
    #[serde(rename = "estado", default = "Status::absent")]
    pub status: Status,
    #[serde(rename = "ultimoLogin", default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Last login as a UTC timestamp.
    ///
    /// The backend sends either RFC 3339 or a zone-less ISO timestamp; the
    /// latter is read as UTC. Unparseable values yield `None`.
    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_login.as_deref()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }
}

/// Create/update body for a user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    #[serde(rename = "nombreUsuario")]
    pub first_name: String,
    #[serde(rename = "apellidos")]
    pub last_name: String,
    #[serde(rename = "dniUsuario")]
    pub document_id: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "nombreUsuarioLogin")]
    pub login: String,
    /// `None` leaves the stored password unchanged on update.
    #[serde(rename = "contrasena", default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "rolId")]
    pub profile_id: Option<ProfileId>,
    #[serde(rename = "estado")]
    pub status: Status,
    #[serde(rename = "idSucursal")]
    pub branch_id: BranchId,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            document_id: String::new(),
            phone: String::new(),
            login: String::new(),
            password: None,
            profile_id: None,
            status: Status::Active,
            branch_id: BranchId::default(),
        }
    }
}

impl From<&User> for UserDraft {
    /// Edit form for an existing user; the password starts empty.
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            document_id: user.document_id.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            login: user.login.clone(),
            password: None,
            profile_id: user.profile_id,
            status: user.status,
            branch_id: user.branch_id.unwrap_or_default(),
        }
    }
}

// Hand-written so the password never reaches a log line.
impl core::fmt::Debug for UserDraft {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserDraft")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("document_id", &self.document_id)
            .field("phone", &self.phone)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("profile_id", &self.profile_id)
            .field("status", &self.status)
            .field("branch_id", &self.branch_id)
            .finish()
    }
}

impl Resource for User {
    type Id = UserId;
    type Draft = UserDraft;

    const COLLECTION: &'static str = "/restful/usuarios";
    const ID_FIELD: &'static str = "idUsuario";
    const KIND: &'static str = "user";

    fn id(&self) -> UserId {
        self.id
    }

    fn status(&self) -> Status {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIRE: &str = r#"{
        "idUsuario": 12,
        "nombreUsuario": "Ana",
        "apellidos": "Quispe Rojas",
        "dniUsuario": "45871236",
        "telefono": null,
        "nombreUsuarioLogin": "aquispe",
        "rolId": 2,
        "idSucursal": 1,
        "estado": 1,
        "ultimoLogin": "2024-05-02T14:31:07"
    }"#;

    #[test]
    fn decodes_backend_record() {
        let user: User = serde_json::from_str(WIRE).unwrap();
        assert_eq!(user.id, UserId::new(12));
        assert_eq!(user.full_name(), "Ana Quispe Rojas");
        assert_eq!(user.profile_id, Some(ProfileId::new(2)));
        assert_eq!(user.phone, None);
        let at = user.last_login_at().unwrap();
        assert_eq!(at.to_rfc3339(), "2024-05-02T14:31:07+00:00");
    }

    #[test]
    fn null_text_fields_decode_as_empty() {
        let json = r#"{
            "idUsuario": 5,
            "nombreUsuario": "Lucia",
            "apellidos": null,
            "dniUsuario": null,
            "telefono": null,
            "nombreUsuarioLogin": "lucia",
            "rolId": null,
            "estado": null
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.last_name, "");
        assert_eq!(user.document_id, "");
        assert_eq!(user.full_name(), "Lucia");
        assert_eq!(user.profile_id, None);
        assert_eq!(user.status, Status::Inactive);
    }

    #[test]
    fn password_is_ignored_on_read() {
        let json = r#"{"idUsuario": 1, "nombreUsuario": "x", "nombreUsuarioLogin": "x", "contrasena": "secret", "estado": 1}"#;
        let user: User = serde_json::from_str(json).unwrap();
        let back = serde_json::to_value(&user).unwrap();
        assert!(back.get("contrasena").is_none());
    }

    #[test]
    fn empty_password_is_left_out_of_the_body() {
        let user: User = serde_json::from_str(WIRE).unwrap();
        let draft = UserDraft::from(&user);
        let body = serde_json::to_value(&draft).unwrap();
        assert!(body.get("contrasena").is_none());
        assert_eq!(body["idSucursal"], 1);
        assert_eq!(body["telefono"], "");
    }

    #[test]
    fn debug_output_redacts_password() {
        let draft = UserDraft {
            password: Some("hunter2hunter2".to_string()),
            ..UserDraft::default()
        };
        let rendered = format!("{draft:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
