//! Session model: what the backend hands back on login and what we keep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use adminconsole_core::{ProfileId, UserId};

/// Login form body.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "nombreUsuarioLogin")]
    pub login: String,
    #[serde(rename = "contrasena")]
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The signed-in user as described by the login response.
///
/// Only the fields the console reads are typed; everything else the backend
/// sends is kept verbatim in `extra` so it survives a save/restore cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "idUsuario", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(rename = "nombreUsuario", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "nombreUsuarioLogin", default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(rename = "nombrePerfil", default, skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
    #[serde(rename = "rolId", default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<ProfileId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionUser {
    /// Name shown in the console header.
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .or(self.login.as_deref())
            .unwrap_or("User")
    }
}

/// Successful login response: a token plus the user fields, in one flat
/// object.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: SessionUser,
}

impl core::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// An authenticated session.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "authToken")]
    pub token: String,
    pub user: SessionUser,
    pub established_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: SessionUser, established_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            user,
            established_at,
        }
    }

    pub fn from_login(response: LoginResponse, now: DateTime<Utc>) -> Self {
        Self::new(response.token, response.user, now)
    }

    /// A session counts only when it carries a non-blank token.
    pub fn is_usable(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .field("established_at", &self.established_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_splits_token_from_user() {
        let json = r#"{
            "token": "abc.def.ghi",
            "idUsuario": 3,
            "nombreUsuario": "Rosa",
            "nombrePerfil": "Administrador",
            "rolId": 1,
            "idSucursal": 2
        }"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token, "abc.def.ghi");
        assert_eq!(resp.user.id, Some(UserId::new(3)));
        assert_eq!(resp.user.display_name(), "Rosa");
        assert_eq!(resp.user.profile_id, Some(ProfileId::new(1)));
        assert_eq!(resp.user.extra.get("idSucursal"), Some(&Value::from(2)));
        assert!(!resp.user.extra.contains_key("token"));
    }

    #[test]
    fn credentials_use_backend_field_names() {
        let body = serde_json::to_value(Credentials::new("admin", "s3cretpass")).unwrap();
        assert_eq!(body, serde_json::json!({"nombreUsuarioLogin": "admin", "contrasena": "s3cretpass"}));
        assert!(!format!("{:?}", Credentials::new("admin", "s3cretpass")).contains("s3cret"));
    }

    #[test]
    fn display_name_falls_back_to_login() {
        let user = SessionUser {
            login: Some("jperez".to_string()),
            ..SessionUser::default()
        };
        assert_eq!(user.display_name(), "jperez");
        assert_eq!(SessionUser::default().display_name(), "User");
    }
}
