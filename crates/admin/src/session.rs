//! Sign-in, sign-out and "who am I".

use chrono::Utc;

use adminconsole_auth::{Credentials, Session, SessionHolder, SessionUser};
use adminconsole_client::AdminApi;
use adminconsole_core::{Module, ProfileId, sort_by_order};

use crate::validation::require;
use crate::{AdminError, AdminResult};

/// Authenticate and make the returned session current.
///
/// A rejected attempt also drops whatever session was active before.
pub async fn login<A: AdminApi>(
    api: &A,
    holder: &SessionHolder,
    username: &str,
    password: &str,
) -> AdminResult<SessionUser> {
    require("username", username)?;
    require("password", password)?;

    let credentials = Credentials::new(username.trim(), password);
    let response = match api.login(&credentials).await {
        Ok(response) => response,
        Err(err) => {
            tracing::info!(login = %credentials.login, error = %err, "login rejected");
            holder.clear()?;
            return Err(err.into());
        }
    };

    let session = Session::from_login(response, Utc::now());
    let user = session.user.clone();
    holder.establish(session)?;
    tracing::info!(user = user.display_name(), "signed in");
    Ok(user)
}

pub fn logout(holder: &SessionHolder) -> AdminResult<()> {
    holder.clear()?;
    tracing::info!("signed out");
    Ok(())
}

/// The signed-in user, or [`AdminError::NotSignedIn`].
pub fn whoami(holder: &SessionHolder) -> AdminResult<SessionUser> {
    holder.user().ok_or(AdminError::NotSignedIn)
}

/// Modules a profile may open, in display order.
pub async fn allowed_modules<A: AdminApi>(api: &A, profile: ProfileId) -> AdminResult<Vec<Module>> {
    let mut modules = api.modules_for_profile(profile).await?;
    sort_by_order(&mut modules);
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminconsole_client::InMemoryBackend;
    use adminconsole_core::{Profile, Status, User, UserId};

    fn backend() -> InMemoryBackend {
        let backend = InMemoryBackend::new();
        backend
            .seed(&Profile {
                id: ProfileId::new(1),
                name: "Administrador".to_string(),
                status: Status::Active,
            })
            .unwrap();
        let user = User {
            id: UserId::new(3),
            first_name: "Rosa".to_string(),
            last_name: "Diaz".to_string(),
            document_id: "40000001".to_string(),
            phone: None,
            login: "rdiaz".to_string(),
            profile_id: Some(ProfileId::new(1)),
            branch_id: None,
            status: Status::Active,
            last_login: None,
        };
        backend.seed_user(&user, "correcthorse").unwrap();
        backend
    }

    #[tokio::test]
    async fn login_then_logout() {
        let api = backend();
        let holder = SessionHolder::ephemeral();

        let user = login(&api, &holder, " rdiaz ", "correcthorse").await.unwrap();
        assert_eq!(user.profile_name.as_deref(), Some("Administrador"));
        assert!(holder.is_authenticated());
        assert_eq!(whoami(&holder).unwrap().id, Some(UserId::new(3)));

        logout(&holder).unwrap();
        assert!(matches!(whoami(&holder), Err(AdminError::NotSignedIn)));
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_locally() {
        let api = backend();
        let holder = SessionHolder::ephemeral();
        let err = login(&api, &holder, "rdiaz", "").await.unwrap_err();
        assert!(matches!(err, AdminError::Domain(_)));
    }

    #[tokio::test]
    async fn wrong_password_drops_the_previous_session() {
        let api = backend();
        let holder = SessionHolder::ephemeral();
        login(&api, &holder, "rdiaz", "correcthorse").await.unwrap();

        let err = login(&api, &holder, "rdiaz", "nope-nope").await.unwrap_err();
        assert!(matches!(
            err,
            AdminError::Api(adminconsole_client::ApiError::InvalidCredentials)
        ));
        assert!(!holder.is_authenticated());
    }
}
