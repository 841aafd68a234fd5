//! login / logout / whoami.

use anyhow::{Context, Result};
use clap::Args;

use adminconsole_admin::session;

use super::{finish, loaded};
use crate::prompt;
use crate::settings::App;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Login name
    pub username: String,

    /// Password (prompted for when omitted)
    #[arg(long, env = "ADMINCONSOLE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn login(app: &App, args: LoginArgs) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt::ask("password").context("reading the password")?,
    };

    let user = finish(
        session::login(&app.api, &app.session, &args.username, &password).await,
        "signed in",
        "login",
    )?;
    println!(
        "welcome, {} ({})",
        user.display_name(),
        user.profile_name.as_deref().unwrap_or("no profile")
    );
    Ok(())
}

pub fn logout(app: &App) -> Result<()> {
    finish(session::logout(&app.session), "signed out", "logout")
}

pub fn whoami(app: &App) -> Result<()> {
    let user = loaded(session::whoami(&app.session), "session")?;
    if let Some(id) = user.id {
        println!("id:      {id}");
    }
    println!("name:    {}", user.display_name());
    if let Some(login) = &user.login {
        println!("login:   {login}");
    }
    match (&user.profile_name, user.profile_id) {
        (Some(name), Some(id)) => println!("profile: {name} (#{id})"),
        (Some(name), None) => println!("profile: {name}"),
        (None, Some(id)) => println!("profile: #{id}"),
        (None, None) => println!("profile: none"),
    }
    if let Some(session) = app.session.session() {
        println!("since:   {}", session.established_at.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(())
}
