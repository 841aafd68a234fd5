//! adminconsole - operator CLI for the administration backend.
//!
//! Manages users, profiles, modules and the profile × module permission
//! matrix. The session is kept between runs in a local file.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod prompt;
mod settings;

use settings::{App, Settings};

/// adminconsole - administration console for users, profiles and modules
#[derive(Parser, Debug)]
#[command(name = "adminconsole")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and keep the session for later commands
    Login(commands::session::LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// User accounts
    #[command(subcommand)]
    Users(commands::users::UsersCommand),

    /// Profiles (roles)
    #[command(subcommand)]
    Profiles(commands::profiles::ProfilesCommand),

    /// System modules
    #[command(subcommand)]
    Modules(commands::modules::ModulesCommand),

    /// Profile × module permissions
    #[command(subcommand)]
    Access(commands::access::AccessCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    adminconsole_observability::init(cli.settings.log_format, "warn");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let app = App::connect(&cli.settings)?;

    match cli.command {
        Commands::Login(args) => commands::session::login(&app, args).await,
        Commands::Logout => commands::session::logout(&app),
        Commands::Whoami => commands::session::whoami(&app),
        Commands::Users(cmd) => commands::users::run(&app, cmd).await,
        Commands::Profiles(cmd) => commands::profiles::run(&app, cmd).await,
        Commands::Modules(cmd) => commands::modules::run(&app, cmd).await,
        Commands::Access(cmd) => commands::access::run(&app, cmd).await,
    }
}
