//! `adminconsole access ...`: the permission matrix.

use anyhow::{Result, anyhow};
use clap::Subcommand;

use adminconsole_admin::AccessMatrix;
use adminconsole_client::HttpBackend;
use adminconsole_core::{ModuleId, ProfileId};

use super::{finish, loaded};
use crate::prompt;
use crate::settings::App;

const COLUMN_WIDTH: usize = 12;

#[derive(Subcommand, Debug)]
pub enum AccessCommand {
    /// Print the module × profile grid
    Matrix,

    /// Grant or revoke one module for one profile
    Toggle { profile: ProfileId, module: ModuleId },

    /// Give every other active profile the modules of this one
    Copy {
        from: ProfileId,

        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Modules a profile may open (defaults to the signed-in user's profile)
    Allowed { profile: Option<ProfileId> },
}

pub async fn run(app: &App, cmd: AccessCommand) -> Result<()> {
    app.require_login()?;
    let mut matrix = loaded(AccessMatrix::load(&app.api).await, "permissions")?;

    match cmd {
        AccessCommand::Matrix => {
            print_matrix(&matrix);
            Ok(())
        }
        AccessCommand::Toggle { profile, module } => {
            let granted = finish(
                matrix.toggle(profile, module).await,
                format!("permissions for profile {profile} updated"),
                "update permission",
            )?;
            let state = if granted { "granted" } else { "revoked" };
            println!("module {module} is now {state} for profile {profile}");
            Ok(())
        }
        AccessCommand::Copy { from, yes } => copy(&mut matrix, from, yes).await,
        AccessCommand::Allowed { profile } => allowed(app, &matrix, profile).await,
    }
}

async fn allowed(
    app: &App,
    matrix: &AccessMatrix<'_, HttpBackend>,
    profile: Option<ProfileId>,
) -> Result<()> {
    let profile = match profile {
        Some(profile) => profile,
        None => app
            .session
            .user()
            .and_then(|u| u.profile_id)
            .ok_or_else(|| anyhow!("the signed-in user has no profile; pass one explicitly"))?,
    };
    let modules = loaded(matrix.allowed_modules(profile).await, "allowed modules")?;
    if modules.is_empty() {
        println!("profile {profile} has no modules");
    }
    for module in modules {
        println!("{:>5}  {}", module.id, module.name);
    }
    Ok(())
}

async fn copy(matrix: &mut AccessMatrix<'_, HttpBackend>, from: ProfileId, yes: bool) -> Result<()> {
    let source = matrix
        .profiles()
        .iter()
        .find(|p| p.id == from)
        .map(|p| p.name.clone())
        .ok_or_else(|| anyhow!("profile {from} is not an active profile"))?;
    let others = matrix.profiles().len().saturating_sub(1);

    let question = format!("Copy the permissions of {source} to {others} other profile(s)?");
    if !prompt::confirm(&question, yes)? {
        println!("cancelled");
        return Ok(());
    }

    let report = finish(
        matrix.copy_permissions(from).await,
        format!("permissions of {source} copied"),
        "copy permissions",
    )?;
    println!(
        "{} profile(s): {} created, {} reactivated, {} already granted",
        report.targets, report.created, report.reactivated, report.unchanged
    );
    Ok(())
}

fn print_matrix<A: adminconsole_client::AdminApi>(matrix: &AccessMatrix<'_, A>) {
    print!("{:<24}", "MODULE");
    for profile in matrix.profiles() {
        print!(" {:<width$}", cell_label(&profile.name), width = COLUMN_WIDTH);
    }
    println!();

    for row in matrix.grid() {
        print!("{:<24}", cell_label(&row.module.name));
        for granted in &row.cells {
            print!(" {:<width$}", if *granted { "x" } else { "." }, width = COLUMN_WIDTH);
        }
        println!();
    }
}

/// Cut a name to the column width.
fn cell_label(name: &str) -> String {
    if name.chars().count() <= COLUMN_WIDTH {
        name.to_string()
    } else {
        let mut cut: String = name.chars().take(COLUMN_WIDTH - 1).collect();
        cut.push('~');
        cut
    }
}
