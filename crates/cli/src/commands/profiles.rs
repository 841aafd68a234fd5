//! `adminconsole profiles ...`

use anyhow::{Result, bail};
use clap::Subcommand;

use adminconsole_admin::ProfilesView;
use adminconsole_core::{ProfileDraft, ProfileId, Status};

use super::{StatusArg, finish, loaded};
use crate::prompt;
use crate::settings::App;

#[derive(Subcommand, Debug)]
pub enum ProfilesCommand {
    /// List profiles
    List {
        /// Include inactive profiles
        #[arg(long)]
        all: bool,
    },

    /// Create a profile
    Create {
        name: String,

        /// Create it disabled
        #[arg(long)]
        inactive: bool,
    },

    /// Rename or (de)activate a profile
    Update {
        id: ProfileId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Delete a profile
    Delete {
        id: ProfileId,

        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(app: &App, cmd: ProfilesCommand) -> Result<()> {
    app.require_login()?;
    let mut view = loaded(ProfilesView::load(&app.api).await, "profiles")?;

    match cmd {
        ProfilesCommand::List { all } => {
            println!("{:>5}  {:<30} {}", "ID", "NAME", "STATUS");
            for profile in view.profiles().iter().filter(|p| all || p.status.is_active()) {
                println!("{:>5}  {:<30} {}", profile.id, profile.name, profile.status);
            }
            Ok(())
        }
        ProfilesCommand::Create { name, inactive } => {
            let draft = ProfileDraft {
                name,
                status: Status::from(!inactive),
            };
            let label = draft.name.trim().to_string();
            finish(view.create(draft).await, format!("profile {label} created"), "save profile")
        }
        ProfilesCommand::Update { id, name, status } => {
            let Some(profile) = view.find(id) else {
                bail!("profile {id} not found");
            };
            let mut draft = ProfileDraft::from(profile);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(status) = status {
                draft.status = status.into();
            }
            finish(view.update(id, draft).await, format!("profile {id} updated"), "save profile")
        }
        ProfilesCommand::Delete { id, yes } => {
            let Some(profile) = view.find(id) else {
                bail!("profile {id} not found");
            };
            let question = format!("Delete profile {}?", profile.name);
            if !prompt::confirm(&question, yes)? {
                println!("cancelled");
                return Ok(());
            }
            finish(view.delete(id).await, format!("profile {id} deleted"), "delete profile")
        }
    }
}
