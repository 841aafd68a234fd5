//! `adminconsole modules ...`

use anyhow::{Result, bail};
use clap::Subcommand;

use adminconsole_admin::ModulesView;
use adminconsole_core::{ModuleDraft, ModuleId, Status};

use super::{StatusArg, finish, loaded};
use crate::prompt;
use crate::settings::App;

#[derive(Subcommand, Debug)]
pub enum ModulesCommand {
    /// List modules in display order
    List,

    /// Create a module at the end of the list
    Create {
        name: String,

        /// Create it disabled
        #[arg(long)]
        inactive: bool,
    },

    /// Rename or (de)activate a module
    Update {
        id: ModuleId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Delete a module
    Delete {
        id: ModuleId,

        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Move a module to another position (positions start at 1)
    Move { from: usize, to: usize },
}

pub async fn run(app: &App, cmd: ModulesCommand) -> Result<()> {
    app.require_login()?;
    let mut view = loaded(ModulesView::load(&app.api).await, "modules")?;

    match cmd {
        ModulesCommand::List => {
            println!("{:>4}  {:>5}  {:<30} {}", "POS", "ID", "NAME", "STATUS");
            for (pos, module) in view.modules().iter().enumerate() {
                println!("{:>4}  {:>5}  {:<30} {}", pos + 1, module.id, module.name, module.status);
            }
            Ok(())
        }
        ModulesCommand::Create { name, inactive } => {
            let mut draft = ModuleDraft::new(name);
            draft.status = Status::from(!inactive);
            let label = draft.name.trim().to_string();
            finish(view.create(draft).await, format!("module {label} created"), "save module")
        }
        ModulesCommand::Update { id, name, status } => {
            let Some(module) = view.find(id) else {
                bail!("module {id} not found");
            };
            let mut draft = ModuleDraft::from(module);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(status) = status {
                draft.status = status.into();
            }
            finish(view.update(id, draft).await, format!("module {id} updated"), "save module")
        }
        ModulesCommand::Delete { id, yes } => {
            let Some(module) = view.find(id) else {
                bail!("module {id} not found");
            };
            let question = format!("Delete module {}?", module.name);
            if !prompt::confirm(&question, yes)? {
                println!("cancelled");
                return Ok(());
            }
            finish(view.delete(id).await, format!("module {id} deleted"), "delete module")
        }
        ModulesCommand::Move { from, to } => {
            if from == 0 || to == 0 {
                bail!("positions start at 1");
            }
            let updated = finish(
                view.move_module(from - 1, to - 1).await,
                format!("moved position {from} to {to}"),
                "reorder modules",
            )?;
            tracing::debug!(updated, "modules renumbered");
            Ok(())
        }
    }
}
