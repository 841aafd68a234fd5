//! `adminconsole users ...`

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use adminconsole_admin::{UserFilter, UserRow, UserStats, UsersView, paginate};
use adminconsole_client::HttpBackend;
use adminconsole_core::{BranchId, ProfileId, Status, UserDraft, UserId};

use super::{PageArgs, StatusArg, finish, loaded, print_page_footer};
use crate::prompt;
use crate::settings::App;

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List users (active only unless --status is given)
    List {
        /// Only users with this profile
        #[arg(long)]
        profile: Option<ProfileId>,

        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        /// Print totals instead of rows
        #[arg(long)]
        stats: bool,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one user
    Show { id: UserId },

    /// Create a user
    Create(CreateUser),

    /// Change a user; omitted fields are kept
    Update {
        id: UserId,

        #[command(flatten)]
        changes: UpdateUser,
    },

    /// Delete a user
    Delete {
        id: UserId,

        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Profiles a user can be given
    Profiles,
}

#[derive(Args, Debug)]
pub struct CreateUser {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    /// National id document number
    #[arg(long)]
    pub document_id: String,
    #[arg(long)]
    pub login: String,
    #[arg(long)]
    pub profile: ProfileId,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub branch: Option<BranchId>,
    /// Prompted for when omitted
    #[arg(long)]
    pub password: Option<String>,
    /// Create the account disabled
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Args, Debug, Default)]
pub struct UpdateUser {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub document_id: Option<String>,
    #[arg(long)]
    pub login: Option<String>,
    #[arg(long)]
    pub profile: Option<ProfileId>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub branch: Option<BranchId>,
    /// New password; empty keeps the current one
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
}

impl UpdateUser {
    fn apply(self, draft: &mut UserDraft) {
        if let Some(v) = self.first_name {
            draft.first_name = v;
        }
        if let Some(v) = self.last_name {
            draft.last_name = v;
        }
        if let Some(v) = self.document_id {
            draft.document_id = v;
        }
        if let Some(v) = self.login {
            draft.login = v;
        }
        if let Some(v) = self.profile {
            draft.profile_id = Some(v);
        }
        if let Some(v) = self.phone {
            draft.phone = v;
        }
        if let Some(v) = self.branch {
            draft.branch_id = v;
        }
        if let Some(v) = self.status {
            draft.status = v.into();
        }
        draft.password = self.password;
    }
}

pub async fn run(app: &App, cmd: UsersCommand) -> Result<()> {
    app.require_login()?;
    let mut view = loaded(UsersView::load(&app.api).await, "users")?;

    match cmd {
        UsersCommand::List {
            profile,
            status,
            stats,
            page,
        } => {
            let filter = UserFilter {
                profile,
                status: status.map(Status::from),
            };
            let rows = view.filtered(&filter);
            if stats {
                print_stats(&UserStats::of(&rows));
            } else {
                let page = paginate(&rows, page.page, page.per_page);
                print_rows(page.items);
                print_page_footer(&page);
            }
            Ok(())
        }
        UsersCommand::Show { id } => {
            let Some(row) = view.rows().into_iter().find(|r| r.user.id == id) else {
                bail!("user {id} not found");
            };
            print_user(&row);
            Ok(())
        }
        UsersCommand::Create(args) => create(&mut view, args).await,
        UsersCommand::Update { id, changes } => {
            let Some(user) = view.find(id) else {
                bail!("user {id} not found");
            };
            let mut draft = UserDraft::from(user);
            changes.apply(&mut draft);
            finish(view.update(id, draft).await, format!("user {id} updated"), "save user")
        }
        UsersCommand::Delete { id, yes } => {
            let Some(user) = view.find(id) else {
                bail!("user {id} not found");
            };
            let question = format!("Delete user {} ({})?", user.login, user.full_name());
            if !prompt::confirm(&question, yes)? {
                println!("cancelled");
                return Ok(());
            }
            finish(view.delete(id).await, format!("user {id} deleted"), "delete user")
        }
        UsersCommand::Profiles => {
            for profile in view.assignable_profiles() {
                println!("{:>5}  {}", profile.id, profile.name);
            }
            Ok(())
        }
    }
}

async fn create(view: &mut UsersView<'_, HttpBackend>, args: CreateUser) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt::ask("password").context("reading the password")?,
    };
    let login = args.login.clone();
    let draft = UserDraft {
        first_name: args.first_name,
        last_name: args.last_name,
        document_id: args.document_id,
        phone: args.phone.unwrap_or_default(),
        login: args.login,
        password: Some(password),
        profile_id: Some(args.profile),
        status: Status::from(!args.inactive),
        branch_id: args.branch.unwrap_or_default(),
    };
    finish(view.create(draft).await, format!("user {login} created"), "save user")
}

fn print_rows(rows: &[UserRow]) {
    println!(
        "{:>5}  {:<28} {:<16} {:<18} {:<8} {}",
        "ID", "NAME", "LOGIN", "PROFILE", "STATUS", "LAST LOGIN"
    );
    for row in rows {
        let user = &row.user;
        let last_login = user
            .last_login_at()
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {:<28} {:<16} {:<18} {:<8} {}",
            user.id,
            user.full_name(),
            user.login,
            row.profile_name,
            user.status,
            last_login
        );
    }
}

fn print_user(row: &UserRow) {
    let user = &row.user;
    println!("id:          {}", user.id);
    println!("name:        {}", user.full_name());
    println!("document id: {}", user.document_id);
    println!("phone:       {}", user.phone.as_deref().unwrap_or("-"));
    println!("login:       {}", user.login);
    println!("profile:     {}", row.profile_name);
    println!("status:      {}", user.status);
    match user.branch_id {
        Some(branch) => println!("branch:      {branch}"),
        None => println!("branch:      -"),
    }
    match (user.last_login_at(), user.last_login.as_deref()) {
        (Some(at), _) => println!("last login:  {}", at.format("%Y-%m-%d %H:%M UTC")),
        (None, Some(raw)) => println!("last login:  {raw}"),
        (None, None) => println!("last login:  never"),
    }
}

fn print_stats(stats: &UserStats) {
    println!("total:    {}", stats.total);
    println!("active:   {}", stats.active);
    println!("inactive: {}", stats.inactive);
    for (profile, count) in &stats.per_profile {
        println!("  {profile}: {count}");
    }
}
