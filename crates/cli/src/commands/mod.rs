//! Subcommand handlers.

pub mod access;
pub mod modules;
pub mod profiles;
pub mod session;
pub mod users;

use anyhow::{Result, anyhow};
use clap::{Args, ValueEnum};

use adminconsole_admin::{AdminResult, DEFAULT_PAGE_SIZE, Notice, Page};
use adminconsole_core::Status;

/// Print the outcome of a view operation.
///
/// Failures are turned into the command's error so the process exits
/// non-zero with the same message the console would show.
fn finish<T>(result: AdminResult<T>, success: impl Into<String>, action: &str) -> Result<T> {
    let notice = Notice::from_result(&result, success, action);
    match result {
        Ok(value) => {
            println!("{notice}");
            Ok(value)
        }
        Err(err) if err.needs_login() => Err(anyhow!("{notice}; run `adminconsole login`")),
        Err(_) => Err(anyhow!("{notice}")),
    }
}

/// Load a view, reporting failures the same way as [`finish`].
fn loaded<T>(result: AdminResult<T>, what: &str) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            let notice = Notice::failure(&format!("load {what}"), &err);
            Err(anyhow!("{notice}"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Active,
    Inactive,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Active => Status::Active,
            StatusArg::Inactive => Status::Inactive,
        }
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub per_page: usize,
}

fn print_page_footer<T>(page: &Page<'_, T>) {
    match page.showing() {
        Some((from, to)) => println!(
            "showing {from} to {to} of {} (page {}/{})",
            page.total_items, page.number, page.total_pages
        ),
        None => println!("nothing to show"),
    }
}
