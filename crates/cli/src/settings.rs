//! Process configuration: flags with environment fallbacks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Args;

use adminconsole_auth::{FileSessionStore, SessionHolder};
use adminconsole_client::config::DEFAULT_BASE_URL;
use adminconsole_client::{ClientConfig, HttpBackend};
use adminconsole_observability::LogFormat;

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Backend base URL
    #[arg(long, global = true, env = "ADMINCONSOLE_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "ADMINCONSOLE_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Extra attempts for failed reads
    #[arg(long, global = true, env = "ADMINCONSOLE_RETRIES", default_value_t = 1)]
    pub retries: u32,

    /// Where the session is stored [default: <data dir>/adminconsole/session.json]
    #[arg(long, global = true, env = "ADMINCONSOLE_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Log format (pretty, json)
    #[arg(long, global = true, env = "ADMINCONSOLE_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Settings {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_url)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_retries(self.retries)
    }

    fn session_store(&self) -> Result<FileSessionStore> {
        match &self.session_file {
            Some(path) => Ok(FileSessionStore::new(path)),
            None => FileSessionStore::default_location().context("locating the session file"),
        }
    }
}

/// Everything a command needs: the restored session and a backend client
/// sharing it.
pub struct App {
    pub session: Arc<SessionHolder>,
    pub api: HttpBackend,
}

impl App {
    pub fn connect(settings: &Settings) -> Result<Self> {
        let store = settings.session_store()?;
        tracing::debug!(path = %store.path().display(), api = %settings.api_url, "starting");

        let session = Arc::new(SessionHolder::restore(Arc::new(store)));
        let api = HttpBackend::new(settings.client_config(), Arc::clone(&session))
            .context("building the HTTP client")?;
        Ok(Self { session, api })
    }

    /// Fail early when nobody is signed in.
    pub fn require_login(&self) -> Result<()> {
        if !self.session.is_authenticated() {
            bail!("not signed in; run `adminconsole login` first");
        }
        Ok(())
    }
}
