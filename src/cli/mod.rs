//! CLI command handling

use clap::{Parser, Subcommand, ValueEnum};

use crate::github::{AuthToken, ContributionClient, Login, ReqwestTransport, DEFAULT_ENDPOINT};
use crate::services::logging::{self, LogTarget};
use crate::services::PreferenceStore;
use crate::tui::widgets::panel;
use crate::tui::{detect_theme, ThemeContext, TuiConfig};
use crate::types::{ContribtrackError, FetchState, Result, Theme};

/// Environment variable holding the GitHub bearer token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// GitHub contribution calendar in your terminal
///
/// The API token is read from GITHUB_TOKEN only.
#[derive(Parser)]
#[command(name = "contribtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// GitHub login whose calendar is shown
    #[arg(long, global = true, env = "CONTRIBTRACK_USER")]
    user: Option<String>,

    /// GraphQL endpoint
    #[arg(long, global = true, env = "CONTRIBTRACK_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive activity panel (default)
    Tui,

    /// Fetch the calendar once and print it
    Fetch {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change the stored theme
    Theme {
        #[arg(value_enum)]
        value: Option<ThemeArg>,
    },

    /// Store the default GitHub login
    Login { login: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let Cli {
            command,
            user,
            endpoint,
        } = self;

        match command {
            None | Some(Commands::Tui) => {
                let store = PreferenceStore::new()?;
                logging::init(LogTarget::File(store.log_path()))?;
                let login = resolve_login(user.as_deref(), Some(&store))?;
                let token = resolve_token(std::env::var(TOKEN_ENV).ok())?;
                crate::tui::run(TuiConfig {
                    login,
                    token,
                    endpoint,
                    store,
                })
            }
            Some(Commands::Fetch { json }) => {
                logging::init(LogTarget::Stderr)?;
                // Only consulted for a missing --user or the text palette
                let store = PreferenceStore::new().ok();
                let login = resolve_login(user.as_deref(), store.as_ref())?;
                let token = resolve_token(std::env::var(TOKEN_ENV).ok())?;
                run_fetch(&login, &token, &endpoint, store, json)
            }
            Some(Commands::Theme { value }) => {
                logging::init(LogTarget::Stderr)?;
                run_theme(&PreferenceStore::new()?, value)
            }
            Some(Commands::Login { login }) => {
                logging::init(LogTarget::Stderr)?;
                let login = Login::parse(&login)?;
                PreferenceStore::new()?.set_login(&login)?;
                println!("default login: {}", login);
                Ok(())
            }
        }
    }
}

/// Pick the login from the flag/env, then the stored preference
fn resolve_login(user: Option<&str>, store: Option<&PreferenceStore>) -> Result<Login> {
    if let Some(user) = user {
        return Login::parse(user);
    }

    let stored = match store {
        Some(store) => store.load()?.login,
        None => None,
    };
    match stored {
        Some(login) => Login::parse(&login),
        None => Err(ContribtrackError::Config(
            "no GitHub login configured; pass --user, set CONTRIBTRACK_USER, or run `contribtrack login <name>`".into(),
        )),
    }
}

fn resolve_token(token: Option<String>) -> Result<AuthToken> {
    match token {
        Some(token) => AuthToken::new(token),
        None => Err(ContribtrackError::Config(format!(
            "{} is not set; export a GitHub token",
            TOKEN_ENV
        ))),
    }
}

/// Fetch once and print the calendar
fn run_fetch(
    login: &Login,
    token: &AuthToken,
    endpoint: &str,
    store: Option<PreferenceStore>,
    json: bool,
) -> anyhow::Result<()> {
    let client = ContributionClient::with_endpoint(ReqwestTransport::new()?, endpoint);
    let calendar = match client.fetch_calendar(login, token) {
        Ok(calendar) => calendar,
        Err(err) => {
            tracing::warn!(kind = err.kind(), "contribution fetch failed: {}", err);
            return Err(ContribtrackError::from(err).into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&calendar)?);
        return Ok(());
    }

    let theme = match store {
        Some(store) => ThemeContext::load(store),
        None => ThemeContext::in_memory(Theme::default()),
    };
    let view = panel::render(&FetchState::Loaded(calendar), theme.palette());
    println!("@{} ({})", login, login.profile_url());
    println!("{}", view.header);
    if let Some(grid) = view.grid() {
        println!("{}", grid.to_text());
    }
    Ok(())
}

fn run_theme(store: &PreferenceStore, value: Option<ThemeArg>) -> anyhow::Result<()> {
    let theme = match value {
        None => effective_theme(store)?,
        Some(ThemeArg::Toggle) => apply_theme(store, effective_theme(store)?.toggled())?,
        Some(ThemeArg::Light) => apply_theme(store, Theme::Light)?,
        Some(ThemeArg::Dark) => apply_theme(store, Theme::Dark)?,
    };
    println!("theme: {}", theme.as_str());
    Ok(())
}

/// Stored theme, else the detected terminal theme
fn effective_theme(store: &PreferenceStore) -> Result<Theme> {
    Ok(store.load()?.theme.unwrap_or_else(detect_theme))
}

fn apply_theme(store: &PreferenceStore, theme: Theme) -> Result<Theme> {
    store.set_theme(theme)?;
    Ok(theme)
}
