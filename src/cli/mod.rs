mod admin;
mod announcements;
mod donations;
mod donors;
mod events;
mod login;
mod logout;
mod moments;
mod preferences;
mod whoami;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::api::types::ListQuery;
use crate::config::{AppContext, Config, Initializer};
use crate::session::{Access, Requirement};
use crate::{ClubError, Result};

/// Clubctl command
#[derive(Parser, Debug)]
#[command(version, propagate_version = true, subcommand_required = true)]
pub struct ClubctlCommand {
    /// Client options
    #[command(flatten)]
    pub client: ClientOptions,
    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Client options
#[derive(Args, Debug)]
pub struct ClientOptions {
    /// Club service endpoint
    #[arg(long, env = "CLUBCTL_ENDPOINT", global = true)]
    pub endpoint: Option<String>,
    /// Request timeout in milliseconds
    #[arg(long, env = "CLUBCTL_TIMEOUT_MILLISECONDS", global = true)]
    pub timeout_milliseconds: Option<u64>,
    /// Directory where clubctl keeps its session and preferences
    #[arg(long, env = "CLUBCTL_DIR", global = true)]
    pub data_dir: Option<PathBuf>,
    /// Configuration file path
    #[arg(long, short = 'C', env = "CLUBCTL_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in
    Login(login::LoginCommand),
    /// Log out
    Logout(logout::LogoutCommand),
    /// Show the current session
    Whoami(whoami::WhoamiCommand),
    /// Browse announcements
    Announcements(announcements::AnnouncementsCommand),
    /// Browse events
    Events(events::EventsCommand),
    /// Browse historical moments
    Moments(moments::MomentsCommand),
    /// Show donation settings
    Donations(donations::DonationsCommand),
    /// Blood donor registry
    Donors(donors::DonorsCommand),
    /// Back office
    Admin(admin::AdminCommand),
    /// Presentation preferences
    Preferences(preferences::PreferencesCommand),
}

/// Parse command line args
pub fn parse() -> ClubctlCommand {
    ClubctlCommand::parse()
}

impl ClubctlCommand {
    pub async fn run(self) -> Result<()> {
        let ClientOptions {
            mut endpoint,
            mut timeout_milliseconds,
            mut data_dir,
            config,
        } = self.client;

        let mut initializer = match config {
            Some(path) => Initializer::load_config_file(path).await?,
            None => Initializer::from_config(Config::default()),
        };

        initializer.config.api.set_endpoint(&mut endpoint);
        initializer
            .config
            .api
            .set_timeout_milliseconds(&mut timeout_milliseconds);
        initializer.config.storage.set_data_dir(&mut data_dir);

        let ctx = initializer.build()?;

        // Settle the persisted session before any guard consultation.
        ctx.bootstrap().await;

        match self.command {
            Command::Login(command) => command.run(&ctx).await,
            Command::Logout(command) => command.run(&ctx).await,
            Command::Whoami(command) => command.run(&ctx).await,
            Command::Announcements(command) => command.run(&ctx).await,
            Command::Events(command) => command.run(&ctx).await,
            Command::Moments(command) => command.run(&ctx).await,
            Command::Donations(command) => command.run(&ctx).await,
            Command::Donors(command) => command.run(&ctx).await,
            Command::Admin(command) => command.run(&ctx).await,
            Command::Preferences(command) => command.run(&ctx).await,
        }
    }
}

/// Pagination options shared by the list subcommands.
#[derive(Args, Debug)]
pub struct ListOptions {
    /// Page number
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Items per page
    #[arg(long, default_value_t = 20)]
    pub limit: u32,
    /// Filter text applied server side
    #[arg(long)]
    pub filter: Option<String>,
}

impl From<&ListOptions> for ListQuery {
    fn from(options: &ListOptions) -> Self {
        ListQuery {
            page: options.page,
            limit: options.limit,
            filter: options.filter.clone(),
        }
    }
}

// Consult the guard for a protected region, mapping its decision onto
// the error surface: Redirect means "log in first", Deny is a refusal
// shown in place.
pub(crate) fn ensure_access(
    ctx: &AppContext,
    requested: &str,
    requirement: &Requirement,
) -> Result<()> {
    match ctx
        .guard
        .authorize(&ctx.session.snapshot(), requested, requirement)
    {
        Access::Render => Ok(()),
        Access::Pending => Err(ClubError::Api {
            message: "session validation still in flight".to_owned(),
        }),
        Access::Redirect { from, .. } => Err(ClubError::Unauthenticated {
            message: format!("log in first to access {}", from),
        }),
        Access::Deny => Err(ClubError::PermissionDenied),
    }
}
