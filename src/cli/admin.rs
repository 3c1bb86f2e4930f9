use clap::{Args, Subcommand};

use crate::api::types::ListQuery;
use crate::api::ContentApi;
use crate::cli::ensure_access;
use crate::config::AppContext;
use crate::session::Requirement;
use crate::Result;

/// Back office, admin role only
#[derive(Args, Debug)]
pub struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    /// Content totals across the site
    Status,
}

impl AdminCommand {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        ensure_access(ctx, "/admin", &Requirement::role("admin"))?;

        match self.command {
            AdminSubcommand::Status => {
                let probe = ListQuery {
                    page: 1,
                    limit: 1,
                    filter: None,
                };

                let announcements = ctx.api.announcements(&probe).await?;
                let events = ctx.api.events(&probe).await?;
                let moments = ctx.api.moments(&probe).await?;
                let donations = ctx.api.donation_settings().await?;

                println!("announcements: {}", announcements.pagination.total_items);
                println!("events:        {}", events.pagination.total_items);
                println!("moments:       {}", moments.pagination.total_items);
                println!(
                    "donations:     {}",
                    if donations.enabled { "open" } else { "closed" }
                );
            }
        }

        Ok(())
    }
}
