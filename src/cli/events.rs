use clap::{Args, Subcommand};

use crate::api::ContentApi;
use crate::cli::ListOptions;
use crate::config::AppContext;
use crate::{ClubError, Result};

/// Browse club events
#[derive(Args, Debug)]
pub struct EventsCommand {
    #[command(subcommand)]
    command: EventsSubcommand,
}

#[derive(Subcommand, Debug)]
enum EventsSubcommand {
    /// List events
    List(ListOptions),
    /// Show one event
    Get {
        /// Event id
        id: String,
    },
}

impl EventsCommand {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        match self.command {
            EventsSubcommand::List(options) => {
                let page = ctx.api.events(&(&options).into()).await?;
                for event in &page.data {
                    println!(
                        "{}  {}  {}",
                        event.id,
                        event.starts_at.format("%Y-%m-%d %H:%M"),
                        event.title
                    );
                }
                println!(
                    "page {} of {} ({} items)",
                    options.page, page.pagination.total_pages, page.pagination.total_items
                );
            }
            EventsSubcommand::Get { id } => match ctx.api.event(&id).await {
                Ok(event) => {
                    println!("{}", event.title);
                    println!("starts: {}", event.starts_at.format("%Y-%m-%d %H:%M"));
                    if let Some(location) = &event.location {
                        println!("where: {}", location);
                    }
                    println!();
                    println!("{}", event.description);
                }
                Err(ClubError::NotFound) => println!("Not Found"),
                Err(err) => return Err(err),
            },
        }

        Ok(())
    }
}
