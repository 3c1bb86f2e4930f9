use clap::{Args, Subcommand};

use crate::api::ContentApi;
use crate::cli::ListOptions;
use crate::config::AppContext;
use crate::{ClubError, Result};

/// Browse club announcements
#[derive(Args, Debug)]
pub struct AnnouncementsCommand {
    #[command(subcommand)]
    command: AnnouncementsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AnnouncementsSubcommand {
    /// List announcements
    List(ListOptions),
    /// Show one announcement
    Get {
        /// Announcement id
        id: String,
    },
}

impl AnnouncementsCommand {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        match self.command {
            AnnouncementsSubcommand::List(options) => {
                let page = ctx.api.announcements(&(&options).into()).await?;
                for announcement in &page.data {
                    println!(
                        "{}  {}  {}",
                        announcement.id,
                        announcement.published_at.format("%Y-%m-%d"),
                        announcement.title
                    );
                }
                println!(
                    "page {} of {} ({} items)",
                    options.page, page.pagination.total_pages, page.pagination.total_items
                );
            }
            AnnouncementsSubcommand::Get { id } => match ctx.api.announcement(&id).await {
                Ok(announcement) => {
                    println!("{}", announcement.title);
                    println!("{}", announcement.published_at.format("%Y-%m-%d %H:%M"));
                    println!();
                    println!("{}", announcement.body);
                }
                Err(ClubError::NotFound) => println!("Not Found"),
                Err(err) => return Err(err),
            },
        }

        Ok(())
    }
}
