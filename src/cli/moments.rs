use clap::{Args, Subcommand};

use crate::api::ContentApi;
use crate::cli::ListOptions;
use crate::config::AppContext;
use crate::{ClubError, Result};

/// Browse historical moments
#[derive(Args, Debug)]
pub struct MomentsCommand {
    #[command(subcommand)]
    command: MomentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum MomentsSubcommand {
    /// List historical moments
    List(ListOptions),
    /// Show one historical moment
    Get {
        /// Moment id
        id: String,
    },
}

impl MomentsCommand {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        match self.command {
            MomentsSubcommand::List(options) => {
                let page = ctx.api.moments(&(&options).into()).await?;
                for moment in &page.data {
                    match moment.year {
                        Some(year) => println!("{}  {}  {}", moment.id, year, moment.title),
                        None => println!("{}  ----  {}", moment.id, moment.title),
                    }
                }
                println!(
                    "page {} of {} ({} items)",
                    options.page, page.pagination.total_pages, page.pagination.total_items
                );
            }
            MomentsSubcommand::Get { id } => match ctx.api.moment(&id).await {
                Ok(moment) => {
                    println!("{}", moment.title);
                    if let Some(year) = moment.year {
                        println!("year: {}", year);
                    }
                    if let Some(media_url) = &moment.media_url {
                        println!("media: {}", media_url);
                    }
                    println!();
                    println!("{}", moment.description);
                }
                Err(ClubError::NotFound) => println!("Not Found"),
                Err(err) => return Err(err),
            },
        }

        Ok(())
    }
}
