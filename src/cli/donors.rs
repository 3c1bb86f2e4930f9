use clap::{Args, Subcommand};

use crate::api::types::DonorRegistration;
use crate::api::ContentApi;
use crate::cli::{ensure_access, ListOptions};
use crate::config::AppContext;
use crate::session::Requirement;
use crate::{ClubError, Result};

/// Blood donor registry, readable with a session
#[derive(Args, Debug)]
pub struct DonorsCommand {
    #[command(subcommand)]
    command: DonorsSubcommand,
}

#[derive(Subcommand, Debug)]
enum DonorsSubcommand {
    /// List registered donors
    List(ListOptions),
    /// Register the current user as a donor
    Register {
        /// Blood type, e.g. A+, 0-
        #[arg(long)]
        blood_type: String,
        /// Contact phone
        #[arg(long)]
        phone: Option<String>,
    },
}

impl DonorsCommand {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        ensure_access(ctx, "/donors", &Requirement::Authenticated)?;

        let token = ctx
            .session
            .snapshot()
            .token
            .ok_or_else(|| ClubError::Unauthenticated {
                message: "log in first to access /donors".to_owned(),
            })?;

        match self.command {
            DonorsSubcommand::List(options) => {
                let page = ctx.api.donors(&token, &(&options).into()).await?;
                for donor in &page.data {
                    match &donor.phone {
                        Some(phone) => {
                            println!("{}  {}  {}", donor.blood_type, donor.name, phone)
                        }
                        None => println!("{}  {}", donor.blood_type, donor.name),
                    }
                }
                println!(
                    "page {} of {} ({} items)",
                    options.page, page.pagination.total_pages, page.pagination.total_items
                );
            }
            DonorsSubcommand::Register { blood_type, phone } => {
                let registration = DonorRegistration { blood_type, phone };
                let donor = ctx.api.register_donor(&token, &registration).await?;
                println!("Registered {} ({})", donor.name, donor.blood_type);
            }
        }

        Ok(())
    }
}
