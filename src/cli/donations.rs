use clap::Args;

use crate::api::ContentApi;
use crate::config::AppContext;
use crate::Result;

/// Show how to donate to the club
#[derive(Args, Debug)]
pub struct DonationsCommand {}

impl DonationsCommand {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let settings = ctx.api.donation_settings().await?;

        if !settings.enabled {
            println!("Donations are currently closed");
            return Ok(());
        }

        println!("{}", settings.message);
        if let Some(bank_account) = &settings.bank_account {
            println!("bank account: {}", bank_account);
        }

        Ok(())
    }
}
