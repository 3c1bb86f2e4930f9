use clap::Args;

use crate::config::AppContext;
use crate::Result;

/// Log out and clear the local session
#[derive(Args, Debug)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        // Clears locally even when the service cannot be notified.
        ctx.session.logout(ctx.api.as_ref()).await;
        println!("Logged out");

        Ok(())
    }
}
