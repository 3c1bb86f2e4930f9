use clap::Args;

use crate::cli::ensure_access;
use crate::config::AppContext;
use crate::session::Requirement;
use crate::Result;

/// Show the authenticated user
#[derive(Args, Debug)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        ensure_access(ctx, "/profile", &Requirement::Authenticated)?;

        if let Some(user) = ctx.session.snapshot().user {
            println!("{} <{}> role: {}", user.name, user.email, user.role);
        }

        Ok(())
    }
}
