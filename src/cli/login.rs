use clap::Args;

use crate::config::AppContext;
use crate::Result;

/// Log in to the club service
#[derive(Args, Debug)]
pub struct LoginCommand {
    /// Account email
    #[arg(long, env = "CLUBCTL_EMAIL")]
    email: String,
    /// Account password
    #[arg(long, env = "CLUBCTL_PASSWORD", hide_env_values = true)]
    password: String,
}

impl LoginCommand {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let session = ctx
            .session
            .login(ctx.api.as_ref(), &self.email, &self.password)
            .await?;

        if let Some(user) = session.user {
            println!("Logged in as {} ({})", user.name, user.role);
        }

        Ok(())
    }
}
