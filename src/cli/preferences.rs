use clap::{Args, Subcommand};

use crate::config::AppContext;
use crate::prefs::Theme;
use crate::Result;

/// Presentation preferences kept on this machine
#[derive(Args, Debug)]
pub struct PreferencesCommand {
    #[command(subcommand)]
    command: PreferencesSubcommand,
}

#[derive(Subcommand, Debug)]
enum PreferencesSubcommand {
    /// Show current preferences
    Show,
    /// Switch the color theme
    SetTheme {
        /// light or dark
        #[arg(value_parser = ["light", "dark"])]
        theme: String,
    },
    /// Switch the interface language
    SetLanguage {
        /// Locale code, e.g. en, sq
        language: String,
    },
}

impl PreferencesCommand {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        match self.command {
            PreferencesSubcommand::Show => {
                let preferences = ctx.prefs.current();
                println!("theme:    {:?}", preferences.theme);
                println!("language: {}", preferences.language);
            }
            PreferencesSubcommand::SetTheme { theme } => {
                let theme = match theme.as_str() {
                    "dark" => Theme::Dark,
                    _ => Theme::Light,
                };
                ctx.prefs.set_theme(theme)?;
            }
            PreferencesSubcommand::SetLanguage { language } => {
                ctx.prefs.set_language(language)?;
            }
        }

        Ok(())
    }
}
