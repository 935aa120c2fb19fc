//! Command implementations

pub mod auth;
pub mod dispenses;
pub mod inspections;
pub mod libraries;
pub mod reports;
pub mod requisitions;
pub mod stocks;

use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

/// Ask a yes/no question unless `--yes` was given
pub(crate) fn confirm(prompt: &str, yes: bool) -> bool {
    if yes {
        return true;
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}
