//! Session commands

use anyhow::Context as _;
use clap::Subcommand;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};
use shared::models::ChangePasswordPayload;

use crate::views::{AuthView, Context};

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Sign in and keep the token for later commands
    Login {
        #[arg(long, short = 'e', env = "IMS_EMAIL")]
        email: Option<String>,

        /// Prompted for when omitted
        #[arg(long, env = "IMS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show the signed-in user, role and permissions
    Whoami,

    /// Change the password of the signed-in user
    ChangePassword,
}

pub async fn run(ctx: &Context, cmd: AuthCommands) -> anyhow::Result<()> {
    let view = AuthView::new(ctx.clone());
    let theme = ColorfulTheme::default();

    match cmd {
        AuthCommands::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => Input::with_theme(&theme)
                    .with_prompt("Email")
                    .interact_text()
                    .context("reading email")?,
            };
            let password = match password {
                Some(p) => p,
                None => Password::with_theme(&theme)
                    .with_prompt("Password")
                    .interact()
                    .context("reading password")?,
            };
            let user = view.login(&email, &password).await?;
            println!("Signed in as {} <{}>", user.name, user.email);
        }
        AuthCommands::Logout => {
            view.logout().await?;
            println!("Signed out");
        }
        AuthCommands::Whoami => {
            let user = view.refresh_user().await?;
            let state = ctx.session.snapshot();
            println!("{} <{}>", user.name, user.email);
            println!("Role:        {}", state.role.as_deref().unwrap_or("-"));
            if !state.permission.is_empty() {
                println!("Permissions: {}", state.permission.join(", "));
            }
        }
        AuthCommands::ChangePassword => {
            let password = Password::with_theme(&theme)
                .with_prompt("Current password")
                .interact()
                .context("reading password")?;
            let new_password = Password::with_theme(&theme)
                .with_prompt("New password")
                .interact()
                .context("reading password")?;
            let new_password_confirmation = Password::with_theme(&theme)
                .with_prompt("Confirm new password")
                .interact()
                .context("reading password")?;
            view.change_password(&ChangePasswordPayload {
                password,
                new_password,
                new_password_confirmation,
            })
            .await?;
        }
    }
    Ok(())
}
