//! Dispense commands

use anyhow::{bail, Context as _};
use clap::Subcommand;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use shared::models::DispenseTab;

use crate::cli::{output, parse_dispense_tab};
use crate::views::{Context, DispenseDetailView, DispenseListView};

#[derive(Subcommand, Debug)]
pub enum DispenseCommands {
    /// List dispenses of a tab
    List {
        /// for-dispense or dispensed
        #[arg(long, short = 't', default_value = "for-dispense", value_parser = parse_dispense_tab)]
        tab: DispenseTab,

        #[arg(long, short = 's')]
        search: Option<String>,

        #[arg(long, short = 'p', default_value_t = 1)]
        page: u32,
    },

    /// Show a dispense and its items
    Show { id: u64 },

    /// Record who received the stock and when
    Confirm {
        id: u64,

        /// Receiver's name; prompted for when omitted
        #[arg(long, short = 'r')]
        receive_by: Option<String>,

        /// YYYY-MM-DDTHH:MM, defaults to now
        #[arg(long)]
        at: Option<String>,
    },
}

pub async fn run(ctx: &Context, cmd: DispenseCommands) -> anyhow::Result<()> {
    match cmd {
        DispenseCommands::List { tab, search, page } => {
            let mut view = DispenseListView::new(ctx.clone(), tab);
            view.set_search(search);
            view.set_page(page);
            let list = view.load().await?;
            println!("{}\n", tab.title());
            output::print_dispenses(&list);
        }
        DispenseCommands::Show { id } => {
            let mut view = DispenseDetailView::new(ctx.clone(), id);
            view.load().await?;
            if let Some(dispense) = view.dispense() {
                output::print_dispense(dispense, view.items());
            }
            if view.can_confirm() {
                println!("\nAwaiting confirmation: ims dispenses confirm {id}");
            }
        }
        DispenseCommands::Confirm { id, receive_by, at } => {
            let mut view = DispenseDetailView::new(ctx.clone(), id);
            if let Some(raw) = at {
                if !view.form.set_dispense_at_text(&raw) {
                    bail!("invalid timestamp '{raw}', expected YYYY-MM-DDTHH:MM");
                }
            }
            view.form.receive_by = match receive_by {
                Some(name) => name,
                None => Input::with_theme(&ColorfulTheme::default())
                    .with_prompt("Received by")
                    .allow_empty(true)
                    .interact_text()
                    .context("reading receiver")?,
            };
            view.confirm().await?;
        }
    }
    Ok(())
}
