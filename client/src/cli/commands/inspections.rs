//! Inspection commands

use clap::Subcommand;
use shared::models::{InspectionFilters, InspectionTab};

use super::confirm;
use crate::cli::{output, parse_inspection_tab};
use crate::views::{Context, InspectionDetailView, InspectionListView};

#[derive(Subcommand, Debug)]
pub enum InspectionCommands {
    /// List inspections of a tab
    List {
        /// all, to-forward or forwarded
        #[arg(long, short = 't', default_value = "all", value_parser = parse_inspection_tab)]
        tab: InspectionTab,

        #[arg(long)]
        iar_no: Option<String>,

        #[arg(long)]
        po_number: Option<String>,

        #[arg(long, short = 'p', default_value_t = 1)]
        page: u32,
    },

    /// Show an inspection and its delivery items
    Show { id: u64 },

    /// Forward the delivered items to the warehouse
    Submit {
        id: u64,

        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Replace the remarks
    Remarks { id: u64, remarks: String },

    Delete {
        id: u64,

        #[arg(long, short = 'y')]
        yes: bool,
    },
}

pub async fn run(ctx: &Context, cmd: InspectionCommands) -> anyhow::Result<()> {
    match cmd {
        InspectionCommands::List {
            tab,
            iar_no,
            po_number,
            page,
        } => {
            let mut view = InspectionListView::new(ctx.clone(), tab);
            view.set_filters(InspectionFilters {
                iar_no,
                po_number,
                ..Default::default()
            });
            view.set_page(page);
            let list = view.load().await?;
            println!("{}\n", tab.title());
            output::print_inspections(&list);
        }
        InspectionCommands::Show { id } => {
            let mut view = InspectionDetailView::new(ctx.clone(), id);
            view.load().await?;
            if let Some(inspection) = view.inspection() {
                output::print_inspection(inspection, view.items(), view.total_amount());
            }
            if view.can_submit() {
                println!("\nNot forwarded yet: ims inspections submit {id}");
            }
        }
        InspectionCommands::Submit { id, yes } => {
            if !confirm("Forward this inspection to the warehouse?", yes) {
                println!("Nothing sent.");
                return Ok(());
            }
            InspectionDetailView::new(ctx.clone(), id).submit().await?;
        }
        InspectionCommands::Remarks { id, remarks } => {
            InspectionDetailView::new(ctx.clone(), id)
                .update_remarks(&remarks)
                .await?;
        }
        InspectionCommands::Delete { id, yes } => {
            if !confirm(&format!("Delete inspection {id}?"), yes) {
                println!("Nothing deleted.");
                return Ok(());
            }
            InspectionListView::new(ctx.clone(), InspectionTab::All)
                .delete(id)
                .await?;
        }
    }
    Ok(())
}
