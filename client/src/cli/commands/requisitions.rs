//! Requisition commands

use anyhow::Context as _;
use clap::Subcommand;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use shared::models::{RequisitionPayload, RequisitionTab};

use super::confirm;
use crate::cli::{output, parse_requisition_tab};
use crate::views::{Context, MarkOutcome, RequisitionDetailView, RequisitionListView};

#[derive(Subcommand, Debug)]
pub enum ReqCommands {
    /// List requisitions of a tab
    List {
        /// pending, for-dispensing or dispensed
        #[arg(long, short = 't', default_value = "pending", value_parser = parse_requisition_tab)]
        tab: RequisitionTab,

        #[arg(long, short = 's')]
        search: Option<String>,

        #[arg(long, short = 'd')]
        department: Option<u64>,

        #[arg(long, short = 'p', default_value_t = 1)]
        page: u32,
    },

    /// Show a requisition with its items and available actions
    Show { id: u64 },

    /// Create a requisition
    Create {
        #[command(flatten)]
        header: HeaderArgs,
    },

    /// Edit a pending requisition's header
    Update {
        id: u64,

        #[command(flatten)]
        header: HeaderArgs,
    },

    /// Delete a requisition
    Delete {
        id: u64,

        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Add a warehouse batch to a pending requisition
    AddItem {
        id: u64,

        /// Stock batch id; picked from the search results when omitted
        #[arg(long)]
        stock: Option<u64>,

        /// Text to search stock batches by
        #[arg(long, short = 's')]
        search: Option<String>,

        #[arg(long, short = 'q', default_value = "1")]
        quantity: String,
    },

    /// Change the quantity of an item
    SetQuantity {
        id: u64,
        item: u64,
        quantity: String,
    },

    /// Remove an item
    RemoveItem {
        id: u64,
        item: u64,

        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Move a pending requisition to for-dispensing
    MarkForDispense { id: u64 },

    /// Create the dispense record and allocate stock
    Dispense {
        id: u64,

        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Header fields of the create and edit forms
#[derive(clap::Args, Debug)]
pub struct HeaderArgs {
    #[arg(long)]
    pub ris_no: Option<String>,

    #[arg(long)]
    pub department: Option<u64>,

    #[arg(long)]
    pub requested_by: Option<String>,

    #[arg(long)]
    pub designation: Option<String>,

    #[arg(long)]
    pub purpose: Option<String>,

    /// Stock comes from an inspection instead of the warehouse
    #[arg(long)]
    pub with_inspection: bool,
}

impl HeaderArgs {
    /// Overlay the given fields on `base`
    fn apply(self, mut base: RequisitionPayload) -> RequisitionPayload {
        if let Some(v) = self.ris_no {
            base.ris_no = v;
        }
        if let Some(v) = self.department {
            base.department_id = v;
        }
        if let Some(v) = self.requested_by {
            base.requested_by = v;
        }
        if let Some(v) = self.designation {
            base.designation = v;
        }
        if let Some(v) = self.purpose {
            base.purpose = v;
        }
        base.with_inspection |= self.with_inspection;
        base
    }
}

pub async fn run(ctx: &Context, cmd: ReqCommands) -> anyhow::Result<()> {
    match cmd {
        ReqCommands::List {
            tab,
            search,
            department,
            page,
        } => {
            let mut view = RequisitionListView::new(ctx.clone(), tab);
            view.set_search(search);
            view.set_department(department);
            view.set_page(page);
            let list = view.load().await?;
            println!("{}\n", tab.title());
            output::print_requisitions(&list);
        }
        ReqCommands::Show { id } => {
            let mut view = RequisitionDetailView::new(ctx.clone(), id);
            let url = view.printable_url();
            let detail = view.load().await?;
            output::print_requisition(detail, &url);
        }
        ReqCommands::Create { header } => {
            let view = RequisitionListView::new(ctx.clone(), RequisitionTab::Pending);
            let created = view.create(&header.apply(RequisitionPayload::default())).await?;
            println!("Requisition {} ({})", created.id, created.ris_no);
        }
        ReqCommands::Update { id, header } => {
            let mut view = RequisitionDetailView::new(ctx.clone(), id);
            view.load().await?;
            let base = view.header_form().unwrap_or_default();
            view.update_header(&header.apply(base)).await?;
        }
        ReqCommands::Delete { id, yes } => {
            if !confirm("Delete this requisition?", yes) {
                println!("Aborted.");
                return Ok(());
            }
            let view = RequisitionListView::new(ctx.clone(), RequisitionTab::Pending);
            view.delete(id).await?;
        }
        ReqCommands::AddItem {
            id,
            stock,
            search,
            quantity,
        } => add_item(ctx, id, stock, search, &quantity).await?,
        ReqCommands::SetQuantity { id, item, quantity } => {
            let mut view = RequisitionDetailView::new(ctx.clone(), id);
            view.load().await?;
            view.begin_edit(item)?;
            view.set_edit_quantity(&quantity);
            view.save_edit().await?;
        }
        ReqCommands::RemoveItem { id, item, yes } => {
            if !confirm("Remove this item?", yes) {
                println!("Aborted.");
                return Ok(());
            }
            let mut view = RequisitionDetailView::new(ctx.clone(), id);
            view.remove_item(item).await?;
        }
        ReqCommands::MarkForDispense { id } => {
            let mut view = RequisitionDetailView::new(ctx.clone(), id);
            if view.mark_for_dispense().await? == MarkOutcome::AlreadyMarked {
                println!("Requisition is already marked for dispensing.");
            }
        }
        ReqCommands::Dispense { id, yes } => {
            let mut view = RequisitionDetailView::new(ctx.clone(), id);
            match view.dispense(|prompt| confirm(prompt, yes)).await? {
                Some(created) => println!("Dispense {} (id {})", created.dispense_code, created.id),
                None => println!("Dispense created; see `ims dispenses list`."),
            }
        }
    }
    Ok(())
}

async fn add_item(
    ctx: &Context,
    id: u64,
    stock: Option<u64>,
    search: Option<String>,
    quantity: &str,
) -> anyhow::Result<()> {
    let mut view = RequisitionDetailView::new(ctx.clone(), id);
    let picker = view.open_add_item().await?;
    picker.set_text(search.as_deref().unwrap_or_default());
    picker.set_quantity_text(quantity);

    let results = view.search_stocks().await?.to_vec();
    let chosen = match stock {
        Some(stock_id) => Some(stock_id),
        None if results.is_empty() => None,
        None => {
            let labels: Vec<String> = results
                .iter()
                .map(|s| {
                    format!(
                        "{} | lot {} | balance {}",
                        s.product_name(),
                        s.lot_no.as_deref().unwrap_or("-"),
                        s.running_balance.normalize()
                    )
                })
                .collect();
            let index = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Stock batch")
                .items(&labels)
                .default(0)
                .interact_opt()
                .context("reading stock selection")?;
            index.map(|i| results[i].id)
        }
    };

    if let Some(picker) = view.picker() {
        if let Some(stock_id) = chosen {
            picker.select(stock_id);
        }
        if let Some(warning) = picker.balance_warning() {
            eprintln!("warning: {warning}");
        }
    }
    let item = view.add_item().await?;
    println!("Item {} added", item.id);
    Ok(())
}
