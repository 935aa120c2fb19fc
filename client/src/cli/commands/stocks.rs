//! Warehouse stock commands

use clap::Subcommand;
use shared::models::StockSearch;
use shared::types::PageParams;

use crate::cli::output;
use crate::views::Context;

#[derive(Subcommand, Debug)]
pub enum StockCommands {
    /// Search batches available for requisitions
    Search {
        /// Free text matched against product, lot and brand
        search: Option<String>,

        #[arg(long)]
        category: Option<u64>,

        #[arg(long)]
        fund_cluster: Option<u64>,

        #[arg(long)]
        generic_name: Option<u64>,

        #[arg(long, short = 'p', default_value_t = 1)]
        page: u32,
    },
}

pub async fn run(ctx: &Context, cmd: StockCommands) -> anyhow::Result<()> {
    match cmd {
        StockCommands::Search {
            search,
            category,
            fund_cluster,
            generic_name,
            page,
        } => {
            let filters = StockSearch {
                search,
                category_id: category,
                fund_cluster_id: fund_cluster,
                generic_name_id: generic_name,
            };
            let page = PageParams::new(page, PageParams::default().page_size);
            let stocks = ctx.api.requisitions.warehouse_stocks(&filters, page).await?;
            output::print_stocks(&stocks.data);
        }
    }
    Ok(())
}
