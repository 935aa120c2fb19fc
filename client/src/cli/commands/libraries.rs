//! Library commands

use clap::Subcommand;
use shared::models::{LibraryFilters, LibraryKind, LibraryPayload};

use super::confirm;
use crate::cli::parse_library;
use crate::views::{Context, CrudView, LibraryResource};

#[derive(Subcommand, Debug)]
pub enum LibraryCommands {
    /// List records of a library
    List {
        #[arg(value_parser = parse_library)]
        kind: LibraryKind,

        #[arg(long, short = 'n')]
        name: Option<String>,

        #[arg(long, short = 'p', default_value_t = 1)]
        page: u32,
    },

    /// Add a record
    Create {
        #[arg(value_parser = parse_library)]
        kind: LibraryKind,

        name: String,
    },

    /// Rename a record
    Update {
        #[arg(value_parser = parse_library)]
        kind: LibraryKind,

        id: u64,

        name: String,
    },

    /// Delete a record
    Delete {
        #[arg(value_parser = parse_library)]
        kind: LibraryKind,

        id: u64,

        #[arg(long, short = 'y')]
        yes: bool,
    },
}

fn view(ctx: &Context, kind: LibraryKind) -> CrudView<LibraryResource> {
    CrudView::new(ctx.clone(), LibraryResource::new(ctx.api.library(kind)))
}

pub async fn run(ctx: &Context, cmd: LibraryCommands) -> anyhow::Result<()> {
    match cmd {
        LibraryCommands::List { kind, name, page } => {
            let mut view = view(ctx, kind);
            view.set_filters(LibraryFilters { name });
            view.set_page(page);
            let list = view.load().await?;
            println!("{}\n", kind.label());
            println!("{:<6} NAME", "ID");
            for record in &list.data {
                println!("{:<6} {}", record.id, record.name);
            }
        }
        LibraryCommands::Create { kind, name } => {
            view(ctx, kind).create(&LibraryPayload::new(name)).await?;
        }
        LibraryCommands::Update { kind, id, name } => {
            view(ctx, kind).update(id, &LibraryPayload::new(name)).await?;
        }
        LibraryCommands::Delete { kind, id, yes } => {
            let prompt = format!("Delete this {}?", kind.singular().to_lowercase());
            if !confirm(&prompt, yes) {
                println!("Aborted.");
                return Ok(());
            }
            view(ctx, kind).delete(id).await?;
        }
    }
    Ok(())
}
