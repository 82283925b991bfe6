//! # CLI Layer
//!
//! This module is **one possible UI client** for the registry.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Chooses a storage backend and where its data lives
//! - Installs the log subscriber
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves the data directory, loads config, opens the store
//! - `handle_*()`: Per-command handlers that call the API and print the result

use super::print::{
    print_backups, print_clients, print_full_clients, print_messages, print_stats,
};
use super::setup::{AddressArgs, Cli, Commands};
use cadastro::api::{CmdMessage, RegistryApi};
use cadastro::backup::{create_backup, list_backups};
use cadastro::commands::{SortOrder, StatusFilter};
use cadastro::config::{Backend, CadastroConfig};
use cadastro::error::{CadastroError, Result};
use cadastro::model::{ClientPatch, NewClient};
use cadastro::store::document::DocumentStore;
use cadastro::store::file::FileStore;
use cadastro::store::ClientStore;
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const HOME_ENV: &str = "CADASTRO_HOME";

struct AppContext {
    api: RegistryApi<Box<dyn ClientStore>>,
    config: CadastroConfig,
    backend: Backend,
    data_dir: PathBuf,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Add {
            name,
            cpf,
            email,
            phone,
            address,
        }) => handle_add(&mut ctx, name, cpf, email, phone, address),
        Some(Commands::List {
            active,
            inactive,
            sort_name,
            recent,
        }) => {
            let order = if recent {
                SortOrder::Deactivated
            } else {
                sort_order(sort_name)
            };
            handle_list(&ctx, active, inactive, order)
        }
        Some(Commands::Show { identifier }) => handle_show(&ctx, &identifier),
        Some(Commands::Search { term, sort_name }) => handle_search(&ctx, &term, sort_name),
        Some(Commands::City { name }) => handle_city(&ctx, &name),
        Some(Commands::Update {
            identifier,
            name,
            cpf,
            email,
            phone,
            address,
        }) => {
            let patch = ClientPatch {
                name,
                tax_id: cpf,
                email,
                phone,
                address: Some(address.into_patch()).filter(|a| !a.is_empty()),
            };
            handle_update(&mut ctx, &identifier, &patch)
        }
        Some(Commands::Remove { identifier, hard }) => handle_remove(&mut ctx, &identifier, hard),
        Some(Commands::Reactivate { identifier }) => handle_reactivate(&mut ctx, &identifier),
        Some(Commands::Stats) => handle_stats(&ctx),
        Some(Commands::Purge { days }) => handle_purge(&mut ctx, days),
        Some(Commands::Backups) => handle_backups(&ctx),
        Some(Commands::Import { file }) => handle_import(&mut ctx, &file),
        Some(Commands::Clear { yes }) => handle_clear(&mut ctx, yes),
        None => handle_list(&ctx, false, false, SortOrder::Natural),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(home) = &cli.home {
        return Ok(home.clone());
    }
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("br", "cadastro", "cadastro")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            CadastroError::StoreUnavailable("could not determine a data directory".to_string())
        })
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    let config = CadastroConfig::load(&data_dir)?;
    let backend = cli.backend.map(Backend::from).unwrap_or(config.backend);

    let store: Box<dyn ClientStore> = match backend {
        Backend::File => Box::new(FileStore::open(config.data_file_path(&data_dir))?),
        Backend::Document => Box::new(DocumentStore::open_dir(config.documents_path(&data_dir))?),
    };
    debug!(store = %store.describe(), dir = %data_dir.display(), "store opened");

    Ok(AppContext {
        api: RegistryApi::new(store),
        config,
        backend,
        data_dir,
    })
}

/// Copies the data file aside before an irreversible change on the file backend.
fn backup_before_delete(ctx: &AppContext) -> Result<()> {
    if ctx.backend != Backend::File || !ctx.config.backup_before_delete {
        return Ok(());
    }
    let saved = create_backup(
        &ctx.config.data_file_path(&ctx.data_dir),
        &ctx.config.backup_path(&ctx.data_dir),
    )?;
    if let Some(path) = saved {
        println!("{}", format!("Backup saved to {}", path.display()).dimmed());
    }
    Ok(())
}

fn handle_add(
    ctx: &mut AppContext,
    name: String,
    cpf: String,
    email: Option<String>,
    phone: Option<String>,
    address: AddressArgs,
) -> Result<()> {
    let input = NewClient {
        name,
        tax_id: cpf,
        email,
        phone,
        address: address.into_address(),
    };
    let result = ctx.api.create(input)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, active: bool, inactive: bool, order: SortOrder) -> Result<()> {
    let filter = match (active, inactive) {
        (true, _) => StatusFilter::Active,
        (_, true) => StatusFilter::Inactive,
        _ => StatusFilter::All,
    };
    let result = ctx.api.list(filter, order)?;
    print_clients(&result.listed);
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, identifier: &str) -> Result<()> {
    let result = ctx.api.show(identifier)?;
    print_full_clients(&result.listed);
    Ok(())
}

fn handle_search(ctx: &AppContext, term: &str, sort_name: bool) -> Result<()> {
    let result = ctx.api.search_name(term, sort_order(sort_name))?;
    print_clients(&result.listed);
    Ok(())
}

fn handle_city(ctx: &AppContext, name: &str) -> Result<()> {
    let result = ctx.api.search_city(name)?;
    print_clients(&result.listed);
    Ok(())
}

fn handle_update(ctx: &mut AppContext, identifier: &str, patch: &ClientPatch) -> Result<()> {
    let result = ctx.api.update(identifier, patch)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, identifier: &str, hard: bool) -> Result<()> {
    if hard {
        backup_before_delete(ctx)?;
    }
    let result = ctx.api.remove(identifier, hard)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_reactivate(ctx: &mut AppContext, identifier: &str) -> Result<()> {
    let result = ctx.api.reactivate(identifier)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_stats(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.stats()?;
    if let Some(stats) = &result.stats {
        print_stats(stats);
    }
    Ok(())
}

fn handle_purge(ctx: &mut AppContext, days: Option<i64>) -> Result<()> {
    let days = days.unwrap_or(ctx.config.purge_days);
    backup_before_delete(ctx)?;
    let result = ctx.api.purge_inactive(days)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_backups(ctx: &AppContext) -> Result<()> {
    let backups = list_backups(&ctx.config.backup_path(&ctx.data_dir))?;
    print_backups(&backups);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)?;
    let inputs: Vec<NewClient> = serde_json::from_str(&content)?;
    debug!(file = %file.display(), entries = inputs.len(), "importing clients");
    let result = ctx.api.create_many(inputs)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_clear(ctx: &mut AppContext, yes: bool) -> Result<()> {
    let count = ctx
        .api
        .list(StatusFilter::All, SortOrder::Natural)?
        .listed
        .len();
    if count == 0 {
        print_messages(&[CmdMessage::info("No clients to remove.")]);
        return Ok(());
    }

    if !yes {
        print!(
            "This will permanently remove all {} client(s). [Y] To delete: ",
            count
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim() != "Y" {
            print_messages(&[CmdMessage::info("Operation cancelled.")]);
            return Ok(());
        }
    }

    backup_before_delete(ctx)?;
    let result = ctx.api.clear()?;
    print_messages(&result.messages);
    Ok(())
}

fn sort_order(by_name: bool) -> SortOrder {
    if by_name {
        SortOrder::Name
    } else {
        SortOrder::Natural
    }
}
