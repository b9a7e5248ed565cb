//! Context setup and dispatch.
//!
//! - `run()`: parses arguments, installs the logger, builds the context, dispatches
//! - `init_context()`: resolves the data dir, loads config, builds the API
//! - `handle_*()`: per-command handlers that call the API and print the result
//!
//! Handlers return `Ok(false)` when the command finished with an error notice, which
//! `main` turns into exit status 1.

use super::print::{
    print_choices, print_config, print_full_vehicles, print_messages, print_stats,
    print_vehicle_list,
};
use super::setup::{
    print_grouped_help, print_help_for_command, print_subcommand_help, Cli, Commands, FieldArgs,
};
use chrono::Utc;
use clap::Parser;
use directories::ProjectDirs;
use log::{debug, LevelFilter};
use rcbook::api::{
    parse_refs, CmdResult, ConfigAction, ExportScope, RcbookApi, RcbookPaths, RecordRef,
};
use rcbook::commands::form;
use rcbook::config::RcbookConfig;
use rcbook::error::{RcbookError, Result};
use rcbook::layout::LayoutTable;
use rcbook::render::PdfRenderer;
use rcbook::store::fs_backend::FsBackend;
use rcbook::store::VehicleStore;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::PathBuf;

const DATA_DIR_ENV: &str = "RCBOOK_DATA_DIR";

struct AppContext {
    api: RcbookApi<FsBackend, PdfRenderer>,
    config: RcbookConfig,
}

pub fn run() -> Result<bool> {
    let cli = Cli::parse();

    if cli.help {
        if cli.command.is_none() {
            print_grouped_help();
        } else {
            print_subcommand_help(&cli.command);
        }
        return Ok(true);
    }

    init_logging(cli.verbose);

    if let Some(Commands::Help { command }) = &cli.command {
        match command {
            Some(name) => print_help_for_command(name),
            None => print_grouped_help(),
        }
        return Ok(true);
    }
    if let Some(Commands::Choices) = &cli.command {
        print_choices(&form::choices());
        return Ok(true);
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Add { fields }) => handle_add(&mut ctx, fields),
        Some(Commands::List { search }) => handle_list(&ctx, search),
        Some(Commands::View { refs }) => handle_view(&ctx, refs),
        Some(Commands::Edit { reference, fields }) => handle_edit(&mut ctx, reference, fields),
        Some(Commands::Delete { refs }) => handle_delete(&mut ctx, refs),
        Some(Commands::Pdf { refs, out }) => handle_pdf(&ctx, refs, out),
        Some(Commands::Export {
            all,
            search,
            refs,
            out,
        }) => handle_export(&ctx, all, search, refs, out),
        Some(Commands::Stats) => handle_stats(&ctx),
        Some(Commands::Sample) => handle_sample(&mut ctx),
        Some(Commands::Config { key, value, unset }) => handle_config(&ctx, key, value, unset),
        Some(Commands::Choices) | Some(Commands::Help { .. }) => Ok(true),
        None => handle_list(&ctx, None),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // A logger may already be installed when embedded; keep going without ours.
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "rcbook", "rcbook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| RcbookError::Api("Could not determine data directory".to_string()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    debug!("Using data directory {}", data_dir.display());

    let paths = RcbookPaths::new(data_dir);
    let config = RcbookConfig::load(paths.config_dir())?;

    let store =
        VehicleStore::with_backend(FsBackend::new(paths.store_dir())).with_key(&config.storage_key);

    let mut renderer = PdfRenderer::new(LayoutTable::standard());
    if let Some(background) = &config.background_image {
        renderer = renderer.with_background_file(background.clone());
    }

    Ok(AppContext {
        api: RcbookApi::new(store, renderer, paths),
        config,
    })
}

/// Prints notices and reports whether the command succeeded.
fn finish(result: &CmdResult) -> bool {
    print_messages(&result.messages);
    !result.has_errors()
}

fn out_dir(ctx: &AppContext, out: Option<PathBuf>) -> PathBuf {
    out.unwrap_or_else(|| ctx.config.output_dir())
}

fn handle_add(ctx: &mut AppContext, fields: FieldArgs) -> Result<bool> {
    let result = ctx.api.create(&fields.into_fields())?;
    if let Some(vehicle) = result.affected_vehicles.first() {
        print_full_vehicles(std::slice::from_ref(vehicle));
        println!();
    }
    Ok(finish(&result))
}

fn handle_list(ctx: &AppContext, search: Option<String>) -> Result<bool> {
    let result = ctx.api.list(search.as_deref())?;
    print_vehicle_list(&result.listed_vehicles);
    Ok(finish(&result))
}

fn handle_view(ctx: &AppContext, refs: Vec<String>) -> Result<bool> {
    let result = ctx.api.view(&parse_refs(&refs)?)?;
    print_full_vehicles(&result.listed_vehicles);
    Ok(finish(&result))
}

fn handle_edit(ctx: &mut AppContext, reference: String, fields: FieldArgs) -> Result<bool> {
    let target: RecordRef = reference.parse()?;
    let fields = fields.into_fields();
    if fields.is_empty() {
        return Err(RcbookError::Api(
            "Nothing to change: pass at least one field flag".to_string(),
        ));
    }
    let result = ctx.api.update(&target, &fields)?;
    Ok(finish(&result))
}

fn handle_delete(ctx: &mut AppContext, refs: Vec<String>) -> Result<bool> {
    let result = ctx.api.delete(&parse_refs(&refs)?)?;
    Ok(finish(&result))
}

fn handle_pdf(ctx: &AppContext, refs: Vec<String>, out: Option<PathBuf>) -> Result<bool> {
    let result = ctx.api.export_one(&parse_refs(&refs)?, &out_dir(ctx, out))?;
    Ok(finish(&result))
}

fn handle_export(
    ctx: &AppContext,
    all: bool,
    search: Option<String>,
    refs: Vec<String>,
    out: Option<PathBuf>,
) -> Result<bool> {
    let scope = if all {
        ExportScope::All
    } else {
        ExportScope::Refs(parse_refs(&refs)?)
    };
    let today = Utc::now().date_naive();
    let result = ctx
        .api
        .export_bulk(search.as_deref(), &scope, &out_dir(ctx, out), today)?;
    for path in &result.files {
        println!("{}", path.display());
    }
    Ok(finish(&result))
}

fn handle_stats(ctx: &AppContext) -> Result<bool> {
    let result = ctx.api.stats()?;
    if let Some(stats) = &result.stats {
        print_stats(stats);
    }
    Ok(finish(&result))
}

fn handle_sample(ctx: &mut AppContext) -> Result<bool> {
    let result = ctx.api.seed_samples()?;
    Ok(finish(&result))
}

fn handle_config(
    ctx: &AppContext,
    key: Option<String>,
    value: Option<String>,
    unset: bool,
) -> Result<bool> {
    let action = match (key, value) {
        (None, _) if unset => {
            return Err(RcbookError::Api("--unset needs a config key".to_string()))
        }
        (None, _) => ConfigAction::ShowAll,
        (Some(k), _) if unset => ConfigAction::Unset(k),
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            print_config(config);
        }
    }
    Ok(finish(&result))
}
