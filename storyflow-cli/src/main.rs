mod cli;
mod prompts;

use anyhow::{Context, Result};
use clap::Parser;
use colored::{ColoredString, Colorize};
use std::path::{Path, PathBuf};

use storyflow_core::config::{self, Settings};
use storyflow_core::view::{build_cards, build_inventory, classifications, filter_records};
use storyflow_core::{
    create_backend, import_file_with_progress, AiClient, Card, Language, LanguageMode, Priority,
    RecordStore, RequirementRecord, SectionBody, ViewFilter,
};

use crate::cli::{Cli, Command, ConfigCommand};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Settings commands work even when the settings file is broken
    if let Command::Config(cmd) = &cli.command {
        return handle_config_command(cmd, cli.snapshot.as_deref());
    }

    let settings = Settings::load_default()?;
    let snapshot_path = resolve_snapshot_path(cli.snapshot.as_deref(), &settings)?;
    log::debug!("Using snapshot {}", snapshot_path.display());
    let mut store = RecordStore::open(create_backend(&snapshot_path, None));

    match &cli.command {
        Command::Import { file } => {
            let client = if cli.offline {
                AiClient::disabled()
            } else {
                AiClient::with_timeout(settings.ai_mode(), settings.request_timeout())
            };
            import_sheet(&mut store, &client, file)?;
        }
        Command::List {
            search,
            lang,
            classification,
            expand,
        } => {
            let mode = parse_language_mode(lang)?;
            let search = search.clone().unwrap_or_default();
            let filter = ViewFilter::new(search, classification.clone());
            list_records(&store, &filter, mode, *expand);
        }
        Command::Show { id, lang } => {
            let mode = parse_language_mode(lang)?;
            show_record(&store, id.as_deref(), mode)?;
        }
        Command::Del { id, yes } => {
            delete_record(&mut store, id.as_deref(), *yes)?;
        }
        Command::Purge { yes } => {
            purge_records(&mut store, *yes)?;
        }
        Command::Move { from, to } => {
            move_record(&mut store, *from, *to)?;
        }
        Command::Classes => {
            list_classes(&store);
        }
        Command::Inventory { lang } => {
            let mode = parse_language_mode(lang)?;
            print_inventory(&store, mode);
        }
        // Handled before the store is opened
        Command::Config(_) => {}
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn resolve_snapshot_path(flag: Option<&Path>, settings: &Settings) -> Result<PathBuf> {
    match flag {
        Some(path) => Ok(path.to_path_buf()),
        None => settings.snapshot_path(),
    }
}

fn parse_language_mode(s: &str) -> Result<LanguageMode> {
    s.parse::<LanguageMode>().map_err(anyhow::Error::msg)
}

fn import_sheet(store: &mut RecordStore, client: &AiClient, file: &Path) -> Result<()> {
    if !client.is_available() {
        println!(
            "{}",
            "AI enrichment is not configured; sheet values are kept as they are.".yellow()
        );
    } else {
        println!("Enriching with {}", client.mode_description().cyan());
    }

    let summary = import_file_with_progress(file, client, store, |done, total| {
        eprint!("\r  Processing row {}/{}", done, total);
        if done == total {
            eprintln!();
        }
    })
    .with_context(|| format!("Import of {} failed", file.display()))?;

    println!(
        "{} {} requirement(s) from a {} sheet ({} of {} row(s) had content)",
        "Imported".green(),
        summary.records_added,
        summary.layout,
        summary.rows_kept,
        summary.rows_parsed
    );
    println!("{} requirement(s) stored", store.len());

    Ok(())
}

fn priority_colored(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "High".red(),
        Priority::Medium => "Medium".yellow(),
        Priority::Low => "Low".green(),
    }
}

/// Cut to `width` characters, marking the cut with an ellipsis
fn truncate(s: &str, width: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= width {
        return s;
    }
    let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn short_id(record: &RequirementRecord) -> String {
    record.id.to_string().chars().take(8).collect()
}

fn list_records(store: &RecordStore, filter: &ViewFilter, mode: LanguageMode, expand: bool) {
    let records = filter_records(store.records(), filter);

    if records.is_empty() {
        if store.is_empty() {
            println!("{}", "No requirements stored yet. Import a sheet first.".yellow());
        } else {
            println!("{}", "No requirements found.".yellow());
        }
        return;
    }

    if expand {
        for record in &records {
            let position = store.position(&record.id).map(|p| p + 1).unwrap_or(0);
            println!(
                "{} {}  {}  {}",
                format!("#{}", position).bold(),
                record.classification.cyan(),
                priority_colored(record.priority),
                record.id.to_string().dimmed()
            );
            for card in build_cards(record, mode) {
                print_card(&card);
            }
            println!();
        }
    } else {
        println!(
            "{:<4} | {:<8} | {:<40} | {:<18} | {:<8}",
            "#", "ID", "Title", "Classification", "Priority"
        );
        println!("{}", "-".repeat(90));

        for record in &records {
            let position = store.position(&record.id).map(|p| p + 1).unwrap_or(0);
            let title = mode
                .languages()
                .iter()
                .map(|&lang| record.title(lang))
                .collect::<Vec<_>>()
                .join(" / ");

            println!(
                "{:<4} | {:<8} | {:<40} | {:<18} | {:<8}",
                position,
                short_id(record),
                truncate(&title, 40),
                truncate(&record.classification, 18),
                priority_colored(record.priority)
            );
        }
    }

    if records.len() != store.len() {
        println!(
            "{}",
            format!("{} of {} requirement(s) shown", records.len(), store.len()).dimmed()
        );
    }
}

fn print_card(card: &Card) {
    let indent = "  ";
    let tag = match card.lang {
        Language::En => "EN".blue().bold(),
        Language::Ar => "AR".green().bold(),
    };

    println!("{}[{}] {}", indent, tag, card.title.bold());
    if !card.description.is_empty() {
        println!("{}  {}", indent, card.description_heading().underline());
        for line in card.description.lines() {
            println!("{}    {}", indent, line.italic());
        }
    }

    for section in &card.sections {
        println!("{}  {}", indent, section.label.to_uppercase().bold());
        match &section.body {
            SectionBody::Text(text) => {
                for line in text.lines() {
                    println!("{}    {}", indent, line);
                }
            }
            SectionBody::Bullets(lines) => {
                for line in lines {
                    println!("{}    • {}", indent, line);
                }
            }
        }
    }
}

fn pick_id(store: &RecordStore, id_str: Option<&str>, message: &str) -> Result<uuid::Uuid> {
    match id_str {
        Some(id_str) => store.resolve_id(id_str),
        None => prompts::select_record(store.records(), message),
    }
}

fn show_record(store: &RecordStore, id_str: Option<&str>, mode: LanguageMode) -> Result<()> {
    let id = pick_id(store, id_str, "Requirement to show:")?;
    let record = store.get(&id).context("Requirement not found")?;
    let position = store.position(&id).map(|p| p + 1).unwrap_or(0);

    println!("{}", format!("Requirement #{}", position).bold());
    println!("  ID: {}", record.id);
    println!("  Classification: {}", record.classification.cyan());
    println!("  Priority: {}", priority_colored(record.priority));
    println!();

    for card in build_cards(record, mode) {
        print_card(&card);
        println!();
    }

    Ok(())
}

fn delete_record(store: &mut RecordStore, id_str: Option<&str>, skip_confirm: bool) -> Result<()> {
    let id = pick_id(store, id_str, "Requirement to delete:")?;
    let record = store.get(&id).context("Requirement not found")?;

    println!("{}", "Requirement to delete:".yellow());
    println!("  ID: {}", record.id);
    println!("  Title: {}", record.title_en);
    println!("  العنوان: {}", record.title_ar);
    println!("  Classification: {}", record.classification);

    // Confirm deletion unless --yes flag is used
    if !skip_confirm && !prompts::confirm_delete()? {
        println!("{}", "Deletion cancelled.".yellow());
        return Ok(());
    }

    if store.delete(&id)? {
        println!("{}", "Requirement deleted successfully!".green());
    } else {
        println!("{}", "Requirement not found.".yellow());
    }

    Ok(())
}

fn purge_records(store: &mut RecordStore, skip_confirm: bool) -> Result<()> {
    if store.is_empty() && !store.backend().exists() {
        println!("{}", "Nothing to delete.".yellow());
        return Ok(());
    }

    if !skip_confirm && !prompts::confirm_purge(store.len())? {
        println!("{}", "Purge cancelled.".yellow());
        return Ok(());
    }

    let count = store.len();
    store.delete_all()?;
    println!(
        "{}",
        format!("Deleted {} requirement(s) and the saved snapshot.", count).green()
    );

    Ok(())
}

fn move_record(store: &mut RecordStore, from: isize, to: isize) -> Result<()> {
    // Positions on the command line start at 1
    let moved = match (from.checked_sub(1), to.checked_sub(1)) {
        (Some(from_idx), Some(to_idx)) => store.reorder(from_idx, to_idx)?,
        _ => false,
    };

    if moved {
        println!(
            "{}",
            format!("Moved requirement #{} to position {}", from, to).green()
        );
    } else {
        println!(
            "{}",
            format!(
                "Positions must be between 1 and {}; nothing moved.",
                store.len()
            )
            .yellow()
        );
    }
    Ok(())
}

fn list_classes(store: &RecordStore) {
    let classes = classifications(store.records());
    if classes.is_empty() {
        println!("{}", "No classifications found.".yellow());
        return;
    }

    for class in classes {
        let count = store
            .records()
            .iter()
            .filter(|r| r.classification == class)
            .count();
        println!("{:<30} {}", class.cyan(), count);
    }
}

fn print_inventory(store: &RecordStore, mode: LanguageMode) {
    if store.is_empty() {
        println!("{}", "No requirements stored yet. Import a sheet first.".yellow());
        return;
    }

    const COLUMN_WIDTH: usize = 20;
    let inventory = build_inventory(store.records());

    let mut header = format!("{:<4} | {:<8} | {:<30}", "#", "ID", "Title");
    for column in &inventory.columns {
        header.push_str(&format!(" | {:<w$}", truncate(column, COLUMN_WIDTH), w = COLUMN_WIDTH));
    }
    println!("{}", header.bold());
    println!("{}", "-".repeat(header.chars().count()));

    for (idx, (record, row)) in store.records().iter().zip(&inventory.rows).enumerate() {
        let title = mode
            .languages()
            .iter()
            .map(|&lang| record.title(lang))
            .collect::<Vec<_>>()
            .join(" / ");

        let mut line = format!(
            "{:<4} | {:<8} | {:<30}",
            idx + 1,
            short_id(record),
            truncate(&title, 30)
        );
        for value in row {
            line.push_str(&format!(" | {:<w$}", truncate(value, COLUMN_WIDTH), w = COLUMN_WIDTH));
        }
        println!("{}", line);
    }

    if inventory.columns.is_empty() {
        println!("{}", "The imported sheets had no extra columns.".dimmed());
    }
}

/// Handle settings subcommands
fn handle_config_command(cmd: &ConfigCommand, snapshot_flag: Option<&Path>) -> Result<()> {
    let path = config::config_path()?;

    match cmd {
        ConfigCommand::Path => {
            println!("{}", path.display());
        }
        ConfigCommand::Init => {
            if Settings::create_default(&path)? {
                println!("{} {}", "Created".green(), path.display());
            } else {
                println!("{} {}", "Settings file already exists:".yellow(), path.display());
            }
        }
        ConfigCommand::Show => {
            let settings = Settings::load_default()?;
            let snapshot_path = resolve_snapshot_path(snapshot_flag, &settings)?;
            let backend = create_backend(&snapshot_path, None);
            let client = AiClient::with_timeout(settings.ai_mode(), settings.request_timeout());

            println!("{}", "Settings".bold());
            println!(
                "  File: {}{}",
                path.display(),
                if path.exists() { "" } else { " (not created)" }
            );
            println!(
                "  API key: {}",
                settings
                    .masked_api_key()
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!("  Model: {}", settings.model);
            println!("  API base: {}", settings.api_base);
            if let Some(cli_path) = &settings.claude_cli {
                println!("  Claude CLI: {}", cli_path.display());
            }
            println!("  Request timeout: {}s", settings.request_timeout().as_secs());
            println!(
                "  AI mode: {}{}",
                client.mode_description(),
                if client.is_available() {
                    String::new()
                } else {
                    format!(" {}", "(unavailable)".yellow())
                }
            );
            println!("  Snapshot: {}", backend.describe());
        }
    }

    Ok(())
}
