// RPTO Leads - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Opening the lead table and dispatching the command
//
// This is the outermost boundary: the only place that reads the local
// clock and time zone.

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use rpto_leads::app::leads::{export_file_name, LeadBook};
use rpto_leads::app::store::JsonFileStore;
use rpto_leads::core::filter::LeadFilter;
use rpto_leads::core::import::generate_sample_csv;
use rpto_leads::core::model::{Lead, LeadDraft, LeadStatus, LeadUpdate};
use rpto_leads::core::timeline::format_date;
use rpto_leads::platform::config::{load_config, AppConfig, PlatformPaths};
use rpto_leads::platform::fs::write_atomic;
use rpto_leads::util::constants::{APP_NAME, APP_VERSION, SAMPLE_CSV_FILE_NAME};
use rpto_leads::util::error::{LeadsError, Result};
use rpto_leads::util::logging;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// RPTO Leads - local lead tracker for drone-pilot training enquiries.
#[derive(Parser, Debug)]
#[command(name = "rpto-leads", version, about)]
struct Cli {
    /// Lead table to use instead of the configured/default one.
    #[arg(long = "data-file", global = true)]
    data_file: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List leads grouped by date (Today, Yesterday, Last 7 Days, Older).
    List(FilterArgs),
    /// Show every field of one lead.
    Show { id: String },
    /// Add a lead by hand. Name, place and phone are required.
    Add(FieldArgs),
    /// Change fields of an existing lead.
    Update {
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a lead.
    Delete { id: String },
    /// Bulk-import leads from a CSV file.
    Import { file: PathBuf },
    /// Export the (filtered) leads to CSV.
    Export {
        /// Output file (default: <prefix>_YYYY-MM-DD.csv in the current directory).
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Write the CSV import template.
    Sample {
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },
    /// Print the first-contact WhatsApp message for a lead.
    Contact { id: String },
    /// Print the welcome message for a converted lead.
    Greet { id: String },
}

/// Filters shared by `list` and `export`. All given filters must match.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Name contains (case-insensitive).
    #[arg(long)]
    name: Option<String>,
    /// Place contains (case-insensitive).
    #[arg(long)]
    place: Option<String>,
    /// Phone contains these digits.
    #[arg(long)]
    phone: Option<String>,
    /// Exact status: New, Contacted, Converted or Lost.
    #[arg(long)]
    status: Option<LeadStatus>,
    /// Created on this date (YYYY-MM-DD).
    #[arg(long)]
    date: Option<String>,
}

impl FilterArgs {
    fn into_filter(self) -> LeadFilter {
        LeadFilter {
            name: self.name.unwrap_or_default(),
            place: self.place.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            status: self.status,
            date: self.date.unwrap_or_default(),
        }
    }
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    place: Option<String>,
    #[arg(long)]
    status: Option<LeadStatus>,
    #[arg(long = "image-url")]
    image_url: Option<String>,
    #[arg(long)]
    remarks: Option<String>,
}

impl FieldArgs {
    fn into_draft(self) -> LeadDraft {
        LeadDraft {
            name: self.name.unwrap_or_default(),
            age: self.age.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            place: self.place.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            image_url: self.image_url.unwrap_or_default(),
            remarks: self.remarks.unwrap_or_default(),
        }
    }

    fn into_update(self) -> LeadUpdate {
        LeadUpdate {
            name: self.name,
            age: self.age,
            phone: self.phone,
            email: self.email,
            place: self.place,
            status: self.status,
            image_url: self.image_url,
            remarks: self.remarks,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is read before logging starts so its level can apply; problems
    // are reported once the subscriber exists.
    let platform_paths = PlatformPaths::resolve();
    let (config, config_errors) = load_config(&platform_paths.config_dir);

    logging::init(cli.debug, config.log_level.as_deref());
    tracing::info!(
        app = APP_NAME,
        version = APP_VERSION,
        debug = cli.debug,
        "Starting"
    );

    for err in &config_errors {
        tracing::warn!(error = %err, "Configuration problem; using defaults");
    }

    match run(cli, &platform_paths, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, paths: &PlatformPaths, config: &AppConfig) -> Result<()> {
    let store_path = cli
        .data_file
        .or_else(|| config.store_file.clone())
        .unwrap_or_else(|| paths.default_store_file());
    let open_book = || -> Result<LeadBook<JsonFileStore>> {
        let book = LeadBook::new(JsonFileStore::open(&store_path)?);
        tracing::debug!(path = %book.store().path().display(), "Using lead table");
        Ok(book)
    };

    match cli.command {
        Command::List(filter) => list(&open_book()?, &filter.into_filter()),
        Command::Show { id } => {
            print_lead(&open_book()?.get(&id)?);
            Ok(())
        }
        Command::Add(fields) => {
            let lead = open_book()?.create(fields.into_draft())?;
            println!("Added {} ({})", lead.name, lead.id);
            Ok(())
        }
        Command::Update { id, fields } => {
            let changes = fields.into_update();
            if changes.is_empty() {
                println!("Nothing to update.");
                return Ok(());
            }
            let lead = open_book()?.update(&id, &changes)?;
            println!("Updated {} ({})", lead.name, lead.id);
            Ok(())
        }
        Command::Delete { id } => {
            open_book()?.delete(&id)?;
            println!("Deleted {id}");
            Ok(())
        }
        Command::Import { file } => {
            let outcome = open_book()?.import_file(&file)?;
            println!("Successfully imported {} leads.", outcome.inserted);
            if !outcome.skipped.is_empty() {
                println!("Skipped {} rows:", outcome.skipped.len());
                for skip in &outcome.skipped {
                    println!("  row {}: {}", skip.row, skip.reason);
                }
            }
            Ok(())
        }
        Command::Export { out, filter } => {
            let csv = open_book()?.export_csv(&filter.into_filter(), &Local)?;
            if csv.is_empty() {
                println!("No leads to export.");
                return Ok(());
            }
            let out = out.unwrap_or_else(|| {
                PathBuf::from(export_file_name(
                    &config.export_file_prefix,
                    Local::now().date_naive(),
                ))
            });
            write_output(&out, &csv)?;
            println!("Exported to {}", out.display());
            Ok(())
        }
        // The template needs no lead table.
        Command::Sample { out } => {
            let out = out.unwrap_or_else(|| PathBuf::from(SAMPLE_CSV_FILE_NAME));
            write_output(&out, &generate_sample_csv())?;
            println!("Template written to {}", out.display());
            Ok(())
        }
        Command::Contact { id } => {
            let book = open_book()?;
            let lead = book.get(&id)?;
            let message = book.contact(&id)?;
            println!("To:  {}", lead.phone);
            println!("{message}");
            Ok(())
        }
        Command::Greet { id } => {
            println!("{}", open_book()?.greeting(&id)?);
            Ok(())
        }
    }
}

fn list(book: &LeadBook<JsonFileStore>, filter: &LeadFilter) -> Result<()> {
    let view = book.view(filter)?;
    if view.is_empty() {
        println!("No leads found.");
        return Ok(());
    }

    let now = Local::now();
    let grouped = view.grouped(&now);
    for (bucket, leads) in grouped.iter().filter(|(_, leads)| !leads.is_empty()) {
        println!("{bucket} ({})", leads.len());
        for lead in leads {
            println!(
                "  {:<36}  {:<24} {:<16} {:<14} {:<10} {}",
                lead.id,
                lead.name,
                lead.place,
                lead.phone,
                lead.status,
                format_date(&lead.created_at, &Local)
            );
        }
        println!();
    }
    Ok(())
}

fn print_lead(lead: &Lead) {
    let phone = if lead.has_phone() {
        lead.phone.as_str()
    } else {
        "(none)"
    };
    println!("ID:        {}", lead.id);
    println!("Name:      {}", lead.name);
    println!("Age:       {}", lead.age);
    println!("Phone:     {phone}");
    println!("Email:     {}", lead.email);
    println!("Place:     {}", lead.place);
    println!("Status:    {}", lead.status);
    println!("Image:     {}", lead.image_url);
    println!("Created:   {}", format_date(&lead.created_at, &Local));
    println!("Remarks:");
    for line in lead.remarks.lines() {
        println!("  {line}");
    }
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes()).map_err(|e| LeadsError::Io {
        path: path.to_path_buf(),
        operation: "write",
        source: e,
    })
}
