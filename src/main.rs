use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use url::Url;

use podpress::{
    FieldMapping, GenerateOptions, NoopReporter, RenderEvent, Reporter, ReqwestClient,
    SharedReporter, generate_feed, load_dataset, mapping_form,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static CROSS: Emoji<'_, '_> = Emoji("✗ ", "x ");

/// Render Apple Podcasts (iTunes) RSS feeds from structured content
#[derive(Parser, Debug)]
#[command(name = "podpress")]
#[command(about = "Render Apple Podcasts (iTunes) RSS feeds from structured content")]
#[command(version)]
struct Args {
    /// Content dataset URL or path to a local JSON file
    dataset: String,

    /// Output path for the generated feed document
    output: PathBuf,

    /// Field mapping configuration file (defaults to an unset mapping)
    #[arg(short, long)]
    mapping: Option<PathBuf>,

    /// Base URL against which public:// file URIs are resolved
    #[arg(short, long, default_value = "http://localhost/")]
    base_url: Url,

    /// Maximum number of items to render
    #[arg(short, long)]
    limit: Option<usize>,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Print the mapping configuration form as JSON and exit
    #[arg(long)]
    print_mapping_form: bool,
}

/// Reporter printing one colored line per render event
struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, event: RenderEvent) {
        match event {
            RenderEvent::FetchingDataset { url } => {
                println!("{SEARCH}Fetching dataset: {}", url.cyan());
            }

            RenderEvent::ParsingDataset { source } => {
                println!("{SEARCH}Parsing dataset: {}", source.cyan());
            }

            RenderEvent::DatasetLoaded {
                channel_title,
                total_rows,
            } => {
                println!(
                    "{HEADPHONES}{} • {} rows",
                    channel_title.bold().green(),
                    total_rows.to_string().cyan()
                );
            }

            RenderEvent::ItemRendered {
                row_index,
                title,
                itunes_elements,
            } => {
                println!(
                    "  {SUCCESS}[{}] {} ({} iTunes elements)",
                    (row_index + 1).to_string().cyan(),
                    title,
                    itunes_elements.to_string().cyan()
                );
            }

            RenderEvent::ItunesSkipped {
                row_index,
                title,
                reason,
            } => {
                println!(
                    "  {WARNING}[{}] {} - {}",
                    (row_index + 1).to_string().cyan(),
                    title.yellow(),
                    reason.dimmed()
                );
            }

            RenderEvent::TagOmitted {
                row_index,
                tag,
                reason,
            } => {
                println!(
                    "  {CROSS}[{}] itunes:{} omitted - {}",
                    (row_index + 1).to_string().cyan(),
                    tag.yellow(),
                    reason.dimmed()
                );
            }

            RenderEvent::FeedWritten { path, items } => {
                println!(
                    "{SUCCESS}{} items written to {}",
                    items.to_string().green(),
                    path.display().to_string().cyan()
                );
            }

            RenderEvent::GenerateCompleted {
                item_count,
                enriched_count,
                skipped_count,
                omission_count,
            } => {
                println!(
                    "\n{PARTY}{} {} items, {} enriched, {} skipped, {} omissions",
                    "Feed complete:".bold().green(),
                    item_count.to_string().green().bold(),
                    enriched_count.to_string().green(),
                    skipped_count.to_string().yellow(),
                    if omission_count > 0 {
                        omission_count.to_string().red().bold()
                    } else {
                        omission_count.to_string().green()
                    }
                );
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    println!(
        "\n{}{} {}\n",
        MICROPHONE,
        "podpress".bold().magenta(),
        "- iTunes Feed Renderer".dimmed()
    );

    let client = ReqwestClient::new();

    let mapping = match &args.mapping {
        Some(path) => FieldMapping::load(path)
            .with_context(|| format!("Failed to load mapping from {}", path.display()))?,
        None => FieldMapping::default(),
    };

    if args.print_mapping_form {
        let dataset = load_dataset(&client, &args.dataset)
            .await
            .context("Failed to load dataset")?;
        let form = mapping_form(&mapping, &dataset.field_names());
        println!("{}", serde_json::to_string_pretty(&form)?);
        return Ok(());
    }

    let options = GenerateOptions {
        limit: args.limit,
        base_url: args.base_url.clone(),
    };

    let reporter: SharedReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(ConsoleReporter)
    };

    let result = generate_feed(
        &client,
        &args.dataset,
        &args.output,
        &mapping,
        &options,
        reporter,
    )
    .await
    .context("Failed to generate feed")?;

    if !args.quiet {
        println!(
            "\n{FOLDER}Output: {}\n",
            result.output_path.display().to_string().cyan()
        );
    }

    if result.items == 0 {
        std::process::exit(1);
    }

    Ok(())
}
