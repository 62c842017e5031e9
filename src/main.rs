use mailsift::cli::{Cli, CleanArgs, Command, OutputFormat, ScrapeArgs, StatsArgs};
use mailsift::config::Config;
use mailsift::domains;
use mailsift::errors::{MailsiftError, Result};
use mailsift::export;
use mailsift::pipeline;
use mailsift::records::{self, Field};
use mailsift::report::StyledFormatter;
use mailsift::scrape;
use mailsift::stats::{self, DomainTally};
use mailsift::structured_output::{
    DistinctCounts, DomainReport, InputInfo, ReportMetadata, SiftReport,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Handle schema generation early exit
    if cli.generate_schema {
        match SiftReport::generate_json_schema() {
            Ok(schema) => println!("{schema}"),
            Err(e) => eprintln!("Error generating JSON schema: {e}"),
        }
        return Ok(());
    }

    let Some(ref command) = cli.command else {
        if cli.error_enabled() {
            eprintln!("Error: a subcommand is required (clean, stats or scrape).");
        }
        std::process::exit(2);
    };

    // Load configuration
    let mut config = Config::from_env();
    config.merge_with_cli(&cli);

    if let Err(e) = config.validate() {
        if cli.error_enabled() {
            eprintln!("Configuration error: {e}");
        }
        std::process::exit(2);
    }

    match command {
        Command::Clean(args) => run_clean(args, &config, &cli),
        Command::Stats(args) => run_stats(args, &config, &cli),
        Command::Scrape(args) => run_scrape(args, &config, &cli).await,
    }
}

/// Load, clean and re-export a mail log.
fn run_clean(args: &CleanArgs, config: &Config, cli: &Cli) -> Result<()> {
    if cli.is_trace() {
        eprintln!("Loading mail log: {}", args.input.display());
    }
    let loaded = records::load_records(&args.input)?;
    surface_warnings(&loaded.warnings, cli);

    // Straight re-export of the loaded table, before any cleaning.
    if let Some(ref raw_out) = args.raw_out {
        export::write_raw_copy(raw_out, &loaded.table)?;
        if cli.is_trace() {
            eprintln!("Raw copy written: {}", raw_out.display());
        }
    }

    let (table, summary) = pipeline::clean(loaded.table, &config.clean_options());

    let annotations = config
        .export
        .include_domains
        .then(|| domains::annotate(&table));
    export::write_table(
        &args.output,
        &table,
        annotations.as_deref(),
        &config.export_options(),
    )?;

    if cli.verbose > 0 {
        println!(
            "{} rows in, {} rows out ({} duplicate bodies removed, {} cells filled) -> {}",
            summary.rows_in,
            summary.rows_out,
            summary.duplicates_removed,
            summary.cells_filled,
            args.output.display()
        );
    }
    Ok(())
}

/// Load, clean and aggregate mail-server domain statistics.
fn run_stats(args: &StatsArgs, config: &Config, cli: &Cli) -> Result<()> {
    if cli.is_trace() {
        eprintln!("Loading mail log: {}", args.input.display());
    }
    let loaded = records::load_records(&args.input)?;
    if !args.is_structured() {
        surface_warnings(&loaded.warnings, cli);
    }
    let rows_loaded = loaded.table.len();

    let (table, summary) = pipeline::clean(loaded.table, &config.clean_options());
    let pairs = domains::annotate(&table);
    let sender_tally = DomainTally::from_values(pairs.iter().map(|p| p.from_domain.as_str()));
    let recipient_tally = DomainTally::from_values(pairs.iter().map(|p| p.to_domain.as_str()));
    let threshold = config.pipeline.threshold;
    let distinct = DistinctCounts {
        senders: stats::unique_count(table.column(Field::Sender).flatten()),
        recipients: stats::unique_count(table.column(Field::Recipient).flatten()),
        bodies: stats::unique_count(table.column(Field::Body).flatten()),
    };

    let report = SiftReport {
        metadata: ReportMetadata::default(),
        input: InputInfo {
            path: args.input.display().to_string(),
            rows_loaded,
        },
        cleaning: summary,
        distinct,
        sender_domains: DomainReport::from_tally(sender_tally, threshold),
        recipient_domains: DomainReport::from_tally(recipient_tally, threshold),
        warnings: loaded.warnings,
    };

    match args.format {
        OutputFormat::Json => {
            let output = report
                .to_json()
                .map_err(|e| MailsiftError::internal_with("JSON report failed", e))?;
            println!("{output}");
        }
        OutputFormat::Yaml => {
            let output = report
                .to_yaml()
                .map_err(|e| MailsiftError::internal_with("YAML report failed", e))?;
            println!("{output}");
        }
        OutputFormat::Text => {
            let formatter = if cli.no_color {
                StyledFormatter::without_colors()
            } else {
                StyledFormatter::new()
            };
            formatter
                .print_report(&report)
                .map_err(|e| MailsiftError::internal(format!("report formatting failed: {e}")))?;
        }
    }
    Ok(())
}

/// Fetch listing pages and export the collected records.
async fn run_scrape(args: &ScrapeArgs, config: &Config, cli: &Cli) -> Result<()> {
    let outcome = scrape::fetch_listings(&config.scrape, cli).await?;
    scrape::write_listings(&args.output, &outcome.listings)?;

    if cli.verbose > 0 {
        println!(
            "Collected {} listings from {} pages ({} skipped) -> {}",
            outcome.listings.len(),
            outcome.pages_fetched,
            outcome.pages_skipped,
            args.output.display()
        );
    }
    if outcome.pages_fetched == 0 && cli.error_enabled() {
        eprintln!("No listing pages could be fetched; output contains the header only.");
    }
    Ok(())
}

fn surface_warnings(warnings: &[String], cli: &Cli) {
    if cli.warn_enabled() {
        for warning in warnings {
            eprintln!("Warning: {warning}");
        }
    }
}
