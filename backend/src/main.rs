//! Harmonize CLI - FAOSTAT CSV to dashboard JSON
//!
//! ```bash
//! harmonize                        # Same as `harmonize run` with defaults
//! harmonize run --records          # Country list, summary and all rows
//! harmonize catalog                # countries.json from the area code table only
//! harmonize faq                    # data/faq.csv -> docs/data/faq.json
//! harmonize publish                # Copy data/*.json into docs/data
//! harmonize parse input.csv        # Debug: CSV as JSON
//! ```
//!
//! Defaults come from `FAOSTAT_BASE_URL`, `FAOSTAT_OUTPUT_DIR` and
//! `FAOSTAT_FETCH_TIMEOUT_SECS` (or a `.env` file); flags override them.

use clap::{Args, Parser, Subcommand};
use harmonizer::faq::convert_faq;
use harmonizer::publish::{publish_data_files, DEFAULT_DATA_FILES};
use harmonizer::{parse_csv_file_auto, run_catalog, run_harmonize, HarmonizeOptions};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "harmonize")]
#[command(about = "Harmonize FAOSTAT country data into dashboard JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Harmonize observations and write countries.json + dashboard_summary.json
    Run {
        #[command(flatten)]
        sources: SourceArgs,

        /// Observations CSV (URL or path)
        #[arg(long)]
        observations: Option<String>,

        /// Also write harmonized_records.json
        #[arg(long)]
        records: bool,
    },

    /// Write countries.json from the area code table alone
    Catalog {
        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Convert the FAQ CSV to JSON
    Faq {
        /// Input CSV file
        #[arg(short, long, default_value = "data/faq.csv")]
        input: PathBuf,

        /// Output JSON file
        #[arg(short, long, default_value = "docs/data/faq.json")]
        output: PathBuf,
    },

    /// Copy JSON data files into the docs directory
    Publish {
        /// Directory holding the source files
        #[arg(long, default_value = "data")]
        from: PathBuf,

        /// Destination directory
        #[arg(long, default_value = "docs/data")]
        to: PathBuf,
    },

    /// Parse a CSV file and output JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Area code CSV (URL or path)
    #[arg(long)]
    reference: Option<String>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Extra Name,ISO3,Region CSV layered on the built-in table
    #[arg(short, long)]
    gazetteer: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

impl SourceArgs {
    fn apply(self, options: &mut HarmonizeOptions) {
        if let Some(reference) = self.reference {
            options.reference = reference;
        }
        if let Some(dir) = self.output_dir {
            options.output_dir = dir;
        }
        if self.gazetteer.is_some() {
            options.gazetteer = self.gazetteer;
        }
        if let Some(secs) = self.timeout {
            options.timeout_secs = secs.max(1);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let mut options = HarmonizeOptions::from_env();

    let result = match cli.command {
        None => cmd_run(&options).await,

        Some(Commands::Run {
            sources,
            observations,
            records,
        }) => {
            sources.apply(&mut options);
            if let Some(observations) = observations {
                options.observations = observations;
            }
            options.write_records = records;
            cmd_run(&options).await
        }

        Some(Commands::Catalog { sources }) => {
            sources.apply(&mut options);
            cmd_catalog(&options).await
        }

        Some(Commands::Faq { input, output }) => cmd_faq(&input, &output),

        Some(Commands::Publish { from, to }) => cmd_publish(&from, &to),

        Some(Commands::Parse { input, output }) => cmd_parse(&input, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_run(options: &HarmonizeOptions) -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 FAO Data Harmonization");
    println!("{}", "=".repeat(40));

    run_harmonize(options).await?;

    println!("\n✨ Done!");
    Ok(())
}

async fn cmd_catalog(options: &HarmonizeOptions) -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 FAO Area Code Catalog");
    println!("{}", "=".repeat(40));

    let report = run_catalog(options).await?;

    println!("\n✨ countries.json lists {} countries/territories", report.countries);
    Ok(())
}

fn cmd_faq(input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("📄 Converting FAQ: {}", input.display());
    convert_faq(input, output);
    Ok(())
}

fn cmd_publish(from: &Path, to: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("📦 Publishing data files: {} → {}", from.display(), to.display());

    let report = publish_data_files(from, to, &DEFAULT_DATA_FILES);

    println!(
        "\n✨ {} copied, {} missing, {} failed",
        report.copied.len(),
        report.missing.len(),
        report.failed.len()
    );
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let table = parse_csv_file_auto(input)?;

    eprintln!("   Encoding: {}", table.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(table.delimiter));
    eprintln!("   Columns: {}", table.headers.join(", "));
    eprintln!("✅ Parsed {} records", table.len());

    let json = serde_json::to_string_pretty(&table.to_json_records())?;
    write_output(&json, output)?;

    Ok(())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
