mod display;
mod input;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sitework_core::coerce::parse_lenient;
use sitework_core::vat::{vat_on, with_vat};
use sitework_core::{ContractSummary, breakdown_tables, cross_check, vat_table};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sitework", version, about = "Contract fee, VAT and payable summaries")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the financial summary for a contract.
    Summary {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_enum, default_value_t = Format::Text, env = "SITEWORK_FORMAT")]
        format: Format,
    },
    /// Print the total/bank/owner breakdown tables, the VAT table, and the cross-check.
    Tables {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_enum, default_value_t = Format::Text, env = "SITEWORK_FORMAT")]
        format: Format,

        /// Exit with an error when the tables do not reconcile.
        #[arg(long, env = "SITEWORK_STRICT")]
        strict: bool,
    },
    /// Show 5% VAT and the VAT-inclusive figure for each amount.
    Vat {
        /// Amounts in any format ("1,050,000", "SAR 350000").
        #[arg(required = true)]
        amounts: Vec<String>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Contract JSON, or a {"contract", "variations"} bundle. `-` reads stdin.
    #[arg(short, long)]
    contract: PathBuf,

    /// Variations JSON array. Overrides variations in a bundle.
    #[arg(long)]
    variations: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(input: &InputArgs) -> anyhow::Result<Option<ContractSummary>> {
    input::load_summary(&input.contract, input.variations.as_deref())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("sitework v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Summary { input, format } => {
            let Some(summary) = load(&input)? else {
                println!("No contract data.");
                return Ok(());
            };
            match format {
                Format::Text => display::print_summary(&summary),
                Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
        }
        Command::Tables {
            input,
            format,
            strict,
        } => {
            let Some(summary) = load(&input)? else {
                println!("No contract data.");
                return Ok(());
            };
            let tables = breakdown_tables(&summary);
            let vat = vat_table(&summary);
            let found = cross_check(&summary);
            match format {
                Format::Text => {
                    for table in &tables {
                        display::print_table(table);
                    }
                    display::print_table(&vat);
                    display::print_discrepancies(&found);
                }
                Format::Json => {
                    let doc = serde_json::json!({
                        "tables": tables,
                        "vat": vat,
                        "discrepancies": found,
                    });
                    println!("{}", serde_json::to_string_pretty(&doc)?);
                }
            }
            if strict && !found.is_empty() {
                anyhow::bail!("{} breakdown discrepancies", found.len());
            }
        }
        Command::Vat { amounts } => {
            println!("  {:<20} {:>16} {:>12} {:>16}", "input", "amount", "VAT", "incl. VAT");
            for raw in &amounts {
                let amount = parse_lenient(raw);
                println!(
                    "  {:<20} {:>16} {:>12} {:>16}",
                    raw,
                    display::format_amount(amount),
                    display::format_amount(vat_on(amount)),
                    display::format_amount(with_vat(amount))
                );
            }
        }
    }

    Ok(())
}
