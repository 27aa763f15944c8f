use clap::{Parser, Subcommand};

mod cart;
mod cmd;
mod vat;

/// VAT-aware cart pricing for a UK workwear storefront
#[derive(Parser, Debug)]
#[command(name = "vatc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute cart totals with a VAT breakdown
    Totals(cmd::totals::TotalsCommand),
    /// Show per-line pricing as a table
    Items(cmd::items::ItemsCommand),
    /// Check cart data for pricing issues
    Validate(cmd::validate::ValidateCommand),
    /// Print expected input formats
    Schema(cmd::schema::SchemaCommand),
    /// Generate an HTML breakdown and open it
    Html(cmd::html_report::HtmlCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Totals(cmd) => cmd.exec(),
        Command::Items(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
        Command::Html(cmd) => cmd.exec(),
    }
}
