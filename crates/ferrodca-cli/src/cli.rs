//! CLI argument definitions for ferrodca.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `advise` | Evaluate today's DCA purchase for an index |
//! | `sentiment` | Show the current Fear & Greed reading |
//! | `trend` | Show recent daily history for an index |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--log-json` | `false` | Emit logs on stderr as JSON lines |
//!
//! # Examples
//!
//! ```bash
//! ferrodca advise
//! ferrodca advise --index nasdaq --threshold 15 --format table
//! ferrodca sentiment --pretty
//! ferrodca trend --index dow --days 30
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use ferrodca_core::MarketIndex;

/// Drawdown and sentiment signals for dollar-cost averaging.
#[derive(Debug, Parser)]
#[command(
    name = "ferrodca",
    author,
    version,
    about = "Should today's index purchase go ahead?",
    long_about = "ferrodca compares an index's drawdown from its all-time high with the CNN \
Fear & Greed index and recommends BUY or HOLD for a periodic purchase.\n\
\n\
Use 'ferrodca <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Emit logs as JSON lines. Verbosity follows RUST_LOG.
    #[arg(long, global = true, default_value_t = false)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain-text summary for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Recommend BUY or HOLD for today's purchase.
    ///
    /// # Examples
    ///
    ///   ferrodca advise
    ///   ferrodca advise --index nasdaq --threshold 20
    Advise(AdviseArgs),

    /// Show the current CNN Fear & Greed reading.
    Sentiment,

    /// Show the most recent daily history for an index.
    ///
    /// # Examples
    ///
    ///   ferrodca trend --index dow --days 90
    Trend(TrendArgs),
}

#[derive(Debug, Args)]
pub struct AdviseArgs {
    /// Index to evaluate (sp500, nasdaq, dow).
    #[arg(long, default_value = "sp500", value_parser = parse_index)]
    pub index: MarketIndex,

    /// Drawdown from the all-time high, in percent, that triggers a BUY.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u8).range(5..=30))]
    pub threshold: u8,
}

#[derive(Debug, Args)]
pub struct TrendArgs {
    /// Index to show (sp500, nasdaq, dow).
    #[arg(long, default_value = "sp500", value_parser = parse_index)]
    pub index: MarketIndex,

    /// Calendar days of history to keep.
    #[arg(long, default_value_t = 365, value_parser = clap::value_parser!(u32).range(1..=36_500))]
    pub days: u32,
}

fn parse_index(raw: &str) -> Result<MarketIndex, String> {
    raw.parse::<MarketIndex>().map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn advise_defaults_to_sp500_at_ten_percent() {
        let cli = Cli::try_parse_from(["ferrodca", "advise"]).expect("parse");
        match cli.command {
            Command::Advise(args) => {
                assert_eq!(args.index, MarketIndex::Sp500);
                assert_eq!(args.threshold, 10);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn threshold_outside_slider_range_is_rejected() {
        for value in ["4", "31", "ten"] {
            assert!(
                Cli::try_parse_from(["ferrodca", "advise", "--threshold", value]).is_err(),
                "{value}"
            );
        }
    }

    #[test]
    fn index_aliases_and_global_flags() {
        let cli = Cli::try_parse_from([
            "ferrodca", "trend", "--index", "^DJI", "--days", "30", "--format", "table",
        ])
        .expect("parse");

        assert_eq!(cli.format, OutputFormat::Table);
        match cli.command {
            Command::Trend(args) => {
                assert_eq!(args.index, MarketIndex::DowJones);
                assert_eq!(args.days, 30);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
