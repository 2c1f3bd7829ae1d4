mod advise;
mod sentiment;
mod trend;

use ferrodca_core::{Advisor, AdvisorConfig, Assessment, PriceSeries, SentimentReading};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// What a command produced, ready for rendering.
#[derive(Debug)]
pub enum Report {
    Assessment(Box<Assessment>),
    Sentiment(SentimentReading),
    Trend(PriceSeries),
}

pub async fn run(cli: &Cli) -> Result<Report, CliError> {
    let config = AdvisorConfig::from_env()?;
    let advisor = Advisor::new(&config);

    match &cli.command {
        Command::Advise(args) => advise::run(args, &advisor).await,
        Command::Sentiment => sentiment::run(&advisor).await,
        Command::Trend(args) => trend::run(args, &advisor).await,
    }
}
