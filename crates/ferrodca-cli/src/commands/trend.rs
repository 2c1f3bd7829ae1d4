use ferrodca_core::Advisor;

use crate::cli::TrendArgs;
use crate::error::CliError;

use super::Report;

pub async fn run(args: &TrendArgs, advisor: &Advisor) -> Result<Report, CliError> {
    let series = advisor.trend(&args.index.symbol(), args.days).await?;
    Ok(Report::Trend(series))
}
