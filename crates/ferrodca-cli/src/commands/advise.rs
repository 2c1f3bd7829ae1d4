use ferrodca_core::Advisor;

use crate::cli::AdviseArgs;
use crate::error::CliError;

use super::Report;

pub async fn run(args: &AdviseArgs, advisor: &Advisor) -> Result<Report, CliError> {
    let assessment = advisor
        .evaluate_index(args.index, f64::from(args.threshold))
        .await?;
    Ok(Report::Assessment(Box::new(assessment)))
}
