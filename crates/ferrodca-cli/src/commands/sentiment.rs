use ferrodca_core::Advisor;

use crate::error::CliError;

use super::Report;

pub async fn run(advisor: &Advisor) -> Result<Report, CliError> {
    let reading = advisor.sentiment().await;
    if !reading.is_available() {
        tracing::warn!(%reading, "sentiment index could not be read");
    }
    Ok(Report::Sentiment(reading))
}
