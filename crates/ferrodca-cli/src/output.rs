use std::io::{self, Write};

use ferrodca_core::{Assessment, PriceSeries, SentimentReading};
use time::format_description::well_known::Rfc3339;

use crate::cli::OutputFormat;
use crate::commands::Report;
use crate::error::CliError;

pub fn render(report: &Report, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, format, pretty)?;
    out.flush()?;
    Ok(())
}

pub fn write_report<W: Write>(
    out: &mut W,
    report: &Report,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = match (report, pretty) {
                (Report::Assessment(assessment), true) => serde_json::to_string_pretty(assessment)?,
                (Report::Assessment(assessment), false) => serde_json::to_string(assessment)?,
                (Report::Sentiment(reading), true) => serde_json::to_string_pretty(reading)?,
                (Report::Sentiment(reading), false) => serde_json::to_string(reading)?,
                (Report::Trend(series), true) => serde_json::to_string_pretty(series)?,
                (Report::Trend(series), false) => serde_json::to_string(series)?,
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => match report {
            Report::Assessment(assessment) => write_assessment(out, assessment)?,
            Report::Sentiment(reading) => write_sentiment(out, reading)?,
            Report::Trend(series) => write_trend(out, series)?,
        },
    }

    Ok(())
}

fn write_assessment<W: Write>(out: &mut W, assessment: &Assessment) -> io::Result<()> {
    let metrics = &assessment.metrics;

    writeln!(out, "symbol       : {}", assessment.symbol)?;
    writeln!(out, "as_of        : {}", metrics.as_of)?;
    writeln!(out, "current      : {:.2}", metrics.current_price)?;
    match (metrics.day_change(), metrics.day_change_pct()) {
        (Some(change), Some(pct)) => writeln!(out, "day_change   : {change:+.2} ({pct:+.2}%)")?,
        (Some(change), None) => writeln!(out, "day_change   : {change:+.2}")?,
        _ => writeln!(out, "day_change   : n/a")?,
    }
    writeln!(out, "all_time_high: {:.2}", metrics.all_time_high)?;
    writeln!(
        out,
        "drawdown     : {:.2}% (threshold {:.0}%)",
        metrics.drawdown_pct, assessment.threshold_pct
    )?;
    writeln!(out, "sentiment    : {}", assessment.sentiment)?;
    let evaluated_at = assessment
        .evaluated_at
        .format(&Rfc3339)
        .unwrap_or_else(|_| assessment.evaluated_at.to_string());
    writeln!(out, "evaluated_at : {evaluated_at}")?;
    writeln!(out, "action       : {}", assessment.recommendation.action)?;
    writeln!(out, "reasons:")?;
    for reason in assessment.recommendation.messages() {
        writeln!(out, "  - {reason}")?;
    }
    Ok(())
}

fn write_sentiment<W: Write>(out: &mut W, reading: &SentimentReading) -> io::Result<()> {
    match reading {
        SentimentReading::Available { score, label } => {
            writeln!(out, "score: {score}")?;
            writeln!(out, "label: {label}")?;
        }
        SentimentReading::Unavailable { reason } => {
            writeln!(out, "score: n/a")?;
            writeln!(out, "label: unavailable ({})", reason.as_str())?;
        }
    }
    Ok(())
}

fn write_trend<W: Write>(out: &mut W, series: &PriceSeries) -> io::Result<()> {
    writeln!(out, "symbol: {} ({} records)", series.symbol(), series.len())?;
    writeln!(
        out,
        "{:<10}  {:>12}  {:>12}  {:>12}  {:>12}  {:>14}",
        "date", "open", "high", "low", "close", "volume"
    )?;
    for bar in series.bars() {
        let volume = bar
            .volume
            .map_or_else(|| String::from("-"), |volume| volume.to_string());
        writeln!(
            out,
            "{:<10}  {:>12.2}  {:>12.2}  {:>12.2}  {:>12.2}  {:>14}",
            bar.date.to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            volume
        )?;
    }
    Ok(())
}
