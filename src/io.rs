//! Helpers for writing dashboard loads out as text, JSON or CSV

use std::io::Write;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    config::OutputFormat,
    dashboard::Frame,
    errors::Error,
    present::{DashboardView, ReportLines},
    types::ProductSnapshot,
};

/// Type used for serializing a [`ProductSnapshot`] as one CSV row
#[derive(Serialize, Debug)]
struct ProductRow<'a> {
    /// The tracked product name
    product: &'a str,
    /// The date the figures are from
    date: &'a str,
    /// Units produced
    #[serde(with = "rust_decimal::serde::str")]
    produced: Decimal,
    /// Units passing QC
    #[serde(with = "rust_decimal::serde::str")]
    qc: Decimal,
    /// Defective units
    #[serde(with = "rust_decimal::serde::str")]
    defect: Decimal,
    /// Repaired units
    #[serde(with = "rust_decimal::serde::str")]
    repair: Decimal,
    /// Whether the sheet had a row for the product that day
    matched: bool,
}

impl<'a> ProductRow<'a> {
    fn new(date: &'a str, snapshot: &'a ProductSnapshot) -> Self {
        Self {
            product: &snapshot.name,
            date,
            produced: snapshot.produced.normalize(),
            qc: snapshot.qc_pass.normalize(),
            defect: snapshot.defect.normalize(),
            repair: snapshot.repair.normalize(),
            matched: snapshot.matched,
        }
    }
}

/// Outputs the latest-day figures of every tracked product to CSV.
///
/// Output data will be in the form:
/// ```csv
/// product,date,produced,qc,defect,repair,matched
/// Chasis,2024-01-02,100,95,5,2,true
/// Frame,2024-01-02,0,0,0,0,false
/// ```
/// Only the header is written when the sheet had no data.
pub fn write_products_to_csv<W: Write>(writer: &mut W, frame: &Frame) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    match &frame.summary {
        Some(summary) => {
            for snapshot in &summary.products {
                csv_writer.serialize(ProductRow::new(&summary.latest_date, snapshot))?;
            }
        }
        None => csv_writer.write_record([
            "product", "date", "produced", "qc", "defect", "repair", "matched",
        ])?,
    }
    csv_writer.flush()?;
    Ok(())
}

/// Outputs the whole load, figures and chart, as one JSON document
pub fn write_frame_json<W: Write>(writer: &mut W, frame: &Frame) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut *writer, frame).map_err(Error::Json)?;
    writeln!(writer)?;
    Ok(())
}

/// Outputs the dashboard as a plain-text report
pub fn write_report<W: Write>(writer: &mut W, frame: &Frame) -> Result<(), Error> {
    let view: DashboardView = frame.view();
    writeln!(writer, "Production report: {}", view.date_line)?;
    if let Some(link) = &frame.sheet_link {
        writeln!(writer, "Sheet: {link}")?;
    }
    let (Some(daily), Some(period)) = (&view.daily, &view.period) else {
        return Ok(());
    };

    writeln!(writer)?;
    writeln!(
        writer,
        "{:<12}{:>10}{:>10}{:>10}{:>10}",
        "product", "produced", "qc", "defect", "repair"
    )?;
    for stats in &view.products {
        writeln!(
            writer,
            "{:<12}{:>10}{:>10}{:>10}{:>10}",
            stats.name, stats.produced, stats.qc_pass, stats.defect, stats.repair
        )?;
    }

    writeln!(writer)?;
    write_panel(writer, "Today", daily)?;
    write_panel(writer, "Week", period)?;

    if let Some(chart) = &frame.chart {
        let slices: Vec<String> = chart
            .labels
            .iter()
            .zip(chart.data.iter())
            .map(|(label, value)| format!("{label} {}", value.normalize()))
            .collect();
        writeln!(writer)?;
        writeln!(writer, "Chart: {}", slices.join(" | "))?;
    }
    Ok(())
}

fn write_panel<W: Write>(writer: &mut W, title: &str, lines: &ReportLines) -> Result<(), Error> {
    writeln!(
        writer,
        "{title:<6} production {} ({})  defect rate {}  repair rate {}",
        lines.production, lines.production_rate, lines.defect_rate, lines.repair_rate
    )?;
    Ok(())
}

/// Outputs a load in the configured format
pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame, format: OutputFormat) -> Result<(), Error> {
    match format {
        OutputFormat::Text => write_report(writer, frame),
        OutputFormat::Json => write_frame_json(writer, frame),
        OutputFormat::Csv => write_products_to_csv(writer, frame),
    }
}
