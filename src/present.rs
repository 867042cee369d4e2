//! Mapping aggregates to what the dashboard widgets display

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::types::{ChartSegments, PeriodReport, ProductSnapshot, Summary};

/// Slice labels of the production pie chart, in data order
pub const CHART_LABELS: [&str; 3] = ["Production", "Defect", "Repair"];

/// Shown in place of the date when a sheet has no data rows
pub const NO_DATA_MESSAGE: &str = "Failed to load data or sheet is empty.";

/// Data held by the production pie chart between loads
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartState {
    /// Slice labels
    pub labels: [&'static str; 3],
    /// Slice values, matching `labels`
    pub data: [Decimal; 3],
    /// 1 when the chart was created, incremented on each update
    pub revision: u64,
}

/// Creates the chart on first load, or swaps new data into the existing one
#[must_use]
pub fn update_chart(prior: Option<ChartState>, segments: &ChartSegments) -> ChartState {
    let data = [segments.production, segments.defect, segments.repair];
    match prior {
        Some(mut chart) => {
            chart.data = data;
            chart.revision += 1;
            chart
        }
        None => ChartState {
            labels: CHART_LABELS,
            data,
            revision: 1,
        },
    }
}

/// The four stat boxes of one product card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductStats {
    /// Tracked product name
    pub name: String,
    /// Units produced
    pub produced: String,
    /// Units passing QC
    pub qc_pass: String,
    /// Defective units
    pub defect: String,
    /// Repaired units
    pub repair: String,
}

impl From<&ProductSnapshot> for ProductStats {
    fn from(snapshot: &ProductSnapshot) -> Self {
        Self {
            name: snapshot.name.clone(),
            produced: count(snapshot.produced),
            qc_pass: count(snapshot.qc_pass),
            defect: count(snapshot.defect),
            repair: count(snapshot.repair),
        }
    }
}

/// One report panel (today, or the week)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLines {
    /// `produced/target`
    pub production: String,
    /// Production rate, whole percent
    pub production_rate: String,
    /// Defect rate, one decimal
    pub defect_rate: String,
    /// Repair rate, one decimal
    pub repair_rate: String,
}

impl From<&PeriodReport> for ReportLines {
    fn from(report: &PeriodReport) -> Self {
        Self {
            production: format!("{}/{}", count(report.totals.produced), count(report.target)),
            production_rate: percent(report.rates.production, 0),
            defect_rate: percent(report.rates.defect, 1),
            repair_rate: percent(report.rates.repair, 1),
        }
    }
}

/// Display text for every widget, ready to bind to the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    /// Latest date, `—` if rows carry no date, or [`NO_DATA_MESSAGE`]
    pub date_line: String,
    /// Product cards in configured order; empty without data
    pub products: Vec<ProductStats>,
    /// Today's panel
    pub daily: Option<ReportLines>,
    /// The week's panel
    pub period: Option<ReportLines>,
}

impl DashboardView {
    /// Formats a summary, or the empty-sheet message when there is none
    #[must_use]
    pub fn new(summary: Option<&Summary>) -> Self {
        match summary {
            None => Self {
                date_line: NO_DATA_MESSAGE.to_string(),
                products: Vec::new(),
                daily: None,
                period: None,
            },
            Some(summary) => Self {
                date_line: if summary.latest_date.is_empty() {
                    "—".to_string()
                } else {
                    summary.latest_date.clone()
                },
                products: summary.products.iter().map(ProductStats::from).collect(),
                daily: Some(ReportLines::from(&summary.daily)),
                period: Some(ReportLines::from(&summary.period)),
            },
        }
    }
}

/// A count without trailing zeros
fn count(value: Decimal) -> String {
    value.normalize().to_string()
}

/// A percentage with a fixed number of decimals, rounding halves up
fn percent(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", decimals as usize, rounded)
}
