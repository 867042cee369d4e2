//! One dashboard: its settings, its chart, and the load cycle that refreshes them

use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::{Config, Source},
    errors::Error,
    fetch, ops, parse,
    present::{self, ChartState, DashboardView},
    types::Summary,
};

/// What one load of the sheet produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Aggregated figures, or `None` when the sheet had no data rows
    pub summary: Option<Summary>,
    /// Chart contents after this load. Left as it was when there was no data.
    pub chart: Option<ChartState>,
    /// Link that opens the sheet for editing
    pub sheet_link: Option<String>,
}

impl Frame {
    /// Widget text for this load
    #[must_use]
    pub fn view(&self) -> DashboardView {
        DashboardView::new(self.summary.as_ref())
    }
}

/// A dashboard bound to one sheet.
///
/// Loads take `&mut self`, so only one parse/aggregate cycle can run at a time
/// and the chart is never updated from two loads at once.
#[derive(Debug)]
pub struct Dashboard {
    config: Config,
    source: Source,
    client: Client,
    chart: Option<ChartState>,
}

impl Dashboard {
    /// Creates a dashboard for the configured source
    ///
    /// # Errors
    /// [`Error::InvalidSource`] if the source is missing or isn't a sheet link or path
    pub fn new(config: Config) -> Result<Self, Error> {
        let source = config.source()?;
        Ok(Self {
            config,
            source,
            client: Client::new(),
            chart: None,
        })
    }

    /// Returns the settings this dashboard runs with
    #[must_use]
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the current chart, if any load has produced one
    #[must_use]
    #[inline]
    pub fn chart(&self) -> Option<&ChartState> {
        self.chart.as_ref()
    }

    /// The link that opens the sheet in the browser, for sheet sources
    #[must_use]
    pub fn sheet_link(&self) -> Option<String> {
        match &self.source {
            Source::Sheet(url) => Some(fetch::edit_url(url).to_string()),
            Source::File(_) => None,
        }
    }

    /// Parses and aggregates sheet text, then updates the chart
    pub fn apply_document(&mut self, text: &str) -> Frame {
        let records = parse::parse_document(text);
        let summary = ops::summarize(
            &records,
            self.config.daily_target,
            self.config.period_target,
            self.config.tracked_products.as_slice(),
        );
        match &summary {
            Some(summary) => {
                self.chart = Some(present::update_chart(self.chart.take(), &summary.chart));
                info!(
                    latest = %summary.latest_date,
                    rows = summary.record_count,
                    produced = %summary.daily.totals.produced,
                    "dashboard updated"
                );
            }
            None => warn!("sheet has no data rows"),
        }
        Frame {
            summary,
            chart: self.chart.clone(),
            sheet_link: self.sheet_link(),
        }
    }

    /// Fetches the sheet and applies it.
    ///
    /// # Errors
    /// Configuration errors such as [`Error::HtmlResponse`], or transport errors.
    /// The chart is left untouched when the load fails.
    pub async fn reload(&mut self) -> Result<Frame, Error> {
        let text = fetch::load_document(&self.client, &self.source).await?;
        Ok(self.apply_document(&text))
    }
}
