use rust_decimal::Decimal;
use tracing::debug;

use crate::types::{
    ChartSegments, PeriodReport, PeriodTotals, ProductSnapshot, Rates, Record, Summary,
};

impl PeriodTotals {
    /// Sums the counts of every record.
    ///
    /// Sums saturate instead of overflowing, so absurd cells can't abort a load.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records
            .into_iter()
            .fold(Self::default(), |totals, record| Self {
                produced: totals.produced.saturating_add(record.produced),
                qc_pass: totals.qc_pass.saturating_add(record.qc_pass),
                defect: totals.defect.saturating_add(record.defect),
                repair: totals.repair.saturating_add(record.repair),
            })
    }

    /// Splits the totals into pie-chart slices.
    ///
    /// The production slice is clamped at zero when defects exceed production.
    #[must_use]
    pub fn chart_segments(&self) -> ChartSegments {
        ChartSegments {
            production: self
                .produced
                .saturating_sub(self.defect)
                .max(Decimal::ZERO),
            defect: self.defect,
            repair: self.repair,
        }
    }
}

/// `part / whole * 100`, or zero when there's nothing produced or no divisor
fn percentage(part: Decimal, whole: Decimal, produced: Decimal) -> Decimal {
    if produced <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

impl Rates {
    /// Computes production, defect and repair rates for `totals` against `target`
    #[must_use]
    pub fn compute(totals: &PeriodTotals, target: Decimal) -> Self {
        Self {
            production: percentage(totals.produced, target, totals.produced),
            defect: percentage(totals.defect, totals.produced, totals.produced),
            repair: percentage(totals.repair, totals.produced, totals.produced),
        }
    }
}

impl PeriodReport {
    /// Totals the records and derives rates against `target`
    pub fn new<'a, I>(records: I, target: Decimal) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let totals = PeriodTotals::from_records(records);
        Self {
            totals,
            target,
            rates: Rates::compute(&totals, target),
        }
    }
}

/// Returns the greatest date string, keeping the first of equal maxima.
///
/// Dates are compared as strings, which orders ISO-style dates chronologically.
#[must_use]
pub fn latest_date(records: &[Record]) -> Option<&str> {
    let mut records = records.iter();
    let first = records.next()?.date.as_str();
    Some(records.fold(first, |latest, record| {
        if record.date.as_str() > latest {
            record.date.as_str()
        } else {
            latest
        }
    }))
}

/// All records dated `date`, in document order
#[must_use]
pub fn records_on<'a>(records: &'a [Record], date: &str) -> Vec<&'a Record> {
    records.iter().filter(|record| record.date == date).collect()
}

/// Finds the row for a tracked product among one day's records.
///
/// An exact case-insensitive name match wins, then the first name containing
/// `name`. Rows without a product name never match.
#[must_use]
pub fn find_product<'a>(day: &[&'a Record], name: &str) -> Option<&'a Record> {
    let wanted = name.to_lowercase();
    let named = || {
        day.iter()
            .copied()
            .filter(|record| !record.product_line.is_empty())
    };
    named()
        .find(|record| record.product_line.to_lowercase() == wanted)
        .or_else(|| named().find(|record| record.product_line.to_lowercase().contains(&wanted)))
}

/// Builds the latest-day snapshot of each tracked product, in the order given
#[must_use]
pub fn product_snapshots<S: AsRef<str>>(day: &[&Record], tracked: &[S]) -> Vec<ProductSnapshot> {
    tracked
        .iter()
        .map(|name| {
            let name = name.as_ref();
            match find_product(day, name) {
                Some(record) => ProductSnapshot::from_record(name, record),
                None => ProductSnapshot::empty(name),
            }
        })
        .collect()
}

/// Reduces a loaded sheet to the figures the dashboard shows.
///
/// Returns `None` when the sheet has no data rows.
#[must_use]
pub fn summarize<S: AsRef<str>>(
    records: &[Record],
    daily_target: Decimal,
    period_target: Decimal,
    tracked: &[S],
) -> Option<Summary> {
    let latest = latest_date(records)?;
    let day = records_on(records, latest);
    debug!(latest, rows = records.len(), day_rows = day.len(), "summarizing");

    let daily = PeriodReport::new(day.iter().copied(), daily_target);
    Some(Summary {
        latest_date: latest.to_string(),
        record_count: records.len(),
        chart: daily.totals.chart_segments(),
        daily,
        period: PeriodReport::new(records, period_target),
        products: product_snapshots(&day, tracked),
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn record(date: &str, product: &str, produced: Decimal, defect: Decimal) -> Record {
        Record::new(date, product, produced, produced - defect, defect, dec!(1))
    }

    fn week() -> Vec<Record> {
        vec![
            record("2024-01-01", "Chasis", dec!(90), dec!(3)),
            record("2024-01-02", "Chasis", dec!(100), dec!(5)),
            record("2024-01-02", "Cushion", dec!(40), dec!(2)),
            record("2024-01-01", "Headrest", dec!(30), dec!(0)),
            record("2024-01-02", "Headrest Deluxe", dec!(20), dec!(1)),
        ]
    }

    #[test]
    fn test_latest_date() {
        assert_eq!(latest_date(&week()), Some("2024-01-02"));
        assert_eq!(latest_date(&[]), None);
    }

    #[test]
    fn test_records_on_latest_day() {
        let records = week();
        let day = records_on(&records, "2024-01-02");
        assert_eq!(day.len(), 3);
        assert!(day.iter().all(|record| record.date() == "2024-01-02"));
    }

    #[test]
    fn test_totals() {
        let records = week();
        let totals = PeriodTotals::from_records(&records);
        assert_eq!(totals.produced, dec!(280));
        assert_eq!(totals.qc_pass, dec!(269));
        assert_eq!(totals.defect, dec!(11));
        assert_eq!(totals.repair, dec!(5));
    }

    #[test]
    fn test_rates() {
        let totals = PeriodTotals {
            produced: dec!(160),
            qc_pass: dec!(150),
            defect: dec!(8),
            repair: dec!(4),
        };
        let rates = Rates::compute(&totals, dec!(200));
        assert_eq!(rates.production, dec!(80));
        assert_eq!(rates.defect, dec!(5));
        assert_eq!(rates.repair, dec!(2.5));
    }

    #[test]
    fn test_rates_without_production() {
        let rates = Rates::compute(&PeriodTotals::default(), dec!(200));
        assert_eq!(rates, Rates::default());
        // a zero target doesn't divide by zero either
        let totals = PeriodTotals {
            produced: dec!(10),
            ..PeriodTotals::default()
        };
        assert_eq!(Rates::compute(&totals, Decimal::ZERO).production, Decimal::ZERO);
    }

    #[test]
    fn test_chart_segments_clamped() {
        let totals = PeriodTotals {
            produced: dec!(10),
            defect: dec!(15),
            repair: dec!(2),
            ..PeriodTotals::default()
        };
        let segments = totals.chart_segments();
        assert_eq!(segments.production, Decimal::ZERO);
        assert_eq!(segments.defect, dec!(15));
        assert_eq!(segments.repair, dec!(2));
    }

    #[test]
    fn test_find_product() {
        let records = week();
        let day = records_on(&records, "2024-01-02");
        assert_eq!(find_product(&day, "CHASIS").unwrap().produced(), dec!(100));
        assert_eq!(find_product(&day, "head").unwrap().product_line(), "Headrest Deluxe");
        assert!(find_product(&day, "Frame").is_none());
    }

    #[test]
    fn test_find_product_prefers_exact_match() {
        let records = vec![
            record("d", "Headrest Deluxe", dec!(1), dec!(0)),
            record("d", "headrest", dec!(2), dec!(0)),
        ];
        let day: Vec<&Record> = records.iter().collect();
        assert_eq!(find_product(&day, "Headrest").unwrap().produced(), dec!(2));
    }

    #[test]
    fn test_find_product_skips_unnamed_rows() {
        let records = vec![record("d", "", dec!(1), dec!(0))];
        let day: Vec<&Record> = records.iter().collect();
        assert!(find_product(&day, "").is_none());
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(
            &week(),
            dec!(200),
            dec!(800),
            &["Chasis", "Cushion", "Headrest", "Frame"],
        )
        .unwrap();
        assert_eq!(summary.latest_date, "2024-01-02");
        assert_eq!(summary.record_count, 5);
        assert_eq!(summary.daily.totals.produced, dec!(160));
        assert_eq!(summary.daily.rates.production, dec!(80));
        assert_eq!(summary.period.totals.produced, dec!(280));
        assert_eq!(summary.period.rates.production, dec!(35));
        assert_eq!(summary.chart.production, dec!(152));
        assert_eq!(summary.products.len(), 4);
        assert_eq!(summary.product("Cushion").unwrap().produced, dec!(40));
        assert_eq!(summary.product("Headrest").unwrap().defect, dec!(1));
        let frame = summary.product("Frame").unwrap();
        assert!(!frame.matched);
        assert_eq!(frame.produced, Decimal::ZERO);
    }

    #[test]
    fn test_summarize_no_data() {
        assert!(summarize::<&str>(&[], dec!(200), dec!(800), &[]).is_none());
    }
}
