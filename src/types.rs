//! Common datatypes supporting functions throughout the production dashboard

use rust_decimal::Decimal;
use serde::Serialize;

/// The logical columns a production sheet is expected to carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Day the row was recorded on
    Date,
    /// Name of the manufactured item
    ProductLine,
    /// Units produced
    Produced,
    /// Units that passed quality control
    QcPass,
    /// Units found defective
    Defect,
    /// Units sent to repair
    Repair,
}

impl Field {
    /// Lowercase header names accepted for this field, most preferred first
    #[must_use]
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Field::Date => &["tanggal", "date", "tgl"],
            Field::ProductLine => &["barang", "item", "product", "produk", "nama"],
            Field::Produced => &["production", "produksi", "prod", "jumlah"],
            Field::QcPass => &["qc", "quality", "quality control"],
            Field::Defect => &["defect", "defects", "kerusakan"],
            Field::Repair => &["repair", "perbaikan"],
        }
    }

    /// Column index used when the header doesn't name this field
    #[must_use]
    pub fn default_position(self) -> usize {
        match self {
            Field::Date => 0,
            Field::ProductLine => 1,
            Field::Produced => 2,
            Field::QcPass => 3,
            Field::Defect => 4,
            Field::Repair => 5,
        }
    }
}

/// One data row of the production sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Day of the row, compared as a plain string
    pub(crate) date: String,
    /// Manufactured item name
    pub(crate) product_line: String,
    /// Units produced
    pub(crate) produced: Decimal,
    /// Units that passed QC
    pub(crate) qc_pass: Decimal,
    /// Units found defective
    pub(crate) defect: Decimal,
    /// Units sent to repair
    pub(crate) repair: Decimal,
}

impl Record {
    /// Creates a record from already-coerced values
    #[must_use]
    pub fn new(
        date: impl Into<String>,
        product_line: impl Into<String>,
        produced: Decimal,
        qc_pass: Decimal,
        defect: Decimal,
        repair: Decimal,
    ) -> Self {
        Self {
            date: date.into(),
            product_line: product_line.into(),
            produced,
            qc_pass,
            defect,
            repair,
        }
    }

    /// Returns the date string of the row
    #[must_use]
    #[inline]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Returns the product line name
    #[must_use]
    #[inline]
    pub fn product_line(&self) -> &str {
        &self.product_line
    }

    /// Returns the number of units produced
    #[must_use]
    #[inline]
    pub fn produced(&self) -> Decimal {
        self.produced
    }

    /// Returns the number of units that passed QC
    #[must_use]
    #[inline]
    pub fn qc_pass(&self) -> Decimal {
        self.qc_pass
    }

    /// Returns the number of defective units
    #[must_use]
    #[inline]
    pub fn defect(&self) -> Decimal {
        self.defect
    }

    /// Returns the number of repaired units
    #[must_use]
    #[inline]
    pub fn repair(&self) -> Decimal {
        self.repair
    }
}

/// Which source column supplies each logical [`Field`].
///
/// Date and product line may stay unresolved when a header names some fields but
/// not those two individually; unresolved columns read as empty strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Column of the date, if any
    pub date: Option<usize>,
    /// Column of the product line, if any
    pub product_line: Option<usize>,
    /// Column of the produced count
    pub produced: usize,
    /// Column of the QC pass count
    pub qc_pass: usize,
    /// Column of the defect count
    pub defect: usize,
    /// Column of the repair count
    pub repair: usize,
}

impl ColumnMapping {
    /// The mapping used for sheets without a recognizable header
    pub const POSITIONAL: ColumnMapping = ColumnMapping {
        date: Some(0),
        product_line: Some(1),
        produced: 2,
        qc_pass: 3,
        defect: 4,
        repair: 5,
    };

    /// Returns the column index for a field, if resolved
    #[must_use]
    pub fn column(&self, field: Field) -> Option<usize> {
        match field {
            Field::Date => self.date,
            Field::ProductLine => self.product_line,
            Field::Produced => Some(self.produced),
            Field::QcPass => Some(self.qc_pass),
            Field::Defect => Some(self.defect),
            Field::Repair => Some(self.repair),
        }
    }
}

/// Counts summed across a set of [`Record`]s
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodTotals {
    /// Total units produced
    pub produced: Decimal,
    /// Total units passing QC
    pub qc_pass: Decimal,
    /// Total defective units
    pub defect: Decimal,
    /// Total repaired units
    pub repair: Decimal,
}

/// Percentages derived from a [`PeriodTotals`]. Each is 0 when its divisor is 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct Rates {
    /// Produced units as a percentage of the target
    pub production: Decimal,
    /// Defective units as a percentage of produced units
    pub defect: Decimal,
    /// Repaired units as a percentage of produced units
    pub repair: Decimal,
}

/// Totals, target and rates for one reporting scope (a day, or the whole sheet)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodReport {
    /// Summed counts
    pub totals: PeriodTotals,
    /// Production target for the scope
    pub target: Decimal,
    /// Rates derived from `totals` and `target`
    pub rates: Rates,
}

/// The latest-day figures of one tracked product line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSnapshot {
    /// Tracked name, as configured
    pub name: String,
    /// Whether a latest-day row matched the name. Counts are zero when it didn't.
    pub matched: bool,
    /// Units produced
    pub produced: Decimal,
    /// Units that passed QC
    pub qc_pass: Decimal,
    /// Defective units
    pub defect: Decimal,
    /// Repaired units
    pub repair: Decimal,
}

impl ProductSnapshot {
    /// Snapshot for a product with no row on the latest day
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matched: false,
            produced: Decimal::ZERO,
            qc_pass: Decimal::ZERO,
            defect: Decimal::ZERO,
            repair: Decimal::ZERO,
        }
    }

    /// Snapshot copying the counts of a matched row
    #[must_use]
    pub fn from_record(name: impl Into<String>, record: &Record) -> Self {
        Self {
            name: name.into(),
            matched: true,
            produced: record.produced,
            qc_pass: record.qc_pass,
            defect: record.defect,
            repair: record.repair,
        }
    }
}

/// The three pie-chart slices for a day's totals
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct ChartSegments {
    /// Produced units minus defects, never negative
    pub production: Decimal,
    /// Defective units
    pub defect: Decimal,
    /// Repaired units
    pub repair: Decimal,
}

/// Everything the dashboard shows for one loaded sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Greatest date string in the sheet
    pub latest_date: String,
    /// Number of data rows the figures were computed from
    pub record_count: usize,
    /// Figures for the latest date only
    pub daily: PeriodReport,
    /// Figures for every row in the sheet
    pub period: PeriodReport,
    /// Latest-day figures per tracked product, in configured order
    pub products: Vec<ProductSnapshot>,
    /// Pie-chart split of the daily totals
    pub chart: ChartSegments,
}

impl Summary {
    /// Looks up a tracked product's snapshot by its configured name
    #[must_use]
    pub fn product(&self, name: &str) -> Option<&ProductSnapshot> {
        self.products.iter().find(|snapshot| snapshot.name == name)
    }
}
