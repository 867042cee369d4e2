//! Turning sheet text into [`Record`]s
//!
//! Sheets are exported by hand-maintained spreadsheets, so nothing here fails:
//! unbalanced quotes, short rows and junk numbers all degrade to empty strings
//! or zeros.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::types::{ColumnMapping, Field, Record};

/// Splits one CSV line into trimmed field values.
///
/// Commas inside double quotes are kept, and `""` inside quotes is a literal
/// quote. A line with N unquoted commas always yields N+1 fields.
///
/// ```
/// assert_eq!(prodboard::parse::split_line(r#"a,"b,c",d"#), ["a", "b,c", "d"]);
/// ```
#[must_use]
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields.iter().map(|field| clean_field(field)).collect()
}

/// Trims, drops one matched pair of surrounding quotes, and trims again
fn clean_field(raw: &str) -> String {
    let trimmed = trim_cell(raw);
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed);
    trim_cell(unquoted).to_string()
}

/// Whitespace trim that also drops a byte-order mark
fn trim_cell(cell: &str) -> &str {
    cell.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Works out which column supplies each [`Field`] from a header row.
///
/// Names match case-insensitively against [`Field::synonyms`]. A header naming
/// none of date, product line or produced isn't recognized and gives `None`;
/// such sheets are read with [`ColumnMapping::POSITIONAL`]. Otherwise counts
/// that aren't named fall back to their positional column, and date and product
/// line fall back to columns 0 and 1 only when neither of them was found.
#[must_use]
pub fn resolve_columns<S: AsRef<str>>(header: &[S]) -> Option<ColumnMapping> {
    let lowered: Vec<String> = header.iter().map(|h| h.as_ref().to_lowercase()).collect();
    let find = |field: Field| {
        field
            .synonyms()
            .iter()
            .find_map(|name| lowered.iter().position(|h| h == name))
    };

    let date = find(Field::Date);
    let product_line = find(Field::ProductLine);
    let produced = find(Field::Produced);
    if date.is_none() && product_line.is_none() && produced.is_none() {
        return None;
    }

    let (date, product_line) = match (date, product_line) {
        (None, None) => (
            Some(Field::Date.default_position()),
            Some(Field::ProductLine.default_position()),
        ),
        found => found,
    };
    let or_default = |found: Option<usize>, field: Field| found.unwrap_or(field.default_position());
    Some(ColumnMapping {
        date,
        product_line,
        produced: or_default(produced, Field::Produced),
        qc_pass: or_default(find(Field::QcPass), Field::QcPass),
        defect: or_default(find(Field::Defect), Field::Defect),
        repair: or_default(find(Field::Repair), Field::Repair),
    })
}

/// Parses the leading number of a cell, ignoring anything after it.
///
/// Accepts an optional sign, digits with an optional fraction, and an optional
/// exponent. Cells without a numeric prefix count as zero. Values beyond what a
/// [`Decimal`] holds saturate to [`Decimal::MAX`] or [`Decimal::MIN`], and
/// values too small for its 28 decimal places become zero.
#[must_use]
pub fn coerce_count(cell: &str) -> Decimal {
    let text = trim_cell(cell);
    let bytes = text.as_bytes();
    let digits_from = |mut at: usize| {
        while at < bytes.len() && bytes[at].is_ascii_digit() {
            at += 1;
        }
        at
    };

    let int_start = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(int_start);
    let (frac_start, frac_end) = if bytes.get(int_end) == Some(&b'.') {
        (int_end + 1, digits_from(int_end + 1))
    } else {
        (int_end, int_end)
    };
    if int_end == int_start && frac_end == frac_start {
        return Decimal::ZERO;
    }
    let saturated = if bytes[0] == b'-' {
        Decimal::MIN
    } else {
        Decimal::MAX
    };

    // Only ASCII has been consumed so far, so these offsets are char boundaries.
    let mut literal = String::with_capacity(text.len() + 2);
    if bytes[0] == b'-' {
        literal.push('-');
    }
    if int_end > int_start {
        literal.push_str(&text[int_start..int_end]);
    } else {
        literal.push('0');
    }
    if frac_end > frac_start {
        literal.push('.');
        literal.push_str(&text[frac_start..frac_end]);
    }
    let Ok(mantissa) = Decimal::from_str(&literal) else {
        return saturated;
    };

    let exponent = if matches!(bytes.get(frac_end), Some(b'e' | b'E')) {
        let sign_len = usize::from(matches!(bytes.get(frac_end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(frac_end + 1 + sign_len);
        (exp_end > frac_end + 1 + sign_len).then(|| &text[frac_end + 1..exp_end])
    } else {
        None
    };
    let Some(exponent) = exponent.filter(|_| !mantissa.is_zero()) else {
        return mantissa.normalize();
    };
    literal.push('e');
    literal.push_str(exponent);
    match Decimal::from_scientific(&literal) {
        Ok(value) => value.normalize(),
        Err(_) if exponent.starts_with('-') => Decimal::ZERO,
        Err(_) => saturated,
    }
}

impl ColumnMapping {
    /// Builds a [`Record`] from one tokenized row
    #[must_use]
    pub fn record_from<S: AsRef<str>>(&self, cells: &[S]) -> Record {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| cells.get(i))
                .map_or("", |value| value.as_ref())
        };
        let text = |field: Field| trim_cell(cell(self.column(field))).to_string();
        let count = |field: Field| coerce_count(cell(self.column(field)));
        Record {
            date: text(Field::Date),
            product_line: text(Field::ProductLine),
            produced: count(Field::Produced),
            qc_pass: count(Field::QcPass),
            defect: count(Field::Defect),
            repair: count(Field::Repair),
        }
    }
}

/// Parses a whole sheet export into records, in document order.
///
/// The first non-blank line is always the header; see [`resolve_columns`] for
/// how sheets without a usable header are read. Blank documents give no records.
#[must_use]
pub fn parse_document(text: &str) -> Vec<Record> {
    let normalized = text.replace('\r', "");
    let mut lines = normalized
        .trim()
        .split('\n')
        .filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        debug!("document is blank");
        return Vec::new();
    };
    let header = split_line(header_line);
    let mapping = match resolve_columns(header.as_slice()) {
        Some(mapping) => {
            debug!(?mapping, "resolved columns from header");
            mapping
        }
        None => {
            warn!(?header, "no recognizable header, reading columns by position");
            ColumnMapping::POSITIONAL
        }
    };

    let records: Vec<Record> = lines
        .map(split_line)
        .filter(|cells| !cells.is_empty())
        .map(|cells| mapping.record_from(cells.as_slice()))
        .collect();
    debug!(rows = records.len(), "parsed document");
    records
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_split_quoted_separator() {
        assert_eq!(split_line(r#"a,"b,c",d"#), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn test_split_escaped_quotes() {
        assert_eq!(split_line(r#""He said ""hi""""#), vec![r#"He said "hi""#]);
    }

    #[test]
    fn test_split_field_count_follows_separators() {
        assert_eq!(split_line("").len(), 1);
        assert_eq!(split_line(",").len(), 2);
        assert_eq!(split_line(",,,,").len(), 5);
        assert_eq!(split_line("a,,b,").len(), 4);
        assert_eq!(split_line(r#"x,"y,z",,"#).len(), 4);
    }

    #[test]
    fn test_split_trims_around_quotes() {
        assert_eq!(split_line(r#"  "  x  "  , y "#), vec!["x", "y"]);
    }

    #[test]
    fn test_split_keeps_quotes_that_are_not_a_pair() {
        assert_eq!(split_line(r#"x"""""#), vec![r#"x""#]);
        assert_eq!(split_line(r#""""x"#), vec![r#""x"#]);
        assert_eq!(split_line(r#""""a""""#), vec!["a"]);
    }

    #[test]
    fn test_split_unbalanced_quote_runs_to_end() {
        assert_eq!(split_line(r#"a,"b,c,d"#), vec!["a", "b,c,d"]);
    }

    #[test]
    fn test_split_strips_byte_order_mark() {
        assert_eq!(split_line("\u{feff}tanggal,barang"), vec!["tanggal", "barang"]);
    }

    #[test]
    fn test_resolve_full_header() {
        let mapping = resolve_columns(&["tanggal", "barang", "production", "qc", "defect", "repair"]);
        assert_eq!(mapping, Some(ColumnMapping::POSITIONAL));
    }

    #[test]
    fn test_resolve_reordered_synonyms() {
        let mapping =
            resolve_columns(&["Perbaikan", "Kerusakan", "QUALITY", "Jumlah", "Item", "Date"]);
        assert_eq!(
            mapping,
            Some(ColumnMapping {
                date: Some(5),
                product_line: Some(4),
                produced: 3,
                qc_pass: 2,
                defect: 1,
                repair: 0,
            })
        );
    }

    #[test]
    fn test_resolve_first_synonym_wins() {
        // "date" comes before "tgl" in the synonym list, regardless of column order
        let mapping = resolve_columns(&["tgl", "date", "barang", "prod"]).unwrap();
        assert_eq!(mapping.date, Some(1));
        assert_eq!(mapping.produced, 3);
    }

    #[test]
    fn test_resolve_unrecognized_header() {
        assert_eq!(resolve_columns(&["col1", "col2", "col3", "col4", "col5", "col6"]), None);
        assert_eq!(resolve_columns::<&str>(&[]), None);
        // counts alone don't make a header
        assert_eq!(resolve_columns(&["qc", "defect", "repair"]), None);
    }

    #[test]
    fn test_resolve_only_produced_forces_date_and_product() {
        let mapping = resolve_columns(&["x", "y", "z", "produksi"]).unwrap();
        assert_eq!(mapping.date, Some(0));
        assert_eq!(mapping.product_line, Some(1));
        assert_eq!(mapping.produced, 3);
        assert_eq!(mapping.qc_pass, 3);
        assert_eq!(mapping.defect, 4);
        assert_eq!(mapping.repair, 5);
    }

    #[test]
    fn test_resolve_partial_header_keeps_unresolved_product() {
        let mapping = resolve_columns(&["date", "qty", "defects"]).unwrap();
        assert_eq!(mapping.date, Some(0));
        assert_eq!(mapping.product_line, None);
        assert_eq!(mapping.produced, 2);
        assert_eq!(mapping.defect, 2);
        assert_eq!(mapping.repair, 5);
    }

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count("100"), dec!(100));
        assert_eq!(coerce_count(" 12.50 "), dec!(12.5));
        assert_eq!(coerce_count("7 pcs"), dec!(7));
        assert_eq!(coerce_count(".5"), dec!(0.5));
        assert_eq!(coerce_count("3."), dec!(3));
        assert_eq!(coerce_count("-4"), dec!(-4));
        assert_eq!(coerce_count("1e3"), dec!(1000));
        assert_eq!(coerce_count("2e"), dec!(2));
        assert_eq!(coerce_count(""), Decimal::ZERO);
        assert_eq!(coerce_count("n/a"), Decimal::ZERO);
        assert_eq!(coerce_count("-"), Decimal::ZERO);
        assert_eq!(coerce_count("."), Decimal::ZERO);
    }

    #[test]
    fn test_coerce_count_exponents() {
        assert_eq!(coerce_count("1.5e2"), dec!(150));
        assert_eq!(coerce_count("2.5E-1"), dec!(0.25));
        assert_eq!(coerce_count("-3e+2 units"), dec!(-300));
        assert_eq!(coerce_count("0e999999"), Decimal::ZERO);
    }

    #[test]
    fn test_coerce_count_out_of_range() {
        assert_eq!(coerce_count("1e29"), Decimal::MAX);
        assert_eq!(coerce_count("12345678901234567890123456789012"), Decimal::MAX);
        assert_eq!(coerce_count("-1e40"), Decimal::MIN);
        assert_eq!(coerce_count("1e-40"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_with_header() {
        let records = parse_document(
            "tanggal,barang,production,qc,defect,repair\n2024-01-01,Chasis,100,95,5,2\n",
        );
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.date(), "2024-01-01");
        assert_eq!(record.product_line(), "Chasis");
        assert_eq!(record.produced(), dec!(100));
        assert_eq!(record.qc_pass(), dec!(95));
        assert_eq!(record.defect(), dec!(5));
        assert_eq!(record.repair(), dec!(2));
    }

    #[test]
    fn test_parse_unknown_header_matches_positional() {
        let with_unknown = parse_document("col1,col2,col3,col4,col5,col6\n2024-01-02,Cushion,8,7,1,0");
        let expected = ColumnMapping::POSITIONAL
            .record_from(split_line("2024-01-02,Cushion,8,7,1,0").as_slice());
        assert_eq!(with_unknown, vec![expected]);
    }

    #[test]
    fn test_parse_windows_line_endings_and_blank_lines() {
        let text = "\r\nDate, Item, Production\r\n\r\n2024-01-01, \"Head, rest\", 4\r\n   \r\n2024-01-02,Chasis,x\r\n";
        let records = parse_document(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product_line(), "Head, rest");
        assert_eq!(records[0].produced(), dec!(4));
        assert_eq!(records[1].produced(), Decimal::ZERO);
        assert_eq!(records[1].qc_pass(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_short_rows_default_to_empty() {
        let records = parse_document("tanggal,barang,production,qc,defect,repair\n2024-01-01");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date(), "2024-01-01");
        assert_eq!(records[0].product_line(), "");
        assert_eq!(records[0].repair(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_blank_documents() {
        assert!(parse_document("").is_empty());
        assert!(parse_document(" \n\r\n\t\n").is_empty());
        // a lone header has no data rows
        assert!(parse_document("tanggal,barang,production").is_empty());
    }
}
