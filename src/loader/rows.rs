//! Delimited registry and alternate-name tables.

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

use crate::config::{ColumnMap, DataConfig};
use crate::models::{Parity, RegistryRow};
use crate::normalize::{normalize_name, normalize_postal_code};
use crate::registry::AlternateNames;

/// Row counts of one parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowStats {
    pub read: usize,
    pub kept: usize,
    pub skipped: usize,
}

fn reader<'a>(text: &'a str, data: &DataConfig) -> Result<csv::Reader<&'a [u8]>> {
    Ok(ReaderBuilder::new()
        .delimiter(data.delimiter_byte()?)
        .has_headers(data.has_headers)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes()))
}

fn field<'r>(record: &'r StringRecord, index: usize, name: &str) -> Result<&'r str> {
    record
        .get(index)
        .map(|f| f.trim_matches('"').trim())
        .ok_or_else(|| anyhow!("missing column {} ({})", index, name))
}

fn number<T>(record: &StringRecord, index: usize, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = field(record, index, name)?;
    raw.parse()
        .with_context(|| format!("invalid {} {:?}", name, raw))
}

fn parse_row(record: &StringRecord, columns: &ColumnMap) -> Result<RegistryRow> {
    if record.len() < columns.width() {
        return Err(anyhow!(
            "{} fields, expected at least {}",
            record.len(),
            columns.width()
        ));
    }

    let city = normalize_name(field(record, columns.city, "city")?);
    let street = normalize_name(field(record, columns.street, "street")?);
    if city.is_empty() || street.is_empty() {
        return Err(anyhow!("empty city or street"));
    }

    let postal_code = field(record, columns.postal_code, "postal_code")
        .ok()
        .map(normalize_postal_code)
        .filter(|code| !code.is_empty());

    let row = RegistryRow {
        min_number: number(record, columns.min_number, "min_number")?,
        max_number: number(record, columns.max_number, "max_number")?,
        number_type: field(record, columns.number_type, "number_type")?.parse::<Parity>()?,
        street,
        city,
        x: number(record, columns.x, "x")?,
        y: number(record, columns.y, "y")?,
        postal_code,
    };
    row.to_entry()?;
    Ok(row)
}

/// Registry rows from delimited text. Malformed rows are skipped with a
/// warning and counted.
pub fn parse_rows(
    text: &str,
    data: &DataConfig,
    columns: &ColumnMap,
) -> Result<(Vec<RegistryRow>, RowStats)> {
    let mut csv_reader = reader(text, data)?;
    let mut rows = Vec::new();
    let mut stats = RowStats::default();

    for (line, result) in csv_reader.records().enumerate() {
        stats.read += 1;
        let parsed = result
            .map_err(anyhow::Error::from)
            .and_then(|record| parse_row(&record, columns));
        match parsed {
            Ok(row) => {
                stats.kept += 1;
                rows.push(row);
            }
            Err(e) => {
                stats.skipped += 1;
                warn!("Skipping registry row {}: {:#}", line + 1, e);
            }
        }
    }

    info!(
        "Parsed {} registry rows ({} kept, {} skipped)",
        stats.read, stats.kept, stats.skipped
    );
    Ok((rows, stats))
}

/// Alternate city spellings from rows of `canonical;alt1;alt2;...`
pub fn parse_alternates(text: &str, data: &DataConfig) -> Result<AlternateNames> {
    let mut csv_reader = reader(text, data)?;
    let mut records = Vec::new();
    for result in csv_reader.records() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping alternate names row: {}", e),
        }
    }

    let alternates = AlternateNames::from_rows(
        records
            .iter()
            .map(|record| record.iter().map(|f| f.trim_matches('"'))),
    );
    info!("Loaded {} alternate city spellings", alternates.len());
    Ok(alternates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn narrow_columns() -> ColumnMap {
        ColumnMap {
            postal_code: 0,
            min_number: 1,
            max_number: 2,
            number_type: 3,
            street: 4,
            city: 5,
            x: 6,
            y: 7,
        }
    }

    #[test]
    fn test_parse_rows() {
        let text = "\
3526KB;100;150;Mixed;\"Simplonbaan\";Utrecht;136000.5;453000.25
3526KC;2;40;even;Simplonbaan;Utrecht;136100;453100
";
        let (rows, stats) = parse_rows(text, &DataConfig::default(), &narrow_columns()).unwrap();

        assert_eq!(stats, RowStats { read: 2, kept: 2, skipped: 0 });
        assert_eq!(rows[0].city, "UTRECHT");
        assert_eq!(rows[0].street, "SIMPLONBAAN");
        assert_eq!(rows[0].postal_code.as_deref(), Some("3526KB"));
        assert_eq!(rows[0].x, 136000.5);
        assert_eq!(rows[1].number_type, Parity::Even);
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let text = "\
3526KB;100;150;MIXED;Simplonbaan;Utrecht;1.0;2.0
3526KB;abc;150;MIXED;Simplonbaan;Utrecht;1.0;2.0
3526KB;100;150;PRIME;Simplonbaan;Utrecht;1.0;2.0
3526KB;150;100;MIXED;Simplonbaan;Utrecht;1.0;2.0
3526KB;100;150;MIXED;Simplonbaan;Utrecht;north;2.0
3526KB;100;150
";
        let (rows, stats) = parse_rows(text, &DataConfig::default(), &narrow_columns()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(stats, RowStats { read: 6, kept: 1, skipped: 5 });
    }

    #[test]
    fn test_short_row_reports_width() {
        let record = StringRecord::from(vec!["3526KB", "100", "150"]);
        let err = parse_row(&record, &narrow_columns()).unwrap_err();
        assert_eq!(err.to_string(), "3 fields, expected at least 8");
    }

    #[test]
    fn test_header_and_delimiter() {
        let data = DataConfig {
            delimiter: ",".to_string(),
            has_headers: true,
            ..DataConfig::default()
        };
        let text = "pc,min,max,type,street,city,x,y\n,1,9,ODD,Spui,Den Haag,1,2\n";
        let (rows, _) = parse_rows(text, &data, &narrow_columns()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].city, "DEN HAAG");
        assert_eq!(rows[0].postal_code, None);
    }

    #[test]
    fn test_parse_alternates() {
        let text = "'s-Gravenhage;Den Haag;The Hague\nFryslân;Friesland\n";
        let alternates = parse_alternates(text, &DataConfig::default()).unwrap();

        assert_eq!(alternates.len(), 3);
        assert_eq!(alternates.canonical("THE HAGUE"), Some("'S-GRAVENHAGE"));
        assert_eq!(alternates.canonical("FRIESLAND"), Some("FRYSLAN"));
    }
}
