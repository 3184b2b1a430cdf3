use crate::data::bar::Bar;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    symbol: String,
}

//parses either an rfc3339 timestamp or a bare date (daily data)
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

//loads bars from a csv file
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut bars = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;

        let timestamp = parse_timestamp(&record.timestamp).context(format!(
            "Failed to parse timestamp '{}' at line {}",
            record.timestamp,
            index + 2
        ))?;

        let bar = Bar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
            record.symbol,
        )
        .context(format!("Invalid bar at line {}", index + 2))?;

        bars.push(bar);
    }

    //sort by timestamp to ensure chronological order
    bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    Ok(bars)
}

//filters bars by symbol
pub fn filter_by_symbol(bars: &[Bar], symbol: &str) -> Vec<Bar> {
    bars.iter()
        .filter(|bar| bar.symbol == symbol)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_daily_and_rfc3339_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume,symbol").unwrap();
        writeln!(file, "2023-01-03,100,105,99,104,1000,AAPL").unwrap();
        writeln!(
            file,
            "2023-01-02T00:00:00Z,101,106,100,105,1100,AAPL"
        )
        .unwrap();
        drop(file);

        let bars = load_csv(&path).unwrap();
        assert_eq!(bars.len(), 2);
        //sorted chronologically regardless of file order
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert_eq!(bars[1].close, 104.0);
    }

    #[test]
    fn rejects_malformed_ohlc() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume,symbol").unwrap();
        writeln!(file, "2023-01-03,100,95,99,104,1000,AAPL").unwrap();
        drop(file);

        assert!(load_csv(&path).is_err());
    }

    #[test]
    fn filter_by_symbol_keeps_only_matches() {
        let bars = vec![
            Bar::new_unchecked(
                chrono::Utc::now(),
                1.0,
                1.0,
                1.0,
                1.0,
                0.0,
                "AAPL".to_string(),
            ),
            Bar::new_unchecked(
                chrono::Utc::now(),
                1.0,
                1.0,
                1.0,
                1.0,
                0.0,
                "SPY".to_string(),
            ),
        ];

        let filtered = filter_by_symbol(&bars, "SPY");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].symbol, "SPY");
    }
}
