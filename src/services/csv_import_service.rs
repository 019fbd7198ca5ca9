use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::{CreatePosition, Position};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Symbol", alias = "ticker", alias = "Ticker")]
    symbol: String,
    #[serde(alias = "Quantity", alias = "shares", alias = "Shares")]
    quantity: String,
    #[serde(alias = "Purchase Price", alias = "price", alias = "Price")]
    purchase_price: String,
    #[serde(alias = "Purchase Date", alias = "date", alias = "Date")]
    purchase_date: String,
}

#[derive(Debug)]
pub struct ImportResult {
    pub positions: Vec<Position>,
    pub errors: Vec<String>,
}

fn parse_money_string(s: &str) -> Result<BigDecimal> {
    let cleaned = s.replace(['$', ','], "");
    let cleaned = cleaned.trim();

    BigDecimal::from_str(cleaned).with_context(|| format!("Failed to parse amount: {}", s))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .with_context(|| format!("Failed to parse date: {}", s))
}

fn process_row(row: CsvRow) -> Result<Position> {
    let position = Position::new(CreatePosition {
        symbol: row.symbol,
        quantity: parse_money_string(&row.quantity)?,
        purchase_price: parse_money_string(&row.purchase_price)?,
        purchase_date: parse_date(&row.purchase_date)?,
    })?;
    Ok(position)
}

/// Parses `symbol,quantity,purchase_price,purchase_date` rows.
///
/// Bad rows are collected in `errors` with their line number and do not stop
/// the import.
pub fn parse_positions<R: Read>(reader: R) -> ImportResult {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut positions = Vec::new();
    let mut errors = Vec::new();

    for (line_num, result) in reader.deserialize::<CsvRow>().enumerate() {
        // +2: one for the header, one for 1-based lines
        let line = line_num + 2;
        match result.map_err(anyhow::Error::from).and_then(process_row) {
            Ok(position) => positions.push(position),
            Err(e) => errors.push(format!("Line {}: {:#}", line, e)),
        }
    }

    ImportResult { positions, errors }
}

pub fn import_positions_file(file_path: &Path) -> Result<ImportResult> {
    let file = std::fs::File::open(file_path)
        .with_context(|| format!("Failed to open positions file: {:?}", file_path))?;

    let result = parse_positions(file);
    info!(
        "Imported {} positions from {:?} ({} rejected rows)",
        result.positions.len(),
        file_path,
        result.errors.len()
    );
    for error in &result.errors {
        warn!("{}", error);
    }

    Ok(result)
}
