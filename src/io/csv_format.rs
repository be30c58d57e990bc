//! CSV format handling for ledgers and reconciliation output
//!
//! This module centralizes all CSV format concerns, providing:
//! - LedgerCsvRow structure for deserialization
//! - Header validation against the required columns
//! - Lenient date and amount parsing
//! - Conversion from CSV rows to transaction records
//! - Report and annotated-ledger serialization
//!
//! Parsing functions are pure (no I/O); the writers take any `Write`.

use crate::core::balance::LedgerTotals;
use crate::core::engine::LedgerOutcome;
use crate::core::report::{MatchStatus, ReconciliationReport};
use crate::types::{
    format_amount, LedgerSide, MatchCategory, ReconError, RecordIndex, TransactionRecord,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// Columns every ledger must provide
pub const REQUIRED_COLUMNS: [&str; 4] = ["date", "description", "debit", "credit"];

/// Date-only layouts, tried in order
///
/// Month-first `MM/DD/YYYY` is tried before the day-first reading, so an
/// ambiguous `03/04/2024` is March 4th.
const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y%m%d",
];

/// Date-time layouts; only the date part is kept
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// CSV row structure for deserialization
///
/// Every field is optional so that a row with an empty or missing cell
/// still deserializes; the conversion step decides the fallbacks. Extra
/// columns are ignored.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct LedgerCsvRow {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub debit: Option<String>,
    #[serde(default)]
    pub credit: Option<String>,
    #[serde(default)]
    pub balance: Option<String>,
}

/// Required columns absent from `headers`
///
/// Header names are compared after trimming, case-sensitively.
pub fn missing_columns<'a, I>(headers: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = headers.into_iter().map(str::trim).collect();
    REQUIRED_COLUMNS
        .into_iter()
        .filter(|column| !present.contains(column))
        .collect()
}

/// Fail with `MissingColumns` unless every required column is present
pub fn validate_headers<'a, I>(side: LedgerSide, headers: I) -> Result<(), ReconError>
where
    I: IntoIterator<Item = &'a str>,
{
    let missing = missing_columns(headers);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ReconError::missing_columns(side, &missing))
    }
}

/// Parse a calendar date, ignoring any time of day
///
/// Returns `None` for empty or unrecognized input.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|datetime| datetime.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
}

/// Parse an amount cell
///
/// Thousands separators are dropped and scientific notation is accepted.
/// Empty input is `Ok(None)`; anything else unparseable is an error
/// message for the caller to log.
pub fn parse_amount(raw: &str) -> Result<Option<Decimal>, String> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map(Some)
        .map_err(|_| format!("Invalid amount '{}'", raw.trim()))
}

/// Convert a LedgerCsvRow to a TransactionRecord
///
/// Never fails: a missing or unparseable date becomes `None`, and a missing
/// or unparseable debit or credit becomes zero. Fallbacks that discard a
/// non-empty value are logged.
pub fn convert_ledger_row(row: LedgerCsvRow, index: RecordIndex) -> TransactionRecord {
    let date = match row.date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                tracing::debug!(row = index, value = raw, "Unparseable date, record excluded from date matching");
            }
            parsed
        }
        _ => None,
    };

    let debit = amount_or_zero(row.debit.as_deref(), index, "debit");
    let credit = amount_or_zero(row.credit.as_deref(), index, "credit");
    let balance = row
        .balance
        .as_deref()
        .and_then(|raw| parse_amount(raw).ok().flatten());

    let mut record = TransactionRecord::new(
        index,
        date,
        row.description.unwrap_or_default().trim(),
        debit,
        credit,
    );
    record.balance = balance;
    record
}

fn amount_or_zero(raw: Option<&str>, index: RecordIndex, column: &str) -> Decimal {
    match raw.map(parse_amount) {
        Some(Ok(Some(amount))) => amount,
        Some(Err(message)) => {
            tracing::warn!(row = index, column, "{}, using 0", message);
            Decimal::ZERO
        }
        _ => Decimal::ZERO,
    }
}

/// One line of the summary report
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ReportRow {
    pub category: String,
    pub ledger_a: String,
    pub ledger_b: String,
    pub color: String,
}

impl ReportRow {
    fn new(
        category: impl Into<String>,
        ledger_a: impl ToString,
        ledger_b: impl ToString,
        color: impl Into<String>,
    ) -> Self {
        ReportRow {
            category: category.into(),
            ledger_a: ledger_a.to_string(),
            ledger_b: ledger_b.to_string(),
            color: color.into(),
        }
    }
}

/// Rows of the summary report in output order
///
/// One row per match category, then the closing debit and credit of each
/// ledger, then the closing-balance and total status lines.
pub fn report_rows(report: &ReconciliationReport) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = MatchCategory::ALL
        .into_iter()
        .map(|category| {
            ReportRow::new(
                category.label(),
                report.counts_a.get(category),
                report.counts_b.get(category),
                category.color(),
            )
        })
        .collect();

    rows.push(ReportRow::new(
        "Closing Debit",
        format_amount(report.closing_a.debit),
        format_amount(report.closing_b.debit),
        "",
    ));
    rows.push(ReportRow::new(
        "Closing Credit",
        format_amount(report.closing_a.credit),
        format_amount(report.closing_b.credit),
        "",
    ));
    rows.push(ReportRow::new(
        "Closing Balance",
        report.closing_status,
        report.closing_status,
        report.closing_status.color(),
    ));
    rows.push(ReportRow::new(
        "Total",
        report.total_status,
        report.total_status,
        report.total_status.color(),
    ));
    rows
}

/// Write the summary report as CSV
///
/// Columns: category, ledger_a, ledger_b, color.
pub fn write_report_csv(
    report: &ReconciliationReport,
    output: &mut dyn Write,
) -> Result<(), ReconError> {
    let mut writer = csv::Writer::from_writer(output);

    for row in report_rows(report) {
        writer
            .serialize(&row)
            .map_err(|e| ReconError::write_error(format!("Failed to write report row: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| ReconError::write_error(format!("Failed to flush report: {}", e)))?;

    Ok(())
}

/// Write a ledger annotated with its remarks
///
/// Columns: date, description, debit, credit, balance, remarks. The records
/// are followed by a "Closing Balance" row carrying the closing figures and
/// closing status, and a "Total" row carrying the column totals and total
/// status.
pub fn write_annotated_ledger_csv(
    outcome: &LedgerOutcome,
    totals: &LedgerTotals,
    closing_status: MatchStatus,
    total_status: MatchStatus,
    output: &mut dyn Write,
) -> Result<(), ReconError> {
    let mut writer = csv::Writer::from_writer(output);
    let write_failed =
        |e: csv::Error| ReconError::write_error(format!("Failed to write {}: {}", outcome.side, e));

    writer
        .write_record(["date", "description", "debit", "credit", "balance", "remarks"])
        .map_err(write_failed)?;

    for record in &outcome.records {
        writer
            .write_record([
                record.date.map(|d| d.to_string()).unwrap_or_default(),
                record.description.clone(),
                format_amount(record.debit),
                format_amount(record.credit),
                record
                    .balance
                    .map(format_amount)
                    .unwrap_or_default(),
                record.classification.to_string(),
            ])
            .map_err(write_failed)?;
    }

    writer
        .write_record([
            String::new(),
            "Closing Balance".to_string(),
            format_amount(totals.closing.debit),
            format_amount(totals.closing.credit),
            String::new(),
            closing_status.to_string(),
        ])
        .map_err(write_failed)?;
    writer
        .write_record([
            String::new(),
            "Total".to_string(),
            format_amount(totals.total_debit),
            format_amount(totals.total_credit),
            String::new(),
            total_status.to_string(),
        ])
        .map_err(write_failed)?;

    writer
        .flush()
        .map_err(|e| ReconError::write_error(format!("Failed to flush {}: {}", outcome.side, e)))?;

    Ok(())
}
