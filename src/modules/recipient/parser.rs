// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;

use crate::{
    modules::{
        error::{code::ErrorCode, BulkMailerResult},
        recipient::RecipientRecord,
    },
    raise_error,
};

/// Recipient file formats accepted for upload. The format is always selected
/// from the declared file name, never sniffed from content.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RecipientFileFormat {
    Csv,
    Spreadsheet,
}

impl RecipientFileFormat {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some("csv") => Some(RecipientFileFormat::Csv),
            Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
                Some(RecipientFileFormat::Spreadsheet)
            }
            _ => None,
        }
    }
}

/// Decodes a recipient file into records, one per data row. The header row
/// names the fields; ragged rows map only the columns they actually have.
pub fn parse_file(
    buffer: &[u8],
    format: RecipientFileFormat,
) -> BulkMailerResult<Vec<RecipientRecord>> {
    match format {
        RecipientFileFormat::Csv => parse_csv(buffer),
        RecipientFileFormat::Spreadsheet => parse_spreadsheet(buffer),
    }
}

/// Splits an inline comma-separated address list into single-field records
/// keyed `email`. Entries are trimmed; empty entries are dropped.
pub fn parse_inline(list: &str) -> Vec<RecipientRecord> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut record = RecipientRecord::new();
            record.push("email", entry);
            record
        })
        .collect()
}

fn parse_csv(buffer: &[u8]) -> BulkMailerResult<Vec<RecipientRecord>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(buffer);
    let headers = reader
        .headers()
        .map_err(|e| {
            raise_error!(
                format!("Failed to decode recipient file header: {e}"),
                ErrorCode::RecipientFileParseError
            )
        })?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| {
            raise_error!(
                format!("Failed to decode recipient file row: {e}"),
                ErrorCode::RecipientFileParseError
            )
        })?;
        let mut record = RecipientRecord::new();
        for (key, value) in headers.iter().zip(row.iter()) {
            record.push(key, value);
        }
        records.push(record);
    }
    Ok(records)
}

fn parse_spreadsheet(buffer: &[u8]) -> BulkMailerResult<Vec<RecipientRecord>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(buffer)).map_err(|e| {
        raise_error!(
            format!("Failed to open recipient spreadsheet: {e}"),
            ErrorCode::RecipientFileParseError
        )
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            raise_error!(
                "Recipient spreadsheet has no sheets".into(),
                ErrorCode::RecipientFileParseError
            )
        })?
        .map_err(|e| {
            raise_error!(
                format!("Failed to read recipient spreadsheet: {e}"),
                ErrorCode::RecipientFileParseError
            )
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in rows {
        // Rows with nothing in any cell are padding, not recipients.
        if row.iter().all(|cell| cell_to_string(cell).trim().is_empty()) {
            continue;
        }
        let mut record = RecipientRecord::new();
        for (key, cell) in headers.iter().zip(row.iter()) {
            record.push(key, cell_to_string(cell));
        }
        records.push(record);
    }
    Ok(records)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_header_names_fields_in_order() {
        let csv = b"email,name,city\na@x.com,A,Paris\nb@x.com,B,Lyon\n";
        let records = parse_file(csv, RecipientFileFormat::Csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("email"), Some("a@x.com"));
        assert_eq!(records[0].get("name"), Some("A"));
        assert_eq!(
            records[1].iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["email", "name", "city"]
        );
    }

    #[test]
    fn csv_ragged_rows_map_overlapping_columns_only() {
        let csv = b"email,name,city\nshort@x.com,S\nlong@x.com,L,Nice,extra\n";
        let records = parse_file(csv, RecipientFileFormat::Csv).unwrap();
        assert_eq!(records[0].len(), 2);
        assert_eq!(records[0].get("city"), None);
        assert_eq!(records[1].len(), 3);
        assert_eq!(records[1].get("city"), Some("Nice"));
    }

    #[test]
    fn csv_invalid_encoding_fails_the_whole_file() {
        let mut csv = b"email,name\n".to_vec();
        csv.extend_from_slice(&[0xff, 0xfe, b',', b'X', b'\n']);
        let error = parse_file(&csv, RecipientFileFormat::Csv).unwrap_err();
        assert_eq!(error.code(), ErrorCode::RecipientFileParseError);
    }

    #[test]
    fn inline_list_trims_and_drops_empty_entries() {
        let records = parse_inline(" a@x.com , b@x.com ,, c@x.com ");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].address(), Some("a@x.com"));
        assert_eq!(records[2].get("email"), Some("c@x.com"));
    }

    #[test]
    fn inline_empty_string_yields_no_records() {
        assert!(parse_inline("").is_empty());
        assert!(parse_inline(" , ,").is_empty());
    }

    #[test]
    fn format_follows_declared_extension_only() {
        assert_eq!(
            RecipientFileFormat::from_file_name("list.csv"),
            Some(RecipientFileFormat::Csv)
        );
        assert_eq!(
            RecipientFileFormat::from_file_name("list.XLSX"),
            Some(RecipientFileFormat::Spreadsheet)
        );
        assert_eq!(RecipientFileFormat::from_file_name("list.txt"), None);
        assert_eq!(RecipientFileFormat::from_file_name("list"), None);
    }
}
