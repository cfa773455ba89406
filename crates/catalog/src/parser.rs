//! Parser for catalog CSV files.
//!
//! Format (first line is a header and is skipped):
//! `title,director,year,copies,genre,production_company,rental_fee,founded_year`
//!
//! Fields may be wrapped in double quotes so titles can contain commas;
//! a doubled quote inside a quoted field stands for one literal quote.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::{CatalogError, Result};
use crate::types::NewMovie;

/// Number of columns in every catalog record
pub const FIELD_COUNT: usize = 8;

/// Open a catalog file and parse every record in it.
///
/// A missing or unreadable file is reported as `SourceUnavailable`.
pub fn read_file(path: &Path) -> Result<Vec<NewMovie>> {
    let file = File::open(path).map_err(|_| CatalogError::SourceUnavailable {
        path: path.display().to_string(),
    })?;
    parse_records(BufReader::new(file))
}

/// Parse every record from a catalog source.
///
/// Blank lines are skipped. Line numbers in errors are 1-based and count the
/// header.
pub fn parse_records<R: BufRead>(reader: R) -> Result<Vec<NewMovie>> {
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let fields = split_record(line_trimmed, line_no)?;
        if fields.len() != FIELD_COUNT {
            return Err(CatalogError::FieldCountMismatch {
                expected: FIELD_COUNT,
                found: fields.len(),
                line: line_no,
            });
        }

        records.push(NewMovie {
            title: fields[0].clone(),
            director: fields[1].clone(),
            year: parse_field(&fields[2], "year", line_no)?,
            copies: parse_field(&fields[3], "copies", line_no)?,
            genre: fields[4].clone(),
            production_company: fields[5].clone(),
            rental_fee: parse_field(&fields[6], "rental_fee", line_no)?,
            founded_year: parse_field(&fields[7], "founded_year", line_no)?,
        });
    }

    Ok(records)
}

/// Parse one numeric column, naming the column in the error
fn parse_field<T>(raw: &str, field: &str, line_no: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| CatalogError::ParseError {
        line: line_no,
        reason: format!("Invalid {}: {} ({})", field, raw, e),
    })
}

/// Split one CSV line into fields, honouring double quotes
fn split_record(line: &str, line_no: usize) -> Result<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(CatalogError::ParseError {
            line: line_no,
            reason: "Unterminated quoted field".to_string(),
        });
    }
    fields.push(current.trim().to_string());
    Ok(fields)
}
