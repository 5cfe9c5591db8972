//! Header-driven CSV reading with encoding and delimiter auto-detection.
//!
//! FAOSTAT bulk downloads show up as UTF-8 (sometimes with a BOM) or Latin-1,
//! comma separated, with quoted fields. Columns are accessed by header name;
//! a column the file does not have reads as an empty string.

use csv::{ReaderBuilder, StringRecord};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{CsvError, CsvResult};

/// Parsed CSV table
#[derive(Debug, Clone)]
pub struct Table {
    /// Column headers, cleaned
    pub headers: Vec<String>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    records: Vec<StringRecord>,
    index: HashMap<String, usize>,
}

/// Borrowed view of one data row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    record: &'a StringRecord,
}

impl<'a> Row<'a> {
    /// Cleaned value of `column`, or `""` when the column or cell is absent.
    pub fn get(&self, column: &str) -> &'a str {
        self.table
            .index
            .get(column)
            .and_then(|&i| self.record.get(i))
            .map(clean_field)
            .unwrap_or("")
    }

    /// Line number in the source file (1-based, header is line 1).
    pub fn line(&self) -> u64 {
        self.record.position().map(|p| p.line()).unwrap_or(0)
    }
}

impl Table {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    /// Header as written in the file, matched case-insensitively.
    pub fn find_column(&self, column: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.eq_ignore_ascii_case(column))
            .map(String::as_str)
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.records.iter().map(move |record| Row { table: self, record })
    }

    /// Every row as a JSON object keyed by header.
    pub fn to_json_records(&self) -> Vec<Value> {
        self.rows()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .headers
                    .iter()
                    .map(|h| (h.clone(), Value::String(row.get(h).to_string())))
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }
}

/// Strip surrounding whitespace.
pub fn clean_field(raw: &str) -> &str {
    raw.trim()
}

/// Strip whitespace and any quote characters left around a code.
///
/// Only meant for identifier columns; free text keeps its quotes.
pub fn strip_stray_quotes(raw: &str) -> &str {
    raw.trim().trim_matches('"').trim()
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding, dropping a UTF-8 BOM.
///
/// Labels `encoding_rs` does not know are decoded as lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned()),
        // Latin-1 files from FAOSTAT are really Windows-1252
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        other => match encoding_rs::Encoding::for_label(other.as_bytes()) {
            Some(enc) => enc.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };

    if decoded.starts_with('\u{feff}') {
        decoded['\u{feff}'.len_utf8()..].to_string()
    } else {
        decoded
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text with an explicit delimiter.
pub fn parse_str(content: &str, delimiter: char, encoding: impl Into<String>) -> CsvResult<Table> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| clean_field(h).to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut index = HashMap::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        // First occurrence wins on duplicated headers
        index.entry(header.clone()).or_insert(i);
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|f| clean_field(f).is_empty()) {
            continue;
        }
        records.push(record);
    }

    Ok(Table {
        headers,
        encoding: encoding.into(),
        delimiter,
        records,
        index,
    })
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<Table> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    parse_str(&content, delimiter, encoding)
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<Table> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_driven_access() {
        let table = parse_str("Area Code,Area\n1,Afghanistan\n2,Albania", ',', "utf-8").unwrap();

        assert_eq!(table.len(), 2);
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get("Area Code"), "1");
        assert_eq!(rows[1].get("Area"), "Albania");
    }

    #[test]
    fn test_missing_column_reads_empty() {
        let table = parse_str("Area Code,Area\n1,Afghanistan", ',', "utf-8").unwrap();
        let row = table.rows().next().unwrap();

        assert_eq!(row.get("M49 Code"), "");
        assert!(!table.has_column("M49 Code"));
    }

    #[test]
    fn test_quoted_values_with_commas() {
        let csv = "Area Code,Area\n\"107\",\"Côte d'Ivoire\"\n\"9\",\"Bolivia, Plurinational State of\"";
        let table = parse_str(csv, ',', "utf-8").unwrap();
        let rows: Vec<_> = table.rows().collect();

        assert_eq!(rows[0].get("Area"), "Côte d'Ivoire");
        assert_eq!(rows[1].get("Area"), "Bolivia, Plurinational State of");
    }

    #[test]
    fn test_whitespace_trimmed_quotes_kept() {
        let table = parse_str("a;b\n  1 ; \" x \" ", ';', "utf-8").unwrap();
        let row = table.rows().next().unwrap();

        assert_eq!(row.get("a"), "1");
        assert_eq!(row.get("b"), "\" x \"");
    }

    #[test]
    fn test_escaped_quotes_survive() {
        let table = parse_str("Answer\n\"Say \"\"hello\"\"\"\n", ',', "utf-8").unwrap();
        assert_eq!(table.rows().next().unwrap().get("Answer"), "Say \"hello\"");
    }

    #[test]
    fn test_strip_stray_quotes() {
        assert_eq!(strip_stray_quotes(" \"4'\" "), "4'");
        assert_eq!(strip_stray_quotes("\" 79 \""), "79");
        assert_eq!(strip_stray_quotes("276"), "276");
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let table = parse_str("a,b,c\n1,2\n4,5,6,7", ',', "utf-8").unwrap();
        let rows: Vec<_> = table.rows().collect();

        assert_eq!(rows[0].get("c"), "");
        assert_eq!(rows[1].get("c"), "6");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let table = parse_str("a,b\n1,2\n\n,\n3,4\n", ',', "utf-8").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_str("", ',', "utf-8"), Err(CsvError::EmptyFile)));
        assert!(matches!(parse_bytes_auto(b""), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_utf8_bom_removed_from_first_header() {
        let bytes = b"\xEF\xBB\xBFArea Code,Area\n4,Algeria";
        let table = parse_bytes_auto(bytes).unwrap();

        assert_eq!(table.headers[0], "Area Code");
        assert_eq!(table.rows().next().unwrap().get("Area Code"), "4");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Réunion" in ISO-8859-1
        let bytes: &[u8] = &[0x52, 0xE9, 0x75, 0x6E, 0x69, 0x6F, 0x6E];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Réunion");

        // 0xA4 is the currency sign and 0xBD one half, not € and œ
        let decoded = decode_content(&[0xA4, 0xBD], "iso-8859-1");
        assert_eq!(decoded, "¤½");
    }

    #[test]
    fn test_unknown_encoding_falls_back_to_lossy_utf8() {
        let decoded = decode_content(b"Area Code,Area\n1,Afghanistan", "x-no-such-charset");
        assert_eq!(decoded, "Area Code,Area\n1,Afghanistan");
    }

    #[test]
    fn test_to_json_records() {
        let table = parse_str("Item,Value\nCropland,12.5", ',', "utf-8").unwrap();
        let records = table.to_json_records();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Item"], "Cropland");
        assert_eq!(records[0]["Value"], "12.5");
    }

    #[test]
    fn test_find_column_case_insensitive() {
        let table = parse_str("question,Keywords\nq,k", ',', "utf-8").unwrap();
        assert_eq!(table.find_column("Question"), Some("question"));
        assert_eq!(table.find_column("Category"), None);
    }
}
