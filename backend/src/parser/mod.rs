//! Delimited-file reading and writing with encoding and delimiter auto-detection.
//!
//! Raw exports arrive in whatever encoding the spreadsheet tool chose; they are
//! decoded to UTF-8, the delimiter is guessed from the header line, and every
//! field becomes a [`Cell`]. Writing always produces comma-delimited UTF-8.

use std::io::Write;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::table::{Cell, Table};

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed table
    pub table: Table,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding.
///
/// Unknown encodings and invalid UTF-8 fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let text = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };
    text.trim_start_matches('\u{feff}').to_string()
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
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

/// Parse already-decoded content with an explicit delimiter.
///
/// Blank lines are skipped; ragged rows are padded with missing cells.
pub fn parse_str(content: &str, delimiter: char) -> CsvResult<Table> {
    read_table(content, delimiter, true)
}

fn read_table(content: &str, delimiter: char, skip_blank: bool) -> CsvResult<Table> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(delimiter))
        .flexible(true)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if skip_blank && record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(Cell::from_field).collect());
    }

    Ok(Table::new(headers, rows))
}

/// Parse raw bytes with auto-detection of encoding and (unless given) delimiter.
pub fn parse_bytes_auto(bytes: &[u8], delimiter: Option<char>) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    let table = parse_str(&content, delimiter)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

/// Parse a file with auto-detection.
///
/// A path that does not exist yields [`CsvError::NotFound`].
pub fn parse_file_auto<P: AsRef<Path>>(path: P, delimiter: Option<char>) -> CsvResult<ParseResult> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CsvError::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    parse_bytes_auto(&bytes, delimiter)
}

/// Read a table previously written by [`write_table`].
///
/// The file is UTF-8 and comma-delimited. Every record is kept, including
/// rows whose cells are all empty.
pub fn parse_table_file<P: AsRef<Path>>(path: P) -> CsvResult<Table> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CsvError::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    read_table(&decode_content(&bytes, "utf-8"), ',', false)
}

/// Write a table as comma-delimited UTF-8 with a header row.
pub fn write_table<W: Write>(table: &Table, writer: W) -> CsvResult<()> {
    let mut out = csv::WriterBuilder::new().from_writer(writer);
    out.write_record(table.headers())?;
    for row in table.rows() {
        out.write_record(row.iter().map(|c| c.to_field().into_owned()))?;
    }
    out.flush()?;
    Ok(())
}

/// Write serializable records under an explicit header row.
///
/// The header is written even when there are no records.
pub fn write_records<W, T>(headers: &[&str], records: &[T], writer: W) -> CsvResult<()>
where
    W: Write,
    T: serde::Serialize,
{
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(headers)?;
    for record in records {
        out.serialize(record)?;
    }
    out.flush()?;
    Ok(())
}

fn delimiter_byte(delimiter: char) -> u8 {
    if delimiter.is_ascii() {
        delimiter as u8
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let table = parse_str("name;age\nAlice;30\nBob;25", ';').unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, "name"), Some(&Cell::Text("Alice".into())));
        assert_eq!(table.cell(1, "age"), Some(&Cell::Text("25".into())));
    }

    #[test]
    fn test_quoted_values_with_delimiter() {
        let csv = "name,industry\n\"Scrub Daddy, Inc.\",\"Lifestyle/Home\"";
        let table = parse_str(csv, ',').unwrap();
        assert_eq!(
            table.cell(0, "name"),
            Some(&Cell::Text("Scrub Daddy, Inc.".into()))
        );
    }

    #[test]
    fn test_empty_lines_skipped() {
        let table = parse_str("a;b\n1;2\n\n3;4\n", ';').unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_written_table_keeps_blank_rows() {
        let table = Table::new(
            vec!["name".into(), "amount".into()],
            vec![
                vec![Cell::Text("Alpha".into()), Cell::Number(100.0)],
                vec![Cell::Missing, Cell::Missing],
            ],
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.csv");
        write_table(&table, std::fs::File::create(&path).unwrap()).unwrap();

        let reread = parse_table_file(&path).unwrap();
        assert_eq!(reread.row_count(), 2);
        assert!(reread.cell(1, "name").unwrap().is_missing());
        assert!(reread.cell(1, "amount").unwrap().is_missing());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(parse_str(&raw, ',').unwrap().row_count(), 1);
    }

    #[test]
    fn test_table_file_not_found() {
        let err = parse_table_file("/nonexistent/cleaned.csv").unwrap_err();
        assert!(matches!(err, CsvError::NotFound(_)));
    }

    #[test]
    fn test_missing_values() {
        let table = parse_str("a;b;c\n1;;3\n4;NaN", ';').unwrap();

        assert!(table.cell(0, "b").unwrap().is_missing());
        assert!(table.cell(1, "b").unwrap().is_missing());
        assert!(table.cell(1, "c").unwrap().is_missing());
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_str("", ';'), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_auto_parse() {
        let result = parse_bytes_auto(b"name;age\nAlice;30\nBob;25", None).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.table.row_count(), 2);
        assert_eq!(result.table.headers(), &["name".to_string(), "age".to_string()]);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_bom_stripped() {
        let result = parse_bytes_auto("\u{feff}a,b\n1,2".as_bytes(), None).unwrap();
        assert_eq!(result.table.headers()[0], "a");
    }

    #[test]
    fn test_missing_file() {
        let err = parse_file_auto("/definitely/not/here.csv", None).unwrap_err();
        assert!(matches!(err, CsvError::NotFound(_)));
    }

    #[test]
    fn test_write_table() {
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![Cell::Number(1000.0), Cell::Missing],
                vec![Cell::Text("x, y".into()), Cell::Number(0.25)],
            ],
        );
        let mut buf = Vec::new();
        write_table(&table, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["a,b", "1000,", "\"x, y\",0.25"]);
    }
}
