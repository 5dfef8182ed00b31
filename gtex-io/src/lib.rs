//! gtex-io: file readers for the gtex toolkit.
//!
//! - Sample-attribute tables (tab-separated, optionally gzip-compressed)
//! - Read count matrices, opened as a buffered line stream with transparent
//!   gzip decompression
//!
//! Parsing of the matrix body lives in `gtex_core::extract`; this crate only
//! hands it a reader.

use flate2::read::MultiGzDecoder;
use gtex_core::{GtexError, MetadataTable, Result, SampleRow};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;
use tracing::debug;

const READ_BUFFER: usize = 64 * 1024;

/// Open `path` for line reading. `-` reads stdin; `.gz`/`.bgz` files are
/// decompressed on the fly, including multi-member streams.
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::with_capacity(READ_BUFFER, io::stdin())));
    }

    let file = File::open(path).map_err(|e| GtexError::open(path, e))?;
    if is_gzip_path(path) {
        debug!(path = %path.display(), "opening gzip stream");
        let decoder = MultiGzDecoder::new(file);
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER, decoder)))
    } else {
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER, file)))
    }
}

/// Open a read count matrix. Same rules as [`open_input`].
pub fn open_matrix<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    open_input(path)
}

fn is_gzip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("gz") || e.eq_ignore_ascii_case("bgz"))
        .unwrap_or(false)
}

/// Detect delimiter (tab or comma) from a header line. Tab wins when both
/// occur; a line with neither is treated as a one-column tab table.
pub fn detect_delimiter(first_line: &str) -> u8 {
    if first_line.contains('\t') {
        b'\t'
    } else if first_line.contains(',') {
        b','
    } else {
        b'\t'
    }
}

/// Load the sample-attributes table. The first line is the header; every
/// later non-empty line becomes a [`SampleRow`] carrying its 1-based line
/// number. Rows may be shorter or longer than the header; short rows only
/// fail when a missing column is actually read.
pub fn load_metadata<P: AsRef<Path>>(path: P) -> Result<MetadataTable> {
    let path = path.as_ref();
    let mut reader = open_input(path)?;
    let table = read_metadata(&mut reader)?;
    debug!(
        path = %path.display(),
        columns = table.header.len(),
        rows = table.len(),
        "loaded sample attributes"
    );
    Ok(table)
}

/// Parse a sample-attributes table from any reader.
pub fn read_metadata<R: BufRead>(mut reader: R) -> Result<MetadataTable> {
    let mut first_line = String::new();
    reader.read_line(&mut first_line)?;
    let delim = detect_delimiter(&first_line);

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(Cursor::new(first_line).chain(reader));

    let header: Vec<String> = rdr
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_error)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        rows.push(SampleRow {
            line,
            fields: record.iter().map(str::to_string).collect(),
        });
    }

    Ok(MetadataTable::new(header, rows))
}

fn csv_error(err: csv::Error) -> GtexError {
    let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
    match err.into_kind() {
        csv::ErrorKind::Io(e) => GtexError::Io(e),
        other => GtexError::parse(line, format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use gtex_core::Strategy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn gz_file(content: &str) -> NamedTempFile {
        let file = tempfile::Builder::new().suffix(".gz").tempfile().unwrap();
        let mut enc = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        enc.write_all(content.as_bytes()).unwrap();
        enc.finish().unwrap();
        file
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("SAMPID\tSMTS\n"), b'\t');
        assert_eq!(detect_delimiter("SAMPID,SMTS\n"), b',');
        assert_eq!(detect_delimiter("SAMPID\n"), b'\t');
    }

    #[test]
    fn test_load_metadata() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "SAMPID\tSMTS\tSMTSD").unwrap();
        writeln!(file, "S1\tBlood\tWhole Blood").unwrap();
        writeln!(file, "S2\tBrain\tBrain - Cortex").unwrap();
        writeln!(file, "S3\tBlood").unwrap();

        let table = load_metadata(file.path()).unwrap();
        assert_eq!(table.header, vec!["SAMPID", "SMTS", "SMTSD"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[1].fields[2], "Brain - Cortex");
        assert_eq!(table.rows[2].line, 4);
        assert_eq!(table.rows[2].fields.len(), 2);
        assert_eq!(table.column_position("SMTS", Strategy::Binary).unwrap(), 1);
    }

    #[test]
    fn quotes_are_literal() {
        let table = read_metadata(Cursor::new("SAMPID\tNOTE\nS1\t\"a\tb\n")).unwrap();
        assert_eq!(table.rows[0].fields, vec!["S1", "\"a", "b"]);
    }

    #[test]
    fn crlf_lines_are_trimmed() {
        let table = read_metadata(Cursor::new("SAMPID\tSMTS\r\nS1\tBlood\r\n")).unwrap();
        assert_eq!(table.header, vec!["SAMPID", "SMTS"]);
        assert_eq!(table.rows[0].fields, vec!["S1", "Blood"]);
    }

    #[test]
    fn empty_metadata_has_no_columns() {
        let table = read_metadata(Cursor::new("")).unwrap();
        assert!(table.header.is_empty());
        assert!(table.is_empty());
        assert!(matches!(
            table.column_position("SMTS", Strategy::Linear),
            Err(GtexError::MissingColumn { .. })
        ));
    }

    #[test]
    fn open_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.gct.gz");
        let err = open_matrix(&missing).err().unwrap();
        assert!(matches!(err, GtexError::Open { .. }));
        assert!(err.to_string().contains("nope.gct.gz"));
    }

    #[test]
    fn open_matrix_decompresses_gzip() {
        let file = gz_file("#1.2\n1 1\nName\tDescription\tS1\n");
        let mut reader = open_matrix(file.path()).unwrap();
        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        assert!(text.starts_with("#1.2\n"));
        assert!(text.ends_with("S1\n"));
    }

    #[test]
    fn open_matrix_reads_plain_text() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "#1.2\n").unwrap();
        let mut reader = open_matrix(file.path()).unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line, "#1.2\n");
    }

    #[test]
    fn metadata_may_be_gzipped() {
        let file = gz_file("SAMPID\tSMTS\nS1\tBlood\n");
        let table = load_metadata(file.path()).unwrap();
        assert_eq!(table.rows[0].fields, vec!["S1", "Blood"]);
    }
}
