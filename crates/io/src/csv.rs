// CSV reading and writing shared by the loaders and exporters

use std::io::Read;
use std::path::Path;

use crate::error::IoError;

/// Rows of a delimited file. Blank rows and `#` comment lines are dropped;
/// fields are trimmed.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, IoError> {
    let content = read_file_as_utf8(path)?;
    parse_rows(&content, sniff_delimiter(&content)).map_err(|e| IoError::parse(path, e))
}

pub fn parse_rows(content: &str, delimiter: u8) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(String::from).collect());
    }
    Ok(rows)
}

/// Index of the first header cell equal (ignoring case) to one of `names`.
pub fn column(header: &[String], names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

/// Field `idx` of a row, empty when the row is short.
pub fn field(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or_default()
}

/// Field delimiter of a hand-edited table: tab, semicolon, comma or pipe.
///
/// Up to ten non-comment lines are split with each candidate. A candidate
/// that leaves the header line whole is out; the rest are ranked by how many
/// sampled lines share the header's field count, times that count. Ties keep
/// the earlier candidate, and comma is the default.
pub fn sniff_delimiter(content: &str) -> u8 {
    const CANDIDATES: [u8; 4] = [b'\t', b';', b',', b'|'];
    let sample: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.starts_with('#'))
        .take(10)
        .collect();

    let mut best = (0u64, b',');
    for delim in CANDIDATES {
        let widths: Vec<usize> = sample.iter().map(|line| field_count(line, delim)).collect();
        let Some(&header_width) = widths.first() else { break };
        if header_width < 2 {
            continue;
        }
        let agreeing = widths.iter().filter(|&&w| w == header_width).count() as u64;
        let score = agreeing * header_width as u64;
        if score > best.0 {
            best = (score, delim);
        }
    }
    best.1
}

/// Fields on one line split by `delim`, honouring quotes.
fn field_count(line: &str, delim: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map_or(1, |r| r.len())
}

/// Read file and convert to UTF-8 if needed (hand-edited tables are often Windows-1252).
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let mut file = std::fs::File::open(path).map_err(|e| IoError::read(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| IoError::read(path, e))?;

    match String::from_utf8(bytes) {
        Ok(s) if s.starts_with('\u{feff}') => Ok(s['\u{feff}'.len_utf8()..].to_string()),
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            log::debug!("{} is not UTF-8, decoded as Windows-1252", path.display());
            Ok(decoded.into_owned())
        }
    }
}

/// Write a header and rows as comma-separated values.
pub fn write_rows<I, R>(path: &Path, header: &[&str], rows: I) -> Result<(), IoError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| IoError::write(path, e))?;
    writer.write_record(header).map_err(|e| IoError::write(path, e))?;
    for row in rows {
        writer.write_record(row).map_err(|e| IoError::write(path, e))?;
    }
    writer.flush().map_err(|e| IoError::write(path, e))?;
    Ok(())
}
