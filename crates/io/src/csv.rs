// CSV/TSV import/export

use std::io::Read;
use std::path::Path;

use keycomp_table::{Table, Value};

use crate::error::{LoadError, WriteError};

/// Import a delimited text file. The first record supplies the column
/// names; the field delimiter is sniffed from the content.
pub fn import(path: &Path) -> Result<Table, LoadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter)
}

pub fn import_with_delimiter(path: &Path, delimiter: u8) -> Result<Table, LoadError> {
    let content = read_file_as_utf8(path)?;
    import_from_string(&content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (number of lines with same field count as line 1) * field_count
        // Higher field count breaks ties — more columns = more likely real delimiter
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let mut file = std::fs::File::open(path).map_err(|e| LoadError::Io(e.to_string()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| LoadError::Io(e.to_string()))?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn import_from_string(content: &str, delimiter: u8) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let headers = match records.next() {
        Some(record) => record.map_err(|e| LoadError::Malformed(e.to_string()))?,
        None => return Err(LoadError::Malformed("empty file".into())),
    };
    let names: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if h.trim().is_empty() {
                format!("column_{i}")
            } else {
                h.trim().to_string()
            }
        })
        .collect();
    let width = names.len();

    let mut table = Table::with_names(names);
    for record in records {
        let record = record.map_err(|e| LoadError::Malformed(e.to_string()))?;
        // Flexible records may be short or long; pad with nulls, drop overflow
        let mut row: Vec<Value> = Vec::with_capacity(width);
        for i in 0..width {
            row.push(record.get(i).map_or(Value::Null, Value::from_input));
        }
        table
            .push_row(row)
            .map_err(|e| LoadError::Malformed(e.to_string()))?;
    }

    Ok(table)
}

/// Write a table as comma-separated text: header row, then every cell in
/// its rendered form.
pub fn export(table: &Table, path: &Path) -> Result<(), WriteError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| WriteError::Io(e.to_string()))?;

    let names: Vec<&str> = table.column_names().collect();
    writer
        .write_record(&names)
        .map_err(|e| WriteError::Io(e.to_string()))?;

    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|column| column.values[row].render_text())
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| WriteError::Io(e.to_string()))?;
    }

    writer.flush().map_err(|e| WriteError::Io(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn sniff_semicolon_delimiter() {
        let content = "Name;Age;City\nAlice;30;Paris\nBob;25;London\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn sniff_comma_delimiter() {
        let content = "Name,Age,City\nAlice,30,Paris\nBob,25,London\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn sniff_tab_delimiter() {
        let content = "Name\tAge\tCity\nAlice\t30\tParis\nBob\t25\tLondon\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn sniff_pipe_delimiter() {
        let content = "Name|Age|City\nAlice|30|Paris\nBob|25|London\n";
        assert_eq!(sniff_delimiter(content), b'|');
    }

    #[test]
    fn sniff_semicolon_with_commas_in_values() {
        // Semicolon delimiter but commas appear inside quoted fields
        let content = "Name;Address;City\n\"Doe, Jane\";\"123 Main St, Apt 4\";Paris\nBob;\"456 Elm\";London\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn import_types_and_headers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "sim,carrier,count\n555-0001,acme,3\n,beta,\n").unwrap();

        let table = import(&path).unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["sim", "carrier", "count"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell("sim", 0).unwrap(), &Value::Text("555-0001".into()));
        assert_eq!(table.cell("count", 0).unwrap(), &Value::Number(3.0));
        assert!(table.cell("sim", 1).unwrap().is_null());
        assert!(table.cell("count", 1).unwrap().is_null());
    }

    #[test]
    fn import_pads_short_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "a,b,c\n1,2\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.row_count(), 1);
        assert!(table.cell("c", 0).unwrap().is_null());
    }

    #[test]
    fn import_decodes_windows_1252() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "José" with 0xE9 (é in Windows-1252, invalid UTF-8)
        fs::write(&path, b"name,id\nJos\xe9,1\n").unwrap();

        let table = import(&path).unwrap();
        assert_eq!(table.cell("name", 0).unwrap(), &Value::Text("José".into()));
    }

    #[test]
    fn export_then_import_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut table = Table::with_names(["normalized_key", "carrier_dataset2"]);
        table
            .push_row(vec![Value::Text("123".into()), Value::Text("acme".into())])
            .unwrap();
        table
            .push_row(vec![Value::Text("456".into()), Value::Text("".into())])
            .unwrap();

        export(&table, &path).unwrap();
        let back = import(&path).unwrap();

        assert_eq!(back.row_count(), 2);
        assert_eq!(back.cell("normalized_key", 0).unwrap().render_text(), "123");
        assert_eq!(back.cell("carrier_dataset2", 0).unwrap().render_text(), "acme");
    }

    #[test]
    fn explicit_delimiter_skips_sniffing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forced.csv");
        // One line, so sniffing could misread the commas inside the value
        fs::write(&path, "id;note\n1;a,b,c\n").unwrap();

        let table = import_with_delimiter(&path, b';').unwrap();
        assert_eq!(table.cell("note", 0).unwrap().render_text(), "a,b,c");
    }

    #[test]
    fn import_missing_file_is_io_error() {
        assert!(matches!(
            import(Path::new("/nonexistent/data.csv")),
            Err(LoadError::Io(_))
        ));
    }
}
