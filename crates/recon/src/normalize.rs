use keycomp_table::{Table, TableError, Value};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Reduce a single cell to its digit key.
///
/// The value's text form (whole floats render as integers, so `42.0`
/// contributes "42", not "420") is trimmed by `trim_start`/`trim_end`
/// characters, then filtered down to decimal digits in order. Null input,
/// digit-free input, and trim bounds past the end of the string all yield
/// the empty string; the function never fails.
pub fn normalize_value(value: &Value, trim_start: usize, trim_end: usize) -> String {
    let text = value.render_text();
    let trimmed = trim_chars(&text, trim_start, trim_end);
    trimmed.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Drop `trim_start` characters from the front and `trim_end` from the back,
/// clamping to empty when either bound reaches past the string.
fn trim_chars(s: &str, trim_start: usize, trim_end: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if trim_start >= chars.len() {
        return String::new();
    }
    let rest = &chars[trim_start..];
    if trim_end >= rest.len() {
        return String::new();
    }
    rest[..rest.len() - trim_end].iter().collect()
}

/// Apply [`normalize_value`] to every cell of `source`, returning a new
/// table with the result in `output` (replacing it when `output == source`).
pub fn normalize_column(
    table: &Table,
    source: &str,
    output: &str,
    trim_start: usize,
    trim_end: usize,
) -> Result<Table, TableError> {
    let column = table
        .column(source)
        .ok_or_else(|| TableError::ColumnNotFound(source.to_string()))?;

    let normalized: Vec<Value> = column
        .values
        .iter()
        .map(|value| Value::Text(normalize_value(value, trim_start, trim_end)))
        .collect();

    let mut result = table.clone();
    result.set_column(output, normalized)?;
    Ok(result)
}

/// Remove combining diacritical marks: canonical decomposition, then drop
/// the marks, keeping base letters ("José" → "Jose").
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}
