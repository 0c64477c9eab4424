use std::collections::{HashMap, HashSet};

use keycomp_table::{Table, TableError, Value};

use crate::error::CompareError;
use crate::model::{MatchResult, SideSpec, Statistics, NORMALIZED_KEY};
use crate::normalize::{normalize_column, strip_accents};

/// Keep the first row per distinct `key_column` value, in original row
/// order. Later duplicates are dropped, not aggregated.
pub fn deduplicate(table: &Table, key_column: &str) -> Result<Table, TableError> {
    let column = table
        .column(key_column)
        .ok_or_else(|| TableError::ColumnNotFound(key_column.to_string()))?;

    let mut seen = HashSet::new();
    let mut keep = Vec::new();
    for (row, value) in column.values.iter().enumerate() {
        if seen.insert(value.render_text()) {
            keep.push(row);
        }
    }
    Ok(table.select_rows(&keep))
}

/// Compare dataset 2 against dataset 1 on their normalized keys.
///
/// Both tables are normalized independently, projected to
/// `normalized_key` plus each side's extra columns (renamed with a
/// `_dataset1`/`_dataset2` suffix), then joined. Matches come from the
/// full projections, so duplicate keys multiply; the returned tables are
/// the first-wins unique subsets with duplicates counted in `Statistics`.
/// Output cells are accent-stripped and rendered as text.
pub fn compare(
    table1: &Table,
    spec1: &SideSpec,
    table2: &Table,
    spec2: &SideSpec,
) -> Result<(MatchResult, Statistics), CompareError> {
    // All-or-nothing: surface any missing column before any work
    require_columns(table1, spec1, 1)?;
    require_columns(table2, spec2, 2)?;

    let proj1 = project_side(table1, spec1, 1)?;
    let proj2 = project_side(table2, spec2, 2)?;

    let extras1: Vec<String> = suffixed_extras(spec1, "_dataset1");
    let extras2: Vec<String> = suffixed_extras(spec2, "_dataset2");

    // Output column order: key, dataset-2 extras, dataset-1 extras
    let mut output_names: Vec<String> = vec![NORMALIZED_KEY.to_string()];
    output_names.extend(extras2.iter().cloned());
    output_names.extend(extras1.iter().cloned());

    // Dataset-1 keys, each mapping to its rows in first-to-last order
    let mut rows1: HashMap<String, Vec<usize>> = HashMap::new();
    for row in 0..proj1.row_count() {
        let key = rendered_key(&proj1, row);
        rows1.entry(key).or_default().push(row);
    }

    // Inner equi-join of the full projections, dataset 2 as the left side;
    // duplicate keys on either side multiply into the match rows
    let mut matches = Table::with_names(output_names.clone());
    let mut non_matches = Table::with_names(output_names);
    for row2 in 0..proj2.row_count() {
        let key = rendered_key(&proj2, row2);
        match rows1.get(&key) {
            Some(matching) => {
                for &row1 in matching {
                    let mut row = Vec::with_capacity(1 + extras2.len() + extras1.len());
                    row.push(Value::Text(key.clone()));
                    extend_from(&mut row, &proj2, &extras2, row2);
                    extend_from(&mut row, &proj1, &extras1, row1);
                    push_output_row(&mut matches, row)?;
                }
            }
            None => {
                let mut row = Vec::with_capacity(1 + extras2.len() + extras1.len());
                row.push(Value::Text(key));
                extend_from(&mut row, &proj2, &extras2, row2);
                row.extend(std::iter::repeat(Value::Null).take(extras1.len()));
                push_output_row(&mut non_matches, row)?;
            }
        }
    }

    let unique_matches = dedup_on_key(&matches)?;
    let unique_non_matches = dedup_on_key(&non_matches)?;

    let total_unique = deduplicate(table2, &spec2.key_column)
        .map_err(|e| missing_column(e, 2))?
        .row_count();

    let statistics = Statistics {
        total_records: table2.row_count(),
        total_unique,
        unique_matches: unique_matches.row_count(),
        unique_non_matches: unique_non_matches.row_count(),
        duplicate_matches: matches.row_count() - unique_matches.row_count(),
        duplicate_non_matches: non_matches.row_count() - unique_non_matches.row_count(),
    };

    let result = MatchResult {
        matches: render_as_text(unique_matches),
        non_matches: render_as_text(unique_non_matches),
    };
    Ok((result, statistics))
}

fn require_columns(table: &Table, spec: &SideSpec, dataset: u8) -> Result<(), CompareError> {
    let mut wanted = vec![spec.key_column.as_str()];
    wanted.extend(spec.extra_columns.iter().map(String::as_str));
    for column in wanted {
        if !table.has_column(column) {
            return Err(CompareError::MissingColumn {
                dataset,
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Normalize one side and project it to the key plus its renamed extras.
fn project_side(table: &Table, spec: &SideSpec, dataset: u8) -> Result<Table, CompareError> {
    let (trim_start, trim_end) = spec.trim.effective();
    let normalized = normalize_column(table, &spec.key_column, NORMALIZED_KEY, trim_start, trim_end)
        .map_err(|e| missing_column(e, dataset))?;

    let mut names: Vec<&str> = vec![NORMALIZED_KEY];
    names.extend(spec.extra_columns.iter().map(String::as_str));
    let mut projected = normalized
        .project(&names)
        .map_err(|e| missing_column(e, dataset))?;

    let suffix = if dataset == 1 { "_dataset1" } else { "_dataset2" };
    for extra in &spec.extra_columns {
        projected
            .rename_column(extra, &format!("{extra}{suffix}"))
            .map_err(|e| missing_column(e, dataset))?;
    }
    Ok(projected)
}

fn suffixed_extras(spec: &SideSpec, suffix: &str) -> Vec<String> {
    spec.extra_columns
        .iter()
        .map(|extra| format!("{extra}{suffix}"))
        .collect()
}

fn rendered_key(projection: &Table, row: usize) -> String {
    projection
        .cell(NORMALIZED_KEY, row)
        .map(Value::render_text)
        .unwrap_or_default()
}

fn extend_from(row: &mut Vec<Value>, projection: &Table, columns: &[String], source_row: usize) {
    for column in columns {
        row.push(
            projection
                .cell(column, source_row)
                .cloned()
                .unwrap_or(Value::Null),
        );
    }
}

fn push_output_row(table: &mut Table, row: Vec<Value>) -> Result<(), CompareError> {
    table
        .push_row(row)
        .map_err(|e| CompareError::ConfigValidation(e.to_string()))
}

fn dedup_on_key(table: &Table) -> Result<Table, CompareError> {
    deduplicate(table, NORMALIZED_KEY).map_err(|e| missing_column(e, 2))
}

fn missing_column(error: TableError, dataset: u8) -> CompareError {
    match error {
        TableError::ColumnNotFound(column) => CompareError::MissingColumn { dataset, column },
        other => CompareError::ConfigValidation(other.to_string()),
    }
}

/// Final rendering pass: every cell becomes accent-stripped text, so
/// numeric keys export verbatim and never reformat.
fn render_as_text(table: Table) -> Table {
    let mut result = Table::with_names(table.column_names().map(str::to_string));
    for row in 0..table.row_count() {
        let rendered: Vec<Value> = table
            .columns()
            .iter()
            .map(|column| Value::Text(strip_accents(&column.values[row].render_text())))
            .collect();
        // Arity always matches: the names came from the same table
        let _ = result.push_row(rendered);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrimSpec;

    fn table(names: &[&str], rows: &[&[Value]]) -> Table {
        let mut table = Table::with_names(names.iter().map(|n| n.to_string()));
        for row in rows {
            table.push_row(row.to_vec()).unwrap();
        }
        table
    }

    fn text(s: &str) -> Value {
        Value::Text(s.into())
    }

    fn spec(key: &str, extras: &[&str]) -> SideSpec {
        SideSpec {
            key_column: key.into(),
            extra_columns: extras.iter().map(|e| e.to_string()).collect(),
            trim: TrimSpec::default(),
        }
    }

    #[test]
    fn deduplicate_keeps_first_occurrence() {
        let input = table(
            &["k", "v"],
            &[
                &[Value::Number(1.0), text("a")],
                &[Value::Number(2.0), text("b")],
                &[Value::Number(1.0), text("c")],
            ],
        );
        let deduped = deduplicate(&input, "k").unwrap();
        assert_eq!(deduped.row_count(), 2);
        assert_eq!(deduped.cell("v", 0).unwrap().render_text(), "a");
        assert_eq!(deduped.cell("v", 1).unwrap().render_text(), "b");
    }

    #[test]
    fn deduplicate_missing_column() {
        let input = table(&["k"], &[&[text("1")]]);
        assert!(matches!(
            deduplicate(&input, "absent"),
            Err(TableError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn compare_basic_counts() {
        let t1 = table(&["id"], &[&[text("1")], &[text("2")]]);
        let t2 = table(&["code"], &[&[text("1")], &[text("2")], &[text("3")]]);
        let (result, stats) = compare(&t1, &spec("id", &[]), &t2, &spec("code", &[])).unwrap();

        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.total_unique, 3);
        assert_eq!(stats.unique_matches, 2);
        assert_eq!(stats.unique_non_matches, 1);
        assert_eq!(stats.duplicate_matches, 0);
        assert_eq!(stats.duplicate_non_matches, 0);

        assert_eq!(result.non_matches.cell(NORMALIZED_KEY, 0).unwrap().render_text(), "3");
    }

    #[test]
    fn extras_are_suffixed_and_ordered() {
        let t1 = table(
            &["id", "name"],
            &[&[text("7"), text("ana")]],
        );
        let t2 = table(
            &["code", "carrier"],
            &[&[text("7"), text("acme")], &[text("8"), text("zeta")]],
        );
        let (result, _) = compare(
            &t1,
            &spec("id", &["name"]),
            &t2,
            &spec("code", &["carrier"]),
        )
        .unwrap();

        let names: Vec<&str> = result.matches.column_names().collect();
        assert_eq!(names, vec![NORMALIZED_KEY, "carrier_dataset2", "name_dataset1"]);
        assert_eq!(result.matches.cell("name_dataset1", 0).unwrap().render_text(), "ana");

        // Non-match rows carry empty dataset-1 extras
        assert_eq!(result.non_matches.row_count(), 1);
        assert_eq!(result.non_matches.cell("carrier_dataset2", 0).unwrap().render_text(), "zeta");
        assert_eq!(result.non_matches.cell("name_dataset1", 0).unwrap().render_text(), "");
    }

    #[test]
    fn duplicate_keys_multiply_matches() {
        // key "5" twice in dataset 1 and twice in dataset 2 → 4 match rows,
        // 1 unique, 3 duplicates
        let t1 = table(&["id"], &[&[text("5")], &[text("5")]]);
        let t2 = table(&["id"], &[&[text("5")], &[text("5")]]);
        let (result, stats) = compare(&t1, &spec("id", &[]), &t2, &spec("id", &[])).unwrap();

        assert_eq!(stats.unique_matches, 1);
        assert_eq!(stats.duplicate_matches, 3);
        assert_eq!(result.matches.row_count(), 1);
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.total_unique, 1);
    }

    #[test]
    fn duplicate_unmatched_keys_count_as_duplicate_non_matches() {
        let t1 = table(&["id"], &[&[text("1")]]);
        let t2 = table(&["id"], &[&[text("9")], &[text("9")], &[text("9")]]);
        let (result, stats) = compare(&t1, &spec("id", &[]), &t2, &spec("id", &[])).unwrap();

        assert_eq!(stats.unique_matches, 0);
        assert_eq!(stats.unique_non_matches, 1);
        assert_eq!(stats.duplicate_non_matches, 2);
        assert_eq!(result.non_matches.row_count(), 1);
    }

    #[test]
    fn trim_applies_only_when_enabled() {
        let mut spec1 = spec("id", &[]);
        spec1.trim = TrimSpec {
            enabled: false,
            trim_start: 99,
            trim_end: 99,
        };
        let t1 = table(&["id"], &[&[text("31")]]);
        let t2 = table(&["id"], &[&[text("31")]]);
        let (_, stats) = compare(&t1, &spec1, &t2, &spec("id", &[])).unwrap();
        assert_eq!(stats.unique_matches, 1);
    }

    #[test]
    fn missing_key_column_aborts() {
        let t1 = table(&["id"], &[&[text("1")]]);
        let t2 = table(&["id"], &[&[text("1")]]);
        let err = compare(&t1, &spec("absent", &[]), &t2, &spec("id", &[])).unwrap_err();
        assert!(matches!(
            err,
            CompareError::MissingColumn { dataset: 1, ref column } if column == "absent"
        ));
    }

    #[test]
    fn missing_extra_column_aborts() {
        let t1 = table(&["id"], &[&[text("1")]]);
        let t2 = table(&["id"], &[&[text("1")]]);
        let err = compare(&t1, &spec("id", &[]), &t2, &spec("id", &["ghost"])).unwrap_err();
        assert!(matches!(
            err,
            CompareError::MissingColumn { dataset: 2, ref column } if column == "ghost"
        ));
    }

    #[test]
    fn output_cells_are_text_and_accent_free() {
        let t1 = table(&["id", "who"], &[&[text("3"), text("José")]]);
        let t2 = table(&["id", "qty"], &[&[text("3"), Value::Number(12.0)]]);
        let (result, _) = compare(
            &t1,
            &spec("id", &["who"]),
            &t2,
            &spec("id", &["qty"]),
        )
        .unwrap();

        assert_eq!(result.matches.cell("who_dataset1", 0).unwrap(), &text("Jose"));
        assert_eq!(result.matches.cell("qty_dataset2", 0).unwrap(), &text("12"));
    }
}
