use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use csv_cells::address::{column_letters, Rectangle};
use csv_cells::parser::{parse_reader, ParserConfig};
use csv_cells::reading::{read_cells, ReadOptions, Selection};
use csv_cells::types::{Cell, Table};

fn tmp_path(stem: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("csv-cells-rt-{stem}-{nanos}.csv"))
}

fn fixture_rows() -> Vec<Vec<String>> {
    vec![
        vec!["name".into(), "score".into(), "note".into(), "city".into()],
        vec!["Ada".into(), "98.5".into(), "said \"hi\"".into(), "London".into()],
        vec!["Grace".into(), "1e3".into(), "a, b".into(), "New York".into()],
        vec!["Linus".into(), "-0.25".into(), "".into(), "Helsinki".into()],
    ]
}

fn write_fixture(path: &Path, delimiter: u8) {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(path)
        .unwrap();
    for row in fixture_rows() {
        wtr.write_record(&row).unwrap();
    }
    wtr.flush().unwrap();
}

fn expected_cell(raw: &str) -> Cell {
    match raw.parse::<f64>() {
        Ok(v) if !raw.is_empty() => Cell::Number(v),
        _ => Cell::from(raw),
    }
}

#[test]
fn csv_writer_output_reads_back() {
    for delimiter in [b',', b';', b'\t'] {
        let path = tmp_path("writer");
        write_fixture(&path, delimiter);

        let opts = ReadOptions::default().with_separator((delimiter as char).to_string());
        let table = read_cells(&path, &opts).unwrap();
        std::fs::remove_file(&path).unwrap();

        let expected = Table::from_rows(
            fixture_rows()
                .iter()
                .map(|row| row.iter().map(|raw| expected_cell(raw)).collect())
                .collect(),
        );
        assert_eq!(table, expected, "delimiter {:?}", delimiter as char);
    }
}

#[test]
fn range_equals_slice_of_full_table() {
    let path = tmp_path("slice");
    let mut wtr = csv::Writer::from_path(&path).unwrap();
    for r in 1..=9 {
        let record: Vec<String> = (1..=7).map(|c| (r * 10 + c).to_string()).collect();
        wtr.write_record(&record).unwrap();
    }
    wtr.flush().unwrap();
    drop(wtr);

    let full = read_cells(&path, &ReadOptions::default()).unwrap();
    let (top, left, bottom, right) = (3usize, 2usize, 7usize, 5usize);
    let address = format!(
        "{}{top}:{}{bottom}",
        column_letters(left),
        column_letters(right)
    );
    let opts = ReadOptions::default().with_selection(Selection::Range(address));
    let ranged = read_cells(&path, &opts).unwrap();
    std::fs::remove_file(&path).unwrap();

    let expected = Table::from_rows(
        full.rows()
            .skip(top - 1)
            .take(bottom - top + 1)
            .map(|row| row[left - 1..right].to_vec())
            .collect(),
    );
    assert_eq!(ranged, expected);
    assert_eq!(ranged.get(0, 0), Some(&Cell::Number(32.0)));
}

#[test]
fn cells_serialize_untagged() {
    let config = ParserConfig::default();
    let parsed = parse_reader(
        "x,1.5,\"2\"\n".as_bytes(),
        &config,
        &Rectangle::default(),
    )
    .unwrap();

    let row = serde_json::to_value(parsed.table.row(0).unwrap()).unwrap();
    assert_eq!(row, serde_json::json!(["x", 1.5, "2"]));

    let table_json = serde_json::to_string(&parsed.table).unwrap();
    let back: Table = serde_json::from_str(&table_json).unwrap();
    assert_eq!(back, parsed.table);
}
