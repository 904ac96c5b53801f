use super::*;
use std::io::Cursor;

const SAMPLE_TSV: &str = "Protein names\tPEP\tMS/MS Count\tPotential contaminant\tIntensity A
Actin\t0.01\t5\t\t100
Actin\t0.02\t6\t\t
Tubulin\t0.5\t1\t+\t42.5";

fn sample() -> Table {
    Table::from_reader(Cursor::new(SAMPLE_TSV), b'\t').unwrap()
}

#[test]
fn test_type_inference() {
    let table = sample();
    assert_eq!(table.n_rows(), 3);
    assert_eq!(table.n_cols(), 5);

    assert!(table.column("Protein names").unwrap().as_numeric().is_none());
    assert!(table.column("Potential contaminant").unwrap().as_numeric().is_none());

    let msms = table.numeric("MS/MS Count").unwrap();
    assert!(msms.is_integer());
    assert_eq!(msms.values(), &[Some(5.0), Some(6.0), Some(1.0)]);

    // A missing cell makes the column float-typed
    let intensity = table.numeric("Intensity A").unwrap();
    assert!(!intensity.is_integer());
    assert_eq!(intensity.get(1), None);
    assert!(intensity.get_or_nan(1).is_nan());
}

#[test]
fn test_missing_and_not_numeric_columns() {
    let table = sample();
    assert!(matches!(
        table.numeric("Intensity B"),
        Err(TableError::MissingColumn(name)) if name == "Intensity B"
    ));
    assert!(matches!(
        table.numeric("Protein names"),
        Err(TableError::NotNumeric(_))
    ));
}

#[test]
fn test_duplicate_header_rejected() {
    let data = "a,a\n1,2\n";
    assert!(matches!(
        Table::from_reader(Cursor::new(data), b','),
        Err(TableError::DuplicateColumn(name)) if name == "a"
    ));
}

#[test]
fn test_ragged_rows_rejected() {
    let data = "a,b\n1,2\n3\n";
    assert!(matches!(
        Table::from_reader(Cursor::new(data), b','),
        Err(TableError::CsvError(_))
    ));
}

#[test]
fn test_filter_rows_preserves_order() {
    let table = sample();
    let filtered = table.filter_rows(&[true, false, true]).unwrap();
    assert_eq!(filtered.n_rows(), 2);
    assert_eq!(
        filtered.text("Protein names").unwrap(),
        vec![Some("Actin".to_string()), Some("Tubulin".to_string())]
    );
    assert!(table.filter_rows(&[true]).is_err());
}

#[test]
fn test_drop_columns_ignores_absent() {
    let table = sample();
    let dropped = table.drop_columns(["PEP", "Not there"]);
    assert_eq!(dropped.n_cols(), 4);
    assert!(!dropped.has_column("PEP"));
    assert_eq!(dropped.n_rows(), 3);
}

#[test]
fn test_with_column_replaces_in_place() {
    let table = sample();
    let replaced = table
        .with_column(Column::numeric("PEP", NumericColumn::from_f64(vec![1.0, 2.0, 3.0])))
        .unwrap();
    assert_eq!(replaced.column_names().nth(1), Some("PEP"));
    assert_eq!(replaced.numeric("PEP").unwrap().get(2), Some(3.0));

    let too_short = replaced.with_column(Column::numeric("X", NumericColumn::from_f64(vec![1.0])));
    match too_short {
        Err(TableError::LengthMismatch {
            name,
            expected,
            found,
        }) => {
            assert_eq!(name, "X");
            assert_eq!(expected, 3);
            assert_eq!(found, 1);
        }
        other => panic!("expected a length mismatch, got {:?}", other),
    }
}

#[test]
fn test_group_by_sums_numbers_and_keeps_first_text() {
    let data = "Protein names,Gene,Score,Count X
Zeta,g1,1.5,3
Alpha,g2,2.0,1
Zeta,g3,0.5,-1
";
    let table = Table::from_reader(Cursor::new(data), b',').unwrap();
    let grouped = table.group_by("Protein names", &MissingKeyPolicy::Drop).unwrap();

    assert_eq!(grouped.n_rows(), 2);
    assert_eq!(grouped.column_names().next(), Some("Protein names"));
    assert_eq!(
        grouped.text("Protein names").unwrap(),
        vec![Some("Alpha".to_string()), Some("Zeta".to_string())]
    );
    assert_eq!(
        grouped.text("Gene").unwrap(),
        vec![Some("g2".to_string()), Some("g1".to_string())]
    );
    assert_eq!(grouped.numeric("Score").unwrap().values(), &[Some(2.0), Some(2.0)]);
    let count = grouped.numeric("Count X").unwrap();
    assert!(count.is_integer());
    assert_eq!(count.values(), &[Some(1.0), Some(2.0)]);
}

#[test]
fn test_group_by_missing_key_policies() {
    let data = "Protein names,Score
P1,1
,2
,3
";
    let table = Table::from_reader(Cursor::new(data), b',').unwrap();

    let dropped = table.group_by("Protein names", &MissingKeyPolicy::Drop).unwrap();
    assert_eq!(dropped.n_rows(), 1);

    let kept = table
        .group_by("Protein names", &MissingKeyPolicy::Sentinel("Unknown".to_string()))
        .unwrap();
    assert_eq!(kept.n_rows(), 2);
    assert_eq!(kept.text("Protein names").unwrap()[1], Some("Unknown".to_string()));
    assert_eq!(kept.numeric("Score").unwrap().get(1), Some(5.0));
}

#[test]
fn test_write_csv_formatting() {
    let table = Table::new(vec![
        Column::text("Name", vec![Some("a".to_string()), None]),
        Column::numeric("Int", NumericColumn::from_i64(vec![3, -1])),
        Column::numeric("Float", NumericColumn::new(vec![Some(2.0), Some(0.25)], false)),
        Column::numeric("Gap", NumericColumn::new(vec![None, Some(f64::INFINITY)], false)),
    ])
    .unwrap();

    let mut out = Vec::new();
    table.write_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "Name,Int,Float,Gap\na,3,2.0,\n,-1,0.25,inf\n");
}

#[test]
fn test_write_csv_exponent_form() {
    let data = "PEP,Mass\n1.2E-50,3.5e20\n0.0001,-2e16\n0.00005,0\n";
    let table = Table::from_reader(Cursor::new(data), b',').unwrap();
    assert_eq!(table.numeric("PEP").unwrap().get(0), Some(1.2e-50));

    let mut out = Vec::new();
    table.write_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "PEP,Mass\n1.2e-50,3.5e+20\n0.0001,-2e+16\n5e-05,0.0\n");
}

#[test]
fn test_convert_delimited() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("peptides.txt");
    let output = dir.path().join("peptides.csv");
    std::fs::write(&input, SAMPLE_TSV).unwrap();

    let table = convert_delimited(&input, &output, b'\t', b',').unwrap();
    assert_eq!(table.n_rows(), 3);

    let reread = Table::from_path(&output, b',').unwrap();
    assert_eq!(reread, table);
}
