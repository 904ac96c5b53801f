//! End-to-end tests: a MaxQuant-style TSV on disk through every stage to the
//! result directory, plus property tests of the stage invariants.

use std::fs;
use std::path::Path;

use mqprep::columns::{self, ColumnPolicy};
use mqprep::condition::{Conditions, RatioSelection};
use mqprep::output::{exclusive_file_name, ResultWriter, AGGREGATED_FILE, DIFFERENTIAL_FILE};
use mqprep::pipeline::{self, PipelineParams, Thresholds};
use mqprep::table::{convert_delimited, Column, MissingKeyPolicy, NumericColumn, Table};
use tempfile::TempDir;

const PEPTIDES_TSV: &str = "\
Sequence\tProtein names\tPEP\tMS/MS Count\tPotential contaminant\tIntensity A\tExperiment A\tIntensity B\tExperiment B\tScore
AAAK\tP1\t0.01\t5\t\t200\t1\t100\t1\t80.5
CCCK\tP1\t0.02\t3\t\t100\t2\t50\t1\t75.1
DDDK\tP2\t0.01\t4\t\t500\t1\t0\t0\t60.0
EEEK\tP3\t0.01\t4\t+\t100\t1\t100\t1\t90.2
FFFK\tP4\t0.5\t4\t\t100\t1\t100\t1\t10.0
GGGK\tP5\t0.01\t1\t\t100\t1\t100\t1\t55.0
HHHK\tP6\t0.01\t3\t\t0\t0\t700\t2\t66.6
IIIK\tP7\t0.01\t3\t\t0\t0\t0\t0\t70.0
KKKK\t\t0.01\t3\t\t10\t1\t10\t1\t71.3
";

fn write_input(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("peptides.txt");
    fs::write(&path, PEPTIDES_TSV).unwrap();
    path
}

fn unpaired_params() -> PipelineParams {
    let conditions = Conditions::unpaired(["A", "B"]).unwrap();
    PipelineParams::new(conditions, Thresholds::new(0.05, 2.0).unwrap())
        .ratio("1/2".parse::<RatioSelection>().unwrap())
}

fn protein_names(table: &Table) -> Vec<String> {
    table
        .text(columns::PROTEIN_NAMES)
        .unwrap()
        .into_iter()
        .map(|name| name.unwrap_or_default())
        .collect()
}

#[test]
fn test_end_to_end_from_tsv() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(temp_dir.path());
    let csv = temp_dir.path().join("experimental_data").join("peptides.csv");
    fs::create_dir_all(csv.parent().unwrap()).unwrap();

    let converted = convert_delimited(&input, &csv, b'\t', b',').unwrap();
    assert_eq!(converted.n_rows(), 9);

    let raw = Table::from_path(&csv, b',').unwrap();
    assert_eq!(raw, converted);

    let params = unpaired_params();
    let mut output = pipeline::run(raw, &params).unwrap();

    assert_eq!(protein_names(&output.aggregated), vec!["P1", "P2", "P6"]);
    assert!(!output.aggregated.has_column("Sequence"));
    assert!(!output.aggregated.has_column("Intensity A"));
    assert!(!output.aggregated.has_column("Experiment B"));
    assert!(output.aggregated.has_column("MS/MS Count"));

    let count_a = output.aggregated.numeric("Count A").unwrap();
    assert_eq!(count_a.values(), &[Some(3.0), Some(1.0), Some(0.0)]);
    let intensity_b = output.aggregated.numeric("Intensity Experiment B").unwrap();
    assert_eq!(intensity_b.values(), &[Some(150.0), Some(0.0), Some(700.0)]);

    let differential = output.analyses.differential.as_ref().unwrap();
    assert_eq!(protein_names(differential), vec!["P1"]);
    assert_eq!(differential.numeric("Log2FC A/B").unwrap().get(0), Some(1.0));

    let exclusive: Vec<(String, Vec<String>)> = output
        .analyses
        .exclusive
        .iter()
        .map(|(name, table)| (name.clone(), protein_names(table)))
        .collect();
    assert_eq!(
        exclusive,
        vec![
            ("A".to_string(), vec!["P2".to_string()]),
            ("B".to_string(), vec!["P6".to_string()]),
        ]
    );

    let results = temp_dir.path().join("results");
    let writer = ResultWriter::new(&results).unwrap();
    writer.write_aggregated(&output.aggregated, &mut output.report).unwrap();
    writer.write_analyses(&output.analyses, &mut output.report).unwrap();
    writer.write_summary(&mut output.report).unwrap();

    let aggregated_csv = fs::read_to_string(results.join(AGGREGATED_FILE)).unwrap();
    let mut lines = aggregated_csv.lines();
    assert_eq!(
        lines.next(),
        Some("Protein names,MS/MS Count,Count A,Intensity Experiment A,Count B,Intensity Experiment B")
    );
    assert_eq!(lines.next(), Some("P1,8,3,300,2,150"));

    let differential_csv = fs::read_to_string(results.join(DIFFERENTIAL_FILE)).unwrap();
    assert!(differential_csv.lines().next().unwrap().ends_with(",Log2FC A/B"));
    assert!(differential_csv.contains(",1.0\n"));

    for condition in ["A", "B"] {
        assert!(results.join(exclusive_file_name(condition)).exists());
    }

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(results.join("run_summary.json")).unwrap()).unwrap();
    assert_eq!(summary["conditions"], serde_json::json!(["A", "B"]));
    assert_eq!(summary["ratio"], "A/B");
    assert_eq!(summary["files"].as_array().unwrap().len(), 5);
}

#[test]
fn test_paired_run_subtracts_controls() {
    let tsv = "\
Protein names\tPEP\tMS/MS Count\tPotential contaminant\tIntensity Drug\tExperiment Drug\tIntensity DMSO\tExperiment DMSO
P1\t0.01\t3\t\t500\t4\t200\t1
P1\t0.01\t3\t\t100\t1\t300\t2
P2\t0.01\t3\t\t50\t1\t50\t1
";
    let raw = Table::from_reader(tsv.as_bytes(), b'\t').unwrap();
    let conditions = Conditions::paired([("Drug", "DMSO")]).unwrap();
    let params = PipelineParams::new(conditions, Thresholds::new(0.05, 2.0).unwrap());

    let output = pipeline::run(raw, &params).unwrap();

    // P2 has zero difference in both count and intensity and is filtered out
    assert_eq!(protein_names(&output.aggregated), vec!["P1"]);
    assert_eq!(
        output.aggregated.numeric("Count Drug").unwrap().get(0),
        Some(2.0)
    );
    assert_eq!(
        output.aggregated.numeric("Intensity Experiment Drug").unwrap().get(0),
        Some(100.0)
    );
    assert!(!output.aggregated.has_column("Intensity DMSO"));
    assert!(output.analyses.differential.is_none());
    assert_eq!(output.analyses.exclusive.len(), 1);
    assert_eq!(output.report.skipped.len(), 1);
}

#[test]
fn test_unnamed_proteins_sentinel() {
    let raw = Table::from_reader(PEPTIDES_TSV.as_bytes(), b'\t').unwrap();
    let params = unpaired_params()
        .missing_protein_names(MissingKeyPolicy::Sentinel("Unknown".to_string()))
        .column_policy(ColumnPolicy::new(["MS/MS Count"]));

    let output = pipeline::run(raw, &params).unwrap();
    assert_eq!(protein_names(&output.aggregated), vec!["P1", "P2", "P6", "Unknown"]);
    assert!(!output.aggregated.has_column("MS/MS Count"));
}

#[test]
fn test_missing_required_column() {
    let tsv = "Protein names\tMS/MS Count\tPotential contaminant\tIntensity A\tExperiment A\nP1\t3\t\t10\t1\n";
    let raw = Table::from_reader(tsv.as_bytes(), b'\t').unwrap();
    let params = PipelineParams::new(
        Conditions::unpaired(["A"]).unwrap(),
        Thresholds::new(0.05, 2.0).unwrap(),
    );

    let err = pipeline::run(raw, &params).unwrap_err();
    assert!(err.to_string().contains("PEP"));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    /// One synthetic peptide: protein, PEP, MS/MS count, contaminant flag,
    /// then count and intensity for conditions A and B
    type Peptide = (Option<u8>, f64, i64, bool, i64, f64, i64, f64);

    fn peptide() -> impl Strategy<Value = Peptide> {
        (
            prop::option::weighted(0.9, 0u8..6),
            0.0f64..0.1,
            0i64..6,
            prop::bool::weighted(0.1),
            -2i64..4,
            -50.0f64..500.0,
            -2i64..4,
            -50.0f64..500.0,
        )
    }

    fn build_table(peptides: &[Peptide]) -> Table {
        let n = peptides.len();
        let mut sequence = Vec::with_capacity(n);
        let mut proteins = Vec::with_capacity(n);
        let mut pep = Vec::with_capacity(n);
        let mut msms = Vec::with_capacity(n);
        let mut contaminant = Vec::with_capacity(n);
        let (mut count_a, mut int_a, mut count_b, mut int_b) =
            (Vec::new(), Vec::new(), Vec::new(), Vec::new());

        for (i, p) in peptides.iter().enumerate() {
            sequence.push(Some(format!("{}", i)));
            proteins.push(p.0.map(|k| format!("P{}", k)));
            pep.push(p.1);
            msms.push(p.2);
            contaminant.push(p.3.then(|| "+".to_string()));
            count_a.push(p.4);
            int_a.push(p.5);
            count_b.push(p.6);
            int_b.push(p.7);
        }

        Table::new(vec![
            Column::text("Sequence", sequence),
            Column::text(columns::PROTEIN_NAMES, proteins),
            Column::numeric(columns::PEP, NumericColumn::from_f64(pep)),
            Column::numeric(columns::MSMS_COUNT, NumericColumn::from_i64(msms)),
            Column::text(columns::POTENTIAL_CONTAMINANT, contaminant),
            Column::numeric("Intensity A", NumericColumn::from_f64(int_a)),
            Column::numeric("Experiment A", NumericColumn::from_i64(count_a)),
            Column::numeric("Intensity B", NumericColumn::from_f64(int_b)),
            Column::numeric("Experiment B", NumericColumn::from_i64(count_b)),
        ])
        .unwrap()
    }

    fn conditions() -> Conditions {
        Conditions::unpaired(["A", "B"]).unwrap()
    }

    proptest! {
        /// Filtering keeps a subsequence of the input in order, and every
        /// kept row passes the thresholds
        #[test]
        fn test_filter_subset_in_order(
            peptides in prop::collection::vec(peptide(), 0..60),
            pep_max in 0.0f64..0.1,
            msms_min in 0.0f64..6.0,
        ) {
            let thresholds = Thresholds::new(pep_max, msms_min).unwrap();
            let normalized = pipeline::normalize(build_table(&peptides), &conditions()).unwrap();
            let filtered = pipeline::filter_rows(&normalized, &conditions(), &thresholds).unwrap();

            let order: Vec<usize> = filtered
                .text("Sequence")
                .unwrap()
                .into_iter()
                .map(|s| s.unwrap().parse().unwrap())
                .collect();
            prop_assert!(order.windows(2).all(|w| w[0] < w[1]));

            for &i in &order {
                let p = &peptides[i];
                prop_assert!(p.1 <= pep_max);
                prop_assert!(p.2 as f64 >= msms_min);
                prop_assert!(!p.3);
            }
        }

        /// Aggregation emits unique sorted protein names and conserves the
        /// per-condition count totals of named peptides
        #[test]
        fn test_aggregation_conserves_sums(peptides in prop::collection::vec(peptide(), 0..60)) {
            let normalized = pipeline::normalize(build_table(&peptides), &conditions()).unwrap();
            let aggregated = pipeline::aggregate(&normalized, &MissingKeyPolicy::Drop).unwrap();

            let names = protein_names(&aggregated);
            prop_assert!(names.windows(2).all(|w| w[0] < w[1]));

            let expected: i64 = peptides.iter().filter(|p| p.0.is_some()).map(|p| p.4).sum();
            let total = aggregated.numeric("Count A").unwrap().sum();
            prop_assert_eq!(total, expected as f64);
        }

        /// No protein is exclusive to two conditions, and every differential
        /// fold change is finite
        #[test]
        fn test_reports_consistent(peptides in prop::collection::vec(peptide(), 0..60)) {
            let params = PipelineParams::new(conditions(), Thresholds::new(0.1, 0.0).unwrap())
                .ratio(RatioSelection::new(0, 1));
            let output = pipeline::run(build_table(&peptides), &params).unwrap();

            let a = protein_names(&output.analyses.exclusive[0].1);
            let b = protein_names(&output.analyses.exclusive[1].1);
            prop_assert!(a.iter().all(|name| !b.contains(name)));

            let differential = output.analyses.differential.unwrap();
            let log2fc = differential.numeric("Log2FC A/B").unwrap();
            prop_assert!(log2fc.values().iter().all(|v| v.is_some_and(f64::is_finite)));
            for name in protein_names(&differential) {
                prop_assert!(!a.contains(&name) && !b.contains(&name));
            }
        }

        /// Pruning an already pruned table changes nothing
        #[test]
        fn test_prune_idempotent(peptides in prop::collection::vec(peptide(), 0..30)) {
            let policy = ColumnPolicy::default();
            let normalized = pipeline::normalize(build_table(&peptides), &conditions()).unwrap();
            let aggregated = pipeline::aggregate(&normalized, &MissingKeyPolicy::Drop).unwrap();

            let once = pipeline::prune_columns(&aggregated, &conditions(), &policy);
            let twice = pipeline::prune_columns(&once, &conditions(), &policy);
            prop_assert_eq!(once, twice);
        }
    }
}
