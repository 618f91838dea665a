use std::{fs, path::Path};

use lfc_combiner::{
    config::{get_input_files, Config},
    process::{combine, process_files, process_results},
};
use rstest::{fixture, rstest};
use tempfile::TempDir;

const HEADER: &str =
    "\"\",\"baseMean\",\"log2FoldChange\",\"lfcSE\",\"stat\",\"pvalue\",\"padj\"\n";

fn write_results(dir: &Path, name: &str, rows: &[(&str, &str)]) {
    let mut s = String::from(HEADER);
    for (id, lfc) in rows {
        s.push_str(&format!("\"{}\",120.5,{},0.2,1.1,0.01,0.05\n", id, lfc))
    }
    fs::write(dir.join(name), s).unwrap()
}

#[fixture]
fn result_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let d = dir.path();
    write_results(
        d,
        "DESeq2_results_12A.csv",
        &[("SP_0001extra", "1.5"), ("SP_0002", "-0.5"), ("SP_0003", "NA")],
    );
    write_results(
        d,
        "DESeq2_results_24B.csv",
        &[("SP_0002", "2"), ("SP_1004", "0.25")],
    );
    // No condition in name
    write_results(d, "DESeq2_results_ctrl.csv", &[("SP_0001extra", "9")]);
    // Wrong number of columns
    fs::write(
        d.join("DESeq2_results_36C.csv"),
        "ID,baseMean,log2FoldChange\nSP_0001,1,1\n",
    )
    .unwrap();
    // Same condition as an earlier file
    write_results(d, "DESeq2_results_rep_12A.csv", &[("SP_0001extra", "7")]);
    // Not a result file
    write_results(d, "other_12A.csv", &[("SP_0001extra", "3")]);
    dir
}

#[rstest]
fn finds_result_files(result_dir: TempDir) {
    let files = get_input_files(result_dir.path(), "DESeq2_results").unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "DESeq2_results_12A.csv",
            "DESeq2_results_24B.csv",
            "DESeq2_results_36C.csv",
            "DESeq2_results_ctrl.csv",
            "DESeq2_results_rep_12A.csv"
        ]
    );
}

#[rstest]
fn failures_are_isolated(result_dir: TempDir) {
    let cfg = Config::new(get_input_files(result_dir.path(), "DESeq2_results").unwrap());
    let tables = process_files(&cfg);
    let conditions: Vec<_> = tables.iter().map(|t| t.columns()[0].as_str()).collect();
    assert_eq!(conditions, vec!["12A", "24B"]);
}

#[rstest]
fn missing_values_are_kept(result_dir: TempDir) {
    let cfg = Config::new(get_input_files(result_dir.path(), "DESeq2_results").unwrap());
    let wide = combine(process_files(&cfg), 5).unwrap().unwrap();
    let t = wide.table();
    assert_eq!(t.keys(), &["SP_0001extra", "SP_0002", "SP_0003", "SP_1004"]);
    assert_eq!(t.get("SP_0001extra", "12A"), Some(&1.5));
    assert_eq!(t.get("SP_0001extra", "24B"), None);
    assert_eq!(t.get("SP_0003", "12A"), None);
    assert_eq!(t.get("SP_0002", "24B"), Some(&2.0));
    assert_eq!(wide.locus(), &["SP_00", "SP_00", "SP_00", "SP_10"]);
}

#[rstest]
fn writes_combined_table(result_dir: TempDir) {
    let out = result_dir.path().join("combined_LFC_data.csv");
    let mut cfg = Config::new(get_input_files(result_dir.path(), "DESeq2_results").unwrap());
    cfg.set_output_file(&out);
    process_results(&cfg).unwrap();
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "ID,12A,24B,locus\n\
         SP_0001extra,1.5,,SP_00\n\
         SP_0002,-0.5,2,SP_00\n\
         SP_0003,,,SP_00\n\
         SP_1004,,0.25,SP_10\n"
    );
}

#[test]
fn nothing_to_combine() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("combined_LFC_data.csv");
    let mut cfg = Config::new(get_input_files(dir.path(), "DESeq2_results").unwrap());
    cfg.set_output_file(&out);
    process_results(&cfg).unwrap();
    assert!(!out.exists());
}

#[test]
fn empty_result_not_written() {
    let dir = TempDir::new().unwrap();
    write_results(dir.path(), "DESeq2_results_12A.csv", &[]);
    let out = dir.path().join("combined_LFC_data.csv");
    let mut cfg = Config::new(get_input_files(dir.path(), "DESeq2_results").unwrap());
    cfg.set_output_file(&out);
    process_results(&cfg).unwrap();
    assert!(!out.exists());
}
