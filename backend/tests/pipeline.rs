//! End-to-end runs of the pipeline against files on disk.

use sharktank::{
    load_cleaned, load_cooperation, run, Cell, Investor, PipelineError, PipelineOptions,
    CLEANED_FILE, COOPERATION_FILE, SUMMARY_FILE,
};
use std::fs;
use tempfile::tempdir;

const HEADER: &str = "Season Number,Startup Name,Episode Number,Pitch Number,Industry,\
Pitchers Gender,Pitchers State,Original Ask Amount,Got Deal,Total Deal Amount,\
Barbara Corcoran Investment Amount,Barbara Corcoran Investment Equity,\
Mark Cuban Investment Amount,Mark Cuban Investment Equity,\
Lori Greiner Investment Amount,Lori Greiner Investment Equity,\
Robert Herjavec Investment Amount,Robert Herjavec Investment Equity,\
Daymond John Investment Amount,Daymond John Investment Equity,\
Kevin O Leary Investment Amount,Kevin O Leary Investment Equity,\
Guest Investment Amount,Guest Investment Equity,Guest Name,Loan";

fn raw_export() -> String {
    [
        HEADER,
        "1,Alpha,1,1,Food,Male,CA,100000,1,100000,50000,10,50000,10,,,,,,,,,,,,",
        "1,Beta,1,2,Tech,,NY,200000,0,,,,,,,,,,,,,,,,,",
        "2,Gamma,3,1,Home,Female,,300000,1,300000,,,100000,5,100000,5,,,,,,,100000,5,Guest X,",
        "2,Delta,3,2,Food,Female,TX,50000,1,50000,,,,,,,,,,,25000,10,,,,yes",
    ]
    .join("\n")
}

#[test]
fn full_run_produces_three_artifacts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sharktank.csv");
    fs::write(&input, raw_export()).unwrap();

    let report = run(&PipelineOptions::new(&input, dir.path())).unwrap();

    for name in [CLEANED_FILE, COOPERATION_FILE, SUMMARY_FILE] {
        assert!(dir.path().join(name).exists(), "{} missing", name);
    }

    let cleaned = &report.output.cleaned;
    assert_eq!(cleaned.row_count(), 4);
    for dropped in ["Episode Number", "Pitch Number", "Loan", "Season Number"] {
        assert!(!cleaned.has_column(dropped), "{} still present", dropped);
    }
    assert_eq!(cleaned.cell(1, "Pitcher Geschlecht"), Some(&Cell::Text("Unbekannt".into())));
    assert_eq!(cleaned.cell(2, "Pitcher Bundesstaat"), Some(&Cell::Text("Unbekannt".into())));

    let summary = &report.output.summary;
    assert_eq!(summary.len(), 7);
    assert_eq!(summary.get(Investor::MarkCuban).total_investment, 150000.0);
    assert_eq!(summary.get(Investor::MarkCuban).total_equity, 15.0);
    assert_eq!(summary.get(Investor::Guest).total_investment, 100000.0);
    assert_eq!(summary.get(Investor::DaymondJohn).total_equity, 0.0);

    let matrix = &report.output.cooperation;
    assert_eq!(matrix.count(Investor::BarbaraCorcoran, Investor::MarkCuban), 1);
    assert_eq!(matrix.count(Investor::LoriGreiner, Investor::MarkCuban), 1);
    assert_eq!(matrix.count(Investor::KevinOLeary, Investor::MarkCuban), 0);
    assert_eq!(matrix.len(), 2);
}

#[test]
fn artifacts_round_trip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sharktank.csv");
    fs::write(&input, raw_export()).unwrap();
    let report = run(&PipelineOptions::new(&input, dir.path())).unwrap();

    let reloaded = load_cleaned(&report.artifacts.cleaned).unwrap();
    let original = &report.output.cleaned;
    assert_eq!(reloaded.row_count(), original.row_count());
    assert_eq!(reloaded.headers(), original.headers());

    for investor in Investor::ALL {
        let column = investor.amount_column();
        assert_eq!(
            reloaded.numeric_column(&column),
            original.numeric_column(&column),
            "{} differs after reload",
            column
        );
    }

    let matrix = load_cooperation(&report.artifacts.cooperation).unwrap();
    assert_eq!(&matrix, &report.output.cooperation);
}

#[test]
fn row_emptied_by_cleaning_survives_reload() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sharktank.csv");
    // Second row only has a dropped column and an unparseable amount.
    fs::write(
        &input,
        "Startup Name,Mark Cuban Investment Amount,Loan\nAlpha,100,\n,abc,yes\n",
    )
    .unwrap();
    let report = run(&PipelineOptions::new(&input, dir.path())).unwrap();

    let reloaded = load_cleaned(&report.artifacts.cleaned).unwrap();
    assert_eq!(reloaded.row_count(), report.output.cleaned.row_count());
    assert_eq!(reloaded.row_count(), 2);
}

#[test]
fn occupied_destination_fails_without_partial_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sharktank.csv");
    fs::write(&input, raw_export()).unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(out.join(COOPERATION_FILE).join("keep")).unwrap();

    let err = run(&PipelineOptions::new(&input, &out)).unwrap_err();

    assert!(matches!(err, PipelineError::ArtifactWrite { .. }));
    assert!(!out.join(CLEANED_FILE).exists());
    assert!(!out.join(SUMMARY_FILE).exists());
}

#[test]
fn missing_source_is_reported_and_nothing_is_written() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");

    let err = run(&PipelineOptions::new(dir.path().join("nope.csv"), &out)).unwrap_err();

    assert!(matches!(err, PipelineError::Csv(_)));
    assert!(err.is_missing_source());
    assert!(err.to_string().contains("nope.csv"));
    assert!(!out.exists());
}

#[test]
fn semicolon_latin1_export() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("export.csv");
    // "Café" in ISO-8859-1
    let mut bytes = b"Startup Name;Industry;Mark Cuban Investment Amount\nCaf".to_vec();
    bytes.extend_from_slice(&[0xE9]);
    bytes.extend_from_slice(b";Food;1000\n");
    fs::write(&input, bytes).unwrap();

    let report = run(&PipelineOptions::new(&input, dir.path())).unwrap();
    assert_eq!(report.output.csv_info.delimiter, ';');
    assert_eq!(report.output.summary.get(Investor::MarkCuban).total_investment, 1000.0);
}
