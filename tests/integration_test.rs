//! Integration Tests for cenykatalog
//!
//! End-to-end runs of the pipeline against spreadsheets generated with
//! rust_xlsxwriter in temporary working directories.

use std::fs;
use std::path::Path;

use cenykatalog::{
    md5_hex, xml, CatalogMode, Element, PipelineBuilder, PublicationDate, RunOutcome, RunSummary,
};
use rust_xlsxwriter::*;

const INPUT: &str = "Kerim_Dane_ceny_mieszkan.xlsx";
const XML: &str = "kerim-ceny-mieszkan.xml";
const MD5: &str = "kerim-ceny-mieszkan.md5";

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// Price list with 3 apartments
    pub fn write_price_list(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        worksheet.write_string(0, 0, "Nr lokalu")?;
        worksheet.write_string(0, 1, "Powierzchnia")?;
        worksheet.write_string(0, 2, "Cena")?;
        worksheet.write_string(0, 3, "Data")?;

        let rows = [("A1", 54.3, 512000.0), ("A2", 61.0, 580500.0), ("B1", 38.75, 399999.0)];
        for (i, (unit, area, price)) in rows.iter().enumerate() {
            let row = i as u32 + 1;
            worksheet.write_string(row, 0, *unit)?;
            worksheet.write_number(row, 1, *area)?;
            worksheet.write_number(row, 2, *price)?;
            // 2025-06-01
            worksheet.write_number_with_format(row, 3, 45809.0, &date_format)?;
        }

        workbook.save(path)?;
        Ok(())
    }

    /// Viewing slots stored as elapsed time (`[h]:mm:ss`)
    pub fn write_durations(path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let duration_format = Format::new().set_num_format("[h]:mm:ss");

        worksheet.write_string(0, 0, "Nr lokalu")?;
        worksheet.write_string(0, 1, "Czas prezentacji")?;
        worksheet.write_string(1, 0, "A1")?;
        worksheet.write_number_with_format(1, 1, 1.5, &duration_format)?;
        worksheet.write_string(2, 0, "A2")?;
        worksheet.write_number_with_format(2, 1, 0.75, &duration_format)?;

        workbook.save(path)?;
        Ok(())
    }

    /// Place an (empty) CSV for an earlier publication date
    pub fn touch_csv(root: &Path, date: &str) {
        let dir = root.join("csv").join(&date[..4]);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("Kerim-ceny-mieszkan-{}.csv", date)), "").unwrap();
    }
}

fn date(s: &str) -> PublicationDate {
    s.parse().unwrap()
}

fn run(root: &Path, mode: CatalogMode, today: &str) -> RunSummary {
    let pipeline = PipelineBuilder::new()
        .with_root(root)
        .with_mode(mode)
        .with_date(date(today))
        .build()
        .unwrap();

    match pipeline.run().unwrap() {
        RunOutcome::Completed(summary) => summary,
        RunOutcome::InputMissing(path) => panic!("Input missing: {}", path.display()),
    }
}

fn setup() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fixtures::write_price_list(&dir.path().join(INPUT)).unwrap();
    dir
}

fn read_catalog(path: &Path) -> Element {
    xml::parse(&fs::read(path).unwrap()).unwrap()
}

/// Resources of the first dataset, with whitespace tails stripped for comparison
fn resources(root: &Element) -> Vec<Element> {
    root.child("dataset")
        .and_then(|d| d.child("resources"))
        .map(|r| r.children.clone())
        .unwrap_or_default()
        .into_iter()
        .map(|mut r| {
            r.tail = None;
            r
        })
        .collect()
}

// ============================================================================
// Daily run
// ============================================================================

#[test]
fn test_first_run_creates_all_outputs() {
    let dir = setup();
    let summary = run(dir.path(), CatalogMode::Rebuild, "2025-06-01");

    // CSV
    let csv_path = dir.path().join("csv/2025/Kerim-ceny-mieszkan-2025-06-01.csv");
    assert!(summary.csv.created);
    assert_eq!(summary.csv.path, csv_path);
    assert_eq!(
        fs::read_to_string(&csv_path).unwrap(),
        "Nr lokalu,Powierzchnia,Cena,Data\n\
         A1,54.3,512000,2025-06-01\n\
         A2,61,580500,2025-06-01\n\
         B1,38.75,399999,2025-06-01\n"
    );

    // XML
    let root = read_catalog(&dir.path().join(XML));
    assert_eq!(root.name, "ns2:datasets");
    assert_eq!(root.children_named("dataset").count(), 1);
    let resources = resources(&root);
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].child_text("dataDate"), Some("2025-06-01"));
    assert_eq!(resources[0].child_text("extIdent"), Some("kerim_dane_20250601"));
    assert_eq!(
        resources[0].child_text("url"),
        Some("https://oskar-bednarek.github.io/ceny-mieszkan/csv/2025/Kerim-ceny-mieszkan-2025-06-01.csv")
    );

    // MD5
    let bytes = fs::read(dir.path().join(XML)).unwrap();
    let md5 = fs::read_to_string(dir.path().join(MD5)).unwrap();
    assert_eq!(md5, md5_hex(&bytes));
    assert_eq!(summary.catalog.digest, md5);

    assert_eq!(summary.resource_dates, vec!["2025-06-01"]);
    assert!(summary.history.is_none());
    assert_eq!(summary.skipped_files, 0);
}

#[test]
fn test_xml_layout() {
    let dir = setup();
    run(dir.path(), CatalogMode::Rebuild, "2025-06-01");

    let content = fs::read_to_string(dir.path().join(XML)).unwrap();
    assert!(content.starts_with(
        "<?xml version='1.0' encoding='utf-8'?>\n\
         <ns2:datasets xmlns:ns2=\"urn:otwarte-dane:harvester:1.13\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\n  <dataset status=\"published\">\n    <extIdent>"
    ));
    assert!(content.ends_with("</ns2:datasets>\n"));
    assert!(content.contains("\n      <resource status=\"published\">\n        <extIdent>kerim_dane_20250601</extIdent>"));
    assert!(content.contains("<tag lang=\"pl\">Deweloper</tag>"));
    assert!(!content.contains("\n\n"));
}

#[test]
fn test_rerun_same_day_keeps_csv_and_xml() {
    let dir = setup();
    run(dir.path(), CatalogMode::Rebuild, "2025-06-01");
    let csv_path = dir.path().join("csv/2025/Kerim-ceny-mieszkan-2025-06-01.csv");
    let csv_before = fs::read(&csv_path).unwrap();
    let xml_before = fs::read(dir.path().join(XML)).unwrap();

    // The spreadsheet changes, but today's CSV is not rewritten
    fs::write(&csv_path, "edited by hand\n").unwrap();
    let summary = run(dir.path(), CatalogMode::Rebuild, "2025-06-01");

    assert!(!summary.csv.created);
    assert_eq!(fs::read_to_string(&csv_path).unwrap(), "edited by hand\n");
    assert_ne!(csv_before, fs::read(&csv_path).unwrap());
    assert_eq!(xml_before, fs::read(dir.path().join(XML)).unwrap());
}

#[test]
fn test_duration_cells_from_workbook() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::write_durations(&dir.path().join(INPUT)).unwrap();

    let summary = run(dir.path(), CatalogMode::Rebuild, "2025-06-01");
    assert_eq!(
        fs::read_to_string(&summary.csv.path).unwrap(),
        "Nr lokalu,Czas prezentacji\n\
         A1,1 days 12:00:00\n\
         A2,0 days 18:00:00\n"
    );
}

// ============================================================================
// Rebuild mode
// ============================================================================

#[test]
fn test_rebuild_accumulates_dates() {
    let dir = setup();
    fixtures::touch_csv(dir.path(), "2025-06-01");

    let first = run(dir.path(), CatalogMode::Rebuild, "2025-06-02");
    assert_eq!(first.resource_dates, vec!["2025-06-01", "2025-06-02"]);
    let before = resources(&read_catalog(&dir.path().join(XML)));

    let second = run(dir.path(), CatalogMode::Rebuild, "2025-06-03");
    assert_eq!(
        second.resource_dates,
        vec!["2025-06-01", "2025-06-02", "2025-06-03"]
    );
    let after = resources(&read_catalog(&dir.path().join(XML)));

    assert_eq!(after.len(), 3);
    assert_eq!(&after[..2], &before[..]);
    assert_ne!(first.catalog.digest, second.catalog.digest);
}

#[test]
fn test_year_rollover_writes_history() {
    let dir = setup();
    fixtures::touch_csv(dir.path(), "2024-12-30");
    fixtures::touch_csv(dir.path(), "2024-12-31");

    let summary = run(dir.path(), CatalogMode::Rebuild, "2025-01-01");

    // Main catalog: current year only
    assert_eq!(summary.resource_dates, vec!["2025-01-01"]);
    let root = read_catalog(&dir.path().join(XML));
    assert_eq!(
        root.child("dataset").unwrap().child_text("extIdent"),
        Some("kerim_ceny_mieszkan_2025_dataset")
    );

    // History: previous year only
    let history = summary.history.expect("history should be written");
    assert_eq!(
        history.xml_path,
        dir.path().join("history/kerim-ceny-mieszkan-2024.xml")
    );
    let archive = read_catalog(&history.xml_path);
    assert_eq!(
        archive.child("dataset").unwrap().child_text("extIdent"),
        Some("kerim_ceny_mieszkan_2024_dataset")
    );
    assert_eq!(
        cenykatalog::resource_dates(&archive),
        vec!["2024-12-30", "2024-12-31"]
    );
    assert_eq!(
        fs::read_to_string(&history.md5_path).unwrap(),
        md5_hex(&fs::read(&history.xml_path).unwrap())
    );
}

// ============================================================================
// Merge mode
// ============================================================================

#[test]
fn test_merge_is_idempotent_across_runs() {
    let dir = setup();

    let first = run(dir.path(), CatalogMode::Merge, "2025-06-01");
    assert_eq!(first.inserted, 1);
    assert_eq!(first.already_present, 0);
    let xml_before = fs::read(dir.path().join(XML)).unwrap();

    let second = run(dir.path(), CatalogMode::Merge, "2025-06-01");
    assert_eq!(second.inserted, 0);
    assert_eq!(second.already_present, 1);
    assert_eq!(xml_before, fs::read(dir.path().join(XML)).unwrap());
    assert_eq!(first.catalog.digest, second.catalog.digest);
}

#[test]
fn test_merge_appends_next_day() {
    let dir = setup();
    run(dir.path(), CatalogMode::Merge, "2025-06-01");

    let summary = run(dir.path(), CatalogMode::Merge, "2025-06-02");
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.already_present, 1);
    assert_eq!(summary.resource_dates, vec!["2025-06-01", "2025-06-02"]);
}

#[test]
fn test_merge_and_rebuild_agree_on_fresh_directory() {
    let merged = setup();
    let rebuilt = setup();
    for dir in [&merged, &rebuilt] {
        fixtures::touch_csv(dir.path(), "2025-05-31");
    }

    run(merged.path(), CatalogMode::Merge, "2025-06-01");
    run(rebuilt.path(), CatalogMode::Rebuild, "2025-06-01");

    assert_eq!(
        fs::read(merged.path().join(XML)).unwrap(),
        fs::read(rebuilt.path().join(XML)).unwrap()
    );
}

#[test]
fn test_merge_keeps_unrelated_content() {
    let dir = setup();
    run(dir.path(), CatalogMode::Merge, "2025-06-01");

    // A resource added by hand survives the next merge
    let mut root = read_catalog(&dir.path().join(XML));
    let manual = Element::new("resource")
        .with_attribute("status", "published")
        .with_child(Element::leaf("extIdent", "manual_resource"));
    root.child_mut("dataset")
        .and_then(|d| d.child_mut("resources"))
        .unwrap()
        .push(manual);
    fs::write(dir.path().join(XML), xml::serialize(&root).unwrap()).unwrap();

    run(dir.path(), CatalogMode::Merge, "2025-06-02");
    let idents: Vec<String> = resources(&read_catalog(&dir.path().join(XML)))
        .iter()
        .filter_map(|r| r.child_text("extIdent").map(str::to_string))
        .collect();
    assert_eq!(
        idents,
        vec!["kerim_dane_20250601", "manual_resource", "kerim_dane_20250602"]
    );
}

// ============================================================================
// Missing input
// ============================================================================

#[test]
fn test_missing_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = PipelineBuilder::new()
        .with_root(dir.path())
        .with_date(date("2025-06-01"))
        .build()
        .unwrap();

    match pipeline.run().unwrap() {
        RunOutcome::InputMissing(path) => assert_eq!(path, dir.path().join(INPUT)),
        RunOutcome::Completed(_) => panic!("Expected InputMissing"),
    }
    assert!(!dir.path().join("csv").exists());
    assert!(!dir.path().join(XML).exists());
    assert!(!dir.path().join(MD5).exists());
}
