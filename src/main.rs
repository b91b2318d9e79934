// Entry point and high-level CLI flow.
//
// - Option [1] reads the three source tables, builds the per-source
//   datasets, writes the intermediate JSON documents, and prints
//   diagnostics.
// - Option [2] loads the pre-built sapadores and area mappings, merges
//   everything into the consolidated document with the two derived
//   indices, and previews the most recent year.
// - After merging, the user can choose to go back to the selection menu
//   or exit.
mod datasets;
mod loader;
mod merge;
mod output;
mod types;
mod util;

use datasets::BuildReport;
use once_cell::sync::Lazy;
use std::error::Error;
use std::io::{self, Write};
use std::sync::Mutex;
use types::{ByYearDesc, CauseRecord, DimensionRecord, MergedPreviewRow, MergedRecord, YearDataset};

// Source tables.
const CAUSES_CSV: &str = "Incendios_causa_2010-2024.csv";
const DIMENSIONS_CSV: &str = "Incendios_dimensao_2010-2024.csv";
const PROPORTIONS_CSV: &str = "Incendios_proporcao_2010-2024.csv";

// Pre-built mappings.
const SAPADORES_JSON: &str = "fires_sappers.json";
const AREA_JSON: &str = "portugal_area.json";

// Outputs.
const CAUSES_OUT: &str = "fires_causes.json";
const DIMENSIONS_OUT: &str = "fires_dimensions.json";
const PROPORTIONS_OUT: &str = "incendios_percent.json";
const MERGED_OUT: &str = "fires_merged.json";

// Simple in-memory app state so the tables are decoded once per run but
// the merge step can be re-run from the menu.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<BuiltDatasets>,
}

#[derive(Clone)]
struct BuiltDatasets {
    causes: YearDataset<CauseRecord>,
    dimensions: YearDataset<DimensionRecord>,
    proportions: YearDataset<Option<f64>>,
}

struct BuildOutcome {
    data: BuiltDatasets,
    causes_report: BuildReport,
    dimensions_report: BuildReport,
    proportions_report: BuildReport,
}

/// Read a single line of input after printing the common "Enter choice:"
/// prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the selection menu after merging.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Decode all three source tables and write the intermediate documents.
///
/// Every dataset is built in memory before the first write, so a
/// structural error in any table leaves no partial output behind.
fn build_all() -> Result<BuildOutcome, Box<dyn Error>> {
    let cause_rows = loader::read_table(CAUSES_CSV)?;
    let dimension_rows = loader::read_table(DIMENSIONS_CSV)?;
    let proportion_rows = loader::read_table(PROPORTIONS_CSV)?;

    let (causes, causes_report) = datasets::build_causes(&cause_rows)?;
    let (dimensions, dimensions_report) = datasets::build_dimensions(&dimension_rows)?;
    let (proportions, proportions_report) = datasets::build_proportions(&proportion_rows)?;

    output::write_json(CAUSES_OUT, &ByYearDesc(&causes))?;
    output::write_json(DIMENSIONS_OUT, &ByYearDesc(&dimensions))?;
    output::write_json(PROPORTIONS_OUT, &ByYearDesc(&proportions))?;

    Ok(BuildOutcome {
        data: BuiltDatasets {
            causes,
            dimensions,
            proportions,
        },
        causes_report,
        dimensions_report,
        proportions_report,
    })
}

fn print_build_report(name: &str, report: &BuildReport, out_file: &str) {
    println!(
        "{}: {} rows scanned, {} region rows, {} year entries -> {}",
        name,
        util::format_int(report.rows_seen),
        util::format_int(report.rows_kept),
        util::format_int(report.entries),
        out_file
    );
}

/// Handle option [1]: decode the source tables and store the datasets.
fn handle_build() {
    match build_all() {
        Ok(outcome) => {
            println!("Processing source tables...");
            print_build_report("Causes", &outcome.causes_report, CAUSES_OUT);
            print_build_report("Dimensions", &outcome.dimensions_report, DIMENSIONS_OUT);
            print_build_report("Proportions", &outcome.proportions_report, PROPORTIONS_OUT);
            println!("");
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(outcome.data);
        }
        Err(e) => {
            eprintln!("Failed to build datasets: {}\n", e);
        }
    }
}

fn preview_row(region: &str, record: &MergedRecord) -> MergedPreviewRow {
    MergedPreviewRow {
        region: region.to_string(),
        total: match record.total.flatten() {
            Some(t) => util::format_int(t),
            None => "-".to_string(),
        },
        percentagem: match record.percentagem.flatten() {
            Some(p) => util::format_number(p, 2),
            None => "-".to_string(),
        },
        sapadores: match record.sapadores.flatten() {
            Some(s) => util::format_number(s, 0),
            None => "-".to_string(),
        },
        area: match record.area {
            Some(a) => util::format_number(a, 2),
            None => "-".to_string(),
        },
        eficacia: format!("{:.4}", record.eficacia_index),
        prevencao: format!("{:.4}", record.prevencao_index),
    }
}

/// Handle option [2]: merge everything and write the consolidated
/// document.
///
/// The two pre-built mappings are loaded here; if either is missing or
/// malformed the merge aborts before any output is written.
fn handle_merge() {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No datasets built. Please decode the source tables first (option 1).\n");
        return;
    };

    let sapadores = match loader::load_sapadores(SAPADORES_JSON) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load sapadores mapping: {}\n", e);
            return;
        }
    };
    let area = match loader::load_area(AREA_JSON) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Failed to load area mapping: {}\n", e);
            return;
        }
    };

    let merged = merge::merge_datasets(
        &data.causes,
        &data.dimensions,
        &data.proportions,
        &sapadores,
        &area,
    );
    if let Err(e) = output::write_json(MERGED_OUT, &ByYearDesc(&merged)) {
        eprintln!("Write error: {}", e);
        return;
    }

    let entries: usize = merged.values().map(|regions| regions.len()).sum();
    println!(
        "Merged {} years, {} (year, region) entries -> {}\n",
        util::format_int(merged.len()),
        util::format_int(entries),
        MERGED_OUT
    );

    if let Some((year, regions)) = merged.iter().next_back() {
        println!("Preview: {}", year);
        let rows: Vec<MergedPreviewRow> = regions
            .iter()
            .map(|(region, record)| preview_row(region, record))
            .collect();
        output::preview_table_rows(&rows, 8);
    }
}

fn main() {
    loop {
        println!("Select an option:");
        println!("[1] Decode the source tables");
        println!("[2] Merge datasets and compute indices\n");
        match read_choice().as_str() {
            "1" => {
                handle_build();
            }
            "2" => {
                println!("");
                handle_merge();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
