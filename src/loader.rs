// File ingestion for the pipeline inputs.
//
// All file reading lives here; the builders and the merger only ever see
// already-loaded rows and mappings. A file that cannot be read or parsed
// aborts the step before anything is written.
use crate::types::{AreaDocument, TableRow, YearDataset};
use csv::ReaderBuilder;
use std::collections::BTreeMap;
use std::error::Error;

/// Header furniture rows at the top of every source table.
const HEADER_ROWS: usize = 5;

/// Read one semicolon-delimited source table into label + value rows.
///
/// The first five records are the title/header block and carry no data.
/// Rows are returned verbatim; shape validation against the expected block
/// layout happens in the dataset builders, which know the layout.
pub fn read_table(path: &str) -> Result<Vec<TableRow>, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| format!("{}: {}", path, e))?;

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| format!("{}: {}", path, e))?;
        if idx < HEADER_ROWS {
            continue;
        }
        let mut cells = record.iter().map(|c| c.to_string());
        let label = cells.next().unwrap_or_default();
        rows.push(TableRow {
            label,
            values: cells.collect(),
        });
    }
    Ok(rows)
}

/// Load the pre-built sapadores mapping (`{year: {region: count|null}}`).
///
/// Year keys are strings in the document; they are parsed to integers here
/// so the merger can order years numerically. A non-numeric key means the
/// document is malformed.
pub fn load_sapadores(path: &str) -> Result<YearDataset<Option<f64>>, Box<dyn Error>> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    let raw: BTreeMap<String, BTreeMap<String, Option<f64>>> =
        serde_json::from_str(&text).map_err(|e| format!("{}: {}", path, e))?;

    let mut dataset = BTreeMap::new();
    for (year, regions) in raw {
        let year: i32 = year
            .parse()
            .map_err(|_| format!("{}: year key \"{}\" is not numeric", path, year))?;
        dataset.insert(year, regions);
    }
    Ok(dataset)
}

/// Load the static region-area mapping, keyed by region name alone.
pub fn load_area(path: &str) -> Result<BTreeMap<String, f64>, Box<dyn Error>> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    let doc: AreaDocument =
        serde_json::from_str(&text).map_err(|e| format!("{}: {}", path, e))?;
    Ok(doc.portugal.subregioes)
}
