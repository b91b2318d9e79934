// Per-source dataset builders.
//
// Every source table repeats one fixed-width block of columns per year on
// each region row, most recent year first. The builders slice those blocks,
// decode them, and accumulate `{year: {region: record}}` maps.
use crate::types::{CauseCount, CauseRecord, DimensionCount, DimensionRecord, TableRow, YearDataset};
use crate::util::{coerce_float, coerce_int, is_missing, matches_region_label, normalize_region_label};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::error::Error;

/// Years covered by the source tables, most recent first. This list is the
/// authority on how many blocks each row carries; block counts are never
/// inferred from the data.
pub static YEARS: Lazy<Vec<i32>> = Lazy::new(|| (2010..=2024).rev().collect());

/// Incident causes, in source-table column order.
pub const CAUSE_CATEGORIES: [&str; 6] = [
    "Negligência",
    "Intencional",
    "Naturais",
    "Reacendimentos",
    "Indeterminadas",
    "Não investigados",
];

/// Burned-area size buckets, in source-table column order.
pub const DIMENSION_CATEGORIES: [&str; 8] = [
    "< 1 ha",
    "1 - < 10 ha",
    "10 - < 20 ha",
    "20 - < 50 ha",
    "50 - < 100 ha",
    "100 - < 500 ha",
    "500 - < 1 000 ha",
    ">= 1 000 ha",
];

/// Shape of one source table: how wide each year block is and whether rows
/// must carry the `NUTS:` label prefix to count as data. The proportions
/// table has no interleaved footnote rows, so it skips the label filter and
/// prunes rows through normalization alone.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub block_width: usize,
    pub requires_label_match: bool,
}

/// Causes: `[Total, cat_1..cat_6]` per year.
pub const CAUSES_SPEC: TableSpec = TableSpec {
    block_width: CAUSE_CATEGORIES.len() + 1,
    requires_label_match: true,
};

/// Dimensions: `[Total, bucket_1..bucket_8]` per year.
pub const DIMENSIONS_SPEC: TableSpec = TableSpec {
    block_width: DIMENSION_CATEGORIES.len() + 1,
    requires_label_match: true,
};

/// Proportions: a single scalar per year.
pub const PROPORTIONS_SPEC: TableSpec = TableSpec {
    block_width: 1,
    requires_label_match: false,
};

/// Counters for the console diagnostics printed after a build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub rows_seen: usize,
    pub rows_kept: usize,
    pub entries: usize,
}

/// Slice the cells belonging to one year out of a row's flattened value
/// list. `index` 0 is the most recent year.
fn year_block(values: &[String], index: usize, width: usize) -> Result<&[String], Box<dyn Error>> {
    let start = index * width;
    values.get(start..start + width).ok_or_else(|| {
        format!(
            "year block {} ({} cells wide) out of bounds for a row of {} cells",
            index,
            width,
            values.len()
        )
        .into()
    })
}

/// Shared driver: filter and normalize row labels, validate the row shape,
/// then decode one block per year.
///
/// A year whose block is entirely missing-value cells is omitted for that
/// region, which keeps "no data collected" distinct from "value is zero".
fn build_dataset<T>(
    rows: &[TableRow],
    years: &[i32],
    spec: TableSpec,
    mut decode: impl FnMut(&[String]) -> T,
) -> Result<(YearDataset<T>, BuildReport), Box<dyn Error>> {
    let mut dataset: YearDataset<T> = BTreeMap::new();
    let mut report = BuildReport::default();
    let expected = years.len() * spec.block_width;

    for row in rows {
        report.rows_seen += 1;
        if spec.requires_label_match && !matches_region_label(&row.label) {
            continue;
        }
        let Some(region) = normalize_region_label(&row.label) else {
            continue;
        };
        report.rows_kept += 1;

        // Trailing empty cells beyond the expected layout are a ragged
        // export artifact; any other mismatch would misalign years.
        if row.values.len() < expected
            || row.values[expected..].iter().any(|c| !c.trim().is_empty())
        {
            return Err(format!(
                "row \"{}\": expected {} value cells ({} years x {} per block), found {}",
                row.label,
                expected,
                years.len(),
                spec.block_width,
                row.values.len()
            )
            .into());
        }

        for (i, year) in years.iter().enumerate() {
            let block = year_block(&row.values, i, spec.block_width)?;
            if block.iter().all(|cell| is_missing(cell)) {
                continue;
            }
            dataset
                .entry(*year)
                .or_default()
                .insert(region.clone(), decode(block));
            report.entries += 1;
        }
    }
    Ok((dataset, report))
}

/// Build the causes dataset. Block layout: total first, then the six cause
/// counts in declared order. Total and per-cause coercion fail
/// independently; each degrades to null on its own.
pub fn build_causes(
    rows: &[TableRow],
) -> Result<(YearDataset<CauseRecord>, BuildReport), Box<dyn Error>> {
    build_dataset(rows, &YEARS, CAUSES_SPEC, |block| CauseRecord {
        total: coerce_int(&block[0]),
        causas: CAUSE_CATEGORIES
            .iter()
            .zip(&block[1..])
            .map(|(causa, cell)| CauseCount {
                causa: (*causa).to_string(),
                numero: coerce_int(cell),
            })
            .collect(),
    })
}

/// Build the dimensions dataset. Same block layout as causes, with the
/// eight size buckets.
pub fn build_dimensions(
    rows: &[TableRow],
) -> Result<(YearDataset<DimensionRecord>, BuildReport), Box<dyn Error>> {
    build_dataset(rows, &YEARS, DIMENSIONS_SPEC, |block| DimensionRecord {
        total: coerce_int(&block[0]),
        dimensoes: DIMENSION_CATEGORIES
            .iter()
            .zip(&block[1..])
            .map(|(dimensao, cell)| DimensionCount {
                dimensao: (*dimensao).to_string(),
                numero: coerce_int(cell),
            })
            .collect(),
    })
}

/// Build the proportions dataset: one optional percentage per year. A cell
/// that is present but unparseable still emits an entry with a null value.
pub fn build_proportions(
    rows: &[TableRow],
) -> Result<(YearDataset<Option<f64>>, BuildReport), Box<dyn Error>> {
    build_dataset(rows, &YEARS, PROPORTIONS_SPEC, |block| coerce_float(&block[0]))
}
