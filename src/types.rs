use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tabled::Tabled;

/// One data row of a source table: the raw label cell followed by the
/// flattened year-block cells.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub label: String,
    pub values: Vec<String>,
}

/// `{year: {region: T}}`. Years are kept as integers internally; the
/// `ByYearDesc` wrapper turns them into string keys at write time.
pub type YearDataset<T> = BTreeMap<i32, BTreeMap<String, T>>;

/// Serialization wrapper that emits a `YearDataset` with year keys as
/// strings in descending numeric order. Region keys inherit the ascending
/// `BTreeMap` order, so the written document is reproducible byte for byte.
pub struct ByYearDesc<'a, T>(pub &'a YearDataset<T>);

impl<T: Serialize> Serialize for ByYearDesc<'_, T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (year, regions) in self.0.iter().rev() {
            map.serialize_entry(&year.to_string(), regions)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CauseCount {
    #[serde(rename = "Causa")]
    pub causa: String,
    #[serde(rename = "Numero")]
    pub numero: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CauseRecord {
    #[serde(rename = "Total")]
    pub total: Option<i64>,
    #[serde(rename = "Causas")]
    pub causas: Vec<CauseCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DimensionCount {
    #[serde(rename = "Dimensões")]
    pub dimensao: String,
    #[serde(rename = "Numero")]
    pub numero: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DimensionRecord {
    #[serde(rename = "Total")]
    pub total: Option<i64>,
    #[serde(rename = "Dimensões")]
    pub dimensoes: Vec<DimensionCount>,
}

/// Consolidated per-(year, region) record.
///
/// The double `Option` fields distinguish "the source dataset had no entry
/// for this (year, region)" (outer `None`, field omitted from the output)
/// from "the entry exists but its value is null" (inner `None`). `Area` is
/// always written, null when the region is missing from the area mapping;
/// the two indices are always written and default to 0.
#[derive(Debug, Clone, Serialize)]
pub struct MergedRecord {
    #[serde(rename = "Area")]
    pub area: Option<f64>,
    #[serde(rename = "Percentagem", skip_serializing_if = "Option::is_none")]
    pub percentagem: Option<Option<f64>>,
    #[serde(rename = "Sapadores", skip_serializing_if = "Option::is_none")]
    pub sapadores: Option<Option<f64>>,
    #[serde(rename = "Total", skip_serializing_if = "Option::is_none")]
    pub total: Option<Option<i64>>,
    #[serde(rename = "Causas", skip_serializing_if = "Option::is_none")]
    pub causas: Option<Vec<CauseCount>>,
    #[serde(rename = "Dimensões", skip_serializing_if = "Option::is_none")]
    pub dimensoes: Option<Vec<DimensionCount>>,
    #[serde(rename = "Eficacia_Index")]
    pub eficacia_index: f64,
    #[serde(rename = "Prevenção_Index")]
    pub prevencao_index: f64,
}

/// Pre-built region-area document (`portugal_area.json`).
#[derive(Debug, Deserialize)]
pub struct AreaDocument {
    #[serde(rename = "Portugal")]
    pub portugal: AreaSubregions,
}

#[derive(Debug, Deserialize)]
pub struct AreaSubregions {
    #[serde(rename = "subregioes")]
    pub subregioes: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Tabled)]
pub struct MergedPreviewRow {
    #[tabled(rename = "Region")]
    pub region: String,
    #[tabled(rename = "Total")]
    pub total: String,
    #[tabled(rename = "Percentagem")]
    pub percentagem: String,
    #[tabled(rename = "Sapadores")]
    pub sapadores: String,
    #[tabled(rename = "Area")]
    pub area: String,
    #[tabled(rename = "Eficacia")]
    pub eficacia: String,
    #[tabled(rename = "Prevencao")]
    pub prevencao: String,
}
