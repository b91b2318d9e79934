// Dataset consolidation and the two derived coverage ratios.
//
// The merged key space is the union of the four year-keyed inputs; the
// static area mapping contributes values but no keys. Every field of a
// merged record is populated independently from its own source, so absence
// in one dataset never suppresses data from another.
use crate::types::{CauseRecord, DimensionRecord, MergedRecord, YearDataset};
use std::collections::{BTreeMap, BTreeSet};

pub fn merge_datasets(
    causes: &YearDataset<CauseRecord>,
    dimensions: &YearDataset<DimensionRecord>,
    proportions: &YearDataset<Option<f64>>,
    sapadores: &YearDataset<Option<f64>>,
    area: &BTreeMap<String, f64>,
) -> YearDataset<MergedRecord> {
    let mut years: BTreeSet<i32> = BTreeSet::new();
    years.extend(causes.keys());
    years.extend(dimensions.keys());
    years.extend(proportions.keys());
    years.extend(sapadores.keys());

    let mut merged: YearDataset<MergedRecord> = BTreeMap::new();
    for &year in &years {
        let mut regions: BTreeSet<&String> = BTreeSet::new();
        if let Some(m) = causes.get(&year) {
            regions.extend(m.keys());
        }
        if let Some(m) = dimensions.get(&year) {
            regions.extend(m.keys());
        }
        if let Some(m) = proportions.get(&year) {
            regions.extend(m.keys());
        }
        if let Some(m) = sapadores.get(&year) {
            regions.extend(m.keys());
        }

        let mut out: BTreeMap<String, MergedRecord> = BTreeMap::new();
        for region in regions {
            let cause = causes.get(&year).and_then(|m| m.get(region));
            let dimension = dimensions.get(&year).and_then(|m| m.get(region));
            let proportion = proportions.get(&year).and_then(|m| m.get(region));
            let sapador = sapadores.get(&year).and_then(|m| m.get(region));
            let region_area = area.get(region).copied();

            let sapador_value = sapador.copied().flatten();
            let cause_total = cause.and_then(|c| c.total);

            out.insert(
                region.clone(),
                MergedRecord {
                    area: region_area,
                    percentagem: proportion.copied(),
                    sapadores: sapador.copied(),
                    total: cause.map(|c| c.total),
                    causas: cause.map(|c| c.causas.clone()),
                    dimensoes: dimension.map(|d| d.dimensoes.clone()),
                    eficacia_index: eficacia_index(sapador_value, cause_total),
                    prevencao_index: prevencao_index(sapador_value, region_area),
                },
            );
        }
        merged.insert(year, out);
    }
    merged
}

/// Sapadores per recorded fire. Exactly 0 when either input is missing or
/// the fire total is not strictly positive; "not computable" and "ratio is
/// zero" deliberately share the same value.
pub fn eficacia_index(sapadores: Option<f64>, total: Option<i64>) -> f64 {
    match (sapadores, total) {
        (Some(s), Some(t)) if t > 0 => s / t as f64,
        _ => 0.0,
    }
}

/// Sapadores per unit of region area. Exactly 0 unless the team count is
/// strictly positive and the region has a strictly positive area on record.
pub fn prevencao_index(sapadores: Option<f64>, area: Option<f64>) -> f64 {
    match (sapadores, area) {
        (Some(s), Some(a)) if s > 0.0 && a > 0.0 => s / a,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasets::{build_causes, CAUSES_SPEC, YEARS};
    use crate::types::{ByYearDesc, TableRow};

    fn dataset_of<T>(year: i32, region: &str, value: T) -> YearDataset<T> {
        let mut map: YearDataset<T> = BTreeMap::new();
        map.entry(year)
            .or_insert_with(BTreeMap::new)
            .insert(region.to_string(), value);
        map
    }

    #[test]
    fn eficacia_defaults_to_zero_without_a_usable_total() {
        assert_eq!(eficacia_index(Some(120.0), Some(400)), 120.0 / 400.0);
        assert_eq!(eficacia_index(Some(120.0), Some(0)), 0.0);
        assert_eq!(eficacia_index(Some(120.0), Some(-3)), 0.0);
        assert_eq!(eficacia_index(Some(120.0), None), 0.0);
        assert_eq!(eficacia_index(None, Some(400)), 0.0);
        assert_eq!(eficacia_index(Some(0.0), Some(400)), 0.0);
    }

    #[test]
    fn prevencao_defaults_to_zero_without_positive_inputs() {
        assert_eq!(prevencao_index(Some(50.0), Some(5000.0)), 50.0 / 5000.0);
        assert_eq!(prevencao_index(Some(0.0), Some(5000.0)), 0.0);
        assert_eq!(prevencao_index(Some(50.0), Some(0.0)), 0.0);
        assert_eq!(prevencao_index(Some(50.0), Some(-1.0)), 0.0);
        assert_eq!(prevencao_index(Some(50.0), None), 0.0);
        assert_eq!(prevencao_index(None, Some(5000.0)), 0.0);
    }

    #[test]
    fn fields_populate_independently_per_source() {
        let causes = dataset_of(
            2020,
            "Alentejo",
            CauseRecord {
                total: Some(42),
                causas: vec![],
            },
        );
        let merged = merge_datasets(
            &causes,
            &BTreeMap::new(),
            &BTreeMap::new(),
            &BTreeMap::new(),
            &BTreeMap::new(),
        );

        let record = &merged[&2020]["Alentejo"];
        assert_eq!(record.total, Some(Some(42)));
        assert!(record.causas.is_some());
        assert!(record.sapadores.is_none());
        assert!(record.percentagem.is_none());
        assert!(record.dimensoes.is_none());
        assert_eq!(record.area, None);
        assert_eq!(record.eficacia_index, 0.0);
        assert_eq!(record.prevencao_index, 0.0);

        let obj = serde_json::to_value(record).unwrap();
        let obj = obj.as_object().unwrap();
        assert!(obj.contains_key("Total"));
        assert!(obj.contains_key("Causas"));
        assert!(!obj.contains_key("Sapadores"));
        assert!(!obj.contains_key("Percentagem"));
        assert!(!obj.contains_key("Dimensões"));
        assert!(obj["Area"].is_null());
    }

    #[test]
    fn region_set_is_the_union_across_sources() {
        let causes = dataset_of(
            2024,
            "Norte",
            CauseRecord {
                total: Some(10),
                causas: vec![],
            },
        );
        let proportions = dataset_of(2024, "Algarve", Some(3.2));
        let sapadores = dataset_of(2023, "Centro", Some(40.0));

        let merged = merge_datasets(
            &causes,
            &BTreeMap::new(),
            &proportions,
            &sapadores,
            &BTreeMap::new(),
        );

        assert_eq!(merged.len(), 2);
        let regions_2024: Vec<&String> = merged[&2024].keys().collect();
        assert_eq!(regions_2024, ["Algarve", "Norte"]);
        assert!(merged[&2023].contains_key("Centro"));
        // sapadores present with a null count still claims its field
        assert_eq!(merged[&2023]["Centro"].sapadores, Some(Some(40.0)));
    }

    #[test]
    fn indices_use_sapadores_with_total_and_area() {
        let causes = dataset_of(
            2024,
            "Norte",
            CauseRecord {
                total: Some(400),
                causas: vec![],
            },
        );
        let sapadores = dataset_of(2024, "Norte", Some(120.0));
        let mut area = BTreeMap::new();
        area.insert("Norte".to_string(), 21278.0);

        let merged = merge_datasets(
            &causes,
            &BTreeMap::new(),
            &BTreeMap::new(),
            &sapadores,
            &area,
        );
        let record = &merged[&2024]["Norte"];
        assert_eq!(record.eficacia_index, 120.0 / 400.0);
        assert_eq!(record.prevencao_index, 120.0 / 21278.0);
        assert_eq!(record.area, Some(21278.0));
    }

    #[test]
    fn decoded_causes_round_trip_into_the_merged_document() {
        let mut values: Vec<String> = ["100", "10", "80", "5", "3", "1", "1"]
            .iter()
            .map(|v| v.to_string())
            .collect();
        values.resize(YEARS.len() * CAUSES_SPEC.block_width, "x x".to_string());
        let input = TableRow {
            label: "PT15: Algarve".to_string(),
            values,
        };
        let (causes, _) = build_causes(&[input]).unwrap();

        let merged = merge_datasets(
            &causes,
            &BTreeMap::new(),
            &BTreeMap::new(),
            &BTreeMap::new(),
            &BTreeMap::new(),
        );
        let doc = serde_json::to_value(ByYearDesc(&merged)).unwrap();
        let record = &doc["2024"]["Algarve"];
        assert_eq!(record["Total"], 100);
        assert_eq!(record["Causas"][0]["Causa"], "Negligência");
        assert_eq!(record["Causas"][0]["Numero"], 10);
        assert_eq!(record["Causas"][1]["Causa"], "Intencional");
        assert_eq!(record["Causas"][1]["Numero"], 80);
        assert_eq!(record["Causas"][5]["Causa"], "Não investigados");
        assert_eq!(record["Eficacia_Index"], 0.0);
    }

    #[test]
    fn merged_output_orders_years_descending_and_regions_ascending() {
        let mut proportions: YearDataset<Option<f64>> = BTreeMap::new();
        for year in [2010, 2019, 2024] {
            let regions = proportions.entry(year).or_insert_with(BTreeMap::new);
            regions.insert("Porto".to_string(), Some(1.0));
            regions.insert("Aveiro".to_string(), Some(2.0));
        }
        let merged = merge_datasets(
            &BTreeMap::new(),
            &BTreeMap::new(),
            &proportions,
            &BTreeMap::new(),
            &BTreeMap::new(),
        );

        let first = serde_json::to_string_pretty(&ByYearDesc(&merged)).unwrap();
        let second = serde_json::to_string_pretty(&ByYearDesc(&merged)).unwrap();
        assert_eq!(first, second);
        assert!(first.find("\"2024\"").unwrap() < first.find("\"2019\"").unwrap());
        assert!(first.find("\"2019\"").unwrap() < first.find("\"2010\"").unwrap());
        assert!(first.find("Aveiro").unwrap() < first.find("Porto").unwrap());
    }
}
