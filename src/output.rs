use serde::Serialize;
use std::error::Error;
use tabled::{settings::Style, Table, Tabled};

/// Write a value as pretty-printed UTF-8 JSON. Region names and category
/// labels carry accents, which `serde_json` emits verbatim rather than
/// escaping.
pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s).map_err(|e| format!("{}: {}", path, e))?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
