// argus/src/commands/query.rs
//
// USE CASE: Ad-hoc read-only SQL against a DuckDB file. Anything but a
// single SELECT is rejected before reaching the engine.

use comfy_table::Table;

use argus_core::infrastructure::adapters::DuckDbSource;

pub fn execute(query: String, db_path: String) -> anyhow::Result<()> {
    let source = DuckDbSource::new(&db_path)?;
    let sample = source.ad_hoc(&query)?;

    let mut table = Table::new();
    table.set_header(sample.columns.clone());
    for row in &sample.rows {
        table.add_row(
            row.iter()
                .map(|cell| cell.clone().unwrap_or_else(|| "NULL".to_string()))
                .collect::<Vec<_>>(),
        );
    }
    println!("{table}");
    println!("({} rows)", sample.rows.len());
    Ok(())
}
