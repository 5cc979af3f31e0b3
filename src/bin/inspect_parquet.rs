use anyhow::{bail, Result};
use arrow::array::{Array, StringArray};
use colscraper::config::DEFAULT_OUTPUT;
use colscraper::export::read_parquet;
use colscraper::schema::{CITY_COLUMN, COUNTRY_COLUMN};
use std::{env, path::PathBuf};

/// Print the shape of an exported cost-of-living file: locations, columns,
/// and how sparse each column is.
fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let path = match args.len() {
        1 => PathBuf::from(DEFAULT_OUTPUT),
        2 => PathBuf::from(&args[1]),
        _ => bail!("Usage: {} [PARQUET_FILE]", args[0]),
    };

    let batch = read_parquet(&path)?;
    println!("=== {} ===", path.display());
    println!("Locations: {}", batch.num_rows());
    println!("Columns:   {}", batch.num_columns());
    println!();

    let countries = batch
        .column_by_name(COUNTRY_COLUMN)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>().cloned());
    let cities = batch
        .column_by_name(CITY_COLUMN)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>().cloned());
    if let (Some(countries), Some(cities)) = (countries, cities) {
        println!("=== Locations ===");
        for i in 0..batch.num_rows() {
            println!("- {}, {}", cities.value(i), countries.value(i));
        }
        println!();
    }

    println!("=== Columns ===");
    let schema = batch.schema();
    for (field, col) in schema.fields().iter().zip(batch.columns()) {
        println!(
            "- {:<60} | {:<8} | missing {}/{}",
            field.name(),
            format!("{:?}", field.data_type()),
            col.null_count(),
            col.len()
        );
    }

    Ok(())
}
