// src/export/mod.rs

use anyhow::{anyhow, Context, Result};
use arrow::{
    array::ArrayRef,
    compute::concat_batches,
    record_batch::RecordBatch,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{
    fs::{self, File},
    path::Path,
};
use tracing::{debug, info};

use crate::process::convert::{coerce_to_f64, f64_column, utf8_column};
use crate::schema::{build_arrow_schema, layout_columns, OutputColumn};
use crate::store::LocationRecord;

/// Materialize sparse records against the master order into one dense batch.
///
/// `has_range` decides which identities get their range pair; pass
/// [`crate::store::RecordStore::has_range`] for the usual rule.
pub fn build_batch<F>(
    records: &[LocationRecord],
    master: &[String],
    has_range: F,
) -> Result<RecordBatch>
where
    F: Fn(&str) -> bool,
{
    let cols = layout_columns(master, has_range);
    let schema = build_arrow_schema(&cols);

    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(cols.len() + 2);
    arrays.push(utf8_column(records.iter().map(|r| r.country.as_str())));
    arrays.push(utf8_column(records.iter().map(|r| r.city.as_str())));

    for col in &cols {
        let id = col.identity();
        let arr = match col {
            OutputColumn::Value(_) => coerce_to_f64(
                records
                    .iter()
                    .map(|r| r.get(id).map(|c| c.value.as_str())),
            ),
            OutputColumn::Low(_) => f64_column(
                records
                    .iter()
                    .map(|r| r.get(id).and_then(|c| c.range).and_then(|rg| rg.low)),
            ),
            OutputColumn::High(_) => f64_column(
                records
                    .iter()
                    .map(|r| r.get(id).and_then(|c| c.range).and_then(|rg| rg.high)),
            ),
        };
        arrays.push(arr);
    }

    debug!(
        rows = records.len(),
        columns = arrays.len(),
        "built export batch"
    );
    RecordBatch::try_new(schema, arrays).context("building export RecordBatch")
}

/// Write `batch` to `path`, creating the parent directory first and
/// replacing any existing file.
pub fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {:?}", parent))?;
    }

    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Arrow writer")?;
    writer.write(batch).context("writing export batch")?;
    writer.close().context("closing Parquet writer")?;

    info!(path = %path.display(), rows = batch.num_rows(), "wrote parquet");
    Ok(())
}

/// Read a Parquet file back into a single batch.
pub fn read_parquet(path: &Path) -> Result<RecordBatch> {
    let file = File::open(path).with_context(|| format!("opening {:?}", path))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("reading Parquet metadata from {:?}", path))?;
    let schema = builder.schema().clone();
    let reader = builder.build().context("building Parquet reader")?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("decoding {:?}", path))?;
    concat_batches(&schema, &batches).map_err(|e| anyhow!("concatenating batches: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::rows::PriceRange;
    use crate::store::{Cell, Location};
    use arrow::array::{Array, Float64Array, StringArray};
    use tempfile::tempdir;

    fn cell(value: &str) -> Cell {
        Cell {
            value: value.to_string(),
            range: None,
        }
    }

    fn canada() -> LocationRecord {
        LocationRecord::new(&Location::CountryAverage {
            country: "Canada".into(),
        })
    }

    fn toronto() -> LocationRecord {
        LocationRecord::new(&Location::City {
            country: "Canada".into(),
            city: "Toronto".into(),
        })
    }

    fn floats<'a>(batch: &'a RecordBatch, name: &str) -> &'a Float64Array {
        batch
            .column_by_name(name)
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap()
    }

    #[test]
    fn absent_cells_are_null() -> Result<()> {
        let records = vec![
            toronto().with_cell("Rent", cell("1500")),
            canada()
                .with_cell("Rent", cell("1000"))
                .with_cell("Groceries", cell("90")),
        ];
        let master: Vec<String> = ["Country", "City", "Rent", "Groceries"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let batch = build_batch(&records, &master, |_| false)?;
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 4);

        let groceries = floats(&batch, "Groceries");
        assert!(groceries.is_null(0));
        assert_eq!(groceries.value(1), 90.0);
        Ok(())
    }

    #[test]
    fn non_numeric_values_become_null() -> Result<()> {
        let records = vec![canada().with_cell("Note", cell("See details"))];
        let batch = build_batch(&records, &["Note".to_string()], |_| false)?;
        assert!(floats(&batch, "Note").is_null(0));
        Ok(())
    }

    #[test]
    fn parquet_round_trip() -> Result<()> {
        let records = vec![
            canada().with_cell(
                "Groceries",
                Cell {
                    value: "100".into(),
                    range: Some(PriceRange {
                        low: Some(80.0),
                        high: Some(120.0),
                    }),
                },
            ),
            toronto().with_cell("Rent", cell("1500")),
        ];
        let master = vec!["Rent".to_string(), "Groceries".to_string()];
        let batch = build_batch(&records, &master, |id| id == "Groceries")?;

        let tmp = tempdir()?;
        let path = tmp.path().join("nested").join("out.parquet");
        write_parquet(&batch, &path)?;
        let back = read_parquet(&path)?;

        assert_eq!(back.num_rows(), batch.num_rows());
        assert_eq!(back.schema().fields(), batch.schema().fields());
        for i in 0..batch.num_columns() {
            assert_eq!(back.column(i).as_ref(), batch.column(i).as_ref());
        }

        let cities = back
            .column_by_name("City")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(cities.value(0), "average");
        assert_eq!(floats(&back, "Groceries Low Range").value(0), 80.0);
        assert!(floats(&back, "Groceries High Range").is_null(1));
        Ok(())
    }

    #[test]
    fn rewrite_overwrites() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("out.parquet");

        let two = vec![canada(), toronto()];
        write_parquet(&build_batch(&two, &[], |_| false)?, &path)?;
        let one = vec![canada()];
        write_parquet(&build_batch(&one, &[], |_| false)?, &path)?;

        assert_eq!(read_parquet(&path)?.num_rows(), 1);
        Ok(())
    }
}
