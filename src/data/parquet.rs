//! Parquet tick files

use super::ExportError;
use crate::feed::Tick;
use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::DateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Tick schema fields
pub fn tick_schema() -> Schema {
    Schema::new(vec![
        Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        ),
        Field::new("symbol", DataType::Utf8, false),
        Field::new("price", DataType::Float64, false),
        Field::new("size", DataType::Float64, false),
    ])
}

/// Write ticks as one snappy-compressed row group
pub fn write_parquet<W: Write + Send>(ticks: &[Tick], writer: W) -> Result<(), ExportError> {
    let schema = Arc::new(tick_schema());
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(writer, schema.clone(), Some(props))?;

    let timestamps: Vec<i64> = ticks.iter().map(|t| t.timestamp.timestamp_micros()).collect();
    let symbols: Vec<&str> = ticks.iter().map(|t| t.symbol.as_str()).collect();
    let prices: Vec<f64> = ticks.iter().map(|t| t.price).collect();
    let sizes: Vec<f64> = ticks.iter().map(|t| t.size).collect();

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC")) as ArrayRef,
            Arc::new(StringArray::from(symbols)) as ArrayRef,
            Arc::new(Float64Array::from(prices)) as ArrayRef,
            Arc::new(Float64Array::from(sizes)) as ArrayRef,
        ],
    )?;

    writer.write(&batch)?;
    writer.close()?;

    tracing::debug!(count = ticks.len(), "Wrote ticks to Parquet");
    Ok(())
}

/// Read every tick from a Parquet file written by [`write_parquet`]
pub fn read_parquet_ticks(path: impl AsRef<Path>) -> Result<Vec<Tick>, ExportError> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut ticks = Vec::new();
    for batch in reader {
        let batch = batch?;

        let timestamps = batch
            .column(0)
            .as_any()
            .downcast_ref::<TimestampMicrosecondArray>()
            .ok_or(ExportError::InvalidColumn("timestamp"))?;
        let symbols = batch
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or(ExportError::InvalidColumn("symbol"))?;
        let prices = batch
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or(ExportError::InvalidColumn("price"))?;
        let sizes = batch
            .column(3)
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or(ExportError::InvalidColumn("size"))?;

        for i in 0..batch.num_rows() {
            let timestamp = DateTime::from_timestamp_micros(timestamps.value(i))
                .ok_or(ExportError::InvalidColumn("timestamp"))?;
            ticks.push(Tick::new(
                symbols.value(i),
                timestamp,
                prices.value(i),
                sizes.value(i),
            ));
        }
    }

    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_tick_schema() {
        let schema = tick_schema();
        assert_eq!(schema.fields().len(), 4);
        assert_eq!(schema.field(0).name(), "timestamp");
        assert_eq!(schema.field(1).name(), "symbol");
        assert_eq!(schema.field(2).data_type(), &DataType::Float64);
        assert_eq!(schema.field(3).name(), "size");
    }

    #[test]
    fn test_write_and_read_ticks() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ticks.parquet");

        // Microsecond precision survives the file format
        let now = DateTime::from_timestamp_micros(Utc::now().timestamp_micros()).unwrap();
        let ticks = vec![
            Tick::new("btcusdt", now, 42_500.5, 0.1),
            Tick::new("btcusdt", now + Duration::seconds(1), 42_501.25, 2.0),
        ];

        write_parquet(&ticks, File::create(&path).unwrap()).unwrap();
        let read = read_parquet_ticks(&path).unwrap();
        assert_eq!(read, ticks);
    }

    #[test]
    fn test_write_empty_file_reads_back_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.parquet");

        write_parquet(&[], File::create(&path).unwrap()).unwrap();
        assert!(read_parquet_ticks(&path).unwrap().is_empty());
    }
}
