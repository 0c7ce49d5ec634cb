//! In-memory tabular result.
//!
//! Table data arrives as Parquet files. Each file is decoded into Arrow
//! record batches and flattened into rows of display strings, laid out in
//! the column order of the table schema.

use std::collections::HashMap;

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::Result;

/// A fully materialized table: named columns and rows of stringified cells.
///
/// `None` marks a null cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataFrame {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl DataFrame {
    /// Builds a frame from explicit columns and rows.
    ///
    /// Rows shorter than the header are padded with nulls; longer rows are
    /// truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Accumulates record batches into a [`DataFrame`].
pub struct FrameBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

/// Where a column's values come from within one batch.
enum CellSource<'a> {
    Array(&'a dyn Array, ArrayFormatter<'a>),
    Constant(Option<&'a str>),
}

impl FrameBuilder {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends every row of `batch`.
    ///
    /// Columns absent from the batch are filled from `partition_values`,
    /// or left null when no partition value exists either.
    pub fn append_batch(
        &mut self,
        batch: &RecordBatch,
        partition_values: &HashMap<String, Option<String>>,
    ) -> Result<()> {
        let options = FormatOptions::default();
        let schema = batch.schema();

        let mut sources = Vec::with_capacity(self.columns.len());
        for name in &self.columns {
            let source = match schema.index_of(name) {
                Ok(idx) => {
                    let array = batch.column(idx).as_ref();
                    CellSource::Array(array, ArrayFormatter::try_new(array, &options)?)
                }
                Err(_) => CellSource::Constant(
                    partition_values.get(name).and_then(|v| v.as_deref()),
                ),
            };
            sources.push(source);
        }

        self.rows.reserve(batch.num_rows());
        for row_idx in 0..batch.num_rows() {
            let row = sources
                .iter()
                .map(|source| match source {
                    CellSource::Array(array, _) if array.is_null(row_idx) => None,
                    CellSource::Array(_, formatter) => Some(formatter.value(row_idx).to_string()),
                    CellSource::Constant(value) => value.map(str::to_string),
                })
                .collect();
            self.rows.push(row);
        }

        Ok(())
    }

    /// Decodes one Parquet object and appends its rows.
    pub fn append_parquet(
        &mut self,
        data: Bytes,
        partition_values: &HashMap<String, Option<String>>,
    ) -> Result<()> {
        let reader = ParquetRecordBatchReaderBuilder::try_new(data)?.build()?;
        for batch in reader {
            self.append_batch(&batch?, partition_values)?;
        }
        Ok(())
    }

    pub fn finish(self) -> DataFrame {
        DataFrame {
            columns: self.columns,
            rows: self.rows,
        }
    }
}
