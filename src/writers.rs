//! Table serialization for downstream writers.
//!
//! The JSON shape flattens each table's position into top/left/width/
//! height (plus right/bottom) and the grid into `data[row][col]`, one
//! record per cell with its own position and text.

use std::io::Write;

use serde::Serialize;

use crate::Result;
use crate::table::Table;

#[derive(Serialize)]
struct CellRecord {
    top: f64,
    left: f64,
    width: f64,
    height: f64,
    text: String,
}

#[derive(Serialize)]
struct TableRecord {
    extraction_method: &'static str,
    top: f64,
    left: f64,
    width: f64,
    height: f64,
    right: f64,
    bottom: f64,
    data: Vec<Vec<CellRecord>>,
}

impl TableRecord {
    fn from_table(table: &Table) -> Self {
        let rect = table.rect();
        let data = table
            .rows()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| CellRecord {
                        top: cell.rect.top,
                        left: cell.rect.left,
                        width: cell.rect.width(),
                        height: cell.rect.height(),
                        text: cell.text(),
                    })
                    .collect()
            })
            .collect();
        Self {
            extraction_method: table.extraction_method(),
            top: rect.top,
            left: rect.left,
            width: rect.width(),
            height: rect.height(),
            right: rect.right,
            bottom: rect.bottom,
            data,
        }
    }
}

/// Serializes extracted tables to an output stream.
pub trait Writer {
    fn write(&self, out: &mut dyn Write, tables: &[Table]) -> Result<()>;
}

/// JSON writer: an array of table records.
#[derive(Default)]
pub struct JsonWriter;

impl JsonWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Writer for JsonWriter {
    fn write(&self, out: &mut dyn Write, tables: &[Table]) -> Result<()> {
        let records: Vec<TableRecord> = tables.iter().map(TableRecord::from_table).collect();
        serde_json::to_writer(&mut *out, &records)?;
        Ok(())
    }
}
