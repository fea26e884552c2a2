use crate::error::{EtbdError, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub struct CsvConnector;

impl CsvConnector {
    /// Write a DataFrame as CSV with a header row
    pub fn write_to<W: Write>(writer: W, df: &mut DataFrame) -> Result<()> {
        CsvWriter::new(writer)
            .include_header(true)
            .finish(df)
            .map_err(EtbdError::from)
    }

    /// Write a DataFrame to a CSV file, creating parent directories as needed
    pub fn write<P: AsRef<Path>>(path: P, df: &mut DataFrame) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Self::write_to(file, df)
    }

    /// Load a CSV file into a DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()?;

        Ok(df)
    }
}
