use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{InsightsError, Result};
use crate::table::TableRow;

/// Destination for exported report rows.
pub trait ExportSink {
    fn export<R: TableRow>(&mut self, filename: &str, rows: &[R]) -> Result<()>;
}

/// Writes rows as CSV with the column labels as header.
pub fn write_csv<W: Write, R: TableRow>(writer: W, rows: &[R]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(R::columns().iter().map(|column| column.label))?;
    for row in rows {
        wtr.write_record(
            R::columns()
                .iter()
                .map(|column| row.cell(column.key).export_text()),
        )?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string<R: TableRow>(rows: &[R]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, rows)?;
    String::from_utf8(buffer).map_err(|err| {
        InsightsError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}

/// Export sink that writes `<dir>/<filename>` files.
#[derive(Debug, Clone)]
pub struct CsvExport {
    dir: PathBuf,
}

impl CsvExport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        let mut path = self.dir.join(filename);
        if path.extension().is_none() {
            path.set_extension("csv");
        }
        path
    }
}

impl ExportSink for CsvExport {
    fn export<R: TableRow>(&mut self, filename: &str, rows: &[R]) -> Result<()> {
        let path = self.path_for(filename);
        let file = std::fs::File::create(&path)?;
        write_csv(file, rows)?;
        info!(rows = rows.len(), path = %path.display(), "exported report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_record, MonthlyTrend};

    #[test]
    fn record_export_formats_dates() {
        let csv = to_csv_string(&[sample_record(1, "Avery Lee")]).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("ID,Trainee Name,Email"));
        let row = lines.next().unwrap();
        assert!(row.contains("3/15/2024"));
        assert!(row.starts_with("1,Avery Lee,avery.lee@example.com"));
    }

    #[test]
    fn empty_cells_export_as_blank() {
        let trend = MonthlyTrend {
            year: 2024,
            month: 1,
            label: "Jan 2024".to_string(),
            avg_completion: 50.0,
            total_hours: 3.0,
            records: 2,
            moving_average: None,
        };
        let csv = to_csv_string(&[trend]).unwrap();
        assert_eq!(
            csv,
            "Month,Avg Completion,3-Month Avg,Training Hours,Records\nJan 2024,50,,3,2\n"
        );
    }

    #[test]
    fn sink_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvExport::new(dir.path());
        sink.export("records", &[sample_record(1, "Avery Lee")]).unwrap();
        let written = std::fs::read_to_string(dir.path().join("records.csv")).unwrap();
        assert_eq!(written.lines().count(), 2);
    }
}
