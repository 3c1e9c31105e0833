// src/format/csv_export.rs
use crate::errors::ExportError;
use crate::listings::JobBatch;
use crate::utils::file_timestamp;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub const CSV_HEADER: [&str; 3] = ["JOB TITLE", "DESCRIPTION", "URL"];

/// A rendered export, not yet written anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub job_count: usize,
}

/// `job_list_2025-03-01_13-54.csv`; two exports in the same minute share a name
pub fn export_file_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("job_list_{}.csv", file_timestamp(now))
}

pub fn to_file<Tz>(batch: &JobBatch, now: &DateTime<Tz>) -> Result<ExportFile, ExportError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for job in batch {
        writer.write_record([&job.title, &job.description, &job.url])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.error().to_string()))?;

    Ok(ExportFile {
        file_name: export_file_name(now),
        bytes,
        job_count: batch.len(),
    })
}
