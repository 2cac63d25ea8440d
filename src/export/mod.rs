//! Report downloads
//!
//! Serializes a completed report as Markdown, JSON or PDF, writes the file
//! into the export directory and hands the bytes back for the response.

pub mod pdf;

use crate::types::{AppError, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Pdf,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Json => "application/json",
        }
    }

    /// File name for an export generated at `at`
    pub fn filename(&self, at: &DateTime<Local>) -> String {
        let stamp = at.format("%Y%m%d_%H%M%S");
        match self {
            ExportFormat::Markdown => format!("research_report_{}.md", stamp),
            ExportFormat::Pdf => format!("research_report_{}.pdf", stamp),
            ExportFormat::Json => format!("research_data_{}.json", stamp),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "markdown" => Ok(ExportFormat::Markdown),
            "pdf" => Ok(ExportFormat::Pdf),
            "json" => Ok(ExportFormat::Json),
            _ => Err(AppError::InvalidInput("Invalid format".to_string())),
        }
    }
}

/// Provenance recorded in JSON exports
#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    pub ai_model: String,
    pub search_engine: String,
}

#[derive(Serialize)]
struct JsonExport<'a> {
    query: &'a str,
    report: &'a str,
    timestamp: String,
    metadata: &'a ExportMetadata,
}

/// A generated export, already persisted
#[derive(Debug)]
pub struct ExportedFile {
    pub filename: String,
    pub path: PathBuf,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

pub fn generate_markdown(report: &str, query: &str, generated_at: &DateTime<Local>) -> String {
    format!(
        "# Research Report: {query}\n\n\
         **Generated:** {}\n\
         **Query:** {query}\n\n\
         ---\n\n\
         {report}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

pub fn generate_json(
    report: &str,
    query: &str,
    generated_at: &DateTime<Local>,
    metadata: &ExportMetadata,
) -> Result<String> {
    let export = JsonExport {
        query,
        report,
        timestamp: generated_at.to_rfc3339(),
        metadata,
    };
    serde_json::to_string_pretty(&export).map_err(|e| AppError::Export(e.to_string()))
}

pub fn generate_pdf(report: &str, query: &str, generated_at: &DateTime<Local>) -> Vec<u8> {
    pdf::generate(
        report,
        query,
        &generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// Writes exports for completed jobs
pub struct ReportExporter {
    export_dir: PathBuf,
    metadata: ExportMetadata,
}

impl ReportExporter {
    pub fn new(export_dir: impl Into<PathBuf>, metadata: ExportMetadata) -> Self {
        Self {
            export_dir: export_dir.into(),
            metadata,
        }
    }

    /// Encode `report` without touching the filesystem
    pub fn encode(
        &self,
        format: ExportFormat,
        report: &str,
        query: &str,
        generated_at: &DateTime<Local>,
    ) -> Result<Vec<u8>> {
        Ok(match format {
            ExportFormat::Markdown => generate_markdown(report, query, generated_at).into_bytes(),
            ExportFormat::Json => {
                generate_json(report, query, generated_at, &self.metadata)?.into_bytes()
            }
            ExportFormat::Pdf => generate_pdf(report, query, generated_at),
        })
    }

    /// Generate the file and write it into the export directory.
    ///
    /// Every failure is reported as `Error generating <format> file: ...`.
    pub async fn export(
        &self,
        format: ExportFormat,
        report: &str,
        query: &str,
    ) -> Result<ExportedFile> {
        let now = Local::now();
        self.write(format, report, query, &now).await.map_err(|e| {
            let detail = match e {
                AppError::Export(msg) => msg,
                other => other.to_string(),
            };
            AppError::Export(format!("Error generating {} file: {}", format, detail))
        })
    }

    async fn write(
        &self,
        format: ExportFormat,
        report: &str,
        query: &str,
        now: &DateTime<Local>,
    ) -> Result<ExportedFile> {
        let bytes = self.encode(format, report, query, now)?;
        let filename = format.filename(now);
        let path = self.export_dir.join(&filename);

        tokio::fs::create_dir_all(&self.export_dir).await?;
        tokio::fs::write(&path, &bytes).await?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Export written");

        Ok(ExportedFile {
            filename,
            path,
            format,
            bytes,
        })
    }
}
