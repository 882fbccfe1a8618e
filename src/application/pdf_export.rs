// PDF export - Use case for exporting a metro's project table
use crate::domain::pipeline::Project;
use crate::infrastructure::pdf_document::{Column, PdfError, TableDocument};
use bytes::Bytes;
use chrono::NaiveDate;

pub const COLUMNS: [(&str, f64); 7] = [
    ("Project Name", 0.19),
    ("Address", 0.19),
    ("Submarket", 0.12),
    ("Units", 0.06),
    ("Stage", 0.12),
    ("Est. Delivery", 0.10),
    ("Developer", 0.22),
];

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Failed to generate PDF: {0}")]
pub struct ExportError(#[from] pub PdfError);

#[derive(Debug, Clone)]
pub struct PdfExport {
    pub filename: String,
    pub bytes: Bytes,
}

/// Build the project table document. Returns `None` when there is nothing to
/// export; generation failures propagate to the caller.
pub fn export_to_pdf(
    projects: Option<&[Project]>,
    metro_display: &str,
    date: NaiveDate,
) -> Result<Option<PdfExport>, ExportError> {
    let projects = match projects {
        Some(projects) if !projects.is_empty() => projects,
        _ => return Ok(None),
    };

    let document = TableDocument {
        title: format!("{} Development Pipeline", metro_display),
        subtitle: format!(
            "{} projects, generated {}",
            projects.len(),
            date.format("%B %-d, %Y")
        ),
        columns: COLUMNS
            .iter()
            .map(|(heading, weight)| Column::new(*heading, *weight))
            .collect(),
        rows: projects.iter().map(project_row).collect(),
    };

    let bytes = document.render()?;
    tracing::info!(
        "Generated {} byte PDF with {} projects for {}",
        bytes.len(),
        projects.len(),
        metro_display
    );

    Ok(Some(PdfExport {
        filename: export_filename(metro_display, date),
        bytes,
    }))
}

fn project_row(project: &Project) -> Vec<String> {
    vec![
        project.project_name.clone(),
        project.address.clone(),
        project.submarket.clone(),
        project.units.to_string(),
        project.stage.label().to_string(),
        project.estimated_delivery.clone(),
        project.developer.clone(),
    ]
}

pub fn export_filename(metro_display: &str, date: NaiveDate) -> String {
    let metro = metro_display.split_whitespace().collect::<Vec<_>>().join("-");
    format!("{}-Pipeline-Report-{}.pdf", metro, date.format("%Y-%m-%d"))
}
