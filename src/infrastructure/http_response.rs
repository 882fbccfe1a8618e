// HTTP response utilities for file downloads
use crate::application::pdf_export::PdfExport;
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};

/// Build an attachment response for a generated PDF
pub fn pdf_download_response(export: PdfExport) -> Result<Response<Body>, StatusCode> {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export.filename.replace(['"', '\\'], "_")
    );
    let disposition = HeaderValue::from_str(&disposition).map_err(|e| {
        tracing::error!("Invalid Content-Disposition for {}: {}", export.filename, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, export.bytes.len())
        .body(Body::from(export.bytes))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
