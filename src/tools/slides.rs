//! Slides-to-PDF tool - remote conversion of PPT/PPTX files

use super::files::{validate_files, FileKind};
use super::{Tool, ToolContext, ToolOutput};
use crate::backend;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Slides-to-PDF tool
pub struct SlidesToPdfTool;

#[derive(Debug, Deserialize)]
struct SlidesInput {
    path: String,
    #[serde(default)]
    output: Option<String>,
}

/// Where the converted document goes when no output path is given
pub fn pdf_path_for(input: &Path) -> PathBuf {
    let is_slides = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ppt") || e.eq_ignore_ascii_case("pptx"));
    if is_slides {
        input.with_extension("pdf")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".pdf");
        PathBuf::from(name)
    }
}

#[async_trait]
impl Tool for SlidesToPdfTool {
    fn name(&self) -> &'static str {
        "slides_to_pdf"
    }

    fn description(&self) -> String {
        "Convert a PowerPoint deck (PPT or PPTX) to PDF using the conversion service. Text-only: images and formatting are not fully preserved.".to_string()
    }

    fn usage(&self) -> &'static str {
        "/slides_to_pdf <path> [output]"
    }

    async fn run(&self, input: Value, ctx: ToolContext) -> ToolOutput {
        let input: SlidesInput = match serde_json::from_value(input) {
            Ok(i) => i,
            Err(e) => return ToolOutput::error(format!("Invalid input: {e}")),
        };

        let source = ctx.resolve(&input.path);
        let checked = validate_files(FileKind::Slides, &[source], ctx.max_upload_bytes).await;
        let file = match checked.map(|files| files.into_iter().next()) {
            Ok(Some(file)) => file,
            Ok(None) => return ToolOutput::error("Please select a PPT file."),
            Err(message) => return ToolOutput::error(message),
        };
        let destination = input
            .output
            .map_or_else(|| pdf_path_for(&file.path), |o| ctx.resolve(o));

        let data = match tokio::fs::read(&file.path).await {
            Ok(d) => d,
            Err(e) => return ToolOutput::error(format!("Cannot read {}: {e}", file.name)),
        };
        let part = match Part::bytes(data).file_name(file.name.clone()).mime_str(file.mime) {
            Ok(p) => p,
            Err(e) => return ToolOutput::error(format!("Conversion failed: {e}")),
        };

        tracing::info!(file = %file.name, size = file.size, "Uploading slides for conversion");
        let response = match ctx
            .http()
            .post(&ctx.convert_url)
            .multipart(Form::new().part("file", part))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                return ToolOutput::error(format!(
                    "Conversion failed: {e}. Make sure the conversion service is running."
                ))
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = backend::error_field(&body).unwrap_or_else(|| "Conversion failed".to_string());
            return ToolOutput::error(format!("Conversion failed: {message}"));
        }

        let pdf = match response.bytes().await {
            Ok(b) => b,
            Err(e) => return ToolOutput::error(format!("Conversion failed: {e}")),
        };
        if let Err(e) = tokio::fs::write(&destination, &pdf).await {
            return ToolOutput::error(format!("Cannot write {}: {e}", destination.display()));
        }

        ToolOutput::success(format!(
            "Saved {}. Note: this is a text-only conversion; images and formatting are not fully preserved.",
            destination.display()
        ))
        .with_display(json!({
            "output": destination.display().to_string(),
            "bytes": pdf.len(),
        }))
    }
}
