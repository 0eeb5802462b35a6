//! File checks that gate the conversion widgets
//!
//! Types are inferred from the file extension, the same information a
//! browser file picker reports.

use super::{Tool, ToolContext, ToolOutput};
use crate::config::MEGABYTE;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];
const PDF_TYPES: &[&str] = &["application/pdf"];
const SLIDE_TYPES: &[&str] = &[
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

/// What a widget expects as input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// One or more pictures for the image bundler
    Images,
    /// A single document for the slideshow converter
    Pdf,
    /// A single slideshow for the remote converter
    Slides,
}

impl FileKind {
    fn accepted(self) -> &'static [&'static str] {
        match self {
            FileKind::Images => IMAGE_TYPES,
            FileKind::Pdf => PDF_TYPES,
            FileKind::Slides => SLIDE_TYPES,
        }
    }

    fn missing_message(self) -> &'static str {
        match self {
            FileKind::Images => "Please select at least one image file.",
            FileKind::Pdf => "Please select a PDF file.",
            FileKind::Slides => "Please select a PPT file.",
        }
    }

    fn invalid_message(self, name: &str) -> String {
        match self {
            FileKind::Images => format!("Invalid file type: {name}. Please use JPG, PNG, or GIF."),
            FileKind::Pdf => "Please select a valid PDF file.".to_string(),
            FileKind::Slides => "Please select a valid PPT or PPTX file.".to_string(),
        }
    }

    fn takes_many(self) -> bool {
        matches!(self, FileKind::Images)
    }
}

/// A file that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedFile {
    pub path: PathBuf,
    pub name: String,
    pub mime: &'static str,
    pub size: u64,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Check `paths` against the rules for `kind`.
///
/// Single-file kinds only look at the first path. The first failure wins.
pub async fn validate_files(
    kind: FileKind,
    paths: &[PathBuf],
    max_bytes: u64,
) -> Result<Vec<CheckedFile>, String> {
    if paths.is_empty() {
        return Err(kind.missing_message().to_string());
    }
    let paths = if kind.takes_many() { paths } else { &paths[..1] };

    let mut checked = Vec::with_capacity(paths.len());
    for path in paths {
        let name = display_name(path);

        let mime = mime_guess::from_path(path)
            .first_raw()
            .filter(|m| kind.accepted().contains(m))
            .ok_or_else(|| kind.invalid_message(&name))?;

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| format!("Cannot read {name}: {e}"))?;
        if !metadata.is_file() {
            return Err(format!("Not a file: {name}"));
        }
        if metadata.len() > max_bytes {
            return Err(format!(
                "File too large. Maximum size is {}MB.",
                max_bytes / MEGABYTE
            ));
        }

        checked.push(CheckedFile {
            path: path.clone(),
            name,
            mime,
            size: metadata.len(),
        });
    }
    Ok(checked)
}

/// Check files tool
pub struct CheckFilesTool;

#[derive(Debug, Deserialize)]
struct CheckFilesInput {
    kind: FileKind,
    #[serde(default)]
    paths: Vec<String>,
}

#[async_trait]
impl Tool for CheckFilesTool {
    fn name(&self) -> &'static str {
        "check_files"
    }

    fn description(&self) -> String {
        "Check that files are the right type and size for a conversion: images (JPG, PNG, GIF), pdf, or slides (PPT, PPTX).".to_string()
    }

    fn usage(&self) -> &'static str {
        "/check_files <images|pdf|slides> <path>..."
    }

    async fn run(&self, input: Value, ctx: ToolContext) -> ToolOutput {
        let input: CheckFilesInput = match serde_json::from_value(input) {
            Ok(i) => i,
            Err(e) => return ToolOutput::error(format!("Invalid input: {e}")),
        };
        let paths: Vec<PathBuf> = input.paths.iter().map(|p| ctx.resolve(p)).collect();

        match validate_files(input.kind, &paths, ctx.max_upload_bytes).await {
            Ok(files) => {
                let lines: Vec<String> = files
                    .iter()
                    .map(|f| format!("{} ({}, {} bytes)", f.name, f.mime, f.size))
                    .collect();
                let display: Vec<Value> = files
                    .iter()
                    .map(|f| json!({ "name": f.name, "mime": f.mime, "size": f.size }))
                    .collect();
                ToolOutput::success(format!(
                    "{} file(s) ready:\n{}",
                    files.len(),
                    lines.join("\n")
                ))
                .with_display(json!({ "files": display }))
            }
            Err(message) => ToolOutput::error(message),
        }
    }
}
