//! Optical character recognition via the `tesseract` engine.
//!
//! [`OcrEngine::extract`] returns a structured result. The agent-facing
//! [`OcrEngine::extract_text_from_image`] never fails: errors are rendered
//! into the returned text so the model can react to them.

use crate::config::OcrSettings;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Prefix of a successful extraction.
pub const OCR_SUCCESS_LABEL: &str = "Extracted text from image:";
/// Prefix of a failed extraction.
pub const OCR_ERROR_LABEL: &str = "Error extracting text from image:";

/// Why an image could not be read.
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("not a supported image file: {0}")]
    UnsupportedImage(PathBuf),

    #[error("OCR engine '{0}' is not installed")]
    EngineMissing(String),

    #[error("OCR engine failed: {0}")]
    EngineFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Image formats recognised by their leading bytes.
const IMAGE_SIGNATURES: &[(&str, &[u8])] = &[
    ("png", b"\x89PNG\r\n\x1a\n"),
    ("jpeg", b"\xff\xd8\xff"),
    ("gif", b"GIF8"),
    ("bmp", b"BM"),
    ("tiff", b"II*\x00"),
    ("tiff", b"MM\x00*"),
    ("pbm", b"P1"),
    ("pgm", b"P2"),
    ("ppm", b"P3"),
    ("pbm", b"P4"),
    ("pgm", b"P5"),
    ("ppm", b"P6"),
];

/// Detect the image format from the file header.
pub fn sniff_image_format(header: &[u8]) -> Option<&'static str> {
    if header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"WEBP" {
        return Some("webp");
    }
    IMAGE_SIGNATURES
        .iter()
        .find(|(_, sig)| header.starts_with(sig))
        .map(|(name, _)| *name)
}

/// Wrapper around the OCR engine binary.
#[derive(Debug, Clone)]
pub struct OcrEngine {
    command: String,
    language: Option<String>,
}

impl OcrEngine {
    /// Create an engine from settings.
    pub fn new(settings: &OcrSettings) -> Self {
        Self {
            command: settings.command.clone(),
            language: settings.language.clone().filter(|l| !l.is_empty()),
        }
    }

    /// Binary used for recognition.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Open the image and run recognition on it.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn extract(&self, path: &Path) -> Result<String, OcrError> {
        if !path.is_file() {
            return Err(OcrError::NotFound(path.to_path_buf()));
        }

        let format = read_header(path)
            .and_then(|header| sniff_image_format(&header))
            .ok_or_else(|| OcrError::UnsupportedImage(path.to_path_buf()))?;
        debug!("Running OCR on {} image", format);

        let mut cmd = tokio::process::Command::new(&self.command);
        cmd.arg(path).arg("stdout");
        if let Some(lang) = &self.language {
            cmd.args(["-l", lang]);
        }

        let output = cmd.kill_on_drop(true).output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OcrError::EngineMissing(self.command.clone())
            } else {
                OcrError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(OcrError::EngineFailed(if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            }));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Extract text for the agent, folding any failure into the returned text.
    pub async fn extract_text_from_image(&self, path: &Path) -> String {
        match self.extract(path).await {
            Ok(text) => format!("{}\n\n{}", OCR_SUCCESS_LABEL, text),
            Err(e) => {
                warn!("OCR failed for {}: {}", path.display(), e);
                format!("{} {}", OCR_ERROR_LABEL, e)
            }
        }
    }
}

impl Default for OcrEngine {
    fn default() -> Self {
        Self::new(&OcrSettings::default())
    }
}

fn read_header(path: &Path) -> Option<Vec<u8>> {
    let mut file = std::fs::File::open(path).ok()?;
    let mut header = vec![0u8; 16];
    let n = file.read(&mut header).ok()?;
    header.truncate(n);
    Some(header)
}
