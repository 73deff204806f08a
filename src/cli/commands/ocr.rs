//! OCR command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::ocr::OcrEngine;
use anyhow::Result;
use std::path::Path;

/// Run the ocr command.
pub async fn run_ocr(path: &str, settings: Settings) -> Result<()> {
    let engine = OcrEngine::new(&settings.ocr);

    let spinner = Output::spinner("Reading image...");
    let result = engine.extract(Path::new(path)).await;
    spinner.finish_and_clear();

    match result {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("OCR failed: {}", e));
            Err(e.into())
        }
    }
}
