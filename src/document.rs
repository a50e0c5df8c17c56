/*!
 * Input document loading.
 *
 * Text and Markdown files are read as-is. PDF files are handed to the
 * external `markitdown` converter when conversion is enabled in the
 * configuration and rejected otherwise.
 */

use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::app_config::ConversionConfig;
use crate::errors::AppError;
use crate::file_utils::{FileManager, FileType};

/// Command used to turn PDF files into Markdown
pub const PDF_CONVERTER: &str = "markitdown";

/// A loaded input document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Path the document was loaded from
    pub path: PathBuf,
    /// Detected input type
    pub file_type: FileType,
    /// Raw text content
    pub text: String,
}

impl Document {
    /// Load a document, converting PDF input when allowed
    pub fn load<P: AsRef<Path>>(path: P, conversion: &ConversionConfig) -> Result<Self, AppError> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            return Err(AppError::File(format!("Input file does not exist: {:?}", path)));
        }

        let file_type = FileManager::detect_file_type(path);
        let text = match file_type {
            FileType::Pdf if conversion.pdf_to_md => convert_pdf_to_md(path)?,
            FileType::Pdf => {
                return Err(AppError::Conversion(format!(
                    "{:?} is a PDF but conversion.pdf_to_md is disabled",
                    path
                )));
            }
            FileType::Text | FileType::Markdown | FileType::Unknown => {
                FileManager::read_to_string(path).map_err(|e| AppError::File(format!("{:#}", e)))?
            }
        };

        debug!("Loaded {:?} ({:?}, {} bytes)", path, file_type, text.len());

        Ok(Self {
            path: path.to_path_buf(),
            file_type,
            text,
        })
    }

    /// File name without directory
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Convert a PDF to Markdown with the external converter
pub fn convert_pdf_to_md(path: &Path) -> Result<String, AppError> {
    let output = Command::new(PDF_CONVERTER)
        .arg(path)
        .output()
        .map_err(|e| AppError::Conversion(format!("Failed to run {}: {}", PDF_CONVERTER, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::Conversion(format!(
            "{} failed on {:?}: {}",
            PDF_CONVERTER,
            path,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
