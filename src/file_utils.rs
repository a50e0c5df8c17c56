use anyhow::{Result, Context};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use chrono::Local;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Find supported documents in a directory, sorted by path
    pub fn find_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::detect_file_type(path) != FileType::Unknown {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write one line per item
    pub fn write_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        Self::write_to_file(path, &content)
    }

    /// Create (truncate) a file for incremental buffered writing
    pub fn create_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open file for writing: {:?}", path.as_ref()))?;

        Ok(BufWriter::new(file))
    }

    /// Write a timestamped log entry
    pub fn write_log_entry<W: Write>(writer: &mut W, label: &str, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        writeln!(writer, "[{}] {}:\n{}\n", timestamp, label, content)
            .context("Failed to write log entry")?;
        Ok(())
    }

    /// Detect the document type from its extension
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            "pdf" => FileType::Pdf,
            _ => FileType::Unknown,
        }
    }
}

/// Enum representing different file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Plain text
    Text,
    /// Markdown text
    Markdown,
    /// PDF, needs conversion before reading
    Pdf,
    /// Unknown file type
    Unknown,
}

/// Output locations of one document, next to the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Extracted assessment questions
    pub questions: PathBuf,
    /// Extracted summary hints
    pub metadata: PathBuf,
    /// Raw chunk input and generated output log
    pub summary_log: PathBuf,
    /// Final concatenated summary
    pub summary: PathBuf,
    /// Reduced text after preprocessing
    pub preprocessed: PathBuf,
}

impl ArtifactPaths {
    /// Derive every artifact path from the input path and the final summary suffix
    pub fn for_document<P: AsRef<Path>>(input: P, suffix: &str) -> Self {
        let input = input.as_ref();
        let base = input.with_extension("");
        let base = base.to_string_lossy();

        Self {
            questions: PathBuf::from(format!("{}-questions.txt", base)),
            metadata: PathBuf::from(format!("{}-metadata.txt", base)),
            summary_log: PathBuf::from(format!("{}-summary.txt", base)),
            summary: PathBuf::from(format!("{}{}", base, suffix)),
            preprocessed: PathBuf::from(format!("{}-preprocessed.txt", base)),
        }
    }

    /// Whether a file looks like an artifact written for another document
    pub fn is_artifact<P: AsRef<Path>>(path: P, suffix: &str) -> bool {
        let name = path
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        ARTIFACT_SUFFIXES
            .iter()
            .copied()
            .chain(std::iter::once(suffix))
            .any(|s| !s.is_empty() && name.ends_with(s))
    }

    /// Groups of documents that would write to the same artifact paths, e.g. `unit1.txt` and `unit1.md`
    pub fn shared_bases(documents: &[PathBuf]) -> Vec<Vec<PathBuf>> {
        let mut by_base: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for document in documents {
            by_base
                .entry(document.with_extension(""))
                .or_default()
                .push(document.clone());
        }

        by_base
            .into_values()
            .filter(|group| group.len() > 1)
            .collect()
    }
}

const ARTIFACT_SUFFIXES: [&str; 4] = [
    "-questions.txt",
    "-metadata.txt",
    "-summary.txt",
    "-preprocessed.txt",
];
