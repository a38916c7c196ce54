//! Metadata lookups through an external tool (exiftool by default).
//!
//! The tool only accepts files, so the image bytes are staged in a
//! [`TempImageFile`] that is removed when the guard is dropped.

use crate::config::MetadataConfig;
use crate::error::MetadataError;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;

/// Tag/value pairs reported by the metadata tool.
pub type MetadataTags = Map<String, Value>;

/// Image bytes written to a temporary file for the lifetime of the guard.
pub struct TempImageFile {
    file: NamedTempFile,
}

impl TempImageFile {
    /// Stage `bytes` in a new file under `dir`, or the system temp dir.
    pub fn create(bytes: &[u8], dir: Option<&Path>) -> Result<Self, MetadataError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("exif-");
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(MetadataError::TempFile)?;

        file.write_all(bytes).map_err(MetadataError::TempFile)?;
        file.flush().map_err(MetadataError::TempFile)?;

        tracing::trace!(path = %file.path().display(), len = bytes.len(), "Staged image for metadata tool");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Source of structured image metadata.
pub trait MetadataReader {
    /// Read the requested tags from an encoded image.
    fn read_tags(&self, bytes: &[u8], tags: &[&str]) -> Result<MetadataTags, MetadataError>;
}

/// Runs `exiftool -j -n -<Tag>... <file>` and parses its JSON report.
#[derive(Debug, Clone)]
pub struct ExifTool {
    pub program: PathBuf,
    pub temp_dir: Option<PathBuf>,
}

impl Default for ExifTool {
    fn default() -> Self {
        Self {
            program: PathBuf::from("exiftool"),
            temp_dir: None,
        }
    }
}

impl From<&MetadataConfig> for ExifTool {
    fn from(config: &MetadataConfig) -> Self {
        Self {
            program: config.tool.clone(),
            temp_dir: config.temp_dir.clone(),
        }
    }
}

impl MetadataReader for ExifTool {
    fn read_tags(&self, bytes: &[u8], tags: &[&str]) -> Result<MetadataTags, MetadataError> {
        let staged = TempImageFile::create(bytes, self.temp_dir.as_deref())?;

        let mut command = Command::new(&self.program);
        command.arg("-j").arg("-n");
        for tag in tags {
            command.arg(format!("-{tag}"));
        }
        command.arg(staged.path());

        let output = command.output().map_err(|source| MetadataError::Spawn {
            tool: self.program.display().to_string(),
            source,
        })?;

        if !output.status.success() {
            return Err(MetadataError::ToolFailed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_tool_output(&output.stdout)
    }
}

/// Parse the `-j` report: a JSON array with one object per input file.
pub fn parse_tool_output(stdout: &[u8]) -> Result<MetadataTags, MetadataError> {
    let records: Vec<MetadataTags> = serde_json::from_slice(stdout)?;
    records.into_iter().next().ok_or(MetadataError::Empty)
}

/// EXIF orientation (1-8) of an encoded image, if the tool reports one.
pub fn read_orientation<M: MetadataReader + ?Sized>(
    reader: &M,
    bytes: &[u8],
) -> Result<Option<u64>, MetadataError> {
    let tags = reader.read_tags(bytes, &["Orientation"])?;
    Ok(tags.get("Orientation").and_then(Value::as_u64))
}
