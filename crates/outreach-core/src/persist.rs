//! JSON files exchanged between pipeline stages.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Writes `value` as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AppError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let data = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, data)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let data = std::fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Reads the sender's background text from a `.txt`, `.md` or `.pdf` file.
pub fn read_resume_text(path: &Path) -> Result<String, AppError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("txt" | "md") => Ok(std::fs::read_to_string(path)?),
        Some("pdf") => {
            let text = pdf_extract::extract_text(path).map_err(|e| {
                AppError::Generic(format!("reading PDF {}: {e}", path.display()))
            })?;
            tracing::debug!(path = %path.display(), chars = text.chars().count(), "Resume PDF read");
            Ok(text)
        }
        other => Err(AppError::Generic(format!(
            "unsupported resume format: {}",
            other.unwrap_or("<none>")
        ))),
    }
}
