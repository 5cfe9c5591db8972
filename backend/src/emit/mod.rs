//! JSON file output.
//!
//! Documents are written pretty-printed (2-space indent) as UTF-8, with
//! non-ASCII characters kept literal. A failed write is logged and reported
//! back as `false` so the caller can go on with its other outputs.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{EmitError, EmitResult};
use crate::logs::{log_error, log_success, log_warning};
use crate::validation::{validate_document, DocumentKind};

/// Serialize `data` and write it to `path`, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> EmitResult<()> {
    let content = serde_json::to_string_pretty(data)?;

    let write_err = |source| EmitError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }
    fs::write(path, content).map_err(write_err)
}

/// Validate and write a document, logging the outcome.
///
/// Schema violations are reported as warnings; the file is written anyway.
/// Returns whether the file was written.
pub fn save_json_file<T: Serialize + ?Sized>(path: &Path, kind: DocumentKind, data: &T) -> bool {
    match serde_json::to_value(data) {
        Ok(value) => {
            if let Err(errors) = validate_document(kind, &value) {
                log_warning(format!("{} does not match its schema:", path.display()));
                for err in errors.iter().take(3) {
                    log_warning(format!("  - {}", err));
                }
            }
        }
        Err(e) => {
            log_error(format!("Error serializing {}: {}", path.display(), e));
            return false;
        }
    }

    match write_json(path, data) {
        Ok(()) => {
            log_success(format!("Saved {}", path.display()));
            true
        }
        Err(e) => {
            log_error(format!("Error saving {}: {}", path.display(), e));
            false
        }
    }
}
