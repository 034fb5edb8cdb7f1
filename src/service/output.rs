//! Output routing for retrieve actions: inline bytes or a local side-output file

use crate::action::{ActionError, OutputHints, OutputType};
use crate::config::ActionConfig;
use log::debug;
use std::path::{Path, PathBuf};

/// Resolved destination of retrieved bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Inline,
    File(PathBuf),
}

/// Decide where retrieved bytes go.
///
/// Precedence: an explicit output file, then `outputType = file` with a path
/// synthesized from the identifier, then inline.
pub fn resolve_target(hints: &OutputHints, identifier: &str, config: &ActionConfig) -> OutputTarget {
    if let Some(path) = &hints.output_file {
        return OutputTarget::File(path.clone());
    }
    match hints.output_type {
        Some(OutputType::File) => OutputTarget::File(default_output_path(identifier, config)),
        _ => OutputTarget::Inline,
    }
}

/// `{output_dir}/{pattern}` with `{identifier}` substituted. Path separators in
/// the identifier are flattened so the file always lands in `output_dir`.
pub fn default_output_path(identifier: &str, config: &ActionConfig) -> PathBuf {
    let file_name: String = identifier
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    config
        .output_dir
        .join(config.output_file_pattern.replace("{identifier}", &file_name))
}

/// Persist bytes to `path`, creating missing parent directories
pub async fn write_output(path: &Path, data: &[u8]) -> Result<(), ActionError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| ActionError::LocalWrite {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(path, data)
        .await
        .map_err(|source| ActionError::LocalWrite {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}
