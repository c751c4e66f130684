use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::StitchError;
use crate::StitchResult;

/// Normalize CRLF and lone CR line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}

/// Read a text file with normalized line endings. The error names the file.
pub fn read_source(path: &Path) -> StitchResult<String> {
	let content = std::fs::read_to_string(path).map_err(|e| StitchError::read(path, &e))?;
	Ok(normalize_line_endings(&content))
}

/// Write `bytes` to `path`, creating missing parent directories.
///
/// The bytes go to a temporary sibling first and are renamed into place, so
/// readers never observe a partially written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> StitchResult<()> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).map_err(|e| StitchError::write(parent, &e))?;
	}

	let file_name = path
		.file_name()
		.map_or_else(|| "output".into(), |name| name.to_string_lossy());
	let temp_path = path.with_file_name(format!(
		".{file_name}.tmp-{}-{}",
		std::process::id(),
		SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_or(0, |duration| duration.as_nanos())
	));

	if let Err(e) = std::fs::write(&temp_path, bytes) {
		let _ = std::fs::remove_file(&temp_path);
		return Err(StitchError::write(path, &e));
	}

	if let Err(e) = std::fs::rename(&temp_path, path) {
		let _ = std::fs::remove_file(&temp_path);
		return Err(StitchError::write(path, &e));
	}

	Ok(())
}

/// Remove everything inside `dir` while keeping the directory itself.
/// A missing directory is not an error.
pub fn clear_directory(dir: &Path) -> StitchResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();
		let result = if path.is_dir() {
			std::fs::remove_dir_all(&path)
		} else {
			std::fs::remove_file(&path)
		};
		result.map_err(|e| StitchError::write(&path, &e))?;
	}

	Ok(())
}

/// Render a path with `/` separators regardless of platform.
pub fn display_path(path: &Path) -> String {
	path.to_string_lossy().replace('\\', "/")
}

/// Resolve `.` and `..` components without touching the file system, so
/// paths that do not exist yet can still be compared.
pub fn normalize_path(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();

	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				if !normalized.pop() {
					normalized.push(component);
				}
			}
			other => normalized.push(other),
		}
	}

	normalized
}
