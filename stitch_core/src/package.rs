use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use zip::CompressionMethod;
use zip::DateTime;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::StitchError;
use crate::StitchResult;
use crate::files::display_path;
use crate::files::write_atomic;
use crate::tree::collect_tree;
use crate::tree::junk_matcher;

/// Zip every file below `dir` into `archive`.
///
/// Entries are sorted, named with `/` separators relative to `dir` and carry
/// a fixed timestamp, so the same tree always produces the same bytes. An
/// archive that lives inside `dir` is not added to itself.
pub fn create_archive(dir: &Path, archive: &Path) -> StitchResult<()> {
	let archive_error = |reason: String| {
		StitchError::Archive {
			path: archive.display().to_string(),
			reason,
		}
	};

	let files = collect_tree(dir, &junk_matcher())?;
	let own_entry = archive.strip_prefix(dir).ok();
	let options = SimpleFileOptions::default()
		.compression_method(CompressionMethod::Deflated)
		.last_modified_time(DateTime::default())
		.unix_permissions(0o644);

	let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
	let mut entries = 0;

	for relative in files {
		if own_entry == Some(relative.as_path()) {
			continue;
		}

		let path = dir.join(&relative);
		let bytes = std::fs::read(&path).map_err(|e| StitchError::read(&path, &e))?;

		writer
			.start_file(display_path(&relative), options)
			.map_err(|e| archive_error(e.to_string()))?;
		writer
			.write_all(&bytes)
			.map_err(|e| archive_error(e.to_string()))?;
		entries += 1;
	}

	let buffer = writer
		.finish()
		.map_err(|e| archive_error(e.to_string()))?
		.into_inner();

	write_atomic(archive, &buffer)?;
	tracing::info!(archive = %archive.display(), entries, "wrote archive");

	Ok(())
}
