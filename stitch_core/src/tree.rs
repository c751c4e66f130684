use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;

use crate::StitchError;
use crate::StitchResult;
use crate::files::display_path;
use crate::files::normalize_line_endings;
use crate::files::read_source;
use crate::files::write_atomic;
use crate::package::create_archive;
use crate::transform::TransformationChain;

/// Editor and merge leftovers that are never copied into a build.
pub const JUNK_FILE_PATTERNS: &[&str] = &[".*.swp", "*~", "*.orig"];

/// Extensions of files that pass through the transformation chain.
pub const TEXT_EXTENSIONS: &[&str] = &["js", "json", "html", "txt", "css"];

/// Extensions of files copied byte for byte.
pub const BINARY_EXTENSIONS: &[&str] = &["png", "gif", "jpg", "ico"];

/// How a file is treated when copied into a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
	Text,
	Binary,
}

impl FileKind {
	/// Classify `path` by extension.
	pub fn of(path: &Path) -> StitchResult<Self> {
		let extension = path
			.extension()
			.and_then(|ext| ext.to_str())
			.map(str::to_ascii_lowercase)
			.unwrap_or_default();

		if TEXT_EXTENSIONS.contains(&extension.as_str()) {
			Ok(Self::Text)
		} else if BINARY_EXTENSIONS.contains(&extension.as_str()) {
			Ok(Self::Binary)
		} else {
			Err(StitchError::UnrecognizedFileType(display_path(path)))
		}
	}
}

/// A directory output: several source trees merged into one target
/// directory, with text files run through a shared chain and the result
/// optionally zipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeArtifact {
	pub name: String,
	pub sources: Vec<PathBuf>,
	pub chain: TransformationChain,
	pub target: PathBuf,
	pub archive: Option<PathBuf>,
}

/// What building a [`TreeArtifact`] wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeOutput {
	pub files: Vec<PathBuf>,
	pub archive: Option<PathBuf>,
}

impl TreeArtifact {
	/// Copy every source tree into the target, later sources overwriting
	/// earlier ones, then write the archive if one is configured. Every file
	/// is rendered before the first one is written.
	#[tracing::instrument(skip_all, fields(artifact = %self.name))]
	pub fn assemble(&self) -> StitchResult<TreeOutput> {
		let rendered = self.render()?;
		let mut output = TreeOutput::default();

		for (to, bytes) in rendered {
			write_atomic(&to, &bytes)?;
			output.files.push(to);
		}

		if let Some(archive) = &self.archive {
			create_archive(&self.target, archive)?;
			output.archive = Some(archive.clone());
		}

		tracing::info!(
			target_path = %self.target.display(),
			files = output.files.len(),
			"wrote directory artifact"
		);

		Ok(output)
	}

	/// Run every source file through the chain in memory, returning target
	/// paths and contents in first-seen order.
	pub fn render(&self) -> StitchResult<Vec<(PathBuf, Vec<u8>)>> {
		let junk = junk_matcher();
		let mut rendered: Vec<(PathBuf, Vec<u8>)> = Vec::new();

		for source in &self.sources {
			let files = collect_tree(source, &junk)?;
			tracing::debug!(source = %source.display(), files = files.len(), "rendering tree");

			for relative in files {
				let from = source.join(&relative);
				let to = self.target.join(&relative);
				let bytes = render_file(&from, &self.chain)?;

				match rendered.iter_mut().find(|(path, _)| *path == to) {
					Some(entry) => entry.1 = bytes,
					None => rendered.push((to, bytes)),
				}
			}
		}

		Ok(rendered)
	}
}

fn render_file(from: &Path, chain: &TransformationChain) -> StitchResult<Vec<u8>> {
	match FileKind::of(from)? {
		FileKind::Text => {
			let content = read_source(from)?;
			let output = normalize_line_endings(&chain.apply_from(&content, from)?);
			Ok(output.into_bytes())
		}
		FileKind::Binary => std::fs::read(from).map_err(|e| StitchError::read(from, &e)),
	}
}

/// Matcher for [`JUNK_FILE_PATTERNS`], applied to file names.
pub fn junk_matcher() -> GlobSet {
	let mut builder = GlobSetBuilder::new();
	for pattern in JUNK_FILE_PATTERNS {
		if let Ok(glob) = Glob::new(pattern) {
			builder.add(glob);
		}
	}
	builder.build().unwrap_or_else(|_| GlobSet::empty())
}

/// List the files below `root` as sorted relative paths, skipping junk.
pub fn collect_tree(root: &Path, junk: &GlobSet) -> StitchResult<Vec<PathBuf>> {
	if !root.is_dir() {
		return Err(StitchError::FileRead {
			path: root.display().to_string(),
			reason: "not a directory".to_string(),
		});
	}

	let mut files = Vec::new();
	walk(root, root, junk, &mut files)?;
	files.sort();
	Ok(files)
}

fn walk(root: &Path, dir: &Path, junk: &GlobSet, files: &mut Vec<PathBuf>) -> StitchResult<()> {
	let entries = std::fs::read_dir(dir).map_err(|e| StitchError::read(dir, &e))?;

	for entry in entries {
		let entry = entry?;
		let path = entry.path();
		let file_type = entry.file_type()?;

		if file_type.is_dir() {
			walk(root, &path, junk, files)?;
			continue;
		}

		// Symlinked files are followed, symlinked directories are not.
		if file_type.is_symlink() && path.is_dir() {
			tracing::debug!(path = %path.display(), "skipping symlinked directory");
			continue;
		}

		let is_junk = path.file_name().is_some_and(|name| junk.is_match(name));
		if is_junk {
			tracing::debug!(path = %path.display(), "skipping junk file");
			continue;
		}

		if let Ok(relative) = path.strip_prefix(root) {
			files.push(relative.to_path_buf());
		}
	}

	Ok(())
}
