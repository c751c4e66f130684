use std::fmt::Display;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::StitchError;
use crate::StitchResult;
use crate::files::display_path;
use crate::files::read_source;

/// Extensions of files inspected by [`lint_paths`].
pub const LINT_EXTENSIONS: &[&str] = &["js", "json", "html"];

const DOC_COMMENT_OPEN: &str = "/**";
const COMMENT_CLOSE: &str = "*/";
const PRIVATE_TAG: &str = "@private";
const RETURN_TAG: &str = "@return ";

/// The kinds of problem the linter reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintKind {
	TabCharacter,
	ReturnTag,
	MissingPrivateTag,
	MissingDocComment,
}

impl LintKind {
	pub fn message(self) -> &'static str {
		match self {
			Self::TabCharacter => "tab character found, indent with spaces",
			Self::ReturnTag => "`@return` tag found, use `@returns`",
			Self::MissingPrivateTag => "private member documented without `@private`",
			Self::MissingDocComment => "public function has no doc comment",
		}
	}
}

/// A single finding, located by file and 1-indexed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintDiagnostic {
	pub path: PathBuf,
	pub line: usize,
	pub kind: LintKind,
}

impl Display for LintDiagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}:{}: {}",
			display_path(&self.path),
			self.line,
			self.kind.message()
		)
	}
}

/// Lint every supported file under `paths`, skipping files matched by the
/// gitignore-style `exclude` patterns. Paths are relative to `root`.
pub fn lint_paths(
	root: &Path,
	paths: &[PathBuf],
	exclude: &[String],
) -> StitchResult<Vec<LintDiagnostic>> {
	let exclude = build_exclude_matcher(root, exclude)?;
	let mut files = Vec::new();

	for path in paths {
		let path = root.join(path);
		if path.is_dir() {
			collect_lint_files(&path, &exclude, &mut files)?;
		} else if path.is_file() && is_lintable(&path) && !is_excluded(&exclude, &path, false) {
			files.push(path);
		}
	}

	files.sort();
	files.dedup();

	let mut diagnostics = Vec::new();
	for file in files {
		let content = read_source(&file)?;
		let relative = file.strip_prefix(root).unwrap_or(&file);
		diagnostics.extend(lint_source(relative, &content));
	}

	tracing::debug!(findings = diagnostics.len(), "lint finished");

	Ok(diagnostics)
}

/// Lint a single file's contents. `path` is only used to label findings.
pub fn lint_source(path: &Path, content: &str) -> Vec<LintDiagnostic> {
	let mut diagnostics = Vec::new();
	let mut report = |line: usize, kind: LintKind| {
		diagnostics.push(LintDiagnostic {
			path: path.to_path_buf(),
			line,
			kind,
		});
	};

	let lines: Vec<&str> = content.lines().collect();
	// Text of the doc comment that closed most recently, cleared by the next
	// non-blank line.
	let mut pending_doc: Option<String> = None;
	let mut index = 0;

	while index < lines.len() {
		let line = lines[index];
		let number = index + 1;

		if line.contains('\t') {
			report(number, LintKind::TabCharacter);
		}

		if line.contains(RETURN_TAG) {
			report(number, LintKind::ReturnTag);
		}

		let trimmed = line.trim();

		if trimmed.starts_with(DOC_COMMENT_OPEN) {
			let mut doc = String::from(line);
			let mut end = index;
			while !lines[end].contains(COMMENT_CLOSE) && end + 1 < lines.len() {
				end += 1;
				let inner = lines[end];
				if inner.contains('\t') {
					report(end + 1, LintKind::TabCharacter);
				}
				if inner.contains(RETURN_TAG) {
					report(end + 1, LintKind::ReturnTag);
				}
				doc.push('\n');
				doc.push_str(inner);
			}
			pending_doc = Some(doc);
			index = end + 1;
			continue;
		}

		if trimmed.is_empty() {
			index += 1;
			continue;
		}

		if let Some(declaration) = parse_function_declaration(line) {
			match &pending_doc {
				Some(doc) if declaration.is_private && !doc.contains(PRIVATE_TAG) => {
					report(number, LintKind::MissingPrivateTag);
				}
				None if !declaration.is_private && declaration.top_level => {
					report(number, LintKind::MissingDocComment);
				}
				_ => {}
			}
		}

		pending_doc = None;
		index += 1;
	}

	diagnostics
}

struct FunctionDeclaration {
	is_private: bool,
	top_level: bool,
}

/// Recognize `function name(`, `a.b.name = function` and `name: function`.
fn parse_function_declaration(line: &str) -> Option<FunctionDeclaration> {
	let top_level = !line.starts_with([' ', '\t']);
	let trimmed = line.trim();

	let name = if let Some(rest) = trimmed.strip_prefix("function ") {
		rest.split('(').next()?.trim()
	} else if let Some((left, right)) = trimmed.split_once('=') {
		if !right.trim_start().starts_with("function") {
			return None;
		}
		left.trim().trim_start_matches("var ").rsplit('.').next()?.trim()
	} else if let Some((left, right)) = trimmed.split_once(':') {
		if !right.trim_start().starts_with("function") {
			return None;
		}
		left.trim()
	} else {
		return None;
	};

	if name.is_empty() || !name.chars().all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$') {
		return None;
	}

	Some(FunctionDeclaration {
		is_private: name.starts_with('_'),
		top_level,
	})
}

fn is_lintable(path: &Path) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| LINT_EXTENSIONS.contains(&ext))
}

fn is_excluded(exclude: &Gitignore, path: &Path, is_dir: bool) -> bool {
	exclude.matched(path, is_dir).is_ignore()
}

fn build_exclude_matcher(root: &Path, patterns: &[String]) -> StitchResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			StitchError::ConfigParse(format!("invalid lint exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| StitchError::ConfigParse(format!("failed to build lint exclude rules: {e}")))
}

fn collect_lint_files(dir: &Path, exclude: &Gitignore, files: &mut Vec<PathBuf>) -> StitchResult<()> {
	let entries = std::fs::read_dir(dir).map_err(|e| StitchError::read(dir, &e))?;

	for entry in entries {
		let entry = entry?;
		let path = entry.path();
		let file_type = entry.file_type()?;
		let is_dir = file_type.is_dir();

		if file_type.is_symlink() && path.is_dir() {
			continue;
		}

		let hidden = path
			.file_name()
			.and_then(|name| name.to_str())
			.is_some_and(|name| name.starts_with('.'));
		if hidden || is_excluded(exclude, &path, is_dir) {
			continue;
		}

		if is_dir {
			collect_lint_files(&path, exclude, files)?;
		} else if is_lintable(&path) {
			files.push(path);
		}
	}

	Ok(())
}
