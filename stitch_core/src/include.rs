use std::ops::Range;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use derive_more::Deref;
use derive_more::DerefMut;

use crate::StitchError;
use crate::StitchResult;
use crate::files::read_source;
use crate::header::strip_license_header;
use crate::placeholder::PLACEHOLDER_TERMINATOR;

/// Marker word that opens both an include directive and an inline
/// placeholder.
pub const DIRECTIVE_MARKER: &str = "#INCLUDE ";

/// Optional terminator accepted at the end of a directive line.
pub const DIRECTIVE_TERMINATOR: char = ';';

/// Prefix used to echo a resolved directive back into the output as a line
/// comment.
pub const DIRECTIVE_ECHO_PREFIX: &str = "//";

/// An `#INCLUDE <file>` directive found in host text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
	/// The referenced file name, relative to a search root.
	pub name: String,
	/// Byte span of the directive line, excluding its line terminator.
	pub span: Range<usize>,
	/// 1-indexed line number of the directive.
	pub line: usize,
}

impl IncludeDirective {
	/// The directive line exactly as written in `source`.
	pub fn text<'a>(&self, source: &'a str) -> &'a str {
		&source[self.span.clone()]
	}
}

/// Scan `content` for include directives, in order of appearance.
///
/// A directive occupies a whole line: the line starts with `#INCLUDE `
/// followed by the file name, optionally terminated by `;`. Lines where the
/// argument contains `#` are inline placeholders and are skipped.
pub fn scan_directives(content: &str) -> Vec<IncludeDirective> {
	let mut directives = Vec::new();
	let mut offset = 0;

	for (index, line) in content.split('\n').enumerate() {
		let line_start = offset;
		offset += line.len() + 1;

		let line = line.strip_suffix('\r').unwrap_or(line);
		let Some(name) = parse_directive_line(line) else {
			continue;
		};

		directives.push(IncludeDirective {
			name: name.to_string(),
			span: line_start..line_start + line.len(),
			line: index + 1,
		});
	}

	directives
}

/// Parse one line as a directive, returning the referenced file name.
fn parse_directive_line(line: &str) -> Option<&str> {
	let argument = line.strip_prefix(DIRECTIVE_MARKER)?.trim_end();
	let argument = argument
		.strip_suffix(DIRECTIVE_TERMINATOR)
		.unwrap_or(argument)
		.trim();

	if argument.is_empty() || argument.contains(PLACEHOLDER_TERMINATOR) {
		return None;
	}

	Some(argument)
}

/// Ordered list of directories searched when resolving a directive. The first
/// root that contains the requested file wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct SearchPath(
	#[deref]
	#[deref_mut]
	Vec<PathBuf>,
);

impl SearchPath {
	pub fn new(roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
		Self(roots.into_iter().map(Into::into).collect())
	}

	/// Find `name` in the first root that contains it.
	pub fn locate(&self, name: &str) -> Option<PathBuf> {
		self.iter()
			.map(|root| root.join(name))
			.find(|candidate| candidate.is_file())
	}

	/// Human-readable list of the roots, used in lookup errors.
	pub fn describe(&self) -> String {
		let roots: Vec<String> = self
			.iter()
			.map(|root| format!("`{}`", root.display()))
			.collect();
		format!("[{}]", roots.join(", "))
	}
}

impl<P: Into<PathBuf>> FromIterator<P> for SearchPath {
	fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
		Self::new(iter)
	}
}

/// Inline every `#INCLUDE` directive in `content`.
///
/// Each directive is replaced with a commented echo of itself, a blank line
/// and the referenced file's contents, with its license header stripped and
/// surrounding whitespace trimmed. Included files may contain directives of
/// their own; re-entering a file that is still being expanded fails with
/// [`StitchError::IncludeCycle`].
pub fn resolve_includes(content: &str, search_path: &SearchPath) -> StitchResult<String> {
	let mut stack = Vec::new();
	resolve_with_stack(content, search_path, &mut stack)
}

/// Like [`resolve_includes`], with `origin` (the file `content` was read
/// from) already on the expansion stack.
pub fn resolve_includes_from(
	content: &str,
	search_path: &SearchPath,
	origin: &Path,
) -> StitchResult<String> {
	let mut stack = vec![origin.canonicalize().unwrap_or_else(|_| origin.to_path_buf())];
	resolve_with_stack(content, search_path, &mut stack)
}

fn resolve_with_stack(
	content: &str,
	search_path: &SearchPath,
	stack: &mut Vec<PathBuf>,
) -> StitchResult<String> {
	let directives = scan_directives(content);
	if directives.is_empty() {
		return Ok(content.to_string());
	}

	let mut result = String::with_capacity(content.len());
	let mut cursor = 0;

	for directive in &directives {
		let included = load_include(directive, search_path, stack)?;

		result.push_str(&content[cursor..directive.span.start]);
		result.push_str(DIRECTIVE_ECHO_PREFIX);
		result.push_str(directive.text(content));
		result.push_str("\n\n");
		result.push_str(&included);
		cursor = directive.span.end;
	}

	result.push_str(&content[cursor..]);

	Ok(result)
}

fn load_include(
	directive: &IncludeDirective,
	search_path: &SearchPath,
	stack: &mut Vec<PathBuf>,
) -> StitchResult<String> {
	validate_include_name(&directive.name)?;

	let Some(path) = search_path.locate(&directive.name) else {
		return Err(StitchError::IncludeNotFound {
			name: directive.name.clone(),
			roots: search_path.describe(),
		});
	};

	// Compare canonical paths so `a.js` and `./a.js` count as the same file.
	let key = path.canonicalize().unwrap_or_else(|_| path.clone());
	if stack.contains(&key) {
		let chain: Vec<String> = stack
			.iter()
			.chain(std::iter::once(&key))
			.map(|entry| entry.display().to_string())
			.collect();
		return Err(StitchError::IncludeCycle {
			chain: chain.join(" -> "),
		});
	}

	tracing::debug!(
		name = %directive.name,
		path = %path.display(),
		line = directive.line,
		depth = stack.len(),
		"inlining include"
	);

	let raw = read_source(&path)?;
	let body = strip_license_header(&raw).trim();

	stack.push(key);
	let resolved = resolve_with_stack(body, search_path, stack);
	stack.pop();

	resolved
}

/// Reject names that could escape a search root.
fn validate_include_name(name: &str) -> StitchResult<()> {
	let path = Path::new(name);
	let escapes = path.components().any(|component| {
		matches!(
			component,
			Component::ParentDir | Component::RootDir | Component::Prefix(_)
		)
	});

	if escapes {
		return Err(StitchError::InvalidIncludePath(name.to_string()));
	}

	Ok(())
}
