const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";

/// Remove a leading license header from `content`.
///
/// A license header is a block comment that starts at the very first byte of
/// the text and whose terminator is immediately followed by a line break and
/// a blank line:
///
/// ```text
/// /*
///  * Copyright ...
///  */
///
/// function main() {}
/// ```
///
/// Everything up to and including the blank line is removed and the
/// remainder is returned untouched. When the text does not start with such a
/// block, it is returned unchanged. Block comments later in the file are
/// never considered.
pub fn strip_license_header(content: &str) -> &str {
	match license_header_len(content) {
		Some(len) => &content[len..],
		None => content,
	}
}

/// Byte length of the license header at the start of `content`, including
/// the trailing blank line, or `None` when there is no header.
pub fn license_header_len(content: &str) -> Option<usize> {
	if !content.starts_with(COMMENT_OPEN) {
		return None;
	}

	let body_start = COMMENT_OPEN.len();
	let close = body_start + content[body_start..].find(COMMENT_CLOSE)?;
	let mut cursor = close + COMMENT_CLOSE.len();

	cursor += line_break_len(&content[cursor..])?;
	cursor += content[cursor..]
		.bytes()
		.take_while(|byte| matches!(byte, b' ' | b'\t'))
		.count();
	cursor += line_break_len(&content[cursor..])?;

	Some(cursor)
}

fn line_break_len(rest: &str) -> Option<usize> {
	if rest.starts_with("\r\n") {
		Some(2)
	} else if rest.starts_with('\n') {
		Some(1)
	} else {
		None
	}
}
