//! Template definition parsing.
//!
//! A definition is recognized in either of two surface forms:
//!
//! ```text
//! template<typename T, int N> struct Name : Base { ... };
//! struct Name<typename T, int N> : Base { ... };
//! ```
//!
//! Both record the same structure: the declaration keyword and name, the
//! parameter list, the `between` text up to the body's `{`, the body, and
//! the `closing` text through the `}` and optional trailing `;`.

use rustc_hash::FxHashMap;

use crate::scan::{is_ident_char, is_ident_start, Scanner};
use crate::template::Specialization;

/// How a parameter participates in substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateParameterKind {
    /// Stands for a type; erased to `void`/`void*` in placeholders.
    Type,
    /// Stands for a value; erased to `1` in placeholders.
    NonType,
}

/// One declared template parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParameter {
    pub name: String,
    pub kind: TemplateParameterKind,
}

/// A parametric declaration captured from the source.
#[derive(Debug, Clone)]
pub struct TemplateDefinition {
    /// `struct` or `class`, as written.
    pub keyword: String,
    /// The declared identifier.
    pub name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<TemplateParameter>,
    /// Text between the parameter list (or name) and the body's `{`.
    pub between: String,
    /// Text between the body braces, exclusive.
    pub body: String,
    /// Text from the closing `}` through the optional `;` and newline.
    pub closing: String,
    /// Line prefix up to the definition's first column.
    pub indentation: String,
    /// Dot-joined enclosing scope chain at the point of declaration.
    pub scope_path: String,
    /// Byte offset where the definition starts.
    pub start: usize,
    /// Byte offset one past the recorded `closing` text.
    pub end: usize,
    /// Whether the placeholder form has already been emitted.
    pub placeholder_generated: bool,
    /// Specializations in creation order.
    pub specializations: Vec<Specialization>,
    /// Signature string to position in `specializations`.
    pub specialization_index: FxHashMap<String, usize>,
}

impl TemplateDefinition {
    /// The scope-qualified name, e.g. `ns.S.Holder`.
    pub fn full_name(&self) -> String {
        if self.scope_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.scope_path, self.name)
        }
    }
}

/// Try to parse a template definition beginning at `start`.
///
/// Returns `None` when the text is anything else; the caller resumes
/// scanning one character forward. A declaration with an empty parameter
/// list is not a template definition.
pub fn parse_definition(text: &str, start: usize) -> Option<TemplateDefinition> {
    let mut s = Scanner::at(text, start);
    s.skip_trivia();

    // Prefix form carries the parameter list before the keyword.
    let mut params_span = None;
    if s.match_keyword("template") {
        s.advance_by("template".len());
        s.skip_trivia();
        params_span = Some(angle_region(&mut s)?);
        s.skip_trivia();
    }

    let keyword = if s.match_keyword("struct") {
        "struct"
    } else if s.match_keyword("class") {
        "class"
    } else {
        return None;
    };
    s.advance_by(keyword.len());
    s.skip_trivia();

    if !s.peek().is_some_and(is_ident_start) {
        return None;
    }
    let name_start = s.pos();
    while s.peek().is_some_and(is_ident_char) {
        s.advance();
    }
    let name = &text[name_start..s.pos()];

    if params_span.is_none() {
        s.skip_trivia();
        params_span = Some(angle_region(&mut s)?);
    }
    let (params_lo, params_hi) = params_span?;

    let parameters = split_parameters(&text[params_lo..params_hi]);
    if parameters.is_empty() {
        return None;
    }

    let between_start = s.pos();
    seek_body_open(&mut s)?;
    let between = &text[between_start..s.pos()];

    s.advance();
    let body_start = s.pos();
    let body_end = seek_body_close(&mut s)?;
    let body = &text[body_start..body_end];

    let end = closing_extent(text, body_end);
    let closing = &text[body_end..end];

    let indent_start = text[..start].rfind('\n').map_or(0, |i| i + 1);

    Some(TemplateDefinition {
        keyword: keyword.to_string(),
        name: name.to_string(),
        parameters,
        between: between.to_string(),
        body: body.to_string(),
        closing: closing.to_string(),
        indentation: text[indent_start..start].to_string(),
        scope_path: String::new(),
        start,
        end,
        placeholder_generated: false,
        specializations: Vec::new(),
        specialization_index: FxHashMap::default(),
    })
}

/// Consume a `<...>` region, honoring nesting, strings and comments.
///
/// The cursor must sit on the `<`; it ends just past the matching `>`.
/// Returns the byte span of the interior.
fn angle_region(s: &mut Scanner) -> Option<(usize, usize)> {
    if s.peek() != Some(b'<') {
        return None;
    }
    s.advance();
    let lo = s.pos();
    let mut depth = 1usize;
    while let Some(c) = s.peek() {
        match c {
            b'"' | b'\'' => s.skip_string(c),
            b'/' => {
                if !s.skip_comment() {
                    s.advance();
                }
            }
            b'<' => {
                depth += 1;
                s.advance();
            }
            b'>' => {
                depth -= 1;
                if depth == 0 {
                    let hi = s.pos();
                    s.advance();
                    return Some((lo, hi));
                }
                s.advance();
            }
            _ => s.advance(),
        }
    }
    None
}

/// Advance to the first `{` outside strings and comments.
fn seek_body_open(s: &mut Scanner) -> Option<()> {
    while let Some(c) = s.peek() {
        match c {
            b'"' | b'\'' => s.skip_string(c),
            b'/' => {
                if !s.skip_comment() {
                    s.advance();
                }
            }
            b'{' => return Some(()),
            _ => s.advance(),
        }
    }
    None
}

/// Advance past a brace-balanced body; returns the offset of the matching
/// `}` without consuming it.
fn seek_body_close(s: &mut Scanner) -> Option<usize> {
    let mut depth = 1usize;
    while let Some(c) = s.peek() {
        match c {
            b'"' | b'\'' => s.skip_string(c),
            b'/' => {
                if !s.skip_comment() {
                    s.advance();
                }
            }
            b'{' => {
                depth += 1;
                s.advance();
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(s.pos());
                }
                s.advance();
            }
            _ => s.advance(),
        }
    }
    None
}

/// Extent of the closing text: the `}`, up to one newline of whitespace,
/// an optional `;`, and up to one more newline of whitespace.
fn closing_extent(text: &str, body_end: usize) -> usize {
    let bytes = text.as_bytes();
    let mut pos = body_end;
    if bytes.get(pos) == Some(&b'}') {
        pos += 1;
    }
    pos = line_whitespace_extent(bytes, pos);
    if bytes.get(pos) == Some(&b';') {
        pos += 1;
        pos = line_whitespace_extent(bytes, pos);
    }
    pos
}

fn line_whitespace_extent(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        if bytes[pos] == b'\n' {
            pos += 1;
            break;
        }
        pos += 1;
    }
    pos
}

/// Split the interior of a parameter list into parameters.
///
/// Commas are honored only at angle depth zero. Per token, a trailing
/// `= default` (depth-aware) and a trailing `...` are stripped before the
/// longest trailing identifier run becomes the parameter name; the rest of
/// the token is the prefix that decides the kind.
pub fn split_parameters(params: &str) -> Vec<TemplateParameter> {
    let mut result = Vec::new();
    let bytes = params.as_bytes();
    let mut depth = 0usize;
    let mut token_start = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                if let Some(param) = parse_parameter(&params[token_start..i]) {
                    result.push(param);
                }
                token_start = i + 1;
            }
            _ => {}
        }
    }
    if let Some(param) = parse_parameter(&params[token_start..]) {
        result.push(param);
    }
    result
}

fn parse_parameter(token: &str) -> Option<TemplateParameter> {
    let mut cleaned = token.trim();
    if cleaned.is_empty() {
        return None;
    }

    let mut depth = 0usize;
    let mut assign_pos = None;
    for (i, b) in cleaned.bytes().enumerate() {
        match b {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b'=' if depth == 0 => {
                assign_pos = Some(i);
                break;
            }
            _ => {}
        }
    }
    if let Some(i) = assign_pos {
        cleaned = cleaned[..i].trim_end();
    }
    if cleaned.is_empty() {
        return None;
    }

    if let Some(stripped) = cleaned.strip_suffix("...") {
        cleaned = stripped.trim_end();
    }

    let bytes = cleaned.as_bytes();
    let end = bytes.len();
    let mut begin = end;
    while begin > 0 && is_ident_char(bytes[begin - 1]) {
        begin -= 1;
    }
    if begin == end {
        return None;
    }

    let name = cleaned[begin..end].to_string();
    let prefix = cleaned[..begin].trim().to_lowercase();
    let kind = if ["typename", "class", "struct", "template"]
        .iter()
        .any(|k| prefix.contains(k))
    {
        TemplateParameterKind::Type
    } else {
        TemplateParameterKind::NonType
    };

    Some(TemplateParameter { name, kind })
}
