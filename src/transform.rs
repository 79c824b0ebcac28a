//! Single-pass file transformation.
//!
//! [`process_source`] walks a file once with a [`Scanner`], tracking brace
//! depth and the enclosing namespace/aggregate chain. Template definitions
//! are replaced by their placeholder form; use sites pull a cached
//! specialization, emit its declaration right before the first use in the
//! current scope frame, and rewrite the use to the sanitized name. Bytes
//! that are neither are copied through unchanged, so any input the
//! transformer does not understand survives verbatim.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use crate::imports::extract_imports;
use crate::scan::{is_ident_start, is_type_char, Scanner};
use crate::template::{
    intern_specialization, parse_arguments, parse_definition, render_placeholder,
    DefinitionTable,
};

/// Outcome of transforming one file.
#[derive(Debug, Clone)]
pub struct FileProcessResult {
    /// The rewritten text.
    pub processed: String,
    /// Whether any definition or resolved use site was seen.
    pub had_templates: bool,
    /// Absolute paths named by `import` directives in the processed text.
    pub imports: Vec<PathBuf>,
}

/// One entry of the scope stack.
struct ScopeFrame {
    /// Name of the namespace or aggregate that opened this frame.
    #[allow(dead_code)]
    name: String,
    /// Dot-joined path relative to the file.
    path: String,
    /// Brace depth at which the frame was pushed.
    depth: usize,
    /// Sanitized names already declared inside this frame.
    emitted_specializations: FxHashSet<String>,
}

impl ScopeFrame {
    fn root() -> Self {
        Self {
            name: String::new(),
            path: String::new(),
            depth: 0,
            emitted_specializations: FxHashSet::default(),
        }
    }
}

/// Lookahead state for `namespace`/`struct`/`class` headers.
///
/// Idle until one of the keywords is seen, then expects the scope's name,
/// then its `{`. Any `;`, `}` or other interruption resets it.
#[derive(Default)]
struct PendingScope {
    expect_name: bool,
    expect_brace: bool,
    #[allow(dead_code)]
    keyword: String,
    name: String,
}

impl PendingScope {
    fn after_keyword(keyword: &str) -> Self {
        Self {
            expect_name: true,
            keyword: keyword.to_string(),
            ..Self::default()
        }
    }
}

/// Transform one file's text.
///
/// `path` is only used to resolve `import` directives; no I/O happens
/// here.
pub fn process_source(path: &Path, text: &str) -> FileProcessResult {
    let mut out = String::with_capacity(text.len() + 512);
    let mut table = DefinitionTable::new();
    let mut scopes = vec![ScopeFrame::root()];
    let mut pending = PendingScope::default();
    let mut brace_depth = 0usize;
    let mut had_templates = false;
    let mut s = Scanner::new(text);

    while let Some(c) = s.peek() {
        match c {
            b'"' | b'\'' => {
                let start = s.pos();
                s.skip_string(c);
                out.push_str(&text[start..s.pos()]);
            }

            b'/' if matches!(s.peek_at(1), Some(b'/') | Some(b'*')) => {
                let start = s.pos();
                s.skip_comment();
                out.push_str(&text[start..s.pos()]);
            }

            b'{' => {
                out.push('{');
                s.advance();
                brace_depth += 1;
                if pending.expect_brace {
                    let mut path = scopes
                        .last()
                        .map(|frame| frame.path.clone())
                        .unwrap_or_default();
                    if !pending.name.is_empty() {
                        if !path.is_empty() {
                            path.push('.');
                        }
                        path.push_str(&pending.name);
                    }
                    scopes.push(ScopeFrame {
                        name: std::mem::take(&mut pending.name),
                        path,
                        depth: brace_depth,
                        emitted_specializations: FxHashSet::default(),
                    });
                    pending = PendingScope::default();
                }
            }

            b'}' => {
                out.push('}');
                s.advance();
                brace_depth = brace_depth.saturating_sub(1);
                while scopes.len() > 1
                    && scopes.last().is_some_and(|frame| frame.depth > brace_depth)
                {
                    scopes.pop();
                }
                pending = PendingScope::default();
            }

            b';' => {
                out.push(';');
                s.advance();
                pending = PendingScope::default();
            }

            c if c.is_ascii_whitespace() => {
                out.push(c as char);
                s.advance();
            }

            c if is_type_char(c) => {
                if is_ident_start(c) {
                    if let Some(mut def) = parse_definition(text, s.pos()) {
                        def.scope_path = current_path(&scopes).to_string();
                        had_templates = true;

                        let end = def.end;
                        if !def.placeholder_generated {
                            let placeholder = render_placeholder(&def);
                            out.push_str(&placeholder);
                            if !placeholder.is_empty() && !out.ends_with('\n') {
                                out.push('\n');
                            }
                            def.placeholder_generated = true;
                        }
                        table.insert(def);

                        s.set_pos(end);
                        pending = PendingScope::default();
                        continue;
                    }
                }

                let token_start = s.pos();
                while s.peek().is_some_and(is_type_char) {
                    s.advance();
                }
                let token = &text[token_start..s.pos()];

                if pending.expect_name {
                    pending.name = token.to_string();
                    pending.expect_name = false;
                    pending.expect_brace = true;
                }

                if token == "namespace" || token == "struct" || token == "class" {
                    pending = PendingScope::after_keyword(token);
                    out.push_str(token);
                    continue;
                }

                let mut lookahead = Scanner::at(text, s.pos());
                lookahead.skip_trivia();
                if lookahead.peek() != Some(b'<') {
                    out.push_str(token);
                    continue;
                }

                let (args, args_end) = parse_arguments(text, lookahead.pos());
                if args.is_empty() {
                    out.push_str(token);
                    continue;
                }

                let Some(id) = table.resolve(token, current_path(&scopes)) else {
                    out.push_str(&text[token_start..args_end]);
                    s.set_pos(args_end);
                    continue;
                };

                let use_prefix = token.rfind('.').map_or("", |dot| &token[..dot]);
                let scope_path = current_path(&scopes).to_string();
                let index =
                    intern_specialization(table.get_mut(id), &args, use_prefix, &scope_path);
                let def = table.get(id);
                let spec = &def.specializations[index];

                let frame = scopes.last_mut().expect("scope stack has a root frame");
                if frame
                    .emitted_specializations
                    .insert(spec.sanitized_name.clone())
                {
                    let indent = current_indent(&out);
                    if !out.ends_with('\n') && !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(&indent);
                    out.push_str(&def.keyword);
                    out.push(' ');
                    out.push_str(&spec.sanitized_name);
                    out.push_str(&spec.between);
                    out.push('{');
                    out.push_str(&spec.body);
                    if !spec.closing.trim_start().starts_with('}') {
                        out.push('}');
                    }
                    out.push_str(&spec.closing);
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str(&indent);
                }

                out.push_str(&spec.sanitized_name);
                s.set_pos(args_end);
                had_templates = true;
                pending = PendingScope::default();
            }

            _ => {
                if let Some(ch) = s.advance_char() {
                    out.push(ch);
                }
            }
        }
    }

    let imports = extract_imports(&out, path);
    FileProcessResult {
        processed: out,
        had_templates,
        imports,
    }
}

fn current_path(scopes: &[ScopeFrame]) -> &str {
    scopes.last().map_or("", |frame| frame.path.as_str())
}

/// Whitespace prefix of the output's current (last) line.
fn current_indent(out: &str) -> String {
    let Some(newline) = out.rfind('\n') else {
        return String::new();
    };
    out[newline + 1..]
        .chars()
        .take_while(|&c| c == ' ' || c == '\t')
        .collect()
}
