//! `import` directive extraction.
//!
//! Imports are discovered in the processed text, after transformation, so
//! the tree driver follows exactly the edges a downstream consumer of the
//! staging tree would see.

use std::path::{Path, PathBuf};

use crate::driver::canonicalize_path;
use crate::scan::{is_ident_char, is_ident_start, Scanner};

/// Collect the resolved targets of every `import "path"` directive.
///
/// The scan is string- and comment-aware, so directives inside literals or
/// comments are ignored. The quoted path is taken as written (backslash
/// escapes only guard the closing quote) and resolved against the
/// directory of `file_path`.
pub fn extract_imports(text: &str, file_path: &Path) -> Vec<PathBuf> {
    let mut imports = Vec::new();
    let mut s = Scanner::new(text);

    while let Some(c) = s.peek() {
        match c {
            b'"' | b'\'' => s.skip_string(c),
            b'/' => {
                if !s.skip_comment() {
                    s.advance();
                }
            }
            c if is_ident_start(c) => {
                let start = s.pos();
                while s.peek().is_some_and(is_ident_char) {
                    s.advance();
                }
                if &text[start..s.pos()] != "import" {
                    continue;
                }

                s.skip_trivia();
                if s.peek() != Some(b'"') {
                    continue;
                }
                s.advance();

                let path_start = s.pos();
                while let Some(b) = s.peek() {
                    if b == b'"' {
                        break;
                    }
                    if b == b'\\' {
                        s.advance_by(2);
                    } else {
                        s.advance();
                    }
                }

                if s.pos() > path_start {
                    imports.push(resolve_import(file_path, &text[path_start..s.pos()]));
                }
                if s.peek() == Some(b'"') {
                    s.advance();
                }
            }
            _ => s.advance(),
        }
    }

    imports
}

fn resolve_import(file_path: &Path, imported: &str) -> PathBuf {
    let base = file_path.parent().unwrap_or_else(|| Path::new(""));
    canonicalize_path(&base.join(imported))
}
