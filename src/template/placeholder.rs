//! Placeholder generation.
//!
//! A placeholder is the non-parametric stand-in emitted once per
//! definition in place of the parametric original. It keeps the declared
//! shape readable by a consumer that knows nothing about parameters: type
//! parameters erase to `void*` (or to `void` when the source already
//! derives a pointer from them, preserving the pointer's size category)
//! and non-type parameters erase to `1`.

use crate::eval::reduce_bracket_expressions;
use crate::scan::is_ident_char;
use crate::template::{find_identifier, TemplateDefinition, TemplateParameterKind};

/// Render the complete placeholder declaration for a definition.
///
/// The declaration is preceded by the definition's recorded indentation
/// and followed by a newline when the body does not already end one.
pub fn render_placeholder(def: &TemplateDefinition) -> String {
    let body = placeholder_body(def);
    let mut out = String::with_capacity(
        def.indentation.len() + def.keyword.len() + def.name.len() + def.between.len()
            + body.len() + def.closing.len() + 4,
    );
    out.push_str(&def.indentation);
    out.push_str(&def.keyword);
    out.push(' ');
    out.push_str(&def.name);
    out.push_str(&def.between);
    out.push('{');
    out.push_str(&body);
    out.push_str(&def.closing);
    if !body.is_empty()
        && !body.ends_with('\n')
        && !def.closing.starts_with('\n')
    {
        out.push('\n');
    }
    out
}

/// Rewrite a definition body with every parameter erased.
///
/// Type parameters become `void` when followed, past whitespace and any
/// `const`/`volatile` qualifier run, by a `*`; otherwise `void*`. Non-type
/// parameters become `1`. Bracket expressions are reduced once afterwards.
pub fn placeholder_body(def: &TemplateDefinition) -> String {
    let mut result = def.body.clone();

    for param in &def.parameters {
        let mut search = 0;
        while let Some(found) = find_identifier(&result, &param.name, search) {
            match param.kind {
                TemplateParameterKind::Type => {
                    let after = found + param.name.len();
                    let lookahead = skip_qualifiers(result.as_bytes(), after);
                    let pointer_after = result.as_bytes().get(lookahead) == Some(&b'*');
                    let replacement = if pointer_after { "void" } else { "void*" };
                    result.replace_range(found..after, replacement);
                    search = found + replacement.len();
                }
                TemplateParameterKind::NonType => {
                    result.replace_range(found..found + param.name.len(), "1");
                    search = found + 1;
                }
            }
        }
    }

    reduce_bracket_expressions(&mut result);
    result
}

/// Skip whitespace and any run of `const`/`volatile` qualifiers.
fn skip_qualifiers(bytes: &[u8], mut pos: usize) -> usize {
    pos = skip_spaces(bytes, pos);
    loop {
        let mut advanced = false;
        for qualifier in ["const", "volatile"] {
            if word_at(bytes, pos, qualifier) {
                pos = skip_spaces(bytes, pos + qualifier.len());
                advanced = true;
            }
        }
        if !advanced {
            break;
        }
    }
    pos
}

fn skip_spaces(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

fn word_at(bytes: &[u8], pos: usize, word: &str) -> bool {
    let end = pos + word.len();
    if end > bytes.len() || &bytes[pos..end] != word.as_bytes() {
        return false;
    }
    end >= bytes.len() || !is_ident_char(bytes[end])
}
