//! Specialization construction, caching and name sanitization.
//!
//! A specialization is the monomorphized declaration for one concrete
//! argument tuple. Each definition memoizes its specializations keyed by
//! `(scope hint, argument tuple)`, so repeated use sites are answered
//! from the cache and emitted at most once per scope frame.

use crate::eval::reduce_bracket_expressions;
use crate::template::{replace_parameters, TemplateDefinition};

/// The monomorphized form of a definition for one argument tuple.
#[derive(Debug, Clone)]
pub struct Specialization {
    /// Raw textual arguments in source order.
    pub arguments: Vec<String>,
    /// Identifier-safe declaration name.
    pub sanitized_name: String,
    /// `between` with parameters substituted.
    pub between: String,
    /// Body with parameters substituted and brackets reduced.
    pub body: String,
    /// `closing` with parameters substituted.
    pub closing: String,
}

/// Fetch or create the specialization of `def` for `args`.
///
/// The scope hint comes from the use site's qualification prefix when
/// present, else the definition's own scope, else the scope the use site
/// appears in. Returns the index into `def.specializations`.
pub fn intern_specialization(
    def: &mut TemplateDefinition,
    args: &[String],
    use_prefix: &str,
    current_scope: &str,
) -> usize {
    let scope_hint = if !use_prefix.is_empty() {
        sanitize_scope(use_prefix)
    } else if !def.scope_path.is_empty() {
        sanitize_scope(&def.scope_path)
    } else {
        sanitize_scope(current_scope)
    };

    let signature = format!("{}|{}", scope_hint, args.join("\u{1f}"));
    if let Some(&index) = def.specialization_index.get(&signature) {
        return index;
    }

    let mut sanitized_name = def.name.clone();
    if !scope_hint.is_empty() {
        sanitized_name.push('_');
        sanitized_name.push_str(&scope_hint);
    }
    for arg in args {
        let part = sanitize_token(arg);
        if !part.starts_with('_') {
            sanitized_name.push('_');
        }
        sanitized_name.push_str(&part);
    }

    let mut body = replace_parameters(&def.body, &def.parameters, args);
    reduce_bracket_expressions(&mut body);

    let spec = Specialization {
        arguments: args.to_vec(),
        sanitized_name,
        between: replace_parameters(&def.between, &def.parameters, args),
        body,
        closing: replace_parameters(&def.closing, &def.parameters, args),
    };

    let index = def.specializations.len();
    def.specialization_index.insert(signature, index);
    def.specializations.push(spec);
    index
}

/// Convert an argument token into an identifier-safe name fragment.
///
/// Alphanumerics and `_` pass through. `*`, `&`, `[`/`]`, `<` and `>`
/// become `ptr`, `ref`, `arr`, `lt` and `gt`, each set off by single `_`
/// separators; every other byte collapses into a single separator. A
/// leading `_` is stripped, a leading digit gains a `_` prefix, and an
/// empty result becomes `T`.
pub fn sanitize_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len() + 8);

    for c in token.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            match c {
                '*' => push_word(&mut out, "ptr"),
                '&' => push_word(&mut out, "ref"),
                '[' | ']' => push_word(&mut out, "arr"),
                '<' => push_word(&mut out, "lt"),
                '>' => push_word(&mut out, "gt"),
                '.' => push_word(&mut out, "."),
                _ => push_separator(&mut out),
            }
        }
    }

    if out.starts_with('_') {
        out.remove(0);
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if out.is_empty() {
        out.push('T');
    }
    out.replace('.', "_")
}

/// Flatten a scope path into an identifier-safe hint.
pub fn sanitize_scope(path: &str) -> String {
    path.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn push_separator(out: &mut String) {
    if !out.is_empty() && !out.ends_with('_') {
        out.push('_');
    }
}

fn push_word(out: &mut String, word: &str) {
    push_separator(out);
    out.push_str(word);
    push_separator(out);
}
