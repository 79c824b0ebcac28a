//! Use-site argument parsing.

use crate::scan::Scanner;

/// Parse the angle-bracketed argument list of a use site.
///
/// `lt_pos` must be the offset of the `<`. Returns the trimmed textual
/// arguments and the offset just past the matching `>`. Commas split only
/// at angle depth one; nested `<...>`, strings and comments are consumed
/// opaquely. An unterminated list yields whatever arguments were completed
/// and an offset at the end of the text.
pub fn parse_arguments(text: &str, lt_pos: usize) -> (Vec<String>, usize) {
    let mut args = Vec::new();
    let mut s = Scanner::at(text, lt_pos);

    if s.peek() != Some(b'<') {
        return (args, lt_pos);
    }
    s.advance();

    let mut depth = 1usize;
    let mut token_start = s.pos();

    while let Some(c) = s.peek() {
        match c {
            b'"' | b'\'' => {
                s.skip_string(c);
                continue;
            }
            b'/' => {
                if s.skip_comment() {
                    continue;
                }
            }
            b'<' => depth += 1,
            b'>' => {
                depth -= 1;
                if depth == 0 {
                    push_trimmed(&mut args, &text[token_start..s.pos()]);
                    s.advance();
                    break;
                }
            }
            b',' if depth == 1 => {
                push_trimmed(&mut args, &text[token_start..s.pos()]);
                token_start = s.pos() + 1;
            }
            _ => {}
        }
        s.advance();
    }

    (args, s.pos())
}

fn push_trimmed(args: &mut Vec<String>, token: &str) {
    let token = token.trim();
    if !token.is_empty() {
        args.push(token.to_string());
    }
}
