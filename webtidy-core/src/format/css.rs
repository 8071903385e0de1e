//! CSS minification and prettification.
//!
//! A quote- and comment-aware scanner, not a parser. Minification
//! collapses whitespace and drops what is safely droppable. A space
//! ahead of `:` survives outside declaration blocks, where removing it
//! would turn a descendant selector into a pseudo-class.

use crate::config::CssConfig;
use crate::format::{syntax_error, FormatError};

const INDENT: &str = "  ";

/// Minify a stylesheet.
pub fn minify(src: &str, config: &CssConfig) -> Result<String, FormatError> {
    let chars: Vec<(usize, char)> = src.char_indices().collect();
    let mut out = String::with_capacity(src.len());
    let mut i = 0;
    let mut pending_space = false;
    let mut pending_semi = false;

    while i < chars.len() {
        let (offset, c) = chars[i];
        match c {
            '/' if matches!(chars.get(i + 1), Some((_, '*'))) => {
                let end = find_comment_end(src, offset)?;
                if config.strip_comments {
                    // A dropped comment still separates identifiers
                    let next = advance_past(&chars, i, end);
                    let prev_ident = !pending_semi
                        && out.chars().last().map(is_ident_char).unwrap_or(false);
                    let next_ident = chars
                        .get(next)
                        .map(|&(_, c)| is_ident_char(c))
                        .unwrap_or(false);
                    if prev_ident && next_ident {
                        pending_space = true;
                    }
                    i = next;
                } else {
                    flush_semi(&mut out, &mut pending_semi, '/');
                    flush_space(&mut out, &mut pending_space, '/');
                    out.push_str(&src[offset..end]);
                    i = advance_past(&chars, i, end);
                }
            }
            '"' | '\'' => {
                let end = scan_string(src, &chars, i)?;
                flush_semi(&mut out, &mut pending_semi, c);
                flush_space(&mut out, &mut pending_space, c);
                out.push_str(&src[offset..offset_at(&chars, src, end)]);
                i = end;
            }
            c if c.is_whitespace() => {
                pending_space = true;
                i += 1;
            }
            ';' => {
                pending_semi = true;
                pending_space = false;
                i += 1;
            }
            _ => {
                flush_semi(&mut out, &mut pending_semi, c);
                if pending_space {
                    pending_space = false;
                    let keep_before = !matches!(c, '{' | '}' | ',')
                        && !(c == ':' && in_declaration(src, offset));
                    let keep_after = !matches!(
                        out.chars().last(),
                        None | Some('{') | Some('}') | Some(';') | Some(',') | Some(':')
                    );
                    if keep_before && keep_after {
                        out.push(' ');
                    }
                }
                out.push(c);
                i += 1;
            }
        }
    }
    if pending_semi {
        out.push(';');
    }
    Ok(out)
}

/// Prettify a stylesheet into one declaration per line.
///
/// Comments are kept: a comment between statements gets its own line,
/// one inside a declaration stays attached to it.
pub fn prettify(src: &str) -> Result<String, FormatError> {
    let chars: Vec<(usize, char)> = src.char_indices().collect();
    let mut out = String::with_capacity(src.len() * 2);
    let mut chunk = String::new();
    let mut depth: usize = 0;
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        match c {
            '/' if matches!(chars.get(i + 1), Some((_, '*'))) => {
                let end = find_comment_end(src, offset)?;
                let comment = &src[offset..end];
                if chunk.trim().is_empty() {
                    chunk.clear();
                    write_line(&mut out, depth, comment);
                } else {
                    if !chunk.ends_with(' ') {
                        chunk.push(' ');
                    }
                    chunk.push_str(comment);
                }
                i = advance_past(&chars, i, end);
            }
            '"' | '\'' => {
                let end = scan_string(src, &chars, i)?;
                chunk.push_str(&src[offset..offset_at(&chars, src, end)]);
                i = end;
            }
            c if c.is_whitespace() => {
                if !chunk.is_empty() && !chunk.ends_with(' ') {
                    chunk.push(' ');
                }
                i += 1;
            }
            '{' => {
                let header = chunk.trim().to_string();
                chunk.clear();
                let mut line = header;
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push('{');
                write_line(&mut out, depth, &line);
                depth += 1;
                i += 1;
            }
            '}' => {
                let leftover = normalize_declaration(&chunk);
                chunk.clear();
                if !leftover.is_empty() {
                    write_line(&mut out, depth, &format!("{};", leftover));
                }
                if depth == 0 {
                    return Err(syntax_error(src, offset, "Unexpected '}'"));
                }
                depth -= 1;
                write_line(&mut out, depth, "}");
                if depth == 0 {
                    out.push('\n');
                }
                i += 1;
            }
            ';' => {
                let declaration = normalize_declaration(&chunk);
                chunk.clear();
                if !declaration.is_empty() {
                    write_line(&mut out, depth, &format!("{};", declaration));
                }
                i += 1;
            }
            _ => {
                chunk.push(c);
                i += 1;
            }
        }
    }
    if depth > 0 {
        return Err(syntax_error(src, src.len(), "Unclosed block"));
    }
    let trailing = chunk.trim();
    if !trailing.is_empty() {
        write_line(&mut out, 0, trailing);
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    Ok(out)
}

fn flush_semi(out: &mut String, pending: &mut bool, next: char) {
    if *pending {
        *pending = false;
        if next != '}' {
            out.push(';');
        }
    }
}

fn flush_space(out: &mut String, pending: &mut bool, next: char) {
    if *pending {
        *pending = false;
        let keep_after = !matches!(
            out.chars().last(),
            None | Some('{') | Some('}') | Some(';') | Some(',') | Some(':')
        );
        if keep_after && !matches!(next, '{' | '}' | ',') {
            out.push(' ');
        }
    }
}

/// Whether the position at `from` sits inside a declaration block. The
/// next unquoted `{`, `}` or `;` decides: hitting `{` first means we
/// are still in a selector or at-rule prelude.
fn in_declaration(src: &str, from: usize) -> bool {
    let chars: Vec<(usize, char)> = src[from..].char_indices().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i].1 {
            '/' if matches!(chars.get(i + 1), Some((_, '*'))) => {
                let tail = &src[from + chars[i].0 + 2..];
                match tail.find("*/") {
                    Some(p) => {
                        let end = from + chars[i].0 + 2 + p + 2;
                        while i < chars.len() && from + chars[i].0 < end {
                            i += 1;
                        }
                    }
                    None => return true,
                }
            }
            '\'' | '"' => {
                let quote = chars[i].1;
                i += 1;
                while i < chars.len() {
                    match chars[i].1 {
                        '\\' => i += 2,
                        c if c == quote => {
                            i += 1;
                            break;
                        }
                        _ => i += 1,
                    }
                }
            }
            '{' => return false,
            '}' | ';' => return true,
            _ => i += 1,
        }
    }
    true
}

fn find_comment_end(src: &str, start: usize) -> Result<usize, FormatError> {
    match src[start + 2..].find("*/") {
        Some(pos) => Ok(start + 2 + pos + 2),
        None => Err(syntax_error(src, start, "Unterminated comment")),
    }
}

/// Scan a quoted string starting at `start`; returns the index just
/// past the closing quote.
fn scan_string(src: &str, chars: &[(usize, char)], start: usize) -> Result<usize, FormatError> {
    let quote = chars[start].1;
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i].1 {
            '\\' => i += 2,
            '\n' => break,
            c if c == quote => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err(syntax_error(src, chars[start].0, "Unterminated string"))
}

fn offset_at(chars: &[(usize, char)], src: &str, i: usize) -> usize {
    chars.get(i).map(|&(o, _)| o).unwrap_or(src.len())
}

fn advance_past(chars: &[(usize, char)], mut i: usize, byte_end: usize) -> usize {
    while i < chars.len() && chars[i].0 < byte_end {
        i += 1;
    }
    i
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// Normalize `prop : value` into `prop: value`. The left side must
/// look like a property name; this keeps colons inside at-rule URLs
/// from being treated as declaration separators.
fn normalize_declaration(chunk: &str) -> String {
    let trimmed = chunk.trim();
    if let Some((prop, value)) = trimmed.split_once(':') {
        let prop = prop.trim_end();
        let value = value.trim_start();
        if !prop.is_empty() && prop.chars().all(is_ident_char) && !value.is_empty() {
            return format!("{}: {}", prop, value);
        }
    }
    trimmed.to_string()
}

fn write_line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}
