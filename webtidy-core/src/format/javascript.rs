//! JavaScript minification and prettification.
//!
//! A conservative token scanner. Minification collapses whitespace but
//! keeps one newline wherever the source had a line break, so automatic
//! semicolon insertion behaves exactly as before. Prettification
//! re-indents lines by bracket depth without reflowing anything.
//! String, template and regex bodies pass through byte for byte.

use crate::config::JsConfig;
use crate::format::{syntax_error, FormatError};

const INDENT: &str = "\t";

/// Words after which a `/` opens a regex literal rather than dividing
const REGEX_PRECEDING_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case",
    "do", "else", "yield", "await",
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenKind {
    Whitespace { newline: bool },
    LineComment,
    BlockComment,
    Str,
    Template,
    Regex,
    Word,
    Punct(char),
}

#[derive(Debug, Clone, Copy)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
}

/// Last significant token, for the regex-or-division decision
enum Prev {
    None,
    Word(usize, usize),
    Punct(char),
    Operand,
}

/// Minify a script.
pub fn minify(src: &str, config: &JsConfig) -> Result<String, FormatError> {
    enum Separator {
        Space,
        Newline,
    }

    let tokens = tokenize(src)?;
    let mut out = String::with_capacity(src.len());
    let mut pending: Option<Separator> = None;

    let mut index = 0;
    while index < tokens.len() {
        let token = tokens[index];
        let text = &src[token.start..token.end];
        match token.kind {
            TokenKind::Whitespace { newline } => {
                let upgrade = newline || matches!(pending, Some(Separator::Newline));
                pending = Some(if upgrade {
                    Separator::Newline
                } else {
                    Separator::Space
                });
            }
            TokenKind::LineComment => {
                if !config.strip_comments {
                    match pending.take() {
                        Some(Separator::Newline) if !out.is_empty() => out.push('\n'),
                        Some(Separator::Space) if !out.is_empty() => out.push(' '),
                        _ => {}
                    }
                    out.push_str(text);
                    // whatever follows must start a fresh line
                    pending = Some(Separator::Newline);
                }
            }
            TokenKind::BlockComment => {
                if config.strip_comments {
                    // a multi-line comment counts as a line terminator
                    if text.contains('\n') {
                        pending = Some(Separator::Newline);
                    } else if pending.is_none() {
                        let prev_word =
                            out.chars().last().map(is_word_char).unwrap_or(false);
                        let next_word = tokens
                            .get(index + 1)
                            .map(|t| src[t.start..t.end].starts_with(is_word_char))
                            .unwrap_or(false);
                        if prev_word && next_word {
                            pending = Some(Separator::Space);
                        }
                    }
                } else {
                    match pending.take() {
                        Some(Separator::Newline) if !out.is_empty() => out.push('\n'),
                        Some(Separator::Space) if !out.is_empty() => out.push(' '),
                        _ => {}
                    }
                    out.push_str(text);
                }
            }
            _ => {
                let first = text.chars().next().unwrap_or(' ');
                match pending.take() {
                    Some(Separator::Newline) if !out.is_empty() => out.push('\n'),
                    Some(Separator::Space) => {
                        if needs_space(out.chars().last(), first) {
                            out.push(' ');
                        }
                    }
                    _ => {}
                }
                out.push_str(text);
            }
        }
        index += 1;
    }
    Ok(out)
}

/// Prettify a script by re-indenting each line to its bracket depth.
///
/// Lines that begin inside a template literal, string continuation or
/// block comment are left untouched.
pub fn prettify(src: &str) -> Result<String, FormatError> {
    struct LineStart {
        depth: i32,
        in_token: bool,
    }

    let tokens = tokenize(src)?;
    let mut line_starts = vec![LineStart {
        depth: 0,
        in_token: false,
    }];
    let mut depth: i32 = 0;

    for token in &tokens {
        let text = &src[token.start..token.end];
        if let TokenKind::Punct(c) = token.kind {
            match c {
                '{' | '[' | '(' => depth += 1,
                '}' | ']' | ')' => depth -= 1,
                _ => {}
            }
        }
        if text.contains('\n') {
            let in_token = !matches!(token.kind, TokenKind::Whitespace { .. });
            for _ in text.matches('\n') {
                line_starts.push(LineStart { depth, in_token });
            }
        }
    }

    let mut out = String::with_capacity(src.len());
    let mut previous_blank = true;
    for (line, info) in src.split('\n').zip(&line_starts) {
        if info.in_token {
            out.push_str(line);
            out.push('\n');
            previous_blank = false;
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !previous_blank {
                out.push('\n');
                previous_blank = true;
            }
            continue;
        }
        let level = (info.depth - leading_closers(trimmed)).max(0) as usize;
        for _ in 0..level {
            out.push_str(INDENT);
        }
        out.push_str(trimmed);
        out.push('\n');
        previous_blank = false;
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    Ok(out)
}

fn tokenize(src: &str) -> Result<Vec<Token>, FormatError> {
    let chars: Vec<(usize, char)> = src.char_indices().collect();
    let mut tokens = Vec::new();
    let mut prev = Prev::None;
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        if c.is_whitespace() {
            let mut newline = false;
            let start = offset;
            while i < chars.len() && chars[i].1.is_whitespace() {
                if chars[i].1 == '\n' {
                    newline = true;
                }
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Whitespace { newline },
                start,
                end: offset_at(&chars, src, i),
            });
            continue;
        }
        if c == '/' {
            match chars.get(i + 1).map(|&(_, c)| c) {
                Some('/') => {
                    let start = offset;
                    while i < chars.len() && chars[i].1 != '\n' {
                        i += 1;
                    }
                    tokens.push(Token {
                        kind: TokenKind::LineComment,
                        start,
                        end: offset_at(&chars, src, i),
                    });
                    continue;
                }
                Some('*') => {
                    let end = scan_block_comment(src, offset)?;
                    tokens.push(Token {
                        kind: TokenKind::BlockComment,
                        start: offset,
                        end,
                    });
                    i = advance_past(&chars, i, end);
                    continue;
                }
                _ => {
                    if regex_allowed(&prev, src) {
                        if let Some(end) = scan_regex(&chars, i) {
                            tokens.push(Token {
                                kind: TokenKind::Regex,
                                start: offset,
                                end: offset_at(&chars, src, end),
                            });
                            prev = Prev::Operand;
                            i = end;
                            continue;
                        }
                    }
                }
            }
        }
        if c == '\'' || c == '"' {
            let end = scan_string(src, &chars, i)?;
            tokens.push(Token {
                kind: TokenKind::Str,
                start: offset,
                end: offset_at(&chars, src, end),
            });
            prev = Prev::Operand;
            i = end;
            continue;
        }
        if c == '`' {
            let end = scan_template(src, &chars, i)?;
            tokens.push(Token {
                kind: TokenKind::Template,
                start: offset,
                end: offset_at(&chars, src, end),
            });
            prev = Prev::Operand;
            i = end;
            continue;
        }
        if is_word_char(c) {
            let start = offset;
            while i < chars.len() && is_word_char(chars[i].1) {
                i += 1;
            }
            let end = offset_at(&chars, src, i);
            tokens.push(Token {
                kind: TokenKind::Word,
                start,
                end,
            });
            prev = Prev::Word(start, end);
            continue;
        }
        // punct; ++ and -- stay one token so the regex decision sees
        // them as postfix operators
        let mut next = i + 1;
        if (c == '+' || c == '-') && matches!(chars.get(i + 1), Some(&(_, c2)) if c2 == c) {
            next = i + 2;
        }
        tokens.push(Token {
            kind: TokenKind::Punct(c),
            start: offset,
            end: offset_at(&chars, src, next),
        });
        prev = if next - i == 2 {
            Prev::Operand
        } else {
            Prev::Punct(c)
        };
        i = next;
    }
    Ok(tokens)
}

fn regex_allowed(prev: &Prev, src: &str) -> bool {
    match prev {
        Prev::None => true,
        Prev::Operand => false,
        Prev::Punct(c) => !matches!(c, ')' | ']'),
        Prev::Word(start, end) => REGEX_PRECEDING_KEYWORDS.contains(&&src[*start..*end]),
    }
}

/// Scan a regex literal; `None` means the slash did not close on this
/// line and should be read as division after all.
fn scan_regex(chars: &[(usize, char)], start: usize) -> Option<usize> {
    let mut i = start + 1;
    let mut in_class = false;
    while i < chars.len() {
        match chars[i].1 {
            '\\' => i += 2,
            '\n' => return None,
            '[' => {
                in_class = true;
                i += 1;
            }
            ']' => {
                in_class = false;
                i += 1;
            }
            '/' if !in_class => {
                i += 1;
                while i < chars.len() && is_word_char(chars[i].1) {
                    i += 1;
                }
                return Some(i);
            }
            _ => i += 1,
        }
    }
    None
}

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
    Err(syntax_error(
        src,
        chars[start].0,
        "Unterminated string literal",
    ))
}

fn scan_template(src: &str, chars: &[(usize, char)], start: usize) -> Result<usize, FormatError> {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i].1 {
            '\\' => i += 2,
            '`' => return Ok(i + 1),
            '$' if matches!(chars.get(i + 1), Some((_, '{'))) => {
                i = scan_template_expr(src, chars, i + 2)?;
            }
            _ => i += 1,
        }
    }
    Err(syntax_error(
        src,
        chars[start].0,
        "Unterminated template literal",
    ))
}

/// Scan the expression inside `${ }`, entered just past the opening
/// brace; returns the index past the matching `}`.
fn scan_template_expr(
    src: &str,
    chars: &[(usize, char)],
    start: usize,
) -> Result<usize, FormatError> {
    let opening = offset_at(chars, src, start.saturating_sub(2));
    let mut i = start;
    let mut depth = 0usize;
    while i < chars.len() {
        match chars[i].1 {
            '\'' | '"' => i = scan_string(src, chars, i)?,
            '`' => i = scan_template(src, chars, i)?,
            '/' if matches!(chars.get(i + 1), Some((_, '*'))) => {
                let end = scan_block_comment(src, chars[i].0)?;
                i = advance_past(chars, i, end);
            }
            '/' if matches!(chars.get(i + 1), Some((_, '/'))) => {
                while i < chars.len() && chars[i].1 != '\n' {
                    i += 1;
                }
            }
            '{' => {
                depth += 1;
                i += 1;
            }
            '}' => {
                if depth == 0 {
                    return Ok(i + 1);
                }
                depth -= 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    Err(syntax_error(src, opening, "Unterminated template expression"))
}

fn scan_block_comment(src: &str, start: usize) -> Result<usize, FormatError> {
    match src[start + 2..].find("*/") {
        Some(pos) => Ok(start + 2 + pos + 2),
        None => Err(syntax_error(src, start, "Unterminated comment")),
    }
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

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$')
}

/// Whether dropping the whitespace between these characters would merge
/// or re-lex the neighboring tokens.
fn needs_space(prev: Option<char>, next: char) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    if is_word_char(prev) && is_word_char(next) {
        return true;
    }
    matches!(
        (prev, next),
        ('+', '+') | ('-', '-') | ('/', '/') | ('/', '*') | ('<', '!')
    )
}

fn leading_closers(line: &str) -> i32 {
    let mut count = 0;
    for c in line.chars() {
        match c {
            '}' | ']' | ')' => count += 1,
            c if c.is_whitespace() => {}
            _ => break,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip() -> JsConfig {
        JsConfig::default()
    }

    fn keep() -> JsConfig {
        JsConfig {
            strip_comments: false,
        }
    }

    #[test]
    fn test_minify_collapses_spaces_keeps_newlines() {
        let src = "const a  =  1;\nconst b = 2;\n";
        assert_eq!(minify(src, &strip()).unwrap(), "const a=1;\nconst b=2;");
    }

    #[test]
    fn test_minify_strips_comments() {
        let src = "// header\nlet x = 1; /* note */ let y = 2;";
        assert_eq!(minify(src, &strip()).unwrap(), "let x=1;let y=2;");
    }

    #[test]
    fn test_minify_multiline_comment_keeps_line_break() {
        let src = "a()\n/* gap */\nb()";
        assert_eq!(minify(src, &strip()).unwrap(), "a()\nb()");
        // even without surrounding newlines, the break inside counts
        let src = "a() /* x\ny */ b()";
        assert_eq!(minify(src, &strip()).unwrap(), "a()\nb()");
    }

    #[test]
    fn test_minify_keeps_comments_when_configured() {
        let src = "let x = 1; // keep\nlet y = 2;";
        assert_eq!(minify(src, &keep()).unwrap(), "let x=1; // keep\nlet y=2;");
    }

    #[test]
    fn test_minify_preserves_template_bodies() {
        let src = "const s = `a  b ${ x  +  1 } c`;";
        assert_eq!(
            minify(src, &strip()).unwrap(),
            "const s=`a  b ${ x  +  1 } c`;"
        );
    }

    #[test]
    fn test_minify_regex_is_not_a_comment() {
        let src = r"const re = /ab c\/d/g;";
        assert_eq!(minify(src, &strip()).unwrap(), r"const re=/ab c\/d/g;");
    }

    #[test]
    fn test_minify_division_after_identifier() {
        let src = "const half = total / 2;";
        assert_eq!(minify(src, &strip()).unwrap(), "const half=total/2;");
    }

    #[test]
    fn test_minify_keeps_space_between_plus_signs() {
        assert_eq!(minify("a + +b", &strip()).unwrap(), "a+ +b");
        assert_eq!(minify("x - -y", &strip()).unwrap(), "x- -y");
    }

    #[test]
    fn test_minify_newline_protects_asi() {
        let src = "let a = b\n(c || d).forEach(f)";
        assert_eq!(minify(src, &strip()).unwrap(), "let a=b\n(c||d).forEach(f)");
    }

    #[test]
    fn test_minify_unterminated_template_errors() {
        let err = minify("const t = `abc", &strip()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unterminated template literal at line 1, col 11"
        );
    }

    #[test]
    fn test_prettify_indents_by_depth() {
        let src = "function go() {\nif (ready) {\nlaunch();\n}\n}\n";
        let expected = "function go() {\n\tif (ready) {\n\t\tlaunch();\n\t}\n}\n";
        assert_eq!(prettify(src).unwrap(), expected);
    }

    #[test]
    fn test_prettify_dedents_closing_lines() {
        let src = "register(\n'name',\nvalue\n);";
        let expected = "register(\n\t'name',\n\tvalue\n);\n";
        assert_eq!(prettify(src).unwrap(), expected);
    }

    #[test]
    fn test_prettify_leaves_template_interior() {
        let src = "const t = `lines:\n  one\n  two`;\nuse(t);";
        let expected = "const t = `lines:\n  one\n  two`;\nuse(t);\n";
        assert_eq!(prettify(src).unwrap(), expected);
    }

    #[test]
    fn test_prettify_collapses_blank_runs() {
        let src = "a();\n\n\n\nb();";
        assert_eq!(prettify(src).unwrap(), "a();\n\nb();\n");
    }

    #[test]
    fn test_prettify_ignores_brackets_in_strings() {
        let src = "const s = \"{[(\";\ndone(s);";
        assert_eq!(prettify(src).unwrap(), "const s = \"{[(\";\ndone(s);\n");
    }
}
