//! HTML minification and prettification.
//!
//! A streaming tokenizer turns the document into markup events; the
//! writers rebuild it with normalized whitespace. `script`, `style` and
//! `pre` bodies are read as raw text so their content is never mistaken
//! for markup, and embedded CSS and JavaScript are handed to the
//! sibling formatters.

use crate::config::Config;
use crate::format::{css, javascript, syntax_error, FormatError};

/// Elements that never take an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// Elements whose content must be read verbatim rather than tokenized.
fn is_raw_text_element(name: &str) -> bool {
    name.eq_ignore_ascii_case("script")
        || name.eq_ignore_ascii_case("style")
        || name.eq_ignore_ascii_case("pre")
}

#[derive(Debug)]
struct Attr<'a> {
    name: &'a str,
    value: Option<&'a str>,
}

#[derive(Debug)]
struct Tag<'a> {
    name: &'a str,
    /// Full source slice of the tag, `<` through `>`.
    raw: &'a str,
    attrs: Vec<Attr<'a>>,
    self_closing: bool,
    offset: usize,
}

impl<'a> Tag<'a> {
    fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .and_then(|a| a.value)
    }

    fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug)]
enum Event<'a> {
    Decl(&'a str),
    Comment(&'a str),
    Start(Tag<'a>),
    End { name: &'a str },
    Text(&'a str),
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            return true;
        }
        false
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }
}

struct Tokenizer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Tokenizer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            cursor: Cursor { src, pos: 0 },
        }
    }

    fn next_event(&mut self) -> Result<Option<Event<'a>>, FormatError> {
        if self.cursor.rest().is_empty() {
            return Ok(None);
        }
        let start = self.cursor.pos;
        if !self.at_markup_start() {
            while !self.cursor.rest().is_empty() && !self.at_markup_start() {
                self.cursor.bump();
            }
            return Ok(Some(Event::Text(&self.cursor.src[start..self.cursor.pos])));
        }
        let rest = self.cursor.rest();
        if rest.starts_with("<!--") {
            return match rest.find("-->") {
                Some(pos) => {
                    let end = start + pos + 3;
                    self.cursor.pos = end;
                    Ok(Some(Event::Comment(&self.cursor.src[start..end])))
                }
                None => Err(syntax_error(self.cursor.src, start, "Unterminated comment")),
            };
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            return match rest.find('>') {
                Some(pos) => {
                    let end = start + pos + 1;
                    self.cursor.pos = end;
                    Ok(Some(Event::Decl(&self.cursor.src[start..end])))
                }
                None => Err(syntax_error(
                    self.cursor.src,
                    start,
                    "Unterminated markup declaration",
                )),
            };
        }
        if rest.starts_with("</") {
            return match rest.find('>') {
                Some(pos) => {
                    let name = rest[2..pos].trim();
                    self.cursor.pos = start + pos + 1;
                    Ok(Some(Event::End { name }))
                }
                None => Err(syntax_error(self.cursor.src, start, "Unterminated end tag")),
            };
        }
        self.parse_start_tag().map(Some)
    }

    /// A `<` only opens markup when followed by a letter, `/`, `!` or
    /// `?`. Anything else, like `a < b`, is text.
    fn at_markup_start(&self) -> bool {
        let mut chars = self.cursor.rest().chars();
        if chars.next() != Some('<') {
            return false;
        }
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
    }

    fn parse_start_tag(&mut self) -> Result<Event<'a>, FormatError> {
        let offset = self.cursor.pos;
        self.cursor.bump();
        let name = self
            .cursor
            .eat_while(|c| c.is_ascii_alphanumeric() || c == '-');
        let mut attrs = Vec::new();
        let mut self_closing = false;
        loop {
            self.cursor.eat_while(char::is_whitespace);
            match self.cursor.peek() {
                None => {
                    return Err(syntax_error(self.cursor.src, offset, "Unterminated tag"));
                }
                Some('>') => {
                    self.cursor.bump();
                    break;
                }
                Some('/') => {
                    self.cursor.bump();
                    if self.cursor.eat('>') {
                        self_closing = true;
                        break;
                    }
                    return Err(syntax_error(self.cursor.src, offset, "Malformed tag"));
                }
                Some(_) => {
                    let attr_name = self
                        .cursor
                        .eat_while(|c| !c.is_whitespace() && !matches!(c, '=' | '>' | '/'));
                    if attr_name.is_empty() {
                        // stray character, skip it
                        self.cursor.bump();
                        continue;
                    }
                    self.cursor.eat_while(char::is_whitespace);
                    let value = if self.cursor.eat('=') {
                        self.cursor.eat_while(char::is_whitespace);
                        Some(self.read_attr_value(offset)?)
                    } else {
                        None
                    };
                    attrs.push(Attr {
                        name: attr_name,
                        value,
                    });
                }
            }
        }
        let raw = &self.cursor.src[offset..self.cursor.pos];
        Ok(Event::Start(Tag {
            name,
            raw,
            attrs,
            self_closing,
            offset,
        }))
    }

    fn read_attr_value(&mut self, tag_offset: usize) -> Result<&'a str, FormatError> {
        match self.cursor.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.cursor.bump();
                let value = self.cursor.eat_while(|c| c != quote);
                if !self.cursor.eat(quote) {
                    return Err(syntax_error(
                        self.cursor.src,
                        tag_offset,
                        "Unterminated attribute value",
                    ));
                }
                Ok(value)
            }
            _ => Ok(self
                .cursor
                .eat_while(|c| !c.is_whitespace() && !matches!(c, '>' | '/'))),
        }
    }

    /// Read everything up to the matching end tag of a raw-text element
    /// and consume the end tag. Case-insensitive, and the end tag name
    /// must be followed by whitespace or `>`.
    fn read_raw_text(&mut self, name: &str, open_offset: usize) -> Result<&'a str, FormatError> {
        let haystack = self.cursor.rest();
        let lower = haystack.to_ascii_lowercase();
        let needle = format!("</{}", name.to_ascii_lowercase());
        let mut search = 0;
        while let Some(found) = lower[search..].find(&needle) {
            let at = search + found;
            let after = at + needle.len();
            let boundary = lower[after..]
                .chars()
                .next()
                .map(|c| c.is_whitespace() || c == '>')
                .unwrap_or(true);
            if boundary {
                let content = &haystack[..at];
                return match lower[after..].find('>') {
                    Some(gt) => {
                        self.cursor.pos += after + gt + 1;
                        Ok(content)
                    }
                    None => Err(syntax_error(
                        self.cursor.src,
                        open_offset,
                        "Unterminated end tag",
                    )),
                };
            }
            search = after;
        }
        Err(syntax_error(
            self.cursor.src,
            open_offset,
            format!("Missing closing tag for <{name}>"),
        ))
    }
}

/// Minify a document. Tags are rebuilt tight, whitespace-only text
/// collapses to a single space, and text edges keep one space so words
/// never run together across removed line breaks.
pub fn minify(src: &str, config: &Config) -> Result<String, FormatError> {
    let mut tokenizer = Tokenizer::new(src);
    let mut out = String::with_capacity(src.len());
    while let Some(event) = tokenizer.next_event()? {
        match event {
            Event::Decl(raw) => out.push_str(raw),
            Event::Comment(raw) => {
                if !config.html.strip_comments {
                    out.push_str(raw);
                }
            }
            Event::Text(text) => write_trimmed(&mut out, text),
            Event::End { name } => {
                if !is_void(name) {
                    write_end_tag(&mut out, name);
                }
            }
            Event::Start(tag) => {
                write_tag(&mut out, &tag, config);
                if tag.self_closing || !is_raw_text_element(tag.name) {
                    continue;
                }
                let body = tokenizer.read_raw_text(tag.name, tag.offset)?;
                if tag.name.eq_ignore_ascii_case("script") {
                    if script_is_formattable(&tag) {
                        out.push_str(&javascript::minify(body, &config.javascript)?);
                    } else {
                        out.push_str(body);
                    }
                } else if tag.name.eq_ignore_ascii_case("style") {
                    out.push_str(&css::minify(body, &config.css)?);
                } else {
                    out.push_str(body);
                }
                write_end_tag(&mut out, tag.name);
            }
        }
    }
    Ok(out)
}

/// Prettify a document: one tag per line, children indented one level,
/// comments kept. Elements named in `inline_tags` keep their whole
/// subtree on a single line. Embedded style content is minified and
/// placed indented; embedded script content is formatted when the type
/// gate passes, otherwise re-indented as-is. `pre` content is copied
/// byte for byte.
pub fn prettify(src: &str, config: &Config) -> Result<String, FormatError> {
    let unit = config.html.indent_unit();
    let mut tokenizer = Tokenizer::new(src);
    let mut out = String::with_capacity(src.len() * 2);
    let mut depth: usize = 0;
    // counts open tags inside an inline subtree; zero means block mode
    let mut inline_depth: usize = 0;

    while let Some(event) = tokenizer.next_event()? {
        match event {
            Event::Decl(raw) | Event::Comment(raw) => {
                if inline_depth > 0 {
                    out.push_str(raw);
                } else {
                    push_indent(&mut out, &unit, depth);
                    out.push_str(raw);
                    out.push('\n');
                }
            }
            Event::Text(text) => {
                if inline_depth > 0 {
                    write_trimmed(&mut out, text);
                } else {
                    write_text_block(&mut out, &unit, depth, text);
                }
            }
            Event::End { name } => {
                if is_void(name) {
                    continue;
                }
                if inline_depth > 0 {
                    write_end_tag(&mut out, name);
                    inline_depth -= 1;
                    if inline_depth == 0 {
                        out.push('\n');
                    }
                } else {
                    depth = depth.saturating_sub(1);
                    push_indent(&mut out, &unit, depth);
                    write_end_tag(&mut out, name);
                    out.push('\n');
                }
            }
            Event::Start(tag) => {
                if is_raw_text_element(tag.name) && !tag.self_closing {
                    let body = tokenizer.read_raw_text(tag.name, tag.offset)?;
                    if inline_depth > 0 {
                        write_tag(&mut out, &tag, config);
                        out.push_str(body);
                        write_end_tag(&mut out, tag.name);
                    } else if tag.name.eq_ignore_ascii_case("pre") {
                        push_indent(&mut out, &unit, depth);
                        write_tag(&mut out, &tag, config);
                        out.push_str(body);
                        write_end_tag(&mut out, tag.name);
                        out.push('\n');
                    } else {
                        push_indent(&mut out, &unit, depth);
                        write_tag(&mut out, &tag, config);
                        out.push('\n');
                        let formatted = if tag.name.eq_ignore_ascii_case("style") {
                            css::minify(body, &config.css)?
                        } else if script_is_formattable(&tag) {
                            javascript::prettify(body)?
                        } else {
                            body.to_string()
                        };
                        write_indented_block(&mut out, &unit, depth + 1, &formatted);
                        push_indent(&mut out, &unit, depth);
                        write_end_tag(&mut out, tag.name);
                        out.push('\n');
                    }
                } else if inline_depth > 0 {
                    write_tag(&mut out, &tag, config);
                    if !tag.self_closing && !is_void(tag.name) {
                        inline_depth += 1;
                    }
                } else if config.html.is_inline_tag(tag.name)
                    && !tag.self_closing
                    && !is_void(tag.name)
                {
                    push_indent(&mut out, &unit, depth);
                    write_tag(&mut out, &tag, config);
                    inline_depth = 1;
                } else {
                    push_indent(&mut out, &unit, depth);
                    write_tag(&mut out, &tag, config);
                    out.push('\n');
                    if !tag.self_closing && !is_void(tag.name) {
                        depth += 1;
                    }
                }
            }
        }
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// Scripts are formatted only when inline and explicitly typed; the
/// rest pass through untouched.
fn script_is_formattable(tag: &Tag<'_>) -> bool {
    if tag.has_attr("src") {
        return false;
    }
    match tag.attr("type") {
        Some(kind) => kind == "text/javascript" || kind == "module",
        None => false,
    }
}

fn write_tag(out: &mut String, tag: &Tag<'_>, config: &Config) {
    if !config.html.format_attributes {
        out.push_str(tag.raw);
        return;
    }
    out.push('<');
    out.push_str(tag.name);
    for attr in &tag.attrs {
        out.push(' ');
        out.push_str(attr.name);
        if let Some(value) = attr.value {
            let quote = if value.contains('"') { '\'' } else { '"' };
            out.push('=');
            out.push(quote);
            out.push_str(value);
            out.push(quote);
        }
    }
    if tag.self_closing {
        out.push_str("/>");
    } else {
        out.push('>');
    }
}

fn write_end_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Leading and trailing whitespace of a text node become one space
/// each; whitespace-only text becomes one space; interior whitespace is
/// preserved.
fn write_trimmed(out: &mut String, text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        out.push(' ');
        return;
    }
    if text.starts_with(|c: char| c.is_whitespace()) {
        out.push(' ');
    }
    out.push_str(trimmed);
    if text.ends_with(|c: char| c.is_whitespace()) {
        out.push(' ');
    }
}

fn write_text_block(out: &mut String, unit: &str, depth: usize, text: &str) {
    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        push_indent(out, unit, depth);
        out.push_str(line);
        out.push('\n');
    }
}

/// Indent every line of an already formatted block by `depth` units,
/// keeping each line's own leading whitespace beneath the prefix.
fn write_indented_block(out: &mut String, unit: &str, depth: usize, block: &str) {
    let block = block.trim_end().trim_start_matches('\n');
    if block.is_empty() {
        return;
    }
    for line in block.split('\n') {
        let line = line.trim_end();
        if line.is_empty() {
            out.push('\n');
            continue;
        }
        push_indent(out, unit, depth);
        out.push_str(line);
        out.push('\n');
    }
}

fn push_indent(out: &mut String, unit: &str, depth: usize) {
    for _ in 0..depth {
        out.push_str(unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HtmlConfig, IndentKind};

    fn defaults() -> Config {
        Config::default()
    }

    #[test]
    fn test_minify_document() {
        let src = "<!DOCTYPE html>\n<html>\n  <body>\n    <!-- note -->\n    <p>Hello   world</p>\n  </body>\n</html>\n";
        let expected = "<!DOCTYPE html> <html> <body>  <p>Hello   world</p> </body> </html> ";
        assert_eq!(minify(src, &defaults()).unwrap(), expected);
    }

    #[test]
    fn test_minify_keeps_comments_when_configured() {
        let config = Config {
            html: HtmlConfig {
                strip_comments: false,
                ..HtmlConfig::default()
            },
            ..Config::default()
        };
        let src = "<div><!-- keep --></div>";
        assert_eq!(minify(src, &config).unwrap(), "<div><!-- keep --></div>");
    }

    #[test]
    fn test_minify_style_content() {
        let src = "<style>a { color : red ; }</style>";
        assert_eq!(
            minify(src, &defaults()).unwrap(),
            "<style>a{color:red}</style>"
        );
    }

    #[test]
    fn test_minify_script_type_gate() {
        let typed = "<script type=\"module\">let  x = 1;</script>";
        assert_eq!(
            minify(typed, &defaults()).unwrap(),
            "<script type=\"module\">let x=1;</script>"
        );
        let untyped = "<script>let  x = 1;</script>";
        assert_eq!(
            minify(untyped, &defaults()).unwrap(),
            "<script>let  x = 1;</script>"
        );
        let external = "<script src=\"app.js\" type=\"text/javascript\"></script>";
        assert_eq!(minify(external, &defaults()).unwrap(), external);
    }

    #[test]
    fn test_minify_script_body_is_raw_text() {
        let src = "<script type=\"module\">if (a < b) { go(); }</script>";
        assert_eq!(
            minify(src, &defaults()).unwrap(),
            "<script type=\"module\">if(a<b){go();}</script>"
        );
    }

    #[test]
    fn test_minify_pre_untouched() {
        let src = "<pre>  two\n   three </pre>";
        assert_eq!(minify(src, &defaults()).unwrap(), src);
    }

    #[test]
    fn test_minify_rebuilds_attributes() {
        let src = "<div   class = \"x\"   data-live>a</div>";
        assert_eq!(
            minify(src, &defaults()).unwrap(),
            "<div class=\"x\" data-live>a</div>"
        );
    }

    #[test]
    fn test_minify_raw_tags_when_formatting_disabled() {
        let config = Config {
            html: HtmlConfig {
                format_attributes: false,
                ..HtmlConfig::default()
            },
            ..Config::default()
        };
        let src = "<div   class=\"x\">a</div>";
        assert_eq!(minify(src, &config).unwrap(), "<div   class=\"x\">a</div>");
    }

    #[test]
    fn test_minify_drops_stray_void_end_tags() {
        let src = "<p>a<br></br>b</p>";
        assert_eq!(minify(src, &defaults()).unwrap(), "<p>a<br>b</p>");
    }

    #[test]
    fn test_minify_bare_angle_bracket_is_text() {
        let src = "<p>1 < 2</p>";
        assert_eq!(minify(src, &defaults()).unwrap(), "<p>1 < 2</p>");
    }

    #[test]
    fn test_minify_unterminated_comment_errors() {
        let err = minify("<div><!-- oops", &defaults()).unwrap_err();
        assert_eq!(err.to_string(), "Unterminated comment at line 1, col 6");
    }

    #[test]
    fn test_minify_missing_script_close_errors() {
        let err = minify("<script type=\"module\">let x = 1;", &defaults()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing closing tag for <script> at line 1, col 1"
        );
    }

    #[test]
    fn test_prettify_document() {
        let src = "<!DOCTYPE html><html><head><title>Demo</title></head><body><p>Hi <b>there</b></p></body></html>";
        let expected = [
            "<!DOCTYPE html>",
            "<html>",
            "  <head>",
            "    <title>",
            "      Demo",
            "    </title>",
            "  </head>",
            "  <body>",
            "    <p>",
            "      Hi",
            "      <b>there</b>",
            "    </p>",
            "  </body>",
            "</html>",
            "",
        ]
        .join("\n");
        assert_eq!(prettify(src, &defaults()).unwrap(), expected);
    }

    #[test]
    fn test_prettify_respects_indent_config() {
        let config = Config {
            html: HtmlConfig {
                indent_kind: IndentKind::Tab,
                indent_width: 1,
                ..HtmlConfig::default()
            },
            ..Config::default()
        };
        let src = "<div><p>x</p></div>";
        assert_eq!(
            prettify(src, &config).unwrap(),
            "<div>\n\t<p>\n\t\tx\n\t</p>\n</div>\n"
        );
    }

    #[test]
    fn test_prettify_inline_subtree_stays_on_one_line() {
        let src = "<p>go <a href=\"/x\">now <b>fast</b></a> ok</p>";
        let expected = "<p>\n  go\n  <a href=\"/x\">now <b>fast</b></a>\n  ok\n</p>\n";
        assert_eq!(prettify(src, &defaults()).unwrap(), expected);
    }

    #[test]
    fn test_prettify_keeps_comments() {
        let src = "<div><!-- x --></div>";
        assert_eq!(
            prettify(src, &defaults()).unwrap(),
            "<div>\n  <!-- x -->\n</div>\n"
        );
    }

    #[test]
    fn test_prettify_void_elements_do_not_nest() {
        let src = "<body><img src=\"a.png\"><br></body>";
        assert_eq!(
            prettify(src, &defaults()).unwrap(),
            "<body>\n  <img src=\"a.png\">\n  <br>\n</body>\n"
        );
    }

    #[test]
    fn test_prettify_style_is_minified_and_indented() {
        let src = "<head><style>a { color : red ; }\nb { margin : 0 ; }</style></head>";
        let expected = "<head>\n  <style>\n    a{color:red}b{margin:0}\n  </style>\n</head>\n";
        assert_eq!(prettify(src, &defaults()).unwrap(), expected);
    }

    #[test]
    fn test_prettify_embedded_script_block() {
        let src = "<body><script type=\"module\">function f() {\nreturn 1;\n}\nf();</script></body>";
        let expected = "<body>\n  <script type=\"module\">\n    function f() {\n    \treturn 1;\n    }\n    f();\n  </script>\n</body>\n";
        assert_eq!(prettify(src, &defaults()).unwrap(), expected);
    }

    #[test]
    fn test_prettify_pre_content_exact() {
        let src = "<div><pre>a\n  b\n</pre></div>";
        assert_eq!(
            prettify(src, &defaults()).unwrap(),
            "<div>\n  <pre>a\n  b\n</pre>\n</div>\n"
        );
    }
}
