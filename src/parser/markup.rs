//! Markup segmenter for `@description` / `@example` bodies.
//!
//! The markup is a permissive HTML-like dialect. Only two elements carry
//! structure: `<example>` (optionally namespaced, e.g. `<doc:example>`) and the
//! `<file>` elements nested in it. Every other element is written back into the
//! surrounding text as-is.

use crate::model::{ExampleBlock, FileBlock, MarkupSegment};
use logos::Logos;

/// Elements that never have content and close as soon as they open.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is raw text up to the matching close tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Split markup into plain text runs and example blocks, in input order.
pub fn segment(markup: &str) -> Vec<MarkupSegment> {
    let mut segmenter = Segmenter::default();
    for event in tokenize(markup) {
        match event {
            Event::Open { name, attrs } => segmenter.open(&name, attrs),
            Event::Close(name) => segmenter.close(&name),
            Event::Text(text) => segmenter.text(text),
        }
    }
    segmenter.finish()
}

// -- Segmenter ----------------------------------------------------------------

#[derive(Default)]
struct Segmenter {
    segments: Vec<MarkupSegment>,
    /// `None` until something is written, distinct from an empty run.
    text: Option<String>,
    example: Option<ExampleBlock>,
    file: Option<FileBlock>,
}

impl Segmenter {
    fn open(&mut self, name: &str, attrs: Vec<(String, String)>) {
        if is_example(name) {
            // An ad hoc container from an earlier stray <file> ends here.
            if let Some(pending) = self.example.take() {
                self.segments.push(MarkupSegment::Example(pending));
            }
            self.flush_text();
            self.example = Some(ExampleBlock {
                module: attr(&attrs, "module"),
                deps: attr(&attrs, "deps"),
                files: Vec::new(),
            });
        } else if name == "file" {
            if self.text.as_deref().is_some_and(|t| !t.trim().is_empty()) {
                self.flush_text();
            }
            self.text = None;
            self.file = Some(FileBlock {
                name: attr(&attrs, "name").unwrap_or_default(),
                content: String::new(),
                src: attr(&attrs, "src"),
            });
        } else {
            let rendered: Vec<String> = attrs
                .iter()
                .map(|(key, value)| format!("{}=\"{}\"", key, value))
                .collect();
            let mut tag = format!("<{}", name);
            if !rendered.is_empty() {
                tag.push(' ');
                tag.push_str(&rendered.join(" "));
            }
            tag.push('>');
            self.text(&tag);
        }
    }

    fn close(&mut self, name: &str) {
        if is_example(name) {
            self.flush_text();
            if let Some(example) = self.example.take() {
                self.segments.push(MarkupSegment::Example(example));
            }
        } else if name == "file" {
            let content = self.text.take().unwrap_or_default();
            if let Some(mut file) = self.file.take() {
                file.content = content;
                // A <file> outside any <example> still gets a container.
                self.example.get_or_insert_with(ExampleBlock::default).files.push(file);
            }
        } else {
            self.text(&format!("</{}>", name));
        }
    }

    fn text(&mut self, text: &str) {
        match self.text {
            Some(ref mut run) => run.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    fn flush_text(&mut self) {
        if let Some(run) = self.text.take() {
            if !run.is_empty() {
                self.segments.push(MarkupSegment::Text(run));
            }
        }
    }

    fn finish(mut self) -> Vec<MarkupSegment> {
        if let Some(example) = self.example.take() {
            self.segments.push(MarkupSegment::Example(example));
        }
        if let Some(run) = self.text.take() {
            self.segments.push(MarkupSegment::Text(run));
        }
        self.segments
    }
}

fn is_example(name: &str) -> bool {
    match name.split_once(':') {
        Some((prefix, local)) => !prefix.is_empty() && local == "example",
        None => name == "example",
    }
}

fn attr(attrs: &[(String, String)], key: &str) -> Option<String> {
    attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

// -- Tokenizer ----------------------------------------------------------------

/// Markup-level tokens. Anything that is not a well-formed tag is text.
#[derive(Logos, Debug, PartialEq)]
enum Token {
    #[token("<!--")]
    CommentStart,
    #[regex(r"<\?[^>]*>")]
    #[regex(r"<![^->][^>]*>")]
    Declaration,
    #[regex(r"</[A-Za-z][^>]*>")]
    CloseTag,
    /// `<` and the element name; attributes are lexed separately.
    #[regex(r"<[A-Za-z][^\s/>]*")]
    TagStart,
    #[regex(r"[^<]+")]
    Text,
    #[token("<")]
    Lt,
}

/// Tokens inside an open tag, after the element name.
#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[\s/]+")]
enum AttrToken {
    #[token(">")]
    End,
    #[regex(r#"[^\s=>/"'][^\s=>/]*"#)]
    Name,
    /// `=` with nothing usable after it: an empty value.
    #[token("=")]
    Equals,
    #[regex(r#"=\s*"[^"]*""#)]
    #[regex(r"=\s*'[^']*'")]
    #[regex(r#"=\s*[^\s>"'][^\s>]*"#)]
    Value,
}

#[derive(Debug, PartialEq)]
enum Event<'a> {
    Open {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Close(String),
    Text(&'a str),
}

enum Tag {
    Open {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Close(String),
    /// Comments, declarations and processing instructions.
    Skip,
}

/// Stream the markup into open/close/text events. Close events are balanced:
/// stray closes are dropped and unclosed elements are closed at the end.
fn tokenize(input: &str) -> Vec<Event<'_>> {
    let mut events = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while pos < input.len() {
        let start = pos;
        let mut lexer = Token::lexer(&input[start..]);
        let Some(token) = lexer.next() else {
            break;
        };
        pos = start + lexer.span().end;

        let tag = match token {
            Ok(Token::CommentStart) => {
                pos = input[pos..].find("-->").map_or(input.len(), |i| pos + i + 3);
                Tag::Skip
            }
            Ok(Token::Declaration) => Tag::Skip,
            Ok(Token::CloseTag) => Tag::Close(tag_name(&lexer.slice()[2..])),
            Ok(Token::TagStart) => match read_attrs(&input[pos..]) {
                Some((attrs, len)) => {
                    pos += len;
                    Tag::Open {
                        name: tag_name(&lexer.slice()[1..]),
                        attrs,
                    }
                }
                None => {
                    // Not a tag after all; the `<` is text.
                    pos = start + 1;
                    continue;
                }
            },
            Ok(Token::Text | Token::Lt) | Err(()) => continue,
        };

        if text_start < start {
            events.push(Event::Text(&input[text_start..start]));
        }
        text_start = pos;

        match tag {
            Tag::Open { name, attrs } => {
                let raw = RAW_TEXT_ELEMENTS.contains(&name.as_str());
                let void = VOID_ELEMENTS.contains(&name.as_str());
                events.push(Event::Open {
                    name: name.clone(),
                    attrs,
                });
                if void {
                    events.push(Event::Close(name));
                    continue;
                }
                if raw {
                    let needle = format!("</{}", name);
                    let close_at = input[pos..]
                        .to_ascii_lowercase()
                        .find(&needle)
                        .map_or(input.len(), |i| pos + i);
                    if pos < close_at {
                        events.push(Event::Text(&input[pos..close_at]));
                    }
                    pos = close_at;
                    text_start = close_at;
                }
                stack.push(name);
            }
            Tag::Close(name) => {
                if let Some(depth) = stack.iter().rposition(|open| *open == name) {
                    while stack.len() > depth {
                        if let Some(open) = stack.pop() {
                            events.push(Event::Close(open));
                        }
                    }
                }
            }
            Tag::Skip => {}
        }
    }

    if text_start < input.len() {
        events.push(Event::Text(&input[text_start..]));
    }
    while let Some(open) = stack.pop() {
        events.push(Event::Close(open));
    }
    events
}

fn tag_name(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Lex the attributes of an open tag up to its `>`. Returns the attributes
/// (first occurrence of a key wins) and the length consumed, or `None` when
/// the tag never closes properly.
fn read_attrs(rest: &str) -> Option<(Vec<(String, String)>, usize)> {
    let mut lexer = AttrToken::lexer(rest);
    let mut attrs = Vec::new();
    let mut key: Option<String> = None;

    while let Some(token) = lexer.next() {
        match token.ok()? {
            AttrToken::End => {
                push_attr(&mut attrs, key.take(), String::new());
                return Some((attrs, lexer.span().end));
            }
            AttrToken::Name => {
                push_attr(&mut attrs, key.take(), String::new());
                key = Some(lexer.slice().to_ascii_lowercase());
            }
            AttrToken::Equals => push_attr(&mut attrs, key.take(), String::new()),
            AttrToken::Value => push_attr(&mut attrs, key.take(), attr_value(lexer.slice())),
        }
    }
    None
}

fn push_attr(attrs: &mut Vec<(String, String)>, key: Option<String>, value: String) {
    if let Some(key) = key {
        if !attrs.iter().any(|(k, _)| *k == key) {
            attrs.push((key, value));
        }
    }
}

/// `="x"`, `= 'x'` or `=x` → `x`.
fn attr_value(raw: &str) -> String {
    let value = raw[1..].trim_start();
    if value.starts_with(['"', '\'']) {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> MarkupSegment {
        MarkupSegment::Text(s.to_string())
    }

    #[test]
    fn plain_text_only() {
        assert_eq!(segment("Just some text."), vec![text("Just some text.")]);
    }

    #[test]
    fn empty_input() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn passthrough_element_kept_verbatim() {
        assert_eq!(
            segment("Say <b>hi</b> there"),
            vec![text("Say <b>hi</b> there")]
        );
    }

    #[test]
    fn passthrough_attributes_rebuilt() {
        assert_eq!(
            segment("<a href='x.html' TARGET=_blank>link</a>"),
            vec![text(r#"<a href="x.html" target="_blank">link</a>"#)]
        );
        assert_eq!(
            segment("<input disabled>"),
            vec![text(r#"<input disabled=""></input>"#)]
        );
    }

    #[test]
    fn example_with_file() {
        let segments = segment(r#"<example module="m"><file name="a.js">X</file></example>"#);
        assert_eq!(
            segments,
            vec![MarkupSegment::Example(ExampleBlock {
                module: Some("m".to_string()),
                deps: None,
                files: vec![FileBlock {
                    name: "a.js".to_string(),
                    content: "X".to_string(),
                    src: None,
                }],
            })]
        );
    }

    #[test]
    fn namespaced_example_and_surrounding_text() {
        let input = concat!(
            "Intro\n<doc:example deps=\"a.js\">\n",
            "  <file name=\"index.html\" src=\"i.html\"><div ng-app>Hi</div></file>\n",
            "  <file name=\"app.js\">go();</file>\n",
            "</doc:example>\nOutro",
        );
        let segments = segment(input);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0], text("Intro\n"));
        // Whitespace left inside the example is flushed ahead of it.
        assert_eq!(segments[1], text("\n"));
        match &segments[2] {
            MarkupSegment::Example(example) => {
                assert_eq!(example.module, None);
                assert_eq!(example.deps.as_deref(), Some("a.js"));
                assert_eq!(example.files.len(), 2);
                assert_eq!(example.files[0].name, "index.html");
                assert_eq!(example.files[0].src.as_deref(), Some("i.html"));
                assert_eq!(example.files[0].content, r#"<div ng-app="">Hi</div>"#);
                assert_eq!(example.files[1].content, "go();");
            }
            other => panic!("expected example, got {:?}", other),
        }
        assert_eq!(segments[3], text("\nOutro"));
    }

    #[test]
    fn script_content_is_raw() {
        let input = concat!(
            "<example><file name=\"index.html\">",
            "<script>if (a < b && c > d) {}</script>",
            "</file></example>",
        );
        match &segment(input)[0] {
            MarkupSegment::Example(example) => {
                assert_eq!(
                    example.files[0].content,
                    "<script>if (a < b && c > d) {}</script>"
                );
            }
            other => panic!("expected example, got {:?}", other),
        }
    }

    #[test]
    fn file_outside_example_gets_container() {
        let segments = segment("<file name=\"x.js\">x()</file>");
        assert_eq!(
            segments,
            vec![MarkupSegment::Example(ExampleBlock {
                module: None,
                deps: None,
                files: vec![FileBlock {
                    name: "x.js".to_string(),
                    content: "x()".to_string(),
                    src: None,
                }],
            })]
        );
    }

    #[test]
    fn stray_file_kept_before_next_example() {
        let segments = segment(
            "<file name=\"a.js\">A</file> mid <example><file name=\"b.js\">B</file></example>",
        );
        let names: Vec<Vec<&str>> = segments
            .iter()
            .map(|segment| match segment {
                MarkupSegment::Example(example) => {
                    example.files.iter().map(|f| f.name.as_str()).collect()
                }
                MarkupSegment::Text(_) => vec![],
            })
            .collect();
        assert_eq!(names, vec![vec!["a.js"], vec![], vec!["b.js"]]);
        assert_eq!(segments[1], text(" mid "));
    }

    #[test]
    fn unterminated_tag_is_text() {
        assert_eq!(segment("a <b c=\"x"), vec![text("a <b c=\"x")]);
        assert_eq!(segment("1 <2 and a<b"), vec![text("1 <2 and a<b")]);
    }

    #[test]
    fn attribute_forms() {
        let events = tokenize(r#"<x a = "1" b='2' c=3 d a="dup" e=>"#);
        assert_eq!(
            events[0],
            Event::Open {
                name: "x".to_string(),
                attrs: vec![
                    ("a".to_string(), "1".to_string()),
                    ("b".to_string(), "2".to_string()),
                    ("c".to_string(), "3".to_string()),
                    ("d".to_string(), String::new()),
                    ("e".to_string(), String::new()),
                ]
            }
        );
    }

    #[test]
    fn stray_and_unclosed_tags() {
        assert_eq!(segment("a</i>b"), vec![text("ab")]);
        assert_eq!(segment("<em>open"), vec![text("<em>open</em>")]);
        assert_eq!(segment("x < y"), vec![text("x < y")]);
    }

    #[test]
    fn comments_dropped() {
        assert_eq!(segment("a<!-- hidden -->b"), vec![text("ab")]);
    }

    #[test]
    fn tokenizer_closes_inner_elements() {
        let events = tokenize("<p><b>x</p>");
        assert_eq!(
            events,
            vec![
                Event::Open {
                    name: "p".to_string(),
                    attrs: vec![]
                },
                Event::Open {
                    name: "b".to_string(),
                    attrs: vec![]
                },
                Event::Text("x"),
                Event::Close("b".to_string()),
                Event::Close("p".to_string()),
            ]
        );
    }
}
