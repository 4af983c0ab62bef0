//! Tag stripping and entity extraction over the server's HTML subset
//!
//! Each operation is an independent scan over the string. No DOM is built;
//! the input is the restricted markup Mastodon's sanitizer emits.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::compile;
use super::entities::decode_entities;
use super::weburl::validate_web_url;

static BR_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"(?i)<br\s*/?>"));
static PARAGRAPH_CLOSE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"(?i)</p\s*>"));
static BLOCK_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"(?i)</?(?:p|div)(?:\s[^>]*)?/?>"));
static ANY_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"<[^>]+>"));
static ANCHOR: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"(?is)<a\s([^>]*)>(.*?)</a\s*>"));
static HREF_ATTR: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(r#"(?i)(?:^|\s)href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
});
static ANY_WHITESPACE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"\s+"));
static INLINE_WHITESPACE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"[ \t\r\x0C]+"));
static SPACE_AROUND_NEWLINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"[ \t]*\n[ \t]*"));
static NEWLINE_RUN: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"\n{3,}"));

/// How block structure survives conversion to plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlainTextStyle {
    /// Single line; every whitespace run becomes one space
    Flat,
    /// Line breaks kept; a closing `</p>` adds a single newline
    Lines,
    /// Line breaks kept; a closing `</p>` adds a blank line
    #[default]
    Paragraphs,
}

impl FromStr for PlainTextStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "lines" => Ok(Self::Lines),
            "paragraphs" => Ok(Self::Paragraphs),
            other => anyhow::bail!("Unknown text style: {other}"),
        }
    }
}

/// Replace every match of `re`, or return the input if the pattern is unavailable
fn replace(re: &LazyLock<Option<Regex>>, text: &str, with: &str) -> String {
    match re.as_ref() {
        Some(re) => re.replace_all(text, with).into_owned(),
        None => text.to_string(),
    }
}

/// Strip all markup, flattening the result onto one line
pub fn strip_to_plain_text(html: &str) -> String {
    strip_to_plain_text_with(html, PlainTextStyle::Flat)
}

/// Strip all markup using the given line-break style
pub fn strip_to_plain_text_with(html: &str, style: PlainTextStyle) -> String {
    let paragraph_break = match style {
        PlainTextStyle::Paragraphs => "\n\n",
        PlainTextStyle::Flat | PlainTextStyle::Lines => "\n",
    };

    let text = replace(&BR_TAG, html, "\n");
    let text = replace(&PARAGRAPH_CLOSE, &text, paragraph_break);
    let text = replace(&BLOCK_TAG, &text, "\n");
    let text = replace(&ANY_TAG, &text, "");
    let text = decode_entities(&text);

    let text = match style {
        PlainTextStyle::Flat => replace(&ANY_WHITESPACE, &text, " "),
        PlainTextStyle::Lines | PlainTextStyle::Paragraphs => {
            let text = replace(&INLINE_WHITESPACE, &text, " ");
            let text = replace(&SPACE_AROUND_NEWLINE, &text, "\n");
            replace(&NEWLINE_RUN, &text, "\n\n")
        }
    };

    text.trim().to_string()
}

/// An `<a href>` element found in the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Anchor {
    /// Byte offset of the opening `<a` in the markup
    pub start: usize,
    /// Entity-decoded `href` value
    pub href: String,
    /// Inner markup stripped to flat text
    pub text: String,
}

/// All anchors carrying an `href`, in document order
pub(crate) fn anchors(html: &str) -> Vec<Anchor> {
    let (Some(anchor), Some(href_attr)) = (ANCHOR.as_ref(), HREF_ATTR.as_ref()) else {
        return Vec::new();
    };

    anchor
        .captures_iter(html)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let attrs = caps.get(1)?.as_str();
            let href = href_attr.captures(attrs)?;
            let raw = href.get(1).or_else(|| href.get(2)).or_else(|| href.get(3))?;
            Some(Anchor {
                start,
                href: decode_entities(raw.as_str()).trim().to_string(),
                text: strip_to_plain_text(caps.get(2).map_or("", |m| m.as_str())),
            })
        })
        .collect()
}

/// Absolute http(s) link targets, in document order
pub fn extract_links(html: &str) -> Vec<String> {
    anchors(html)
        .into_iter()
        .filter_map(|a| match validate_web_url(&a.href) {
            Ok(_) => Some(a.href),
            Err(e) => {
                tracing::debug!("Dropping link {}: {e}", a.href);
                None
            }
        })
        .collect()
}

/// Link targets that point outside the fediverse UI.
///
/// Mention (`/@user`) and hashtag (`/tags/x`) links are dropped, as is any URL
/// whose host contains one of `excluding_hosts` (case-insensitive).
pub fn extract_external_links<S: AsRef<str>>(html: &str, excluding_hosts: &[S]) -> Vec<String> {
    let excluded: Vec<String> = excluding_hosts
        .iter()
        .map(|h| h.as_ref().trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .collect();

    anchors(html)
        .into_iter()
        .filter_map(|a| {
            let url = validate_web_url(&a.href).ok()?;
            let path = url.path();
            if path.starts_with("/@") || path.starts_with("/tags/") {
                return None;
            }
            let host = url.host_str()?.to_lowercase();
            if excluded.iter().any(|e| host.contains(e.as_str())) {
                return None;
            }
            Some(a.href)
        })
        .collect()
}

/// A `@mention` or `#hashtag` located in plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    /// Byte offset of the sigil
    pub start: usize,
    /// Byte offset one past the token
    pub end: usize,
    /// Token without its sigil
    pub body: &'a str,
}

/// Characters that glue a sigil to the preceding word (emails, URLs, entities)
fn is_boundary(prev: Option<char>) -> bool {
    prev.is_none_or(|c| !(c.is_alphanumeric() || matches!(c, '_' | '@' | '#' | '/' | '.' | '&')))
}

fn scan_tokens(text: &str, sigil: char, body_len: impl Fn(&str) -> usize) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut prev = None;
    let mut resume_at = 0;

    for (i, c) in text.char_indices() {
        if i >= resume_at && c == sigil && is_boundary(prev) {
            let body_start = i + c.len_utf8();
            let len = body_len(&text[body_start..]);
            if len > 0 {
                let end = body_start + len;
                tokens.push(Token {
                    start: i,
                    end,
                    body: &text[body_start..end],
                });
                resume_at = end;
            }
        }
        prev = Some(c);
    }

    tokens
}

fn hashtag_len(rest: &str) -> usize {
    let mut chars = rest.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_alphabetic() => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map_or(rest.len(), |(i, _)| i)
}

fn mention_len(rest: &str) -> usize {
    let user = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if user == 0 {
        return 0;
    }

    let Some(after) = rest[user..].strip_prefix('@') else {
        return user;
    };
    let host = after
        .find(|c: char| !(c.is_alphanumeric() || c == '.' || c == '-'))
        .unwrap_or(after.len());
    let host = after[..host].trim_end_matches(['.', '-']).len();
    if host == 0 { user } else { user + 1 + host }
}

pub(crate) fn hashtag_tokens(text: &str) -> Vec<Token<'_>> {
    scan_tokens(text, '#', hashtag_len)
}

pub(crate) fn mention_tokens(text: &str) -> Vec<Token<'_>> {
    scan_tokens(text, '@', mention_len)
}

fn unique_bodies(tokens: Vec<Token<'_>>) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter(|t| seen.insert(t.body.to_lowercase()))
        .map(|t| t.body.to_string())
        .collect()
}

/// Mentioned handles (`user` or `user@host`, without the leading `@`)
pub fn extract_mentions(html: &str) -> Vec<String> {
    unique_bodies(mention_tokens(&strip_to_plain_text(html)))
}

/// Hashtags (without the leading `#`); the first character must be a letter
pub fn extract_hashtags(html: &str) -> Vec<String> {
    unique_bodies(hashtag_tokens(&strip_to_plain_text(html)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_TAGS: [&str; 8] = ["<p", "</p", "<br", "<div", "</div", "<a", "</a", "<span"];

    #[test]
    fn test_hello_world() {
        let html = r#"<p>Hello <a href="https://example.com">world</a></p>"#;
        assert_eq!(extract_links(html), vec!["https://example.com"]);
        assert_eq!(strip_to_plain_text(html), "Hello world");
    }

    #[test]
    fn test_paragraph_styles() {
        let html = "<p>One<br>two</p><p>Three</p>";
        assert_eq!(strip_to_plain_text(html), "One two Three");
        assert_eq!(
            strip_to_plain_text_with("<p>One<br>two</p>Three", PlainTextStyle::Lines),
            "One\ntwo\nThree"
        );
        assert_eq!(
            strip_to_plain_text_with(html, PlainTextStyle::Paragraphs),
            "One\ntwo\n\nThree"
        );
    }

    #[test]
    fn test_newline_runs_collapse() {
        let html = "<p>a</p><br/><br /><div>b</div>";
        assert_eq!(
            strip_to_plain_text_with(html, PlainTextStyle::Paragraphs),
            "a\n\nb"
        );
    }

    #[test]
    fn test_inline_whitespace_collapses() {
        let html = "<p>  lots   of \t space  </p><p> next </p>";
        assert_eq!(
            strip_to_plain_text_with(html, PlainTextStyle::Lines),
            "lots of space\n\nnext"
        );
    }

    #[test]
    fn test_lines_keeps_author_blank_line() {
        assert_eq!(
            strip_to_plain_text_with("a<br><br>b", PlainTextStyle::Lines),
            "a\n\nb"
        );
        assert_eq!(
            strip_to_plain_text_with("a<br><br><br><br>b", PlainTextStyle::Lines),
            "a\n\nb"
        );
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("flat".parse::<PlainTextStyle>().unwrap(), PlainTextStyle::Flat);
        assert_eq!(" Lines ".parse::<PlainTextStyle>().unwrap(), PlainTextStyle::Lines);
        assert_eq!(
            "PARAGRAPHS".parse::<PlainTextStyle>().unwrap(),
            PlainTextStyle::Paragraphs
        );
        assert!("markdown".parse::<PlainTextStyle>().is_err());
    }

    #[test]
    fn test_strip_removes_tags_and_entities() {
        let samples = [
            r#"<p>Hi <span class="h-card"><a href="https://m.s/@bob" class="u-url mention">@<span>bob</span></a></span></p>"#,
            "<div><p>Fish &amp; chips&nbsp;&mdash; <br/>yum</p></div>",
            r#"<p><a href="https://x.y/a" rel="nofollow"><span class="invisible">https://</span><span class="">x.y/a</span></a></p>"#,
        ];
        for html in samples {
            let text = strip_to_plain_text_with(html, PlainTextStyle::Paragraphs);
            for tag in KNOWN_TAGS {
                assert!(!text.contains(tag), "{text:?} contains {tag}");
            }
            for entity in ["&amp;", "&lt;", "&gt;", "&nbsp;", "&mdash;"] {
                assert!(!text.contains(entity), "{text:?} contains {entity}");
            }
        }
    }

    #[test]
    fn test_escaped_markup_is_text() {
        assert_eq!(strip_to_plain_text("<p>1 &lt; 2</p>"), "1 < 2");
    }

    #[test]
    fn test_extract_links_filters_schemes() {
        let html = r#"<a href="https://ok.example/a?x=1&amp;y=2">a</a>
            <a href="/relative">b</a>
            <a href="javascript:alert(1)">c</a>
            <a class="x" href='http://also.example'>d</a>
            <a name="nohref">e</a>"#;
        assert_eq!(
            extract_links(html),
            vec!["https://ok.example/a?x=1&y=2", "http://also.example"]
        );
    }

    #[test]
    fn test_extract_external_links() {
        let html = r#"<p><a href="https://mastodon.social/@alice" class="mention">@alice</a>
            <a href="https://mastodon.social/tags/rust" class="hashtag">#rust</a>
            <a href="https://blog.example.com/post">blog</a>
            <a href="https://YouTube.com/watch?v=1">video</a></p>"#;
        assert_eq!(
            extract_external_links(html, &["youtube"]),
            vec!["https://blog.example.com/post"]
        );
        let none: [&str; 0] = [];
        assert_eq!(extract_external_links(html, &none).len(), 2);
    }

    #[test]
    fn test_extract_mentions() {
        let html = r#"<p><a href="https://m.s/@bob">@<span>bob</span></a> and @carol@example.org. Mail me at dave@example.com, @Bob</p>"#;
        assert_eq!(extract_mentions(html), vec!["bob", "carol@example.org"]);
    }

    #[test]
    fn test_extract_hashtags() {
        let html = "<p>#Rust is great #2024 #rust_lang, see issue#12 or #café</p>";
        assert_eq!(extract_hashtags(html), vec!["Rust", "rust_lang", "café"]);
    }

    #[test]
    fn test_hashtag_after_entity_text() {
        assert_eq!(extract_hashtags("<p>it&#39;s #fine</p>"), vec!["fine"]);
    }
}
