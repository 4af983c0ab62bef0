//! Styled-text segmentation of post content

use serde::{Deserialize, Serialize};

use super::emoji::{EmojiLookup, emoji_matches, inside_tag};
use super::html::{PlainTextStyle, anchors, hashtag_tokens, strip_to_plain_text_with};
use super::weburl::validate_web_url;

/// URL scheme used for hashtag links when the caller has no resolver of its own
pub const DEFAULT_HASHTAG_SCHEME: &str = "tusk";

/// One run of rendered post content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Segment {
    /// Unstyled text
    Text(String),
    /// Clickable text
    Link {
        /// Target URL
        url: String,
        /// Text shown for the link
        text: String,
    },
    /// Custom emoji image
    Emoji {
        /// Shortcode without colons
        shortcode: String,
        /// Image URL
        url: String,
    },
}

impl Segment {
    /// Text this segment stands for in the plain-text rendering
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(text) | Self::Link { text, .. } => text.clone(),
            Self::Emoji { shortcode, .. } => format!(":{shortcode}:"),
        }
    }
}

/// `tusk://tags/<tag>`
pub fn default_hashtag_url(tag: &str) -> String {
    format!("{DEFAULT_HASHTAG_SCHEME}://tags/{}", urlencoding::encode(tag))
}

#[derive(Debug)]
struct Span {
    start: usize,
    end: usize,
    segment: Segment,
}

/// Tag named by a hashtag anchor, from its text (`#tag`) or its `/tags/` path
fn anchor_hashtag(text: &str, href: &str) -> Option<String> {
    let tokens = hashtag_tokens(text);
    if let Some(token) = tokens.first()
        && token.start == 0
        && token.end == text.len()
    {
        return Some(token.body.to_string());
    }

    let url = validate_web_url(href).ok()?;
    let tag = url.path().strip_prefix("/tags/")?;
    let tag = urlencoding::decode(tag).ok()?;
    (!tag.is_empty()).then(|| tag.into_owned())
}

fn link_spans(html: &str, plain: &str, hashtag_url: &impl Fn(&str) -> String) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for anchor in anchors(html) {
        if anchor.text.is_empty() {
            continue;
        }
        // Text before the anchor cannot belong to it.
        let before = strip_to_plain_text_with(&html[..anchor.start], PlainTextStyle::Paragraphs);
        let from = if plain.is_char_boundary(before.len()) {
            cursor.max(before.len())
        } else {
            cursor
        };
        let Some(offset) = plain[from..].find(&anchor.text) else {
            tracing::debug!("Anchor text {:?} not found in plain text", anchor.text);
            continue;
        };

        let url = if let Some(tag) = anchor_hashtag(&anchor.text, &anchor.href) {
            hashtag_url(tag.as_str())
        } else if validate_web_url(&anchor.href).is_ok() {
            anchor.href
        } else {
            continue;
        };

        let start = from + offset;
        let end = start + anchor.text.len();
        spans.push(Span {
            start,
            end,
            segment: Segment::Link {
                url,
                text: anchor.text,
            },
        });
        cursor = end;
    }

    spans
}

/// Markup with each emoji shortcode swapped for a placeholder character
struct MarkedEmoji {
    html: String,
    placeholder: Option<char>,
    emoji: Vec<Segment>,
}

impl MarkedEmoji {
    /// Expand resolvable shortcodes that sit outside any tag.
    ///
    /// The placeholder is a private-use character absent from `html`, so it
    /// survives tag stripping and marks exactly the expanded emoji.
    fn new(html: &str, lookup: &EmojiLookup) -> Self {
        let matches: Vec<_> = emoji_matches(html, lookup)
            .into_iter()
            .filter(|m| !inside_tag(html, m.start))
            .collect();
        let placeholder = match ('\u{E000}'..='\u{F8FF}').find(|c| !html.contains(*c)) {
            Some(c) if !matches.is_empty() => c,
            _ => {
                return Self {
                    html: html.to_string(),
                    placeholder: None,
                    emoji: Vec::new(),
                };
            }
        };

        let mut marked = String::with_capacity(html.len());
        let mut emoji = Vec::with_capacity(matches.len());
        let mut last = 0;
        for m in matches {
            marked.push_str(&html[last..m.start]);
            marked.push(placeholder);
            emoji.push(Segment::Emoji {
                shortcode: m.shortcode.to_string(),
                url: m.url.to_string(),
            });
            last = m.end;
        }
        marked.push_str(&html[last..]);

        Self {
            html: marked,
            placeholder: Some(placeholder),
            emoji,
        }
    }

    /// Emoji spans at the placeholder positions of the stripped text
    fn spans(&mut self, plain: &str) -> Vec<Span> {
        let Some(placeholder) = self.placeholder else {
            return Vec::new();
        };
        let positions: Vec<usize> = plain.match_indices(placeholder).map(|(i, _)| i).collect();
        if positions.len() != self.emoji.len() {
            tracing::debug!(
                "{} emoji placeholders for {} shortcodes",
                positions.len(),
                self.emoji.len()
            );
        }

        positions
            .into_iter()
            .zip(std::mem::take(&mut self.emoji))
            .map(|(start, segment)| Span {
                start,
                end: start + placeholder.len_utf8(),
                segment,
            })
            .collect()
    }
}

/// Put the `:shortcode:` text back wherever a placeholder ends up inside
/// another segment
fn restore_shortcodes(
    text: &str,
    placeholder: Option<char>,
    emoji: &[Span],
    offset: usize,
) -> String {
    let Some(placeholder) = placeholder else {
        return text.to_string();
    };
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        match emoji.iter().find(|span| span.start == offset + i) {
            Some(span) if c == placeholder => out.push_str(&span.segment.display_text()),
            _ => out.push(c),
        }
    }
    out
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::Text(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Text(text.to_string()));
    }
}

/// Split post HTML into text, link and emoji segments.
///
/// Custom emoji shortcodes are expanded in the markup first, so entity-encoded
/// colons or shortcodes inside tags never become emoji. The content is then
/// stripped to paragraph-style plain text. Anchors are located in it by their
/// visible text, after any text that precedes them in the markup, together
/// with bare `#hashtags`. Hashtags link to `hashtag_url(tag)`. The segments
/// cover the plain text in order; an anchor whose text cannot be found is left
/// as plain text.
pub fn to_segments(
    html: &str,
    emojis: &EmojiLookup,
    hashtag_url: impl Fn(&str) -> String,
) -> Vec<Segment> {
    let mut marked = MarkedEmoji::new(html, emojis);
    let plain = strip_to_plain_text_with(&marked.html, PlainTextStyle::Paragraphs);
    let emoji = marked.spans(&plain);
    let restore = |text: &str, offset: usize| {
        restore_shortcodes(text, marked.placeholder, &emoji, offset)
    };

    let mut spans = link_spans(&marked.html, &plain, &hashtag_url);
    spans.extend(hashtag_tokens(&plain).into_iter().map(|token| Span {
        start: token.start,
        end: token.end,
        segment: Segment::Link {
            url: hashtag_url(token.body),
            text: plain[token.start..token.end].to_string(),
        },
    }));
    spans.extend(emoji.iter().map(|span| Span {
        start: span.start,
        end: span.end,
        segment: span.segment.clone(),
    }));

    // Stable: anchors win ties with the hashtags and emoji inside them.
    spans.sort_by_key(|span| span.start);

    let mut segments = Vec::new();
    let mut last = 0;
    for span in spans {
        if span.start < last {
            continue;
        }
        push_text(&mut segments, &restore(&plain[last..span.start], last));
        let segment = match span.segment {
            Segment::Link { url, text } => Segment::Link {
                text: restore(&text, span.start),
                url,
            },
            other => other,
        };
        segments.push(segment);
        last = span.end;
    }
    push_text(&mut segments, &restore(&plain[last..], last));

    segments
}
