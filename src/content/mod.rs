//! HTML content transformer
//!
//! Turns the HTML subset produced by Mastodon's sanitizer into plain text,
//! link/mention/hashtag lists and styled segments. Nothing here fails: a
//! malformed span is left as text or dropped from the result.

mod emoji;
mod entities;
mod html;
mod segments;
mod weburl;

use regex_lite::Regex;

pub use emoji::{EmojiLookup, replace_emoji_shortcodes};
pub use entities::decode_entities;
pub use html::{
    PlainTextStyle, extract_external_links, extract_hashtags, extract_links, extract_mentions,
    strip_to_plain_text, strip_to_plain_text_with,
};
pub use segments::{DEFAULT_HASHTAG_SCHEME, Segment, default_hashtag_url, to_segments};
pub use weburl::{UrlRejection, validate_web_url};

/// Compile a built-in pattern; a failure disables the pass that uses it
fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| tracing::debug!("Failed to compile pattern {pattern}: {e}"))
        .ok()
}
