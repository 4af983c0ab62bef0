//! Custom emoji shortcode substitution

use std::collections::HashMap;
use std::sync::LazyLock;

use regex_lite::Regex;

use super::compile;
use super::weburl::validate_web_url;

/// Shortcode (without colons) -> image URL
pub type EmojiLookup = HashMap<String, String>;

static SHORTCODE: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r":([A-Za-z0-9_+\-]{1,50}):"));

/// A `:shortcode:` with a usable image URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EmojiMatch<'a> {
    /// Byte offset of the opening colon
    pub start: usize,
    /// Byte offset one past the closing colon
    pub end: usize,
    /// Shortcode without colons
    pub shortcode: &'a str,
    /// Validated image URL
    pub url: &'a str,
}

/// Resolve a shortcode, refusing anything that is not a plain web URL
fn resolve<'a>(lookup: &'a EmojiLookup, shortcode: &str) -> Option<&'a str> {
    let url = lookup.get(shortcode)?;
    match validate_web_url(url) {
        Ok(_) => Some(url.as_str()),
        Err(e) => {
            tracing::debug!("Ignoring emoji :{shortcode}: with URL {url}: {e}");
            None
        }
    }
}

/// Whether `pos` falls inside an `<img ...` tag that has not been closed yet
fn inside_img_tag(html: &str, pos: usize) -> bool {
    let before = &html[..pos];
    let Some(open) = before.to_ascii_lowercase().rfind("<img") else {
        return false;
    };
    !before[open..].contains('>')
}

/// Whether `pos` falls inside any tag that has not been closed yet
pub(crate) fn inside_tag(html: &str, pos: usize) -> bool {
    let before = &html[..pos];
    before.rfind('<').is_some_and(|open| !before[open..].contains('>'))
}

/// Resolvable shortcodes in `text`, in order
pub(crate) fn emoji_matches<'a>(text: &'a str, lookup: &'a EmojiLookup) -> Vec<EmojiMatch<'a>> {
    let Some(re) = SHORTCODE.as_ref() else {
        return Vec::new();
    };
    if lookup.is_empty() {
        return Vec::new();
    }

    re.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let shortcode = caps.get(1)?.as_str();
            let url = resolve(lookup, shortcode)?;
            Some(EmojiMatch {
                start: whole.start(),
                end: whole.end(),
                shortcode,
                url,
            })
        })
        .collect()
}

/// Replace known `:shortcode:` tokens with `<img>` tags.
///
/// Tokens already inside an `<img>` tag (e.g. in its `alt`) are left alone, as
/// are shortcodes whose URL is not an absolute http(s) URL. Attribute values
/// are HTML-escaped.
pub fn replace_emoji_shortcodes(html: &str, lookup: &EmojiLookup) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;

    for m in emoji_matches(html, lookup) {
        if inside_img_tag(html, m.start) {
            continue;
        }
        let code = html_escape::encode_safe(m.shortcode);
        let src = html_escape::encode_safe(m.url);
        out.push_str(&html[last..m.start]);
        out.push_str(&format!(
            r#"<img class="custom-emoji" src="{src}" alt=":{code}:" title=":{code}:">"#
        ));
        last = m.end;
    }

    out.push_str(&html[last..]);
    out
}
