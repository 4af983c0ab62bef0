//! HTML entity decoding

use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

use super::compile;

static NAMED_ENTITY: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"&([a-zA-Z]+);"));
static NUMERIC_ENTITY: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));?"));

/// Named entities the server renderer emits
fn named_entity(name: &str) -> Option<&'static str> {
    let decoded = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "copy" => "\u{00A9}",
        "reg" => "\u{00AE}",
        "trade" => "\u{2122}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        _ => return None,
    };
    Some(decoded)
}

fn numeric_entity(caps: &Captures<'_>) -> Option<char> {
    let code = if let Some(hex) = caps.get(1) {
        u32::from_str_radix(hex.as_str(), 16).ok()?
    } else {
        caps.get(2)?.as_str().parse::<u32>().ok()?
    };
    char::from_u32(code)
}

/// Decode named and numeric HTML entities.
///
/// Named entities are decoded in one pass, numeric ones in a second. Text
/// produced by the numeric pass is never scanned again, so `&#38;lt;` decodes
/// to `&lt;` and not `<`. Unknown names and code points outside the Unicode
/// scalar range are left as written.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let named = match NAMED_ENTITY.as_ref() {
        Some(re) => re
            .replace_all(text, |caps: &Captures<'_>| {
                named_entity(&caps[1]).map_or_else(|| caps[0].to_string(), str::to_string)
            })
            .into_owned(),
        None => text.to_string(),
    };

    match NUMERIC_ENTITY.as_ref() {
        Some(re) => re
            .replace_all(&named, |caps: &Captures<'_>| {
                numeric_entity(caps).map_or_else(|| caps[0].to_string(), String::from)
            })
            .into_owned(),
        None => named,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_entities() {
        assert_eq!(
            decode_entities("Tom &amp; Jerry &lt;3 &quot;hi&quot; &apos;yo&apos;"),
            "Tom & Jerry <3 \"hi\" 'yo'"
        );
        assert_eq!(decode_entities("a&nbsp;b"), "a b");
        assert_eq!(
            decode_entities("&ldquo;x&rdquo; &mdash; &hellip;&trade;"),
            "\u{201C}x\u{201D} \u{2014} \u{2026}\u{2122}"
        );
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("it&#39;s"), "it's");
        assert_eq!(decode_entities("&#128512"), "\u{1F600}");
    }

    #[test]
    fn test_hex_entity_without_semicolon() {
        assert_eq!(decode_entities("&#x41 &#X42"), "A B");
        assert_eq!(decode_entities("x&#x1F600"), "x\u{1F600}");
    }

    #[test]
    fn test_invalid_code_points_left_alone() {
        assert_eq!(decode_entities("&#xD800;"), "&#xD800;");
        assert_eq!(decode_entities("&#99999999999;"), "&#99999999999;");
        assert_eq!(decode_entities("&#x110000;"), "&#x110000;");
    }

    #[test]
    fn test_unknown_named_entity_kept() {
        assert_eq!(decode_entities("&bogus; &amp"), "&bogus; &amp");
    }

    #[test]
    fn test_no_rescan_of_numeric_output() {
        assert_eq!(decode_entities("&#38;lt;"), "&lt;");
        assert_eq!(decode_entities("&#x26;amp;"), "&amp;");
    }

    #[test]
    fn test_named_pass_is_single_pass() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_decoded_text_is_stable() {
        for text in ["plain text", "a < b && c > d", "caf\u{e9} \u{1F600}", "R&D; 50%"] {
            let once = decode_entities(text);
            assert_eq!(decode_entities(&once), once);
        }
    }
}
