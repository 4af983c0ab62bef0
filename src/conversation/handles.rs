//! Parsing of recipient/search input into account handles

use std::collections::HashSet;

/// Tokens typed into a recipient field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandleTokens {
    /// Tokens followed by a delimiter
    pub completed: Vec<String>,
    /// Trailing token still being typed
    pub active: Option<String>,
}

fn is_delimiter(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

/// Split input on whitespace and commas.
///
/// The last token counts as active unless the input ends with a delimiter.
pub fn tokenize(input: &str) -> HandleTokens {
    let mut completed: Vec<String> = input
        .split(is_delimiter)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let ends_open = input.chars().last().is_some_and(|c| !is_delimiter(c));
    let active = if ends_open { completed.pop() } else { None };

    HandleTokens { completed, active }
}

/// Canonical lower-case handle without `@` prefix or trailing commas.
///
/// Returns `None` when nothing is left. Applying it twice gives the same
/// result as applying it once.
pub fn normalize_handle(raw: &str) -> Option<String> {
    let handle = raw
        .trim_start_matches(|c: char| c == '@' || c.is_whitespace())
        .trim_end_matches(|c: char| c == ',' || c.is_whitespace())
        .to_lowercase();
    (!handle.is_empty()).then_some(handle)
}

/// Queries worth sending to account search for a typed token, most literal first
pub fn search_query_variants(token: &str) -> Vec<String> {
    let raw = token.trim();
    let mut variants = vec![raw.to_string()];

    if let Some(normalized) = normalize_handle(raw) {
        if raw.starts_with('@') || normalized.contains('@') {
            variants.push(format!("@{normalized}"));
        }
        if let Some((user, host)) = normalized.split_once('@')
            && !user.is_empty()
            && !host.is_empty()
        {
            variants.push(user.to_string());
        }
        variants.insert(1, normalized);
    }

    let mut seen = HashSet::new();
    variants.retain(|v| !v.is_empty() && seen.insert(v.clone()));
    variants
}
