//! Final cleanup applied to every reply

use regex::Regex;
use std::sync::LazyLock;

static PAIRED_BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("paired bold pattern is valid"));

static PAIRED_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__(.+?)__").expect("paired underscore pattern is valid"));

static UNDERSCORE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__").expect("underscore marker pattern is valid"));

/// Remove bold markup: paired markers keep their inner text, then any
/// unpaired `**` or `__` left over is dropped. Single `*` bullets survive.
///
/// `__` only counts as markup at a word edge, so URLs and identifiers such
/// as `a__b__c` come through untouched.
#[must_use]
pub fn strip_emphasis(text: &str) -> String {
    let unwrapped = PAIRED_BOLD.replace_all(text, "$1").replace("**", "");
    let unwrapped = unwrap_underscores(&unwrapped);
    drop_stray_underscores(&unwrapped).trim().to_string()
}

fn word_char_before(text: &str, at: usize) -> bool {
    text[..at].chars().next_back().is_some_and(char::is_alphanumeric)
}

fn word_char_after(text: &str, at: usize) -> bool {
    text[at..].chars().next().is_some_and(char::is_alphanumeric)
}

fn unwrap_underscores(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in PAIRED_UNDERSCORE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        if word_char_before(text, whole.start()) || word_char_after(text, whole.end()) {
            out.push_str(whole.as_str());
        } else {
            out.push_str(inner.as_str());
        }
        last = whole.end();
    }
    out.push_str(&text[last..]);
    out
}

fn drop_stray_underscores(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for marker in UNDERSCORE_MARKER.find_iter(text) {
        out.push_str(&text[last..marker.start()]);
        if word_char_before(text, marker.start()) && word_char_after(text, marker.end()) {
            out.push_str(marker.as_str());
        }
        last = marker.end();
    }
    out.push_str(&text[last..]);
    out
}
