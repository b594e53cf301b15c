//! Denylist text sanitizer
//!
//! Strips `<script>` blocks and then every remaining angle bracket. Other
//! HTML-significant characters (`&`, quotes) pass through untouched.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("SCRIPT_BLOCK is a valid regex pattern")
});

/// Removes script blocks and angle brackets from `input`.
pub fn sanitize_string(input: &str) -> String {
    SCRIPT_BLOCK
        .replace_all(input, "")
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect()
}
