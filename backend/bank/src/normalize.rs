use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9 ]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());
static QUALIFIERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(fresh|dried|raw|cooked|organic|ground)\b").unwrap());

/// Canonical lookup key for a free-text ingredient name.
pub fn normalize(input: &str) -> String {
    let lowered = input.to_lowercase();

    let cleaned = DISALLOWED.replace_all(lowered.trim(), "");
    let collapsed = WHITESPACE.replace_all(&cleaned, " ");

    // qualifiers leave gaps behind, so collapse again
    let stripped = QUALIFIERS.replace_all(&collapsed, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}
