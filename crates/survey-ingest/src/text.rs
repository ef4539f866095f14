//! Cleanup of rich-text survey strings.
//!
//! Export texts arrive as HTML fragments. Comparison works on plain prose,
//! so tags are stripped, common entities decoded, zero-width characters
//! dropped and runs of spaces collapsed before anything else sees the text.

use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid regex"));

/// Entities observed in real exports. Numeric references are handled
/// separately; `&amp;` must decode last so it cannot fabricate new entities.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#34;", "\""),
    ("&apos;", "'"),
    ("&amp;", "&"),
];

/// Strip HTML tags and decode entities from survey text.
pub fn clean_text(text: &str) -> String {
    let without_tags = HTML_TAG.replace_all(text, "");
    let mut decoded = without_tags.into_owned();
    for (entity, replacement) in ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, replacement);
        }
    }
    decoded = decoded.replace('\u{200b}', "");
    let collapsed = SPACE_RUN.replace_all(&decoded, " ");
    collapsed.trim().to_string()
}
