// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markup stripping for untrusted upstream text.
//!
//! Generation replies sometimes carry HTML tags or escaped closing-tag
//! artifacts (`&lt;/div&gt;`). [`sanitize`] removes both so the transcript
//! only ever stores plain text. Escaping for an HTML display surface is a
//! separate concern owned by whichever renderer needs it.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// Opening, closing and self-closing tags, plus comments.
static TAG_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"<(?:/?[A-Za-z][^<>]*|!--[\s\S]*?--)>").ok());

/// Escaped closing tags left behind when a reply was HTML-encoded upstream.
static STRAY_CLOSING_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"&lt;/[A-Za-z][A-Za-z0-9]*\s*&gt;").ok());

/// Removes markup tags and stray closing-tag artifacts, then trims.
///
/// Never fails: if the patterns are unavailable the raw input is returned
/// unchanged. Idempotent, since stripping repeats until nothing matches.
pub fn sanitize(raw: &str) -> String {
    let (Some(tags), Some(stray)) = (TAG_PATTERN.as_ref(), STRAY_CLOSING_TAG.as_ref()) else {
        warn!("markup patterns unavailable, keeping raw text");
        return raw.to_string();
    };

    let mut text = raw.to_string();
    loop {
        let stripped = tags.replace_all(&text, "");
        let stripped = stray.replace_all(&stripped, "").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_simple_tags() {
        assert_eq!(sanitize("<b>Use</b> an <i>LM7805</i>"), "Use an LM7805");
    }

    #[test]
    fn keeps_non_ascii_text_between_tags() {
        assert_eq!(sanitize("<b>Resistor</b> 10kΩ"), "Resistor 10kΩ");
        assert_eq!(sanitize("<i>±5%</i> tolerance, 25 °C"), "±5% tolerance, 25 °C");
    }

    #[test]
    fn strips_tags_with_attributes() {
        assert_eq!(
            sanitize(r#"<a href="http://x/1" target="_blank">datasheet</a>"#),
            "datasheet"
        );
        assert_eq!(sanitize("line<br/>break"), "linebreak");
    }

    #[test]
    fn strips_escaped_closing_artifacts() {
        assert_eq!(sanitize("ATMEGA328P&lt;/div&gt;"), "ATMEGA328P");
        assert_eq!(sanitize("NE555 &lt;/span &gt;"), "NE555");
    }

    #[test]
    fn strips_comments() {
        assert_eq!(sanitize("a<!-- hidden -->b"), "ab");
    }

    #[test]
    fn nested_fragments_collapse_fully() {
        // Removing the inner tag forms a new one.
        assert_eq!(sanitize("<<b>i>x"), "x");
    }

    #[test]
    fn comparison_operators_survive() {
        assert_eq!(sanitize("use R < 10k and V > 3"), "use R < 10k and V > 3");
        assert_eq!(sanitize("if a<3 then"), "if a<3 then");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize("  <p>LM358</p>\n"), "LM358");
    }

    #[test]
    fn plain_text_is_unchanged() {
        let text = "Use an ATMEGA328P for this project. Thank you!";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn empty_input() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("<div></div>"), "");
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(raw in r"[a-z <>/&;!\-=\x22]{0,64}") {
            let once = sanitize(&raw);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn sanitize_is_idempotent_on_any_string(raw in any::<String>()) {
            let once = sanitize(&raw);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn output_contains_no_tags(raw in r"[a-z<>/ ]{0,48}") {
            let out = sanitize(&raw);
            let tags = TAG_PATTERN.as_ref().expect("pattern compiles");
            prop_assert!(!tags.is_match(&out));
        }
    }
}
