use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});")
        .expect("ENTITY_REGEX is a valid regex pattern")
});

/// Every named reference in the WHATWG table, keyed by name without the `&`
/// and `;`. Legacy forms that omit the semicolon are not resolved.
static NAMED_ENTITIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    entities::ENTITIES
        .iter()
        .filter_map(|entity| {
            let name = entity.entity.strip_prefix('&')?.strip_suffix(';')?;
            Some((name, entity.characters))
        })
        .collect()
});

/// Resolves named and numeric HTML character references to their literal
/// characters. Markup is never interpreted: `&lt;b&gt;` becomes the text `<b>`.
/// Unknown names and invalid code points are left exactly as written.
pub fn decode_html_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    ENTITY_REGEX
        .replace_all(input, |caps: &Captures| {
            resolve(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn resolve(reference: &str) -> Option<String> {
    match reference.strip_prefix('#') {
        Some(numeric) => {
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            // NUL is not a valid character reference
            if code == 0 {
                return None;
            }
            char::from_u32(code).map(String::from)
        }
        None => NAMED_ENTITIES.get(reference).map(|s| s.to_string()),
    }
}

/// True when the text still carries something that decodes to a different value.
pub fn contains_entities(input: &str) -> bool {
    ENTITY_REGEX
        .captures_iter(input)
        .any(|caps| resolve(&caps[1]).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_common_named_entities() {
        assert_eq!(
            decode_html_entities("&quot;Hello&quot; &amp; goodbye"),
            "\"Hello\" & goodbye"
        );
        assert_eq!(decode_html_entities("Pok&eacute;mon"), "Pokémon");
        assert_eq!(decode_html_entities("&ldquo;Yes&rdquo;"), "“Yes”");
    }

    #[test]
    fn decodes_html4_names_outside_the_common_set() {
        let cases = [
            ("&zeta;&eta;&Epsilon;&Kappa;", "ζηΕΚ"),
            ("&not;&uml;&circ;&tilde;", "¬¨ˆ˜"),
            ("&sigmaf;&upsilon;&chi;", "ςυχ"),
            ("&spades;&diams;&curren;&acute;", "♠♦¤´"),
            ("a&emsp;b", "a\u{2003}b"),
        ];

        for (encoded, decoded) in cases {
            assert!(contains_entities(encoded), "{} should be detected", encoded);
            assert_eq!(decode_html_entities(encoded), decoded);
        }
    }

    #[test]
    fn every_whatwg_named_reference_resolves() {
        for entity in entities::ENTITIES.iter().filter(|e| e.entity.ends_with(';')) {
            assert_eq!(
                decode_html_entities(entity.entity),
                entity.characters,
                "{} did not decode",
                entity.entity
            );
        }
    }

    #[test]
    fn decodes_decimal_and_hex_references() {
        assert_eq!(decode_html_entities("Don&#039;t"), "Don't");
        assert_eq!(decode_html_entities("Don&#x27;t"), "Don't");
        assert_eq!(decode_html_entities("&#X41;&#66;"), "AB");
    }

    #[test]
    fn tags_are_decoded_as_text_not_interpreted() {
        assert_eq!(
            decode_html_entities("&lt;script&gt;alert(1)&lt;/script&gt;"),
            "<script>alert(1)</script>"
        );
        assert_eq!(decode_html_entities("<b>bold</b>"), "<b>bold</b>");
    }

    #[test]
    fn malformed_sequences_pass_through() {
        assert_eq!(decode_html_entities("AT&T"), "AT&T");
        assert_eq!(decode_html_entities("&notanentity;"), "&notanentity;");
        assert_eq!(decode_html_entities("&#0;"), "&#0;");
        assert_eq!(decode_html_entities("&#xD800;"), "&#xD800;");
        assert_eq!(decode_html_entities("&amp"), "&amp");
        assert_eq!(decode_html_entities("& ;"), "& ;");
        assert_eq!(decode_html_entities(""), "");
    }

    #[test]
    fn decoding_is_single_pass() {
        assert_eq!(decode_html_entities("&amp;quot;"), "&quot;");
    }

    #[test]
    fn decoding_decoded_text_is_a_no_op() {
        let samples = [
            "What is the capital of France?",
            "Don't panic",
            "Rock & Roll",
            "\"Quoted\" <tag>",
            "Pokémon — “Gotta catch 'em all”",
        ];

        for sample in samples {
            let once = decode_html_entities(sample);
            assert_eq!(once, sample);
            assert_eq!(decode_html_entities(&once), once);
        }

        let encoded = "The &quot;Big Four&quot; of Thrash &amp; Metal&#039;s fans";
        let once = decode_html_entities(encoded);
        assert_eq!(decode_html_entities(&once), once);
    }

    #[test]
    fn contains_entities_detects_only_resolvable_references() {
        assert!(contains_entities("&quot;"));
        assert!(contains_entities("a &#039; b"));
        assert!(!contains_entities("AT&T"));
        assert!(!contains_entities("&bogus;"));
        assert!(!contains_entities(&decode_html_entities("&quot;x&quot;")));
    }
}
