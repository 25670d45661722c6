use regex::Regex;
use std::sync::OnceLock;

fn disallowed() -> &'static Regex {
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    DISALLOWED.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]").expect("static regex is valid"))
}

/// Reduces arbitrary text to a token that is safe as a file or folder name
/// and on a shell command line.
///
/// Spaces become `_`, forward slashes become `-`, and anything else outside
/// `[A-Za-z0-9_-]` is dropped. Distinct inputs may collapse to the same token.
pub fn shell_friendly_name(text: &str) -> String {
    let replaced = text.replace(' ', "_").replace('/', "-");
    disallowed().replace_all(&replaced, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_spaces_and_slashes() {
        assert_eq!(shell_friendly_name("Senior Eng/Lead"), "Senior_Eng-Lead");
    }

    #[test]
    fn strips_punctuation_and_non_ascii() {
        assert_eq!(shell_friendly_name("Müller & Söhne GmbH."), "Mller__Shne_GmbH");
        assert_eq!(shell_friendly_name("C++ (m/w/d)"), "C_m-w-d");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(shell_friendly_name(""), "");
        assert_eq!(shell_friendly_name("!!!"), "");
    }

    #[test]
    fn sanitizing_is_idempotent_and_restricted_to_safe_charset() {
        let inputs = [
            "Acme Corp",
            "a/b/c d",
            "tab\tseparated\nlines",
            "émigré/naïve café",
            "__--__",
            "100% remote?",
            "ÄÖÜ ß / € $",
        ];
        for input in inputs {
            let once = shell_friendly_name(input);
            let twice = shell_friendly_name(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
            assert!(
                once.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
                "unsafe character left in {once:?}"
            );
        }
    }
}
