//! Best-effort JSON repair for slightly malformed model output.
//!
//! Three transforms, applied in order: strip trailing commas before a
//! closing brace/bracket, quote bare identifier keys, and convert single
//! quotes to double quotes. Adversarial input can still defeat this
//! silently — it is a heuristic, not a parser.

use regex::Regex;
use std::sync::LazyLock;

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("static regex"));
static BARE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)(\s*:)"#).expect("static regex"));

/// Apply the repair transform. Idempotent: `repair_json(&repair_json(s)) ==
/// repair_json(s)`.
#[must_use]
pub fn repair_json(input: &str) -> String {
    let no_trailing_commas = strip_trailing_commas(input);
    let quoted_keys = BARE_KEY.replace_all(&no_trailing_commas, r#"$1"$2"$3"#);
    single_quotes_to_double(&quoted_keys)
}

/// Strip trailing commas before a closing brace/bracket, to a fixed point.
///
/// A single pass only removes the innermost comma of a run (`",,"` before a
/// closer leaves a newly-trailing comma exposed), so repeat until the string
/// stops changing.
fn strip_trailing_commas(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let next = TRAILING_COMMA.replace_all(&current, "$1");
        if next == current {
            return current;
        }
        current = next.into_owned();
    }
}

/// Convert single-quoted strings to double-quoted, outside of any existing
/// double-quoted string literal.
fn single_quotes_to_double(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_double = false;
    while let Some(c) = chars.next() {
        match c {
            '"' if !in_double => {
                in_double = true;
                out.push(c);
            }
            '"' => {
                // Could be an escaped quote within a double-quoted string;
                // count preceding backslashes to decide.
                out.push(c);
                if !ends_with_odd_backslashes(&out) {
                    in_double = false;
                }
            }
            '\'' if !in_double => out.push('"'),
            _ => out.push(c),
        }
    }
    out
}

fn ends_with_odd_backslashes(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return false;
    }
    let mut count = 0;
    let mut i = bytes.len() - 2;
    loop {
        if bytes[i] == b'\\' {
            count += 1;
            if i == 0 {
                break;
            }
            i -= 1;
        } else {
            break;
        }
    }
    count % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_comma_before_brace() {
        assert_eq!(repair_json(r#"{"a":1,}"#), r#"{"a":1}"#);
    }

    #[test]
    fn strips_trailing_comma_before_bracket() {
        assert_eq!(repair_json("[1,2,]"), "[1,2]");
    }

    #[test]
    fn quotes_bare_keys() {
        assert_eq!(repair_json("{a:1, b:2}"), r#"{"a":1, "b":2}"#);
    }

    #[test]
    fn converts_single_quotes() {
        assert_eq!(repair_json("{'a': 'b'}"), r#"{"a": "b"}"#);
    }

    #[test]
    fn combined_repairs() {
        let input = "{a: 'x', b: 2,}";
        let repaired = repair_json(input);
        let parsed: serde_json::Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(parsed, serde_json::json!({"a": "x", "b": 2}));
    }

    #[test]
    fn idempotent_on_already_valid_json() {
        let input = r#"{"a": 1, "b": [1, 2, 3]}"#;
        assert_eq!(repair_json(input), input);
    }

    #[test]
    fn strips_doubled_trailing_comma_in_array() {
        assert_eq!(repair_json("[1,,]"), "[1]");
    }

    #[test]
    fn strips_doubled_trailing_comma_in_object() {
        assert_eq!(repair_json(r#"{"a":1,,}"#), r#"{"a":1}"#);
    }

    #[test]
    fn repair_is_idempotent_on_doubled_trailing_commas() {
        let once = repair_json("[1,,]");
        let twice = repair_json(&once);
        assert_eq!(once, twice);
    }

    proptest::proptest! {
        #[test]
        fn repair_is_idempotent(s in "\\PC{0,64}") {
            let once = repair_json(&s);
            let twice = repair_json(&once);
            proptest::prop_assert_eq!(once, twice);
        }
    }
}
