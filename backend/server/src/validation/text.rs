use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use super::Rejection;

pub const DISH_FIELD: &str = "dish";

pub const MAX_BODY_BYTES: usize = 10_000;
pub const MAX_FIELDS: usize = 10;
pub const MAX_DISH_LENGTH: usize = 200;
pub const MAX_REPEATED_CHARS: usize = 50;

/// ASCII letters, digits, whitespace, common punctuation, then extended
/// Latin, CJK, Arabic and Devanagari.
static ALLOWED_CHARACTERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^[a-zA-Z0-9\s\-_'",.!?()&/:;+\x{00C0}-\x{024F}\x{4E00}-\x{9FFF}\x{0600}-\x{06FF}\x{0900}-\x{097F}]+$"#,
    )
    .unwrap()
});

/// Scanned in order, first hit wins.
const MALICIOUS_SIGNATURES: &[(&str, &str)] = &[
    (r"(?i)<script", "script tag"),
    (r"(?i)javascript:", "javascript uri"),
    (r"(?i)on(load|error)\s*=", "event handler"),
    (r"(?is)\bselect\b.*\bfrom\b", "sql select"),
    (r"(?is)\bunion\b.*\bselect\b", "sql union"),
    (r"(?i)\bdrop\s+table\b", "sql drop"),
    (r"(?i)\binsert\s+into\b", "sql insert"),
    (r"(?i)\bdelete\s+from\b", "sql delete"),
    (r"(?is)\bupdate\b.*\bset\b", "sql update"),
    (r"(?i)\bexec\s*\(", "code execution"),
    (r"(?i)\beval\s*\(", "code execution"),
    (r"(?i)\bfunction\s*\(", "function literal"),
    (r"\(\s*\)\s*=>", "function literal"),
    (r"\.\./", "path traversal"),
    (r"\.\.\\", "path traversal"),
    (r"(?i)__proto__", "prototype pollution"),
    (r"(?i)prototype", "prototype pollution"),
    (r"(?i)constructor", "prototype pollution"),
];

static MALICIOUS_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    MALICIOUS_SIGNATURES
        .iter()
        .map(|&(pattern, label)| (Regex::new(pattern).unwrap(), label))
        .collect()
});

#[derive(Debug, Clone, PartialEq)]
pub struct DishRequest {
    pub dish: String,
}

pub fn validate_text(body: &Value) -> Result<DishRequest, Rejection> {
    check_body(body)
        .map(|dish| DishRequest {
            dish: sanitize(dish),
        })
        .inspect_err(|rejection| {
            warn!(
                code = rejection.code(),
                field = rejection.field(),
                "Rejected text input"
            );
        })
}

fn check_body(body: &Value) -> Result<&str, Rejection> {
    let Value::Object(fields) = body else {
        return Err(Rejection::NotAnObject);
    };

    if body.to_string().len() > MAX_BODY_BYTES {
        return Err(Rejection::BodyTooLarge);
    }

    if fields.len() > MAX_FIELDS {
        return Err(Rejection::TooManyFields);
    }

    if fields.keys().any(|key| key != DISH_FIELD) {
        return Err(Rejection::UnknownField);
    }

    let dish = match fields.get(DISH_FIELD) {
        Some(Value::String(dish)) => dish.trim(),
        Some(_) => return Err(Rejection::NotAString),
        None => return Err(Rejection::MissingDish),
    };

    if dish.is_empty() {
        return Err(Rejection::Empty);
    }

    if dish.chars().count() > MAX_DISH_LENGTH {
        return Err(Rejection::TooLong {
            max: MAX_DISH_LENGTH,
        });
    }

    if let Some(label) = find_malicious(dish) {
        return Err(Rejection::MaliciousContent { label });
    }

    if longest_run(dish) > MAX_REPEATED_CHARS {
        return Err(Rejection::RepeatedCharacters);
    }

    if !ALLOWED_CHARACTERS.is_match(dish) {
        return Err(Rejection::InvalidCharacters);
    }

    Ok(dish)
}

pub fn find_malicious(input: &str) -> Option<&'static str> {
    MALICIOUS_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(input))
        .map(|&(_, label)| label)
}

fn longest_run(input: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;

    for c in input.chars() {
        current = if previous == Some(c) { current + 1 } else { 1 };
        longest = longest.max(current);
        previous = Some(c);
    }

    longest
}

fn sanitize(dish: &str) -> String {
    dish.trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .take(MAX_DISH_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rejection(body: Value) -> Rejection {
        validate_text(&body).unwrap_err()
    }

    #[test]
    fn test_accepts_plain_dish() {
        let request = validate_text(&json!({ "dish": "  Chicken Rice  " })).unwrap();

        assert_eq!(request.dish, "Chicken Rice");
    }

    #[test]
    fn test_accepts_unicode_dishes() {
        for dish in ["Crème brûlée", "宫保鸡丁", "كبسة", "पालक पनीर", "Fish & Chips (large)"] {
            let request = validate_text(&json!({ "dish": dish })).unwrap();
            assert_eq!(request.dish, dish);
        }
    }

    #[test]
    fn test_body_shape() {
        assert_eq!(rejection(json!(["dish"])), Rejection::NotAnObject);
        assert_eq!(rejection(json!("Chicken Rice")), Rejection::NotAnObject);
        assert_eq!(rejection(Value::Null), Rejection::NotAnObject);
    }

    #[test]
    fn test_body_too_large() {
        let body = json!({ "dish": "a".repeat(MAX_BODY_BYTES) });

        assert_eq!(rejection(body), Rejection::BodyTooLarge);
    }

    #[test]
    fn test_body_size_boundary() {
        // `{"dish":""}` is 11 bytes of framing
        let at_limit = json!({ "dish": "ab".repeat(4994) + "a" });
        assert_eq!(at_limit.to_string().len(), MAX_BODY_BYTES);
        assert_eq!(rejection(at_limit), Rejection::TooLong { max: 200 });

        let over_limit = json!({ "dish": "ab".repeat(4995) });
        assert_eq!(over_limit.to_string().len(), MAX_BODY_BYTES + 1);
        assert_eq!(rejection(over_limit), Rejection::BodyTooLarge);
    }

    #[test]
    fn test_field_count_boundary() {
        let fields = |count: usize| -> Value {
            let mut map: serde_json::Map<String, Value> =
                (1..count).map(|i| (format!("k{i}"), json!(i))).collect();
            map.insert(DISH_FIELD.to_string(), json!("Rice"));
            Value::Object(map)
        };

        assert_eq!(rejection(fields(MAX_FIELDS)), Rejection::UnknownField);
        assert_eq!(rejection(fields(MAX_FIELDS + 1)), Rejection::TooManyFields);
    }

    #[test]
    fn test_field_rules() {
        let many: serde_json::Map<String, Value> =
            (0..11).map(|i| (format!("k{i}"), json!(i))).collect();

        assert_eq!(rejection(Value::Object(many)), Rejection::TooManyFields);
        assert_eq!(
            rejection(json!({ "dish": "Rice", "admin": true })),
            Rejection::UnknownField
        );
        assert_eq!(rejection(json!({})), Rejection::MissingDish);
        assert_eq!(rejection(json!({ "dish": 42 })), Rejection::NotAString);
    }

    #[test]
    fn test_empty() {
        assert_eq!(rejection(json!({ "dish": "" })), Rejection::Empty);
        assert_eq!(rejection(json!({ "dish": "   " })), Rejection::Empty);
        assert_eq!(Rejection::Empty.code(), "empty");
    }

    #[test]
    fn test_too_long() {
        let dish = "ab ".repeat(70);

        assert_eq!(
            rejection(json!({ "dish": dish })),
            Rejection::TooLong { max: 200 }
        );
    }

    #[test]
    fn test_script_injection() {
        let result = rejection(json!({ "dish": "<script>alert(1)</script>" }));

        assert_eq!(result.code(), "malicious_content");
        assert_eq!(result.field(), "dish");
    }

    #[test]
    fn test_malicious_signatures() {
        let cases = [
            ("JavaScript:alert(1)", "javascript uri"),
            ("img onerror=x", "event handler"),
            ("SELECT name FROM users", "sql select"),
            ("1 UNION ALL SELECT 2", "sql union"),
            ("rice; DROP TABLE dishes", "sql drop"),
            ("insert into foods", "sql insert"),
            ("Delete From foods", "sql delete"),
            ("update foods set x", "sql update"),
            ("exec('ls')", "code execution"),
            ("eval (x)", "code execution"),
            ("function(){}", "function literal"),
            ("() => 1", "function literal"),
            ("../../etc/passwd", "path traversal"),
            ("..\\windows", "path traversal"),
            ("__proto__", "prototype pollution"),
            ("Constructor", "prototype pollution"),
        ];

        for (input, label) in cases {
            assert_eq!(find_malicious(input), Some(label), "input: {input:?}");
        }
    }

    #[test]
    fn test_harmless_words() {
        for dish in ["Chef's selection", "Sunset salad", "Evaluated stew", "Mushroom risotto"] {
            assert_eq!(find_malicious(dish), None, "input: {dish:?}");
        }
    }

    #[test]
    fn test_repeated_characters() {
        assert_eq!(
            rejection(json!({ "dish": "A".repeat(100) })),
            Rejection::RepeatedCharacters
        );
        assert_eq!(
            rejection(json!({ "dish": "A".repeat(51) })),
            Rejection::RepeatedCharacters
        );
        assert!(validate_text(&json!({ "dish": "A".repeat(50) })).is_ok());
    }

    #[test]
    fn test_invalid_characters() {
        assert_eq!(
            rejection(json!({ "dish": "Rice 🍚" })),
            Rejection::InvalidCharacters
        );
        assert_eq!(
            rejection(json!({ "dish": "a <b> tag" })),
            Rejection::InvalidCharacters
        );
    }

    #[test]
    fn test_longest_run() {
        assert_eq!(longest_run(""), 0);
        assert_eq!(longest_run("abc"), 1);
        assert_eq!(longest_run("aabbbc"), 3);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("  <Rice>  "), "Rice");
        assert_eq!(sanitize(&"x".repeat(250)).chars().count(), MAX_DISH_LENGTH);
    }
}
