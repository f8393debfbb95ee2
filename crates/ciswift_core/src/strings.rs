//! Define identifier casing and Swift literal spelling helpers.
//!
//! ## Notes
//! - Casing only touches the first character. `HTTPServer` camelCases to `hTTPServer`; the source
//!   language already uses PascalCase member names, so acronyms are rare and kept verbatim.
//! - Literal escaping produces text that is valid inside a Swift `"..."` literal, including inside
//!   `\(...)` interpolation prefixes.

/// Lowercase the first character of `name`.
///
/// ## Examples
/// ```rust
/// use ciswift_core::strings::camel_case;
///
/// assert_eq!(camel_case("GetValue"), "getValue");
/// assert_eq!(camel_case("x"), "x");
/// ```
pub fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase the first character of `name`.
pub fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Escape text for use between the quotes of a Swift string literal.
///
/// Control characters without a short escape are written as `\u{XX}`.
pub fn escape_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Replace every character that is not an ASCII letter, digit or `_` with `_`.
///
/// Used to turn resource names such as `logo.png` into identifiers.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_lowercases_first_char_only() {
        assert_eq!(camel_case("ToString"), "toString");
        assert_eq!(camel_case(""), "");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("count"), "Count");
    }

    #[test]
    fn test_escape_string_literal() {
        assert_eq!(escape_string_literal("a\"b\\c\n"), "a\\\"b\\\\c\\n");
        assert_eq!(escape_string_literal("\u{1}"), "\\u{1}");
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("logo.png"), "logo_png");
        assert_eq!(sanitize_identifier("data-1"), "data_1");
    }
}
