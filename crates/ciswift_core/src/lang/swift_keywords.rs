//! Swift keyword vocabulary (for codegen identifier escaping).
//!
//! Only lowercase spellings are listed: generated member names are camelCased before the lookup, so
//! a source name like `Break` is checked as `break`.

/// Reserved words that cannot be used as bare identifiers in generated Swift.
///
/// Includes declaration, statement and expression keywords plus the few type names (`Int`) and
/// contextual words (`in`, `is`, `as`) that would change the meaning of generated code.
pub const SWIFT_KEYWORDS: &[&str] = &[
    "as", "associatedtype", "await", "break", "case", "catch", "class", "continue", "default", "defer", "deinit", "do",
    "else", "enum", "extension", "fallthrough", "false", "fileprivate", "for", "foreach", "func", "guard", "if",
    "import", "in", "init", "inout", "int", "internal", "is", "let", "nil", "operator", "private", "protocol",
    "public", "repeat", "rethrows", "return", "self", "static", "struct", "subscript", "super", "switch", "throw",
    "throws", "true", "try", "typealias", "var", "void", "where", "while",
];

/// Check whether an identifier is a Swift keyword.
pub fn is_keyword(name: &str) -> bool {
    SWIFT_KEYWORDS.contains(&name)
}

/// Escape a camelCased identifier that collides with a Swift keyword by appending `_`.
///
/// ## Examples
/// ```rust
/// use ciswift_core::lang::swift_keywords::escape;
///
/// assert_eq!(escape("default"), "default_");
/// assert_eq!(escape("width"), "width");
/// ```
pub fn escape(name: &str) -> String {
    if is_keyword(name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_keywords_are_reserved() {
        for kw in ["if", "while", "repeat", "switch", "guard", "defer"] {
            assert!(is_keyword(kw), "{kw} should be reserved");
        }
    }

    #[test]
    fn test_escape_appends_underscore() {
        assert_eq!(escape("self"), "self_");
        assert_eq!(escape("int"), "int_");
        assert_eq!(escape("value"), "value");
    }
}
