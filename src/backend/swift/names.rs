//! Spell source identifiers as Swift identifiers.
//!
//! Type names are kept as written. Member, local and parameter names are camelCased, and names that collide with a
//! Swift keyword get a trailing `_`.

use ciswift_core::lang::swift_keywords;
use ciswift_core::strings::{camel_case, pascal_case, sanitize_identifier};

/// Swift spelling of a member, local or parameter name.
pub(crate) fn member_name(name: &str) -> String {
    if name == "this" {
        return "self".to_string();
    }
    swift_keywords::escape(&camel_case(name))
}

/// Read-only name a reassigned parameter is received under.
pub(crate) fn param_shadow_name(name: &str) -> String {
    format!("ciParam{}", pascal_case(name))
}

/// Class-level name of a constant declared inside a method.
pub(crate) fn method_const_name(method: &str, name: &str) -> String {
    format!("{}{}", camel_case(method), pascal_case(name))
}

/// Identifier of a resource constant.
pub(crate) fn resource_name(name: &str) -> String {
    sanitize_identifier(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_name_camel_cases() {
        assert_eq!(member_name("GetArea"), "getArea");
        assert_eq!(member_name("count"), "count");
    }

    #[test]
    fn test_member_name_escapes_keywords() {
        assert_eq!(member_name("Default"), "default_");
        assert_eq!(member_name("Int"), "int_");
        assert_eq!(member_name("in"), "in_");
    }

    #[test]
    fn test_this_is_self() {
        assert_eq!(member_name("this"), "self");
    }

    #[test]
    fn test_param_shadow_name() {
        assert_eq!(param_shadow_name("count"), "ciParamCount");
    }

    #[test]
    fn test_method_const_name() {
        assert_eq!(method_const_name("Decode", "Table"), "decodeTable");
    }

    #[test]
    fn test_resource_name() {
        assert_eq!(resource_name("font.bin"), "font_bin");
    }
}
