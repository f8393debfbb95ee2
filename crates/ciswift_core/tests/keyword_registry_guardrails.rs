use std::collections::HashSet;

use ciswift_core::lang::swift_keywords::{self, SWIFT_KEYWORDS};
use ciswift_core::strings::camel_case;

#[test]
fn keywords_are_unique() {
    let mut seen = HashSet::new();
    for kw in SWIFT_KEYWORDS {
        assert!(seen.insert(*kw), "duplicate keyword spelling {kw:?}");
    }
}

#[test]
fn keywords_are_lowercase_spellings() {
    // Lookups happen after camelCasing, so an entry with an uppercase first letter could never match.
    for kw in SWIFT_KEYWORDS {
        assert_eq!(camel_case(kw), *kw, "keyword {kw:?} is not in camelCase form");
    }
}

#[test]
fn pascal_case_source_names_escape_after_casing() {
    for source in ["Break", "Default", "Repeat", "Self"] {
        let name = camel_case(source);
        assert!(swift_keywords::is_keyword(&name), "{source} should collide after casing");
        assert!(swift_keywords::escape(&name).ends_with('_'));
    }
}
