//! Bitmask flags enums as Swift `OptionSet` values.
//!
//! A flags enum becomes a struct conforming to `OptionSet`, so `&`, `|`, `^` and `~` on flags values are written as
//! set algebra.

use ciswift_ast::Enum;

/// Set operation a flags operator lowers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagsOp {
    /// `a & b`
    Intersection,
    /// `a & ~b`
    Subtracting,
    /// `a | b`
    Union,
    /// `a ^ b`
    SymmetricDifference,
}

impl FlagsOp {
    /// Non-mutating `OptionSet` method.
    pub fn method(self) -> &'static str {
        match self {
            FlagsOp::Intersection => "intersection",
            FlagsOp::Subtracting => "subtracting",
            FlagsOp::Union => "union",
            FlagsOp::SymmetricDifference => "symmetricDifference",
        }
    }

    /// Mutating `OptionSet` method used for compound assignment.
    pub fn in_place_method(self) -> &'static str {
        match self {
            FlagsOp::Intersection => "formIntersection",
            FlagsOp::Subtracting => "subtract",
            FlagsOp::Union => "formUnion",
            FlagsOp::SymmetricDifference => "formSymmetricDifference",
        }
    }
}

/// Names of earlier single-bit constants whose union is the multi-bit constant at `index`.
///
/// Returns `None` for zero, single-bit values, or when some bit has no earlier single-bit constant.
pub(crate) fn union_of_earlier(enu: &Enum, index: usize) -> Option<Vec<&str>> {
    let value = enu.constants.get(index)?.value;
    if value <= 0 || value.count_ones() < 2 {
        return None;
    }
    let earlier = &enu.constants[..index];
    (0..63)
        .filter(|b| value & (1i64 << b) != 0)
        .map(|b| {
            earlier
                .iter()
                .find(|c| c.value == 1i64 << b)
                .map(|c| c.name.as_str())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ciswift_ast::EnumConst;

    fn permissions() -> Enum {
        Enum {
            name: "Permissions".to_string(),
            is_public: false,
            flags: true,
            constants: vec![
                EnumConst::new("None", 0),
                EnumConst::new("Read", 1),
                EnumConst::new("Write", 2),
                EnumConst::new("ReadWrite", 3),
                EnumConst::new("Exec", 4),
                EnumConst::new("Odd", 9),
            ],
            doc: None,
            span: None,
        }
    }

    #[test]
    fn test_union_of_earlier() {
        let enu = permissions();
        assert_eq!(union_of_earlier(&enu, 3), Some(vec!["Read", "Write"]));
        assert_eq!(union_of_earlier(&enu, 1), None);
        assert_eq!(union_of_earlier(&enu, 0), None);
        // bit 3 has no constant of its own
        assert_eq!(union_of_earlier(&enu, 5), None);
    }

    #[test]
    fn test_method_names() {
        assert_eq!(FlagsOp::Subtracting.method(), "subtracting");
        assert_eq!(FlagsOp::Subtracting.in_place_method(), "subtract");
        assert_eq!(FlagsOp::SymmetricDifference.in_place_method(), "formSymmetricDifference");
    }
}
