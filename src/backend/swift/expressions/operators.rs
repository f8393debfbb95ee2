//! Unary and binary operators.

use ciswift_ast::{BinaryOp, CiType, Expr, ExprKind, PrefixOp, TypeKind};

use super::{Priority, parenthesize};
use crate::backend::swift::SwiftEmitter;
use crate::backend::swift::context::Shim;
use crate::backend::swift::errors::EmitResult;
use crate::backend::swift::flags::FlagsOp;
use crate::backend::swift::types::{is_object_reference, promote_floating, promote_numeric};

/// Precedence of an operator and of its two operand positions.
fn levels(op: BinaryOp) -> (Priority, Priority, Priority) {
    match op {
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod | BinaryOp::BitAnd => (Priority::Mul, Priority::Mul, Priority::Shift),
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::BitOr | BinaryOp::BitXor => (Priority::Add, Priority::Add, Priority::Mul),
        BinaryOp::Shl | BinaryOp::Shr => (Priority::Shift, Priority::Unary, Priority::Unary),
        BinaryOp::CondAnd => (Priority::CondAnd, Priority::CondAnd, Priority::Comparison),
        BinaryOp::CondOr => (Priority::CondOr, Priority::CondOr, Priority::CondAnd),
        _ => (Priority::Comparison, Priority::NilCoalesce, Priority::NilCoalesce),
    }
}

fn symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Shl => "<<",
        BinaryOp::Shr => ">>",
        BinaryOp::Less => "<",
        BinaryOp::LessEq => "<=",
        BinaryOp::Greater => ">",
        BinaryOp::GreaterEq => ">=",
        BinaryOp::Eq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "^",
        BinaryOp::CondAnd => "&&",
        BinaryOp::CondOr => "||",
        BinaryOp::Index => "[]",
    }
}

impl<'a> SwiftEmitter<'a> {
    pub(super) fn prefix(&mut self, op: PrefixOp, inner: &Expr, parent: Priority) -> EmitResult<String> {
        let text = match op {
            // the increment is hoisted, only the updated value remains
            PrefixOp::Increment | PrefixOp::Decrement => return self.expr(inner, parent),
            PrefixOp::Neg => format!("-{}", self.expr(inner, Priority::Primary)?),
            PrefixOp::Not => format!("!{}", self.expr(inner, Priority::Primary)?),
            PrefixOp::Complement => match &inner.ty.kind {
                TypeKind::Enum { name, flags: true } => {
                    let name = name.clone();
                    let value = self.unwrapped(inner, Priority::Primary, true)?;
                    return Ok(format!("{name}(rawValue: ~{value}.rawValue)"));
                }
                _ => format!("~{}", self.expr(inner, Priority::Primary)?),
            },
        };
        Ok(parenthesize(text, Priority::Unary, parent))
    }

    pub(super) fn binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        ty: &CiType,
        parent: Priority,
    ) -> EmitResult<String> {
        match op {
            BinaryOp::Index => return self.index(left, right, parent),
            BinaryOp::BitAnd | BinaryOp::BitOr if ty.is_bool() => {
                // both operands are evaluated, unlike `&&` and `||`
                let logical = if op == BinaryOp::BitAnd { "&&" } else { "||" };
                let l = self.expr(left, Priority::Argument)?;
                let r = self.expr(right, Priority::Argument)?;
                return Ok(format!("{{ a, b in a {logical} b }}({l}, {r})"));
            }
            BinaryOp::BitXor if ty.is_bool() => {
                let l = self.expr(left, Priority::NilCoalesce)?;
                let r = self.expr(right, Priority::NilCoalesce)?;
                return Ok(parenthesize(format!("{l} != {r}"), Priority::Comparison, parent));
            }
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor if ty.is_flags() => {
                return self.flags_binary(op, left, right);
            }
            _ => {}
        }

        let (own, left_level, right_level) = levels(op);
        let l = self.operand(op, left, left_level, left, right, ty, true)?;
        let r = self.operand(op, right, right_level, left, right, ty, false)?;
        let operator = match op {
            BinaryOp::Eq if self.compares_references(left, right) => "===",
            BinaryOp::NotEq if self.compares_references(left, right) => "!==",
            _ => symbol(op),
        };
        Ok(parenthesize(format!("{l} {operator} {r}"), own, parent))
    }

    fn compares_references(&self, left: &Expr, right: &Expr) -> bool {
        is_object_reference(&left.ty) && is_object_reference(&right.ty)
    }

    #[allow(clippy::too_many_arguments)]
    fn operand(
        &mut self,
        op: BinaryOp,
        operand: &Expr,
        level: Priority,
        left: &Expr,
        right: &Expr,
        result: &CiType,
        is_left: bool,
    ) -> EmitResult<String> {
        if operand.ty.is_bool() {
            return self.expr(operand, level);
        }
        if op == BinaryOp::Add && result.is_string() {
            return self.unwrapped(operand, level, true);
        }
        let promoted = match op {
            BinaryOp::Add
            | BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Mod
            | BinaryOp::BitAnd
            | BinaryOp::BitOr
            | BinaryOp::BitXor => promote_numeric(&left.ty, &right.ty),
            BinaryOp::Shl | BinaryOp::Shr if is_left => promote_numeric(&left.ty, &right.ty),
            _ if op.is_comparison() => promote_floating(&left.ty, &right.ty),
            _ => None,
        };
        match promoted {
            Some(target) if target.kind != operand.ty.kind => self.coerced(&target, operand, level),
            _ => self.expr(operand, level),
        }
    }

    fn flags_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EmitResult<String> {
        let (flags_op, right) = match (op, &right.kind) {
            (
                BinaryOp::BitAnd,
                ExprKind::Prefix {
                    op: PrefixOp::Complement,
                    inner,
                },
            ) => (FlagsOp::Subtracting, &**inner),
            (BinaryOp::BitAnd, _) => (FlagsOp::Intersection, right),
            (BinaryOp::BitOr, _) => (FlagsOp::Union, right),
            _ => (FlagsOp::SymmetricDifference, right),
        };
        let l = self.expr(left, Priority::Primary)?;
        let r = self.expr(right, Priority::Argument)?;
        Ok(format!("{l}.{}({r})", flags_op.method()))
    }

    /// `collection[` with the receiver forced non-nil.
    pub(crate) fn open_indexing(&mut self, collection: &Expr) -> EmitResult<String> {
        let text = self.expr(collection, Priority::Primary)?;
        Ok(if collection.ty.nullable { format!("{text}![") } else { format!("{text}[") })
    }

    /// `collection[index]` without the dictionary unwrap.
    pub(crate) fn indexing(&mut self, collection: &Expr, index: &Expr) -> EmitResult<String> {
        let open = self.open_indexing(collection)?;
        let key = match collection.ty.key() {
            Some(key) if collection.ty.is_dictionary() => key.clone(),
            _ => CiType::int(),
        };
        let index = self.coerced(&key, index, Priority::Argument)?;
        Ok(format!("{open}{index}]"))
    }

    fn index(&mut self, collection: &Expr, index: &Expr, parent: Priority) -> EmitResult<String> {
        if collection.ty.is_string() {
            self.ctx.activate(Shim::StringCharAt);
            let s = self.unwrapped(collection, Priority::Argument, false)?;
            let i = self.coerced(&CiType::int(), index, Priority::Argument)?;
            return Ok(format!("ciStringCharAt({s}, {i})"));
        }
        let text = self.indexing(collection, index)?;
        // an assignment target stores into the optional slot
        if collection.ty.is_dictionary() && parent != Priority::Assign {
            Ok(format!("{text}!"))
        } else {
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::config::EmitConfig;
    use ciswift_ast::{ClassRef, Program};

    fn emit(expr: &Expr, parent: Priority) -> String {
        let program = Program::default();
        let config = EmitConfig::default();
        let mut emitter = SwiftEmitter::new(&program, &config);
        emitter.expr(expr, parent).unwrap()
    }

    fn int(name: &str) -> Expr {
        Expr::local(name, CiType::int())
    }

    fn add(l: Expr, r: Expr) -> Expr {
        Expr::binary(BinaryOp::Add, l, r, CiType::int())
    }

    fn mul(l: Expr, r: Expr) -> Expr {
        Expr::binary(BinaryOp::Mul, l, r, CiType::int())
    }

    // ========================================================================
    // PRECEDENCE
    // ========================================================================

    #[test]
    fn test_left_associative_chain_has_no_parens() {
        let e = add(add(int("a"), int("b")), int("c"));
        assert_eq!(emit(&e, Priority::Argument), "a + b + c");
    }

    #[test]
    fn test_right_nested_same_level_is_parenthesized() {
        let e = Expr::binary(BinaryOp::Sub, int("a"), add(int("b"), int("c")), CiType::int());
        assert_eq!(emit(&e, Priority::Argument), "a - (b + c)");
    }

    #[test]
    fn test_sum_inside_product() {
        let e = mul(add(int("a"), int("b")), int("c"));
        assert_eq!(emit(&e, Priority::Argument), "(a + b) * c");
        let e = add(int("a"), mul(int("b"), int("c")));
        assert_eq!(emit(&e, Priority::Argument), "a + b * c");
    }

    #[test]
    fn test_shift_operands_are_parenthesized() {
        let e = Expr::binary(BinaryOp::Shl, add(int("a"), int("b")), int("c"), CiType::int());
        assert_eq!(emit(&e, Priority::Argument), "(a + b) << c");
    }

    #[test]
    fn test_bitwise_and_binds_like_multiplication() {
        let or = Expr::binary(BinaryOp::BitOr, int("a"), int("b"), CiType::int());
        let e = Expr::binary(BinaryOp::BitAnd, or, int("c"), CiType::int());
        assert_eq!(emit(&e, Priority::Argument), "(a | b) & c");
    }

    #[test]
    fn test_negation_of_sum() {
        let e = Expr::prefix(PrefixOp::Neg, add(int("a"), int("b")));
        assert_eq!(emit(&e, Priority::Argument), "-(a + b)");
    }

    // ========================================================================
    // TYPE-DIRECTED OPERATORS
    // ========================================================================

    #[test]
    fn test_mixed_numeric_operands_are_converted() {
        let e = Expr::binary(BinaryOp::Add, Expr::local("b", CiType::byte()), int("i"), CiType::int());
        assert_eq!(emit(&e, Priority::Argument), "Int(b) + i");
        let cmp = Expr::compare(BinaryOp::Less, int("i"), Expr::local("d", CiType::double()));
        assert_eq!(emit(&cmp, Priority::Argument), "Double(i) < d");
    }

    #[test]
    fn test_reference_identity() {
        let node = || CiType::class("Node", ClassRef::ReadWrite).into_nullable();
        let e = Expr::compare(BinaryOp::Eq, Expr::local("a", node()), Expr::local("b", node()));
        assert_eq!(emit(&e, Priority::Argument), "a === b");
        let e = Expr::compare(BinaryOp::NotEq, Expr::local("a", node()), Expr::null());
        assert_eq!(emit(&e, Priority::Argument), "a != nil");
    }

    #[test]
    fn test_non_short_circuit_bool_and() {
        let e = Expr::binary(
            BinaryOp::BitAnd,
            Expr::local("p", CiType::bool()),
            Expr::local("q", CiType::bool()),
            CiType::bool(),
        );
        assert_eq!(emit(&e, Priority::Argument), "{ a, b in a && b }(p, q)");
    }

    #[test]
    fn test_bool_xor_is_inequality() {
        let e = Expr::binary(
            BinaryOp::BitXor,
            Expr::local("p", CiType::bool()),
            Expr::local("q", CiType::bool()),
            CiType::bool(),
        );
        assert_eq!(emit(&e, Priority::Argument), "p != q");
    }

    #[test]
    fn test_flags_operators() {
        let flags = || Expr::local("m", CiType::flags("Mode"));
        let bit = || Expr::flags_const("Mode", "Read");
        let and_not = Expr::binary(
            BinaryOp::BitAnd,
            flags(),
            Expr::prefix(PrefixOp::Complement, bit()),
            CiType::flags("Mode"),
        );
        assert_eq!(emit(&and_not, Priority::Argument), "m.subtracting(Mode.read)");
        let or = Expr::binary(BinaryOp::BitOr, flags(), bit(), CiType::flags("Mode"));
        assert_eq!(emit(&or, Priority::Argument), "m.union(Mode.read)");
        let not = Expr::prefix(PrefixOp::Complement, flags());
        assert_eq!(emit(&not, Priority::Argument), "Mode(rawValue: ~m.rawValue)");
    }

    // ========================================================================
    // INDEXING
    // ========================================================================

    #[test]
    fn test_dictionary_read_is_unwrapped() {
        let dict = Expr::local("d", CiType::dictionary(CiType::string(), CiType::int()));
        let e = Expr::index(dict, Expr::string("k"), CiType::int());
        assert_eq!(emit(&e, Priority::Argument), "d[\"k\"]!");
        assert_eq!(emit(&e, Priority::Assign), "d[\"k\"]");
    }

    #[test]
    fn test_string_index_uses_helper() {
        let s = Expr::local("s", CiType::string());
        let e = Expr::index(s, int("i"), CiType::int());
        assert_eq!(emit(&e, Priority::Argument), "ciStringCharAt(s, i)");
    }

    #[test]
    fn test_index_converts_narrow_integer() {
        let list = Expr::local("xs", CiType::list(CiType::int()));
        let e = Expr::index(list, Expr::local("b", CiType::byte()), CiType::int());
        assert_eq!(emit(&e, Priority::Argument), "xs[Int(b)]");
    }
}
