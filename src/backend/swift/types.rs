//! Map semantic types to Swift type syntax.
//!
//! ## Notes
//!
//! - Storage arrays map to native `[T]` only while their identity is never shared. An address-taken array, or one
//!   whose elements are themselves storage, needs the reference-boxed `ArrayRef<T>` helper.
//! - Mapping a type can activate a runtime helper (`ArrayRef`) or request an import (`Foundation` for the lock), so
//!   it goes through the emitter rather than being a free function.

use ciswift_ast::{CiType, ClassRef, CollectionKind, IntRange, TypeKind};

use super::SwiftEmitter;
use super::context::Shim;
use super::errors::{EmitError, EmitResult};

/// Whether a storage array needs reference semantics.
pub(crate) fn is_array_ref(ty: &CiType) -> bool {
    match &ty.kind {
        TypeKind::ArrayStorage { element, ptr_taken, .. } => *ptr_taken || element.is_storage(),
        _ => false,
    }
}

/// Result type of an arithmetic or bitwise operator on two numeric operands.
pub(crate) fn promote_numeric(left: &CiType, right: &CiType) -> Option<CiType> {
    if !left.is_numeric() || !right.is_numeric() {
        return None;
    }
    let either = |kind: TypeKind| left.kind == kind || right.kind == kind;
    Some(if either(TypeKind::Double) {
        CiType::double()
    } else if either(TypeKind::Float) {
        CiType::float()
    } else if either(TypeKind::Integer(IntRange::Long)) {
        CiType::long()
    } else {
        CiType::int()
    })
}

/// Common floating type of two compared operands, if either is floating.
pub(crate) fn promote_floating(left: &CiType, right: &CiType) -> Option<CiType> {
    if !left.is_numeric() || !right.is_numeric() {
        return None;
    }
    if left.kind == TypeKind::Double || right.kind == TypeKind::Double {
        Some(CiType::double())
    } else if left.kind == TypeKind::Float || right.kind == TypeKind::Float {
        Some(CiType::float())
    } else {
        None
    }
}

/// Swift spelling of a numeric type.
fn numeric_name(kind: &TypeKind) -> Option<&'static str> {
    Some(match kind {
        TypeKind::Integer(IntRange::SByte) => "Int8",
        TypeKind::Integer(IntRange::Byte) => "UInt8",
        TypeKind::Integer(IntRange::Short) => "Int16",
        TypeKind::Integer(IntRange::UShort) => "UInt16",
        TypeKind::Integer(IntRange::Int) => "Int",
        TypeKind::Integer(IntRange::Long) => "Int64",
        TypeKind::Float => "Float",
        TypeKind::Double => "Double",
        _ => return None,
    })
}

/// Class references compared with `===`.
pub(crate) fn is_object_reference(ty: &CiType) -> bool {
    matches!(ty.kind, TypeKind::Class { .. } | TypeKind::ArrayPtr { .. })
}

impl<'a> SwiftEmitter<'a> {
    /// Swift type syntax for `ty`, including the optional marker.
    pub(crate) fn swift_type(&mut self, ty: &CiType) -> EmitResult<String> {
        let mut name = match &ty.kind {
            TypeKind::Void => "Void".to_string(),
            TypeKind::Null => return Err(EmitError::internal("the null type has no Swift spelling")),
            TypeKind::Bool => "Bool".to_string(),
            TypeKind::Enum { name, .. } => name.clone(),
            kind if kind_is_numeric(kind) => numeric_name(kind).unwrap_or_default().to_string(),
            _ => self.class_name(ty)?,
        };
        if ty.nullable {
            name.push('?');
        }
        Ok(name)
    }

    /// Swift spelling of a class-like type without the optional marker.
    pub(crate) fn class_name(&mut self, ty: &CiType) -> EmitResult<String> {
        match &ty.kind {
            TypeKind::String(_) => Ok("String".to_string()),
            TypeKind::Class { name, .. } => Ok(name.clone()),
            TypeKind::ArrayStorage { element, .. } if !is_array_ref(ty) => Ok(format!("[{}]", self.swift_type(element)?)),
            TypeKind::ArrayStorage { element, .. } | TypeKind::ArrayPtr { element } => {
                self.ctx.activate(Shim::ArrayRef);
                Ok(format!("ArrayRef<{}>", self.swift_type(element)?))
            }
            TypeKind::Collection { kind, args, .. } => self.collection_name(*kind, args),
            TypeKind::Lock => {
                self.ctx.include("Foundation");
                Ok("NSRecursiveLock".to_string())
            }
            _ => self.swift_type(&CiType::new(ty.kind.clone())),
        }
    }

    fn collection_name(&mut self, kind: CollectionKind, args: &[CiType]) -> EmitResult<String> {
        let arg = |i: usize| {
            args.get(i)
                .ok_or_else(|| EmitError::internal(format!("{} is missing type argument {i}", kind.name())))
        };
        match kind {
            CollectionKind::List | CollectionKind::Queue | CollectionKind::Stack => {
                Ok(format!("[{}]", self.swift_type(arg(0)?)?))
            }
            CollectionKind::HashSet | CollectionKind::SortedSet => Ok(format!("Set<{}>", self.swift_type(arg(0)?)?)),
            CollectionKind::Dictionary | CollectionKind::SortedDictionary => {
                let key = self.swift_type(arg(0)?)?;
                let value = self.swift_type(arg(1)?)?;
                Ok(format!("[{key}: {value}]"))
            }
            CollectionKind::OrderedDictionary => Err(EmitError::unsupported("OrderedDictionary")),
        }
    }

    /// Value a field or array element of type `ty` starts with.
    pub(crate) fn default_value(&mut self, ty: &CiType) -> EmitResult<String> {
        match &ty.kind {
            _ if ty.is_numeric() => Ok("0".to_string()),
            TypeKind::Bool => Ok("false".to_string()),
            TypeKind::Enum { name, flags: true } => Ok(format!("{name}()")),
            TypeKind::Enum { name, flags: false } => {
                let first = self
                    .enums
                    .get(name.as_str())
                    .and_then(|e| e.constants.first())
                    .ok_or_else(|| EmitError::internal(format!("enum `{name}` has no constants")))?;
                Ok(format!("{name}.{}", super::names::member_name(&first.name)))
            }
            TypeKind::String(_) if !ty.nullable => Ok("\"\"".to_string()),
            TypeKind::ArrayStorage { .. } => self.new_array_storage(ty),
            TypeKind::Collection { .. } | TypeKind::Lock if ty.is_storage() && !ty.nullable => self.new_storage(ty),
            _ => Ok("nil".to_string()),
        }
    }

    /// Expression constructing a fresh value of a storage type.
    pub(crate) fn new_storage(&mut self, ty: &CiType) -> EmitResult<String> {
        match &ty.kind {
            TypeKind::Class {
                reference: ClassRef::Storage,
                ..
            }
            | TypeKind::Collection { .. }
            | TypeKind::Lock => Ok(format!("{}()", self.class_name(ty)?)),
            TypeKind::ArrayStorage { .. } => self.new_array_storage(ty),
            _ => Err(EmitError::internal("constructing a value of a non-storage type")),
        }
    }

    /// Expression constructing a storage array of its declared length.
    pub(crate) fn new_array_storage(&mut self, ty: &CiType) -> EmitResult<String> {
        let TypeKind::ArrayStorage { element, length, .. } = &ty.kind else {
            return Err(EmitError::internal("expected a storage array type"));
        };
        if is_array_ref(ty) {
            return self.new_array(element, &length.to_string());
        }
        let element_type = self.swift_type(element)?;
        let value = self.default_value(element)?;
        Ok(format!("[{element_type}](repeating: {value}, count: {length})"))
    }

    /// `ArrayRef` construction for `new T[length]`.
    pub(crate) fn new_array(&mut self, element: &CiType, length: &str) -> EmitResult<String> {
        self.ctx.activate(Shim::ArrayRef);
        let element_type = self.swift_type(element)?;
        let source = match &element.kind {
            TypeKind::ArrayStorage { .. } => format!("factory: {{ {} }}", self.new_storage(element)?),
            TypeKind::Class {
                name,
                reference: ClassRef::Storage,
            } => format!("factory: {name}.init"),
            _ => format!("repeating: {}", self.default_value(element)?),
        };
        Ok(format!("ArrayRef<{element_type}>({source}, count: {length})"))
    }
}

fn kind_is_numeric(kind: &TypeKind) -> bool {
    numeric_name(kind).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::config::EmitConfig;
    use ciswift_ast::{Decl, Enum, Program};

    fn with_emitter<R>(program: &Program, f: impl FnOnce(&mut SwiftEmitter<'_>) -> R) -> R {
        let config = EmitConfig::default();
        let mut emitter = SwiftEmitter::new(program, &config);
        f(&mut emitter)
    }

    #[test]
    fn test_numeric_types() {
        let program = Program::default();
        with_emitter(&program, |e| {
            assert_eq!(e.swift_type(&CiType::integer(IntRange::SByte)).unwrap(), "Int8");
            assert_eq!(e.swift_type(&CiType::byte()).unwrap(), "UInt8");
            assert_eq!(e.swift_type(&CiType::integer(IntRange::UShort)).unwrap(), "UInt16");
            assert_eq!(e.swift_type(&CiType::long()).unwrap(), "Int64");
            assert_eq!(e.swift_type(&CiType::float()).unwrap(), "Float");
        });
    }

    #[test]
    fn test_nullable_class_gets_optional_marker() {
        let program = Program::default();
        with_emitter(&program, |e| {
            let ty = CiType::class("Node", ClassRef::ReadWrite).into_nullable();
            assert_eq!(e.swift_type(&ty).unwrap(), "Node?");
            assert_eq!(e.swift_type(&CiType::string().into_nullable()).unwrap(), "String?");
        });
    }

    #[test]
    fn test_array_storage_representation() {
        let program = Program::default();
        with_emitter(&program, |e| {
            let plain = CiType::array_storage(CiType::int(), 4);
            assert_eq!(e.swift_type(&plain).unwrap(), "[Int]");
            assert!(!e.ctx.is_active(Shim::ArrayRef));

            let shared = CiType::array_storage(CiType::int(), 4).with_ptr_taken();
            assert_eq!(e.swift_type(&shared).unwrap(), "ArrayRef<Int>");
            assert!(e.ctx.is_active(Shim::ArrayRef));
        });
    }

    #[test]
    fn test_array_of_storage_elements_needs_reference() {
        let nested = CiType::array_storage(CiType::array_storage(CiType::byte(), 2), 3);
        assert!(is_array_ref(&nested));
        let objects = CiType::array_storage(CiType::class("Cell", ClassRef::Storage), 3);
        assert!(is_array_ref(&objects));
    }

    #[test]
    fn test_collections() {
        let program = Program::default();
        with_emitter(&program, |e| {
            assert_eq!(e.swift_type(&CiType::list(CiType::string())).unwrap(), "[String]");
            let set = CiType::collection(CollectionKind::SortedSet, vec![CiType::int()]);
            assert_eq!(e.swift_type(&set).unwrap(), "Set<Int>");
            let dict = CiType::dictionary(CiType::string(), CiType::class("Node", ClassRef::Dynamic));
            assert_eq!(e.swift_type(&dict).unwrap(), "[String: Node]");
        });
    }

    #[test]
    fn test_ordered_dictionary_is_unsupported() {
        let program = Program::default();
        with_emitter(&program, |e| {
            let ty = CiType::collection(CollectionKind::OrderedDictionary, vec![CiType::int(), CiType::int()]);
            let err = e.swift_type(&ty).unwrap_err();
            assert!(err.is_unsupported());
            assert!(err.to_string().contains("OrderedDictionary"));
        });
    }

    #[test]
    fn test_lock_requests_foundation() {
        let program = Program::default();
        with_emitter(&program, |e| {
            assert_eq!(e.swift_type(&CiType::lock()).unwrap(), "NSRecursiveLock");
            assert_eq!(e.ctx.includes().collect::<Vec<_>>(), vec!["Foundation"]);
        });
    }

    #[test]
    fn test_default_values() {
        let program = Program::new(vec![Decl::Enum(Enum::sequential("Color", &["Red", "Green"]))]);
        with_emitter(&program, |e| {
            assert_eq!(e.default_value(&CiType::double()).unwrap(), "0");
            assert_eq!(e.default_value(&CiType::enumeration("Color")).unwrap(), "Color.red");
            assert_eq!(e.default_value(&CiType::flags("Mode")).unwrap(), "Mode()");
            assert_eq!(e.default_value(&CiType::string_storage()).unwrap(), "\"\"");
            assert_eq!(e.default_value(&CiType::string().into_nullable()).unwrap(), "nil");
            assert_eq!(
                e.default_value(&CiType::array_storage(CiType::bool(), 3)).unwrap(),
                "[Bool](repeating: false, count: 3)"
            );
        });
    }

    #[test]
    fn test_new_array_factories() {
        let program = Program::default();
        with_emitter(&program, |e| {
            let cell = CiType::class("Cell", ClassRef::Storage);
            assert_eq!(e.new_array(&cell, "n").unwrap(), "ArrayRef<Cell>(factory: Cell.init, count: n)");
            let row = CiType::array_storage(CiType::int(), 2);
            assert_eq!(
                e.new_array(&row, "3").unwrap(),
                "ArrayRef<[Int]>(factory: { [Int](repeating: 0, count: 2) }, count: 3)"
            );
            assert_eq!(e.new_array(&CiType::int(), "8").unwrap(), "ArrayRef<Int>(repeating: 0, count: 8)");
        });
    }

    #[test]
    fn test_promotion() {
        assert_eq!(promote_numeric(&CiType::byte(), &CiType::int()), Some(CiType::int()));
        assert_eq!(promote_numeric(&CiType::int(), &CiType::long()), Some(CiType::long()));
        assert_eq!(promote_numeric(&CiType::float(), &CiType::long()), Some(CiType::float()));
        assert_eq!(promote_numeric(&CiType::bool(), &CiType::int()), None);
        assert_eq!(promote_floating(&CiType::int(), &CiType::long()), None);
        assert_eq!(promote_floating(&CiType::int(), &CiType::double()), Some(CiType::double()));
    }
}
