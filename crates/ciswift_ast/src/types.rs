//! Semantic types as resolved upstream.

use serde::{Deserialize, Serialize};

/// Fixed-width integer ranges of the source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntRange {
    SByte,
    Byte,
    Short,
    UShort,
    Int,
    Long,
}

/// Whether a string value owns its text (`string()`) or only refers to one (`string`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringKind {
    Ptr,
    Storage,
}

/// How a class-like value is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassRef {
    /// Non-owning read-only reference.
    ReadOnly,
    /// Non-owning read-write reference.
    #[default]
    ReadWrite,
    /// Shared owning reference.
    Dynamic,
    /// The value is embedded (constructed in place).
    Storage,
}

/// Generic container classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    List,
    Queue,
    Stack,
    HashSet,
    SortedSet,
    Dictionary,
    SortedDictionary,
    OrderedDictionary,
}

impl CollectionKind {
    /// Source-language class name, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            CollectionKind::List => "List",
            CollectionKind::Queue => "Queue",
            CollectionKind::Stack => "Stack",
            CollectionKind::HashSet => "HashSet",
            CollectionKind::SortedSet => "SortedSet",
            CollectionKind::Dictionary => "Dictionary",
            CollectionKind::SortedDictionary => "SortedDictionary",
            CollectionKind::OrderedDictionary => "OrderedDictionary",
        }
    }

    /// Key/value containers take two type arguments.
    pub fn is_dictionary(self) -> bool {
        matches!(
            self,
            CollectionKind::Dictionary | CollectionKind::SortedDictionary | CollectionKind::OrderedDictionary
        )
    }
}

/// Type variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Void,
    /// Type of the `null` literal.
    Null,
    Bool,
    Integer(IntRange),
    Float,
    Double,
    String(StringKind),
    Enum {
        name: String,
        #[serde(default)]
        flags: bool,
    },
    Class {
        name: String,
        #[serde(default)]
        reference: ClassRef,
    },
    /// Fixed-length array embedded by value.
    ArrayStorage {
        element: Box<CiType>,
        length: u32,
        /// Some code takes the array's address, so it needs reference identity.
        #[serde(default)]
        ptr_taken: bool,
    },
    /// Reference to an array of unknown length.
    ArrayPtr { element: Box<CiType> },
    Collection {
        kind: CollectionKind,
        args: Vec<CiType>,
        #[serde(default)]
        reference: ClassRef,
    },
    /// Recursive mutual-exclusion primitive.
    Lock,
}

/// A resolved semantic type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CiType {
    pub kind: TypeKind,
    #[serde(default)]
    pub nullable: bool,
}

impl CiType {
    pub fn new(kind: TypeKind) -> Self {
        Self { kind, nullable: false }
    }

    pub fn void() -> Self {
        Self::new(TypeKind::Void)
    }

    pub fn null() -> Self {
        Self::new(TypeKind::Null)
    }

    pub fn bool() -> Self {
        Self::new(TypeKind::Bool)
    }

    pub fn integer(range: IntRange) -> Self {
        Self::new(TypeKind::Integer(range))
    }

    pub fn int() -> Self {
        Self::integer(IntRange::Int)
    }

    pub fn long() -> Self {
        Self::integer(IntRange::Long)
    }

    pub fn byte() -> Self {
        Self::integer(IntRange::Byte)
    }

    pub fn float() -> Self {
        Self::new(TypeKind::Float)
    }

    pub fn double() -> Self {
        Self::new(TypeKind::Double)
    }

    /// Non-owning string reference.
    pub fn string() -> Self {
        Self::new(TypeKind::String(StringKind::Ptr))
    }

    pub fn string_storage() -> Self {
        Self::new(TypeKind::String(StringKind::Storage))
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Enum {
            name: name.into(),
            flags: false,
        })
    }

    pub fn flags(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Enum {
            name: name.into(),
            flags: true,
        })
    }

    pub fn class(name: impl Into<String>, reference: ClassRef) -> Self {
        Self::new(TypeKind::Class {
            name: name.into(),
            reference,
        })
    }

    pub fn array_storage(element: CiType, length: u32) -> Self {
        Self::new(TypeKind::ArrayStorage {
            element: Box::new(element),
            length,
            ptr_taken: false,
        })
    }

    pub fn array_ptr(element: CiType) -> Self {
        Self::new(TypeKind::ArrayPtr {
            element: Box::new(element),
        })
    }

    pub fn collection(kind: CollectionKind, args: Vec<CiType>) -> Self {
        Self::new(TypeKind::Collection {
            kind,
            args,
            reference: ClassRef::Storage,
        })
    }

    pub fn list(element: CiType) -> Self {
        Self::collection(CollectionKind::List, vec![element])
    }

    pub fn dictionary(key: CiType, value: CiType) -> Self {
        Self::collection(CollectionKind::Dictionary, vec![key, value])
    }

    pub fn lock() -> Self {
        Self::new(TypeKind::Lock)
    }

    /// The same type, made nullable.
    pub fn into_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark a storage array as address-taken.
    pub fn with_ptr_taken(mut self) -> Self {
        if let TypeKind::ArrayStorage { ptr_taken, .. } = &mut self.kind {
            *ptr_taken = true;
        }
        self
    }

    /// Turn a class or collection type into a non-owning reference to it.
    pub fn as_reference(mut self, new_reference: ClassRef) -> Self {
        if let TypeKind::Class { reference, .. } | TypeKind::Collection { reference, .. } = &mut self.kind {
            *reference = new_reference;
        }
        self
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Void)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.kind, TypeKind::Bool)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.kind, TypeKind::Integer(_))
    }

    pub fn is_floating(&self) -> bool {
        matches!(self.kind, TypeKind::Float | TypeKind::Double)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating()
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, TypeKind::String(_))
    }

    pub fn is_string_storage(&self) -> bool {
        matches!(self.kind, TypeKind::String(StringKind::Storage))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum { .. })
    }

    pub fn is_flags(&self) -> bool {
        matches!(self.kind, TypeKind::Enum { flags: true, .. })
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, TypeKind::Class { .. })
    }

    /// Values embedded in their owner: storage objects, storage collections, storage arrays and locks.
    pub fn is_storage(&self) -> bool {
        match &self.kind {
            TypeKind::Class { reference, .. } | TypeKind::Collection { reference, .. } => {
                *reference == ClassRef::Storage
            }
            TypeKind::ArrayStorage { .. } | TypeKind::Lock => true,
            _ => false,
        }
    }

    /// Element type of arrays and single-argument collections.
    pub fn element(&self) -> Option<&CiType> {
        match &self.kind {
            TypeKind::ArrayStorage { element, .. } | TypeKind::ArrayPtr { element } => Some(element),
            TypeKind::Collection { kind, args, .. } if !kind.is_dictionary() => args.first(),
            _ => None,
        }
    }

    /// Key type of dictionaries.
    pub fn key(&self) -> Option<&CiType> {
        match &self.kind {
            TypeKind::Collection { kind, args, .. } if kind.is_dictionary() => args.first(),
            _ => None,
        }
    }

    /// Value type of dictionaries.
    pub fn value(&self) -> Option<&CiType> {
        match &self.kind {
            TypeKind::Collection { kind, args, .. } if kind.is_dictionary() => args.get(1),
            _ => None,
        }
    }

    pub fn collection_kind(&self) -> Option<CollectionKind> {
        match &self.kind {
            TypeKind::Collection { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_dictionary(&self) -> bool {
        self.collection_kind().is_some_and(CollectionKind::is_dictionary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_classification() {
        assert!(CiType::class("Node", ClassRef::Storage).is_storage());
        assert!(!CiType::class("Node", ClassRef::ReadWrite).is_storage());
        assert!(CiType::array_storage(CiType::int(), 4).is_storage());
        assert!(CiType::list(CiType::int()).is_storage());
        assert!(!CiType::list(CiType::int()).as_reference(ClassRef::ReadOnly).is_storage());
        assert!(CiType::lock().is_storage());
    }

    #[test]
    fn test_dictionary_accessors() {
        let dict = CiType::dictionary(CiType::string(), CiType::int());
        assert_eq!(dict.key(), Some(&CiType::string()));
        assert_eq!(dict.value(), Some(&CiType::int()));
        assert_eq!(dict.element(), None);
        assert!(dict.is_dictionary());
    }

    #[test]
    fn test_nullable_builder_keeps_kind() {
        let ty = CiType::string().into_nullable();
        assert!(ty.nullable);
        assert!(ty.is_string());
    }

    #[test]
    fn test_type_deserializes_from_json() {
        let json = r#"{"kind":{"integer":"byte"},"nullable":false}"#;
        let ty: CiType = serde_json::from_str(json).unwrap();
        assert_eq!(ty, CiType::byte());

        let json = r#"{"kind":{"class":{"name":"Node"}},"nullable":true}"#;
        let ty: CiType = serde_json::from_str(json).unwrap();
        assert_eq!(ty, CiType::class("Node", ClassRef::ReadWrite).into_nullable());
    }
}
