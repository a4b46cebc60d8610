//! Minimal stand-in for the type subsystem.
//!
//! The real type directory (`TypeNode`, struct/array layout, interning of user-defined types) is
//! out of scope per spec.md §1 — it lives in a sealed, separately-owned crate. This module exposes
//! just enough of that contract for the IR to type-check its own operands: an interned, `Copy`
//! [`TypeHandle`] with a [`BasicValueType`] tag, a [`TypeHandle::void`] singleton, and equality.

use rustc_hash::FxHashMap;

/// The primitive value kinds the IR core needs to distinguish. A faithful type subsystem would
/// enumerate far more (vectors, pointers, aggregates); the core only ever inspects these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicValueType {
    Int1,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl BasicValueType {
    pub fn is_integer(self) -> bool {
        !matches!(self, BasicValueType::Float32 | BasicValueType::Float64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TypeKind {
    Void,
    Basic(BasicValueType),
}

/// An interned, `Copy` handle to a type descriptor. Two handles are equal iff they were interned
/// from the same [`TypeKind`]; the core never compares structural type data directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHandle(u32);

/// Interns [`TypeKind`]s so that `TypeHandle` equality is a cheap integer comparison. The real
/// type subsystem interns far more than this; this is the slice the IR core depends on.
#[derive(Debug, Default)]
pub struct TypeTable {
    kinds: Vec<TypeKind>,
    index: FxHashMap<TypeKind, TypeHandle>,
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = TypeTable::default();
        let void = table.intern(TypeKind::Void);
        debug_assert_eq!(void, TypeHandle(0));
        table
    }

    fn intern(&mut self, kind: TypeKind) -> TypeHandle {
        if let Some(handle) = self.index.get(&kind) {
            return *handle;
        }
        let handle = TypeHandle(self.kinds.len() as u32);
        self.kinds.push(kind);
        self.index.insert(kind, handle);
        handle
    }

    pub fn void(&mut self) -> TypeHandle {
        self.intern(TypeKind::Void)
    }

    pub fn basic(&mut self, basic: BasicValueType) -> TypeHandle {
        self.intern(TypeKind::Basic(basic))
    }

    fn kind(&self, handle: TypeHandle) -> TypeKind {
        self.kinds[handle.0 as usize]
    }
}

impl TypeHandle {
    pub fn is_void(self, types: &TypeTable) -> bool {
        matches!(types.kind(self), TypeKind::Void)
    }

    pub fn is_primitive(self, types: &TypeTable) -> bool {
        matches!(types.kind(self), TypeKind::Basic(_))
    }

    pub fn basic_value_type(self, types: &TypeTable) -> Option<BasicValueType> {
        match types.kind(self) {
            TypeKind::Basic(b) => Some(b),
            TypeKind::Void => None,
        }
    }

    /// Short textual name used by the debug surface (spec.md §6, `<type> <reference>`).
    pub fn name(self, types: &TypeTable) -> &'static str {
        match types.kind(self) {
            TypeKind::Void => "void",
            TypeKind::Basic(BasicValueType::Int1) => "i1",
            TypeKind::Basic(BasicValueType::Int8) => "i8",
            TypeKind::Basic(BasicValueType::Int16) => "i16",
            TypeKind::Basic(BasicValueType::Int32) => "i32",
            TypeKind::Basic(BasicValueType::Int64) => "i64",
            TypeKind::Basic(BasicValueType::Float32) => "f32",
            TypeKind::Basic(BasicValueType::Float64) => "f64",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_is_a_stable_singleton() {
        let mut types = TypeTable::new();
        let a = types.void();
        let b = types.void();
        assert_eq!(a, b);
        assert!(a.is_void(&types));
        assert!(!a.is_primitive(&types));
    }

    #[test]
    fn interning_deduplicates() {
        let mut types = TypeTable::new();
        let i1 = types.basic(BasicValueType::Int1);
        let i1_again = types.basic(BasicValueType::Int1);
        let i32_ = types.basic(BasicValueType::Int32);
        assert_eq!(i1, i1_again);
        assert_ne!(i1, i32_);
        assert_eq!(i1.basic_value_type(&types), Some(BasicValueType::Int1));
    }
}
