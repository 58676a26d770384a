//! Type relations: subtyping, class ancestry and branch joins.
//!
//! The relations are pure queries over [`Type`] values; the only state they
//! read is the superclass chain held by the [`ClassRegistry`].
//!
//! Subtyping is shape-based: two types of the same variant are related
//! whatever their contents, so any `Ref` is a subtype of any other `Ref`.
//! Class ancestry and override compatibility only add pairs on top.
//!
//! ```text
//!        Int              Ref(A)           (p1..pn) -> r
//!         |              /     \
//!       Bool          Ref(B)  Ref(C)       overrides: same arity,
//!                        \     /           ancestor params <: own params,
//!                         Empty            own return <: ancestor return
//! ```

use fool_core::{ArrowType, Type};
use fool_registry::ClassRegistry;

/// Subtype and join queries against a class registry.
#[derive(Clone, Copy)]
pub struct TypeRels<'r> {
    classes: &'r ClassRegistry,
}

impl<'r> TypeRels<'r> {
    pub fn new(classes: &'r ClassRegistry) -> Self {
        Self { classes }
    }

    /// Whether `a` is a subtype of `b`.
    pub fn is_subtype(&self, a: &Type, b: &Type) -> bool {
        std::mem::discriminant(a) == std::mem::discriminant(b)
            || matches!((a, b), (Type::Bool, Type::Int))
            || matches!((a, b), (Type::Empty, Type::Ref(_)))
            || self.is_subclass(a, b)
            || self.is_override_compatible(a, b)
    }

    /// Whether signature `a` may override signature `b`.
    ///
    /// Both must be functions or both methods, with equal arity. Every
    /// parameter of `b` must be a subtype of the matching parameter of `a`,
    /// and the return type of `a` must be a subtype of the return of `b`.
    pub fn is_override_compatible(&self, a: &Type, b: &Type) -> bool {
        match (a, b) {
            (Type::Arrow(own), Type::Arrow(ancestor))
            | (Type::Method(own), Type::Method(ancestor)) => {
                self.signature_overrides(own, ancestor)
            }
            _ => false,
        }
    }

    fn signature_overrides(&self, own: &ArrowType, ancestor: &ArrowType) -> bool {
        own.arity() == ancestor.arity()
            && ancestor
                .params
                .iter()
                .zip(&own.params)
                .all(|(inherited, param)| self.is_subtype(inherited, param))
            && self.is_subtype(&own.ret, &ancestor.ret)
    }

    /// Whether reference `a` names `b`'s class or one of its descendants.
    pub fn is_subclass(&self, a: &Type, b: &Type) -> bool {
        match (a, b) {
            (Type::Ref(class), Type::Ref(ancestor)) => self.classes.is_ancestor(class, ancestor),
            _ => false,
        }
    }

    /// The most specific type both `a` and `b` are subtypes of, walking
    /// `a`'s ancestors.
    pub fn lowest_common_ancestor(&self, a: &Type, b: &Type) -> Option<Type> {
        match (a, b) {
            (Type::Ref(_), Type::Empty) => Some(a.clone()),
            (Type::Empty, Type::Ref(_)) => Some(b.clone()),
            (Type::Ref(class), Type::Ref(_)) => {
                if self.is_subtype(b, a) {
                    return Some(a.clone());
                }
                self.classes
                    .ancestors(class)
                    .map(Type::reference)
                    .find(|candidate| self.is_subtype(b, candidate))
            }
            _ if a.is_primitive() && b.is_primitive() => {
                if matches!(a, Type::Int) || matches!(b, Type::Int) {
                    Some(Type::Int)
                } else {
                    Some(Type::Bool)
                }
            }
            _ => None,
        }
    }

    /// Result type of a conditional whose branches have types `a` and `b`.
    pub fn join(&self, a: &Type, b: &Type) -> Option<Type> {
        if self.is_subtype(a, b) {
            return Some(b.clone());
        }
        if self.is_subtype(b, a) {
            return Some(a.clone());
        }
        self.lowest_common_ancestor(a, b)
            .or_else(|| self.lowest_common_ancestor(b, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fool_registry::VirtualTable;

    fn registry() -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        registry.register("A", None, VirtualTable::default());
        registry.register("B", Some("A".into()), VirtualTable::default());
        registry.register("C", Some("B".into()), VirtualTable::default());
        registry.register("D", Some("A".into()), VirtualTable::default());
        registry.register("Other", None, VirtualTable::default());
        registry
    }

    fn r(name: &str) -> Type {
        Type::reference(name)
    }

    #[test]
    fn subtype_is_reflexive() {
        let classes = registry();
        let rels = TypeRels::new(&classes);
        let samples = [
            Type::Int,
            Type::Bool,
            Type::Empty,
            r("A"),
            Type::arrow(vec![Type::Int, r("B")], Type::Bool),
            Type::method(vec![], r("C")),
        ];
        for ty in &samples {
            assert!(rels.is_subtype(ty, &ty.clone()), "{ty} <: {ty}");
        }
    }

    #[test]
    fn bool_is_int_but_not_conversely() {
        let classes = ClassRegistry::new();
        let rels = TypeRels::new(&classes);
        assert!(rels.is_subtype(&Type::Bool, &Type::Int));
        assert!(!rels.is_subtype(&Type::Int, &Type::Bool));
    }

    #[test]
    fn empty_is_below_every_reference() {
        let classes = registry();
        let rels = TypeRels::new(&classes);
        for class in ["A", "B", "C", "D", "Other"] {
            assert!(rels.is_subtype(&Type::Empty, &r(class)));
        }
        assert!(!rels.is_subtype(&Type::Empty, &Type::Int));
        assert!(!rels.is_subtype(&r("A"), &Type::Empty));
    }

    #[test]
    fn subclass_is_transitive() {
        let classes = registry();
        let rels = TypeRels::new(&classes);
        assert!(rels.is_subclass(&r("B"), &r("A")));
        assert!(rels.is_subclass(&r("C"), &r("B")));
        assert!(rels.is_subclass(&r("C"), &r("A")));
        assert!(!rels.is_subclass(&r("A"), &r("B")));
        assert!(!rels.is_subclass(&r("D"), &r("B")));
        assert!(!rels.is_subclass(&Type::Int, &r("A")));
    }

    #[test]
    fn same_shape_is_enough() {
        let classes = registry();
        let rels = TypeRels::new(&classes);
        assert!(rels.is_subtype(&r("A"), &r("Other")));
        assert!(rels.is_subtype(&r("A"), &r("C")));
        assert!(rels.is_subtype(
            &Type::arrow(vec![Type::Int], Type::Int),
            &Type::arrow(vec![Type::Bool], Type::Bool),
        ));
        assert!(!rels.is_subtype(&Type::Int, &Type::Bool));
        assert!(!rels.is_subtype(&r("A"), &Type::Int));
        assert!(!rels.is_subtype(
            &Type::arrow(vec![], Type::Int),
            &Type::method(vec![], Type::Int),
        ));
    }

    #[test]
    fn override_rules() {
        let classes = registry();
        let rels = TypeRels::new(&classes);

        let ancestor = Type::method(vec![Type::Bool], Type::Int);

        // narrower return, wider parameter
        let ok = Type::method(vec![Type::Int], Type::Bool);
        assert!(rels.is_override_compatible(&ok, &ancestor));

        // references relate by shape
        let refs = Type::method(vec![r("C")], r("A"));
        let other_refs = Type::method(vec![r("Other")], r("B"));
        assert!(rels.is_override_compatible(&refs, &other_refs));

        // narrower parameter is rejected
        let narrow_param = Type::method(vec![Type::Bool], Type::Int);
        let int_param = Type::method(vec![Type::Int], Type::Int);
        assert!(!rels.is_override_compatible(&narrow_param, &int_param));

        // wider return is rejected
        let wide_return = Type::method(vec![Type::Bool], Type::Int);
        let bool_return = Type::method(vec![Type::Bool], Type::Bool);
        assert!(!rels.is_override_compatible(&wide_return, &bool_return));

        // arity must match
        let extra = Type::method(vec![Type::Bool, Type::Int], Type::Int);
        assert!(!rels.is_override_compatible(&extra, &ancestor));

        // functions and methods do not mix
        let function = Type::arrow(vec![Type::Bool], Type::Int);
        assert!(!rels.is_override_compatible(&function, &ancestor));
    }

    #[test]
    fn joins() {
        let classes = registry();
        let rels = TypeRels::new(&classes);

        assert_eq!(rels.join(&Type::Int, &Type::Bool), Some(Type::Int));
        assert_eq!(rels.join(&Type::Bool, &Type::Bool), Some(Type::Bool));
        assert_eq!(rels.join(&r("B"), &r("A")), Some(r("A")));
        assert_eq!(rels.join(&r("C"), &r("D")), Some(r("D")));
        assert_eq!(rels.join(&r("C"), &r("Other")), Some(r("Other")));
        assert_eq!(rels.join(&Type::Empty, &r("C")), Some(r("C")));
        assert_eq!(rels.join(&r("C"), &Type::Empty), Some(r("C")));
        assert_eq!(rels.join(&Type::Int, &r("A")), None);
    }

    #[test]
    fn lowest_common_ancestor_cases() {
        let classes = registry();
        let rels = TypeRels::new(&classes);

        assert_eq!(rels.lowest_common_ancestor(&r("C"), &r("B")), Some(r("C")));
        assert_eq!(rels.lowest_common_ancestor(&r("A"), &Type::Empty), Some(r("A")));
        assert_eq!(rels.lowest_common_ancestor(&Type::Empty, &r("D")), Some(r("D")));
        assert_eq!(rels.lowest_common_ancestor(&Type::Bool, &Type::Int), Some(Type::Int));
        assert_eq!(rels.lowest_common_ancestor(&Type::Bool, &Type::Bool), Some(Type::Bool));
        assert_eq!(rels.lowest_common_ancestor(&Type::Int, &r("A")), None);
    }
}
