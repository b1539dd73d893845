// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Distributed classes: structs with multiple inheritance.
//!
//! Classes form a DAG over type handles. Every class keeps a flattened field
//! list built from its parents' flattened lists and its own declared fields:
//!
//! - a declared field shadows any inherited field with the same name
//! - when two parents provide the same name, the earlier parent wins
//! - a field reached through two paths (diamond) appears once
//! - the result is sorted by field id
//!
//! The list is recomputed for the class and all of its descendants on every
//! mutation, and the new lists are committed only if all of them are valid.

use super::field::{Field, FieldId};
use super::keywords::KeywordList;
use super::structs::Struct;
use super::types::{Subtype, Type, TypeKind, TypeRef};
use super::Module;
use crate::error::{IndexError, SchemaError};
use std::collections::{HashMap, HashSet, VecDeque};

/// A struct with parents, children and an optional constructor.
#[derive(Debug, Clone, Default)]
pub struct Class {
    strct: Struct,
    base_fields: Vec<FieldId>,
    base_names: HashSet<String>,
    parents: Vec<TypeRef>,
    children: Vec<TypeRef>,
    constructor: Option<Field>,
    keywords: KeywordList,
}

impl Class {
    fn new(id: u32, name: &str) -> Self {
        Self {
            strct: Struct::new(Some(id), name),
            ..Self::default()
        }
    }

    /// The flattened field list, inherited fields included.
    pub fn as_struct(&self) -> &Struct {
        &self.strct
    }

    pub(crate) fn as_struct_mut(&mut self) -> &mut Struct {
        &mut self.strct
    }

    pub fn name(&self) -> &str {
        self.strct.name()
    }

    pub fn id(&self) -> Option<u32> {
        self.strct.id()
    }

    pub fn num_parents(&self) -> usize {
        self.parents.len()
    }

    pub fn nth_parent(&self, n: usize) -> Result<TypeRef, IndexError> {
        IndexError::get("parent", &self.parents, n).copied()
    }

    pub fn parents(&self) -> &[TypeRef] {
        &self.parents
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn nth_child(&self, n: usize) -> Result<TypeRef, IndexError> {
        IndexError::get("child", &self.children, n).copied()
    }

    pub fn children(&self) -> &[TypeRef] {
        &self.children
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// The constructor field. It is not part of the wire field list.
    pub fn constructor(&self) -> Option<&Field> {
        self.constructor.as_ref()
    }

    /// Number of fields declared directly in this class.
    pub fn num_base_fields(&self) -> usize {
        self.base_fields.len()
    }

    pub fn nth_base_field(&self, n: usize) -> Result<FieldId, IndexError> {
        IndexError::get("base field", &self.base_fields, n).copied()
    }

    /// Declared fields, in declaration order.
    pub fn base_fields(&self) -> &[FieldId] {
        &self.base_fields
    }

    pub fn keywords(&self) -> &KeywordList {
        &self.keywords
    }
}

impl Module {
    /// Register a new class with no parents and no fields.
    pub fn add_class(&mut self, name: &str) -> Result<TypeRef, SchemaError> {
        self.check_new_type_name(name)?;
        let id = self.types_by_id.len() as u32;
        let ty = self.push_type(Type::new(TypeKind::Class(Class::new(id, name))));
        self.register_named_type(name, ty);
        self.classes.push(ty);
        log::debug!("[Module::add_class] '{}' registered with id {}", name, id);
        Ok(ty)
    }

    fn class_ref(&self, class: TypeRef) -> Result<&Class, SchemaError> {
        self.type_of(class)
            .and_then(Type::as_class)
            .ok_or(SchemaError::UnknownHandle {
                what: "class",
                index: class.index(),
            })
    }

    fn class_mut(&mut self, class: TypeRef) -> Result<&mut Class, SchemaError> {
        self.types
            .get_mut(class.index())
            .and_then(Type::as_class_mut)
            .ok_or(SchemaError::UnknownHandle {
                what: "class",
                index: class.index(),
            })
    }

    /// All classes reachable through parent links, excluding `class` itself.
    pub fn ancestors(&self, class: TypeRef) -> HashSet<TypeRef> {
        let mut seen = HashSet::new();
        let mut stack: Vec<TypeRef> = self
            .class_ref(class)
            .map(|c| c.parents.clone())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            if seen.insert(next) {
                if let Ok(c) = self.class_ref(next) {
                    stack.extend_from_slice(&c.parents);
                }
            }
        }
        seen
    }

    /// True if `ancestor` is reachable from `class` through parent links.
    pub fn is_ancestor(&self, ancestor: TypeRef, class: TypeRef) -> bool {
        self.ancestors(class).contains(&ancestor)
    }

    /// All classes that inherit from `class`, directly or not, in the order
    /// they are reached through child links.
    pub fn descendants(&self, class: TypeRef) -> Vec<TypeRef> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        let mut frontier = vec![class];
        while let Some(next) = frontier.pop() {
            let Ok(cls) = self.class_ref(next) else {
                continue;
            };
            for &child in &cls.children {
                if seen.insert(child) {
                    found.push(child);
                    frontier.push(child);
                }
            }
        }
        found
    }

    /// Make `parent` a parent of `class`.
    ///
    /// Fails if `parent` is `class`, is already an ancestor of `class`, or is
    /// a descendant of `class`. Nothing changes on failure.
    pub fn add_parent(&mut self, class: TypeRef, parent: TypeRef) -> Result<(), SchemaError> {
        let class_name = self.class_ref(class)?.name().to_string();
        let parent_name = self.class_ref(parent)?.name().to_string();

        if class == parent || self.is_ancestor(class, parent) {
            log::warn!(
                "[Module::add_parent] '{}' -> '{}' rejected: cycle",
                class_name,
                parent_name
            );
            return Err(SchemaError::InheritanceCycle {
                class: class_name,
                parent: parent_name,
            });
        }
        if self.is_ancestor(parent, class) {
            log::warn!(
                "[Module::add_parent] '{}' -> '{}' rejected: already an ancestor",
                class_name,
                parent_name
            );
            return Err(SchemaError::DuplicateParent {
                class: class_name,
                parent: parent_name,
            });
        }

        let cls = self.class_ref(class)?;
        let mut parents = cls.parents.clone();
        parents.push(parent);
        let updates = self.flatten_hierarchy(class, &parents, &cls.base_fields)?;

        self.class_mut(class)?.parents.push(parent);
        self.class_mut(parent)?.children.push(class);
        self.commit_flattened(updates)?;
        log::debug!(
            "[Module::add_parent] '{}' now inherits from '{}'",
            class_name,
            parent_name
        );
        Ok(())
    }

    /// Add a declared field to a class. Called through [`Module::add_field`].
    pub(crate) fn add_class_field(&mut self, class: TypeRef, field: Field) -> Result<FieldId, SchemaError> {
        if !field.has_name() {
            return Err(SchemaError::EmptyName);
        }
        self.check_field_type(class, field.ty)?;
        self.declare_class_field(class, field)
    }

    /// Adopt a field into the arena, declare it in `class` and re-flatten.
    fn declare_class_field(&mut self, class: TypeRef, field: Field) -> Result<FieldId, SchemaError> {
        let cls = self.class_ref(class)?;
        if cls.base_names.contains(&field.name) {
            return Err(SchemaError::NameConflict { name: field.name });
        }
        let parents = cls.parents.clone();
        let mut base = cls.base_fields.clone();

        let id = self.next_field_id();
        let name = field.name.clone();
        base.push(id);
        self.adopt_field(id, class, field);

        let updates = match self.flatten_hierarchy(class, &parents, &base) {
            Ok(updates) => updates,
            Err(e) => {
                self.fields.pop();
                return Err(e);
            }
        };

        let cls = self.class_mut(class)?;
        cls.base_fields.push(id);
        cls.base_names.insert(name.clone());
        self.commit_flattened(updates)?;
        log::debug!(
            "[Module::add_field] class {:?} field '{}' id={}",
            class,
            name,
            id
        );
        Ok(id)
    }

    /// Compute new flattened field lists for `class` (with the given parents
    /// and declared fields) and every descendant of it.
    fn flatten_hierarchy(
        &self,
        class: TypeRef,
        parents: &[TypeRef],
        base: &[FieldId],
    ) -> Result<HashMap<TypeRef, Vec<FieldId>>, SchemaError> {
        let mut computed = HashMap::new();
        let fields = self.flatten_class(class, parents, base, &computed)?;
        computed.insert(class, fields);

        // Descendants in an order where parents come first.
        let mut pending: VecDeque<TypeRef> = self.descendants(class).into();
        let queued: HashSet<TypeRef> = pending.iter().copied().collect();

        let mut stalled = 0;
        while let Some(next) = pending.pop_front() {
            let cls = self.class_ref(next)?;
            let ready = cls
                .parents
                .iter()
                .all(|p| !queued.contains(p) || computed.contains_key(p));
            if !ready {
                stalled += 1;
                if stalled > pending.len() + 1 {
                    return Err(SchemaError::InheritanceCycle {
                        class: cls.name().to_string(),
                        parent: self.class_ref(class)?.name().to_string(),
                    });
                }
                pending.push_back(next);
                continue;
            }
            stalled = 0;
            let fields = self.flatten_class(next, &cls.parents, &cls.base_fields, &computed)?;
            computed.insert(next, fields);
        }

        self.check_flattened_containment(&computed)?;
        Ok(computed)
    }

    /// Reject new field lists under which a class would contain itself, for
    /// example through a field inherited from a parent.
    fn check_flattened_containment(&self, computed: &HashMap<TypeRef, Vec<FieldId>>) -> Result<(), SchemaError> {
        for (&class, ids) in computed {
            for &id in ids {
                let Some(field) = self.field_by_id(id) else {
                    continue;
                };
                if self.type_contains_with(field.ty, class, computed, &mut HashSet::new()) {
                    let name = self.class_ref(class)?.name().to_string();
                    log::warn!(
                        "[Module::flatten_hierarchy] class '{}' would contain itself through '{}'",
                        name,
                        field.name
                    );
                    return Err(SchemaError::InvalidType {
                        reason: format!("class '{}' would contain itself through field '{}'", name, field.name),
                    });
                }
            }
        }
        Ok(())
    }

    fn flatten_class(
        &self,
        class: TypeRef,
        parents: &[TypeRef],
        base: &[FieldId],
        computed: &HashMap<TypeRef, Vec<FieldId>>,
    ) -> Result<Vec<FieldId>, SchemaError> {
        let mut base_names = HashSet::new();
        for &id in base {
            base_names.insert(self.field_name(id)?);
        }

        let mut taken: HashSet<&str> = HashSet::new();
        let mut seen: HashSet<FieldId> = HashSet::new();
        let mut fields = Vec::new();
        for &parent in parents {
            let inherited = match computed.get(&parent) {
                Some(list) => list.as_slice(),
                None => self.class_ref(parent)?.strct.fields(),
            };
            for &id in inherited {
                if seen.contains(&id) {
                    continue;
                }
                let name = self.field_name(id)?;
                if base_names.contains(name) || !taken.insert(name) {
                    continue;
                }
                seen.insert(id);
                fields.push(id);
            }
        }

        for &id in base {
            if !seen.insert(id) {
                return Err(SchemaError::FieldIdConflict {
                    class: self.class_ref(class)?.name().to_string(),
                    id: id.value(),
                });
            }
            fields.push(id);
        }
        fields.sort_unstable();
        Ok(fields)
    }

    fn field_name(&self, id: FieldId) -> Result<&str, SchemaError> {
        self.field_by_id(id)
            .map(Field::name)
            .ok_or(SchemaError::UnknownHandle {
                what: "field",
                index: id.index(),
            })
    }

    fn commit_flattened(&mut self, updates: HashMap<TypeRef, Vec<FieldId>>) -> Result<(), SchemaError> {
        for (class, ids) in updates {
            let named: Vec<(FieldId, String)> = ids
                .into_iter()
                .map(|id| {
                    let name = self
                        .field_by_id(id)
                        .map(|f| f.name.clone())
                        .unwrap_or_default();
                    (id, name)
                })
                .collect();
            log::trace!(
                "[Module::commit_flattened] class {:?} has {} fields",
                class,
                named.len()
            );
            self.class_mut(class)?.strct.set_fields(named);
        }
        Ok(())
    }

    /// Declare a molecular field grouping `atomics`, which must be named,
    /// non-molecular fields visible in `class` with identical keywords.
    pub fn add_molecular(&mut self, class: TypeRef, name: &str, atomics: &[FieldId]) -> Result<FieldId, SchemaError> {
        if name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        let cls = self.class_ref(class)?;
        if atomics.is_empty() {
            return Err(SchemaError::InvalidType {
                reason: format!("molecular field '{}' has no atomic fields", name),
            });
        }

        let mut composite = Struct::new(None, name);
        let mut keywords: Option<&KeywordList> = None;
        for &id in atomics {
            let atomic = self.field_by_id(id).ok_or(SchemaError::UnknownHandle {
                what: "field",
                index: id.index(),
            })?;
            if !cls.strct.has_field(id) {
                return Err(SchemaError::InvalidType {
                    reason: format!("field '{}' is not visible in class '{}'", atomic.name, cls.name()),
                });
            }
            if atomic.is_molecular() {
                return Err(SchemaError::InvalidType {
                    reason: "molecular fields cannot be nested".into(),
                });
            }
            match keywords {
                None => keywords = Some(&atomic.keywords),
                Some(first) if !first.has_matching_keywords(&atomic.keywords) => {
                    log::warn!(
                        "[Module::add_molecular] '{}' rejected: keywords of '{}' differ",
                        name,
                        atomic.name
                    );
                    return Err(SchemaError::KeywordMismatch {
                        field: atomic.name.clone(),
                    });
                }
                Some(_) => {}
            }
            composite.push_field(id, &atomic.name)?;
        }

        let mut field = Field::new(name, TypeRef::INVALID);
        if let Some(kw) = keywords {
            field.keywords.copy_keywords(kw);
        }
        field.atomics = Some(atomics.to_vec());

        let composite_ty = self.push_type(Type::new(TypeKind::Struct(composite)));
        field.ty = composite_ty;
        match self.declare_class_field(class, field) {
            Ok(id) => Ok(id),
            Err(e) => {
                self.types.pop();
                Err(e)
            }
        }
    }

    /// Set the constructor of a class. The field must have a method type.
    pub fn set_constructor(&mut self, class: TypeRef, mut field: Field) -> Result<(), SchemaError> {
        self.class_ref(class)?;
        if self.subtype_of(field.ty) != Some(Subtype::Method) {
            return Err(SchemaError::InvalidType {
                reason: "constructors must have a method type".into(),
            });
        }
        field.owner = Some(class);
        let cls = self.class_mut(class)?;
        log::debug!("[Module::set_constructor] class '{}'", cls.name());
        cls.constructor = Some(field);
        Ok(())
    }

    /// Attach a keyword to a class. Returns false if it was already present.
    pub fn add_class_keyword(&mut self, class: TypeRef, keyword: &str) -> Result<bool, SchemaError> {
        Ok(self.class_mut(class)?.keywords.add_keyword(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(module: &Module, class: TypeRef) -> Vec<String> {
        module
            .type_of(class)
            .unwrap()
            .as_struct()
            .unwrap()
            .fields()
            .iter()
            .map(|id| module.field_by_id(*id).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_class_fields_need_names() {
        let mut module = Module::new();
        let avatar = module.add_class("Avatar").unwrap();
        assert_eq!(
            module.add_field(avatar, Field::anonymous(TypeRef::INT8)),
            Err(SchemaError::EmptyName)
        );
        module.add_field(avatar, Field::new("hp", TypeRef::INT8)).unwrap();
        assert!(module.add_field(avatar, Field::new("hp", TypeRef::INT16)).is_err());
        assert_eq!(module.num_fields(), 1);
    }

    #[test]
    fn test_inherited_fields_sorted_by_id() {
        let mut module = Module::new();
        let base = module.add_class("Base").unwrap();
        let derived = module.add_class("Derived").unwrap();
        module.add_field(derived, Field::new("own", TypeRef::INT8)).unwrap();
        module.add_field(base, Field::new("inherited", TypeRef::INT8)).unwrap();
        module.add_parent(derived, base).unwrap();

        assert_eq!(names(&module, derived), ["own", "inherited"]);
        let cls = module.type_of(derived).unwrap().as_class().unwrap();
        assert_eq!(cls.num_base_fields(), 1);
        assert_eq!(cls.nth_parent(0), Ok(base));
        assert_eq!(module.type_of(base).unwrap().as_class().unwrap().children(), &[derived]);
    }

    #[test]
    fn test_parent_field_added_later_reaches_children() {
        let mut module = Module::new();
        let a = module.add_class("A").unwrap();
        let b = module.add_class("B").unwrap();
        let c = module.add_class("C").unwrap();
        module.add_parent(b, a).unwrap();
        module.add_parent(c, b).unwrap();
        module.add_field(a, Field::new("x", TypeRef::INT32)).unwrap();
        assert_eq!(names(&module, c), ["x"]);
    }

    #[test]
    fn test_declared_field_shadows_inherited() {
        let mut module = Module::new();
        let base = module.add_class("Base").unwrap();
        let derived = module.add_class("Derived").unwrap();
        let base_x = module.add_field(base, Field::new("x", TypeRef::INT8)).unwrap();
        module.add_parent(derived, base).unwrap();
        let own_x = module.add_field(derived, Field::new("x", TypeRef::INT64)).unwrap();

        let strct = module.type_of(derived).unwrap().as_struct().unwrap();
        assert_eq!(strct.fields(), &[own_x]);
        assert!(!strct.has_field(base_x));
    }

    #[test]
    fn test_earlier_parent_wins() {
        let mut module = Module::new();
        let a = module.add_class("A").unwrap();
        let b = module.add_class("B").unwrap();
        let c = module.add_class("C").unwrap();
        let ax = module.add_field(a, Field::new("x", TypeRef::INT8)).unwrap();
        module.add_field(b, Field::new("x", TypeRef::INT16)).unwrap();
        module.add_parent(c, a).unwrap();
        module.add_parent(c, b).unwrap();
        assert_eq!(module.type_of(c).unwrap().as_struct().unwrap().fields(), &[ax]);
    }

    #[test]
    fn test_diamond_field_appears_once() {
        let mut module = Module::new();
        let root = module.add_class("Root").unwrap();
        let left = module.add_class("Left").unwrap();
        let right = module.add_class("Right").unwrap();
        let leaf = module.add_class("Leaf").unwrap();
        module.add_field(root, Field::new("id", TypeRef::UINT32)).unwrap();
        module.add_parent(left, root).unwrap();
        module.add_parent(right, root).unwrap();
        module.add_parent(leaf, left).unwrap();
        module.add_parent(leaf, right).unwrap();
        assert_eq!(names(&module, leaf), ["id"]);
    }

    #[test]
    fn test_cycles_rejected() {
        let mut module = Module::new();
        let a = module.add_class("A").unwrap();
        let b = module.add_class("B").unwrap();
        assert!(matches!(module.add_parent(a, a), Err(SchemaError::InheritanceCycle { .. })));
        module.add_parent(b, a).unwrap();
        assert!(matches!(module.add_parent(a, b), Err(SchemaError::InheritanceCycle { .. })));
        assert_eq!(module.type_of(b).unwrap().as_class().unwrap().num_children(), 0);
    }

    #[test]
    fn test_existing_ancestor_rejected() {
        let mut module = Module::new();
        let a = module.add_class("A").unwrap();
        let b = module.add_class("B").unwrap();
        let c = module.add_class("C").unwrap();
        module.add_parent(b, a).unwrap();
        module.add_parent(c, b).unwrap();

        assert!(matches!(module.add_parent(c, a), Err(SchemaError::DuplicateParent { .. })));
        let a_cls = module.type_of(a).unwrap().as_class().unwrap();
        assert_eq!(a_cls.children(), &[b]);
        assert_eq!(module.type_of(c).unwrap().as_class().unwrap().num_parents(), 1);
    }

    #[test]
    fn test_add_parent_requires_classes() {
        let mut module = Module::new();
        let a = module.add_class("A").unwrap();
        let s = module.add_struct("S").unwrap();
        assert!(matches!(module.add_parent(a, s), Err(SchemaError::UnknownHandle { .. })));
    }

    #[test]
    fn test_molecular_field() {
        let mut module = Module::new();
        let avatar = module.add_class("Avatar").unwrap();
        let x = module
            .add_field(avatar, Field::new("x", TypeRef::FLOAT32).with_keywords(["ram", "broadcast"]))
            .unwrap();
        let y = module
            .add_field(avatar, Field::new("y", TypeRef::FLOAT32).with_keywords(["broadcast", "ram"]))
            .unwrap();
        let pos = module.add_molecular(avatar, "setXY", &[x, y]).unwrap();

        let field = module.field_by_id(pos).unwrap();
        assert!(field.is_molecular());
        assert_eq!(field.atomics(), Some(&[x, y][..]));
        assert!(field.has_keyword("ram"));
        assert_eq!(module.fixed_size(field.ty()), 8);
        // The molecular does not count toward the class size.
        assert_eq!(module.fixed_size(avatar), 8);
    }

    #[test]
    fn test_molecular_keyword_mismatch() {
        let mut module = Module::new();
        let avatar = module.add_class("Avatar").unwrap();
        let x = module
            .add_field(avatar, Field::new("x", TypeRef::INT8).with_keyword("ram"))
            .unwrap();
        let y = module.add_field(avatar, Field::new("y", TypeRef::INT8)).unwrap();
        let types_before = module.type_count();
        assert_eq!(
            module.add_molecular(avatar, "xy", &[x, y]),
            Err(SchemaError::KeywordMismatch { field: "y".into() })
        );
        assert_eq!(module.type_count(), types_before);
        assert_eq!(module.num_fields(), 2);
    }

    #[test]
    fn test_molecular_requires_visible_atomics() {
        let mut module = Module::new();
        let a = module.add_class("A").unwrap();
        let b = module.add_class("B").unwrap();
        let ax = module.add_field(a, Field::new("x", TypeRef::INT8)).unwrap();
        assert!(module.add_molecular(b, "m", &[ax]).is_err());
        assert!(module.add_molecular(a, "m", &[]).is_err());

        let m = module.add_molecular(a, "m", &[ax]).unwrap();
        assert!(module.add_molecular(a, "n", &[m]).is_err());
    }

    #[test]
    fn test_constructor() {
        let mut module = Module::new();
        let avatar = module.add_class("Avatar").unwrap();
        let ctor = module.add_method();
        assert!(module
            .set_constructor(avatar, Field::new("Avatar", TypeRef::INT8))
            .is_err());
        module.set_constructor(avatar, Field::new("Avatar", ctor)).unwrap();

        let cls = module.type_of(avatar).unwrap().as_class().unwrap();
        assert!(cls.has_constructor());
        assert_eq!(cls.constructor().unwrap().owner(), Some(avatar));
        assert_eq!(cls.as_struct().num_fields(), 0);
    }
}
