// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Methods and their parameters.

use super::types::{Subtype, Type, TypeKind, TypeRef};
use super::Module;
use crate::error::{IndexError, SchemaError};
use crate::value::Value;
use std::collections::HashMap;

/// A positional argument of a method.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub(crate) name: String,
    pub(crate) ty: TypeRef,
    pub(crate) default: Option<Vec<u8>>,
    pub(crate) method: Option<TypeRef>,
    pub(crate) position: usize,
}

impl Parameter {
    pub fn new(name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            ty,
            default: None,
            method: None,
            position: 0,
        }
    }

    pub fn anonymous(ty: TypeRef) -> Self {
        Self::new("", ty)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    pub fn has_default_value(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_value(&self) -> Option<&[u8]> {
        self.default.as_deref()
    }

    /// The method this parameter belongs to.
    pub fn method(&self) -> Option<TypeRef> {
        self.method
    }

    /// Position in the argument list. This is the parameter's identity.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// An ordered argument list. Arguments go on the wire in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Method {
    params: Vec<Parameter>,
    positions_by_name: HashMap<String, usize>,
}

impl Method {
    pub fn num_parameters(&self) -> usize {
        self.params.len()
    }

    pub fn nth_parameter(&self, n: usize) -> Result<&Parameter, IndexError> {
        IndexError::get("parameter", &self.params, n)
    }

    pub fn parameter_by_name(&self, name: &str) -> Option<&Parameter> {
        self.positions_by_name
            .get(name)
            .and_then(|&pos| self.params.get(pos))
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    fn push_parameter(&mut self, mut param: Parameter, method: TypeRef) -> Result<usize, SchemaError> {
        let position = self.params.len();
        if param.has_name() {
            if self.positions_by_name.contains_key(&param.name) {
                return Err(SchemaError::NameConflict { name: param.name });
            }
            self.positions_by_name.insert(param.name.clone(), position);
        }
        param.method = Some(method);
        param.position = position;
        self.params.push(param);
        Ok(position)
    }
}

impl Module {
    /// Add an empty method type and return its handle.
    pub fn add_method(&mut self) -> TypeRef {
        self.push_type(Type::new(TypeKind::Method(Method::default())))
    }

    fn method_mut(&mut self, method: TypeRef) -> Result<&mut Method, SchemaError> {
        self.types
            .get_mut(method.index())
            .and_then(Type::as_method_mut)
            .ok_or(SchemaError::UnknownHandle {
                what: "method",
                index: method.index(),
            })
    }

    fn check_parameter_type(&self, method: TypeRef, ty: TypeRef) -> Result<(), SchemaError> {
        let ty_data = self.type_of(ty).ok_or(SchemaError::UnknownHandle {
            what: "type",
            index: ty.index(),
        })?;
        let reason = match ty_data.subtype() {
            Subtype::Invalid => "parameters cannot have the invalid type",
            Subtype::Method => "parameters cannot be methods",
            _ if ty_data.as_class().is_some() => "parameters cannot be classes",
            _ if self.type_contains(ty, method) => "a method cannot take itself as a parameter",
            _ => return Ok(()),
        };
        Err(SchemaError::InvalidType {
            reason: reason.into(),
        })
    }

    /// Append a parameter to a method. Returns its position.
    pub fn add_parameter(&mut self, method: TypeRef, param: Parameter) -> Result<usize, SchemaError> {
        self.check_parameter_type(method, param.ty)?;
        let position = self.method_mut(method)?.push_parameter(param, method)?;
        log::debug!(
            "[Module::add_parameter] method {:?} parameter #{}",
            method,
            position
        );
        Ok(position)
    }

    /// Change a parameter's type. Any default value is cleared.
    pub fn set_parameter_type(&mut self, method: TypeRef, position: usize, ty: TypeRef) -> Result<(), SchemaError> {
        self.check_parameter_type(method, ty)?;
        let param = self.parameter_mut(method, position)?;
        param.ty = ty;
        param.default = None;
        Ok(())
    }

    /// Pack `value` against the parameter's type and store it as the default.
    pub fn set_parameter_default(&mut self, method: TypeRef, position: usize, value: &Value) -> Result<(), SchemaError> {
        let ty = self.parameter_mut(method, position)?.ty;
        let packed = value.pack(self, ty)?;
        self.parameter_mut(method, position)?.default = Some(packed);
        Ok(())
    }

    fn parameter_mut(&mut self, method: TypeRef, position: usize) -> Result<&mut Parameter, SchemaError> {
        self.method_mut(method)?
            .params
            .get_mut(position)
            .ok_or(SchemaError::UnknownHandle {
                what: "parameter",
                index: position,
            })
    }
}
