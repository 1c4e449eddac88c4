//! Ordered, name-unique collection of contract fields.
//!
//! [`FieldStore`] is the only way to change a contract: every command either
//! applies completely or fails and leaves the store untouched.
//!
//! Names are checked whenever [`FieldStore::update`] supplies one. [`FieldStore::add`]
//! never fails, so several freshly added fields can share the empty name until
//! they are named.

use super::model::{Change, ContractMetadata, Field, FieldPatch, parse_enumeration};
use super::serializer;
use crate::error::{ContractError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a field within a store.
///
/// Assigned on [`FieldStore::add`] and never reused, so it survives removals
/// that shift positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(Uuid);

impl FieldId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contract metadata plus the ordered list of fields.
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    metadata: ContractMetadata,
    fields: Vec<Field>,
    ids: Vec<FieldId>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(metadata: ContractMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// Append a field with default values and return its position.
    ///
    /// The new field is unnamed (`""`), even when another unnamed field exists.
    pub fn add(&mut self) -> usize {
        let id = FieldId::new();
        self.fields.push(Field::default());
        self.ids.push(id);

        let index = self.fields.len() - 1;
        tracing::debug!(index, %id, "Added field");
        index
    }

    /// Remove the field at `index`. Later fields move down one position and
    /// keep their relative order.
    ///
    /// # Errors
    ///
    /// [`ContractError::IndexOutOfRange`] when `index` is not a field position.
    pub fn remove(&mut self, index: usize) -> Result<(FieldId, Field)> {
        self.check_index(index)?;

        let field = self.fields.remove(index);
        let id = self.ids.remove(index);
        tracing::debug!(index, %id, name = %field.name, "Removed field");
        Ok((id, field))
    }

    /// Merge `patch` into the field at `index`.
    ///
    /// # Errors
    ///
    /// - [`ContractError::IndexOutOfRange`] when `index` is not a field position.
    /// - [`ContractError::DuplicateName`] when the patch renames the field to
    ///   a name another field already has. Nothing from the patch is applied.
    ///   Keeping the field's current name is never a collision.
    pub fn update(&mut self, index: usize, patch: FieldPatch) -> Result<()> {
        self.check_index(index)?;
        if patch.is_empty() {
            tracing::debug!(index, "Ignored empty patch");
            return Ok(());
        }

        if let Some(name) = &patch.name
            && let Some(existing) = self.position_of_other(index, name)
        {
            tracing::warn!(index, existing, name = %name, "Rejected duplicate field name");
            return Err(ContractError::DuplicateName {
                name: name.clone(),
                index,
                existing,
            });
        }

        let len = self.fields.len();
        let field = self
            .fields
            .get_mut(index)
            .ok_or(ContractError::IndexOutOfRange { index, len })?;
        patch.apply_to(field);
        tracing::debug!(index, name = %field.name, "Updated field");
        Ok(())
    }

    /// Replace the enumeration of the field at `index` from comma-separated
    /// text. Input with no non-blank entries removes the enumeration.
    ///
    /// # Errors
    ///
    /// Same as [`FieldStore::update`].
    pub fn set_enumeration_csv(&mut self, index: usize, text: &str) -> Result<()> {
        let change = parse_enumeration(text).map_or(Change::Clear, Change::Set);
        self.update(
            index,
            FieldPatch {
                enumeration: change,
                ..FieldPatch::default()
            },
        )
    }

    /// Read-only view of the fields in order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field ids, positionally aligned with [`FieldStore::fields`].
    pub fn ids(&self) -> &[FieldId] {
        &self.ids
    }

    pub fn id_of(&self, index: usize) -> Option<FieldId> {
        self.ids.get(index).copied()
    }

    pub fn index_of(&self, id: FieldId) -> Option<usize> {
        self.ids.iter().position(|candidate| *candidate == id)
    }

    /// Position of the first field called `name`.
    pub fn position_of_name(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub fn metadata(&self) -> &ContractMetadata {
        &self.metadata
    }

    pub fn set_contract_name(&mut self, value: impl Into<String>) {
        self.metadata.contract_name = value.into();
    }

    pub fn set_domain(&mut self, value: impl Into<String>) {
        self.metadata.domain = value.into();
    }

    pub fn set_subdomain(&mut self, value: impl Into<String>) {
        self.metadata.subdomain = value.into();
    }

    pub fn set_data_product_name(&mut self, value: impl Into<String>) {
        self.metadata.data_product_name = value.into();
    }

    /// Render the current contract document.
    pub fn generate(&self) -> String {
        serializer::generate(&self.metadata, &self.fields)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.fields.len() {
            Ok(())
        } else {
            Err(ContractError::IndexOutOfRange {
                index,
                len: self.fields.len(),
            })
        }
    }

    fn position_of_other(&self, index: usize, name: &str) -> Option<usize> {
        if self.fields.get(index).is_some_and(|field| field.name == name) {
            return None;
        }
        self.position_of_name(name)
    }
}
