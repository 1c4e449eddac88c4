//! Persistence of in-progress contracts as JSON drafts.
//!
//! A draft stores the contract model itself (metadata and fields), not the
//! rendered document. Loading a draft rebuilds the store through its normal
//! commands, so a draft that would break field name uniqueness is rejected.

use super::model::{ContractMetadata, Field, FieldPatch};
use super::store::FieldStore;
use crate::error::{ContractError, Result, ResultExt as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current draft schema version.
///
/// Drafts written by a newer version are refused rather than misread.
pub const DRAFT_VERSION: u32 = 1;

/// Serialized form of a [`FieldStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractDraft {
    /// Schema version for forward compatibility
    pub draft_version: u32,

    /// UTC timestamp of the last save
    pub saved_utc: DateTime<Utc>,

    #[serde(default)]
    pub metadata: ContractMetadata,

    #[serde(default)]
    pub fields: Vec<Field>,
}

impl ContractDraft {
    /// Snapshot the current contents of `store`.
    pub fn from_store(store: &FieldStore) -> Self {
        Self {
            draft_version: DRAFT_VERSION,
            saved_utc: Utc::now(),
            metadata: store.metadata().clone(),
            fields: store.fields().to_vec(),
        }
    }

    /// Rebuild a store by replaying every field through `add` and `update`.
    ///
    /// Unnamed fields keep the default empty name from `add`, mirroring how
    /// an editor creates them.
    ///
    /// # Errors
    ///
    /// - [`ContractError::Config`] for drafts from a newer schema version.
    /// - [`ContractError::DuplicateName`] when two named fields share a name.
    pub fn into_store(self) -> Result<FieldStore> {
        if self.draft_version > DRAFT_VERSION {
            return Err(ContractError::Config(format!(
                "Draft version {} is newer than supported version {DRAFT_VERSION}",
                self.draft_version
            )));
        }

        let mut store = FieldStore::with_metadata(self.metadata);
        for field in self.fields {
            let index = store.add();
            let mut patch = FieldPatch::replace_with(field);
            if patch.name.as_deref() == Some("") {
                patch.name = None;
            }
            store.update(index, patch)?;
        }
        Ok(store)
    }
}

/// Save `store` to `path` as a pretty-printed JSON draft.
///
/// Parent directories are created when missing.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_draft(store: &FieldStore, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create draft directory {}", parent.display())
        })?;
    }

    let draft = ContractDraft::from_store(store);
    let json = serde_json::to_string_pretty(&draft).context("Failed to serialize draft")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write draft {}", path.display()))?;

    tracing::info!(path = %path.display(), fields = store.len(), "Saved draft");
    Ok(())
}

/// Load a draft from `path` into a new store.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if its
/// contents violate the store's rules (see [`ContractDraft::into_store`]).
pub fn load_draft(path: &Path) -> Result<FieldStore> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft {}", path.display()))?;

    let draft: ContractDraft = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse draft {}", path.display()))?;
    let store = draft.into_store()?;

    tracing::info!(path = %path.display(), fields = store.len(), "Loaded draft");
    Ok(store)
}
