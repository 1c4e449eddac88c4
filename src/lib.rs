//! # datacontract - Data Contract Builder
//!
//! datacontract lets an author describe the shape of a data product (its
//! tags, its name and an ordered list of typed fields) and renders that
//! description as a contract document.
//!
//! ## Quick Start
//!
//! ```
//! use datacontract::contract::{FieldPatch, FieldStore, FieldType, Sensitivity};
//!
//! let mut store = FieldStore::new();
//! store.set_contract_name("Customers");
//!
//! let index = store.add();
//! store.update(
//!     index,
//!     FieldPatch::new()
//!         .name("ssn")
//!         .required(true)
//!         .sensitive(Sensitivity { pii: Some(true), phi: Some(false) }),
//! )?;
//!
//! let document = store.generate();
//! assert!(document.contains("    sensitive:\n      pii: true"));
//! # Ok::<(), datacontract::error::ContractError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`contract`]: Field model, the [`contract::FieldStore`] and document rendering
//!   - [`contract::serializer`]: The document grammar
//!   - [`contract::storage`]: JSON drafts of in-progress contracts
//! - [`shell`]: Line-oriented editing commands
//! - [`view`]: Per-field presentation state for editors
//! - [`config`]: Application configuration
//! - [`logging`]: Tracing subscriber setup
//! - [`error`]: Error types and handling utilities
//!
//! ## Key Concepts
//!
//! ### Commands, Not Field Access
//!
//! Fields are only changed through [`contract::FieldStore`] commands. Every
//! command either applies fully or fails and leaves the store as it was, and
//! `update` never gives a field a name another field already has. Only `add`
//! can leave more than one field with the empty default name, until those
//! fields are named.
//!
//! ### Pure Rendering
//!
//! [`contract::generate`] takes borrowed metadata and fields and returns the
//! document text. It has no error path and the same input always yields the
//! same output.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod contract;
pub mod error;
pub mod logging;
pub mod shell;
pub mod view;
