//! Data contract model, field store and document rendering.
//!
//! A contract is built by issuing commands against a [`FieldStore`]: add a
//! field, update it with a [`FieldPatch`], remove it. The store keeps field
//! names unique and fields in insertion order. Rendering is a separate pure
//! step: [`generate`] turns metadata plus fields into the contract document.
//!
//! ## Usage
//!
//! ```
//! use datacontract::contract::{FieldPatch, FieldStore, FieldType};
//!
//! let mut store = FieldStore::new();
//! store.set_domain("sales");
//!
//! let index = store.add();
//! store.update(
//!     index,
//!     FieldPatch::new()
//!         .name("id")
//!         .field_type(FieldType::Integer)
//!         .required(true)
//!         .clear_sensitive(),
//! )?;
//!
//! assert_eq!(
//!     store.generate(),
//!     "tags:\n  domain: sales\nname: MyDataContract\nfields:\n  id:\n    type: integer\n    required: true"
//! );
//! # Ok::<(), datacontract::error::ContractError>(())
//! ```

pub mod model;
pub mod serializer;
pub mod storage;
pub mod store;

pub use model::{
    Change, ConstraintValue, Constraints, ContractMetadata, DEFAULT_CONTRACT_NAME, Field,
    FieldPatch, FieldType, Sensitivity, parse_enumeration,
};
pub use serializer::generate;
pub use storage::{ContractDraft, load_draft, save_draft};
pub use store::{FieldId, FieldStore};
