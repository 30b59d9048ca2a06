//! ABI schema substrate for pointer authentication.
//!
//! # Overview
//!
//! A code generator that signs pointers needs one compact answer per
//! pointer category: is this category authenticated, with which signing
//! technology and key slot, is the storage address mixed into the
//! signature, and what extra discrimination applies. This crate is that
//! answer's type: the [`PointerAuthSchema`] descriptor, the per-target
//! [`PointerAuthOptions`] record that assigns a schema to every recognized
//! pointer category, and the ABI-stable hash used to derive extra
//! discriminators.
//!
//! It is metadata only. No key material is held, no signing is performed,
//! and no instruction sequences are chosen here; configuration layers
//! populate a record once per target, code-generation layers read it.
//!
//! # Core Guarantees
//!
//! - **Value semantics**: schemas and records are `Copy` data with no
//!   shared state; once constructed they are safe to read from any thread
//!   without synchronization.
//! - **Frozen numbering**: hardware key slots keep the exact integer
//!   values the hardware signing convention assigns; they pass through to
//!   instruction encoding unchanged.
//! - **Fail-fast contracts**: querying kind-specific schema properties on
//!   a disabled or mismatched schema is a bug in the caller and panics
//!   immediately instead of inventing a value.
//! - **Off is a real configuration**: a default record means "pointer
//!   authentication entirely off" and stays fully self-consistent.
//!
//! # Module Structure
//!
//! - [`schema`]: the per-category descriptor and its key/discrimination
//!   vocabulary
//! - [`options`]: the per-target aggregate record
//! - [`discriminator`]: ABI-stable hashing for `Type`/`Decl` extra
//!   discriminators
//!
//! # Example
//!
//! ```
//! use ptrauth_abi::{Discrimination, HardwareKey, PointerAuthOptions, PointerAuthSchema};
//!
//! // Target configuration: sign virtual-table pointers with the data-A
//! // key, bound to their storage address; authenticate return addresses.
//! let mut options = PointerAuthOptions::default();
//! options.vtable_pointers =
//!     PointerAuthSchema::hardware(HardwareKey::DataA, true, Discrimination::None);
//! options.return_addresses = true;
//! options.auth_traps = true;
//!
//! // Code generation: decide how to emit a virtual-table pointer store.
//! let schema = options.vtable_pointers;
//! if schema.is_enabled() {
//!     assert_eq!(schema.key().value(), 2); // data-A, frozen numbering
//!     assert!(schema.is_address_discriminated());
//!     assert!(!schema.has_extra_discrimination());
//! }
//! ```

#![forbid(unsafe_code)]

pub mod discriminator;
pub mod options;
pub mod schema;

pub use discriminator::{stable_hash, string_discriminator};
pub use options::PointerAuthOptions;
pub use schema::{
    AuthKind, Discrimination, HardwareKey, ParseKeyError, PointerAuthSchema, SchemaKey,
    SoftwareKey,
};
