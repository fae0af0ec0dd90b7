//! User-role contract for rolestate.
//!
//! A user role is stored twice in the flat state key space:
//!
//! - the primary record, at the role's `id`, holding the JSON-serialized role
//! - an index entry, at the composite key `(roleIdNameIndex, name, id)`,
//!   holding a one-byte sentinel
//!
//! Lookups by id read the primary record. Lookups by name scan the index
//! range for that name and resolve each id. Listing scans the whole simple
//! key range. Both list paths are assembled into a JSON array.
//!
//! # Modules
//!
//! - [`entity`] — The [`UserRole`] record and its serialization
//! - [`store`] — [`UserRoleStore`], the CRUD layer over a state store
//! - [`assembler`] — [`JsonArrayAssembler`] for list results
//! - [`operation`] — The [`Operation`] dispatch table and argument rules
//! - [`contract`] — [`UserRoleContract`] entry points and [`Response`]
//! - [`config`] — [`ContractConfig`]
//! - [`error`] — [`ContractError`]

pub mod assembler;
pub mod config;
pub mod contract;
pub mod entity;
pub mod error;
pub mod operation;
pub mod store;

pub use assembler::{assemble, JsonArrayAssembler};
pub use config::{ContractConfig, ROLE_NAME_INDEX};
pub use contract::{Response, UserRoleContract};
pub use entity::UserRole;
pub use error::{ContractError, ContractResult};
pub use operation::{Arity, Operation};
pub use store::UserRoleStore;
