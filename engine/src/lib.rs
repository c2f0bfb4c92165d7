//! # cloudenv engine
//!
//! Registry of named cloud environments and the logic that creates or updates
//! them: built-in protection, Azure Resource Manager metadata discovery and
//! the overlay merge of endpoint values.
//!
//! ## Modules
//!
//! - [`environment`] - Endpoint kinds, endpoint maps, environments and the built-in set
//! - [`discovery`] - Metadata discovery against an ARM root endpoint
//! - [`resolver`] - Request types and the merge engine
//! - [`store`] - Environment store trait, in-memory and JSON file stores
//! - [`common`] - Error types

pub mod common;
pub mod discovery;
pub mod environment;
pub mod resolver;
pub mod store;
