pub mod errors;

pub use errors::{DiscoveryError, EnvironmentError, StoreError};
