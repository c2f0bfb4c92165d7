use thiserror::Error;

/// Top-level failure of an environment resolution.
///
/// Every failure aborts [`EnvironmentResolver::resolve`] before anything is
/// written back, so callers can surface the error and leave the store alone.
///
/// # Error Categories
///
/// - [`ProtectedEnvironment`] - the target name belongs to a built-in environment
/// - [`Discovery`] - the metadata round trip failed
/// - [`Store`] - the environment store failed while reading
///
/// # Examples
///
/// ```no_run
/// use engine::common::errors::EnvironmentError;
///
/// fn report(error: &EnvironmentError) {
///     match error {
///         EnvironmentError::ProtectedEnvironment { name } => {
///             eprintln!("'{}' is built in, pick another name", name);
///         }
///         EnvironmentError::Discovery(e) => {
///             eprintln!("Metadata discovery failed: {}", e);
///             eprintln!("Retry, or supply the endpoints explicitly.");
///         }
///         EnvironmentError::Store(e) => eprintln!("Profile store error: {}", e),
///     }
/// }
/// ```
///
/// [`EnvironmentResolver::resolve`]: crate::resolver::EnvironmentResolver::resolve
/// [`ProtectedEnvironment`]: EnvironmentError::ProtectedEnvironment
/// [`Discovery`]: EnvironmentError::Discovery
/// [`Store`]: EnvironmentError::Store
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// The requested name matches a built-in environment.
    ///
    /// `name` carries the built-in's own spelling, not the requested one.
    #[error("Cannot change built-in environment {name}.")]
    ProtectedEnvironment { name: String },

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EnvironmentError {
    pub fn is_protected(&self) -> bool {
        matches!(self, EnvironmentError::ProtectedEnvironment { .. })
    }

    pub fn is_discovery(&self) -> bool {
        matches!(self, EnvironmentError::Discovery(_))
    }

    /// Name of the built-in environment that blocked the change, if any.
    pub fn protected_name(&self) -> Option<&str> {
        match self {
            EnvironmentError::ProtectedEnvironment { name } => Some(name),
            _ => None,
        }
    }
}

/// Metadata discovery errors with the context needed to diagnose them.
///
/// Discovery is all-or-nothing: any of these variants means no part of the
/// metadata document was used. None of them are retried automatically.
///
/// # Error Categories
///
/// ## Input and Client Errors
/// - [`InvalidEndpoint`] - the root endpoint is not an absolute http(s) URL
/// - [`ClientCreation`] - HTTP client initialization failed
///
/// ## Request Execution Errors
/// - [`RequestFailed`] - transport level failure
/// - [`Timeout`] - the configured request timeout elapsed
/// - [`Cancelled`] - the caller cancelled the outstanding request
/// - [`HttpStatus`] - the metadata endpoint answered with a non-success status
///
/// ## Document Errors
/// - [`InvalidResponse`] - the body is not a metadata document
/// - [`MissingField`] - a required value is absent or empty
///
/// [`InvalidEndpoint`]: DiscoveryError::InvalidEndpoint
/// [`ClientCreation`]: DiscoveryError::ClientCreation
/// [`RequestFailed`]: DiscoveryError::RequestFailed
/// [`Timeout`]: DiscoveryError::Timeout
/// [`Cancelled`]: DiscoveryError::Cancelled
/// [`HttpStatus`]: DiscoveryError::HttpStatus
/// [`InvalidResponse`]: DiscoveryError::InvalidResponse
/// [`MissingField`]: DiscoveryError::MissingField
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Invalid resource manager endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("HTTP client creation failed: {reason}")]
    ClientCreation { reason: String },

    /// Connection refused, DNS failure, TLS failure and the like.
    #[error("Metadata request failed: {url} - {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("Metadata request timeout after {seconds}s: {url}")]
    Timeout { url: String, seconds: u64 },

    #[error("Metadata request cancelled: {url}")]
    Cancelled { url: String },

    #[error("Metadata endpoint {url} returned HTTP {status}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Invalid metadata response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("Metadata document is missing required field '{field}'")]
    MissingField { field: String },
}

impl DiscoveryError {
    /// HTTP status of the metadata response, when the failure was a status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DiscoveryError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Environment store failures.
///
/// The resolver never interprets these; it hands them back to the caller
/// wrapped in [`EnvironmentError::Store`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Profile I/O failed for {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Profile serialization failed: {reason}")]
    Serialization { reason: String },

    #[error("No configuration directory available for the default profile location")]
    NoConfigDirectory,
}
