//! Error types for the dispatch core

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A backend type was registered twice under the same name
    #[error("Backend type '{name}' is already registered")]
    DuplicateRegistration { name: String },

    /// A backend with this name is already attached to the dispatcher
    #[error("Duplicate backend '{name}' (it has been attached before)")]
    DuplicateBackend { name: String },

    /// No constructor is registered under this name
    #[error("Unknown backend '{name}' (is it registered?)")]
    UnknownBackend { name: String },

    /// The backend was constructed but rejected its configuration
    #[error("Backend '{name}' failed to initialize: {source}")]
    Init {
        name: String,
        #[source]
        source: Box<DispatchError>,
    },

    /// The dispatcher has been closed and no longer accepts backends
    #[error("Dispatcher is closed")]
    Closed,

    /// A single backend failed to accept a message
    #[error("Backend '{name}' write failed: {message}")]
    Write { name: String, message: String },

    /// A backend panicked while handling a call
    #[error("Backend '{name}' panicked: {message}")]
    BackendPanic { name: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfig { component: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DispatchError {
    /// Create a duplicate registration error
    pub fn duplicate_registration(name: impl Into<String>) -> Self {
        DispatchError::DuplicateRegistration { name: name.into() }
    }

    /// Create a duplicate backend error
    pub fn duplicate_backend(name: impl Into<String>) -> Self {
        DispatchError::DuplicateBackend { name: name.into() }
    }

    /// Create an unknown backend error
    pub fn unknown_backend(name: impl Into<String>) -> Self {
        DispatchError::UnknownBackend { name: name.into() }
    }

    /// Wrap the error a backend returned from `init`
    pub fn init(name: impl Into<String>, source: DispatchError) -> Self {
        DispatchError::Init {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Create a write error for one backend
    pub fn write(name: impl Into<String>, message: impl Into<String>) -> Self {
        DispatchError::Write {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an error describing a caught backend panic
    pub fn backend_panic(name: impl Into<String>, message: impl Into<String>) -> Self {
        DispatchError::BackendPanic {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        DispatchError::InvalidConfig {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Whether the error came out of `attach` and left the backend list untouched
    pub fn is_attach_error(&self) -> bool {
        matches!(
            self,
            DispatchError::DuplicateBackend { .. }
                | DispatchError::UnknownBackend { .. }
                | DispatchError::Init { .. }
                | DispatchError::Closed
        )
    }
}
