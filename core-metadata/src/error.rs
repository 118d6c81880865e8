use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Metadata lookup failed with status {status}: {body}")]
    LookupFailed { status: u16, body: String },

    #[error("Invalid metadata response: {0}")]
    InvalidResponse(String),

    #[error("Metadata service not configured: {0}")]
    NotConfigured(String),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, MetadataError>;
