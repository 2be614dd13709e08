// Mon Aug 10 2026 - Alex

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid provider settings: {0}")]
    Settings(#[from] serde_json::Error),
}
