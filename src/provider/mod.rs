// Mon Aug 10 2026 - Alex

pub mod address;
pub mod error;
pub mod file;
pub mod memory;
pub mod overlay;
pub mod traits;

pub use address::Address;
pub use error::ProviderError;
pub use file::FileProvider;
pub use memory::MemoryProvider;
pub use overlay::{apply_overlays, Overlay, PatchMap};
pub use traits::{Provider, DEFAULT_PAGE_SIZE};
