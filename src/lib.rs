// Thu Aug 13 2026 - Alex

//! Buffered random-access reading over byte-addressable providers.
//!
//! A [`Provider`] exposes a flat, optionally paged address space with patch
//! and overlay semantics. [`BufferedReader`] caches one contiguous window of
//! it, refilled with at most one provider read per miss, and hands the bytes
//! out directly or through forward and reverse cursors suitable for generic
//! scanning algorithms. The [`scan`] module builds the needle searches on
//! top of the cursors.

pub mod provider;
pub mod reader;
pub mod scan;

#[cfg(test)]
mod testutil;

pub use provider::{
    apply_overlays, Address, FileProvider, MemoryProvider, Overlay, PatchMap, Provider,
    ProviderError, DEFAULT_PAGE_SIZE,
};
pub use reader::{
    BufferedReader, ForwardCursor, ReaderStream, ReverseCursor, DEFAULT_MAX_BUFFER_SIZE,
};
pub use scan::{search_backward, search_forward, Scanner, DEFAULT_CHUNK_SIZE};
