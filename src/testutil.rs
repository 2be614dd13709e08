// Wed Aug 12 2026 - Alex

//! Shared test fixtures: a deterministic byte pattern and a provider
//! wrapper that counts raw reads.

use std::cell::Cell;

use crate::provider::{Address, Overlay, PatchMap, Provider};

/// Deterministic filler whose adjacent bytes always differ by 31 (mod 256),
/// so needles planted by tests cannot occur in it by accident.
pub fn sample_bytes(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(7))
        .collect()
}

/// Provider wrapper counting `read_raw` calls, for the one-read-per-miss
/// properties.
pub struct CountingProvider<P> {
    inner: P,
    reads: Cell<u64>,
}

impl<P: Provider> CountingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            reads: Cell::new(0),
        }
    }

    pub fn reads(&self) -> u64 {
        self.reads.get()
    }
}

impl<P: Provider> Provider for CountingProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn base_address(&self) -> Address {
        self.inner.base_address()
    }

    fn actual_size(&self) -> u64 {
        self.inner.actual_size()
    }

    fn read_raw(&self, offset: u64, dst: &mut [u8]) {
        self.reads.set(self.reads.get() + 1);
        self.inner.read_raw(offset, dst);
    }

    fn patches(&self) -> Option<&PatchMap> {
        self.inner.patches()
    }

    fn overlays(&self) -> &[Overlay] {
        self.inner.overlays()
    }

    fn page_size(&self) -> u64 {
        self.inner.page_size()
    }

    fn current_page(&self) -> u32 {
        self.inner.current_page()
    }
}
