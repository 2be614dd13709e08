// Mon Aug 10 2026 - Alex

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::error::ProviderError;
use super::overlay::{apply_overlays, Overlay, PatchMap};

/// Page size of providers that do not split their artifact: a single page
/// spanning the whole address space.
pub const DEFAULT_PAGE_SIZE: u64 = u64::MAX;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderSettings {
    base_address: u64,
    current_page: u32,
}

/// An abstract byte-addressable source.
///
/// A provider exposes the logical address space
/// `[base_address, base_address + actual_size)`. Raw bytes come out of
/// `read_raw`; `read` is the derived operation consumers use, which rebases a
/// logical address, clamps against the current page view, and lays patches
/// and overlays over the raw bytes. Reads are best-effort and infallible:
/// construction is where I/O may fail, and bytes that cannot be served are
/// left untouched in the destination.
pub trait Provider {
    /// Short human-readable tag, used in logs.
    fn name(&self) -> &str;

    fn base_address(&self) -> Address;

    /// Relocates the logical address space. Fixed-base providers may ignore
    /// this.
    fn set_base_address(&mut self, _address: Address) {}

    /// Total number of addressable bytes in the artifact.
    fn actual_size(&self) -> u64;

    /// Copies bytes of the current page view starting at `offset` into
    /// `dst`. Bytes outside the view are left untouched.
    fn read_raw(&self, offset: u64, dst: &mut [u8]);

    fn is_readable(&self) -> bool {
        true
    }

    fn patches(&self) -> Option<&PatchMap> {
        None
    }

    fn overlays(&self) -> &[Overlay] {
        &[]
    }

    fn page_size(&self) -> u64 {
        DEFAULT_PAGE_SIZE
    }

    fn current_page(&self) -> u32 {
        0
    }

    /// Switches the page view. Implementations ignore pages past
    /// `page_count`; single-page providers may ignore this entirely.
    fn set_current_page(&mut self, _page: u32) {}

    fn page_count(&self) -> u32 {
        let page_size = self.page_size().max(1);
        let full = self.actual_size() / page_size;
        let partial = (self.actual_size() % page_size != 0) as u64;
        full.saturating_add(partial)
            .max(1)
            .min(u32::MAX as u64) as u32
    }

    fn current_page_address(&self) -> u64 {
        self.page_size().saturating_mul(self.current_page() as u64)
    }

    /// Addressable size of the current page view.
    fn size(&self) -> u64 {
        self.actual_size()
            .saturating_sub(self.current_page_address())
            .min(self.page_size())
    }

    fn page_of_address(&self, address: Address) -> Option<u32> {
        let offset = address.as_u64().checked_sub(self.base_address().as_u64())?;
        if offset >= self.actual_size() {
            return None;
        }
        Some((offset / self.page_size().max(1)) as u32)
    }

    /// Reads from the logical address space. Out-of-range spans are left
    /// untouched in `dst`; in-range bytes are served raw, then patched, then
    /// overlaid.
    fn read(&self, address: Address, dst: &mut [u8]) {
        let base = self.base_address();
        if address < base {
            return;
        }
        let offset = address.as_u64() - base.as_u64();
        let view = self.size();
        if offset >= view {
            return;
        }

        let count = (dst.len() as u64).min(view - offset) as usize;
        let out = &mut dst[..count];
        self.read_raw(offset, out);
        if let Some(patches) = self.patches() {
            patches.apply(offset, out);
        }
        apply_overlays(self.overlays(), offset, out);
    }

    /// Snapshot of the provider state a caller may persist: base address and
    /// current page.
    fn store_settings(&self) -> Result<serde_json::Value, ProviderError> {
        let settings = ProviderSettings {
            base_address: self.base_address().as_u64(),
            current_page: self.current_page(),
        };
        Ok(serde_json::to_value(settings)?)
    }

    fn load_settings(&mut self, settings: &serde_json::Value) -> Result<(), ProviderError> {
        let settings: ProviderSettings = serde_json::from_value(settings.clone())?;
        self.set_base_address(Address::new(settings.base_address));
        self.set_current_page(settings.current_page);
        Ok(())
    }
}
