// Mon Aug 10 2026 - Alex

use super::address::Address;
use super::overlay::{Overlay, PatchMap};
use super::traits::{Provider, DEFAULT_PAGE_SIZE};

/// Provider over a byte buffer held in memory.
pub struct MemoryProvider {
    data: Vec<u8>,
    name: String,
    base_address: Address,
    page_size: u64,
    current_page: u32,
    patches: PatchMap,
    overlays: Vec<Overlay>,
}

impl MemoryProvider {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            name: "memory".to_string(),
            base_address: Address::zero(),
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 0,
            patches: PatchMap::new(),
            overlays: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_base_address(mut self, address: Address) -> Self {
        self.base_address = address;
        self
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_patch(mut self, offset: u64, value: u8) -> Self {
        self.patches.set(offset, value);
        self
    }

    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.overlays.push(overlay);
        self
    }
}

impl Provider for MemoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_address(&self) -> Address {
        self.base_address
    }

    fn set_base_address(&mut self, address: Address) {
        self.base_address = address;
    }

    fn actual_size(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_raw(&self, offset: u64, dst: &mut [u8]) {
        let start = self.current_page_address().saturating_add(offset);
        if start >= self.data.len() as u64 {
            return;
        }
        let start = start as usize;
        let count = dst.len().min(self.data.len() - start);
        dst[..count].copy_from_slice(&self.data[start..start + count]);
    }

    fn patches(&self) -> Option<&PatchMap> {
        (!self.patches.is_empty()).then_some(&self.patches)
    }

    fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    fn page_size(&self) -> u64 {
        self.page_size
    }

    fn current_page(&self) -> u32 {
        self.current_page
    }

    fn set_current_page(&mut self, page: u32) {
        if page < self.page_count() {
            self.current_page = page;
        }
    }
}
