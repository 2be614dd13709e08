// Mon Aug 10 2026 - Alex

use std::collections::BTreeMap;

/// Sparse single-byte patches keyed by raw offset within the artifact.
#[derive(Debug, Clone, Default)]
pub struct PatchMap {
    bytes: BTreeMap<u64, u8>,
}

impl PatchMap {
    pub fn new() -> Self {
        Self {
            bytes: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, offset: u64, value: u8) {
        self.bytes.insert(offset, value);
    }

    pub fn get(&self, offset: u64) -> Option<u8> {
        self.bytes.get(&offset).copied()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Overwrites the bytes of `dst` that fall on a patched offset, where
    /// `dst` holds the raw bytes starting at `offset`.
    pub fn apply(&self, offset: u64, dst: &mut [u8]) {
        let end = offset.saturating_add(dst.len() as u64);
        for (&patched, &value) in self.bytes.range(offset..end) {
            dst[(patched - offset) as usize] = value;
        }
    }
}

/// A contiguous byte range replacing provider content, applied after patches.
#[derive(Debug, Clone)]
pub struct Overlay {
    offset: u64,
    data: Vec<u8>,
}

impl Overlay {
    pub fn new(offset: u64, data: Vec<u8>) -> Self {
        Self { offset, data }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.data.len() as u64)
    }
}

/// Copies the overlapping part of each overlay into `dst`, in list order.
pub fn apply_overlays(overlays: &[Overlay], offset: u64, dst: &mut [u8]) {
    let request_end = offset.saturating_add(dst.len() as u64);

    for overlay in overlays {
        let overlap_min = offset.max(overlay.offset());
        let overlap_max = request_end.min(overlay.end());
        if overlap_max <= overlap_min {
            continue;
        }

        let src = (overlap_min - overlay.offset()) as usize;
        let at = (overlap_min - offset) as usize;
        let count = (overlap_max - overlap_min) as usize;
        dst[at..at + count].copy_from_slice(&overlay.data()[src..src + count]);
    }
}
