// Mon Aug 10 2026 - Alex

use std::fs::File;
use std::path::{Path, PathBuf};

use log::debug;
use memmap2::Mmap;

use super::address::Address;
use super::error::ProviderError;
use super::traits::{Provider, DEFAULT_PAGE_SIZE};

/// Read-only provider over a memory-mapped file.
pub struct FileProvider {
    // Empty files cannot be mapped; they are served as a zero-length space.
    map: Option<Mmap>,
    len: u64,
    path: PathBuf,
    name: String,
    base_address: Address,
    page_size: u64,
    current_page: u32,
}

impl FileProvider {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        let map = if len > 0 {
            Some(unsafe { Mmap::map(&file)? })
        } else {
            None
        };

        debug!("mapped {} bytes from {}", len, path.display());

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        Ok(Self {
            map,
            len,
            path: path.to_path_buf(),
            name,
            base_address: Address::zero(),
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 0,
        })
    }

    pub fn with_base_address(mut self, address: Address) -> Self {
        self.base_address = address;
        self
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Provider for FileProvider {
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
        self.len
    }

    fn read_raw(&self, offset: u64, dst: &mut [u8]) {
        let Some(map) = self.map.as_ref() else {
            return;
        };
        let start = self.current_page_address().saturating_add(offset);
        if start >= map.len() as u64 {
            return;
        }
        let start = start as usize;
        let count = dst.len().min(map.len() - start);
        dst[..count].copy_from_slice(&map[start..start + count]);
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
