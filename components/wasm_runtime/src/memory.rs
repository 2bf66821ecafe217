//! Page-counted linear memory

use tracing::debug;

use crate::error::MemoryError;

/// Bytes per page (64 KiB)
pub const PAGE_SIZE: usize = 65_536;

/// Engine-wide ceiling on the page count
pub const MAX_PAGES: u32 = 65_536;

/// A linear byte buffer measured in 64 KiB pages.
///
/// `grow` only checks the request against the maximum. It never resizes the
/// buffer, so `size()` stays at the initial page count.
///
/// # Examples
///
/// ```
/// use wasm_runtime::Memory;
///
/// let mut memory = Memory::new(1, 2).unwrap();
/// assert_eq!(memory.size(), 1);
/// assert!(memory.grow(1));
/// assert!(!memory.grow(2));
/// assert_eq!(memory.size(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    buffer: Vec<u8>,
    maximum: u32,
}

impl Memory {
    /// Allocate `initial` zeroed pages with a ceiling of `maximum` pages
    pub fn new(initial: u32, maximum: u32) -> Result<Self, MemoryError> {
        if initial > maximum {
            return Err(MemoryError::ExceedsMaximum { initial, maximum });
        }

        let len = (initial as usize)
            .checked_mul(PAGE_SIZE)
            .ok_or(MemoryError::AllocationFailed(initial))?;
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(len)
            .map_err(|_| MemoryError::AllocationFailed(initial))?;
        buffer.resize(len, 0);

        debug!(initial, maximum, "allocated linear memory");
        Ok(Self { buffer, maximum })
    }

    /// Allocate with the engine-wide maximum
    pub fn with_initial(initial: u32) -> Result<Self, MemoryError> {
        Self::new(initial, MAX_PAGES)
    }

    /// Current size in pages
    pub fn size(&self) -> u32 {
        (self.buffer.len() / PAGE_SIZE) as u32
    }

    /// Current size in bytes
    pub fn byte_len(&self) -> usize {
        self.buffer.len()
    }

    /// Maximum page count
    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Check a growth request against the maximum.
    ///
    /// Returns false when `size() + delta` would exceed the maximum. The
    /// buffer is left untouched either way.
    pub fn grow(&mut self, delta: u32) -> bool {
        match self.size().checked_add(delta) {
            Some(pages) if pages <= self.maximum => {
                debug!(delta, pages, "grow accepted");
                true
            }
            _ => false,
        }
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn read(&self, offset: usize, len: usize) -> Result<&[u8], MemoryError> {
        let range = self.checked_range(offset, len)?;
        Ok(&self.buffer[range])
    }

    /// Overwrite bytes starting at `offset`
    pub fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), MemoryError> {
        let range = self.checked_range(offset, bytes.len())?;
        self.buffer[range].copy_from_slice(bytes);
        Ok(())
    }

    /// The whole backing buffer
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    fn checked_range(&self, offset: usize, len: usize) -> Result<std::ops::Range<usize>, MemoryError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.buffer.len() => Ok(offset..end),
            _ => Err(MemoryError::OutOfBounds {
                offset,
                len,
                size: self.buffer.len(),
            }),
        }
    }
}
