//! Executable memory regions
//!
//! Code is copied into a fresh anonymous mapping while it is writable, then
//! the mapping is switched to read+execute. A region is never writable and
//! executable at the same time, and is unmapped exactly once on drop.

use std::ptr::NonNull;

use tracing::debug;

use crate::error::{CodegenError, CodegenResult};

/// An owned, read+execute mapping holding machine code
#[derive(Debug)]
pub struct ExecutableRegion {
    ptr: NonNull<u8>,
    mapped_len: usize,
    code_len: usize,
}

// SAFETY: after construction the mapping is read+execute only and never
// written again, so sharing the pointer across threads cannot race.
unsafe impl Send for ExecutableRegion {}
unsafe impl Sync for ExecutableRegion {}

impl ExecutableRegion {
    /// Map `code` into executable memory
    #[cfg(unix)]
    pub fn new(code: &[u8]) -> CodegenResult<Self> {
        use std::io;

        if code.is_empty() {
            return Err(CodegenError::EmptyCode);
        }

        let mapped_len = round_to_page(code.len());

        // SAFETY: anonymous private mapping with no address hint; the result
        // is checked against MAP_FAILED before use.
        let raw = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                mapped_len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if raw == libc::MAP_FAILED {
            return Err(CodegenError::Allocation(io::Error::last_os_error()));
        }
        let ptr = NonNull::new(raw.cast::<u8>())
            .ok_or_else(|| CodegenError::Allocation(io::Error::from(io::ErrorKind::OutOfMemory)))?;

        // SAFETY: the mapping is at least code.len() bytes and writable; the
        // source slice cannot overlap a mapping we just created.
        unsafe {
            std::ptr::copy_nonoverlapping(code.as_ptr(), ptr.as_ptr(), code.len());
        }

        // SAFETY: ptr/mapped_len describe exactly the mapping created above.
        let rc = unsafe { libc::mprotect(raw, mapped_len, libc::PROT_READ | libc::PROT_EXEC) };
        if rc != 0 {
            let err = io::Error::last_os_error();
            // SAFETY: same mapping, not yet handed out.
            unsafe {
                libc::munmap(raw, mapped_len);
            }
            return Err(CodegenError::Protection(err));
        }

        debug!(code_len = code.len(), mapped_len, "mapped executable region");
        Ok(Self {
            ptr,
            mapped_len,
            code_len: code.len(),
        })
    }

    /// Executable memory is only available on unix hosts
    #[cfg(not(unix))]
    pub fn new(code: &[u8]) -> CodegenResult<Self> {
        if code.is_empty() {
            return Err(CodegenError::EmptyCode);
        }
        Err(CodegenError::UnsupportedTarget)
    }

    /// Start of the code
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Length of the copied code
    pub fn code_len(&self) -> usize {
        self.code_len
    }

    /// Length of the whole mapping (page multiple)
    pub fn mapped_len(&self) -> usize {
        self.mapped_len
    }

    /// The copied code bytes
    pub fn code(&self) -> &[u8] {
        // SAFETY: the mapping is readable and holds code_len initialised bytes
        // for as long as self lives.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.code_len) }
    }
}

impl Drop for ExecutableRegion {
    fn drop(&mut self) {
        // SAFETY: ptr/mapped_len came from a successful mmap in `new` and are
        // unmapped only here.
        #[cfg(unix)]
        let _ = unsafe { libc::munmap(self.ptr.as_ptr().cast(), self.mapped_len) };
    }
}

#[cfg(unix)]
fn page_size() -> usize {
    // SAFETY: sysconf has no preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as usize
    } else {
        4096
    }
}

#[cfg(unix)]
fn round_to_page(len: usize) -> usize {
    let page = page_size();
    len.div_ceil(page) * page
}
