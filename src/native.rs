//! Ownership of buffers allocated by libwebp.

use alloc::vec::Vec;
use core::ptr::NonNull;

/// An output buffer allocated by libwebp.
///
/// The allocation belongs to this value from the moment the native call
/// returns until it is dropped, and is released with `WebPFree` exactly once.
/// A null output pointer never becomes a `NativeBuffer`, so failure paths that
/// received no allocation have nothing to free.
pub(crate) struct NativeBuffer {
    ptr: NonNull<u8>,
}

impl NativeBuffer {
    /// Take ownership of a pointer returned by libwebp.
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or an allocation made by libwebp that nothing else
    /// will free.
    pub(crate) unsafe fn from_raw(ptr: *mut u8) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr })
    }

    /// Copy the first `len` bytes into an owned `Vec`.
    ///
    /// # Safety
    ///
    /// The allocation must hold at least `len` initialized bytes.
    pub(crate) unsafe fn copy_out(&self, len: usize) -> Vec<u8> {
        // SAFETY: upheld by the caller.
        let slice = unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), len) };
        slice.to_vec()
    }
}

impl Drop for NativeBuffer {
    fn drop(&mut self) {
        // SAFETY: `ptr` came from libwebp through `from_raw`, is owned solely
        // by this value, and is freed nowhere else.
        unsafe {
            libwebp_sys::WebPFree(self.ptr.as_ptr() as *mut _);
        }
    }
}
