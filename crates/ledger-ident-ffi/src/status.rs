//! Status codes and caller-owned buffers.
//!
//! The callee never writes past a buffer's capacity. A buffer whose capacity
//! is zero (or whose pointer is null) cannot hold any result, not even an
//! empty one, and always reports [`StateCode::DataOverflow`].

use std::ffi::{c_char, CStr};
use std::panic::{self, AssertUnwindSafe};

use crate::error::FfiError;

/// Result of a boundary call.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateCode {
    Ok = 0,
    DataOverflow = -1,
    InternalErr = -2,
    ErrInfoOverflow = -3,
}

impl StateCode {
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// `None` for any value outside the closed set.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Ok),
            -1 => Some(Self::DataOverflow),
            -2 => Some(Self::InternalErr),
            -3 => Some(Self::ErrInfoOverflow),
            _ => None,
        }
    }
}

/// Read a borrowed input byte range.
///
/// Returns an empty slice if `ptr` is null or `len` is 0.
///
/// # Safety
///
/// `ptr` must be valid for `len` bytes for the duration of the call.
pub(crate) unsafe fn read_bytes<'a>(ptr: *const u8, len: u32) -> &'a [u8] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(ptr, len as usize) }
    }
}

/// Read a NUL-terminated UTF-8 input string.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that outlives the
/// call.
pub(crate) unsafe fn read_c_str<'a>(
    ptr: *const c_char,
    what: &'static str,
) -> Result<&'a str, FfiError> {
    if ptr.is_null() {
        return Err(FfiError::NullPointer(what));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| FfiError::InvalidUtf8(what))
}

/// A caller-owned output buffer with its actual-length out-parameter.
pub(crate) struct OutBuffer<'a> {
    buf: &'a mut [u8],
    len: Option<&'a mut u32>,
}

impl<'a> OutBuffer<'a> {
    /// # Safety
    ///
    /// `ptr` must be null or valid for `capacity` bytes of writes; `len` must
    /// be null or valid for one `u32` write.
    pub(crate) unsafe fn new(ptr: *mut u8, len: *mut u32, capacity: u32) -> Self {
        let buf = if ptr.is_null() || capacity == 0 {
            Default::default()
        } else {
            unsafe { std::slice::from_raw_parts_mut(ptr, capacity as usize) }
        };
        Self {
            buf,
            len: unsafe { len.as_mut() },
        }
    }

    /// Check that `needed` bytes fit without writing anything.
    pub(crate) fn ensure_fits(&self, needed: usize) -> Result<(), FfiError> {
        if self.buf.is_empty() || needed > self.buf.len() {
            return Err(FfiError::DataOverflow);
        }
        Ok(())
    }

    /// Commit `data` and its length.
    pub(crate) fn write(self, data: &[u8]) -> Result<(), FfiError> {
        self.ensure_fits(data.len())?;
        self.buf[..data.len()].copy_from_slice(data);
        if let Some(len) = self.len {
            *len = data.len() as u32;
        }
        Ok(())
    }

    /// Commit `text` followed by a NUL byte. The reported length excludes
    /// the terminator.
    pub(crate) fn write_c_str(self, text: &str) -> Result<(), FfiError> {
        let n = text.len();
        self.ensure_fits(n + 1)?;
        self.buf[..n].copy_from_slice(text.as_bytes());
        self.buf[n] = 0;
        if let Some(len) = self.len {
            *len = n as u32;
        }
        Ok(())
    }
}

/// The caller's diagnostic buffer.
pub(crate) struct ErrBuffer<'a> {
    buf: &'a mut [u8],
}

impl<'a> ErrBuffer<'a> {
    /// # Safety
    ///
    /// `ptr` must be null or valid for `capacity` bytes of writes.
    pub(crate) unsafe fn new(ptr: *mut u8, capacity: u32) -> Self {
        let buf = if ptr.is_null() || capacity == 0 {
            Default::default()
        } else {
            unsafe { std::slice::from_raw_parts_mut(ptr, capacity as usize) }
        };
        Self { buf }
    }

    /// For operations that take no diagnostic buffer.
    pub(crate) fn none() -> Self {
        Self {
            buf: Default::default(),
        }
    }

    /// Write the error as a NUL-terminated ASCII diagnostic.
    ///
    /// Returns [`StateCode::ErrInfoOverflow`] and writes nothing when the
    /// message and its terminator do not fit.
    fn report(self, err: &FfiError) -> StateCode {
        let message: String = err
            .to_string()
            .chars()
            .map(|c| if c.is_ascii() && c != '\0' { c } else { '?' })
            .collect();

        if message.len() + 1 > self.buf.len() {
            return StateCode::ErrInfoOverflow;
        }
        self.buf[..message.len()].copy_from_slice(message.as_bytes());
        self.buf[message.len()] = 0;
        StateCode::InternalErr
    }
}

/// Run a boundary operation and translate its outcome into a raw status.
///
/// Panics are caught and reported as [`FfiError::Panic`]; unwinding never
/// crosses the ABI edge. Outputs are undefined after any failure, so a
/// partially written buffer is acceptable.
pub(crate) fn complete<F>(operation: &'static str, err_buf: ErrBuffer<'_>, f: F) -> i32
where
    F: FnOnce() -> Result<(), FfiError>,
{
    let result = match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(FfiError::Panic(message))
        }
    };

    let code = match result {
        Ok(()) => StateCode::Ok,
        Err(err) if err.status_code() == StateCode::DataOverflow => {
            tracing::debug!(operation, "output buffer too small");
            StateCode::DataOverflow
        }
        Err(err) => {
            tracing::warn!(operation, error = %err, "boundary call failed");
            err_buf.report(&err)
        }
    };
    code.as_raw()
}
