//! Caller side of the buffer/status protocol.
//!
//! The caller allocates every output at its configured capacity, hands the
//! callee raw pointers, then translates the raw status into a [`Result`].
//! Anything the callee returns that the protocol does not allow (an unknown
//! status, a length past capacity, a diagnostic without terminator) is a
//! contract breach and panics.

use std::fmt::Display;

use ledger_ident_ffi::StateCode;

use crate::error::{Error, Result};

/// Log and panic on a contract breach by the callee.
pub(crate) fn protocol_violation(operation: &'static str, detail: impl Display) -> ! {
    tracing::error!(operation, %detail, "boundary protocol violation");
    panic!("boundary protocol violation in {operation}: {detail}");
}

/// A caller-owned output buffer and its actual-length out-parameter.
pub(crate) struct Output {
    name: &'static str,
    buf: Vec<u8>,
    len: u32,
}

impl Output {
    pub(crate) fn new(name: &'static str, capacity: u32) -> Self {
        Self {
            name,
            buf: vec![0; capacity as usize],
            len: 0,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn ptr(&mut self) -> *mut u8 {
        self.buf.as_mut_ptr()
    }

    pub(crate) fn len_ptr(&mut self) -> *mut u32 {
        &mut self.len
    }

    pub(crate) fn capacity(&self) -> u32 {
        self.buf.len() as u32
    }

    /// The bytes the callee committed.
    pub(crate) fn into_bytes(mut self, operation: &'static str) -> Vec<u8> {
        let len = self.len as usize;
        if len > self.buf.len() {
            protocol_violation(
                operation,
                format_args!(
                    "{} length {len} exceeds capacity {}",
                    self.name,
                    self.buf.len()
                ),
            );
        }
        self.buf.truncate(len);
        self.buf
    }

    /// The NUL-terminated text the callee committed. The reported length
    /// excludes the terminator.
    pub(crate) fn into_text(self, operation: &'static str) -> String {
        let len = self.len as usize;
        if len >= self.buf.len() || self.buf[len] != 0 {
            protocol_violation(
                operation,
                format_args!("{} is not NUL-terminated within capacity", self.name),
            );
        }
        let bytes = self.into_bytes(operation);
        match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => protocol_violation(operation, "text is not UTF-8"),
        }
    }
}

/// The caller-owned diagnostic buffer.
pub(crate) struct Diagnostic {
    buf: Vec<u8>,
}

impl Diagnostic {
    pub(crate) fn new(capacity: u32) -> Self {
        Self {
            buf: vec![0; capacity as usize],
        }
    }

    pub(crate) fn ptr(&mut self) -> *mut u8 {
        self.buf.as_mut_ptr()
    }

    pub(crate) fn capacity(&self) -> u32 {
        self.buf.len() as u32
    }

    /// Decode up to the first NUL.
    fn message(&self, operation: &'static str) -> String {
        match self.buf.iter().position(|&b| b == 0) {
            Some(end) => String::from_utf8_lossy(&self.buf[..end]).into_owned(),
            None => protocol_violation(operation, "diagnostic is not NUL-terminated"),
        }
    }
}

/// Translate a raw status into a [`Result`].
///
/// `output` names the buffer reported on overflow. `diagnostic` is `None` for
/// operations that take no diagnostic buffer, where an
/// [`StateCode::InternalErr`] cannot legally occur.
pub(crate) fn translate(
    operation: &'static str,
    output: &'static str,
    raw: i32,
    diagnostic: Option<&Diagnostic>,
) -> Result<()> {
    match StateCode::from_raw(raw) {
        Some(StateCode::Ok) => Ok(()),
        Some(StateCode::DataOverflow) => {
            tracing::debug!(operation, output, "output overflowed its capacity");
            Err(Error::DataOverflow { operation, output })
        }
        Some(StateCode::InternalErr) => {
            let Some(diagnostic) = diagnostic else {
                protocol_violation(operation, "diagnostic reported without a buffer");
            };
            let message = diagnostic.message(operation);
            tracing::warn!(operation, %message, "callee reported failure");
            Err(Error::Internal { operation, message })
        }
        Some(StateCode::ErrInfoOverflow) => {
            tracing::warn!(operation, "callee reported failure, diagnostic omitted");
            Err(Error::ErrInfoOverflow { operation })
        }
        None => protocol_violation(operation, format_args!("unknown status code {raw}")),
    }
}
