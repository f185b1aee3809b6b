//! C ABI for principal derivation and textual conversion.
//!
//! Principal bytes are written to `out_arr` (capacity `arr_size`) with the
//! actual length in `out_arr_len`.

use std::ffi::c_char;

use ledger_ident_core::Principal;

use crate::status::{complete, read_bytes, read_c_str, ErrBuffer, OutBuffer};

/// Write the management canister principal (empty bytes).
///
/// # Safety
///
/// `out_arr` must be valid for `arr_size` bytes; `out_arr_len` for one `u32`.
#[no_mangle]
pub unsafe extern "C" fn principal_management_canister(
    out_arr: *mut u8,
    out_arr_len: *mut u32,
    arr_size: u32,
) -> i32 {
    let out = unsafe { OutBuffer::new(out_arr, out_arr_len, arr_size) };
    complete("principal_management_canister", ErrBuffer::none(), || {
        out.write(Principal::management_canister().as_slice())
    })
}

/// Write the self-authenticating principal of `public_key`.
///
/// # Safety
///
/// Output pointers as for [`principal_management_canister`]; `public_key`
/// must be valid for `public_key_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn principal_self_authenticating(
    out_arr: *mut u8,
    out_arr_len: *mut u32,
    arr_size: u32,
    public_key: *const u8,
    public_key_size: u32,
) -> i32 {
    let out = unsafe { OutBuffer::new(out_arr, out_arr_len, arr_size) };
    let public_key = unsafe { read_bytes(public_key, public_key_size) };
    complete("principal_self_authenticating", ErrBuffer::none(), || {
        out.write(Principal::self_authenticating(public_key).as_slice())
    })
}

/// Write the anonymous principal (`0x04`).
///
/// # Safety
///
/// As for [`principal_management_canister`].
#[no_mangle]
pub unsafe extern "C" fn principal_anonymous(
    out_arr: *mut u8,
    out_arr_len: *mut u32,
    arr_size: u32,
) -> i32 {
    let out = unsafe { OutBuffer::new(out_arr, out_arr_len, arr_size) };
    complete("principal_anonymous", ErrBuffer::none(), || {
        out.write(Principal::anonymous().as_slice())
    })
}

/// Validate `bytes` as a principal and copy them out.
///
/// # Safety
///
/// `bytes` must be valid for `bytes_size` bytes, `out_err_info` for
/// `err_info_size` bytes; outputs as for [`principal_management_canister`].
#[no_mangle]
pub unsafe extern "C" fn principal_from_bytes(
    bytes: *const u8,
    bytes_size: u32,
    out_arr: *mut u8,
    out_arr_len: *mut u32,
    arr_size: u32,
    out_err_info: *mut u8,
    err_info_size: u32,
) -> i32 {
    let bytes = unsafe { read_bytes(bytes, bytes_size) };
    let out = unsafe { OutBuffer::new(out_arr, out_arr_len, arr_size) };
    let err = unsafe { ErrBuffer::new(out_err_info, err_info_size) };
    complete("principal_from_bytes", err, || {
        let principal = Principal::try_from_slice(bytes)?;
        out.write(principal.as_slice())
    })
}

/// Parse the textual form of a principal.
///
/// # Safety
///
/// `text` must be a NUL-terminated string; other pointers as for
/// [`principal_from_bytes`].
#[no_mangle]
pub unsafe extern "C" fn principal_from_text(
    text: *const c_char,
    out_arr: *mut u8,
    out_arr_len: *mut u32,
    arr_size: u32,
    out_err_info: *mut u8,
    err_info_size: u32,
) -> i32 {
    let out = unsafe { OutBuffer::new(out_arr, out_arr_len, arr_size) };
    let err = unsafe { ErrBuffer::new(out_err_info, err_info_size) };
    complete("principal_from_text", err, || {
        let text = unsafe { read_c_str(text, "text") }?;
        let principal = Principal::from_text(text)?;
        out.write(principal.as_slice())
    })
}

/// Render `bytes` as NUL-terminated principal text.
///
/// `out_text_len` receives the length without the terminator, so the text
/// needs `len + 1` bytes of capacity.
///
/// # Safety
///
/// `bytes` must be valid for `bytes_size` bytes, `out_text` for `text_size`
/// bytes, `out_text_len` for one `u32`, `out_err_info` for `err_info_size`.
#[no_mangle]
pub unsafe extern "C" fn principal_to_text(
    bytes: *const u8,
    bytes_size: u32,
    out_text: *mut u8,
    out_text_len: *mut u32,
    text_size: u32,
    out_err_info: *mut u8,
    err_info_size: u32,
) -> i32 {
    let bytes = unsafe { read_bytes(bytes, bytes_size) };
    let out = unsafe { OutBuffer::new(out_text, out_text_len, text_size) };
    let err = unsafe { ErrBuffer::new(out_err_info, err_info_size) };
    complete("principal_to_text", err, || {
        let principal = Principal::try_from_slice(bytes)?;
        out.write_c_str(&principal.to_text())
    })
}
