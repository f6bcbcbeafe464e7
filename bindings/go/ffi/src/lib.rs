//! C-FFI layer for 3TL - used by Go (cgo) and other FFI consumers.
//!
//! ZERO logic here. All calls delegate to `ttl-core`.
//!
//! # Memory Contract
//!
//! All functions that return `*mut c_char` allocate via `CString`.
//! The caller MUST free the returned string by calling `ttl_free_string()`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Result from a 3TL FFI call.
/// If `error` is null, the call succeeded and `result` contains the output.
/// If `error` is non-null, the call failed and `error` contains the error message.
/// The caller MUST free both `result` and `error` with `ttl_free_string()`.
#[repr(C)]
pub struct TtlResult {
    pub result: *mut c_char,
    pub error: *mut c_char,
}

impl TtlResult {
    fn ok(value: String) -> Self {
        TtlResult {
            result: into_c_string(value),
            error: std::ptr::null_mut(),
        }
    }

    fn err(msg: String) -> Self {
        TtlResult {
            result: std::ptr::null_mut(),
            error: into_c_string(msg),
        }
    }
}

/// Interior NULs cannot cross the C boundary; they are dropped.
fn into_c_string(value: String) -> *mut c_char {
    let value = if value.contains('\0') {
        value.replace('\0', "")
    } else {
        value
    };
    CString::new(value).unwrap_or_default().into_raw()
}

/// Helper: convert a C string pointer to a Rust &str.
/// Returns None if the pointer is null or not valid UTF-8.
unsafe fn cstr_to_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Parse 3TL text and return the document as JSON.
/// `pretty` non-zero selects indented output.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `ttl_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn ttl_parse(text: *const c_char, pretty: i32) -> TtlResult {
    let text = match cstr_to_str(text) {
        Some(s) => s,
        None => return TtlResult::err("null or invalid UTF-8 input".into()),
    };

    match ttl_core::parse(text) {
        Ok(doc) => TtlResult::ok(ttl_core::serialize(&doc, pretty != 0)),
        Err(e) => TtlResult::err(e.to_string()),
    }
}

/// Validate 3TL text.
/// Returns JSON: { "valid": bool, "error": null | { "line", "column", "expected", "found" } }
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `ttl_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn ttl_validate(text: *const c_char) -> TtlResult {
    let text = match cstr_to_str(text) {
        Some(s) => s,
        None => return TtlResult::err("null or invalid UTF-8 input".into()),
    };

    let output = match ttl_core::parse(text) {
        Ok(_) => serde_json::json!({ "valid": true, "error": null }),
        Err(ttl_core::Error::Parse(e)) => serde_json::json!({ "valid": false, "error": e }),
        Err(e) => return TtlResult::err(e.to_string()),
    };

    TtlResult::ok(output.to_string())
}

/// Compute the SHA-256 document hash of 3TL text.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// The caller must free the returned strings with `ttl_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn ttl_document_hash(text: *const c_char) -> TtlResult {
    let text = match cstr_to_str(text) {
        Some(s) => s,
        None => return TtlResult::err("null or invalid UTF-8 input".into()),
    };

    match ttl_core::parse(text) {
        Ok(doc) => TtlResult::ok(ttl_core::document_hash(&doc)),
        Err(e) => TtlResult::err(e.to_string()),
    }
}

/// Free a string previously returned by a 3TL FFI function.
///
/// # Safety
/// `ptr` must be a pointer previously returned by a 3TL FFI function,
/// or null (in which case this is a no-op).
#[no_mangle]
pub unsafe extern "C" fn ttl_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}
