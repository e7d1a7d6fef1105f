use std::ffi::CStr;
use std::os::raw::{c_char, c_void};
use std::sync::Once;

// ggml_log_level values.
const GGML_LOG_LEVEL_DEBUG: u32 = 1;
const GGML_LOG_LEVEL_INFO: u32 = 2;
const GGML_LOG_LEVEL_WARN: u32 = 3;
const GGML_LOG_LEVEL_ERROR: u32 = 4;

/// Forwards one whisper.cpp log line to `tracing` under the `whisper_cpp` target.
unsafe extern "C" fn forward_whisper_log(
    level: u32,
    c_msg: *const c_char,
    _user_data: *mut c_void,
) {
    if c_msg.is_null() {
        return;
    }

    // SAFETY: whisper.cpp passes a NUL-terminated string that lives for the duration of the call.
    let msg = unsafe { CStr::from_ptr(c_msg) }.to_string_lossy();
    let msg = msg.trim_end();
    if msg.is_empty() {
        return;
    }

    match level {
        GGML_LOG_LEVEL_ERROR => tracing::error!(target: "whisper_cpp", "{msg}"),
        GGML_LOG_LEVEL_WARN => tracing::warn!(target: "whisper_cpp", "{msg}"),
        GGML_LOG_LEVEL_INFO => tracing::debug!(target: "whisper_cpp", "{msg}"),
        GGML_LOG_LEVEL_DEBUG => tracing::trace!(target: "whisper_cpp", "{msg}"),
        _ => tracing::trace!(target: "whisper_cpp", level, "{msg}"),
    }
}

/// Route whisper.cpp's logging into `tracing` instead of raw stderr, where it would interleave
/// with the console progress bar. Installed once per process.
pub(super) fn route_whisper_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| unsafe {
        whisper_rs::set_log_callback(Some(forward_whisper_log), std::ptr::null_mut());
    });
}
