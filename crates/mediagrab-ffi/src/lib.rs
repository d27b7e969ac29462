//! C ABI entry points for hosts that load mediagrab as a shared library.
//!
//! Every function takes a NUL-terminated UTF-8 string, blocks until done and
//! returns 1 on success or 0 on any failure. Nothing unwinds across the
//! boundary; causes are only reported through the log (stderr).

use mediagrab_core::{config, files, Downloader, DEFAULT_OUTPUT_DIR};
use std::ffi::{c_char, c_int, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

const OK: c_int = 1;
const FAILED: c_int = 0;

/// Download `url` into `./output`. Returns 1 if a file was produced.
///
/// The path is not returned; callers look in the output directory.
///
/// # Safety
///
/// `url` must be null or point to a NUL-terminated string valid for the
/// duration of the call.
#[no_mangle]
pub unsafe extern "C" fn download_video(url: *const c_char) -> c_int {
    guarded("download_video", || {
        let url = arg_str(url, "url")?;
        let cfg = config::load_or_default();
        Downloader::new(&cfg)
            .download(url, Path::new(DEFAULT_OUTPUT_DIR))
            .map(|path| tracing::debug!("download_video produced {}", path.display()))
    })
}

/// Same as [`download_video`]; kept for hosts that resolve this symbol name.
///
/// # Safety
///
/// See [`download_video`].
#[no_mangle]
pub unsafe extern "C" fn download_from_url(url: *const c_char) -> c_int {
    download_video(url)
}

/// Delete the file at `path`. Returns 1 if it existed and was removed.
///
/// # Safety
///
/// `path` must be null or point to a NUL-terminated string valid for the
/// duration of the call.
#[no_mangle]
pub unsafe extern "C" fn delete_file(path: *const c_char) -> c_int {
    guarded("delete_file", || {
        let path = arg_str(path, "path")?;
        files::delete_file(Path::new(path)).then_some(())
    })
}

/// Run `f` with logging initialized, mapping `Some` to 1 and `None` or a panic to 0.
fn guarded<F>(name: &str, f: F) -> c_int
where
    F: FnOnce() -> Option<()>,
{
    mediagrab_core::logging::init_for_embedding();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Some(())) => OK,
        Ok(None) => FAILED,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!("{} panicked: {}", name, msg);
            FAILED
        }
    }
}

/// Borrow a C string argument as UTF-8, logging why it was rejected.
unsafe fn arg_str<'a>(ptr: *const c_char, what: &str) -> Option<&'a str> {
    if ptr.is_null() {
        tracing::error!("{} is null", what);
        return None;
    }
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::error!("{} is not valid UTF-8: {}", what, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr;

    #[test]
    fn null_arguments_fail() {
        unsafe {
            assert_eq!(download_video(ptr::null()), FAILED);
            assert_eq!(download_from_url(ptr::null()), FAILED);
            assert_eq!(delete_file(ptr::null()), FAILED);
        }
    }

    #[test]
    fn invalid_utf8_fails() {
        let bad = CString::new(vec![0xff, 0xfe, b'x']).unwrap();
        unsafe {
            assert_eq!(delete_file(bad.as_ptr()), FAILED);
            assert_eq!(download_video(bad.as_ptr()), FAILED);
        }
    }

    #[test]
    fn unreachable_url_fails() {
        let url = CString::new("http://127.0.0.1:1/x.mp4").unwrap();
        unsafe {
            assert_eq!(download_video(url.as_ptr()), FAILED);
            assert_eq!(download_from_url(url.as_ptr()), FAILED);
        }
        assert!(!Path::new(DEFAULT_OUTPUT_DIR).join("x.mp4").exists());
        // Only succeeds if the run left the directory empty.
        let _ = std::fs::remove_dir(DEFAULT_OUTPUT_DIR);
    }

    #[test]
    fn delete_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"data").unwrap();
        let c_path = CString::new(path.to_str().unwrap()).unwrap();

        unsafe {
            assert_eq!(delete_file(c_path.as_ptr()), OK);
            assert!(!path.exists());
            assert_eq!(delete_file(c_path.as_ptr()), FAILED);
        }
    }

    #[test]
    fn panics_do_not_escape() {
        assert_eq!(guarded("test", || panic!("boom")), FAILED);
        assert_eq!(guarded("test", || Some(())), OK);
        assert_eq!(guarded("test", || None), FAILED);
    }
}
