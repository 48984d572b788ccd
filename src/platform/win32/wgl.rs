// ── WGL: pixel formats, contexts and entry points ─────────────────────────────

use std::ffi::{c_void, CStr, CString};

use log::{debug, warn};
use windows::{
    core::{s, w, PCSTR},
    Win32::{
        Foundation::{BOOL, HWND, PROC},
        Graphics::{
            Gdi::{GetDC, ReleaseDC, HDC},
            OpenGL::{
                glGetString, wglCreateContext, wglDeleteContext, wglGetProcAddress,
                wglMakeCurrent, ChoosePixelFormat, SetPixelFormat, SwapBuffers, GL_VERSION,
                HGLRC, PFD_DOUBLEBUFFER, PFD_DRAW_TO_WINDOW, PFD_SUPPORT_OPENGL, PFD_TYPE_RGBA,
                PIXELFORMATDESCRIPTOR,
            },
        },
        System::LibraryLoader::{GetModuleHandleW, GetProcAddress},
    },
};

use super::{api_error, last_error};
use crate::{
    error::{GlWinError, Result},
    gl::{PixelFormat, ProcAddress},
};

// ── Device context ────────────────────────────────────────────────────────────

pub(super) fn acquire_dc(hwnd: HWND) -> Result<HDC> {
    // SAFETY: hwnd is a live window created on this thread.
    let hdc = unsafe { GetDC(hwnd) };
    if hdc.is_invalid() {
        return Err(last_error("GetDC"));
    }
    Ok(hdc)
}

pub(super) fn release_dc(hwnd: HWND, hdc: HDC) {
    // SAFETY: hdc was obtained from GetDC(hwnd) and is released exactly once.
    if unsafe { ReleaseDC(hwnd, hdc) } == 0 {
        warn!("ReleaseDC reported the DC was not released");
    }
}

// ── Pixel format ──────────────────────────────────────────────────────────────

fn descriptor(format: &PixelFormat) -> PIXELFORMATDESCRIPTOR {
    let mut flags = PFD_DRAW_TO_WINDOW | PFD_SUPPORT_OPENGL;
    if format.double_buffered {
        flags |= PFD_DOUBLEBUFFER;
    }
    PIXELFORMATDESCRIPTOR {
        // PIXELFORMATDESCRIPTOR is 40 bytes; the cast to u16 is lossless.
        nSize: std::mem::size_of::<PIXELFORMATDESCRIPTOR>() as u16,
        nVersion: 1,
        dwFlags: flags,
        iPixelType: PFD_TYPE_RGBA,
        cColorBits: format.color_bits,
        cDepthBits: format.depth_bits,
        cStencilBits: format.stencil_bits,
        // iLayerType 0 is PFD_MAIN_PLANE.
        ..Default::default()
    }
}

pub(super) fn choose_pixel_format(hdc: HDC, format: &PixelFormat) -> Result<i32> {
    let pfd = descriptor(format);
    // SAFETY: hdc is a live window DC; pfd is fully initialised.
    let index = unsafe { ChoosePixelFormat(hdc, &pfd) };
    if index == 0 {
        return Err(GlWinError::NoPixelFormat);
    }
    Ok(index)
}

pub(super) fn set_pixel_format(hdc: HDC, index: i32, format: &PixelFormat) -> Result<()> {
    let pfd = descriptor(format);
    // SAFETY: index came from ChoosePixelFormat on the same DC.
    unsafe { SetPixelFormat(hdc, index, &pfd) }.map_err(|e| api_error("SetPixelFormat", e))
}

// ── Context ───────────────────────────────────────────────────────────────────

pub(super) fn create_context(hdc: HDC) -> Result<HGLRC> {
    // SAFETY: hdc has a pixel format with PFD_SUPPORT_OPENGL.
    unsafe { wglCreateContext(hdc) }.map_err(|e| api_error("wglCreateContext", e))
}

pub(super) fn make_current(hdc: HDC, hglrc: HGLRC) -> Result<()> {
    // SAFETY: both handles are live and were created on this thread.
    unsafe { wglMakeCurrent(hdc, hglrc) }.map_err(|e| api_error("wglMakeCurrent", e))
}

pub(super) fn clear_current() {
    // SAFETY: null handles unbind the calling thread's current context.
    if let Err(e) = unsafe { wglMakeCurrent(HDC::default(), HGLRC::default()) } {
        warn!("wglMakeCurrent(NULL) failed: {e}");
    }
}

pub(super) fn delete_context(hglrc: HGLRC) {
    // SAFETY: hglrc is no longer current on any thread (clear_current ran).
    if let Err(e) = unsafe { wglDeleteContext(hglrc) } {
        warn!("wglDeleteContext failed: {e}");
    }
}

pub(super) fn swap_buffers(hdc: HDC) -> Result<()> {
    // SAFETY: hdc is the live window DC the current context renders to.
    unsafe { SwapBuffers(hdc) }.map_err(|e| api_error("SwapBuffers", e))
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Address of `name` for the current context.
///
/// Extension and post-1.1 functions come from `wglGetProcAddress`; the 1.1
/// baseline is only exported by opengl32.dll itself.
pub(super) fn proc_address(name: &str) -> Option<ProcAddress> {
    let cname = CString::new(name).ok()?;
    let symbol = PCSTR(cname.as_ptr() as *const u8);

    // SAFETY: cname is a null-terminated ANSI string that outlives both calls;
    // a context is current on this thread.
    let proc = unsafe { wglGetProcAddress(symbol) };
    if let Some(addr) = valid_wgl_proc(proc) {
        return Some(addr);
    }

    // SAFETY: opengl32.dll is already loaded (the wgl* imports link against
    // it); GetModuleHandleW does not add a reference.
    let module = unsafe { GetModuleHandleW(w!("opengl32.dll")) }.ok()?;
    // SAFETY: module is a live module handle; symbol is valid as above.
    let proc = unsafe { GetProcAddress(module, symbol) };
    proc.and_then(|f| ProcAddress::new(f as *mut c_void))
}

/// The current context's `GL_VERSION` string.
pub(super) fn gl_version() -> Option<String> {
    // SAFETY: a context is current on this thread; glGetString returns either
    // null or a static null-terminated string owned by the driver.
    let ptr = unsafe { glGetString(GL_VERSION) };
    if ptr.is_null() {
        return None;
    }
    // SAFETY: non-null and null-terminated as above; copied before returning.
    let version = unsafe { CStr::from_ptr(ptr.cast()) };
    Some(version.to_string_lossy().into_owned())
}

/// Some drivers return small sentinels instead of null on failure.
fn valid_wgl_proc(proc: PROC) -> Option<ProcAddress> {
    let f = proc?;
    let raw = f as usize;
    if matches!(raw, 1 | 2 | 3 | usize::MAX) {
        return None;
    }
    ProcAddress::new(raw as *mut c_void)
}

type SwapIntervalExt = unsafe extern "system" fn(interval: i32) -> BOOL;

/// Resolve `wglSwapIntervalEXT` and request `interval`.
///
/// `false` when the driver does not expose the extension or rejects the value.
pub(super) fn set_swap_interval(interval: i32) -> bool {
    // SAFETY: the literal is null-terminated; a context is current.
    let proc = unsafe { wglGetProcAddress(s!("wglSwapIntervalEXT")) };
    let Some(addr) = valid_wgl_proc(proc) else {
        return false;
    };

    // SAFETY: wglSwapIntervalEXT has the signature BOOL WINAPI (int) per
    // WGL_EXT_swap_control; function and data pointers share a size on Windows.
    let swap_interval: SwapIntervalExt = unsafe { std::mem::transmute(addr.as_ptr()) };
    // SAFETY: called on the thread that owns the current context.
    let ok = unsafe { swap_interval(interval) }.as_bool();
    debug!("wglSwapIntervalEXT({interval}) -> {ok}");
    ok
}
