// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module in the crate where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

mod display; // exclusive display modes
mod wgl; // pixel formats, contexts, entry points, swap interval
mod window; // class registration, WndProc, geometry, cursor, message pump

pub use window::show_error_dialog;

use log::warn;
use windows::Win32::{
    Foundation::{GetLastError, HINSTANCE, HWND},
    Graphics::{Gdi::HDC, OpenGL::HGLRC},
    System::LibraryLoader::GetModuleHandleW,
};

use super::{DisplayMode, Platform, Rect, WindowEvent, WindowStyle, ZOrder};
use crate::{
    error::{GlWinError, Result},
    gl::{PixelFormat, ProcAddress},
};

// ── Win32Platform ─────────────────────────────────────────────────────────────

/// The Win32 + WGL backend.
///
/// Holds raw Win32 handles and is therefore neither `Send` nor `Sync`; a
/// `GlWindow<Win32Platform>` stays on the thread that built it, which is what
/// both the window message queue and WGL contexts require.
pub struct Win32Platform {
    hinstance: HINSTANCE,
}

impl Win32Platform {
    /// Bind to the executable's own module instance.
    pub fn new() -> Result<Self> {
        // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
        // valid for the process lifetime.
        let hmodule = unsafe { GetModuleHandleW(None) }.map_err(GlWinError::from)?;

        // HINSTANCE and HMODULE carry the same value (Win32 ABI guarantee).
        Ok(Self {
            hinstance: HINSTANCE(hmodule.0),
        })
    }
}

impl Platform for Win32Platform {
    type Window = HWND;
    type Surface = HDC;
    type Context = HGLRC;

    fn register_class(&mut self) -> Result<()> {
        window::register_class(self.hinstance)
    }

    fn current_display_mode(&mut self) -> Result<DisplayMode> {
        display::current_mode()
    }

    fn enter_display_mode(&mut self, mode: &DisplayMode) -> Result<()> {
        display::enter(mode)
    }

    fn restore_display_mode(&mut self) {
        display::restore();
    }

    fn adjust_window_rect(&self, client: Rect, style: WindowStyle) -> Result<Rect> {
        window::adjust_rect(client, style)
    }

    fn create_window(&mut self, title: &str, outer: Rect, style: WindowStyle) -> Result<HWND> {
        window::create(self.hinstance, title, outer, style)
    }

    fn destroy_window(&mut self, window: HWND) {
        window::destroy(window);
    }

    fn acquire_surface(&mut self, window: HWND) -> Result<HDC> {
        wgl::acquire_dc(window)
    }

    fn release_surface(&mut self, window: HWND, surface: HDC) {
        wgl::release_dc(window, surface);
    }

    fn choose_pixel_format(&mut self, surface: HDC, format: &PixelFormat) -> Result<i32> {
        wgl::choose_pixel_format(surface, format)
    }

    fn set_pixel_format(&mut self, surface: HDC, index: i32, format: &PixelFormat) -> Result<()> {
        wgl::set_pixel_format(surface, index, format)
    }

    fn create_context(&mut self, surface: HDC) -> Result<HGLRC> {
        wgl::create_context(surface)
    }

    fn make_current(&mut self, surface: HDC, context: HGLRC) -> Result<()> {
        wgl::make_current(surface, context)
    }

    fn clear_current(&mut self) {
        wgl::clear_current();
    }

    fn delete_context(&mut self, context: HGLRC) {
        wgl::delete_context(context);
    }

    fn proc_address(&self, name: &str) -> Option<ProcAddress> {
        wgl::proc_address(name)
    }

    fn gl_version(&self) -> Option<String> {
        wgl::gl_version()
    }

    fn set_swap_interval(&mut self, interval: i32) -> bool {
        wgl::set_swap_interval(interval)
    }

    fn swap_buffers(&mut self, surface: HDC) -> Result<()> {
        wgl::swap_buffers(surface)
    }

    fn show_window(&mut self, window: HWND, visible: bool) {
        window::show(window, visible);
    }

    fn focus_window(&mut self, window: HWND) {
        window::focus(window);
    }

    fn set_title(&mut self, window: HWND, title: &str) {
        window::set_title(window, title);
    }

    fn set_window_style(&mut self, window: HWND, style: WindowStyle) {
        window::set_style(window, style);
    }

    fn set_window_pos(&mut self, window: HWND, outer: Rect, z: ZOrder) {
        window::set_pos(window, outer, z);
    }

    fn window_rect(&self, window: HWND) -> Rect {
        window::window_rect(window)
    }

    fn client_rect_on_screen(&self, window: HWND) -> Rect {
        window::client_rect_on_screen(window)
    }

    fn show_cursor(&mut self, visible: bool) {
        window::show_cursor(visible);
    }

    fn clip_cursor(&mut self, rect: Option<Rect>) {
        window::clip_cursor(rect);
    }

    fn pump_events(&mut self, window: Option<HWND>, out: &mut Vec<WindowEvent>) {
        window::pump(window, out);
    }
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a `GlWinError`.
///
/// Call immediately after a Win32 function that signals failure; `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
fn last_error(function: &'static str) -> GlWinError {
    GlWinError::Win32 {
        function,
        code: last_error_code(),
    }
}

fn last_error_code() -> u32 {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    unsafe { GetLastError() }.0
}

/// Name a failed windows-crate call.
fn api_error(function: &'static str, e: windows::core::Error) -> GlWinError {
    GlWinError::Win32 {
        function,
        code: e.code().0 as u32,
    }
}

/// Null-terminated UTF-16 copy of `s` for W-suffixed APIs.
///
/// Interior NULs would end the string early, so they are dropped.
fn to_wide(s: &str) -> Vec<u16> {
    if s.contains('\0') {
        warn!("interior NUL removed from {s:?}");
    }
    s.encode_utf16()
        .filter(|&unit| unit != 0)
        .chain(std::iter::once(0))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
