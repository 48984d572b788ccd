// ── Recording platform (tests only) ───────────────────────────────────────────
//
// An in-memory `Platform` that logs every request, simulates window geometry
// and display modes, and can be told to fail at any acquisition step.  Handles
// are small integers; a handle is "live" from its create call to its release.

use std::collections::HashSet;

use super::{DisplayMode, Platform, Rect, WindowEvent, WindowStyle, ZOrder};
use crate::{
    error::{GlWinError, Result},
    gl::{PixelFormat, ProcAddress},
};

/// Border thickness added on the left, right and bottom of a windowed frame.
pub(crate) const FRAME: i32 = 8;
/// Title bar height added above a windowed client area.
pub(crate) const CAPTION: i32 = 31;

/// One observed platform request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    RegisterClass,
    CurrentDisplayMode,
    EnterDisplayMode(DisplayMode),
    RestoreDisplayMode,
    CreateWindow { title: String, outer: Rect, style: WindowStyle },
    DestroyWindow(u32),
    AcquireSurface(u32),
    ReleaseSurface(u32),
    ChoosePixelFormat(PixelFormat),
    SetPixelFormat(i32),
    CreateContext(u32),
    MakeCurrent(u32),
    ClearCurrent,
    DeleteContext(u32),
    SwapInterval(i32),
    SwapBuffers(u32),
    ShowWindow(bool),
    FocusWindow,
    SetTitle(String),
    SetWindowStyle(WindowStyle),
    SetWindowPos(Rect, ZOrder),
    ShowCursor(bool),
    ClipCursor(Option<Rect>),
}

/// Acquisition steps that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailAt {
    RegisterClass,
    EnterDisplayMode,
    CreateWindow,
    AcquireSurface,
    ChoosePixelFormat,
    SetPixelFormat,
    CreateContext,
    MakeCurrent,
}

pub(crate) struct RecordingPlatform {
    pub(crate) calls: Vec<Call>,
    pub(crate) fail_at: Option<FailAt>,
    /// An entry point to report as missing.
    pub(crate) missing_proc: Option<&'static str>,
    /// When set, only these names resolve.
    pub(crate) exported_procs: Option<&'static [&'static str]>,
    /// Returned by `gl_version`.
    pub(crate) version: Option<String>,
    pub(crate) swap_interval_supported: bool,
    /// The desktop mode reported by `current_display_mode`.
    pub(crate) desktop: DisplayMode,
    /// Events delivered on the next `pump_events`.
    pub(crate) pending: Vec<WindowEvent>,
    /// Outer rect of the live window, in screen coordinates.
    pub(crate) window_rect: Rect,
    next_id: u32,
    live: HashSet<u32>,
}

impl RecordingPlatform {
    pub(crate) fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail_at: None,
            missing_proc: None,
            exported_procs: None,
            version: Some("4.6.0 Recording".to_owned()),
            swap_interval_supported: true,
            desktop: DisplayMode {
                width: 1920,
                height: 1080,
                bits_per_pixel: 32,
                refresh_hz: Some(60),
            },
            pending: Vec::new(),
            window_rect: Rect::default(),
            next_id: 1,
            live: HashSet::new(),
        }
    }

    /// Number of handles (windows, surfaces, contexts) not yet released.
    pub(crate) fn live_handles(&self) -> usize {
        self.live.len()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|&c| pred(c)).count()
    }

    pub(crate) fn display_mode_calls(&self) -> usize {
        self.count(|c| {
            matches!(
                c,
                Call::CurrentDisplayMode | Call::EnterDisplayMode(_) | Call::RestoreDisplayMode
            )
        })
    }

    fn alloc(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id);
        id
    }

    fn check(&self, step: FailAt, function: &'static str) -> Result<()> {
        if self.fail_at == Some(step) {
            return Err(GlWinError::Win32 { function, code: 5 });
        }
        Ok(())
    }
}

impl Platform for RecordingPlatform {
    type Window = u32;
    type Surface = u32;
    type Context = u32;

    fn register_class(&mut self) -> Result<()> {
        self.calls.push(Call::RegisterClass);
        self.check(FailAt::RegisterClass, "RegisterClassExW")
    }

    fn current_display_mode(&mut self) -> Result<DisplayMode> {
        self.calls.push(Call::CurrentDisplayMode);
        Ok(self.desktop)
    }

    fn enter_display_mode(&mut self, mode: &DisplayMode) -> Result<()> {
        self.calls.push(Call::EnterDisplayMode(*mode));
        if self.fail_at == Some(FailAt::EnterDisplayMode) {
            return Err(GlWinError::DisplayMode {
                width: mode.width,
                height: mode.height,
                code: -2,
            });
        }
        Ok(())
    }

    fn restore_display_mode(&mut self) {
        self.calls.push(Call::RestoreDisplayMode);
    }

    fn adjust_window_rect(&self, client: Rect, style: WindowStyle) -> Result<Rect> {
        Ok(match style {
            WindowStyle::Fullscreen => client,
            WindowStyle::Windowed => Rect {
                left: client.left - FRAME,
                top: client.top - CAPTION,
                right: client.right + FRAME,
                bottom: client.bottom + FRAME,
            },
        })
    }

    fn create_window(&mut self, title: &str, outer: Rect, style: WindowStyle) -> Result<u32> {
        self.calls.push(Call::CreateWindow {
            title: title.to_owned(),
            outer,
            style,
        });
        self.check(FailAt::CreateWindow, "CreateWindowExW")?;
        self.window_rect = outer;
        Ok(self.alloc())
    }

    fn destroy_window(&mut self, window: u32) {
        self.calls.push(Call::DestroyWindow(window));
        self.live.remove(&window);
    }

    fn acquire_surface(&mut self, window: u32) -> Result<u32> {
        self.calls.push(Call::AcquireSurface(window));
        self.check(FailAt::AcquireSurface, "GetDC")?;
        Ok(self.alloc())
    }

    fn release_surface(&mut self, _window: u32, surface: u32) {
        self.calls.push(Call::ReleaseSurface(surface));
        self.live.remove(&surface);
    }

    fn choose_pixel_format(&mut self, _surface: u32, format: &PixelFormat) -> Result<i32> {
        self.calls.push(Call::ChoosePixelFormat(*format));
        if self.fail_at == Some(FailAt::ChoosePixelFormat) {
            return Err(GlWinError::NoPixelFormat);
        }
        Ok(7)
    }

    fn set_pixel_format(&mut self, _surface: u32, index: i32, _format: &PixelFormat) -> Result<()> {
        self.calls.push(Call::SetPixelFormat(index));
        self.check(FailAt::SetPixelFormat, "SetPixelFormat")
    }

    fn create_context(&mut self, surface: u32) -> Result<u32> {
        self.calls.push(Call::CreateContext(surface));
        self.check(FailAt::CreateContext, "wglCreateContext")?;
        Ok(self.alloc())
    }

    fn make_current(&mut self, _surface: u32, context: u32) -> Result<()> {
        self.calls.push(Call::MakeCurrent(context));
        self.check(FailAt::MakeCurrent, "wglMakeCurrent")
    }

    fn clear_current(&mut self) {
        self.calls.push(Call::ClearCurrent);
    }

    fn delete_context(&mut self, context: u32) {
        self.calls.push(Call::DeleteContext(context));
        self.live.remove(&context);
    }

    fn proc_address(&self, name: &str) -> Option<ProcAddress> {
        if self.missing_proc == Some(name) {
            return None;
        }
        if name == "wglSwapIntervalEXT" && !self.swap_interval_supported {
            return None;
        }
        if let Some(exported) = self.exported_procs {
            if !exported.contains(&name) {
                return None;
            }
        }
        ProcAddress::new(0x1000 as *mut std::ffi::c_void)
    }

    fn gl_version(&self) -> Option<String> {
        self.version.clone()
    }

    fn set_swap_interval(&mut self, interval: i32) -> bool {
        self.calls.push(Call::SwapInterval(interval));
        self.swap_interval_supported
    }

    fn swap_buffers(&mut self, surface: u32) -> Result<()> {
        self.calls.push(Call::SwapBuffers(surface));
        Ok(())
    }

    fn show_window(&mut self, _window: u32, visible: bool) {
        self.calls.push(Call::ShowWindow(visible));
    }

    fn focus_window(&mut self, _window: u32) {
        self.calls.push(Call::FocusWindow);
    }

    fn set_title(&mut self, _window: u32, title: &str) {
        self.calls.push(Call::SetTitle(title.to_owned()));
    }

    fn set_window_style(&mut self, _window: u32, style: WindowStyle) {
        self.calls.push(Call::SetWindowStyle(style));
    }

    fn set_window_pos(&mut self, _window: u32, outer: Rect, z: ZOrder) {
        self.calls.push(Call::SetWindowPos(outer, z));
        self.window_rect = outer;
    }

    fn window_rect(&self, _window: u32) -> Rect {
        self.window_rect
    }

    fn client_rect_on_screen(&self, _window: u32) -> Rect {
        Rect {
            left: self.window_rect.left + FRAME,
            top: self.window_rect.top + CAPTION,
            right: self.window_rect.right - FRAME,
            bottom: self.window_rect.bottom - FRAME,
        }
    }

    fn show_cursor(&mut self, visible: bool) {
        self.calls.push(Call::ShowCursor(visible));
    }

    fn clip_cursor(&mut self, rect: Option<Rect>) {
        self.calls.push(Call::ClipCursor(rect));
    }

    fn pump_events(&mut self, _window: Option<u32>, out: &mut Vec<WindowEvent>) {
        out.append(&mut self.pending);
    }
}
