// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface that `GlWindow` uses to talk to the OS.
// No `unsafe` lives here; all Win32 FFI is confined to the `win32` sub-module
// and never leaks outward.  Every method is a single OS request; ordering,
// rollback and state tracking belong to `window::GlWindow`.

#[cfg(windows)]
pub mod win32;

#[cfg(test)]
pub(crate) mod recording;

// Only the Win32 backend files events here; tests exercise it everywhere.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) mod registry;

use std::fmt::Debug;

use crate::{
    error::Result,
    gl::{PixelFormat, ProcAddress},
};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// A rectangle in pixels, edges exclusive on the right/bottom (Win32 `RECT`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// A `width`×`height` rectangle anchored at the origin.
    pub fn from_size(width: i32, height: i32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: width,
            bottom: height,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// The same size moved so its top-left corner sits at (`x`, `y`).
    pub fn moved_to(&self, x: i32, y: i32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + self.width(),
            bottom: y + self.height(),
        }
    }
}

// ── Window styling ────────────────────────────────────────────────────────────

/// The two window decorations this crate uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStyle {
    /// Title bar, borders, resizable.
    Windowed,
    /// Borderless popup covering the display.
    Fullscreen,
}

impl WindowStyle {
    pub fn for_fullscreen(fullscreen: bool) -> Self {
        if fullscreen {
            Self::Fullscreen
        } else {
            Self::Windowed
        }
    }
}

/// Where a repositioned window lands in the Z order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    /// Top of the non-topmost windows.
    Top,
    /// Removed from the topmost band.
    NotTopmost,
}

/// A display resolution and colour depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMode {
    pub width: i32,
    pub height: i32,
    pub bits_per_pixel: u32,
    /// `None` leaves the refresh rate to the driver.
    pub refresh_hz: Option<u32>,
}

impl DisplayMode {
    /// A `width`×`height` mode at 32 bpp.
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel: 32,
            refresh_hz: None,
        }
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

/// How a window reached its new size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeKind {
    Restored,
    Minimized,
    Maximized,
}

/// The subset of OS messages forwarded to `GlWindow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The client area changed size.
    Resized {
        width: i32,
        height: i32,
        kind: SizeKind,
    },
    /// The user asked to close the window (close button, Alt+F4).
    CloseRequested,
    /// The window gained (`true`) or lost (`false`) activation.
    Activated(bool),
    /// The thread's message queue received a quit message.
    Quit,
}

// ── Platform trait ────────────────────────────────────────────────────────────

/// One windowing system plus one OpenGL binding.
///
/// Implementations are thread-affine: every method must be called on the
/// thread that created the window.
pub trait Platform {
    /// Top-level window identity.
    type Window: Copy + Eq + Debug;
    /// Drawing surface (device context) tied to a window.
    type Surface: Copy + Eq + Debug;
    /// OpenGL rendering context.
    type Context: Copy + Eq + Debug;

    /// Make the window class available.  Called on every `create`; must be
    /// cheap after the first success.
    fn register_class(&mut self) -> Result<()>;

    /// The mode the primary display is currently using.
    fn current_display_mode(&mut self) -> Result<DisplayMode>;
    /// Switch the primary display to `mode` for exclusive fullscreen.
    fn enter_display_mode(&mut self, mode: &DisplayMode) -> Result<()>;
    /// Return the primary display to its registry default.
    fn restore_display_mode(&mut self);

    /// Outer window rectangle that yields `client` under `style`.
    fn adjust_window_rect(&self, client: Rect, style: WindowStyle) -> Result<Rect>;

    /// Create a hidden top-level window covering `outer`.
    fn create_window(&mut self, title: &str, outer: Rect, style: WindowStyle)
        -> Result<Self::Window>;
    fn destroy_window(&mut self, window: Self::Window);

    fn acquire_surface(&mut self, window: Self::Window) -> Result<Self::Surface>;
    fn release_surface(&mut self, window: Self::Window, surface: Self::Surface);

    /// Index of the closest supported format; zero matches is an error.
    fn choose_pixel_format(&mut self, surface: Self::Surface, format: &PixelFormat)
        -> Result<i32>;
    fn set_pixel_format(&mut self, surface: Self::Surface, index: i32, format: &PixelFormat)
        -> Result<()>;

    fn create_context(&mut self, surface: Self::Surface) -> Result<Self::Context>;
    fn make_current(&mut self, surface: Self::Surface, context: Self::Context) -> Result<()>;
    /// Unbind whatever context is current on this thread.
    fn clear_current(&mut self);
    fn delete_context(&mut self, context: Self::Context);

    /// Address of an OpenGL or WGL function for the current context.
    fn proc_address(&self, name: &str) -> Option<ProcAddress>;
    /// `GL_VERSION` of the current context, `None` when the driver reports
    /// nothing.
    fn gl_version(&self) -> Option<String>;
    /// Request a swap interval.  `false` when the driver lacks the extension.
    fn set_swap_interval(&mut self, interval: i32) -> bool;
    fn swap_buffers(&mut self, surface: Self::Surface) -> Result<()>;

    fn show_window(&mut self, window: Self::Window, visible: bool);
    /// Bring to the foreground and give keyboard focus.
    fn focus_window(&mut self, window: Self::Window);
    fn set_title(&mut self, window: Self::Window, title: &str);
    fn set_window_style(&mut self, window: Self::Window, style: WindowStyle);
    fn set_window_pos(&mut self, window: Self::Window, outer: Rect, z: ZOrder);
    /// Outer rectangle in screen coordinates.
    fn window_rect(&self, window: Self::Window) -> Rect;
    /// Client rectangle in screen coordinates.
    fn client_rect_on_screen(&self, window: Self::Window) -> Rect;

    fn show_cursor(&mut self, visible: bool);
    /// Confine the cursor to `rect`, or release it with `None`.
    fn clip_cursor(&mut self, rect: Option<Rect>);

    /// Drain the message queue without blocking and append the events that
    /// belong to `window` (plus thread-wide ones such as `Quit`) to `out`.
    fn pump_events(&mut self, window: Option<Self::Window>, out: &mut Vec<WindowEvent>);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
