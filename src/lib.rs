// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::win32` – Win32 / WGL FFI
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! One OS window with a hardware-accelerated OpenGL context.
//!
//! [`GlWindow`] hides the Win32/WGL creation ceremony (window class, window,
//! device context, pixel format, context, entry points) behind a small object
//! with setters for title, size, fullscreen, cursor and vsync, a non-blocking
//! message pump, and deterministic teardown.
//!
//! ```no_run
//! # #[cfg(windows)]
//! # fn main() -> glwin::Result<()> {
//! use glwin::{GlWindow, Win32Platform};
//!
//! let mut window = GlWindow::new(Win32Platform::new()?);
//! window.create("Demo", 800, 600, false)?;
//! while window.process_messages() {
//!     // render …
//!     window.swap_buffers()?;
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```

pub mod config;
pub mod error;
pub mod gl;
pub mod platform;
pub mod window;

pub use config::WindowConfig;
pub use error::{GlWinError, Result};
pub use gl::{PixelFormat, ProcAddress, ProcTable};
pub use platform::{Platform, Rect, WindowEvent};
pub use window::GlWindow;

#[cfg(windows)]
pub use platform::win32::Win32Platform;
