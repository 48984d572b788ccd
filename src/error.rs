// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in glwin return `error::Result<T>`.  Nothing in the
// library terminates the process; the owning application decides what to do
// with a failed `create` (the demo binary shows a dialog and exits).

/// Every error that glwin can produce.
#[derive(Debug)]
pub enum GlWinError {
    /// A Win32 / WGL API call returned a failure code.
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// `ChangeDisplaySettingsW` rejected the requested exclusive mode.
    DisplayMode {
        width: i32,
        height: i32,
        /// The `DISP_CHANGE_*` result.
        code: i32,
    },

    /// The driver offered no pixel format close to the requested one.
    NoPixelFormat,

    /// A required OpenGL entry point could not be resolved.
    MissingEntryPoint(&'static str),

    /// The context was created but `glGetString(GL_VERSION)` returned nothing.
    NoVersion,

    /// A window was requested with a zero or negative client dimension.
    InvalidSize { width: i32, height: i32 },

    /// The operation needs a created window.
    NotCreated,

    /// No windowing backend exists for the build target.
    Unsupported,

    /// A standard I/O error (reading or writing a config file).
    Io(std::io::Error),

    /// A window config file could not be parsed or serialised.
    Config(serde_json::Error),
}

impl std::fmt::Display for GlWinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
            Self::DisplayMode {
                width,
                height,
                code,
            } => write!(
                f,
                "the display mode {width}x{height} (32 bpp) is not supported by \
                 this video card (result {code})"
            ),
            Self::NoPixelFormat => write!(f, "no suitable pixel format was found"),
            Self::MissingEntryPoint(name) => {
                write!(f, "OpenGL entry point `{name}` could not be loaded")
            }
            Self::NoVersion => write!(f, "the OpenGL context did not report a version"),
            Self::InvalidSize { width, height } => {
                write!(f, "invalid client size {width}x{height}")
            }
            Self::NotCreated => write!(f, "the window has not been created"),
            Self::Unsupported => write!(f, "no window backend for this platform"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(e) => write!(f, "invalid window config: {e}"),
        }
    }
}

impl std::error::Error for GlWinError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GlWinError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for GlWinError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e)
    }
}

// Convert a windows-crate error (HRESULT) directly into a GlWinError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for GlWinError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GlWinError>;

// ── Tests ─────────────────────────────────────────────────────────────────────
