// ── OpenGL surface format & entry-point table ────────────────────────────────
//
// Pure Rust; no Win32 imports.  The platform backend translates `PixelFormat`
// into a PIXELFORMATDESCRIPTOR and supplies raw symbol addresses that
// `ProcTable::load` collects.

use std::{collections::HashMap, ffi::c_void, ptr::NonNull};

use serde::{Deserialize, Serialize};

use crate::error::{GlWinError, Result};

// ── PixelFormat ───────────────────────────────────────────────────────────────

/// The surface format requested from the driver.
///
/// The driver picks the closest format it supports, so these are lower bounds
/// rather than exact values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelFormat {
    pub color_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
    pub double_buffered: bool,
}

impl Default for PixelFormat {
    /// Double-buffered RGBA, 32-bit colour, 24-bit depth, 8-bit stencil.
    fn default() -> Self {
        Self {
            color_bits: 32,
            depth_bits: 24,
            stencil_bits: 8,
            double_buffered: true,
        }
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// The only entry point `create` insists on.  Every context, down to the
/// GDI software renderer, exports it, and it is how the version is read.
pub const REQUIRED_ENTRY_POINTS: &[&str] = &["glGetString"];

/// Resolved up front when present; absence is not an error.  Anything not
/// listed here is looked up on demand through `GlWindow::proc_address`.
pub const OPTIONAL_ENTRY_POINTS: &[&str] = &[
    // 1.1 baseline, exported by opengl32.dll itself
    "glGetIntegerv",
    "glViewport",
    "glClear",
    "glClearColor",
    "glEnable",
    "glDisable",
    "glDrawArrays",
    "glDrawElements",
    "glGenTextures",
    "glDeleteTextures",
    "glBindTexture",
    "glTexImage2D",
    "glTexParameteri",
    // buffers
    "glGenBuffers",
    "glDeleteBuffers",
    "glBindBuffer",
    "glBufferData",
    "glBufferSubData",
    // shaders & programs
    "glCreateShader",
    "glDeleteShader",
    "glShaderSource",
    "glCompileShader",
    "glGetShaderiv",
    "glGetShaderInfoLog",
    "glCreateProgram",
    "glDeleteProgram",
    "glAttachShader",
    "glLinkProgram",
    "glGetProgramiv",
    "glGetProgramInfoLog",
    "glUseProgram",
    "glGetUniformLocation",
    "glUniform1i",
    "glUniform1f",
    "glUniform4fv",
    "glUniformMatrix4fv",
    // vertex arrays
    "glGenVertexArrays",
    "glDeleteVertexArrays",
    "glBindVertexArray",
    "glVertexAttribPointer",
    "glEnableVertexAttribArray",
    "glActiveTexture",
    "glGenerateMipmap",
    // framebuffers & debug output
    "glGenFramebuffers",
    "glBindFramebuffer",
    "glFramebufferTexture2D",
    "glCheckFramebufferStatus",
    "glDeleteFramebuffers",
    "glDebugMessageCallback",
    // WGL extensions
    "wglSwapIntervalEXT",
    "wglGetExtensionsStringARB",
];

/// Names every OpenGL 1.1 implementation exports.
pub const GL11_BASELINE: &[&str] = &[
    "glGetString",
    "glGetIntegerv",
    "glViewport",
    "glClear",
    "glClearColor",
    "glEnable",
    "glDisable",
    "glDrawArrays",
    "glDrawElements",
    "glGenTextures",
    "glDeleteTextures",
    "glBindTexture",
    "glTexImage2D",
    "glTexParameteri",
];

/// Address of a resolved OpenGL function.
///
/// Callers transmute it to the matching `extern "system" fn` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcAddress(NonNull<c_void>);

impl ProcAddress {
    /// `None` for a null address.
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *const c_void {
        self.0.as_ptr()
    }
}

/// The resolved function-pointer table for the current context.
#[derive(Debug, Default)]
pub struct ProcTable {
    entries: HashMap<&'static str, ProcAddress>,
}

impl ProcTable {
    /// An empty table, as held by a window without a context.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve every required and optional entry point through `resolve`.
    ///
    /// Fails on the first required name that resolves to nothing.
    pub fn load<F>(mut resolve: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<ProcAddress>,
    {
        let mut entries = HashMap::with_capacity(
            REQUIRED_ENTRY_POINTS.len() + OPTIONAL_ENTRY_POINTS.len(),
        );

        for &name in REQUIRED_ENTRY_POINTS {
            let addr = resolve(name).ok_or(GlWinError::MissingEntryPoint(name))?;
            entries.insert(name, addr);
        }

        for &name in OPTIONAL_ENTRY_POINTS {
            match resolve(name) {
                Some(addr) => {
                    entries.insert(name, addr);
                }
                None => log::debug!("optional entry point {name} not available"),
            }
        }

        log::debug!("resolved {} OpenGL entry points", entries.len());
        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<ProcAddress> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
