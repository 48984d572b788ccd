// ── Top-level window ──────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the window class once per process.
//   • Create / destroy the top-level window and restyle / move it.
//   • Cursor visibility and confinement.
//   • Drain the message queue and file WM_SIZE / WM_CLOSE / WM_ACTIVATE as
//     `WindowEvent`s in the per-thread registry.
//   • Expose a safe error-dialog helper for use by the binary.

use std::{cell::RefCell, sync::OnceLock};

use log::{debug, warn};
use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{BOOL, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM},
        Graphics::Gdi::{ClientToScreen, GetStockObject, BLACK_BRUSH, HBRUSH},
        UI::{
            Input::KeyboardAndMouse::SetFocus,
            WindowsAndMessaging::{
                AdjustWindowRectEx, ClipCursor, CreateWindowExW, DefWindowProcW, DestroyWindow,
                DispatchMessageW, GetClientRect, GetWindowRect, IsWindowVisible, LoadCursorW,
                LoadIconW, MessageBoxW, PeekMessageW, RegisterClassExW, SetForegroundWindow,
                SetWindowLongPtrW, SetWindowPos, SetWindowTextW, ShowCursor, ShowWindow,
                TranslateMessage, CS_HREDRAW, CS_OWNDC, CS_VREDRAW, GWL_EXSTYLE, GWL_STYLE,
                HMENU, HWND_NOTOPMOST, HWND_TOP, IDC_ARROW, IDI_WINLOGO, MB_ICONERROR, MB_OK, MSG,
                PM_REMOVE, SWP_FRAMECHANGED, SW_HIDE, SW_SHOW, WINDOW_EX_STYLE, WINDOW_STYLE,
                WM_ACTIVATE, WM_CLOSE, WM_QUIT, WM_SIZE, WNDCLASSEXW, WS_CLIPCHILDREN,
                WS_CLIPSIBLINGS, WS_EX_APPWINDOW, WS_EX_WINDOWEDGE, WS_OVERLAPPEDWINDOW,
                WS_POPUP, WS_VISIBLE,
            },
        },
    },
};

use super::{api_error, last_error_code, to_wide};
use crate::{
    error::{GlWinError, Result},
    platform::{
        registry::{activate_event, size_event, EventRegistry},
        Rect, WindowEvent, WindowStyle, ZOrder,
    },
};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register (and later find) the window class.
const CLASS_NAME: PCWSTR = w!("GlWinWindow");

/// Outcome of the one registration attempt: `Err` holds the Win32 error code.
static CLASS_REGISTRATION: OnceLock<std::result::Result<(), u32>> = OnceLock::new();

thread_local! {
    /// Events filed by `wnd_proc` for windows created on this thread.
    static EVENTS: RefCell<EventRegistry> = RefCell::new(EventRegistry::new());
}

fn key(hwnd: HWND) -> isize {
    hwnd.0 as isize
}

// ── Class registration ────────────────────────────────────────────────────────

/// Register the window class on first use; later calls report the cached
/// outcome without touching the OS.
pub(super) fn register_class(hinstance: HINSTANCE) -> Result<()> {
    let outcome = *CLASS_REGISTRATION.get_or_init(|| register_class_once(hinstance));
    outcome.map_err(|code| GlWinError::Win32 {
        function: "RegisterClassExW",
        code,
    })
}

fn register_class_once(hinstance: HINSTANCE) -> std::result::Result<(), u32> {
    let code = |e: windows::core::Error| e.code().0 as u32;

    // SAFETY: IDI_WINLOGO and IDC_ARROW are built-in resources that exist on
    // every Windows version.
    let icon = unsafe { LoadIconW(None, IDI_WINLOGO) }.map_err(code)?;
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(code)?;

    // SAFETY: GetStockObject with BLACK_BRUSH always returns a valid HGDIOBJ.
    // Casting to HBRUSH is correct: stock brush objects are compatible types.
    let bg_brush = unsafe { HBRUSH(GetStockObject(BLACK_BRUSH).0) };

    let wndclass = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        // Repaint on resize in both axes; a private DC per window, which the
        // pixel format is bound to.
        style: CS_HREDRAW | CS_VREDRAW | CS_OWNDC,
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        hbrBackground: bg_brush,
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
    };

    // SAFETY: wndclass is fully initialised with valid handles;
    // CLASS_NAME is a valid null-terminated UTF-16 string literal.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error_code());
    }

    debug!("window class registered");
    Ok(())
}

// ── Styles & geometry ─────────────────────────────────────────────────────────

fn style_bits(style: WindowStyle) -> (WINDOW_STYLE, WINDOW_EX_STYLE) {
    match style {
        WindowStyle::Windowed => (
            WS_OVERLAPPEDWINDOW | WS_CLIPSIBLINGS | WS_CLIPCHILDREN,
            WS_EX_APPWINDOW | WS_EX_WINDOWEDGE,
        ),
        WindowStyle::Fullscreen => (
            WS_POPUP | WS_CLIPSIBLINGS | WS_CLIPCHILDREN,
            WS_EX_APPWINDOW,
        ),
    }
}

fn to_rect(r: RECT) -> Rect {
    Rect {
        left: r.left,
        top: r.top,
        right: r.right,
        bottom: r.bottom,
    }
}

fn from_rect(r: Rect) -> RECT {
    RECT {
        left: r.left,
        top: r.top,
        right: r.right,
        bottom: r.bottom,
    }
}

pub(super) fn adjust_rect(client: Rect, style: WindowStyle) -> Result<Rect> {
    let (ws, ex) = style_bits(style);
    let mut rect = from_rect(client);
    // SAFETY: rect is a valid, writable RECT; no menu is attached.
    unsafe { AdjustWindowRectEx(&mut rect, ws, BOOL::from(false), ex) }
        .map_err(|e| api_error("AdjustWindowRectEx", e))?;
    Ok(to_rect(rect))
}

pub(super) fn window_rect(hwnd: HWND) -> Rect {
    let mut rect = RECT::default();
    // SAFETY: hwnd is a live window owned by the caller; rect is writable.
    if let Err(e) = unsafe { GetWindowRect(hwnd, &mut rect) } {
        warn!("GetWindowRect failed: {e}");
    }
    to_rect(rect)
}

pub(super) fn client_rect_on_screen(hwnd: HWND) -> Rect {
    let mut rect = RECT::default();
    // SAFETY: hwnd is a live window owned by the caller; rect is writable.
    if let Err(e) = unsafe { GetClientRect(hwnd, &mut rect) } {
        warn!("GetClientRect failed: {e}");
    }

    let mut top_left = POINT {
        x: rect.left,
        y: rect.top,
    };
    let mut bottom_right = POINT {
        x: rect.right,
        y: rect.bottom,
    };
    // SAFETY: both points are valid and writable; hwnd is live.
    unsafe {
        let _ = ClientToScreen(hwnd, &mut top_left);
        let _ = ClientToScreen(hwnd, &mut bottom_right);
    }

    Rect {
        left: top_left.x,
        top: top_left.y,
        right: bottom_right.x,
        bottom: bottom_right.y,
    }
}

// ── Creation & destruction ────────────────────────────────────────────────────

pub(super) fn create(
    hinstance: HINSTANCE,
    title: &str,
    outer: Rect,
    style: WindowStyle,
) -> Result<HWND> {
    let (ws, ex) = style_bits(style);
    let title_wide = to_wide(title);

    // SAFETY: CLASS_NAME is registered (register_class ran first); title_wide
    // is a null-terminated UTF-16 string alive for the duration of the call.
    // Null parent and menu create an unowned top-level window.
    let hwnd = unsafe {
        CreateWindowExW(
            ex,
            CLASS_NAME,
            PCWSTR(title_wide.as_ptr()),
            ws,
            outer.left,
            outer.top,
            outer.width(),
            outer.height(),
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )
    }
    .map_err(|e| api_error("CreateWindowExW", e))?;

    EVENTS.with(|events| events.borrow_mut().track(key(hwnd)));
    Ok(hwnd)
}

pub(super) fn destroy(hwnd: HWND) {
    EVENTS.with(|events| events.borrow_mut().untrack(key(hwnd)));
    // SAFETY: hwnd was created on this thread by `create` and is destroyed once.
    if let Err(e) = unsafe { DestroyWindow(hwnd) } {
        warn!("DestroyWindow failed: {e}");
    }
}

// ── Mutators ──────────────────────────────────────────────────────────────────

pub(super) fn show(hwnd: HWND, visible: bool) {
    // SAFETY: hwnd is live. The return value is the previous visibility, not an
    // error indicator.
    unsafe {
        let _ = ShowWindow(hwnd, if visible { SW_SHOW } else { SW_HIDE });
    }
}

pub(super) fn focus(hwnd: HWND) {
    // SAFETY: hwnd is live and belongs to the calling thread. The foreground
    // request may be refused by the shell; that is not an error for us.
    unsafe {
        let _ = SetForegroundWindow(hwnd);
        let _ = SetFocus(hwnd);
    }
}

pub(super) fn set_title(hwnd: HWND, title: &str) {
    let title_wide = to_wide(title);
    // SAFETY: title_wide is null-terminated and outlives the call.
    if let Err(e) = unsafe { SetWindowTextW(hwnd, PCWSTR(title_wide.as_ptr())) } {
        warn!("SetWindowTextW failed: {e}");
    }
}

/// Swap the frame style, keeping the window visible if it already is.
pub(super) fn set_style(hwnd: HWND, style: WindowStyle) {
    let (mut ws, ex) = style_bits(style);
    // SAFETY: hwnd is live; style words are plain integers. The new frame is
    // applied by the SWP_FRAMECHANGED move that follows.
    unsafe {
        if IsWindowVisible(hwnd).as_bool() {
            ws |= WS_VISIBLE;
        }
        SetWindowLongPtrW(hwnd, GWL_STYLE, ws.0 as isize);
        SetWindowLongPtrW(hwnd, GWL_EXSTYLE, ex.0 as isize);
    }
}

pub(super) fn set_pos(hwnd: HWND, outer: Rect, z: ZOrder) {
    let insert_after = match z {
        ZOrder::Top => HWND_TOP,
        ZOrder::NotTopmost => HWND_NOTOPMOST,
    };
    // SAFETY: hwnd is live; HWND_TOP / HWND_NOTOPMOST are documented sentinels.
    let moved = unsafe {
        SetWindowPos(
            hwnd,
            insert_after,
            outer.left,
            outer.top,
            outer.width(),
            outer.height(),
            SWP_FRAMECHANGED,
        )
    };
    if let Err(e) = moved {
        warn!("SetWindowPos failed: {e}");
    }
}

// ── Cursor ────────────────────────────────────────────────────────────────────

pub(super) fn show_cursor(visible: bool) {
    // SAFETY: ShowCursor only adjusts the thread's display counter.
    let count = unsafe { ShowCursor(BOOL::from(visible)) };
    debug!("cursor display count now {count}");
}

pub(super) fn clip_cursor(rect: Option<Rect>) {
    let clip = rect.map(from_rect);
    // SAFETY: the RECT (if any) lives on this stack frame for the whole call.
    let result = unsafe { ClipCursor(clip.as_ref().map(|r| r as *const RECT)) };
    if let Err(e) = result {
        warn!("ClipCursor failed: {e}");
    }
}

// ── Message pump ──────────────────────────────────────────────────────────────

/// Drain the thread's message queue without blocking, then hand over the
/// events filed for `window`.
pub(super) fn pump(window: Option<HWND>, out: &mut Vec<WindowEvent>) {
    let mut msg = MSG::default();
    let mut quit = false;

    // SAFETY: &mut msg is a valid MSG pointer; a null HWND retrieves messages
    // for every window on this thread; 0,0 filter accepts all.
    while unsafe { PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE) }.as_bool() {
        if msg.message == WM_QUIT {
            quit = true;
            continue;
        }
        // SAFETY: msg was populated by a successful PeekMessageW call.
        // TranslateMessage's return value (whether it generated WM_CHAR) and
        // DispatchMessageW's LRESULT are intentionally unused.
        unsafe {
            let _ = TranslateMessage(&msg);
            let _ = DispatchMessageW(&msg);
        }
    }

    if let Some(hwnd) = window {
        EVENTS.with(|events| events.borrow_mut().drain_into(key(hwnd), out));
    }
    if quit {
        out.push(WindowEvent::Quit);
    }
}

/// File `event` for `hwnd` if the window is tracked.
///
/// `try_borrow_mut`: the window procedure can be re-entered while the
/// registry is already borrowed (never in practice, but a panic across the
/// FFI boundary would abort).
fn file_event(hwnd: HWND, event: WindowEvent) {
    EVENTS.with(|events| match events.try_borrow_mut() {
        Ok(mut events) => {
            if !events.push(key(hwnd), event) {
                debug!("{event:?} for an untracked window dropped");
            }
        }
        Err(_) => warn!("event registry busy; dropped {event:?}"),
    });
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call; we must not store hwnd beyond the message handler.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_SIZE => {
            file_event(hwnd, size_event(wparam.0, lparam.0));
            LRESULT(0)
        }

        // Reported, not acted on: the owner decides when to destroy.
        WM_CLOSE => {
            file_event(hwnd, WindowEvent::CloseRequested);
            LRESULT(0)
        }

        WM_ACTIVATE => {
            file_event(hwnd, activate_event(wparam.0));
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        // Default processing for all unhandled messages.
        // SAFETY: hwnd and message parameters are valid; provided by Windows.
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Error dialog ──────────────────────────────────────────────────────────────

/// Show a modal error dialog with the given message.
///
/// Safe to call from any context; performs the UTF-16 conversion internally.
pub fn show_error_dialog(message: &str) {
    let msg_wide = to_wide(message);

    // SAFETY: msg_wide is a valid null-terminated UTF-16 string that remains
    // allocated for the duration of the MessageBoxW call.
    // HWND::default() (null) means the dialog has no owner window.
    // Return value (button pressed) is intentionally unused for an error dialog.
    unsafe {
        let _ = MessageBoxW(
            HWND::default(),
            PCWSTR(msg_wide.as_ptr()),
            w!("Error"),
            MB_OK | MB_ICONERROR,
        );
    }
}
