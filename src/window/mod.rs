// ── GlWindow: one window + one OpenGL context ─────────────────────────────────
//
// Owns the acquisition order (class → window → surface → pixel format →
// context → current → entry points), its reverse on teardown, and every piece
// of mirrored state (size, fullscreen, cursor, vsync).  All OS requests go
// through the `Platform` trait, so nothing here is `unsafe`.
//
// Handles are stored in a single `Option<Handles>`: they are all present or all
// absent.  Partially acquired handles only ever live in a local `Staged` value
// inside `create`, which is released in reverse order if a step fails.

use log::{debug, info, warn};

use crate::{
    config::WindowConfig,
    error::{GlWinError, Result},
    gl::{PixelFormat, ProcAddress, ProcTable},
    platform::{DisplayMode, Platform, Rect, SizeKind, WindowEvent, WindowStyle, ZOrder},
};

// ── Handles ───────────────────────────────────────────────────────────────────

struct Handles<P: Platform> {
    window: P::Window,
    surface: P::Surface,
    context: P::Context,
}

/// Resources acquired so far during `create`.
struct Staged<P: Platform> {
    window: Option<P::Window>,
    surface: Option<P::Surface>,
    context: Option<P::Context>,
    /// The context is bound to the calling thread.
    current: bool,
    /// The display was switched to an exclusive mode.
    display_changed: bool,
}

impl<P: Platform> Staged<P> {
    fn empty() -> Self {
        Self {
            window: None,
            surface: None,
            context: None,
            current: false,
            display_changed: false,
        }
    }
}

/// Release in reverse acquisition order.  Each step runs only for what is held.
fn release<P: Platform>(platform: &mut P, staged: Staged<P>) {
    if staged.current {
        platform.clear_current();
    }
    if let Some(context) = staged.context {
        platform.delete_context(context);
    }
    if let (Some(window), Some(surface)) = (staged.window, staged.surface) {
        platform.release_surface(window, surface);
    }
    if let Some(window) = staged.window {
        platform.destroy_window(window);
    }
    if staged.display_changed {
        platform.restore_display_mode();
    }
}

// ── GlWindow ──────────────────────────────────────────────────────────────────

/// A top-level window with a bound OpenGL context.
///
/// Thread-affine: every method must run on the thread that called `create`,
/// which is also the thread whose message queue `process_messages` drains.
pub struct GlWindow<P: Platform> {
    platform: P,
    handles: Option<Handles<P>>,
    procs: ProcTable,
    /// `GL_VERSION` of the live context.
    gl_version: Option<String>,
    pixel_format: PixelFormat,

    /// Outer rect to return to when leaving fullscreen.
    windowed_bounds: Rect,
    /// Client size to report again when leaving fullscreen.
    windowed_size: (i32, i32),

    fullscreen: bool,
    cursor_visible: bool,
    cursor_locked: bool,
    vsync: bool,
    visible: bool,
    close_requested: bool,

    width: i32,
    height: i32,

    on_resize: Option<Box<dyn FnMut(i32, i32)>>,
    /// Reused between `process_messages` calls.
    events: Vec<WindowEvent>,
}

impl<P: Platform> GlWindow<P> {
    /// An uncreated window that will talk to the OS through `platform`.
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            handles: None,
            procs: ProcTable::empty(),
            gl_version: None,
            pixel_format: PixelFormat::default(),
            windowed_bounds: Rect::default(),
            windowed_size: (0, 0),
            fullscreen: false,
            cursor_visible: true,
            cursor_locked: false,
            vsync: false,
            visible: false,
            close_requested: false,
            width: 0,
            height: 0,
            on_resize: None,
            events: Vec::new(),
        }
    }

    /// Request a different surface format for the next `create`.
    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = format;
        self
    }

    /// Install the closure called after every client-area resize.
    pub fn set_resize_handler<F>(&mut self, handler: F)
    where
        F: FnMut(i32, i32) + 'static,
    {
        self.on_resize = Some(Box::new(handler));
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Create the window and its OpenGL context, then show and focus it.
    ///
    /// Any existing window is destroyed first.  On failure everything acquired
    /// by this call is released again and the window stays uncreated.
    pub fn create(&mut self, title: &str, width: i32, height: i32, fullscreen: bool) -> Result<()> {
        self.destroy();

        if width <= 0 || height <= 0 {
            return Err(GlWinError::InvalidSize { width, height });
        }

        self.width = width;
        self.height = height;
        self.close_requested = false;

        let mut staged = Staged::empty();
        let (handles, procs, version) = match self.acquire(&mut staged, title, fullscreen) {
            Ok(acquired) => acquired,
            Err(e) => {
                warn!("window creation failed: {e}");
                release(&mut self.platform, staged);
                return Err(e);
            }
        };

        let window = handles.window;
        self.handles = Some(handles);
        self.procs = procs;
        self.fullscreen = fullscreen;
        info!("OpenGL {version}");
        self.gl_version = Some(version);

        self.platform.show_window(window, true);
        self.platform.focus_window(window);
        self.visible = true;

        self.apply_vsync();
        if !self.cursor_visible {
            self.platform.show_cursor(false);
        }
        self.clip_cursor_to_client();

        info!(
            "created {width}x{height} window \"{title}\"{}",
            if fullscreen { " (fullscreen)" } else { "" }
        );
        Ok(())
    }

    /// `create` with title, size, mode, pixel format, vsync and cursor state
    /// taken from `config`.
    pub fn create_from_config(&mut self, config: &WindowConfig) -> Result<()> {
        config.validate()?;
        // Tear down under the old cursor state before adopting the new one.
        self.destroy();

        self.pixel_format = config.pixel_format;
        self.vsync = config.vsync;
        self.cursor_visible = config.cursor_visible;
        self.cursor_locked = config.cursor_locked;

        self.create(&config.title, config.width, config.height, config.fullscreen)
    }

    fn acquire(
        &mut self,
        staged: &mut Staged<P>,
        title: &str,
        fullscreen: bool,
    ) -> Result<(Handles<P>, ProcTable, String)> {
        self.platform.register_class()?;

        let style = WindowStyle::for_fullscreen(fullscreen);
        if fullscreen {
            let mode = DisplayMode::with_size(self.width, self.height);
            self.platform.enter_display_mode(&mode)?;
            staged.display_changed = true;
        }

        let client = Rect::from_size(self.width, self.height);
        let outer = self.platform.adjust_window_rect(client, style)?;
        let outer = outer.moved_to(0, 0);
        let windowed_outer = if fullscreen {
            self.platform
                .adjust_window_rect(client, WindowStyle::Windowed)?
                .moved_to(0, 0)
        } else {
            outer
        };

        let window = self.platform.create_window(title, outer, style)?;
        staged.window = Some(window);

        let surface = self.platform.acquire_surface(window)?;
        staged.surface = Some(surface);

        let index = self.platform.choose_pixel_format(surface, &self.pixel_format)?;
        debug!("pixel format {index} selected");
        self.platform
            .set_pixel_format(surface, index, &self.pixel_format)?;

        let context = self.platform.create_context(surface)?;
        staged.context = Some(context);

        self.platform.make_current(surface, context)?;
        staged.current = true;

        let platform = &self.platform;
        let procs = ProcTable::load(|name| platform.proc_address(name))?;
        let version = self.platform.gl_version().ok_or(GlWinError::NoVersion)?;

        self.windowed_bounds = if fullscreen {
            windowed_outer
        } else {
            self.platform.window_rect(window)
        };
        self.windowed_size = (self.width, self.height);

        Ok((
            Handles {
                window,
                surface,
                context,
            },
            procs,
            version,
        ))
    }

    /// Release the context, surface and window, and restore the display mode
    /// if fullscreen was active.  Does nothing when uncreated.
    pub fn destroy(&mut self) {
        let Some(handles) = self.handles.take() else {
            return;
        };

        // Hand the cursor back to the desktop; the flags stay so the next
        // `create` re-applies them.
        if self.cursor_locked {
            self.platform.clip_cursor(None);
        }
        if !self.cursor_visible {
            self.platform.show_cursor(true);
        }

        release(
            &mut self.platform,
            Staged {
                window: Some(handles.window),
                surface: Some(handles.surface),
                context: Some(handles.context),
                current: true,
                display_changed: self.fullscreen,
            },
        );

        self.fullscreen = false;
        self.visible = false;
        self.procs = ProcTable::empty();
        self.gl_version = None;
        info!("window destroyed");
    }

    // ── Mutators ──────────────────────────────────────────────────────────────

    pub fn show(&mut self) {
        if let Some(window) = self.window() {
            self.platform.show_window(window, true);
            self.visible = true;
        }
    }

    pub fn hide(&mut self) {
        if let Some(window) = self.window() {
            self.platform.show_window(window, false);
            self.visible = false;
        }
    }

    pub fn set_title(&mut self, title: &str) {
        if let Some(window) = self.window() {
            self.platform.set_title(window, title);
        }
    }

    /// Resize the client area to `width`×`height`.
    ///
    /// Windowed: keeps the current top-left corner.  Fullscreen: anchors at
    /// the display origin.  Non-positive sizes are ignored.
    pub fn set_size(&mut self, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            warn!("ignoring invalid window size {width}x{height}");
            return;
        }

        self.width = width;
        self.height = height;

        let Some(window) = self.window() else {
            return;
        };

        let style = WindowStyle::for_fullscreen(self.fullscreen);
        let client = Rect::from_size(width, height);
        let outer = self
            .platform
            .adjust_window_rect(client, style)
            .unwrap_or_else(|e| {
                warn!("could not compute frame for {width}x{height}: {e}");
                client
            });
        let (x, y) = if self.fullscreen {
            (0, 0)
        } else {
            let current = self.platform.window_rect(window);
            (current.left, current.top)
        };

        self.platform.set_window_style(window, style);
        self.platform
            .set_window_pos(window, outer.moved_to(x, y), ZOrder::Top);
        self.clip_cursor_to_client();
    }

    /// Switch between exclusive fullscreen at the desktop resolution and the
    /// windowed placement saved when fullscreen was entered.
    ///
    /// Issues no OS request when already in the requested state or uncreated.
    pub fn set_fullscreen(&mut self, enable: bool) -> Result<()> {
        if self.fullscreen == enable {
            return Ok(());
        }
        let Some(window) = self.window() else {
            debug!("set_fullscreen({enable}) ignored: window not created");
            return Ok(());
        };

        if enable {
            let mode = self.platform.current_display_mode()?;

            self.windowed_bounds = self.platform.window_rect(window);
            self.windowed_size = (self.width, self.height);

            self.platform.enter_display_mode(&mode)?;
            self.platform
                .set_window_style(window, WindowStyle::Fullscreen);
            self.platform.set_window_pos(
                window,
                Rect::from_size(mode.width, mode.height),
                ZOrder::Top,
            );

            self.width = mode.width;
            self.height = mode.height;
            self.fullscreen = true;
            info!("entered fullscreen at {}x{}", mode.width, mode.height);
        } else {
            self.platform.restore_display_mode();
            self.platform.set_window_style(window, WindowStyle::Windowed);
            self.platform
                .set_window_pos(window, self.windowed_bounds, ZOrder::NotTopmost);

            (self.width, self.height) = self.windowed_size;
            self.fullscreen = false;
            info!("left fullscreen, back to {}x{}", self.width, self.height);
        }

        self.clip_cursor_to_client();
        Ok(())
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        // ShowCursor keeps a display counter; only request real transitions.
        if self.cursor_visible == visible {
            return;
        }
        self.cursor_visible = visible;
        if self.handles.is_some() {
            self.platform.show_cursor(visible);
        }
    }

    /// Confine the cursor to the client area, or release it.
    pub fn set_cursor_locked(&mut self, locked: bool) {
        if self.cursor_locked == locked {
            return;
        }
        self.cursor_locked = locked;
        if locked {
            self.clip_cursor_to_client();
        } else if self.handles.is_some() {
            self.platform.clip_cursor(None);
        }
    }

    /// Request vsync on or off.  The flag is kept even when the driver has no
    /// swap-interval control, and is re-applied by every `create`.
    pub fn set_vsync(&mut self, enabled: bool) {
        self.vsync = enabled;
        if self.handles.is_some() {
            self.apply_vsync();
        }
    }

    fn apply_vsync(&mut self) {
        let interval = i32::from(self.vsync);
        if !self.platform.set_swap_interval(interval) {
            warn!("swap interval control unavailable; vsync={} not applied", self.vsync);
        }
    }

    /// Re-clip after anything that moves or resizes the client area.
    fn clip_cursor_to_client(&mut self) {
        if !self.cursor_locked {
            return;
        }
        if let Some(window) = self.window() {
            let rect = self.platform.client_rect_on_screen(window);
            self.platform.clip_cursor(Some(rect));
        }
    }

    // ── Events ────────────────────────────────────────────────────────────────

    /// Drain the OS message queue without blocking and apply the events.
    ///
    /// Returns `false` once the user has asked to close the window or the
    /// thread received a quit message.  The window itself stays alive until
    /// `destroy`.
    pub fn process_messages(&mut self) -> bool {
        let window = self.window();
        let mut events = std::mem::take(&mut self.events);
        self.platform.pump_events(window, &mut events);
        for event in events.drain(..) {
            self.handle_event(event);
        }
        self.events = events;
        !self.close_requested
    }

    fn handle_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::Resized { kind: SizeKind::Minimized, .. } => {
                debug!("window minimized; keeping {}x{}", self.width, self.height);
            }
            WindowEvent::Resized { width, height, .. } => {
                if self.handles.is_some() {
                    self.resize_callback(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                info!("close requested");
                self.close_requested = true;
            }
            WindowEvent::Quit => {
                debug!("quit message received");
                self.close_requested = true;
            }
            // Windows drops the cursor clip whenever another window is
            // activated.
            WindowEvent::Activated(true) => self.clip_cursor_to_client(),
            WindowEvent::Activated(false) => {}
        }
    }

    /// Record a new client size and notify the resize handler.
    ///
    /// Called for every non-minimized OS resize notification.
    pub fn resize_callback(&mut self, width: i32, height: i32) {
        debug!("client area resized to {width}x{height}");
        self.width = width;
        self.height = height;
        self.clip_cursor_to_client();
        if let Some(handler) = self.on_resize.as_mut() {
            handler(width, height);
        }
    }

    // ── Presentation ──────────────────────────────────────────────────────────

    /// Present the back buffer.
    pub fn swap_buffers(&mut self) -> Result<()> {
        let surface = self
            .handles
            .as_ref()
            .map(|h| h.surface)
            .ok_or(GlWinError::NotCreated)?;
        self.platform.swap_buffers(surface)
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_vsync(&self) -> bool {
        self.vsync
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_created(&self) -> bool {
        self.handles.is_some()
    }

    pub fn is_close_requested(&self) -> bool {
        self.close_requested
    }

    /// The OS window, while created.
    pub fn handle(&self) -> Option<P::Window> {
        self.window()
    }

    pub fn surface(&self) -> Option<P::Surface> {
        self.handles.as_ref().map(|h| h.surface)
    }

    pub fn context(&self) -> Option<P::Context> {
        self.handles.as_ref().map(|h| h.context)
    }

    /// OpenGL entry points for the current context; empty while uncreated.
    pub fn proc_table(&self) -> &ProcTable {
        &self.procs
    }

    /// Address of any OpenGL or WGL function for the current context.
    ///
    /// Names outside the preloaded table are resolved on demand; `None` while
    /// uncreated or when the driver does not export `name`.
    pub fn proc_address(&self, name: &str) -> Option<ProcAddress> {
        self.handles.as_ref()?;
        self.procs
            .get(name)
            .or_else(|| self.platform.proc_address(name))
    }

    /// `GL_VERSION` reported by the live context.
    pub fn gl_version(&self) -> Option<&str> {
        self.gl_version.as_deref()
    }

    pub fn pixel_format(&self) -> &PixelFormat {
        &self.pixel_format
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    fn window(&self) -> Option<P::Window> {
        self.handles.as_ref().map(|h| h.window)
    }
}

impl<P: Platform> Drop for GlWindow<P> {
    fn drop(&mut self) {
        self.destroy();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        gl::GL11_BASELINE,
        platform::recording::{Call, FailAt, RecordingPlatform, CAPTION, FRAME},
    };

    fn uncreated() -> GlWindow<RecordingPlatform> {
        GlWindow::new(RecordingPlatform::new())
    }

    fn created() -> GlWindow<RecordingPlatform> {
        let mut window = uncreated();
        window.create("Test", 800, 600, false).expect("create");
        window
    }

    fn windowed_outer(width: i32, height: i32) -> Rect {
        Rect::from_size(width + 2 * FRAME, height + CAPTION + FRAME)
    }

    fn resized(width: i32, height: i32, kind: SizeKind) -> WindowEvent {
        WindowEvent::Resized {
            width,
            height,
            kind,
        }
    }

    // ── Create / destroy ──────────────────────────────────────────────────────

    #[test]
    fn create_resize_destroy_scenario() {
        let mut window = created();
        assert_eq!((window.width(), window.height()), (800, 600));
        assert!(!window.is_fullscreen());
        assert!(window.is_created());

        window.set_size(1024, 768);
        assert_eq!((window.width(), window.height()), (1024, 768));

        window.destroy();
        assert!(window.handle().is_none());
        assert!(window.surface().is_none());
        assert!(window.context().is_none());
        assert_eq!(window.platform().live_handles(), 0);

        let calls_after_first_destroy = window.platform().calls.len();
        window.destroy();
        assert_eq!(window.platform().calls.len(), calls_after_first_destroy);
    }

    #[test]
    fn create_acquires_in_order() {
        let window = created();
        let calls = &window.platform().calls;
        assert_eq!(
            calls.as_slice(),
            &[
                Call::RegisterClass,
                Call::CreateWindow {
                    title: "Test".to_owned(),
                    outer: windowed_outer(800, 600),
                    style: WindowStyle::Windowed,
                },
                Call::AcquireSurface(1),
                Call::ChoosePixelFormat(PixelFormat::default()),
                Call::SetPixelFormat(7),
                Call::CreateContext(2),
                Call::MakeCurrent(3),
                Call::ShowWindow(true),
                Call::FocusWindow,
                Call::SwapInterval(0),
            ]
        );
        assert!(window.is_visible());
    }

    #[test]
    fn destroy_releases_in_reverse_order() {
        let mut window = created();
        let before = window.platform().calls.len();
        window.destroy();
        assert_eq!(
            &window.platform().calls[before..],
            &[
                Call::ClearCurrent,
                Call::DeleteContext(3),
                Call::ReleaseSurface(2),
                Call::DestroyWindow(1),
            ]
        );
        assert!(!window.is_visible());
        assert!(window.proc_table().is_empty());
    }

    #[test]
    fn destroy_on_fresh_window_issues_no_calls() {
        let mut window = uncreated();
        window.destroy();
        window.destroy();
        assert!(window.platform().calls.is_empty());
    }

    #[test]
    fn create_after_destroy_matches_first_create() {
        let mut window = created();
        let first_create: Vec<Call> = window.platform().calls.clone();
        window.destroy();

        let start = window.platform().calls.len();
        window.create("Test", 800, 600, false).expect("second create");

        assert_eq!(window.platform().calls.len() - start, first_create.len());
        assert_eq!((window.width(), window.height()), (800, 600));
        assert!(!window.is_fullscreen());
        assert!(window.is_created());
        assert_eq!(window.platform().live_handles(), 3);
    }

    #[test]
    fn create_on_created_window_releases_previous_handles() {
        let mut window = created();
        window.create("Again", 640, 480, false).expect("create");
        assert_eq!(window.platform().live_handles(), 3);
        assert_eq!(window.platform().count(|c| matches!(c, Call::DestroyWindow(1))), 1);
        assert_eq!(window.handle(), Some(4));
    }

    #[test]
    fn create_rejects_non_positive_size_without_os_calls() {
        let mut window = uncreated();
        let err = window.create("Bad", 0, 600, false).expect_err("must fail");
        assert!(matches!(err, GlWinError::InvalidSize { width: 0, height: 600 }));
        assert!(window.platform().calls.is_empty());
        assert!(!window.is_created());
    }

    #[test]
    fn create_loads_proc_table() {
        let mut window = created();
        assert!(window.proc_table().get("glCreateProgram").is_some());
        window.destroy();
        assert!(window.proc_table().get("glCreateProgram").is_none());
    }

    #[test]
    fn every_failed_step_rolls_back_everything() {
        let steps = [
            FailAt::RegisterClass,
            FailAt::EnterDisplayMode,
            FailAt::CreateWindow,
            FailAt::AcquireSurface,
            FailAt::ChoosePixelFormat,
            FailAt::SetPixelFormat,
            FailAt::CreateContext,
            FailAt::MakeCurrent,
        ];

        for step in steps {
            let mut window = uncreated();
            window.platform_mut().fail_at = Some(step);

            assert!(window.create("Test", 800, 600, true).is_err(), "{step:?}");
            assert!(!window.is_created(), "{step:?}");
            assert!(!window.is_fullscreen(), "{step:?}");
            assert_eq!(window.platform().live_handles(), 0, "{step:?}");

            let restores = window.platform().count(|c| *c == Call::RestoreDisplayMode);
            let display_was_changed =
                !matches!(step, FailAt::RegisterClass | FailAt::EnterDisplayMode);
            assert_eq!(restores, usize::from(display_was_changed), "{step:?}");
        }
    }

    #[test]
    fn baseline_only_context_is_accepted() {
        let mut window = uncreated();
        window.platform_mut().exported_procs = Some(GL11_BASELINE);
        window.platform_mut().version = Some("1.1.0".to_owned());

        window.create("Test", 800, 600, false).expect("1.1 context");
        assert_eq!(window.gl_version(), Some("1.1.0"));
        assert!(window.proc_address("glClear").is_some());
        assert!(window.proc_address("glGenBuffers").is_none());
    }

    #[test]
    fn unlisted_names_resolve_on_demand() {
        let mut window = uncreated();
        assert!(window.proc_address("glDrawBuffers").is_none());

        window.create("Test", 800, 600, false).expect("create");
        assert!(window.proc_table().get("glDrawBuffers").is_none());
        assert!(window.proc_address("glDrawBuffers").is_some());

        window.destroy();
        assert!(window.proc_address("glDrawBuffers").is_none());
        assert!(window.gl_version().is_none());
    }

    #[test]
    fn missing_optional_entry_point_does_not_fail_create() {
        let mut window = uncreated();
        window.platform_mut().missing_proc = Some("glLinkProgram");

        window.create("Test", 800, 600, false).expect("create");
        assert!(window.proc_address("glLinkProgram").is_none());
    }

    #[test]
    fn context_without_version_is_rejected_and_released() {
        let mut window = uncreated();
        window.platform_mut().version = None;

        let err = window.create("Test", 800, 600, false).expect_err("must fail");
        assert!(matches!(err, GlWinError::NoVersion));
        assert!(!window.is_created());
        assert_eq!(window.platform().live_handles(), 0);
    }

    #[test]
    fn missing_entry_point_unbinds_and_releases_context() {
        let mut window = uncreated();
        window.platform_mut().missing_proc = Some("glGetString");

        let err = window.create("Test", 800, 600, false).expect_err("must fail");
        assert!(matches!(err, GlWinError::MissingEntryPoint("glGetString")));
        assert_eq!(window.platform().live_handles(), 0);
        assert_eq!(window.platform().count(|c| *c == Call::ClearCurrent), 1);
    }

    #[test]
    fn display_mode_failure_is_reported_to_caller() {
        let mut window = uncreated();
        window.platform_mut().fail_at = Some(FailAt::EnterDisplayMode);
        let err = window.create("Test", 640, 480, true).expect_err("must fail");
        assert!(matches!(err, GlWinError::DisplayMode { width: 640, height: 480, .. }));
    }

    #[test]
    fn fullscreen_create_switches_mode_and_destroy_restores_it() {
        let mut window = uncreated();
        window.create("Test", 1024, 768, true).expect("create");

        assert!(window.is_fullscreen());
        let platform = window.platform();
        assert_eq!(
            platform.calls[1],
            Call::EnterDisplayMode(DisplayMode::with_size(1024, 768))
        );
        assert!(platform.calls.contains(&Call::CreateWindow {
            title: "Test".to_owned(),
            outer: Rect::from_size(1024, 768),
            style: WindowStyle::Fullscreen,
        }));

        window.destroy();
        assert!(!window.is_fullscreen());
        assert_eq!(window.platform().calls.last(), Some(&Call::RestoreDisplayMode));
    }

    #[test]
    fn create_from_config_applies_all_settings() {
        let config = WindowConfig {
            title: "Configured".to_owned(),
            width: 640,
            height: 360,
            vsync: true,
            cursor_visible: false,
            cursor_locked: true,
            pixel_format: PixelFormat {
                depth_bits: 16,
                ..PixelFormat::default()
            },
            ..WindowConfig::default()
        };

        let mut window = uncreated();
        window.create_from_config(&config).expect("create");

        assert_eq!((window.width(), window.height()), (640, 360));
        assert!(window.is_vsync());
        assert!(!window.is_cursor_visible());
        assert!(window.is_cursor_locked());
        assert_eq!(window.pixel_format().depth_bits, 16);

        let calls = &window.platform().calls;
        assert!(calls.contains(&Call::SwapInterval(1)));
        assert!(calls.contains(&Call::ShowCursor(false)));
        assert!(calls.iter().any(|c| matches!(c, Call::ClipCursor(Some(_)))));
    }

    // ── Fullscreen ────────────────────────────────────────────────────────────

    #[test]
    fn set_fullscreen_to_current_state_is_a_noop() {
        let mut window = created();
        let before = window.platform().calls.len();

        window.set_fullscreen(false).expect("noop");

        assert_eq!(window.platform().calls.len(), before);
        assert_eq!(window.platform().display_mode_calls(), 0);
    }

    #[test]
    fn set_fullscreen_before_create_does_nothing() {
        let mut window = uncreated();
        window.set_fullscreen(true).expect("noop");
        assert!(!window.is_fullscreen());
        assert!(window.platform().calls.is_empty());
    }

    #[test]
    fn fullscreen_round_trip_restores_size_and_placement() {
        let mut window = created();
        let placed = windowed_outer(800, 600).moved_to(120, 80);
        window.platform_mut().window_rect = placed;

        window.set_fullscreen(true).expect("enter");
        assert!(window.is_fullscreen());
        assert_eq!((window.width(), window.height()), (1920, 1080));
        let desktop = window.platform().desktop;
        assert!(window.platform().calls.contains(&Call::EnterDisplayMode(desktop)));
        assert_eq!(
            window.platform().calls.last(),
            Some(&Call::SetWindowPos(Rect::from_size(1920, 1080), ZOrder::Top))
        );

        window.set_fullscreen(false).expect("leave");
        assert!(!window.is_fullscreen());
        assert_eq!((window.width(), window.height()), (800, 600));
        assert_eq!(window.platform().window_rect, placed);

        let calls = &window.platform().calls;
        assert_eq!(calls.last(), Some(&Call::SetWindowPos(placed, ZOrder::NotTopmost)));
        assert!(calls.contains(&Call::RestoreDisplayMode));
        assert!(calls.contains(&Call::SetWindowStyle(WindowStyle::Windowed)));
    }

    #[test]
    fn leaving_fullscreen_created_window_uses_windowed_frame() {
        let mut window = uncreated();
        window.create("Test", 800, 600, true).expect("create");

        window.set_fullscreen(false).expect("leave");
        assert_eq!((window.width(), window.height()), (800, 600));
        assert_eq!(
            window.platform().calls.last(),
            Some(&Call::SetWindowPos(windowed_outer(800, 600), ZOrder::NotTopmost))
        );
    }

    #[test]
    fn failed_fullscreen_switch_keeps_windowed_state() {
        let mut window = created();
        window.platform_mut().fail_at = Some(FailAt::EnterDisplayMode);

        assert!(window.set_fullscreen(true).is_err());
        assert!(!window.is_fullscreen());
        assert_eq!((window.width(), window.height()), (800, 600));
    }

    // ── Size & title ──────────────────────────────────────────────────────────

    #[test]
    fn set_size_keeps_window_origin() {
        let mut window = created();
        window.platform_mut().window_rect = windowed_outer(800, 600).moved_to(50, 40);

        window.set_size(1024, 768);

        let calls = &window.platform().calls;
        let n = calls.len();
        assert_eq!(calls[n - 2], Call::SetWindowStyle(WindowStyle::Windowed));
        assert_eq!(
            calls[n - 1],
            Call::SetWindowPos(windowed_outer(1024, 768).moved_to(50, 40), ZOrder::Top)
        );
    }

    #[test]
    fn set_size_in_fullscreen_uses_popup_frame_at_origin() {
        let mut window = uncreated();
        window.create("Test", 800, 600, true).expect("create");

        window.set_size(1280, 720);

        assert_eq!((window.width(), window.height()), (1280, 720));
        let calls = &window.platform().calls;
        let n = calls.len();
        assert_eq!(calls[n - 2], Call::SetWindowStyle(WindowStyle::Fullscreen));
        assert_eq!(
            calls[n - 1],
            Call::SetWindowPos(Rect::from_size(1280, 720), ZOrder::Top)
        );
    }

    #[test]
    fn set_size_ignores_invalid_dimensions() {
        let mut window = created();
        let before = window.platform().calls.len();
        window.set_size(-1, 300);
        assert_eq!((window.width(), window.height()), (800, 600));
        assert_eq!(window.platform().calls.len(), before);
    }

    #[test]
    fn set_title_reaches_the_window() {
        let mut window = created();
        window.set_title("Renamed");
        assert_eq!(
            window.platform().calls.last(),
            Some(&Call::SetTitle("Renamed".to_owned()))
        );
    }

    #[test]
    fn show_and_hide_toggle_visibility_only() {
        let mut window = created();
        window.hide();
        assert!(!window.is_visible());
        assert_eq!(window.platform().calls.last(), Some(&Call::ShowWindow(false)));

        window.show();
        assert!(window.is_visible());
        assert_eq!((window.width(), window.height()), (800, 600));
    }

    // ── Events ────────────────────────────────────────────────────────────────

    #[test]
    fn resize_event_updates_size_and_calls_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut window = created();
        window.set_resize_handler(move |w, h| sink.borrow_mut().push((w, h)));
        window.platform_mut().pending = vec![
            resized(1280, 720, SizeKind::Restored),
            resized(1920, 1017, SizeKind::Maximized),
        ];

        assert!(window.process_messages());
        assert_eq!((window.width(), window.height()), (1920, 1017));
        assert_eq!(seen.borrow().as_slice(), &[(1280, 720), (1920, 1017)]);
    }

    #[test]
    fn minimized_resize_keeps_previous_size() {
        let mut window = created();
        window.platform_mut().pending = vec![resized(0, 0, SizeKind::Minimized)];

        assert!(window.process_messages());
        assert_eq!((window.width(), window.height()), (800, 600));
    }

    #[test]
    fn resize_without_window_is_ignored() {
        let mut window = uncreated();
        window.platform_mut().pending = vec![resized(300, 200, SizeKind::Restored)];
        window.process_messages();
        assert_eq!((window.width(), window.height()), (0, 0));
    }

    #[test]
    fn close_request_ends_loop_but_keeps_window() {
        let mut window = created();
        assert!(window.process_messages());

        window.platform_mut().pending = vec![WindowEvent::CloseRequested];
        assert!(!window.process_messages());
        assert!(window.is_close_requested());
        assert!(window.is_created());

        // Stays latched.
        assert!(!window.process_messages());

        // A fresh create starts a new loop.
        window.create("Test", 800, 600, false).expect("create");
        assert!(window.process_messages());
    }

    #[test]
    fn quit_message_ends_loop() {
        let mut window = created();
        window.platform_mut().pending = vec![WindowEvent::Quit];
        assert!(!window.process_messages());
    }

    // ── VSync ─────────────────────────────────────────────────────────────────

    #[test]
    fn vsync_flag_mirrors_request() {
        let mut window = created();

        window.set_vsync(true);
        assert!(window.is_vsync());
        assert_eq!(window.platform().calls.last(), Some(&Call::SwapInterval(1)));

        window.set_vsync(false);
        assert!(!window.is_vsync());
        assert_eq!(window.platform().calls.last(), Some(&Call::SwapInterval(0)));
    }

    #[test]
    fn vsync_flag_mirrors_request_without_extension() {
        let mut window = uncreated();
        window.platform_mut().swap_interval_supported = false;
        window.create("Test", 800, 600, false).expect("create");

        window.set_vsync(true);
        assert!(window.is_vsync());
        assert!(window.proc_table().get("wglSwapIntervalEXT").is_none());
    }

    #[test]
    fn vsync_requested_before_create_is_applied_by_create() {
        let mut window = uncreated();
        window.set_vsync(true);
        assert!(window.platform().calls.is_empty());

        window.create("Test", 800, 600, false).expect("create");
        assert_eq!(window.platform().calls.last(), Some(&Call::SwapInterval(1)));
    }

    // ── Cursor ────────────────────────────────────────────────────────────────

    #[test]
    fn cursor_visibility_is_tracked_and_balanced() {
        let mut window = created();

        window.set_cursor_visible(false);
        window.set_cursor_visible(false);
        assert!(!window.is_cursor_visible());
        assert_eq!(window.platform().count(|c| *c == Call::ShowCursor(false)), 1);

        window.destroy();
        assert_eq!(window.platform().count(|c| *c == Call::ShowCursor(true)), 1);
        assert!(!window.is_cursor_visible());
    }

    #[test]
    fn cursor_lock_clips_to_client_area() {
        let mut window = created();
        let client = Rect {
            left: FRAME,
            top: CAPTION,
            right: 816 - FRAME,
            bottom: 639 - FRAME,
        };

        window.set_cursor_locked(true);
        assert!(window.is_cursor_locked());
        assert_eq!(window.platform().calls.last(), Some(&Call::ClipCursor(Some(client))));

        window.set_cursor_locked(false);
        assert!(!window.is_cursor_locked());
        assert_eq!(window.platform().calls.last(), Some(&Call::ClipCursor(None)));
    }

    #[test]
    fn locked_cursor_is_reclipped_after_resize_and_activation() {
        let mut window = created();
        window.set_cursor_locked(true);
        let clips = |w: &GlWindow<RecordingPlatform>| {
            w.platform().count(|c| matches!(c, Call::ClipCursor(Some(_))))
        };
        assert_eq!(clips(&window), 1);

        window.platform_mut().pending = vec![
            resized(640, 480, SizeKind::Restored),
            WindowEvent::Activated(false),
            WindowEvent::Activated(true),
        ];
        window.process_messages();
        assert_eq!(clips(&window), 3);

        let before = window.platform().calls.len();
        window.destroy();
        assert_eq!(window.platform().calls[before], Call::ClipCursor(None));
    }

    // ── Presentation ──────────────────────────────────────────────────────────

    #[test]
    fn swap_buffers_requires_a_surface() {
        let mut window = uncreated();
        assert!(matches!(window.swap_buffers(), Err(GlWinError::NotCreated)));

        window.create("Test", 800, 600, false).expect("create");
        window.swap_buffers().expect("swap");
        assert_eq!(window.platform().calls.last(), Some(&Call::SwapBuffers(2)));
    }
}
