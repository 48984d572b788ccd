// Demo host: opens one window, presents frames until the user closes it.
//
//   glwin [config.json]
//
// RUST_LOG controls verbosity (default: info).

#![deny(unsafe_code)]
// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that log output is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;

use glwin::WindowConfig;

/// Pause between presents when vsync is off.
#[cfg(windows)]
const IDLE_FRAME: std::time::Duration = std::time::Duration::from_millis(1);

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(e) = run() {
        log::error!("{e}");
        // Show a modal error dialog: the only visible output path in a
        // release GUI build.
        #[cfg(windows)]
        glwin::platform::win32::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }
}

fn load_config() -> glwin::Result<WindowConfig> {
    config_for(std::env::args_os().nth(1).map(PathBuf::from))
}

fn config_for(path: Option<PathBuf>) -> glwin::Result<WindowConfig> {
    match path {
        Some(path) => WindowConfig::load(&path),
        // Present at the display rate rather than spinning a core.
        None => Ok(WindowConfig {
            vsync: true,
            ..WindowConfig::default()
        }),
    }
}

#[cfg(windows)]
fn run() -> glwin::Result<()> {
    use glwin::{GlWindow, Win32Platform};

    let config = load_config()?;

    let mut window = GlWindow::new(Win32Platform::new()?);
    window.set_resize_handler(|width, height| {
        log::info!("client area is now {width}x{height}");
    });
    window.create_from_config(&config)?;

    #[cfg(debug_assertions)]
    let t0 = std::time::Instant::now();
    let mut frames: u64 = 0;

    while window.process_messages() {
        window.swap_buffers()?;
        frames += 1;
        if !window.is_vsync() {
            // Nothing is drawn; yield instead of presenting as fast as possible.
            std::thread::sleep(IDLE_FRAME);
        }
    }

    #[cfg(debug_assertions)]
    log::info!(
        "{frames} frames in {:.1} s",
        t0.elapsed().as_secs_f64()
    );
    #[cfg(not(debug_assertions))]
    log::info!("{frames} frames presented");

    window.destroy();
    Ok(())
}

#[cfg(not(windows))]
fn run() -> glwin::Result<()> {
    // Validate the config anyway so a bad file is reported on every host.
    load_config()?;
    Err(glwin::GlWinError::Unsupported)
}
