// ── Exclusive display modes ───────────────────────────────────────────────────

use log::{debug, warn};
use windows::{
    core::PCWSTR,
    Win32::Graphics::Gdi::{
        ChangeDisplaySettingsW, EnumDisplaySettingsW, CDS_FULLSCREEN, CDS_TYPE, DEVMODEW,
        DISP_CHANGE_SUCCESSFUL, DM_BITSPERPEL, DM_DISPLAYFREQUENCY, DM_PELSHEIGHT, DM_PELSWIDTH,
        ENUM_CURRENT_SETTINGS,
    },
};

use super::last_error;
use crate::{
    error::{GlWinError, Result},
    platform::DisplayMode,
};

fn blank_devmode() -> DEVMODEW {
    DEVMODEW {
        // DEVMODEW is ~220 bytes; the cast to u16 is lossless.
        dmSize: std::mem::size_of::<DEVMODEW>() as u16,
        ..Default::default()
    }
}

/// The primary display's active mode.
pub(super) fn current_mode() -> Result<DisplayMode> {
    let mut dm = blank_devmode();
    // SAFETY: dm is a writable DEVMODEW with dmSize set; a null device name
    // selects the display the calling thread is on.
    let ok = unsafe { EnumDisplaySettingsW(PCWSTR::null(), ENUM_CURRENT_SETTINGS, &mut dm) };
    if !ok.as_bool() {
        return Err(last_error("EnumDisplaySettingsW"));
    }

    Ok(DisplayMode {
        width: dm.dmPelsWidth as i32,
        height: dm.dmPelsHeight as i32,
        bits_per_pixel: dm.dmBitsPerPel,
        refresh_hz: Some(dm.dmDisplayFrequency).filter(|&hz| hz > 1),
    })
}

/// Switch the display to `mode` for the lifetime of the fullscreen session.
pub(super) fn enter(mode: &DisplayMode) -> Result<()> {
    let mut dm = blank_devmode();
    dm.dmPelsWidth = mode.width as u32;
    dm.dmPelsHeight = mode.height as u32;
    dm.dmBitsPerPel = mode.bits_per_pixel;
    dm.dmFields = DM_BITSPERPEL | DM_PELSWIDTH | DM_PELSHEIGHT;
    if let Some(hz) = mode.refresh_hz {
        dm.dmDisplayFrequency = hz;
        dm.dmFields |= DM_DISPLAYFREQUENCY;
    }

    // SAFETY: dm is fully initialised and outlives the call. CDS_FULLSCREEN
    // makes the change temporary: it is not written to the registry.
    let result = unsafe { ChangeDisplaySettingsW(Some(&dm as *const DEVMODEW), CDS_FULLSCREEN) };
    if result != DISP_CHANGE_SUCCESSFUL {
        return Err(GlWinError::DisplayMode {
            width: mode.width,
            height: mode.height,
            code: result.0,
        });
    }

    debug!(
        "display switched to {}x{} @ {} bpp",
        mode.width, mode.height, mode.bits_per_pixel
    );
    Ok(())
}

/// Return to the mode stored in the registry.
pub(super) fn restore() {
    // SAFETY: a null DEVMODE with no flags restores the registry settings.
    let result = unsafe { ChangeDisplaySettingsW(None, CDS_TYPE(0)) };
    if result != DISP_CHANGE_SUCCESSFUL {
        warn!("restoring the display mode failed (result {})", result.0);
    }
}
