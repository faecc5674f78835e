//! Print handoff.
//!
//! The surface's only printing contract is "produce the current buffer as
//! an image"; page setup and scaling belong to the OS print pipeline.  The
//! buffer is written to a temp PNG which is then handed off: Windows gets
//! the shell "print" verb, other platforms open the file in the default
//! viewer whose print dialog fits it to the page.

use std::path::Path;

use image::RgbaImage;

pub fn print_image(canvas: &RgbaImage) -> Result<(), String> {
    let path = std::env::temp_dir().join("easel_print.png");
    canvas
        .save(&path)
        .map_err(|e| format!("failed to stage print image: {}", e))?;
    hand_to_os(&path)
}

#[cfg(target_os = "windows")]
fn hand_to_os(path: &Path) -> Result<(), String> {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use winapi::um::shellapi::ShellExecuteW;
    use winapi::um::winuser::SW_SHOWNORMAL;

    // Null-terminated UTF-16 for the Win32 API
    fn to_wide(s: &str) -> Vec<u16> {
        OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
    }

    let verb = to_wide("print");
    let file = to_wide(&path.to_string_lossy());

    let result = unsafe {
        ShellExecuteW(
            std::ptr::null_mut(),
            verb.as_ptr(),
            file.as_ptr(),
            std::ptr::null(),
            std::ptr::null(),
            SW_SHOWNORMAL,
        )
    };

    // ShellExecuteW reports success with values > 32
    if result as usize > 32 {
        Ok(())
    } else {
        Err(format!("shell print verb failed (code {})", result as usize))
    }
}

#[cfg(target_os = "macos")]
fn hand_to_os(path: &Path) -> Result<(), String> {
    std::process::Command::new("open")
        .arg(path)
        .spawn()
        .map(|_| ())
        .map_err(|e| format!("failed to open print image: {}", e))
}

#[cfg(target_os = "linux")]
fn hand_to_os(path: &Path) -> Result<(), String> {
    std::process::Command::new("xdg-open")
        .arg(path)
        .spawn()
        .map(|_| ())
        .map_err(|e| format!("failed to open print image: {}", e))
}
