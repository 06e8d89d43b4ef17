bitflags::bitflags! {
    /// Which acknowledgement buttons a report offers, and which one the
    /// user pressed. The empty set means no button at all.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ButtonSet: u8 {
        const OK = 1 << 1;
        const YES = 1 << 2;
        const NO = 1 << 3;
    }
}

#[cfg(windows)]
pub fn report_info(title: &str, msg: &str, buttons: ButtonSet) -> ButtonSet {
    use std::ptr;

    use winapi::um::winuser::{MessageBoxW, IDNO, IDOK, IDYES, MB_OK, MB_YESNO};

    let mut style = 0;
    if buttons.intersects(ButtonSet::YES | ButtonSet::NO) {
        style |= MB_YESNO;
    }
    if buttons.contains(ButtonSet::OK) {
        style |= MB_OK;
    }

    let title = encode_wide(title);
    let msg = encode_wide(msg);
    let pressed = unsafe { MessageBoxW(ptr::null_mut(), msg.as_ptr(), title.as_ptr(), style) };

    match pressed {
        IDOK => ButtonSet::OK,
        IDYES => ButtonSet::YES,
        IDNO => ButtonSet::NO,
        _ => ButtonSet::empty(),
    }
}

/// Opens the URL in the user's default handler.
#[cfg(windows)]
pub fn open_url(url: &str) {
    use std::ptr;

    use winapi::um::shellapi::ShellExecuteW;
    use winapi::um::winuser::SW_SHOWNORMAL;

    let operation = encode_wide("open");
    let url = encode_wide(url);
    unsafe {
        ShellExecuteW(
            ptr::null_mut(),
            operation.as_ptr(),
            url.as_ptr(),
            ptr::null(),
            ptr::null(),
            SW_SHOWNORMAL,
        );
    }
}

#[cfg(windows)]
pub(crate) fn encode_wide(s: &str) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;

    std::ffi::OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
}

/// Without a GUI front end to lean on, the report degrades to the console
/// and no button is ever pressed.
#[cfg(not(windows))]
pub fn report_info(_title: &str, msg: &str, _buttons: ButtonSet) -> ButtonSet {
    println!("{msg}");
    ButtonSet::empty()
}

#[cfg(not(windows))]
pub fn open_url(url: &str) {
    report_info("URL", url, ButtonSet::OK);
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;

    #[test]
    fn console_fallback_presses_no_button() {
        assert_eq!(report_info("Title", "message", ButtonSet::OK), ButtonSet::empty());
        assert_eq!(
            report_info("Title", "message", ButtonSet::YES | ButtonSet::NO),
            ButtonSet::empty()
        );
    }

    #[test]
    fn open_url_degrades_to_a_report() {
        // Must not try to spawn anything on a headless box.
        open_url("https://get.webgl.org/");
    }
}
