//! Win32/WGL backend: a hidden window provides the device context the
//! rendering context is created against.

use std::os::raw::c_char;
use std::sync::atomic::{AtomicI32, Ordering};
use std::{mem, ptr};

use winapi::shared::windef::{HDC, HGLRC, HWND};
use winapi::shared::winerror::ERROR_CLASS_ALREADY_EXISTS;
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::libloaderapi::GetModuleHandleW;
use winapi::um::wingdi::{
    wglCreateContext, wglDeleteContext, wglMakeCurrent, ChoosePixelFormat, SetPixelFormat,
    PFD_DRAW_TO_WINDOW, PFD_SUPPORT_OPENGL, PIXELFORMATDESCRIPTOR,
};
use winapi::um::winuser::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, GetDC, RegisterClassW, ReleaseDC,
    UnregisterClassW, CW_USEDEFAULT, WNDCLASSW,
};

use crate::checks::{GlProbe, StringName};
use crate::report::encode_wide;

// glGetString lives in opengl32.dll itself; wglGetProcAddress only resolves
// post-1.1 entry points.
#[link(name = "opengl32")]
extern "system" {
    fn glGetString(name: u32) -> *const c_char;
}

const CLASS_NAME: &str = "webgl-check";

// The format chosen on the first creation is reused for the lifetime of
// the process.
static PIXEL_FORMAT: AtomicI32 = AtomicI32::new(-1);

#[derive(Default)]
pub struct GlContext {
    wnd: Option<HWND>,
    dc: Option<HDC>,
    rc: Option<HGLRC>,
}

impl GlContext {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GlProbe for GlContext {
    fn create_context(&mut self) -> bool {
        let class_name = encode_wide(CLASS_NAME);

        unsafe {
            let instance = GetModuleHandleW(ptr::null());

            let mut wc: WNDCLASSW = mem::zeroed();
            wc.hInstance = instance;
            wc.lpfnWndProc = Some(DefWindowProcW);
            wc.lpszClassName = class_name.as_ptr();
            if RegisterClassW(&wc) == 0 && GetLastError() != ERROR_CLASS_ALREADY_EXISTS {
                return false;
            }

            let wnd = CreateWindowExW(
                0,
                class_name.as_ptr(),
                class_name.as_ptr(),
                0,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                ptr::null_mut(),
                ptr::null_mut(),
                instance,
                ptr::null_mut(),
            );
            if wnd.is_null() {
                return false;
            }
            self.wnd = Some(wnd);

            let dc = GetDC(wnd);
            if dc.is_null() {
                return false;
            }
            self.dc = Some(dc);

            let mut pfd: PIXELFORMATDESCRIPTOR = mem::zeroed();
            let mut format = PIXEL_FORMAT.load(Ordering::Relaxed);
            if format == -1 {
                pfd.nSize = mem::size_of::<PIXELFORMATDESCRIPTOR>() as u16;
                pfd.nVersion = 1;
                pfd.dwFlags = PFD_DRAW_TO_WINDOW | PFD_SUPPORT_OPENGL;
                format = ChoosePixelFormat(dc, &pfd);
                if format == 0 {
                    return false;
                }
                PIXEL_FORMAT.store(format, Ordering::Relaxed);
            }
            if SetPixelFormat(dc, format, &pfd) == 0 {
                return false;
            }

            let rc = wglCreateContext(dc);
            if rc.is_null() {
                return false;
            }
            self.rc = Some(rc);

            wglMakeCurrent(dc, rc) != 0
        }
    }

    fn destroy_context(&mut self) {
        unsafe {
            if let Some(rc) = self.rc.take() {
                wglMakeCurrent(ptr::null_mut(), ptr::null_mut());
                wglDeleteContext(rc);
            }
            if let (Some(wnd), Some(dc)) = (self.wnd, self.dc.take()) {
                ReleaseDC(wnd, dc);
            }
            if let Some(wnd) = self.wnd.take() {
                DestroyWindow(wnd);
            }
            let class_name = encode_wide(CLASS_NAME);
            UnregisterClassW(class_name.as_ptr(), GetModuleHandleW(ptr::null()));
        }
    }

    fn gl_string(&self, name: StringName) -> Option<String> {
        if self.rc.is_none() {
            return None;
        }
        unsafe { super::gl_string_from_ptr(glGetString(super::string_enum(name))) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destroy_without_create_is_a_no_op() {
        let mut ctx = GlContext::new();
        ctx.destroy_context();
        ctx.destroy_context();
        assert!(ctx.gl_string(StringName::Version).is_none());
    }
}
