//! X11/GLX backend. Xlib and libGL are dlopened rather than linked so the
//! binary still starts on a machine with no X installation at all; that
//! machine simply fails the context check, which is the diagnosis.

use std::ffi::CString;
use std::os::raw::{c_char, c_uint, c_ulong};
use std::{mem, ptr};

use tracing::debug;
use x11_dl::glx::{Glx, GLXContext, GLX_DOUBLEBUFFER, GLX_RGBA};
use x11_dl::xlib::{
    AllocNone, CWBorderPixel, CWColormap, Colormap, Display, InputOutput, Window,
    XSetWindowAttributes, XVisualInfo, Xlib,
};

use crate::checks::{GlProbe, StringName};

type GlGetString = unsafe extern "C" fn(c_uint) -> *const c_char;

#[derive(Default)]
pub struct GlContext {
    display_name: Option<CString>,
    libs: Option<(Xlib, Glx)>,
    dpy: Option<*mut Display>,
    vi: Option<*mut XVisualInfo>,
    ctx: Option<GLXContext>,
    wnd: Option<Window>,
    cmap: Option<Colormap>,
    get_string: Option<GlGetString>,
}

impl GlContext {
    /// Connects to the default display (`$DISPLAY`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects to a specific display instead of the default one.
    pub fn with_display(name: &str) -> Self {
        Self { display_name: CString::new(name).ok(), ..Self::default() }
    }
}

impl GlProbe for GlContext {
    fn create_context(&mut self) -> bool {
        match (Xlib::open(), Glx::open()) {
            (Ok(xlib), Ok(glx)) => self.libs = Some((xlib, glx)),
            (xlib, glx) => {
                debug!(
                    "could not load X libraries: xlib {:?}, glx {:?}",
                    xlib.err(),
                    glx.err()
                );
                return false;
            }
        }
        let Some((xlib, glx)) = self.libs.as_ref() else {
            return false;
        };

        unsafe {
            let name = self.display_name.as_ref().map_or(ptr::null(), |n| n.as_ptr());
            let dpy = (xlib.XOpenDisplay)(name);
            if dpy.is_null() {
                return false;
            }
            self.dpy = Some(dpy);

            let mut error_base = 0;
            let mut event_base = 0;
            if (glx.glXQueryExtension)(dpy, &mut error_base, &mut event_base) == 0 {
                return false;
            }

            let mut attribs = [GLX_RGBA, GLX_DOUBLEBUFFER, 0];
            let screen = (xlib.XDefaultScreen)(dpy);
            let vi = (glx.glXChooseVisual)(dpy, screen, attribs.as_mut_ptr());
            if vi.is_null() {
                return false;
            }
            self.vi = Some(vi);

            let ctx = (glx.glXCreateContext)(dpy, vi, ptr::null_mut(), 1);
            if ctx.is_null() {
                return false;
            }
            self.ctx = Some(ctx);

            let root = (xlib.XRootWindow)(dpy, (*vi).screen);
            let cmap = (xlib.XCreateColormap)(dpy, root, (*vi).visual, AllocNone);
            self.cmap = Some(cmap);

            let mut swa: XSetWindowAttributes = mem::zeroed();
            swa.border_pixel = 0;
            swa.colormap = cmap;
            let wnd = (xlib.XCreateWindow)(
                dpy,
                root,
                0,
                0,
                1,
                1,
                0,
                (*vi).depth,
                InputOutput as c_uint,
                (*vi).visual,
                (CWBorderPixel | CWColormap) as c_ulong,
                &mut swa,
            );
            if wnd == 0 {
                return false;
            }
            self.wnd = Some(wnd);

            if (glx.glXMakeCurrent)(dpy, wnd, ctx) == 0 {
                return false;
            }

            self.get_string = mem::transmute::<Option<unsafe extern "C" fn()>, Option<GlGetString>>(
                (glx.glXGetProcAddressARB)(b"glGetString\0".as_ptr()),
            );
            self.get_string.is_some()
        }
    }

    fn destroy_context(&mut self) {
        self.get_string = None;
        let Some((xlib, glx)) = self.libs.as_ref() else {
            return;
        };

        unsafe {
            if let Some(dpy) = self.dpy {
                if let Some(ctx) = self.ctx.take() {
                    (glx.glXDestroyContext)(dpy, ctx);
                }
                if let Some(wnd) = self.wnd.take() {
                    (xlib.XDestroyWindow)(dpy, wnd);
                }
                if let Some(cmap) = self.cmap.take() {
                    (xlib.XFreeColormap)(dpy, cmap);
                }
            }
            if let Some(vi) = self.vi.take() {
                (xlib.XFree)(vi.cast());
            }
            if let Some(dpy) = self.dpy.take() {
                (xlib.XCloseDisplay)(dpy);
            }
        }
    }

    fn gl_string(&self, name: StringName) -> Option<String> {
        let get_string = self.get_string?;
        unsafe { super::gl_string_from_ptr(get_string(super::string_enum(name))) }
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

    #[test]
    fn display_name_is_stored_as_c_string() {
        let ctx = GlContext::with_display(":1");
        assert_eq!(ctx.display_name.as_deref(), Some(c":1"));
    }
}
