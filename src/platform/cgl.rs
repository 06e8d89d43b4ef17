//! macOS backend over CGL, the windowless context API in OpenGL.framework.
//! No window or surface is involved; the context only needs to be current
//! so the driver strings can be read.

use std::os::raw::{c_char, c_int, c_void};
use std::ptr;

use crate::checks::{GlProbe, StringName};

type CGLPixelFormatObj = *mut c_void;
type CGLContextObj = *mut c_void;
type CGLPixelFormatAttribute = c_int;
type CGLError = c_int;

const PFA_COLOR_SIZE: CGLPixelFormatAttribute = 8;
const PFA_ALPHA_SIZE: CGLPixelFormatAttribute = 11;

#[link(name = "OpenGL", kind = "framework")]
extern "C" {
    fn CGLChoosePixelFormat(
        attribs: *const CGLPixelFormatAttribute,
        pix: *mut CGLPixelFormatObj,
        npix: *mut c_int,
    ) -> CGLError;
    fn CGLDestroyPixelFormat(pix: CGLPixelFormatObj) -> CGLError;
    fn CGLCreateContext(
        pix: CGLPixelFormatObj,
        share: CGLContextObj,
        ctx: *mut CGLContextObj,
    ) -> CGLError;
    fn CGLDestroyContext(ctx: CGLContextObj) -> CGLError;
    fn CGLGetCurrentContext() -> CGLContextObj;
    fn CGLSetCurrentContext(ctx: CGLContextObj) -> CGLError;
    fn glGetString(name: u32) -> *const c_char;
}

#[derive(Default)]
pub struct GlContext {
    ctx: Option<CGLContextObj>,
    // Whatever was current before creation; may be null. Teardown puts it
    // back.
    prev: Option<CGLContextObj>,
}

impl GlContext {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GlProbe for GlContext {
    fn create_context(&mut self) -> bool {
        unsafe {
            let attribs = [PFA_COLOR_SIZE, 24, PFA_ALPHA_SIZE, 8, 0];
            let mut pix: CGLPixelFormatObj = ptr::null_mut();
            let mut npix: c_int = 0;
            if CGLChoosePixelFormat(attribs.as_ptr(), &mut pix, &mut npix) != 0 || pix.is_null() {
                return false;
            }

            let mut ctx: CGLContextObj = ptr::null_mut();
            let err = CGLCreateContext(pix, ptr::null_mut(), &mut ctx);
            // The format object is only needed to build the context.
            CGLDestroyPixelFormat(pix);
            if err != 0 || ctx.is_null() {
                return false;
            }
            self.ctx = Some(ctx);

            self.prev = Some(CGLGetCurrentContext());
            CGLSetCurrentContext(ctx) == 0
        }
    }

    fn destroy_context(&mut self) {
        unsafe {
            if let Some(prev) = self.prev.take() {
                CGLSetCurrentContext(prev);
            }
            if let Some(ctx) = self.ctx.take() {
                CGLDestroyContext(ctx);
            }
        }
    }

    fn gl_string(&self, name: StringName) -> Option<String> {
        if self.ctx.is_none() {
            return None;
        }
        unsafe { super::gl_string_from_ptr(glGetString(super::string_enum(name))) }
    }
}
