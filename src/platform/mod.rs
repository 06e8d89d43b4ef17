//! Native context backends. Exactly one of these compiles for a given
//! target; they are selected at build time, never at runtime.

#[cfg(windows)]
mod wgl;
#[cfg(windows)]
pub use wgl::GlContext;

#[cfg(target_os = "macos")]
mod cgl;
#[cfg(target_os = "macos")]
pub use cgl::GlContext;

#[cfg(all(unix, not(target_os = "macos")))]
mod glx;
#[cfg(all(unix, not(target_os = "macos")))]
pub use glx::GlContext;

use std::ffi::CStr;
use std::os::raw::c_char;

use crate::checks::StringName;

const GL_VENDOR: u32 = 0x1F00;
const GL_RENDERER: u32 = 0x1F01;
const GL_VERSION: u32 = 0x1F02;
const GL_SHADING_LANGUAGE_VERSION: u32 = 0x8B8C;

fn string_enum(name: StringName) -> u32 {
    match name {
        StringName::Vendor => GL_VENDOR,
        StringName::Renderer => GL_RENDERER,
        StringName::Version => GL_VERSION,
        StringName::ShadingLanguageVersion => GL_SHADING_LANGUAGE_VERSION,
    }
}

/// A null pointer means the driver had nothing to say, which callers treat
/// differently from an empty string.
unsafe fn gl_string_from_ptr(s: *const c_char) -> Option<String> {
    (!s.is_null()).then(|| CStr::from_ptr(s).to_string_lossy().into_owned())
}
