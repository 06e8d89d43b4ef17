use std::fmt;

/// A driver-reported version pair. Ordering is numeric on major, then
/// minor, so 1.9 < 2.0 and 1.3 < 1.20.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct GlVersion {
    pub major: u32,
    pub minor: u32,
}

impl GlVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Parses a leading `<digits>.<digits>` prefix out of a free-form driver
/// string. Anything after the minor number is ignored. Both components must
/// be present: a missing minor number is a parse failure, not version M.0,
/// which keeps "no version reported" distinct from "version 0.0".
pub fn parse_version(text: &str) -> Option<GlVersion> {
    let (major, rest) = take_number(text.trim_start())?;
    let (minor, _) = take_number(rest.strip_prefix('.')?)?;
    Some(GlVersion::new(major, minor))
}

fn take_number(s: &str) -> Option<(u32, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some((s[..end].parse().ok()?, &s[end..]))
}
