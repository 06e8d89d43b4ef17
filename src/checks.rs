use tracing::{error, info, warn};

use crate::report::{self, ButtonSet};
use crate::version::{parse_version, GlVersion};

pub const REQUIRED_GL: GlVersion = GlVersion::new(2, 0);
pub const REQUIRED_GLSL: GlVersion = GlVersion::new(1, 20);

/// Driver strings a check can ask the backend for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StringName {
    Version,
    ShadingLanguageVersion,
    Vendor,
    Renderer,
}

/// The three-operation surface of a platform context backend. Exactly one
/// concrete implementation is compiled per target; tests substitute a fake.
pub trait GlProbe {
    /// Runs the platform's context bring-up sequence, populating handles as
    /// it goes. On failure the probe keeps whatever subset it had acquired;
    /// the caller must still follow up with `destroy_context`.
    fn create_context(&mut self) -> bool;

    /// Releases every acquired handle, in reverse acquisition order. Safe
    /// after a failed creation and safe to call more than once.
    fn destroy_context(&mut self);

    /// Queries a driver string from the current context. `None` means the
    /// driver returned nothing, which is not the same as an empty string.
    fn gl_string(&self, name: StringName) -> Option<String>;
}

/// `Warning` is never produced by the current checks; the runner logs it
/// and keeps going, leaving room for soft-failure checks later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    Warning,
    Fail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Passed,
    Failed { check: &'static str },
}

/// Runs the checks strictly in order, stopping at the first failure. A
/// failed run always releases whatever context the earlier checks acquired.
pub fn run_checks<P: GlProbe>(probe: &mut P) -> RunStatus {
    run_check_list(
        probe,
        &[
            ("context init", check_init::<P>),
            ("gl version", check_gl_version::<P>),
            ("shading language version", check_shading_version::<P>),
            ("context teardown", check_destroy::<P>),
        ],
    )
}

fn run_check_list<P: GlProbe>(
    probe: &mut P,
    checks: &[(&'static str, fn(&mut P) -> CheckOutcome)],
) -> RunStatus {
    for &(name, check) in checks {
        match check(probe) {
            CheckOutcome::Pass => {}
            CheckOutcome::Warning => warn!("check \"{name}\" passed with a warning"),
            CheckOutcome::Fail => {
                error!("check \"{name}\" failed");
                probe.destroy_context();
                return RunStatus::Failed { check: name };
            }
        }
    }

    RunStatus::Passed
}

fn check_init<P: GlProbe>(probe: &mut P) -> CheckOutcome {
    if !probe.create_context() {
        report::report_info("Error", "Error: CreateContext failed.", ButtonSet::OK);
        probe.destroy_context();
        return CheckOutcome::Fail;
    }

    if let Some(vendor) = probe.gl_string(StringName::Vendor) {
        info!("Vendor: {vendor}");
    }
    if let Some(renderer) = probe.gl_string(StringName::Renderer) {
        info!("Renderer: {renderer}");
    }

    CheckOutcome::Pass
}

fn check_gl_version<P: GlProbe>(probe: &mut P) -> CheckOutcome {
    check_version_string(probe, StringName::Version, "GL_VERSION", "GL version", REQUIRED_GL)
}

fn check_shading_version<P: GlProbe>(probe: &mut P) -> CheckOutcome {
    check_version_string(
        probe,
        StringName::ShadingLanguageVersion,
        "GL_SHADING_LANGUAGE_VERSION",
        "GL shading language version",
        REQUIRED_GLSL,
    )
}

fn check_destroy<P: GlProbe>(probe: &mut P) -> CheckOutcome {
    probe.destroy_context();
    CheckOutcome::Pass
}

fn check_version_string<P: GlProbe>(
    probe: &mut P,
    name: StringName,
    query: &str,
    label: &str,
    required: GlVersion,
) -> CheckOutcome {
    let Some(reported) = probe.gl_string(name) else {
        report::report_info("Error", &format!("Error: Couldn't get {query}."), ButtonSet::OK);
        return CheckOutcome::Fail;
    };

    let Some(version) = parse_version(&reported) else {
        report::report_info("Error", &format!("Unable to parse {label}: {reported}"), ButtonSet::OK);
        return CheckOutcome::Fail;
    };

    if version < required {
        report::report_info(
            "Error",
            &format!("Require {label} {required}, have version {version}"),
            ButtonSet::OK,
        );
        return CheckOutcome::Fail;
    }

    info!("{label}: {reported}");
    CheckOutcome::Pass
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Scriptable stand-in for a platform backend. `fail_create_at` aborts
    /// the creation sequence after acquiring that many fake handles, the
    /// way a real backend stops mid-sequence.
    #[derive(Default)]
    struct FakeProbe {
        fail_create_at: Option<usize>,
        version: Option<&'static str>,
        shading: Option<&'static str>,
        handles: Vec<&'static str>,
        destroy_calls: usize,
        queried: RefCell<Vec<StringName>>,
    }

    impl FakeProbe {
        fn with_strings(version: &'static str, shading: &'static str) -> Self {
            Self { version: Some(version), shading: Some(shading), ..Self::default() }
        }
    }

    impl GlProbe for FakeProbe {
        fn create_context(&mut self) -> bool {
            for (step, handle) in ["display", "visual", "context", "window"].into_iter().enumerate() {
                if self.fail_create_at == Some(step) {
                    return false;
                }
                self.handles.push(handle);
            }
            true
        }

        fn destroy_context(&mut self) {
            self.destroy_calls += 1;
            self.handles.clear();
        }

        fn gl_string(&self, name: StringName) -> Option<String> {
            self.queried.borrow_mut().push(name);
            match name {
                StringName::Version => self.version.map(str::to_owned),
                StringName::ShadingLanguageVersion => self.shading.map(str::to_owned),
                StringName::Vendor => Some("Fake Vendor".to_owned()),
                StringName::Renderer => Some("Fake Renderer".to_owned()),
            }
        }
    }

    #[test]
    fn all_checks_pass_on_capable_driver() {
        let mut probe = FakeProbe::with_strings("2.1.0 NVIDIA 390.x", "1.30 NVIDIA");
        assert_eq!(run_checks(&mut probe), RunStatus::Passed);
        assert!(probe.handles.is_empty());
        assert_eq!(probe.destroy_calls, 1);
    }

    #[test]
    fn old_gl_version_fails_and_skips_later_checks() {
        let mut probe = FakeProbe::with_strings("1.5.8", "1.30");
        assert_eq!(run_checks(&mut probe), RunStatus::Failed { check: "gl version" });
        assert!(!probe.queried.borrow().contains(&StringName::ShadingLanguageVersion));
    }

    #[test]
    fn old_shading_version_fails() {
        let mut probe = FakeProbe::with_strings("2.1", "1.10");
        assert_eq!(
            run_checks(&mut probe),
            RunStatus::Failed { check: "shading language version" }
        );
    }

    #[test]
    fn exact_required_versions_pass() {
        let mut probe = FakeProbe::with_strings("2.0", "1.20");
        assert_eq!(run_checks(&mut probe), RunStatus::Passed);
    }

    #[test]
    fn missing_version_string_fails() {
        let mut probe = FakeProbe { shading: Some("1.30"), ..FakeProbe::default() };
        assert_eq!(run_checks(&mut probe), RunStatus::Failed { check: "gl version" });
    }

    #[test]
    fn garbage_version_string_fails() {
        let mut probe = FakeProbe::with_strings("not a version", "1.30");
        assert_eq!(run_checks(&mut probe), RunStatus::Failed { check: "gl version" });
    }

    #[test]
    fn failed_creation_stops_the_run_and_still_destroys() {
        for step in 0..4 {
            let mut probe = FakeProbe {
                fail_create_at: Some(step),
                version: Some("2.1"),
                shading: Some("1.30"),
                ..FakeProbe::default()
            };
            assert_eq!(run_checks(&mut probe), RunStatus::Failed { check: "context init" });
            // check_init destroys on failure and the runner destroys again;
            // the partial handle set must be released either way.
            assert_eq!(probe.destroy_calls, 2);
            assert!(probe.handles.is_empty());
            assert!(probe.queried.borrow().is_empty());
        }
    }

    #[test]
    fn warning_is_logged_but_does_not_stop_the_run() {
        let soft_checks: [(&'static str, fn(&mut FakeProbe) -> CheckOutcome); 3] = [
            ("context init", check_init::<FakeProbe>),
            ("soft check", |_| CheckOutcome::Warning),
            ("context teardown", check_destroy::<FakeProbe>),
        ];

        let mut probe = FakeProbe::with_strings("2.1", "1.30");
        assert_eq!(run_check_list(&mut probe, &soft_checks), RunStatus::Passed);
        // The teardown check after the warning still ran.
        assert_eq!(probe.destroy_calls, 1);
        assert!(probe.handles.is_empty());
    }

    #[test]
    fn failed_run_releases_the_context() {
        let mut probe = FakeProbe::with_strings("1.5.8", "1.30");
        run_checks(&mut probe);
        assert!(probe.handles.is_empty());
        assert!(probe.destroy_calls >= 1);
    }
}
