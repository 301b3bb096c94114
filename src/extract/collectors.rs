use std::path::Path;

use crate::color::ColorService;

use super::{git, system};

/// Sources of data that does not come from the host document.
///
/// Each method returns `None` when the value is unavailable, for whatever
/// reason (missing tool, timeout, unsupported platform). The defaults report
/// nothing, so an implementation only overrides what it can supply.
pub trait Collectors {
    fn git_branch(&self, _cwd: &Path) -> Option<String> {
        None
    }

    fn git_status(&self, _cwd: &Path) -> Option<String> {
        None
    }

    fn pr_status(&self, _cwd: &Path) -> Option<String> {
        None
    }

    fn cpu_usage(&self) -> Option<String> {
        None
    }

    fn memory_usage(&self) -> Option<String> {
        None
    }

    fn battery(&self) -> Option<String> {
        None
    }

    fn python_version(&self) -> Option<String> {
        None
    }

    fn python_venv(&self) -> Option<String> {
        None
    }

    fn datetime(&self) -> Option<String> {
        None
    }
}

/// Collects nothing. Used for previews and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl Collectors for Offline {}

/// The real probes: git, procfs/sysfs, python, wall clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemCollectors {
    colors: ColorService,
}

impl SystemCollectors {
    pub fn new(colors: ColorService) -> Self {
        Self { colors }
    }
}

impl Collectors for SystemCollectors {
    fn git_branch(&self, cwd: &Path) -> Option<String> {
        git::branch(cwd)
    }

    fn git_status(&self, cwd: &Path) -> Option<String> {
        git::status(cwd, &self.colors)
    }

    fn pr_status(&self, cwd: &Path) -> Option<String> {
        git::pr_status(cwd)
    }

    fn cpu_usage(&self) -> Option<String> {
        system::cpu_usage()
    }

    fn memory_usage(&self) -> Option<String> {
        system::memory_usage()
    }

    fn battery(&self) -> Option<String> {
        system::battery()
    }

    fn python_version(&self) -> Option<String> {
        system::python_version()
    }

    fn python_venv(&self) -> Option<String> {
        system::python_venv()
    }

    fn datetime(&self) -> Option<String> {
        system::datetime()
    }
}
