//! Packager: stages the backend source tree for distribution
//!
//! A run is clean → copy → install, each step toggleable. The first failing
//! step aborts the rest; nothing is rolled back, so the output directory may be
//! left partially populated.

mod cli;
mod copy;
mod deps;
mod error;
mod exclude;

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

pub use cli::PackageArgs;
pub use copy::copy_tree;
pub use deps::{venv_pip_path, CommandRunner, SystemRunner, DEFAULT_PYTHON, VENV_DIR};
pub use error::{PackageError, Result};
pub use exclude::{ExclusionRule, ExclusionSet, DEFAULT_EXCLUDES};

/// Which steps a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageOptions {
    pub clean: bool,
    pub copy_files: bool,
    pub install_deps: bool,
    pub use_venv: bool,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            clean: true,
            copy_files: true,
            install_deps: false,
            use_venv: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Packager<R = SystemRunner> {
    source_dir: PathBuf,
    output_dir: PathBuf,
    requirements_file: PathBuf,
    python: OsString,
    exclusions: ExclusionSet,
    runner: R,
}

impl Packager<SystemRunner> {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        requirements_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            requirements_file: requirements_file.into(),
            python: OsString::from(DEFAULT_PYTHON),
            exclusions: ExclusionSet::default(),
            runner: SystemRunner,
        }
    }
}

impl<R: CommandRunner> Packager<R> {
    /// Swap the subprocess runner
    pub fn with_runner<T: CommandRunner>(self, runner: T) -> Packager<T> {
        Packager {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            requirements_file: self.requirements_file,
            python: self.python,
            exclusions: self.exclusions,
            runner,
        }
    }

    #[must_use]
    pub fn with_python(mut self, python: impl Into<OsString>) -> Self {
        self.python = python.into();
        self
    }

    #[must_use]
    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Remove the output directory if present, then recreate it empty
    pub fn clean_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            tracing::info!("Cleaning output directory: {}", self.output_dir.display());
            fs::remove_dir_all(&self.output_dir).map_err(PackageError::io(&self.output_dir))?;
        }
        fs::create_dir_all(&self.output_dir).map_err(PackageError::io(&self.output_dir))
    }

    /// Copy every non-excluded entry of the source tree into the output
    pub fn copy_tree(&self) -> Result<usize> {
        tracing::info!(
            "Copying files from {} to {}",
            self.source_dir.display(),
            self.output_dir.display()
        );
        let copied = copy_tree(&self.source_dir, &self.output_dir, &self.exclusions)?;
        tracing::info!("Copied {copied} file(s)");
        Ok(copied)
    }

    /// Install the manifest with pip; a missing manifest is only a warning
    pub fn install_dependencies(&self, use_venv: bool) -> Result<()> {
        if !self.requirements_file.exists() {
            tracing::warn!(
                "Requirements file not found: {}",
                self.requirements_file.display()
            );
            return Ok(());
        }

        tracing::info!(
            "Installing dependencies from {}",
            self.requirements_file.display()
        );
        if use_venv {
            deps::install_venv(
                &self.runner,
                &self.python,
                &self.output_dir,
                &self.requirements_file,
            )
        } else {
            deps::install_global(&self.runner, &self.python, &self.requirements_file)
        }
    }

    /// Run the enabled steps, reporting any failure; true on success
    pub fn package(&self, options: PackageOptions) -> bool {
        tracing::info!("Starting packaging");
        match self.run_steps(options) {
            Ok(()) => {
                tracing::info!("Packaging completed");
                true
            }
            Err(e) => {
                tracing::error!("Packaging failed: {e}");
                false
            }
        }
    }

    fn run_steps(&self, options: PackageOptions) -> Result<()> {
        if options.clean {
            self.clean_output()?;
        }
        if options.copy_files {
            self.copy_tree()?;
        }
        if options.install_deps {
            self.install_dependencies(options.use_venv)?;
        }
        Ok(())
    }
}
