//! Dependency installation through pip
//!
//! Subprocesses go through [`CommandRunner`] so the install step can be
//! observed without touching the host Python.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::error::{PackageError, Result};

/// Interpreter used when none is given
pub const DEFAULT_PYTHON: &str = if cfg!(windows) { "python" } else { "python3" };

/// Virtual environment location, relative to the output directory
pub const VENV_DIR: &str = "venv";

/// Runs an external program to completion
pub trait CommandRunner {
    fn run(&self, program: &OsStr, args: &[&OsStr]) -> Result<()>;
}

/// Runs commands on the host, inheriting stdout/stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &OsStr, args: &[&OsStr]) -> Result<()> {
        let program_name = program.to_string_lossy().into_owned();
        tracing::debug!(
            "Running: {program_name} {}",
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| PackageError::Spawn {
                program: program_name.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(PackageError::CommandFailed {
                program: program_name,
                status: status.to_string(),
            })
        }
    }
}

/// pip executable inside a virtual environment
///
/// Windows venvs use `Scripts\pip.exe`, everything else `bin/pip`.
pub fn venv_pip_path(venv: &Path, windows: bool) -> PathBuf {
    if windows {
        venv.join("Scripts").join("pip.exe")
    } else {
        venv.join("bin").join("pip")
    }
}

/// Install `requirements` with the interpreter's own pip
pub fn install_global<R: CommandRunner>(runner: &R, python: &OsStr, requirements: &Path) -> Result<()> {
    tracing::info!("Installing dependencies into the current Python environment");
    runner.run(
        python,
        &[
            OsStr::new("-m"),
            OsStr::new("pip"),
            OsStr::new("install"),
            OsStr::new("-r"),
            requirements.as_os_str(),
        ],
    )
}

/// Create `<output>/venv` and install `requirements` into it
pub fn install_venv<R: CommandRunner>(
    runner: &R,
    python: &OsStr,
    output_dir: &Path,
    requirements: &Path,
) -> Result<()> {
    let venv = output_dir.join(VENV_DIR);
    tracing::info!("Creating virtual environment: {}", venv.display());
    runner.run(
        python,
        &[OsStr::new("-m"), OsStr::new("venv"), venv.as_os_str()],
    )?;

    let pip: OsString = venv_pip_path(&venv, cfg!(windows)).into_os_string();
    tracing::info!("Installing dependencies into the virtual environment");
    runner.run(
        &pip,
        &[
            OsStr::new("install"),
            OsStr::new("-r"),
            requirements.as_os_str(),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venv_pip_path_by_os_family() {
        let venv = Path::new("dist").join("venv");
        assert_eq!(
            venv_pip_path(&venv, true),
            venv.join("Scripts").join("pip.exe")
        );
        assert_eq!(venv_pip_path(&venv, false), venv.join("bin").join("pip"));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_status() {
        assert!(SystemRunner.run(OsStr::new("true"), &[]).is_ok());

        let err = SystemRunner.run(OsStr::new("false"), &[]).unwrap_err();
        assert!(matches!(err, PackageError::CommandFailed { ref program, .. } if program == "false"));
    }

    #[test]
    fn test_system_runner_spawn_failure() {
        let err = SystemRunner
            .run(OsStr::new("no-such-program-for-packager-tests"), &[])
            .unwrap_err();
        assert!(matches!(
            err,
            PackageError::Spawn { ref program, .. } if program == "no-such-program-for-packager-tests"
        ));
    }
}
