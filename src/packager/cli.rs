use clap::Parser;
use std::path::PathBuf;

use super::deps::DEFAULT_PYTHON;
use super::exclude::ExclusionSet;
use super::{PackageOptions, Packager};

#[derive(Debug, Clone, Parser)]
#[command(name = "packager")]
#[command(about = "Stage the backend sources for distribution")]
pub struct PackageArgs {
    /// Backend source directory
    #[arg(long, default_value = "../backend")]
    pub source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "../dist-python")]
    pub output: PathBuf,

    /// Requirements manifest
    #[arg(long, default_value = "../backend/requirements.txt")]
    pub requirements: PathBuf,

    /// Keep the existing output directory
    #[arg(long)]
    pub no_clean: bool,

    /// Skip copying source files
    #[arg(long)]
    pub no_copy: bool,

    /// Install dependencies from the manifest
    #[arg(long)]
    pub install_deps: bool,

    /// Install into a virtual environment under the output directory
    #[arg(long)]
    pub use_venv: bool,

    /// Python interpreter used for pip and venv
    #[arg(long, default_value = DEFAULT_PYTHON)]
    pub python: String,

    /// Extra exclusion pattern (name or `*.ext`), repeatable
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub extra_excludes: Vec<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl PackageArgs {
    pub const fn options(&self) -> PackageOptions {
        PackageOptions {
            clean: !self.no_clean,
            copy_files: !self.no_copy,
            install_deps: self.install_deps,
            use_venv: self.use_venv,
        }
    }

    pub fn packager(&self) -> Packager {
        Packager::new(&self.source, &self.output, &self.requirements)
            .with_python(&self.python)
            .with_exclusions(ExclusionSet::default().extend(&self.extra_excludes))
    }
}
