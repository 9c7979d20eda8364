use std::path::{Path, PathBuf};
use std::process::Command;

use itertools::Itertools;

use crate::SpvBuildError;

/// Configuration for the external `glslc` invocation.
///
/// The defaults reproduce the stock command line:
/// `glslc <source> -o <artifact> --target-env=vulkan1.3 -I ./`
#[derive(Debug, Clone)]
pub struct Glslc {
    program: String,
    target_env: String,
    include_dir: PathBuf,
    extra_args: Vec<String>,
    output_root: Option<PathBuf>,
}

impl Default for Glslc {
    fn default() -> Self {
        Self {
            program: "glslc".to_owned(),
            target_env: "vulkan1.3".to_owned(),
            include_dir: PathBuf::from("./"),
            extra_args: Vec::new(),
            output_root: None,
        }
    }
}

impl Glslc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different compiler binary, e.g. an absolute path to a vendored `glslc`
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn target_env(mut self, target_env: impl Into<String>) -> Self {
        self.target_env = target_env.into();
        self
    }

    pub fn include_dir(mut self, include_dir: impl Into<PathBuf>) -> Self {
        self.include_dir = include_dir.into();
        self
    }

    /// Extra flags appended to every invocation, e.g. `-g` or `-O`
    pub fn extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Write artifacts here instead of the derived `<root>-spv` sibling tree
    pub fn output_root(mut self, out_root: impl Into<PathBuf>) -> Self {
        self.output_root = Some(out_root.into());
        self
    }

    pub(crate) fn output_root_override(&self) -> Option<&Path> {
        self.output_root.as_deref()
    }

    /// Whether the configured compiler binary can be spawned at all.
    ///
    /// Lets build scripts skip shader compilation with a `cargo::warning`
    /// instead of failing the whole build on machines without `glslc`.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .is_ok_and(|out| out.status.success())
    }

    /// Compile one shader, blocking until the compiler exits.
    ///
    /// A non-zero exit becomes [`SpvBuildError::CompileFailed`] with the
    /// compiler's stderr attached, it is never silently dropped.
    pub fn compile(&self, source: &Path, artifact: &Path) -> Result<(), SpvBuildError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(source)
            .arg("-o")
            .arg(artifact)
            .arg(format!("--target-env={}", self.target_env))
            .arg("-I")
            .arg(&self.include_dir)
            .args(&self.extra_args);

        let out = cmd.output().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SpvBuildError::CompilerNotFound {
                program: self.program.clone(),
            },
            _ => SpvBuildError::IoErr(e),
        })?;

        if !out.status.success() {
            return Err(SpvBuildError::CompileFailed {
                command: format!(
                    "{} {}",
                    self.program,
                    cmd.get_args().map(|arg| arg.to_string_lossy()).format(" "),
                ),
                source_path: source.to_owned(),
                status: out.status,
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            });
        }

        Ok(())
    }
}
