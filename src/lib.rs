use std::{
    ffi::OsStr, fs, path::{Path, PathBuf}
};

use crate::extension::extension_error;

pub mod compiler;
pub mod extension;

pub use crate::compiler::Glslc;
pub use crate::extension::SpvBuildExtension;


/// Init logging for better error msgs
#[cfg(feature = "logging")]
pub fn init_build_logger() {
    use log::LevelFilter;

    env_logger::builder()
        .filter_level(LevelFilter::Debug)
        .format_timestamp(None)
        .init();
}

/// Source extensions that trigger compilation: compute plus the ray-tracing
/// stages (any-hit, closest-hit, generation, miss). Everything else is skipped.
pub const STAGE_EXTENSIONS: [&str; 5] = ["comp", "rahit", "rchit", "rgen", "rmiss"];

#[derive(Debug, thiserror::Error)]
pub enum SpvBuildError {
    #[error(transparent)]
    IoErr(#[from] std::io::Error),
    #[error(transparent)]
    StripPrefixErr(#[from] std::path::StripPrefixError),
    #[error("shader root `{}` has no directory name to derive the output tree from", .0.display())]
    InvalidRoot(PathBuf),
    #[error("output tree `{}` does not exist, create it before the first run", .0.display())]
    OutputTreeMissing(PathBuf),
    #[error("compiler `{program}` was not found on PATH")]
    CompilerNotFound { program: String },
    #[error("`{command}` failed on `{}` ({status}):\n{stderr}", .source_path.display())]
    CompileFailed {
        command: String,
        source_path: PathBuf,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("Extension {} error: {}", .extension_name, .error)]
    ExtensionErr {
        extension_name: String,
        error: Box<dyn std::error::Error>,
    },
}

/// Build a boxed extension slice for [`compile_shader_tree`]
///
/// ```ignore
/// compile_shader_tree("shaders", Glslc::default(), extensions![SpvBindingsExtension::new("src/spv")?])
/// ```
#[macro_export]
macro_rules! extensions {
    ($($ext:expr),* $(,)?) => {
        &mut [$(::std::boxed::Box::new($ext) as ::std::boxed::Box<dyn $crate::extension::SpvBuildExtension>),*]
    };
}

/// Compile every recognized shader under `shader_path` into the mirrored
/// `<shader_path>-spv` sibling tree, see [`STAGE_EXTENSIONS`] for what is
/// recognized and [`Glslc::output_root`] to override the destination.
///
/// The previous output tree is deleted wholesale before traversal, so a run
/// never leaves stale artifacts behind. That tree must already exist: a
/// missing output tree aborts the run before any compiler is spawned.
///
/// Each invocation is synchronous; the first compiler failure aborts the walk
/// with the compiler's stderr attached.
///
/// ## Args
/// * `shader_path` - Root dir of all your shaders
/// * `glslc` - Compiler configuration, `Glslc::default()` for the stock flags
/// * `extensions` - An array of extensions you would like to run, see [`SpvBuildExtension`]
pub fn compile_shader_tree(
    shader_path: &str,
    mut glslc: Glslc,
    extensions: &mut [Box<dyn SpvBuildExtension>],
) -> Result<(), SpvBuildError> {
    let root = Path::new(shader_path);
    let out_root = output_root_for(root, &glslc)?;

    // stale artifacts are removed wholesale, a missing tree is a hard error
    fs::remove_dir_all(&out_root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SpvBuildError::OutputTreeMissing(out_root.clone()),
        _ => SpvBuildError::IoErr(e),
    })?;

    for ext in extensions.iter_mut() {
        ext.init_root(shader_path, &mut glslc)
            .map_err(|e| extension_error(&**ext, e))?;
    }

    compile_all_in_dir(root, &out_root, root, &glslc, extensions)?;

    for ext in extensions.iter_mut() {
        ext.exit_root(shader_path, &glslc)
            .map_err(|e| extension_error(&**ext, e))?;
    }

    Ok(())
}

/// Sibling of `root` named `<dirname>-spv`, unless overridden on the compiler
fn output_root_for(root: &Path, glslc: &Glslc) -> Result<PathBuf, SpvBuildError> {
    if let Some(out_root) = glslc.output_root_override() {
        return Ok(out_root.to_owned());
    }

    let Some(dir_name) = root.file_name().and_then(OsStr::to_str) else {
        return Err(SpvBuildError::InvalidRoot(root.to_owned()));
    };

    Ok(root
        .parent()
        .unwrap_or(Path::new(""))
        .join(format!("{dir_name}-spv")))
}

fn is_shader_source(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| STAGE_EXTENSIONS.contains(&ext))
}

/// Mirrored artifact path: `out_root` + relative dir + source filename + `.spv`
fn artifact_path(
    root: &Path,
    out_root: &Path,
    source: &Path,
) -> Result<PathBuf, std::path::StripPrefixError> {
    let mut artifact = out_root.join(source.strip_prefix(root)?).into_os_string();
    artifact.push(".spv");
    Ok(PathBuf::from(artifact))
}

fn compile_all_in_dir(
    root: &Path,
    out_root: &Path,
    path: &Path,
    glslc: &Glslc,
    mut extensions: &mut [Box<dyn SpvBuildExtension>],
) -> Result<(), SpvBuildError> {
    for entry in fs::read_dir(path)?.filter_map(|entry| entry.ok()) {
        if entry.metadata()?.is_dir() {
            // recurse per dir so extensions can mirror the mod structure
            let dir_path = entry.path();
            for ext in extensions.iter_mut() {
                ext.enter_mod(&dir_path)
                    .map_err(|e| extension_error(&**ext, e))?;
            }

            compile_all_in_dir(root, out_root, &dir_path, glslc, &mut extensions)?;

            for ext in extensions.iter_mut() {
                ext.exit_mod(&dir_path)
                    .map_err(|e| extension_error(&**ext, e))?;
            }
        } else {
            let entry_path = entry.path();

            if !is_shader_source(&entry_path) {
                continue;
            }
            println!("cargo::rerun-if-changed={}", entry_path.display());

            let spv_path = artifact_path(root, out_root, &entry_path)?;
            if let Some(spv_dir) = spv_path.parent() {
                fs::create_dir_all(spv_dir)?;
            }

            println!("Compiling {}", entry_path.display());
            glslc.compile(&entry_path, &spv_path)?;

            for ext in &mut *extensions {
                ext.post_compile(&entry_path, &spv_path)
                    .map_err(|e| extension_error(&**ext, e))?;
            }
        }
    }

    Ok(())
}
