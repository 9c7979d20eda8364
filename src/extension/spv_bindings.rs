#![cfg(feature = "spv_bindings_ext")]

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::compiler::Glslc;
use crate::extension::SpvBuildExtension;

/// Generate a Rust module tree that embeds each compiled artifact with
/// `include_bytes!`, so shaders are loaded with `spv::pathtrace::trace_rgen::SPV`
/// instead of runtime file reads.
///
/// One `mod.rs` is maintained per shader directory, mirroring the source tree.
pub struct SpvBindingsExtension {
    /// Open `mod.rs` writers, root first, innermost module last
    mod_files: Vec<BufWriter<File>>,
    /// Dirs backing `mod_files`, kept in lockstep
    mod_dirs: Vec<PathBuf>,
}

impl SpvBindingsExtension {
    /// `binding_root_path` is where the rust bindings for shaders are written
    pub fn new(binding_root_path: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let binding_root_path = binding_root_path.into();
        fs::create_dir_all(&binding_root_path)?;

        let root_mod_file = BufWriter::new(File::create(binding_root_path.join("mod.rs"))?);

        Ok(Self {
            mod_files: vec![root_mod_file],
            mod_dirs: vec![binding_root_path],
        })
    }

    fn current_mod_file(&mut self) -> &mut BufWriter<File> {
        self.mod_files.last_mut().expect("root mod.rs is never popped")
    }
}

/// Shader file/dir names are not always valid Rust identifiers, `trace.rgen` becomes `trace_rgen`
fn mod_ident(name: &str) -> String {
    name.replace(['.', '-'], "_")
}

impl SpvBuildExtension for SpvBindingsExtension {
    fn name<'n>(&self) -> std::borrow::Cow<'n, str> {
        "SpvBindingsExtension".into()
    }

    fn init_root(
        &mut self,
        _shader_root_path: &str,
        _glslc: &mut Glslc,
    ) -> Result<(), Box<dyn std::error::Error>> {
        writeln!(self.current_mod_file(), "#![allow(unused)]\n")?;

        Ok(())
    }

    fn exit_root(
        &mut self,
        _shader_root_path: &str,
        _glslc: &Glslc,
    ) -> Result<(), Box<dyn std::error::Error>> {
        for mod_file in &mut self.mod_files {
            mod_file.flush()?;
        }

        Ok(())
    }

    fn enter_mod(&mut self, dir_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let dir_name = dir_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or("shader mod dir must have a valid UTF-8 name")?;
        let ident = mod_ident(dir_name);

        writeln!(self.current_mod_file(), "pub(crate) mod {ident};")?;

        let sub_mod_dir = self
            .mod_dirs
            .last()
            .expect("root dir is never popped")
            .join(&ident);
        fs::create_dir_all(&sub_mod_dir)?;

        self.mod_files
            .push(BufWriter::new(File::create(sub_mod_dir.join("mod.rs"))?));
        self.mod_dirs.push(sub_mod_dir);

        Ok(())
    }

    fn exit_mod(&mut self, _dir_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        // drop flushes, but surface write errors here rather than on drop
        if let Some(mut mod_file) = self.mod_files.pop() {
            mod_file.flush()?;
        }
        self.mod_dirs.pop();

        Ok(())
    }

    fn post_compile(
        &mut self,
        source_path: &Path,
        spv_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let file_name = source_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or("shader file must have a valid UTF-8 name")?;
        let ident = mod_ident(file_name);

        // include_bytes! resolves relative to the binding file, so embed an absolute path
        let spv_abs = fs::canonicalize(spv_path)?;

        let binding_path = self
            .mod_dirs
            .last()
            .expect("root dir is never popped")
            .join(format!("{ident}.rs"));
        fs::write(
            &binding_path,
            format!(
                "/// Compiled SPIR-V for `{}`.\npub const SPV: &[u8] = include_bytes!(r\"{}\");\n",
                source_path.display(),
                spv_abs.display(),
            ),
        )?;

        writeln!(self.current_mod_file(), "pub(crate) mod {ident};")?;

        Ok(())
    }
}
