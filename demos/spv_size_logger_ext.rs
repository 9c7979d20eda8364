use std::fs;
use std::path::Path;

use spv_build::{Glslc, SpvBuildError, SpvBuildExtension, compile_shader_tree, extensions};

struct SpvSizeLogger {
    messages: Vec<String>,
}

impl SpvSizeLogger {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }
}

impl SpvBuildExtension for SpvSizeLogger {
    fn name<'n>(&self) -> std::borrow::Cow<'n, str> {
        "SpvSizeLogger".into()
    }

    fn init_root(
        &mut self,
        _shader_root_path: &str,
        _glslc: &mut Glslc,
    ) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn exit_root(
        &mut self,
        _shader_root_path: &str,
        _glslc: &Glslc,
    ) -> Result<(), Box<dyn std::error::Error>> {
        println!("name | source_lines | spv_bytes");
        println!("----------------------------------------------------");
        for message in &self.messages {
            println!("{message}");
        }

        Ok(())
    }

    fn enter_mod(&mut self, _dir_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn exit_mod(&mut self, _dir_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn post_compile(
        &mut self,
        source_path: &Path,
        spv_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let name = source_path
            .file_name()
            .expect("shader file must have a name")
            .to_string_lossy();

        let source_lines = fs::read_to_string(source_path)?.lines().count();
        let spv_bytes = fs::metadata(spv_path)?.len();

        self.messages
            .push(format!("{name} | {source_lines} | {spv_bytes}"));

        Ok(())
    }
}

fn main() -> Result<(), SpvBuildError> {
    let glslc = Glslc::default().include_dir("spv_build_example/shaders");
    if !glslc.is_available() {
        eprintln!("glslc not found on PATH, nothing to do");
        return Ok(());
    }

    fs::create_dir_all("spv_build_example/shaders-spv")?;

    compile_shader_tree(
        "spv_build_example/shaders",
        glslc,
        extensions![SpvSizeLogger::new()],
    )
}
