use spv_build::{Glslc, SpvBuildError, compile_shader_tree, extensions};

fn main() -> Result<(), SpvBuildError> {
    // include paths in the shaders resolve relative to the tree root
    let glslc = Glslc::default().include_dir("shaders");

    if !glslc.is_available() {
        println!("cargo::warning=glslc not found on PATH, skipping shader compilation");
        return Ok(());
    }

    // the first run has no previous output tree to clean up
    std::fs::create_dir_all("shaders-spv")?;

    compile_shader_tree("shaders", glslc, extensions![])
}
