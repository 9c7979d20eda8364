use std::{
    borrow::Cow,
    path::Path,
};

use crate::SpvBuildError;
use crate::compiler::Glslc;

#[cfg(feature = "spv_bindings_ext")]
pub mod spv_bindings;

/// An extension that runs before and after all shaders are compiled and after each file is compiled
pub trait SpvBuildExtension {
    /// The name to report in errors as the source extension
    fn name<'n>(&self) -> Cow<'n, str>;

    /// The first time the extension is called this is in the root before any files/modules are entered
    ///
    /// ### Args
    /// * `shader_root_path` - the root dir of the shaders we are compiling
    /// * `glslc` - the compiler configuration being used by spv_build
    fn init_root(
        &mut self,
        shader_root_path: &str,
        glslc: &mut Glslc,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// The last time the extension is called this is in the root after all files/modules are covered
    ///
    /// ### Args
    /// * `shader_root_path` - the root dir of the shaders we are compiling
    /// * `glslc` - the compiler configuration being used by spv_build
    fn exit_root(
        &mut self,
        _shader_root_path: &str,
        _glslc: &Glslc,
    ) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    /// Go one level into a shader module
    ///
    /// ### Args
    /// * `dir_path` - the current dir of the mod we are entering
    fn enter_mod(&mut self, dir_path: &Path) -> Result<(), Box<dyn std::error::Error>>;
    /// Go one level out of a shader module
    ///
    /// ### Args
    /// * `dir_path` - the current dir of the mod we are exiting
    fn exit_mod(&mut self, dir_path: &Path) -> Result<(), Box<dyn std::error::Error>>;

    /// Run after a shader file is compiled
    ///
    /// ### Args
    /// * `source_path` - the path to the shader source file
    /// * `spv_path` - the path to the compiled SPIR-V artifact
    fn post_compile(
        &mut self,
        source_path: &Path,
        spv_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>>;
}

/// Util for wrapping an extensions error in a [`SpvBuildError`]
pub(crate) fn extension_error(
    ext: &dyn SpvBuildExtension,
    error: Box<dyn std::error::Error>,
) -> SpvBuildError {
    SpvBuildError::ExtensionErr {
        extension_name: ext.name().into_owned(),
        error,
    }
}
