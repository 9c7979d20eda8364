use std::fs;
use std::path::Path;

/// Lists the SPIR-V artifacts produced by build.rs, see `../build.rs`.
fn main() {
    let spv_root = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders-spv"));

    if !spv_root.exists() {
        eprintln!("no compiled shaders, was glslc installed when this was built?");
        return;
    }

    list_artifacts(spv_root);
}

fn list_artifacts(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if path.is_dir() {
            list_artifacts(&path);
        } else if let Ok(meta) = path.metadata() {
            println!("{} ({} bytes)", path.display(), meta.len());
        }
    }
}
