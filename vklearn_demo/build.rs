//! Compiles the forward shaders to `<source>.spv` with `glslc` when it is on PATH.
//!
//! The binaries are written into `resources/shaders/` next to their
//! sources, not to `OUT_DIR`: the renderer loads `<source>.spv` at runtime
//! from the working directory, and the checked-in binaries must stay in
//! step with the GLSL. Building therefore modifies the source tree.
//!
//! Without `glslc` the existing binaries are used as-is; the
//! `shader-recompile` feature rebuilds them at startup instead.

use std::path::Path;
use std::process::Command;

const SHADERS: [(&str, &str); 2] = [
    ("resources/shaders/fwd_vertex.glsl", "vert"),
    ("resources/shaders/fwd_fragment.glsl", "frag"),
];

fn main() {
    for (source, stage) in SHADERS {
        println!("cargo:rerun-if-changed={}", source);

        let output = format!("{}.spv", source);
        let status = Command::new("glslc")
            .arg(format!("-fshader-stage={}", stage))
            .arg(Path::new(source))
            .arg("-o")
            .arg(&output)
            .status();

        match status {
            Ok(status) if status.success() => {}
            Ok(status) => panic!("glslc failed on {} ({})", source, status),
            Err(_) => {
                println!("cargo:warning=glslc not found, {} was not rebuilt", output);
            }
        }
    }
}
