/// Unit tests for shader recompilation

use super::*;
use std::cell::RefCell;
use std::time::Duration;

struct CountingCompiler {
    calls: RefCell<Vec<(ShaderStage, String)>>,
}

impl CountingCompiler {
    fn new() -> Self {
        Self { calls: RefCell::new(Vec::new()) }
    }
}

impl ShaderCompiler for CountingCompiler {
    fn compile(&self, _source: &str, stage: ShaderStage, file_name: &str) -> Result<Vec<u8>> {
        self.calls.borrow_mut().push((stage, file_name.to_string()));
        Ok(vec![0x03, 0x02, 0x23, 0x07])
    }
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vklearn_shader_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn set_mtime(path: &Path, time: SystemTime) {
    fs::File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
}

#[test]
fn test_spirv_path_appends_extension() {
    assert_eq!(
        spirv_path(Path::new("resources/shaders/fwd_vertex.glsl")),
        PathBuf::from("resources/shaders/fwd_vertex.glsl.spv")
    );
}

#[test]
fn test_compiles_when_binary_missing() {
    let dir = temp_dir("missing");
    let glsl = dir.join("fwd_vertex.glsl");
    fs::write(&glsl, "#version 450\nvoid main() {}\n").unwrap();
    let compiler = CountingCompiler::new();

    let spv = compile_if_changed(&compiler, &glsl, ShaderStage::Vertex).unwrap();

    assert_eq!(spv, dir.join("fwd_vertex.glsl.spv"));
    assert_eq!(fs::read(&spv).unwrap(), vec![0x03, 0x02, 0x23, 0x07]);
    assert_eq!(*compiler.calls.borrow(), vec![(ShaderStage::Vertex, "fwd_vertex.glsl".to_string())]);
}

#[test]
fn test_skips_up_to_date_binary() {
    let dir = temp_dir("fresh");
    let glsl = dir.join("fwd_fragment.glsl");
    fs::write(&glsl, "#version 450\nvoid main() {}\n").unwrap();
    fs::write(spirv_path(&glsl), [1u8, 2, 3, 4]).unwrap();
    let now = SystemTime::now();
    set_mtime(&glsl, now - Duration::from_secs(60));
    set_mtime(&spirv_path(&glsl), now);
    let compiler = CountingCompiler::new();

    compile_if_changed(&compiler, &glsl, ShaderStage::Fragment).unwrap();

    assert!(compiler.calls.borrow().is_empty());
    assert_eq!(fs::read(spirv_path(&glsl)).unwrap(), vec![1, 2, 3, 4]);
}

#[test]
fn test_recompiles_stale_binary() {
    let dir = temp_dir("stale");
    let glsl = dir.join("fwd_fragment.glsl");
    fs::write(&glsl, "#version 450\nvoid main() {}\n").unwrap();
    fs::write(spirv_path(&glsl), [1u8, 2, 3, 4]).unwrap();
    let now = SystemTime::now();
    set_mtime(&spirv_path(&glsl), now - Duration::from_secs(60));
    set_mtime(&glsl, now);
    let compiler = CountingCompiler::new();

    compile_if_changed(&compiler, &glsl, ShaderStage::Fragment).unwrap();

    assert_eq!(compiler.calls.borrow().len(), 1);
}

#[test]
fn test_missing_source_fails() {
    let dir = temp_dir("nosource");
    let compiler = CountingCompiler::new();
    let result = compile_if_changed(&compiler, &dir.join("absent.glsl"), ShaderStage::Vertex);
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
}

#[test]
fn test_modules_without_recompilation_use_binaries() {
    let config = EngineConfig { shader_recompilation: false, ..EngineConfig::default() };
    let compiler = CountingCompiler::new();

    let modules = ForwardShaders::default().modules(&config, Some(&compiler)).unwrap();

    assert!(compiler.calls.borrow().is_empty());
    assert_eq!(modules.len(), 2);
    assert_eq!(modules[0].stage, ShaderStage::Vertex);
    assert_eq!(modules[0].spirv_path, PathBuf::from("resources/shaders/fwd_vertex.glsl.spv"));
    assert_eq!(modules[1].stage, ShaderStage::Fragment);
}

#[test]
fn test_modules_with_recompilation_compile_both_stages() {
    let dir = temp_dir("modules");
    let shaders = ForwardShaders { vertex: dir.join("v.glsl"), fragment: dir.join("f.glsl") };
    fs::write(&shaders.vertex, "#version 450\nvoid main() {}\n").unwrap();
    fs::write(&shaders.fragment, "#version 450\nvoid main() {}\n").unwrap();
    let config = EngineConfig { shader_recompilation: true, ..EngineConfig::default() };
    let compiler = CountingCompiler::new();

    let modules = shaders.modules(&config, Some(&compiler)).unwrap();

    assert_eq!(compiler.calls.borrow().len(), 2);
    assert_eq!(modules[1].spirv_path, dir.join("f.glsl.spv"));
}

#[test]
fn test_default_sources_are_relative() {
    let shaders = ForwardShaders::default();
    assert!(shaders.vertex.is_relative());
    assert!(shaders.fragment.is_relative());
    assert_eq!(shaders.vertex, Path::new("resources/shaders/fwd_vertex.glsl"));
}

#[test]
fn test_rooted_at_joins_relative_sources_only() {
    let root = std::env::temp_dir();
    let absolute = root.join("custom.glsl");
    let shaders = ForwardShaders { vertex: "shaders/a.glsl".into(), fragment: absolute.clone() };

    let rooted = shaders.rooted_at(&root);

    assert_eq!(rooted.vertex, root.join("shaders/a.glsl"));
    assert_eq!(rooted.fragment, absolute);
}
