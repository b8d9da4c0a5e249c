//! Shader Tests - WGSL Validation and Uniform Layout
//!
//! Parses the vertex-color+noise shader with naga and checks that its
//! uniform block and vertex inputs line up with the Rust-side structs.

use terrain_plain_engine::render::{TerrainUniforms, TerrainVertex, VERTEX_COLOR_NOISE_WGSL};

fn parse_and_validate() -> naga::Module {
    let module = naga::front::wgsl::parse_str(VERTEX_COLOR_NOISE_WGSL)
        .unwrap_or_else(|e| panic!("WGSL parse error:\n{}", e.emit_to_string(VERTEX_COLOR_NOISE_WGSL)));
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .expect("shader should validate");
    module
}

#[test]
fn test_shader_validates() {
    let module = parse_and_validate();
    let names: Vec<_> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}

#[test]
fn test_uniform_struct_matches_rust() {
    let module = parse_and_validate();
    let span = module
        .types
        .iter()
        .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
            (Some(name), naga::TypeInner::Struct { span, .. }) if name == "TerrainUniforms" => {
                Some(*span)
            }
            _ => None,
        })
        .expect("TerrainUniforms struct in shader");
    assert_eq!(span as usize, std::mem::size_of::<TerrainUniforms>());
}

#[test]
fn test_vertex_layout() {
    let layout = TerrainVertex::layout();
    assert_eq!(layout.array_stride, 40);
    assert_eq!(layout.attributes.len(), 3);
    assert_eq!(layout.attributes[2].offset, 24);
    assert_eq!(std::mem::size_of::<TerrainVertex>(), 40);
}
