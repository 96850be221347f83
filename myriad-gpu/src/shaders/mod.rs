/*!
# Myriad WGSL Shader Collection

Compute shaders for the accelerated resolution pass. The WGSL mirrors the
sequential reference semantics in `myriad_core::resolve::resolve_entity`;
any change to one side must land on both.
*/

/// Per-entity visibility + LOD + radius resolution shader
pub const RESOLVE_SHADER: &str = include_str!("resolve.wgsl");
