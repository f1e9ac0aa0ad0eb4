//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment
//! shader: a top-down view of the ground plane with two camera modes.

pub mod sdf_pipeline;

pub use sdf_pipeline::SdfRenderState;
