//! Boundary between the simulation core and whatever draws it.
//!
//! The core never issues draw calls. It talks to a 3D scene through
//! [`SceneGraph`] and to a 2D overlay surface through [`Canvas2d`]; the host
//! (a browser binding, a wgpu frontend, or the headless recorders in
//! [`headless`]) supplies the implementations.

pub mod canvas;
pub mod color;
pub mod headless;
pub mod scene;

pub use canvas::Canvas2d;
pub use color::Color;
pub use headless::{DrawOp, RecordedMesh, RecordedPoints, RecordingCanvas, RecordingScene};
pub use scene::{
    FogParams, LightKind, MaterialDesc, MaterialProperty, MeshData, MeshHandle, PointCloud,
    PointsHandle, SceneGraph, Transform,
};
