//! Physics scene to renderer bridge
//!
//! Imports a parsed scene description into a renderer instance graph and keeps
//! every dynamic instance's transform in step with the physics authority.
//!
//! ## Architecture
//!
//! ```text
//! SceneDocument ──► SceneImporter ──► RenderInstance graph + CameraDescriptors
//!                     │  MaterialResolver (textures, PBR channels)
//!                     │  GeometryInstantiator (per-shape mesh + scale)
//!                     ▼
//!               RenderBackend
//!                     ▲
//! PhysicsAuthority ──► PoseSynchronizer (every tick) ──► Viewer::refresh
//!                  └─► CameraPoseComposer (on demand)
//! ```
//!
//! [`Bridge`] ties these together for one renderer and one load cycle at a time.

mod camera;
mod error;
mod facade;
mod geometry;
mod importer;
mod instance;
mod sync;

#[cfg(test)]
mod tests;

pub use camera::{CameraDescriptor, CameraModes, CameraPoseComposer};
pub use error::{BridgeError, BridgeResult, ConfigurationError};
pub use facade::Bridge;
pub use geometry::{GeomShape, GeometryInstantiator, PrimitiveLibrary};
pub use importer::{ImportReport, ImportedScene, SceneImporter, SkippedNode};
pub use instance::RenderInstance;
pub use sync::{PoseSynchronizer, SkipReason, SyncReport, SyncSkip};
