//! # Scene Bridge
//!
//! Imports a physics scene description (MJCF-style XML) into a renderer's
//! instance graph and keeps every instance's pose in step with the physics
//! engine, tick after tick.
//!
//! ## Features
//!
//! - **Scene Import**: Geoms become primitive or mesh instances bound to their owning bodies
//! - **Render Groups**: Visual and collision representations are filtered independently
//! - **Materials**: File textures, PBR sibling maps, and synthesized scalar channels
//! - **Pose Sync**: Per-tick transform writes from a read-only physics authority
//! - **Cameras**: Body-mounted camera descriptors with on-demand world poses
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_bridge::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut bridge = Bridge::new(BridgeConfig::default(), RecordingRenderer::new());
//!     bridge.load_file("scene.xml")?;
//!
//!     let mut physics = BodyPoseTable::new();
//!     physics.set_body("table", Vec3::new(0.0, 0.0, 1.0), Mat3::identity());
//!
//!     let report = bridge.sync(&physics);
//!     assert!(report.is_complete());
//!     bridge.close();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod scene;
pub mod assets;
pub mod render;
pub mod physics;
pub mod bridge;

pub use bridge::{Bridge, BridgeError, BridgeResult};
pub use config::BridgeConfig;

/// Common imports for bridge users
pub mod prelude {
    pub use crate::{
        bridge::{
            Bridge, BridgeError, BridgeResult, CameraDescriptor, CameraModes, ImportReport,
            RenderInstance, SyncReport,
        },
        config::{BridgeConfig, ClassIdPolicy, Config},
        foundation::math::{Mat3, Mat4, Pose, QuatWxyz, QuatXyzw, Vec3},
        physics::{BodyPoseTable, PhysicsAuthority, PhysicsError},
        render::{RecordingRenderer, RenderBackend, Viewer},
        scene::{BodyRef, SceneDocument},
    };
}
