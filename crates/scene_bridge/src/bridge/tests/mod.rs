//! Cross-module scenarios: document in, recorded renderer calls out

mod import_scenarios;
mod lifecycle;

use crate::bridge::Bridge;
use crate::config::BridgeConfig;
use crate::render::{MeshLoadRequest, RecordingRenderer};
use crate::scene::SceneDocument;

/// Config with primitive meshes under `prims/`
pub(super) fn test_config() -> BridgeConfig {
    BridgeConfig::default().with_primitives_dir("prims")
}

pub(super) fn parse(xml: &str) -> SceneDocument {
    SceneDocument::parse(xml).unwrap()
}

pub(super) fn loaded(config: BridgeConfig, xml: &str) -> Bridge<RecordingRenderer> {
    let mut bridge = Bridge::new(config, RecordingRenderer::new());
    bridge.load(parse(xml)).unwrap();
    bridge
}

/// Mesh load request behind the n-th instance
pub(super) fn request_of(bridge: &Bridge<RecordingRenderer>, index: usize) -> &MeshLoadRequest {
    let instance = &bridge.instances()[index];
    bridge.renderer().object(instance.object).unwrap()
}

/// Instance names in order
pub(super) fn instance_names(bridge: &Bridge<RecordingRenderer>) -> Vec<String> {
    bridge.instances().iter().map(|instance| instance.label()).collect()
}
