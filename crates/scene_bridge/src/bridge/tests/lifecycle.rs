//! Load, reload and teardown

use super::{loaded, parse, test_config};
use crate::bridge::{Bridge, BridgeError};
use crate::render::RecordingRenderer;
use crate::scene::SceneError;

const TWO_SPHERES: &str = r#"
    <mujoco>
        <worldbody>
            <body name="ball"><geom name="a" type="sphere" size="0.1" group="1"/></body>
            <body name="bell"><geom name="b" type="sphere" size="0.2" group="1"/></body>
        </worldbody>
    </mujoco>
"#;

const ONE_BOX: &str = r#"
    <mujoco><worldbody><geom name="crate" type="box" size="1 1 1" group="1"/></worldbody></mujoco>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnect_keeps_document() {
        let mut bridge = loaded(test_config(), TWO_SPHERES);
        assert!(bridge.is_loaded());

        bridge.disconnect();
        assert!(!bridge.is_loaded());
        assert!(bridge.instances().is_empty());
        assert!(bridge.renderer().instances().is_empty());

        bridge.reload().unwrap();
        assert_eq!(bridge.instances().len(), 2);
        assert_eq!(bridge.renderer().release_count(), 1);
    }

    #[test]
    fn test_close_forgets_document() {
        let mut bridge = loaded(test_config(), TWO_SPHERES);
        bridge.close();

        assert!(!bridge.is_loaded());
        assert!(matches!(bridge.reload(), Err(BridgeError::NotLoaded)));

        // Closing twice releases only once
        bridge.close();
        assert_eq!(bridge.renderer().release_count(), 1);
    }

    #[test]
    fn test_load_replaces_previous_scene() {
        let mut bridge = loaded(test_config(), TWO_SPHERES);
        let report = bridge.load(parse(ONE_BOX)).unwrap();
        assert_eq!(report.instances, 1);

        assert_eq!(bridge.renderer().release_count(), 1);
        assert_eq!(bridge.renderer().instances().len(), 1);
        assert_eq!(bridge.instances()[0].label(), "crate");
    }

    #[test]
    fn test_reload_before_load() {
        let mut bridge = Bridge::new(test_config(), RecordingRenderer::new());
        assert!(matches!(bridge.reload(), Err(BridgeError::NotLoaded)));
        assert!(bridge.report().is_none());
        assert!(bridge.cameras().is_empty());
    }

    #[test]
    fn test_failing_release_is_not_fatal() {
        let renderer = RecordingRenderer::new().with_failing_release();
        let mut bridge = Bridge::new(test_config(), renderer);
        bridge.load(parse(TWO_SPHERES)).unwrap();

        bridge.reload().unwrap();
        assert!(bridge.is_loaded());
        assert_eq!(bridge.instances().len(), 2);
    }

    #[test]
    fn test_load_file_errors() {
        let mut bridge = Bridge::new(test_config(), RecordingRenderer::new());
        let result = bridge.load_file("/nonexistent/scene.xml");

        assert!(matches!(result, Err(BridgeError::Scene(SceneError::Io { .. }))));
        assert!(!bridge.is_loaded());
    }

    #[test]
    fn test_load_file_resolves_relative_assets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("meshes")).unwrap();
        std::fs::write(dir.path().join("meshes/bowl.obj"), "v 0 0 0\n").unwrap();
        let scene = dir.path().join("kitchen.xml");
        std::fs::write(
            &scene,
            r#"<mujoco>
                <compiler meshdir="meshes"/>
                <asset><mesh file="bowl.obj" scale="0.5 0.5 0.5"/></asset>
                <worldbody><body name="bowl">
                    <geom type="mesh" mesh="bowl" group="1"/>
                </body></worldbody>
            </mujoco>"#,
        )
        .unwrap();

        let mut bridge = Bridge::new(test_config(), RecordingRenderer::new());
        bridge.load_file(&scene).unwrap();

        let instance = &bridge.instances()[0];
        let request = bridge.renderer().object(instance.object).unwrap();
        assert_eq!(request.path, dir.path().join("meshes").join("bowl.obj"));
        assert_eq!(request.scale, crate::foundation::math::Vec3::repeat(0.5));
    }
}
