//! Import scenarios
//!
//! Group filtering, class ids, fallback materials, skipped and failing nodes,
//! shared textures and camera registration through the full bridge.

use super::{instance_names, loaded, parse, request_of, test_config};
use crate::bridge::{Bridge, BridgeError, ConfigurationError, GeomShape};
use crate::config::ClassIdPolicy;
use crate::foundation::math::{QuatXyzw, Vec3};
use crate::render::{MaterialDescriptor, RecordingRenderer, TextureSource};
use crate::scene::{BodyRef, SceneDocument};
use approx::assert_relative_eq;

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE_BOX: &str = r#"
        <mujoco model="table">
            <worldbody>
                <body name="table">
                    <geom type="box" pos="0 0 1" quat="1 0 0 0" size="1 1 1" rgba="1 0 0 1" group="1"/>
                </body>
            </worldbody>
        </mujoco>
    "#;

    const MIXED_GROUPS: &str = r#"
        <mujoco>
            <worldbody>
                <geom name="floor" type="plane" size="5 5 0.1" group="3"/>
                <body name="robot">
                    <geom name="link_visual" type="sphere" size="0.1" group="1"/>
                    <geom name="link_collision" type="box" size="0.1 0.1 0.1" group="0"/>
                    <geom name="link_extra" type="cylinder" size="0.1 0.2" group="2"/>
                </body>
            </worldbody>
        </mujoco>
    "#;

    #[test]
    fn test_end_to_end_box() {
        let bridge = loaded(test_config().with_groups(true, false), TABLE_BOX);

        assert_eq!(bridge.instances().len(), 1);
        let instance = &bridge.instances()[0];
        assert_eq!(instance.owner, BodyRef::Body("table".to_string()));
        assert_eq!(instance.shape, GeomShape::Box);

        let request = request_of(&bridge, 0);
        assert_relative_eq!(request.scale, Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(request.local_orientation, QuatXyzw::new(0.0, 0.0, 0.0, 1.0));
        assert_relative_eq!(request.local_position, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(request.color, [1.0, 0.0, 0.0]);
        assert!(request.material.is_none());

        let spec = &bridge.renderer().instances()[0].spec;
        assert_eq!(spec.owner, BodyRef::Body("table".to_string()));
        assert!(spec.dynamic);
    }

    #[test]
    fn test_group_filter_visual_only() {
        let bridge = loaded(test_config().with_groups(true, false), MIXED_GROUPS);
        assert_eq!(instance_names(&bridge), vec!["floor", "link_visual"]);
        assert_eq!(bridge.report().unwrap().filtered, 2);
    }

    #[test]
    fn test_group_filter_collision_only() {
        let bridge = loaded(test_config().with_groups(false, true), MIXED_GROUPS);
        assert_eq!(instance_names(&bridge), vec!["floor", "link_collision"]);
    }

    #[test]
    fn test_group_filter_planes_always() {
        let bridge = loaded(test_config().with_groups(false, false), MIXED_GROUPS);
        assert_eq!(instance_names(&bridge), vec!["floor"]);

        let request = request_of(&bridge, 0);
        assert_relative_eq!(request.scale, Vec3::new(10.0, 10.0, 0.01));
        assert_eq!(bridge.instances()[0].owner, BodyRef::World);
    }

    #[test]
    fn test_class_ids_follow_document_order() {
        let bridge = loaded(test_config().with_groups(true, true), MIXED_GROUPS);
        let ids: Vec<u32> = bridge.instances().iter().map(|i| i.class_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        let constant = loaded(
            test_config().with_class_ids(ClassIdPolicy::Constant(0)),
            MIXED_GROUPS,
        );
        assert!(constant.instances().iter().all(|i| i.class_id == 0));
    }

    #[test]
    fn test_idempotent_reimport() {
        let mut bridge = loaded(test_config().with_groups(true, true), MIXED_GROUPS);
        let snapshot = |bridge: &Bridge<RecordingRenderer>| -> Vec<(BodyRef, u32, Option<String>)> {
            bridge
                .instances()
                .iter()
                .map(|i| (i.owner.clone(), i.class_id, i.name.clone()))
                .collect()
        };

        let first = snapshot(&bridge);
        bridge.reload().unwrap();
        let second = snapshot(&bridge);

        assert_eq!(first, second);
        assert_eq!(bridge.renderer().instances().len(), first.len());
        assert_eq!(bridge.renderer().release_count(), 1);
    }

    #[test]
    fn test_fallback_cylinder_material() {
        let xml = r#"<mujoco><worldbody><body name="can">
            <geom type="cylinder" size="0.05 0.1" rgba="0 0 1 1" group="1"/>
        </body></worldbody></mujoco>"#;
        let bridge = loaded(test_config(), xml);

        let request = request_of(&bridge, 0);
        let material = request.material.as_ref().unwrap();
        let textured = material.as_textured().unwrap();
        assert!(textured.metallic.is_some());
        assert_eq!(textured.roughness, None);
        assert!(textured.normal.is_some());
        assert_relative_eq!(request.scale, Vec3::new(0.05, 0.05, 0.1));
    }

    #[test]
    fn test_world_anchored_fallback() {
        let xml = r#"<mujoco><worldbody>
            <geom name="loose" type="sphere" size="0.1" group="1"/>
            <body><geom name="orphan" type="sphere" size="0.1" group="1"/></body>
        </worldbody></mujoco>"#;
        let bridge = loaded(test_config(), xml);

        assert_eq!(bridge.instances().len(), 2);
        assert!(bridge.instances().iter().all(|i| i.owner == BodyRef::World));
    }

    #[test]
    fn test_unknown_kinds() {
        let xml = r#"<mujoco><worldbody><body name="gripper">
            <geom name="finger_collision" type="capsule" size="0.01 0.02" group="1"/>
            <geom name="handle" type="capsule" size="0.01 0.02" group="1"/>
            <geom name="palm" type="box" size="0.1 0.1 0.1" group="1"/>
        </body></worldbody></mujoco>"#;
        let bridge = loaded(test_config(), xml);

        assert_eq!(instance_names(&bridge), vec!["palm"]);
        let report = bridge.report().unwrap();
        assert_eq!(report.filtered, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 1);
        assert_eq!(
            report.skipped[0].error,
            ConfigurationError::UnknownGeomKind {
                geom: "handle".to_string(),
                kind: "capsule".to_string()
            }
        );
        // Class ids are not renumbered around skipped nodes
        assert_eq!(bridge.instances()[0].class_id, 2);
    }

    #[test]
    fn test_collision_name_rule_can_be_disabled() {
        let xml = r#"<mujoco><worldbody>
            <geom name="finger_collision" type="capsule" group="1"/>
        </worldbody></mujoco>"#;
        let mut config = test_config();
        config.skip_collision_named = false;
        let bridge = loaded(config, xml);

        assert_eq!(bridge.report().unwrap().skipped.len(), 1);
    }

    #[test]
    fn test_missing_material_skips_only_that_node() {
        let xml = r#"<mujoco><worldbody>
            <geom name="bad" type="sphere" material="ghost" group="1"/>
            <geom name="good" type="sphere" group="1"/>
        </worldbody></mujoco>"#;
        let bridge = loaded(test_config(), xml);

        assert_eq!(instance_names(&bridge), vec!["good"]);
        assert!(matches!(
            bridge.report().unwrap().skipped[0].error,
            ConfigurationError::MissingMaterial { .. }
        ));
    }

    #[test]
    fn test_all_nodes_skipped_is_clean_empty_import() {
        let xml = r#"<mujoco><worldbody>
            <geom name="a" type="ellipsoid" group="1"/>
        </worldbody></mujoco>"#;
        let bridge = loaded(test_config(), xml);

        assert!(bridge.is_loaded());
        assert!(bridge.instances().is_empty());
    }

    #[test]
    fn test_strict_mode_aborts_and_releases() {
        let xml = r#"<mujoco><worldbody>
            <geom name="good" type="sphere" group="1"/>
            <geom name="bad" type="ellipsoid" group="1"/>
        </worldbody></mujoco>"#;
        let mut bridge = Bridge::new(test_config().with_strict(true), RecordingRenderer::new());

        let result = bridge.load(parse(xml));
        assert!(matches!(result, Err(BridgeError::Configuration(_))));
        assert!(!bridge.is_loaded());
        assert!(bridge.renderer().objects().is_empty());
        assert!(bridge.renderer().instances().is_empty());
    }

    #[test]
    fn test_missing_mesh_file_is_hard_failure() {
        let xml = r#"<mujoco>
            <asset><mesh name="bread" file="/nonexistent/bread.obj"/></asset>
            <worldbody>
                <geom name="first" type="sphere" group="1"/>
                <geom name="loaf" type="mesh" mesh="bread" group="1"/>
            </worldbody>
        </mujoco>"#;
        let mut bridge = Bridge::new(test_config(), RecordingRenderer::new());

        let result = bridge.load(parse(xml));
        assert!(matches!(result, Err(BridgeError::Asset(_))));
        assert!(!bridge.is_loaded());
        assert!(bridge.renderer().instances().is_empty());
        assert_eq!(bridge.renderer().release_count(), 1);
    }

    #[test]
    fn test_textures_shared_and_siblings_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("wood.png"), b"base").unwrap();
        std::fs::write(dir.path().join("wood-normal.png"), b"normal").unwrap();

        let xml = r#"<mujoco>
            <asset>
                <texture name="wood" type="2d" file="wood.png"/>
                <material name="top" texture="wood" texrepeat="2 2"/>
                <material name="legs" texture="wood"/>
            </asset>
            <worldbody><body name="table">
                <geom name="top" type="box" size="1 1 0.05" material="top" group="1"/>
                <geom name="leg" type="box" size="0.05 0.05 0.5" material="legs" group="1"/>
            </body></worldbody>
        </mujoco>"#;
        let doc = SceneDocument::parse_with_base(xml, Some(dir.path().to_path_buf())).unwrap();
        let mut bridge = Bridge::new(test_config(), RecordingRenderer::new());
        bridge.load(doc).unwrap();

        let textures = bridge.renderer().textures();
        assert_eq!(textures.len(), 2);
        assert!(textures
            .iter()
            .all(|t| matches!(t.source, TextureSource::File(_))));
        assert_eq!(bridge.report().unwrap().textures, 2);

        let top = request_of(&bridge, 0).material.clone().unwrap();
        let leg = request_of(&bridge, 1).material.clone().unwrap();
        let (top, leg) = (top.as_textured().unwrap(), leg.as_textured().unwrap());
        assert_eq!(top.base_color, leg.base_color);
        assert_eq!(top.normal, leg.normal);
        assert_eq!(top.repeat, [2.0, 2.0]);
        assert_eq!(leg.repeat, [1.0, 1.0]);
        assert!(!request_of(&bridge, 0).texture_enabled);
    }

    #[test]
    fn test_flat_color_material() {
        let xml = r#"<mujoco>
            <asset><material name="red" rgba="1 0 0 1"/></asset>
            <worldbody><geom type="sphere" material="red" group="1"/></worldbody>
        </mujoco>"#;
        let bridge = loaded(test_config(), xml);

        assert_eq!(
            request_of(&bridge, 0).material,
            Some(MaterialDescriptor::Color { kd: [1.0, 0.0, 0.0] })
        );
        assert!(bridge.renderer().textures().is_empty());
    }

    #[test]
    fn test_cameras_registered_inactive() {
        let xml = r#"<mujoco><worldbody>
            <camera name="frontview" pos="1.6 0 1.45" quat="0.56 0.43 0.43 0.56"/>
            <body name="head">
                <camera pos="0 0 0.1"/>
                <camera pos="0 0 0.2"/>
            </body>
        </worldbody></mujoco>"#;
        let bridge = loaded(test_config(), xml);

        let names: Vec<&str> = bridge.cameras().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["frontview", "head_cam", "head_cam_1"]);
        assert!(bridge.cameras().iter().all(|c| !c.active));
        assert_eq!(bridge.cameras()[0].owner, BodyRef::World);
        assert_eq!(bridge.cameras()[0].offset_orientation, QuatXyzw::new(0.43, 0.43, 0.56, 0.56));
        assert_eq!(bridge.report().unwrap().cameras, 3);
    }
}
