//! Headless bridge demo
//!
//! Loads a scene file into a recording renderer, spins every named body
//! around the z axis for a number of ticks, and logs what the bridge did.
//!
//! Usage: `bridge_demo <scene.xml> [config.toml|config.ron] [ticks]`

use std::path::PathBuf;

use scene_bridge::foundation::logging;
use scene_bridge::prelude::*;

const DEFAULT_TICKS: u32 = 100;
const ANGULAR_SPEED: f32 = 0.05; // radians per tick

struct DemoArgs {
    scene: PathBuf,
    config: Option<PathBuf>,
    ticks: u32,
}

impl DemoArgs {
    fn parse() -> Result<Self, Box<dyn std::error::Error>> {
        let mut args = std::env::args().skip(1);
        let scene = args
            .next()
            .map(PathBuf::from)
            .ok_or("usage: bridge_demo <scene.xml> [config.toml|config.ron] [ticks]")?;

        let mut config = None;
        let mut ticks = DEFAULT_TICKS;
        for arg in args {
            match arg.parse::<u32>() {
                Ok(n) => ticks = n,
                Err(_) => config = Some(PathBuf::from(arg)),
            }
        }
        Ok(Self { scene, config, ticks })
    }
}

/// Stand-in physics: every body turns around its own z axis in place
fn step(physics: &mut BodyPoseTable, bodies: &[(String, Vec3)], tick: u32) {
    let angle = ANGULAR_SPEED * tick as f32;
    let half = angle * 0.5;
    let orientation = QuatWxyz::new(half.cos(), 0.0, 0.0, half.sin());
    for (name, position) in bodies {
        physics.set_body_wxyz(name.clone(), *position, orientation);
    }
    physics.mark_stepped();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_filter(log::LevelFilter::Info);

    let args = DemoArgs::parse()?;
    let config = match &args.config {
        Some(path) => {
            log::info!("Loading bridge config from {}", path.display());
            BridgeConfig::load_from_file(path)?
        }
        None => BridgeConfig::default(),
    };

    let document = SceneDocument::from_file(&args.scene)?;
    log::info!(
        "Parsed '{}': {} bodies, {} geoms, {} cameras",
        document.model_name().unwrap_or("unnamed"),
        document.bodies().len(),
        document.geoms().len(),
        document.cameras().len()
    );

    let bodies: Vec<(String, Vec3)> = document
        .bodies()
        .iter()
        .filter_map(|body| body.name.clone())
        .enumerate()
        .map(|(i, name)| (name, Vec3::new(i as f32, 0.0, 0.0)))
        .collect();

    let mut bridge = Bridge::new(config, RecordingRenderer::new());
    let report = bridge.load(document)?;
    for skipped in &report.skipped {
        log::warn!("Skipped geom #{}: {}", skipped.index, skipped.error);
    }

    if let Some(name) = bridge.cameras().first().map(|camera| camera.name.clone()) {
        bridge.activate_camera(&name)?;
    }

    let mut physics = BodyPoseTable::new().not_stepped();
    let mut incomplete = 0;
    for tick in 0..args.ticks {
        step(&mut physics, &bodies, tick);
        let sync = bridge.sync(&physics);
        if !sync.is_complete() {
            incomplete += 1;
        }
    }

    for camera in bridge.active_cameras() {
        let pose = bridge.camera_pose(&camera.name, &physics)?;
        log::info!(
            "Camera '{}' at {:?} facing {:?}",
            camera.name,
            pose.position.as_slice(),
            pose.orientation.0
        );
    }

    let renderer = bridge.renderer();
    log::info!(
        "{} ticks: {} instances, {} objects, {} textures, {} incomplete syncs",
        args.ticks,
        renderer.instances().len(),
        renderer.objects().len(),
        renderer.textures().len(),
        incomplete
    );

    bridge.close();
    Ok(())
}
