//! Entry point: builds the demo scene headlessly and drives its animation
//! for a fixed number of simulated frames.

mod config;
mod demo;
mod driver;

use anyhow::{Context, Result};
use corelib::Vec3;
use corelib::animation::AnimationState;
use corelib::camera::Camera;
use corelib::scene::SceneGraph;

use crate::config::AppConfig;
use crate::driver::FrameDriver;

fn parse_config_arg() -> Option<String> {
    std::env::args().find_map(|arg| arg.strip_prefix("--config=").map(str::to_owned))
}

fn load_config() -> Result<AppConfig> {
    let mut cfg = match parse_config_arg() {
        Some(path) => AppConfig::load_from_file(&path)
            .with_context(|| format!("Failed to load config '{path}'"))?,
        None => AppConfig::default(),
    };
    cfg.apply_args(std::env::args().skip(1))
        .context("Invalid command-line option")?;
    Ok(cfg)
}

fn camera_from(cfg: &AppConfig) -> Camera {
    let c = &cfg.camera;
    Camera::new_perspective(
        Vec3::from_array(c.position),
        Vec3::from_array(c.look_at),
        Vec3::from_array(c.up),
        c.fov_y_deg.to_radians(),
        c.near_clip,
        c.far_clip,
        cfg.aspect(),
    )
}

fn log_tree(scene: &SceneGraph) {
    for (id, depth) in scene.walk(scene.root()) {
        let name = scene.name(id).unwrap_or("?");
        let meshes: Vec<&str> = scene.entities_of(id).map(|e| e.mesh.as_str()).collect();
        log::debug!("{:indent$}{} {:?}", "", name, meshes, indent = depth * 2);
    }
}

fn run(cfg: &AppConfig) -> Result<()> {
    let demo = demo::build(cfg).context("Failed to build the demo scene")?;
    let mut scene = demo.scene;
    log_tree(&scene);

    for (name, mesh) in demo.meshes.iter_sorted() {
        log::info!(
            "Mesh '{}': {} vertices, {} triangles, {} bytes ({:?})",
            name,
            mesh.vertices.len(),
            mesh.triangle_count(),
            mesh.vertex_bytes().len() + mesh.index_bytes().len(),
            mesh.layout
        );
    }

    let camera = camera_from(cfg);
    let visible = scene
        .iter_renderables()
        .filter(|(world, _)| camera.project(world.transform_point3(Vec3::ZERO)).is_some())
        .count();
    let vp = &cfg.viewport;
    log::info!(
        "Viewport {:.0}x{:.0} at ({:.3}, {:.3}), z-order {}, background {:?}{}",
        cfg.window.width as f32 * vp.width,
        cfg.window.height as f32 * vp.height,
        vp.left(),
        vp.top(),
        vp.z_order,
        vp.background,
        if cfg.window.full_screen { ", full screen" } else { "" }
    );
    log::info!(
        "{visible} of {} entities in view",
        scene.iter_renderables().count()
    );

    if let Some(dir) = &cfg.run.export_dir {
        let written = asset::obj::export_registry(&demo.meshes, dir)?;
        log::info!("Exported {} meshes to {}", written.len(), dir.display());
    }

    let state = AnimationState::new(demo.spin, &scene).context("Failed to bind the spin animation")?;
    let mut driver = FrameDriver::new(state, cfg.window.height);
    driver
        .set_effect(cfg.run.effect)
        .context("Invalid startup effect")?;

    for (role, id) in demo.cross.iter() {
        log::debug!("{role:?} at {:?}", scene.world_position(id));
    }
    for (role, id) in demo.rings.iter() {
        log::debug!("ring {role:?} at {:?}", scene.world_position(id));
    }

    for frame in 1..=cfg.run.frames {
        let events = cfg.run.events_for(frame);
        let report = driver.tick(cfg.run.dt, &events, &mut scene)?;
        log::debug!(
            "frame {} t={:.3} scale={:.3} effect={} shading={} scan={}{}",
            report.frame,
            report.time_position,
            report.pose.scale,
            report.effect.get(),
            driver.shading_type(),
            report.compositor_time,
            if driver.is_animating() { "" } else { " (paused)" }
        );
    }

    let spinner = scene.world_matrix(demo.spinner).context("Spinner node vanished")?;
    log::info!(
        "Ran {} frames, animation at {:.3}s, effect {}, spinner facing {:?}",
        cfg.run.frames,
        driver.animation().time_position(),
        driver.effect().get(),
        spinner.transform_vector3(Vec3::X).normalize_or_zero()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = load_config()?;
    log::info!(
        "Starting '{}' ({}x{}, {} frames at dt={:.4}, materials in {})",
        cfg.window.title,
        cfg.window.width,
        cfg.window.height,
        cfg.run.frames,
        cfg.run.dt,
        cfg.material_directory.display()
    );

    if let Err(e) = run(&cfg) {
        log::error!("{e:#}");
        return Err(e);
    }

    log::info!("Shutdown.");
    Ok(())
}
