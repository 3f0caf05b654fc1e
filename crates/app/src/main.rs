//! Entry point for objlab.
//! Loads an OBJ scene, reports its meshes/materials and can run the particle
//! simulation headless.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use asset::{ObjLoader, texture::TextureData};
use corelib::{
    Vec3,
    camera::OrbitCamera,
    particles::{ParticleSettings, ParticleSystem},
};

const USAGE: &str = "Usage: objlab <model.obj> [--texture=path.png] [--particles=N] \
                     [--steps=N] [--dt=SECONDS] [--speed=X] [--seed=N]";

#[derive(Clone, Debug, PartialEq)]
struct Config {
    model: PathBuf,
    texture: Option<PathBuf>,
    particles: usize,
    steps: usize,
    dt: f32,
    speed: f32,
    seed: u64,
}

impl Config {
    fn from_args(args: &[String]) -> Result<Self> {
        let model = args
            .iter()
            .skip(1)
            .find(|arg| !arg.starts_with("--"))
            .map(PathBuf::from)
            .with_context(|| USAGE.to_string())?;

        Ok(Self {
            model,
            texture: parse_flag::<String>(args, "--texture=").map(PathBuf::from),
            particles: parse_flag(args, "--particles=").unwrap_or(0),
            steps: parse_flag(args, "--steps=").unwrap_or(120),
            dt: parse_flag(args, "--dt=").unwrap_or(1.0 / 60.0f32).max(0.0),
            speed: parse_flag(args, "--speed=").unwrap_or(1.0f32).max(0.0),
            seed: parse_flag(args, "--seed=").unwrap_or(0),
        })
    }
}

/// Last `--name=value` occurrence wins; unparsable values are reported and
/// ignored.
fn parse_flag<T: FromStr>(args: &[String], prefix: &str) -> Option<T> {
    let mut value = None;
    for arg in args {
        if let Some(raw) = arg.strip_prefix(prefix) {
            match raw.parse::<T>() {
                Ok(parsed) => value = Some(parsed),
                Err(_) => log::warn!("Ignoring invalid value '{}' for {}", raw, prefix),
            }
        }
    }
    value
}

fn report_scene(loader: &ObjLoader) {
    for mesh in loader.meshes() {
        let material = loader
            .material_of(mesh)
            .map(|mat| mat.name.as_str())
            .unwrap_or("?");
        log::info!(
            "mesh '{}': {} triangles, {} bytes, material #{} '{}'",
            mesh.name,
            mesh.triangle_count(),
            mesh.as_bytes().len(),
            mesh.material_id,
            material
        );
    }
    for (id, mat) in loader.materials().iter().enumerate() {
        log::info!(
            "material #{} '{}': Kd={:?} Ks={:?} Kn={}",
            id,
            mat.name,
            mat.kd,
            mat.ks,
            mat.kn
        );
    }
}

fn simulate(config: &Config) {
    let orbit = OrbitCamera::new(Vec3::ZERO);
    let eye = orbit.eye();
    let mut system = ParticleSystem::new(config.particles, ParticleSettings::default(), config.seed);

    for _ in 0..config.steps {
        system.step(config.dt, config.speed);
        system.sort_back_to_front(eye);
    }

    let highest = system
        .particles()
        .iter()
        .map(|p| p.position.y)
        .fold(f32::NEG_INFINITY, f32::max);
    let farthest = system
        .particles()
        .first()
        .map(|p| p.position.distance(eye))
        .unwrap_or(0.0);
    log::info!(
        "Simulated {} particles for {} steps: highest y={:.3}, farthest from eye={:.3}, {} bytes per upload",
        system.len(),
        config.steps,
        highest,
        farthest,
        system.as_bytes().len()
    );
}

fn run(config: &Config) -> Result<()> {
    let mut loader = ObjLoader::new();
    loader
        .load_file(&config.model)
        .with_context(|| format!("Failed to load model {}", config.model.display()))?;
    report_scene(&loader);

    if let Some(path) = &config.texture {
        let texture = TextureData::load(path, true)?;
        log::info!(
            "texture {}: {}x{} ({} bytes/pixel)",
            path.display(),
            texture.width,
            texture.height,
            texture.bytes_per_pixel()
        );
    }

    if config.particles > 0 {
        simulate(config);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let config = Config::from_args(&args)?;
    log::info!("Starting objlab: {:?}", config);

    run(&config)?;

    log::info!("Done.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("objlab")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn model_path_is_required() {
        assert!(Config::from_args(&args(&["--particles=10"])).is_err());
    }

    #[test]
    fn defaults_and_overrides() {
        let cfg = Config::from_args(&args(&["cube.obj", "--particles=500", "--dt=0.5"])).unwrap();
        assert_eq!(cfg.model, PathBuf::from("cube.obj"));
        assert_eq!(cfg.particles, 500);
        assert_eq!(cfg.dt, 0.5);
        assert_eq!(cfg.steps, 120);
        assert_eq!(cfg.texture, None);
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = Config::from_args(&args(&["--steps=lots", "m.obj", "--speed=-3"])).unwrap();
        assert_eq!(cfg.steps, 120);
        assert_eq!(cfg.speed, 0.0);
        assert_eq!(cfg.model, PathBuf::from("m.obj"));
    }

    #[test]
    fn missing_model_fails_run() {
        let cfg = Config::from_args(&args(&["/no/such/model.obj"])).unwrap();
        assert!(run(&cfg).is_err());
    }
}
