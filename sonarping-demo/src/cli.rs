use anyhow::{Context, Result};
use clap::Parser;
use sonarping_core::config::DEFAULT_SPEED_OF_SOUND;
use sonarping_core::math::Vec3;
use sonarping_core::scene::{HitPolicy, Triangle};
use sonarping_core::{PingEvent, Scene, SimulationDesc, SonarSimulation, Transducer};

/// Pings the reference scene and prints every transducer's echoes.
///
/// Set RUST_LOG=debug for per-ray output.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "sonarping-demo")]
#[command(about = "Active sonar ping simulation demo", long_about = None)]
pub struct CliOptions {
    /// Geometry worker threads
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,

    /// Resolve overlapping triangles by distance instead of insertion order
    #[arg(long)]
    pub nearest: bool,

    /// Reject hits behind the ray origin
    #[arg(long)]
    pub strict: bool,

    /// Number of pings to run
    #[arg(short, long, default_value_t = 1)]
    pub pings: usize,

    /// Speed of sound in m/s
    #[arg(short, long, default_value_t = DEFAULT_SPEED_OF_SOUND)]
    pub speed: f64,
}

impl CliOptions {
    pub fn simulation_desc(&self) -> SimulationDesc {
        let hit_policy = if self.nearest {
            HitPolicy::Nearest
        } else {
            HitPolicy::FirstHit
        };
        SimulationDesc::new()
            .worker_threads(self.threads)
            .hit_policy(hit_policy)
            .accept_behind_origin(!self.strict)
            .speed_of_sound(self.speed)
    }
}

/// The original test scene: one triangle in the plane x = 10 and a
/// two-element array, one looking at the triangle and one looking up.
pub fn reference_scene() -> Scene {
    let mut scene = Scene::default();
    scene.add_triangle(Triangle::new(
        Vec3::new(10.0, -10.0, 0.0),
        Vec3::new(10.0, 10.0, 0.0),
        Vec3::new(10.0, 0.0, -10.0),
    ));

    scene.add_transducer(Transducer::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)));
    scene.add_transducer(Transducer::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0)));
    scene
}

pub fn run(options: &CliOptions) -> Result<()> {
    let scene = reference_scene();
    log::info!(
        "Scene: {} triangle(s) ({} degenerate), {} transducer(s)",
        scene.mesh().len(),
        scene.mesh().degenerate_count(),
        scene.transducers().len()
    );

    let mut simulation = SonarSimulation::new(options.simulation_desc(), scene)
        .context("failed to create simulation")?;

    for _ in 0..options.pings {
        let report = simulation.run_ping()?;
        log::info!(
            "Ping {}: {} rays, {} hits, {} echoes (geometry {:?}, acoustics {:?})",
            report.ping_id,
            report.rays_cast,
            report.hits,
            report.echoes_recorded,
            report.timing.geometry,
            report.timing.acoustics
        );

        for event in simulation.poll_events() {
            match event {
                PingEvent::RayHit {
                    emitter,
                    point,
                    triangle_index,
                    ..
                } => log::info!("{} hit triangle {} at {:?}", emitter, triangle_index, point),
                PingEvent::RayMissed { emitter, .. } => log::info!("{} missed", emitter),
                PingEvent::DegenerateEmitter { emitter, error } => {
                    log::warn!("{} skipped: {}", emitter, error)
                }
                _ => log::debug!("Event: {:?}", event),
            }
        }
    }

    let scene = simulation.scene();
    for id in scene.transducer_ids() {
        let transducer = scene.transducer(id)?;
        println!(
            "{} at {:?} facing {:?}:",
            id,
            transducer.point(),
            transducer.direction()
        );
        if transducer.echoes().is_empty() {
            println!("  (no echoes)");
        }
        for echo in transducer.echoes() {
            println!(
                "  time = {:.6} s, magnitude = {:.6}",
                echo.time, echo.magnitude
            );
        }
    }

    Ok(())
}
