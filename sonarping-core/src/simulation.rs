//! Ping simulation driver.
//!
//! A ping runs in two stages that can be exercised separately:
//!
//! 1. **Geometry** ([`trace_rays`]): every transducer's beam samples are cast
//!    against the scene. Optionally split across a rayon thread pool.
//! 2. **Acoustics** ([`record_echoes`]): every hit is heard by every
//!    transducer. Time of flight and attenuation are computed per
//!    (hit, receiver) pair and appended to the receiver's echo history.

use crate::acoustics::EchoModel;
use crate::beam::BeamSample;
use crate::config::SimulationDesc;
use crate::error::{Result, SonarError};
use crate::events::{PingEvent, PingTiming};
use crate::math::{Vec3, unit};
use crate::scene::{HitPolicy, IntersectOptions, Mesh, Ray, RayHit, RayTracer, Triangle};
use crate::transducer::{Transducer, TransducerId};
use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use uuid::Uuid;

/// Geometry and sensors of one simulation.
///
/// The mesh and the transducers never reference each other; they only meet
/// inside a ping.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    mesh: Mesh,
    transducers: Vec<Transducer>,
}

impl Scene {
    pub fn new(mesh: Mesh, transducers: Vec<Transducer>) -> Self {
        Self { mesh, transducers }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.mesh.add_triangle(triangle);
    }

    /// Registers a transducer and returns its handle.
    pub fn add_transducer(&mut self, transducer: Transducer) -> TransducerId {
        let id = TransducerId(self.transducers.len());
        self.transducers.push(transducer);
        id
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    pub fn transducers(&self) -> &[Transducer] {
        &self.transducers
    }

    pub fn transducer_ids(&self) -> impl Iterator<Item = TransducerId> + '_ {
        (0..self.transducers.len()).map(TransducerId)
    }

    pub fn transducer(&self, id: TransducerId) -> Result<&Transducer> {
        self.transducers
            .get(id.0)
            .ok_or(SonarError::UnknownTransducer(id))
    }
}

/// Outcome of casting one beam sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayCast {
    pub emitter: TransducerId,
    /// Position of the emitting transducer, start of the outbound leg
    pub emitter_point: Vec3,
    /// Index of the sample within the emitter's beam
    pub sample_index: usize,
    pub ray: Ray,
    pub relative_intensity: f64,
    pub hit: Option<RayHit>,
}

/// Output of the geometry stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TracedRays {
    /// One entry per beam sample, ordered by emitter then sample index
    pub casts: Vec<RayCast>,
    /// Emitters skipped because their direction has zero length
    pub skipped_emitters: Vec<TransducerId>,
}

impl TracedRays {
    pub fn hit_count(&self) -> usize {
        self.casts.iter().filter(|cast| cast.hit.is_some()).count()
    }
}

/// Summary of a completed ping.
#[derive(Debug, Clone, PartialEq)]
pub struct PingReport {
    pub ping_id: Uuid,
    pub rays_cast: usize,
    pub hits: usize,
    pub echoes_recorded: usize,
    pub skipped_emitters: Vec<TransducerId>,
    pub timing: PingTiming,
}

struct PendingSample {
    emitter: TransducerId,
    emitter_point: Vec3,
    sample_index: usize,
    sample: BeamSample,
}

fn cast_sample(
    tracer: &dyn RayTracer,
    pending: &PendingSample,
    options: &IntersectOptions,
    policy: HitPolicy,
) -> RayCast {
    RayCast {
        emitter: pending.emitter,
        emitter_point: pending.emitter_point,
        sample_index: pending.sample_index,
        ray: pending.sample.ray,
        relative_intensity: pending.sample.relative_intensity,
        hit: tracer.cast_ray(&pending.sample.ray, options, policy),
    }
}

/// Casts `pending` on a dedicated rayon pool of `worker_threads` threads.
///
/// `collect` keeps input order, so the result matches a sequential run
/// exactly. A panic in any worker is reported as [`SonarError::Worker`].
fn cast_parallel(
    tracer: &dyn RayTracer,
    pending: &[PendingSample],
    options: IntersectOptions,
    policy: HitPolicy,
    worker_threads: usize,
) -> Result<Vec<RayCast>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_threads)
        .thread_name(|index| format!("sonarping-geometry-{}", index))
        .build()
        .map_err(|e| SonarError::Worker(format!("failed to start geometry pool: {}", e)))?;

    panic::catch_unwind(AssertUnwindSafe(|| {
        pool.install(|| {
            pending
                .par_iter()
                .map(|sample| cast_sample(tracer, sample, &options, policy))
                .collect::<Vec<_>>()
        })
    }))
    .map_err(|payload| {
        SonarError::Worker(format!(
            "geometry worker panicked: {}",
            panic_message(payload.as_ref())
        ))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

/// Geometry stage: casts every beam sample of every transducer.
///
/// A transducer whose direction has zero length cannot define a beam. It is
/// skipped with a warning and a [`PingEvent::DegenerateEmitter`]; the rest of
/// the array is still traced.
pub fn trace_rays(
    tracer: &dyn RayTracer,
    transducers: &[Transducer],
    desc: &SimulationDesc,
    events: &Sender<PingEvent>,
) -> Result<TracedRays> {
    let mut pending = Vec::new();
    let mut skipped_emitters = Vec::new();

    for (index, transducer) in transducers.iter().enumerate() {
        let emitter = TransducerId(index);
        if let Err(e) = unit(transducer.direction()) {
            log::warn!("Skipping {}: {}", emitter, e);
            let _ = events.send(PingEvent::DegenerateEmitter {
                emitter,
                error: e.to_string(),
            });
            skipped_emitters.push(emitter);
            continue;
        }

        pending.extend(
            transducer
                .beam_samples()
                .into_iter()
                .enumerate()
                .map(|(sample_index, sample)| PendingSample {
                    emitter,
                    emitter_point: transducer.point(),
                    sample_index,
                    sample,
                }),
        );
    }

    let options = desc.intersect_options();
    let casts = if desc.worker_threads > 1 && pending.len() > 1 {
        log::debug!(
            "Casting {} rays on {} worker threads",
            pending.len(),
            desc.worker_threads
        );
        cast_parallel(
            tracer,
            &pending,
            options,
            desc.hit_policy,
            desc.worker_threads,
        )?
    } else {
        pending
            .iter()
            .map(|sample| cast_sample(tracer, sample, &options, desc.hit_policy))
            .collect()
    };

    for cast in &casts {
        match cast.hit {
            Some(hit) => {
                log::debug!(
                    "{} sample {} hit triangle {} at {:?} (t = {})",
                    cast.emitter,
                    cast.sample_index,
                    hit.triangle_index,
                    hit.point,
                    hit.t
                );
                let _ = events.send(PingEvent::RayHit {
                    emitter: cast.emitter,
                    sample_index: cast.sample_index,
                    point: hit.point,
                    triangle_index: hit.triangle_index,
                });
            }
            None => {
                log::debug!("{} sample {} missed", cast.emitter, cast.sample_index);
                let _ = events.send(PingEvent::RayMissed {
                    emitter: cast.emitter,
                    sample_index: cast.sample_index,
                });
            }
        }
    }

    Ok(TracedRays {
        casts,
        skipped_emitters,
    })
}

/// Acoustics stage: broadcasts every hit to every transducer.
///
/// For each cast that hit, for each receiver, the echo is computed with
/// `model` and appended to the receiver's history. Returns the number of
/// echoes recorded.
pub fn record_echoes(
    casts: &[RayCast],
    transducers: &mut [Transducer],
    model: &EchoModel,
    events: &Sender<PingEvent>,
) -> usize {
    let mut recorded = 0;

    for cast in casts {
        let Some(hit) = cast.hit else {
            continue;
        };

        for (index, receiver) in transducers.iter_mut().enumerate() {
            let echo = model.echo_for(
                hit.point,
                cast.emitter_point,
                receiver.point(),
                cast.relative_intensity,
            );
            receiver.add_return_signal(echo.time, echo.magnitude);
            recorded += 1;

            let receiver_id = TransducerId(index);
            log::debug!(
                "{} heard {} echo: time = {:.6} s, magnitude = {:.6}",
                receiver_id,
                cast.emitter,
                echo.time,
                echo.magnitude
            );
            let _ = events.send(PingEvent::EchoRecorded {
                emitter: cast.emitter,
                receiver: receiver_id,
                echo,
            });
        }
    }

    recorded
}

/// Owns a [`Scene`] and runs pings against it.
///
/// # Example
///
/// ```
/// use sonarping_core::math::Vec3;
/// use sonarping_core::scene::Triangle;
/// use sonarping_core::{Scene, SimulationDesc, SonarSimulation, Transducer};
///
/// let mut scene = Scene::default();
/// scene.add_triangle(Triangle::new(
///     Vec3::new(10.0, -10.0, 0.0),
///     Vec3::new(10.0, 10.0, 0.0),
///     Vec3::new(10.0, 0.0, -10.0),
/// ));
/// let id = scene.add_transducer(Transducer::new(Vec3::ZERO, Vec3::X));
///
/// let mut simulation = SonarSimulation::new(SimulationDesc::default(), scene)?;
/// let report = simulation.run_ping()?;
/// assert_eq!(report.hits, 1);
///
/// let echoes = simulation.scene().transducer(id)?.echoes();
/// assert!((echoes[0].time - 20.0 / 1500.0).abs() < 1e-12);
/// # Ok::<(), sonarping_core::SonarError>(())
/// ```
pub struct SonarSimulation {
    desc: SimulationDesc,
    scene: Scene,
    event_sender: Sender<PingEvent>,
    event_receiver: Receiver<PingEvent>,
}

impl SonarSimulation {
    /// Validates `desc` and takes ownership of the scene.
    pub fn new(desc: SimulationDesc, scene: Scene) -> Result<Self> {
        desc.validate()?;
        let (event_sender, event_receiver) = unbounded();
        Ok(Self {
            desc,
            scene,
            event_sender,
            event_receiver,
        })
    }

    pub fn desc(&self) -> &SimulationDesc {
        &self.desc
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access between pings, e.g. to append triangles.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    /// Runs one ping: geometry stage, then acoustics stage.
    ///
    /// Echoes accumulate on the transducers across pings.
    pub fn run_ping(&mut self) -> Result<PingReport> {
        let ping_id = Uuid::new_v4();
        let Scene { mesh, transducers } = &mut self.scene;

        let geometry_start = Instant::now();
        let traced = trace_rays(&*mesh, transducers.as_slice(), &self.desc, &self.event_sender)?;
        let geometry = geometry_start.elapsed();

        let acoustics_start = Instant::now();
        let echoes_recorded = record_echoes(
            &traced.casts,
            transducers.as_mut_slice(),
            &self.desc.echo_model(),
            &self.event_sender,
        );
        let acoustics = acoustics_start.elapsed();

        let timing = PingTiming {
            geometry,
            acoustics,
        };
        let report = PingReport {
            ping_id,
            rays_cast: traced.casts.len(),
            hits: traced.hit_count(),
            echoes_recorded,
            skipped_emitters: traced.skipped_emitters,
            timing,
        };

        log::info!(
            "Ping {} complete: {} rays, {} hits, {} echoes in {:?}",
            ping_id,
            report.rays_cast,
            report.hits,
            report.echoes_recorded,
            timing.total()
        );
        let _ = self
            .event_sender
            .send(PingEvent::PingCompleted { ping_id, timing });

        Ok(report)
    }

    /// Drains every event emitted since the last call.
    pub fn poll_events(&self) -> Vec<PingEvent> {
        self.event_receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acoustics::attenuation_factor;

    const TOLERANCE: f64 = 1e-12;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn reference_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(10.0, -10.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(10.0, 0.0, -10.0),
        )
    }

    /// Front-facing for rays travelling +x; covers |y| <= 5 at z = 0.
    fn facing_wall(x: f64) -> Triangle {
        Triangle::new(
            Vec3::new(x, 10.0, -10.0),
            Vec3::new(x, -10.0, -10.0),
            Vec3::new(x, 0.0, 10.0),
        )
    }

    fn simulation(desc: SimulationDesc, scene: Scene) -> SonarSimulation {
        SonarSimulation::new(desc, scene).expect("valid simulation")
    }

    #[test]
    fn test_single_transducer_reference_scenario() {
        init_logger();
        let mut scene = Scene::default();
        scene.add_triangle(reference_triangle());
        let id = scene.add_transducer(Transducer::new(Vec3::ZERO, Vec3::X));

        let mut sim = simulation(SimulationDesc::default(), scene);
        let report = sim.run_ping().unwrap();
        assert_eq!(report.rays_cast, 1);
        assert_eq!(report.hits, 1);
        assert_eq!(report.echoes_recorded, 1);

        let hit_point = sim
            .poll_events()
            .into_iter()
            .find_map(|event| match event {
                PingEvent::RayHit { point, .. } => Some(point),
                _ => None,
            })
            .expect("hit event");
        assert!((hit_point.x - 10.0).abs() < TOLERANCE);
        assert!(hit_point.y.abs() <= 10.0 && hit_point.z <= 0.0 && hit_point.z >= -10.0);

        let echoes = sim.scene().transducer(id).unwrap().echoes();
        assert_eq!(echoes.len(), 1);
        assert!((echoes[0].time - 0.013333333333).abs() < 1e-9);
        assert!((echoes[0].magnitude - attenuation_factor(10.0, -0.1)).abs() < TOLERANCE);
    }

    // Two transducers, as in the original array: only the first ray hits, and
    // both transducers hear it.
    #[test]
    fn test_every_receiver_hears_every_hit() {
        init_logger();
        let mut scene = Scene::default();
        scene.add_triangle(reference_triangle());
        let forward = scene.add_transducer(Transducer::new(Vec3::ZERO, Vec3::X));
        let upward = scene.add_transducer(Transducer::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Z));

        let mut sim = simulation(SimulationDesc::default(), scene);
        let report = sim.run_ping().unwrap();
        assert_eq!(report.rays_cast, 2);
        assert_eq!(report.hits, 1);
        assert_eq!(report.echoes_recorded, 2);

        let forward_echoes = sim.scene().transducer(forward).unwrap().echoes();
        assert_eq!(forward_echoes.len(), 1);
        assert!((forward_echoes[0].time - 20.0 / 1500.0).abs() < TOLERANCE);

        let return_distance = 101f64.sqrt();
        let upward_echoes = sim.scene().transducer(upward).unwrap().echoes();
        assert_eq!(upward_echoes.len(), 1);
        assert!((upward_echoes[0].time - (10.0 + return_distance) / 1500.0).abs() < TOLERANCE);
        assert!(
            (upward_echoes[0].magnitude - attenuation_factor(return_distance, -0.1)).abs()
                < TOLERANCE
        );
    }

    #[test]
    fn test_outbound_leg_measured_from_emitter() {
        let mut scene = Scene::default();
        scene.add_triangle(facing_wall(10.0));
        let a = scene.add_transducer(Transducer::new(Vec3::ZERO, Vec3::X));
        let b = scene.add_transducer(Transducer::new(Vec3::new(0.0, 2.0, 0.0), Vec3::X));

        let mut sim = simulation(SimulationDesc::default(), scene);
        let report = sim.run_ping().unwrap();
        assert_eq!(report.hits, 2);
        assert_eq!(report.echoes_recorded, 4);

        // Receiver `a` hears its own hit at (10, 0, 0) and b's at (10, 2, 0).
        let echoes = sim.scene().transducer(a).unwrap().echoes();
        assert_eq!(echoes.len(), 2);
        assert!((echoes[0].time - 20.0 / 1500.0).abs() < TOLERANCE);
        assert!((echoes[1].time - (10.0 + 104f64.sqrt()) / 1500.0).abs() < TOLERANCE);

        let echoes = sim.scene().transducer(b).unwrap().echoes();
        assert!((echoes[0].time - (10.0 + 104f64.sqrt()) / 1500.0).abs() < TOLERANCE);
        assert!((echoes[1].time - 20.0 / 1500.0).abs() < TOLERANCE);
    }

    // FirstHit (default): the wall inserted first wins even though it is farther.
    #[test]
    fn test_first_hit_policy_uses_insertion_order() {
        let mut scene = Scene::default();
        scene.add_triangle(facing_wall(20.0));
        scene.add_triangle(facing_wall(10.0));
        let id = scene.add_transducer(Transducer::new(Vec3::ZERO, Vec3::X));

        let mut sim = simulation(SimulationDesc::default(), scene.clone());
        sim.run_ping().unwrap();
        let echo = sim.scene().transducer(id).unwrap().echoes()[0];
        assert!((echo.time - 40.0 / 1500.0).abs() < TOLERANCE);

        // Nearest: the closer wall.
        let mut sim = simulation(SimulationDesc::new().hit_policy(HitPolicy::Nearest), scene);
        sim.run_ping().unwrap();
        let echo = sim.scene().transducer(id).unwrap().echoes()[0];
        assert!((echo.time - 20.0 / 1500.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_behind_origin_hits_follow_flag() {
        let mut scene = Scene::default();
        scene.add_triangle(reference_triangle());
        let id = scene.add_transducer(Transducer::new(Vec3::new(20.0, 0.0, -2.0), Vec3::X));

        let mut loose = simulation(SimulationDesc::default(), scene.clone());
        let report = loose.run_ping().unwrap();
        assert_eq!(report.hits, 1);
        let echo = loose.scene().transducer(id).unwrap().echoes()[0];
        assert!((echo.time - 20.0 / 1500.0).abs() < TOLERANCE);

        let mut strict = simulation(SimulationDesc::new().accept_behind_origin(false), scene);
        let report = strict.run_ping().unwrap();
        assert_eq!(report.hits, 0);
        assert!(strict.scene().transducer(id).unwrap().echoes().is_empty());
    }

    #[test]
    fn test_empty_mesh_records_nothing() {
        let mut scene = Scene::default();
        let id = scene.add_transducer(Transducer::new(Vec3::ZERO, Vec3::X));

        let mut sim = simulation(SimulationDesc::default(), scene);
        let report = sim.run_ping().unwrap();
        assert_eq!(report.rays_cast, 1);
        assert_eq!(report.hits, 0);
        assert_eq!(report.echoes_recorded, 0);
        assert!(sim.scene().transducer(id).unwrap().echoes().is_empty());

        let events = sim.poll_events();
        assert!(events.iter().any(|e| matches!(e, PingEvent::RayMissed { .. })));
        assert!(!events.iter().any(PingEvent::is_echo));
    }

    #[test]
    fn test_degenerate_emitter_is_skipped_not_fatal() {
        init_logger();
        let mut scene = Scene::default();
        scene.add_triangle(reference_triangle());
        let broken = scene.add_transducer(Transducer::new(Vec3::new(0.0, 0.0, -1.0), Vec3::ZERO));
        let working = scene.add_transducer(Transducer::new(Vec3::ZERO, Vec3::X));

        let mut sim = simulation(SimulationDesc::default(), scene);
        let report = sim.run_ping().unwrap();
        assert_eq!(report.skipped_emitters, vec![broken]);
        assert_eq!(report.rays_cast, 1);
        assert_eq!(report.hits, 1);

        // The skipped transducer still receives as a hydrophone.
        assert_eq!(sim.scene().transducer(broken).unwrap().echoes().len(), 1);
        assert_eq!(sim.scene().transducer(working).unwrap().echoes().len(), 1);

        let events = sim.poll_events();
        assert!(events.iter().any(|e| e.is_error() && e.emitter() == Some(broken)));
    }

    #[test]
    fn test_degenerate_triangle_is_tolerated() {
        let mut scene = Scene::default();
        scene.add_triangle(Triangle::new(Vec3::ZERO, Vec3::Y, 2.0 * Vec3::Y));
        scene.add_triangle(reference_triangle());
        let id = scene.add_transducer(Transducer::new(Vec3::ZERO, Vec3::X));

        let mut sim = simulation(SimulationDesc::default(), scene);
        assert_eq!(sim.scene().mesh().degenerate_count(), 1);
        sim.run_ping().unwrap();
        assert_eq!(sim.scene().transducer(id).unwrap().echoes().len(), 1);
    }

    #[test]
    fn test_parallel_geometry_matches_sequential() {
        init_logger();
        let mut scene = Scene::default();
        scene.add_triangle(facing_wall(12.0));
        scene.add_triangle(facing_wall(30.0));
        scene.add_triangle(reference_triangle());
        for i in 0..9 {
            let y = i as f64 - 4.0;
            scene.add_transducer(Transducer::new(
                Vec3::new(0.0, y, 0.0),
                Vec3::new(1.0, 0.0, 0.1 * y),
            ));
        }
        // Zero-direction emitter in the middle of the array.
        scene.add_transducer(Transducer::new(Vec3::ZERO, Vec3::ZERO));

        let mut sequential = simulation(SimulationDesc::default(), scene.clone());
        let mut parallel = simulation(SimulationDesc::new().worker_threads(4), scene);

        let sequential_report = sequential.run_ping().unwrap();
        let parallel_report = parallel.run_ping().unwrap();
        assert_eq!(sequential_report.rays_cast, parallel_report.rays_cast);
        assert_eq!(sequential_report.hits, parallel_report.hits);
        assert_eq!(sequential_report.echoes_recorded, parallel_report.echoes_recorded);
        assert!(parallel_report.hits > 0);

        for (a, b) in sequential
            .scene()
            .transducers()
            .iter()
            .zip(parallel.scene().transducers())
        {
            assert_eq!(a.echoes(), b.echoes());
        }
    }

    struct PanickingTracer;

    impl RayTracer for PanickingTracer {
        fn cast_ray(
            &self,
            _ray: &Ray,
            _options: &IntersectOptions,
            _policy: HitPolicy,
        ) -> Option<RayHit> {
            panic!("tracer failure");
        }
    }

    // Every worker panics; the geometry stage must still return an error.
    #[test]
    fn test_worker_panic_is_reported_as_error() {
        init_logger();
        let transducers: Vec<Transducer> = (0..4)
            .map(|i| Transducer::new(Vec3::new(0.0, i as f64, 0.0), Vec3::X))
            .collect();
        let (sender, _receiver) = unbounded();

        let result = trace_rays(
            &PanickingTracer,
            &transducers,
            &SimulationDesc::new().worker_threads(4),
            &sender,
        );
        match result {
            Err(SonarError::Worker(message)) => assert!(message.contains("tracer failure")),
            other => panic!("expected a worker error, got {:?}", other),
        }
        assert!(transducers.iter().all(|t| t.echoes().is_empty()));
    }

    #[test]
    fn test_stages_run_independently() {
        let mesh: Mesh = [facing_wall(10.0)].into_iter().collect();
        let mut transducers = vec![
            Transducer::new(Vec3::ZERO, Vec3::X),
            Transducer::new(Vec3::new(0.0, 50.0, 0.0), Vec3::X),
        ];
        let (sender, receiver) = unbounded();

        let traced = trace_rays(&mesh, &transducers, &SimulationDesc::default(), &sender).unwrap();
        assert_eq!(traced.casts.len(), 2);
        assert!(traced.casts[0].hit.is_some());
        assert!(traced.casts[1].hit.is_none());
        assert_eq!(traced.hit_count(), 1);
        // Geometry alone records nothing.
        assert!(transducers.iter().all(|t| t.echoes().is_empty()));

        let recorded = record_echoes(
            &traced.casts,
            &mut transducers,
            &EchoModel::default(),
            &sender,
        );
        assert_eq!(recorded, 2);
        assert_eq!(transducers[1].echoes().len(), 1);

        let echo_events = receiver.try_iter().filter(PingEvent::is_echo).count();
        assert_eq!(echo_events, 2);
    }

    #[test]
    fn test_echoes_accumulate_across_pings() {
        let mut scene = Scene::default();
        scene.add_triangle(reference_triangle());
        let id = scene.add_transducer(Transducer::new(Vec3::ZERO, Vec3::X));

        let mut sim = simulation(SimulationDesc::default(), scene);
        let first = sim.run_ping().unwrap();
        let second = sim.run_ping().unwrap();
        assert_ne!(first.ping_id, second.ping_id);

        let echoes = sim.scene().transducer(id).unwrap().echoes();
        assert_eq!(echoes.len(), 2);
        assert_eq!(echoes[0], echoes[1]);
    }

    #[test]
    fn test_triangles_added_between_pings() {
        let mut scene = Scene::default();
        let id = scene.add_transducer(Transducer::new(Vec3::ZERO, Vec3::X));
        let mut sim = simulation(SimulationDesc::default(), scene);

        assert_eq!(sim.run_ping().unwrap().hits, 0);
        sim.scene_mut().add_triangle(reference_triangle());
        assert_eq!(sim.run_ping().unwrap().hits, 1);
        assert_eq!(sim.into_scene().transducer(id).unwrap().echoes().len(), 1);
    }

    #[test]
    fn test_poll_events_drains_queue() {
        let mut scene = Scene::default();
        scene.add_triangle(reference_triangle());
        scene.add_transducer(Transducer::new(Vec3::ZERO, Vec3::X));
        let mut sim = simulation(SimulationDesc::default(), scene);

        let report = sim.run_ping().unwrap();
        let events = sim.poll_events();
        assert!(matches!(
            events.last(),
            Some(PingEvent::PingCompleted { ping_id, .. }) if *ping_id == report.ping_id
        ));
        assert!(sim.poll_events().is_empty());
    }

    #[test]
    fn test_invalid_desc_is_rejected() {
        let result =
            SonarSimulation::new(SimulationDesc::new().speed_of_sound(-1.0), Scene::default());
        assert!(matches!(result, Err(SonarError::Configuration(_))));
    }

    #[test]
    fn test_unknown_transducer_lookup() {
        let scene = Scene::default();
        assert_eq!(
            scene.transducer(TransducerId(0)).unwrap_err(),
            SonarError::UnknownTransducer(TransducerId(0))
        );
        assert_eq!(scene.transducer_ids().count(), 0);
    }
}
