//! Fixed-substep orchestration over a [`Scene`].

use crate::config::WorldConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::node::PointStimulus;
use crate::observer::StepObserver;
use crate::scene::Scene;
use alloc::boxed::Box;
use tracing::{info, trace, warn};

/// Scene construction callback used by [`Simulation::reset`].
pub type RebuildFn<F> = Box<dyn FnMut(&WorldConfig<F>) -> Result<Scene<F>, PhysicsError>>;

/// Advances a scene in fixed substeps.
///
/// Every substep runs, in order: each soft body (pressure, edge springs,
/// body nodes), each free-standing spring, then each free-standing node
/// (external point stimulus, then integration).
pub struct Simulation<F: Float> {
    scene: Scene<F>,
    config: WorldConfig<F>,
    rebuild: Option<RebuildFn<F>>,
    ticks: u64,
    running: bool,
    frame_delta: F,
}

impl<F: Float> Simulation<F> {
    pub fn new(config: WorldConfig<F>, scene: Scene<F>) -> Result<Self, PhysicsError> {
        config.validate()?;
        info!(
            nodes = scene.node_count(),
            springs = scene.spring_count(),
            bodies = scene.body_count(),
            substeps = config.substeps,
            "simulation created"
        );
        Ok(Simulation {
            scene,
            config,
            rebuild: None,
            ticks: 0,
            running: true,
            frame_delta: F::zero(),
        })
    }

    /// Build the initial scene with `rebuild` and keep it for later resets.
    pub fn from_rebuild<R>(config: WorldConfig<F>, mut rebuild: R) -> Result<Self, PhysicsError>
    where
        R: FnMut(&WorldConfig<F>) -> Result<Scene<F>, PhysicsError> + 'static,
    {
        let scene = rebuild(&config)?;
        let mut sim = Simulation::new(config, scene)?;
        sim.rebuild = Some(Box::new(rebuild));
        Ok(sim)
    }

    /// Store the callback used by [`Simulation::reset`].
    pub fn set_rebuild<R>(&mut self, rebuild: R)
    where
        R: FnMut(&WorldConfig<F>) -> Result<Scene<F>, PhysicsError> + 'static,
    {
        self.rebuild = Some(Box::new(rebuild));
    }

    pub fn config(&self) -> &WorldConfig<F> {
        &self.config
    }

    pub fn scene(&self) -> &Scene<F> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene<F> {
        &mut self.scene
    }

    /// Split `dt` into `config.substeps` equal substeps and run them.
    ///
    /// A non-positive or NaN `dt` leaves the scene untouched.
    pub fn step<O: StepObserver>(&mut self, dt: F, stimulus: PointStimulus<F>, observer: &mut O) {
        if !(dt > F::zero()) {
            return;
        }
        let substeps = self.config.substeps.max(1);
        let sub_dt = dt / F::from_usize(substeps);
        trace!(substeps, sub_dt = ?sub_dt, "step");

        for i in 0..substeps {
            self.advance(sub_dt, stimulus, observer);
            observer.on_substep(i);
        }

        observer.on_step_complete();
    }

    /// Run exactly one substep of length `dt`.
    pub fn substep<O: StepObserver>(&mut self, dt: F, stimulus: PointStimulus<F>, observer: &mut O) {
        if !(dt > F::zero()) {
            return;
        }
        self.advance(dt, stimulus, observer);
        observer.on_substep(0);
    }

    fn advance<O: StepObserver>(&mut self, dt: F, stimulus: PointStimulus<F>, observer: &mut O) {
        self.scene.update_bodies(dt, stimulus, &self.config, observer);
        self.scene.update_springs(dt, observer);
        self.scene.update_free_nodes(dt, stimulus, &self.config);
    }

    /// One host frame: clamp `elapsed` to `max_frame_delta`, step, count the tick.
    ///
    /// Returns `false` without stepping once the simulation has been stopped.
    pub fn tick<O: StepObserver>(
        &mut self,
        elapsed: F,
        stimulus: PointStimulus<F>,
        observer: &mut O,
    ) -> bool {
        if !self.running {
            return false;
        }
        let dt = elapsed.clamp(F::zero(), self.config.max_frame_delta);
        self.frame_delta = dt;
        self.step(dt, stimulus, observer);
        self.ticks += 1;
        true
    }

    /// Rebuild the scene with the stored callback.
    ///
    /// Without a stored callback, or when it fails, the current scene is kept
    /// and the failure is logged and returned.
    pub fn reset(&mut self) -> Result<(), PhysicsError> {
        let Some(rebuild) = self.rebuild.as_mut() else {
            warn!("reset requested without a rebuild callback, keeping current scene");
            return Err(PhysicsError::MalformedReset);
        };
        let result = rebuild(&self.config);
        self.install(result)
    }

    /// Rebuild the scene with a one-off callback. Same failure policy as
    /// [`Simulation::reset`].
    pub fn reset_with<R>(&mut self, rebuild: R) -> Result<(), PhysicsError>
    where
        R: FnOnce(&WorldConfig<F>) -> Result<Scene<F>, PhysicsError>,
    {
        let result = rebuild(&self.config);
        self.install(result)
    }

    fn install(&mut self, result: Result<Scene<F>, PhysicsError>) -> Result<(), PhysicsError> {
        match result {
            Ok(scene) => {
                info!(
                    nodes = scene.node_count(),
                    springs = scene.spring_count(),
                    bodies = scene.body_count(),
                    "scene reset"
                );
                self.scene = scene;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "scene rebuild failed, keeping current scene");
                Err(err)
            }
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames completed through [`Simulation::tick`].
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Clamped delta of the most recent tick.
    pub fn frame_delta(&self) -> F {
        self.frame_delta
    }

    /// Substeps simulated per second when ticking at `fps` frames per second.
    pub fn ticks_per_second(&self, fps: F) -> F {
        if !(self.frame_delta > F::zero()) {
            return F::zero();
        }
        F::from_usize(self.config.substeps) * fps / self.frame_delta
    }
}
