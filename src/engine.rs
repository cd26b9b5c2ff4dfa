// Cursor-reactive particle engine. Pointer motion spawns particles, every
// frame tick integrates and draws them, and stop() wipes everything.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::particle::Particle;
use crate::pointer::{InputEvent, InputKind, PointerTracker};
use crate::surface::Surface;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct ParticleEngine<S: Surface> {
    surface: S,
    config: EngineConfig,
    particles: Vec<Particle>,
    pointer: PointerTracker,
    active: bool,
    rng: StdRng,
}

impl<S: Surface> ParticleEngine<S> {
    pub fn new(surface: S, config: EngineConfig) -> Self {
        ParticleEngine::with_rng(surface, config, StdRng::from_entropy())
    }

    pub fn with_rng(surface: S, config: EngineConfig, rng: StdRng) -> Self {
        ParticleEngine {
            surface,
            config,
            particles: Vec::new(),
            pointer: PointerTracker::new(),
            active: false,
            rng,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn start(&mut self) {
        if !self.active {
            log::debug!("particle engine started");
        }
        self.active = true;
    }

    pub fn stop(&mut self) {
        if self.active {
            log::debug!("particle engine stopped with {} live particles", self.particles.len());
        }
        self.active = false;
        self.particles.clear();
        self.surface.clear();
    }

    /// Flips between running and stopped, returning the new state.
    pub fn toggle(&mut self) -> bool {
        if self.active {
            self.stop();
        } else {
            self.start();
        }
        self.active
    }

    /// Feeds one host event to the engine. Returns how many particles it spawned.
    pub fn handle_input(&mut self, event: &InputEvent) -> usize {
        match event.kind {
            InputKind::PointerMove | InputKind::TouchMove => {
                self.pointer.record(event.x, event.y);
                if self.active {
                    self.spawn()
                } else {
                    0
                }
            }
            InputKind::Resize => {
                self.surface
                    .resize(viewport_extent(event.x), viewport_extent(event.y));
                0
            }
        }
    }

    /// Pushes a ready-made particle, bypassing spawn rules.
    pub fn emit(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// One display frame: integrate then draw. Does nothing while stopped.
    pub fn tick(&mut self) -> Result<(), EngineError> {
        if !self.active {
            return Ok(());
        }
        self.update();
        self.render()
    }

    fn spawn(&mut self) -> usize {
        let mut count = self.config.spawn_count(self.pointer.speed());
        if let Some(max) = self.config.max_particles {
            count = count.min(max.saturating_sub(self.particles.len()));
        }
        for _ in 0..count {
            let p = Particle::spawn(
                &mut self.rng,
                &self.config,
                self.pointer.pos,
                self.pointer.vel,
            );
            self.particles.push(p);
        }
        count
    }

    pub fn update(&mut self) {
        let gravity = self.config.gravity;
        let drag = self.config.drag;
        for particle in &mut self.particles {
            particle.step(gravity, drag);
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn render(&mut self) -> Result<(), EngineError> {
        self.surface.clear();
        self.surface.begin_glow_pass()?;

        let mut result = Ok(());
        for p in &self.particles {
            result = self
                .surface
                .draw_glow(p.pos, p.glow_radius(), p.color, p.alpha());
            if result.is_err() {
                break;
            }
        }

        // Normal compositing comes back even when a draw failed
        let restored = self.surface.end_glow_pass();
        result.and(restored)
    }
}

fn viewport_extent(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, PALETTE};

    #[derive(Clone, Debug, PartialEq)]
    enum Op {
        Resize(u32, u32),
        Clear,
        BeginGlow,
        Glow {
            center: [f64; 2],
            radius: f64,
            color: Color,
            alpha: f64,
        },
        EndGlow,
    }

    #[derive(Default)]
    struct RecordingSurface {
        width: u32,
        height: u32,
        ops: Vec<Op>,
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.width = width;
            self.height = height;
            self.ops.push(Op::Resize(width, height));
        }

        fn clear(&mut self) {
            self.ops.push(Op::Clear);
        }

        fn begin_glow_pass(&mut self) -> Result<(), EngineError> {
            self.ops.push(Op::BeginGlow);
            Ok(())
        }

        fn draw_glow(
            &mut self,
            center: [f64; 2],
            radius: f64,
            color: Color,
            alpha: f64,
        ) -> Result<(), EngineError> {
            self.ops.push(Op::Glow { center, radius, color, alpha });
            Ok(())
        }

        fn end_glow_pass(&mut self) -> Result<(), EngineError> {
            self.ops.push(Op::EndGlow);
            Ok(())
        }
    }

    fn engine() -> ParticleEngine<RecordingSurface> {
        ParticleEngine::with_rng(
            RecordingSurface::default(),
            EngineConfig::default(),
            StdRng::seed_from_u64(42),
        )
    }

    fn mv(engine: &mut ParticleEngine<RecordingSurface>, x: f64, y: f64) -> usize {
        engine.handle_input(&InputEvent::pointer_move(x, y, 0.0))
    }

    fn still(decay: f64) -> Particle {
        Particle::new([5.0, 5.0], [0.0, 0.0], 2.0, PALETTE[0], 1.0, decay)
    }

    #[test]
    fn starts_stopped_and_idle() {
        let mut e = engine();
        assert!(!e.is_active());
        assert_eq!(mv(&mut e, 100.0, 100.0), 0);
        e.tick().unwrap();
        assert!(e.particles().is_empty());
        assert!(e.surface().ops.is_empty());
    }

    #[test]
    fn spawn_count_follows_pointer_speed() {
        let mut e = engine();
        e.start();
        // from the origin to (10, 0): speed 10
        assert_eq!(mv(&mut e, 10.0, 0.0), 5);
        // (10, 0) to (11, 1): speed ~1.41
        assert_eq!(mv(&mut e, 11.0, 1.0), 0);
        // speed 40 hits the per-event cap
        assert_eq!(mv(&mut e, 51.0, 1.0), 8);
        assert_eq!(e.particles().len(), 13);
    }

    #[test]
    fn spawned_particles_cluster_around_pointer() {
        let mut e = engine();
        e.start();
        mv(&mut e, 0.0, 0.0);
        assert_eq!(mv(&mut e, 10.0, 0.0), 5);
        for p in e.particles() {
            assert!(p.pos[0] >= 0.0 && p.pos[0] <= 20.0);
            assert!(p.pos[1] >= -10.0 && p.pos[1] <= 10.0);
            assert!(p.vel[0] >= 0.0 && p.vel[0] <= 2.0);
            assert!(p.vel[1] >= -1.0 && p.vel[1] <= 1.0);
            assert_eq!(p.life, 1.0);
        }
    }

    #[test]
    fn stationary_pointer_spawns_nothing() {
        let mut e = engine();
        e.start();
        mv(&mut e, 30.0, 30.0);
        let before = e.particles().len();
        assert_eq!(mv(&mut e, 30.0, 30.0), 0);
        assert_eq!(e.particles().len(), before);
    }

    #[test]
    fn touch_moves_spawn_like_pointer_moves() {
        let mut e = engine();
        e.start();
        let spawned = e.handle_input(&InputEvent::touch_move(0.0, 12.0, 3.0));
        assert_eq!(spawned, 6);
        assert_eq!(e.pointer().vel, [0.0, 12.0]);
    }

    #[test]
    fn inactive_moves_track_pointer_without_spawning() {
        let mut e = engine();
        for i in 1..20 {
            assert_eq!(mv(&mut e, i as f64 * 25.0, 0.0), 0);
        }
        assert!(e.particles().is_empty());
        assert_eq!(e.pointer().vel, [25.0, 0.0]);
    }

    #[test]
    fn life_drops_by_own_decay_each_tick() {
        let mut e = engine();
        e.start();
        mv(&mut e, 20.0, 0.0);
        mv(&mut e, 40.0, 10.0);
        assert!(!e.particles().is_empty());

        let before: Vec<Particle> = e.particles().to_vec();
        e.tick().unwrap();
        assert_eq!(before.len(), e.particles().len());
        for (old, new) in before.iter().zip(e.particles()) {
            assert_eq!(new.life, old.life - old.decay);
            assert_eq!(new.decay, old.decay);
        }

        for _ in 0..200 {
            e.tick().unwrap();
            assert!(e.particles().iter().all(|p| p.life > 0.0));
        }
        assert!(e.particles().is_empty());
    }

    #[test]
    fn removed_exactly_when_life_runs_out() {
        let mut e = engine();
        e.start();
        e.emit(still(0.02));
        for tick in 1..50 {
            e.tick().unwrap();
            assert_eq!(e.particles().len(), 1, "gone early at tick {}", tick);
        }
        e.tick().unwrap();
        assert!(e.particles().is_empty());
    }

    #[test]
    fn render_draws_fading_glow_in_blend_pass() {
        let mut e = engine();
        e.start();
        e.emit(Particle::new([10.0, 20.0], [0.0, 0.0], 3.0, PALETTE[2], 0.5, 0.25));
        e.surface_mut().ops.clear();

        e.tick().unwrap();
        let ops = &e.surface().ops;
        assert_eq!(ops.len(), 4);
        assert_eq!(ops[0], Op::Clear);
        assert_eq!(ops[1], Op::BeginGlow);
        match &ops[2] {
            Op::Glow { center, radius, color, alpha } => {
                assert!((center[0] - 10.0).abs() < 1e-12);
                assert!((center[1] - 20.0).abs() < 1e-12);
                assert_eq!(*radius, 6.0);
                assert_eq!(*color, PALETTE[2]);
                assert!((alpha - 0.375).abs() < 1e-12);
            }
            other => panic!("expected a glow, got {:?}", other),
        }
        assert_eq!(ops[3], Op::EndGlow);
    }

    #[test]
    fn render_with_no_particles_just_clears() {
        let mut e = engine();
        e.start();
        e.tick().unwrap();
        assert_eq!(e.surface().ops, vec![Op::Clear, Op::BeginGlow, Op::EndGlow]);
    }

    #[test]
    fn stop_empties_and_blanks_every_time() {
        let mut e = engine();
        e.start();
        mv(&mut e, 100.0, 0.0);
        assert!(!e.particles().is_empty());

        e.stop();
        assert!(!e.is_active());
        assert!(e.particles().is_empty());
        assert_eq!(e.surface().ops.last(), Some(&Op::Clear));

        e.surface_mut().ops.clear();
        e.stop();
        assert!(e.particles().is_empty());
        assert_eq!(e.surface().ops, vec![Op::Clear]);
    }

    #[test]
    fn restart_leaves_no_residue() {
        let mut e = engine();
        e.start();
        mv(&mut e, 60.0, 0.0);
        e.stop();
        e.start();
        assert!(e.particles().is_empty());

        e.tick().unwrap();
        assert!(e.particles().is_empty());
        assert_eq!(mv(&mut e, 64.0, 0.0), 2);
        assert_eq!(e.particles().len(), 2);
    }

    #[test]
    fn start_twice_keeps_running() {
        let mut e = engine();
        e.start();
        e.start();
        assert!(e.is_active());
    }

    #[test]
    fn toggle_flips_state() {
        let mut e = engine();
        assert!(e.toggle());
        mv(&mut e, 30.0, 0.0);
        assert!(!e.toggle());
        assert!(e.particles().is_empty());
        assert!(e.toggle());
    }

    #[test]
    fn hard_cap_bounds_collection() {
        let mut e = ParticleEngine::with_rng(
            RecordingSurface::default(),
            EngineConfig::default().with_max_particles(10),
            StdRng::seed_from_u64(1),
        );
        e.start();
        assert_eq!(mv(&mut e, 100.0, 0.0), 8);
        assert_eq!(mv(&mut e, 200.0, 0.0), 2);
        assert_eq!(mv(&mut e, 300.0, 0.0), 0);
        assert_eq!(e.particles().len(), 10);
    }

    #[test]
    fn resize_tolerates_degenerate_sizes() {
        let mut e = engine();
        e.handle_input(&InputEvent::resize(1280.0, 720.0, 0.0));
        assert_eq!((e.surface().width(), e.surface().height()), (1280, 720));

        e.handle_input(&InputEvent::resize(0.0, -5.0, 0.0));
        assert_eq!((e.surface().width(), e.surface().height()), (0, 0));

        e.handle_input(&InputEvent::resize(f64::NAN, f64::INFINITY, 0.0));
        assert_eq!((e.surface().width(), e.surface().height()), (0, 0));
    }

    #[test]
    fn resize_does_not_disturb_particles() {
        let mut e = engine();
        e.start();
        mv(&mut e, 40.0, 0.0);
        let count = e.particles().len();
        e.handle_input(&InputEvent::resize(640.0, 480.0, 0.0));
        assert_eq!(e.particles().len(), count);
        assert!(e.is_active());
    }
}
