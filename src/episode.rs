use crate::brain::Entrant;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::sprites::SpriteSheet;
use crate::world::{AgentSummary, World};
use rand::RngCore;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Answer from the render hook after each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// Stop this episode and every one after it.
    Shutdown,
}

/// Observer called once per tick. Gets a shared borrow, so it cannot touch the simulation.
pub trait RenderHook {
    fn begin_episode(&mut self, _generation: usize) {}

    fn present(&mut self, world: &World<'_, '_>) -> Control;
}

/// Hook for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHook;

impl RenderHook for NullHook {
    fn present(&mut self, _world: &World<'_, '_>) -> Control {
        Control::Continue
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeReport {
    pub score: u32,
    pub ticks: u64,
    /// The hook asked for shutdown before every agent died.
    pub cancelled: bool,
    pub agents: Vec<AgentSummary>,
}

impl EpisodeReport {
    pub fn best_fitness(&self) -> Option<f64> {
        self.agents.iter().map(|a| a.fitness).max_by(f64::total_cmp)
    }

    pub fn mean_fitness(&self) -> Option<f64> {
        if self.agents.is_empty() {
            return None;
        }
        Some(self.agents.iter().map(|a| a.fitness).sum::<f64>() / self.agents.len() as f64)
    }
}

/// Fixed-rate tick scheduler. Sleeps until the next slot; never tries to catch up.
#[derive(Debug)]
pub struct Pacer {
    period: Option<Duration>,
    next: Instant,
}

impl Pacer {
    /// `ticks_per_second == 0` disables pacing.
    pub fn new(ticks_per_second: u32) -> Self {
        let period = (ticks_per_second > 0)
            .then(|| Duration::from_secs_f64(1.0 / f64::from(ticks_per_second)));
        Self {
            period,
            next: Instant::now() + period.unwrap_or_default(),
        }
    }

    pub fn wait(&mut self) {
        let Some(period) = self.period else {
            return;
        };
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
            self.next += period;
        } else {
            self.next = now + period;
        }
    }
}

/// Run one episode to extinction or shutdown. Fitness is written through the entrants.
pub fn run_episode(
    config: &SimConfig,
    sprites: &SpriteSheet,
    rng: &mut dyn RngCore,
    entrants: Vec<Entrant<'_>>,
    hook: &mut dyn RenderHook,
) -> Result<EpisodeReport, SimError> {
    let agents = entrants.len();
    let mut world = World::new(config, sprites, rng, entrants);
    let mut pacer = Pacer::new(config.tick_rate);
    let mut cancelled = false;
    debug!(agents, "episode started");

    while !world.is_extinct() {
        pacer.wait();
        world.step()?;
        if hook.present(&world) == Control::Shutdown {
            cancelled = true;
            break;
        }
    }

    let report = EpisodeReport {
        score: world.score(),
        ticks: world.tick(),
        cancelled,
        agents: world.summaries(),
    };
    info!(
        agents,
        score = report.score,
        ticks = report.ticks,
        cancelled,
        "episode finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::Constant;
    use crate::render::Renderer;
    use crate::world::Fate;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    struct StopAfter(u64);

    impl RenderHook for StopAfter {
        fn present(&mut self, world: &World<'_, '_>) -> Control {
            if world.tick() >= self.0 {
                Control::Shutdown
            } else {
                Control::Continue
            }
        }
    }

    /// Draws every frame several times over.
    struct Repaint {
        renderer: Renderer,
        frame: Vec<u8>,
        frames: usize,
    }

    impl RenderHook for Repaint {
        fn present(&mut self, world: &World<'_, '_>) -> Control {
            for _ in 0..3 {
                self.renderer.draw(world, &mut self.frame);
                self.frames += 1;
            }
            Control::Continue
        }
    }

    fn play(hook: &mut dyn RenderHook, seed: u64) -> (EpisodeReport, [f64; 2]) {
        let cfg = SimConfig::default().unpaced();
        let sheet = SpriteSheet::new();
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut up = Constant(1.0);
        let mut down = Constant(0.0);
        let mut fitness = [0.0; 2];
        let [f0, f1] = &mut fitness;
        let entrants = vec![
            Entrant::new(&mut up, f0),
            Entrant::new(&mut down, f1),
        ];
        let report = run_episode(&cfg, &sheet, &mut rng, entrants, hook).expect("episode");
        (report, fitness)
    }

    #[test]
    fn rendering_does_not_change_the_outcome() {
        let (plain, plain_fitness) = play(&mut NullHook, 5);
        let cfg = SimConfig::default();
        let mut repaint = Repaint {
            renderer: Renderer::new(&cfg),
            frame: vec![0; (cfg.field_width * cfg.field_height * 4) as usize],
            frames: 0,
        };
        let (drawn, drawn_fitness) = play(&mut repaint, 5);
        assert_eq!(plain, drawn);
        assert_eq!(plain_fitness, drawn_fitness);
        assert_eq!(repaint.frames as u64, drawn.ticks * 3);
    }

    #[test]
    fn shutdown_stops_early_and_reports_survivors() {
        let (report, fitness) = play(&mut StopAfter(5), 5);
        assert!(report.cancelled);
        assert_eq!(report.ticks, 5);
        for agent in &report.agents {
            assert_eq!(agent.fate, Fate::Alive);
            assert_eq!(agent.ticks_survived, 5);
        }
        assert!((fitness[0] - 0.5).abs() < 1e-9);
        assert_eq!(report.agents[0].fitness, fitness[0]);
        assert_eq!(report.agents[1].fitness, fitness[1]);
        let mean = report.mean_fitness().expect("mean");
        assert!((mean - (fitness[0] + fitness[1]) / 2.0).abs() < 1e-9);
        assert_eq!(report.best_fitness(), Some(fitness[0].max(fitness[1])));
    }

    #[test]
    fn empty_entrant_list_finishes_immediately() {
        let cfg = SimConfig::default().unpaced();
        let sheet = SpriteSheet::new();
        let mut rng = SmallRng::seed_from_u64(0);
        let report = run_episode(&cfg, &sheet, &mut rng, Vec::new(), &mut NullHook).expect("episode");
        assert_eq!(report.ticks, 0);
        assert_eq!(report.score, 0);
        assert!(!report.cancelled);
        assert_eq!(report.best_fitness(), None);
        assert_eq!(report.mean_fitness(), None);
    }

    #[test]
    fn pacer_holds_the_tick_rate() {
        let mut pacer = Pacer::new(200);
        let start = Instant::now();
        for _ in 0..10 {
            pacer.wait();
        }
        assert!(start.elapsed() >= Duration::from_millis(45));

        let mut unpaced = Pacer::new(0);
        let start = Instant::now();
        for _ in 0..1000 {
            unpaced.wait();
        }
        assert!(start.elapsed() < Duration::from_millis(45));
    }
}
