use crate::base::Base;
use crate::bird::{Bird, Physics};
use crate::brain::{Brain, Entrant, Observation};
use crate::collision::collides;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::pipe::Pipe;
use crate::sprites::SpriteSheet;
use rand::RngCore;
use tracing::{debug, trace};

/// Why an agent left the live set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    /// Still flying when the episode stopped.
    Alive,
    Collided,
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSummary {
    /// Position of the agent in the entrant list.
    pub id: usize,
    pub ticks_survived: u64,
    pub fate: Fate,
    /// Fitness when the agent left, or now if it is still alive.
    pub fitness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    pub tick: u64,
    /// A pipe was passed this tick.
    pub passed: bool,
    pub removed: usize,
    /// No agents remain; the episode is over.
    pub extinct: bool,
}

/// A bird bundled with the brain and fitness slot it answers to.
struct Agent<'e> {
    id: usize,
    bird: Bird,
    fate: Fate,
    brain: &'e mut dyn Brain,
    fitness: &'e mut f64,
}

/// Live state of one episode. Owns birds and pipes; borrows the host's
/// config, sprites and rng for `'w` and the optimizer's entrants for `'e`.
pub struct World<'w, 'e> {
    config: &'w SimConfig,
    sprites: &'w SpriteSheet,
    rng: &'w mut dyn RngCore,
    agents: Vec<Agent<'e>>,
    pipes: Vec<Pipe>,
    base: Base,
    score: u32,
    tick: u64,
    summaries: Vec<AgentSummary>,
}

impl<'w, 'e> World<'w, 'e> {
    /// Spawn one bird per entrant and the first pipe. Fitness slots are reset to zero.
    pub fn new(
        config: &'w SimConfig,
        sprites: &'w SpriteSheet,
        rng: &'w mut dyn RngCore,
        entrants: Vec<Entrant<'e>>,
    ) -> Self {
        let physics = Physics::from(config);
        let mut summaries = Vec::with_capacity(entrants.len());
        let agents = entrants
            .into_iter()
            .enumerate()
            .map(|(id, entrant)| {
                *entrant.fitness = 0.0;
                summaries.push(AgentSummary {
                    id,
                    ticks_survived: 0,
                    fate: Fate::Alive,
                    fitness: 0.0,
                });
                Agent {
                    id,
                    bird: Bird::new(config.bird_x, config.bird_start_y, physics),
                    fate: Fate::Alive,
                    brain: entrant.brain,
                    fitness: entrant.fitness,
                }
            })
            .collect();
        let first = Pipe::new(config.pipe_spawn_x, config, &mut *rng);
        Self {
            config,
            sprites,
            rng,
            agents,
            pipes: vec![first],
            base: Base::new(config.ground_y, config.pipe_velocity),
            score: 0,
            tick: 0,
            summaries,
        }
    }

    /// Replace the obstacle set, e.g. to stage a scenario.
    pub fn set_pipes(&mut self, pipes: Vec<Pipe>) {
        self.pipes = pipes;
    }

    pub fn config(&self) -> &SimConfig {
        self.config
    }

    pub fn sprites(&self) -> &SpriteSheet {
        self.sprites
    }

    pub fn birds(&self) -> impl Iterator<Item = &Bird> {
        self.agents.iter().map(|a| &a.bird)
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn alive(&self) -> usize {
        self.agents.len()
    }

    pub fn is_extinct(&self) -> bool {
        self.agents.is_empty()
    }

    /// Index of the pipe the birds should be looking at.
    pub fn target_pipe(&self) -> Option<usize> {
        let lead = self.agents.first()?;
        match self.pipes.len() {
            0 => None,
            1 => Some(0),
            _ if lead.bird.x > self.pipes[0].right_edge() => Some(1),
            _ => Some(0),
        }
    }

    /// Advance the world by one tick.
    pub fn step(&mut self) -> Result<StepOutcome, SimError> {
        if self.agents.is_empty() {
            return Ok(StepOutcome {
                tick: self.tick,
                extinct: true,
                ..StepOutcome::default()
            });
        }
        self.tick += 1;
        let cfg = self.config;

        let target = self
            .target_pipe()
            .map(|i| (self.pipes[i].height as f32, self.pipes[i].bottom as f32));
        if target.is_none() {
            debug!(tick = self.tick, "no pipe to observe, skipping decisions");
        }

        for agent in &mut self.agents {
            agent.bird.advance();
            *agent.fitness += cfg.survival_reward;
            let Some((gap_top, gap_bottom)) = target else {
                continue;
            };
            let y = agent.bird.y;
            let observation = Observation {
                y,
                gap_top_distance: (y - gap_top).abs(),
                gap_bottom_distance: (y - gap_bottom).abs(),
            };
            let output = agent
                .brain
                .decide(&observation)
                .map_err(|source| SimError::Decision {
                    agent: agent.id,
                    source,
                })?;
            if output > cfg.decision_threshold {
                agent.bird.jump();
            }
        }

        let mut add_pipe = false;
        for pipe in &mut self.pipes {
            for agent in self.agents.iter_mut().filter(|a| a.fate == Fate::Alive) {
                if collides(&agent.bird, pipe, self.sprites) {
                    *agent.fitness -= cfg.collision_penalty;
                    agent.fate = Fate::Collided;
                    continue;
                }
                if pipe.right_edge() < agent.bird.x && pipe.mark_passed() {
                    add_pipe = true;
                }
            }
        }
        let mut removed = self.reap();

        for pipe in &mut self.pipes {
            pipe.advance();
        }
        self.pipes.retain(|p| {
            if p.is_off_screen() {
                trace!(x = p.x, "pipe retired");
            }
            !p.is_off_screen()
        });

        if add_pipe {
            self.score += 1;
            for agent in &mut self.agents {
                *agent.fitness += cfg.pass_reward;
            }
            let pipe = Pipe::new(cfg.pipe_spawn_x, cfg, &mut *self.rng);
            debug!(score = self.score, gap = pipe.height, "pipe passed, spawned next");
            self.pipes.push(pipe);
        }

        let bird_height = self.sprites.bird[0].height() as f32;
        for agent in &mut self.agents {
            let y = agent.bird.y;
            if agent.fate == Fate::Alive && (y + bird_height >= cfg.ground_y as f32 || y < 0.0) {
                agent.fate = Fate::OutOfBounds;
            }
        }
        removed += self.reap();

        self.base.advance();
        for agent in &mut self.agents {
            agent.bird.animate();
        }

        Ok(StepOutcome {
            tick: self.tick,
            passed: add_pipe,
            removed,
            extinct: self.agents.is_empty(),
        })
    }

    /// Drop every agent marked dead, releasing its brain and fitness borrow.
    fn reap(&mut self) -> usize {
        let before = self.agents.len();
        let tick = self.tick;
        let summaries = &mut self.summaries;
        self.agents.retain(|a| {
            if a.fate == Fate::Alive {
                return true;
            }
            trace!(agent = a.id, fate = ?a.fate, tick, "agent removed");
            summaries[a.id] = AgentSummary {
                id: a.id,
                ticks_survived: tick,
                fate: a.fate,
                fitness: *a.fitness,
            };
            false
        });
        before - self.agents.len()
    }

    /// Per-agent outcomes in entrant order. Agents still alive report the current tick.
    pub fn summaries(&self) -> Vec<AgentSummary> {
        let mut out = self.summaries.clone();
        for agent in &self.agents {
            out[agent.id].ticks_survived = self.tick;
            out[agent.id].fitness = *agent.fitness;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::Constant;
    use crate::error::BrainError;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn pass_bonus_is_granted_once_to_every_live_agent() {
        let cfg = SimConfig::default();
        let sheet = SpriteSheet::new();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut brains = [Constant(0.0), Constant(0.0), Constant(0.0)];
        let mut fitness = [0.0f64; 3];
        let entrants = brains
            .iter_mut()
            .zip(fitness.iter_mut())
            .map(|(b, f)| Entrant::new(b, f))
            .collect();
        let mut world = World::new(&cfg, &sheet, &mut rng, entrants);
        // Right edge at 234: passes the birds on the second tick.
        world.set_pipes(vec![Pipe::with_height(130, 250, &cfg)]);

        let first = world.step().expect("tick 1");
        assert!(!first.passed);
        let second = world.step().expect("tick 2");
        assert!(second.passed);
        assert_eq!(world.score(), 1);
        assert_eq!(world.pipes().len(), 2);
        assert!(world.pipes()[0].passed);
        assert!(!world.pipes()[1].passed);

        while !world.step().expect("tick").extinct {}
        assert_eq!(world.score(), 1);
        let summaries = world.summaries();
        drop(world);
        for (f, s) in fitness.iter().zip(&summaries) {
            assert_eq!(s.fate, Fate::OutOfBounds);
            assert!(close(*f, 0.1 * s.ticks_survived as f64 + 5.0));
        }
    }

    #[test]
    fn agent_dying_on_a_passing_tick_misses_the_bonus() {
        let cfg = SimConfig::default();
        let wide = SimConfig {
            pipe_gap: 700,
            ..SimConfig::default()
        };
        let sheet = SpriteSheet::new();
        let mut rng = SmallRng::seed_from_u64(4);
        let mut faller = Constant(0.0);
        let mut jumper = Constant(1.0);
        let (mut f_faller, mut f_jumper) = (0.0, 0.0);
        let entrants = vec![
            Entrant::new(&mut faller, &mut f_faller),
            Entrant::new(&mut jumper, &mut f_jumper),
        ];
        let mut world = World::new(&cfg, &sheet, &mut rng, entrants);
        world.set_pipes(vec![
            // Wide open; its right edge drops behind the birds on tick 4.
            Pipe::with_height(140, 20, &wide),
            // Lower barrier at y=420: the faller's belly reaches it on tick 4,
            // the jumper stays well above.
            Pipe::with_height(250, 220, &cfg),
        ]);

        for tick in 1..=3 {
            let outcome = world.step().expect("tick");
            assert!(!outcome.passed, "early pass on tick {tick}");
            assert_eq!(outcome.removed, 0, "early removal on tick {tick}");
        }
        let fourth = world.step().expect("tick 4");
        assert!(fourth.passed);
        assert_eq!(fourth.removed, 1);
        assert_eq!(world.score(), 1);
        assert_eq!(world.alive(), 1);
        let summaries = world.summaries();
        drop(world);

        assert_eq!(summaries[0].fate, Fate::Collided);
        assert_eq!(summaries[0].ticks_survived, 4);
        assert_eq!(summaries[1].fate, Fate::Alive);
        assert!(close(f_faller, 0.4 - 1.0), "faller {f_faller}");
        assert!(close(f_jumper, 0.4 + 5.0), "jumper {f_jumper}");
        assert!(close(summaries[0].fitness, f_faller));
    }

    #[test]
    fn collision_penalises_and_removes() {
        let cfg = SimConfig::default();
        let sheet = SpriteSheet::new();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut brain = Constant(0.0);
        let mut fitness = 0.0;
        let mut world = World::new(&cfg, &sheet, &mut rng, vec![Entrant::new(&mut brain, &mut fitness)]);
        // Bottom barrier starts at y=250, squarely over the bird.
        world.set_pipes(vec![Pipe::with_height(200, 50, &cfg)]);

        let outcome = world.step().expect("tick");
        assert!(outcome.extinct);
        assert_eq!(outcome.removed, 1);
        assert_eq!(world.summaries()[0].fate, Fate::Collided);
        drop(world);
        assert!(close(fitness, 0.1 - 1.0));
    }

    #[test]
    fn removal_keeps_brains_paired_with_birds() {
        let cfg = SimConfig::default();
        let sheet = SpriteSheet::new();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut up_calls = 0u64;
        let mut down_calls = 0u64;
        let mut up = |_: &Observation| -> Result<f32, BrainError> {
            up_calls += 1;
            Ok(1.0)
        };
        let mut down = |_: &Observation| -> Result<f32, BrainError> {
            down_calls += 1;
            Ok(0.0)
        };
        let (mut f_down, mut f_up) = (0.0, 0.0);
        let entrants = vec![Entrant::new(&mut down, &mut f_down), Entrant::new(&mut up, &mut f_up)];
        let mut world = World::new(&cfg, &sheet, &mut rng, entrants);
        while !world.step().expect("tick").extinct {}
        let summaries = world.summaries();
        drop(world);

        assert_eq!(summaries[0].fate, Fate::OutOfBounds);
        assert_eq!(summaries[1].fate, Fate::OutOfBounds);
        assert!(summaries[0].ticks_survived < summaries[1].ticks_survived);
        assert_eq!(down_calls, summaries[0].ticks_survived);
        assert_eq!(up_calls, summaries[1].ticks_survived);
        assert!(close(f_down, 0.1 * summaries[0].ticks_survived as f64));
        assert!(close(f_up, 0.1 * summaries[1].ticks_survived as f64));
    }

    #[test]
    fn observation_measures_distance_to_gap_edges() {
        let cfg = SimConfig::default();
        let sheet = SpriteSheet::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut seen = Vec::new();
        let mut brain = |o: &Observation| -> Result<f32, BrainError> {
            seen.push(*o);
            Ok(0.0)
        };
        let mut fitness = 0.0;
        let mut world = World::new(&cfg, &sheet, &mut rng, vec![Entrant::new(&mut brain, &mut fitness)]);
        world.set_pipes(vec![Pipe::with_height(600, 250, &cfg)]);
        world.step().expect("tick");
        drop(world);
        assert_eq!(
            seen,
            vec![Observation {
                y: 351.5,
                gap_top_distance: 101.5,
                gap_bottom_distance: 98.5,
            }]
        );
    }

    #[test]
    fn target_moves_to_next_pipe_once_first_is_behind() {
        let cfg = SimConfig::default();
        let sheet = SpriteSheet::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut seen = Vec::new();
        let mut brain = |o: &Observation| -> Result<f32, BrainError> {
            seen.push(o.gap_top_distance);
            Ok(0.0)
        };
        let mut fitness = 0.0;
        let mut world = World::new(&cfg, &sheet, &mut rng, vec![Entrant::new(&mut brain, &mut fitness)]);
        world.set_pipes(vec![
            Pipe::with_height(100, 100, &cfg),
            Pipe::with_height(400, 300, &cfg),
        ]);
        assert_eq!(world.target_pipe(), Some(1));
        world.step().expect("tick");
        assert_eq!(world.score(), 1);
        drop(world);
        assert_eq!(seen, vec![51.5]);
    }

    #[test]
    fn empty_pipe_set_skips_decisions() {
        let cfg = SimConfig::default();
        let sheet = SpriteSheet::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut calls = 0;
        let mut brain = |_: &Observation| -> Result<f32, BrainError> {
            calls += 1;
            Ok(1.0)
        };
        let mut fitness = 0.0;
        let mut world = World::new(&cfg, &sheet, &mut rng, vec![Entrant::new(&mut brain, &mut fitness)]);
        world.set_pipes(Vec::new());
        assert_eq!(world.target_pipe(), None);
        let outcome = world.step().expect("tick");
        assert!(!outcome.extinct);
        assert_eq!(world.alive(), 1);
        drop(world);
        assert_eq!(calls, 0);
        assert!(close(fitness, 0.1));
    }

    #[test]
    fn failing_brain_aborts_the_step() {
        let cfg = SimConfig::default();
        let sheet = SpriteSheet::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ok = Constant(0.0);
        let mut broken =
            |_: &Observation| -> Result<f32, BrainError> { Err("network exploded".into()) };
        let (mut f0, mut f1) = (0.0, 0.0);
        let entrants = vec![Entrant::new(&mut ok, &mut f0), Entrant::new(&mut broken, &mut f1)];
        let mut world = World::new(&cfg, &sheet, &mut rng, entrants);
        match world.step() {
            Err(SimError::Decision { agent, source }) => {
                assert_eq!(agent, 1);
                assert_eq!(source.to_string(), "network exploded");
            }
            other => panic!("expected decision error, got {other:?}"),
        }
    }

    #[test]
    fn stepping_an_empty_world_is_a_no_op() {
        let cfg = SimConfig::default();
        let sheet = SpriteSheet::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut world = World::new(&cfg, &sheet, &mut rng, Vec::new());
        let outcome = world.step().expect("tick");
        assert!(outcome.extinct);
        assert_eq!(world.tick(), 0);
        assert!(world.summaries().is_empty());
    }
}
