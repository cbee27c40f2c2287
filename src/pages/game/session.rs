use rand::{rngs::StdRng, SeedableRng};

use crate::constants::game::{PIPE_SCROLL_SPEED, PIPE_SPAWN_INTERVAL, WORLD_HEIGHT};
use crate::pages::game::{
    bird::Bird,
    pipe::{Pipe, Pipes},
    score::{ScoreBoard, ScoreStore},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    GameOver,
}

/// One game run: the bird, the live pipes, the score board and the tick
/// counter, advanced one fixed step at a time. Everything is owned here and
/// mutated only through `tick`, `activate` and `restart`.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    ticks: u64,
    bird: Bird,
    pipes: Pipes,
    score: ScoreBoard,
    rng: StdRng,
}

impl Session {
    pub fn new(store: ScoreStore) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    pub fn with_rng(store: ScoreStore, rng: StdRng) -> Self {
        Session {
            state: SessionState::Running,
            ticks: 0,
            bird: Bird::new(),
            pipes: Pipes::new(),
            score: ScoreBoard::new(store),
            rng,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> &Pipes {
        &self.pipes
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn best(&self) -> u32 {
        self.score.best()
    }

    /// One simulation step. Does nothing once the run is over; the renderer
    /// keeps drawing the final frame until a restart.
    pub fn tick(&mut self) {
        if self.state != SessionState::Running {
            return;
        }

        self.ticks += 1;
        if self.ticks % PIPE_SPAWN_INTERVAL == 0 {
            self.pipes.push(Pipe::spawn(&mut self.rng));
        }

        self.bird.integrate();
        if self.bird.is_grounded(WORLD_HEIGHT) {
            self.state = SessionState::GameOver;
        }

        self.pipes.advance(PIPE_SCROLL_SPEED);
        if self.pipes.collides(&self.bird) {
            self.state = SessionState::GameOver;
        }

        // Pipes advance and passages are recorded uniformly even on the
        // tick the run ends; the score only moves while running.
        let passages = self.pipes.record_passages(self.bird.x());
        if self.state == SessionState::Running {
            for _ in 0..passages {
                self.score.increment();
            }
        }

        if self.state == SessionState::GameOver {
            log::info!("game over at tick {} with score {}", self.ticks, self.score.score());
        }
    }

    /// Maps the single discrete input: flap while running, restart once
    /// dead.
    pub fn activate(&mut self) {
        match self.state {
            SessionState::Running => self.bird.flap(),
            SessionState::GameOver => self.restart(),
        }
    }

    /// Fresh run, same best score.
    pub fn restart(&mut self) {
        self.score.reset();
        self.pipes.clear();
        self.bird.reset();
        self.ticks = 0;
        self.state = SessionState::Running;
    }

    #[cfg(test)]
    pub(crate) fn bird_mut(&mut self) -> &mut Bird {
        &mut self.bird
    }
}
