use std::collections::VecDeque;

use rand::Rng;

use crate::constants::game::{PIPE_GAP, PIPE_TOP_MAX, PIPE_TOP_MIN, PIPE_WIDTH, WORLD_HEIGHT, WORLD_WIDTH};
use crate::pages::game::bird::Bird;

/// A top/bottom pipe pair with a fixed-height gap between them. The gap
/// position is the only randomized quantity in the game.
#[derive(Debug, Clone)]
pub struct Pipe {
    x: f32,
    top_h: f32,
    bottom_y: f32,
    bottom_h: f32,
    passed: bool,
}

impl Pipe {
    /// Spawns a pipe pair at the right edge of the world.
    pub fn spawn(rng: &mut impl Rng) -> Self {
        let top_h = rng.gen_range(PIPE_TOP_MIN..PIPE_TOP_MAX) as f32;
        Pipe::at(WORLD_WIDTH, top_h)
    }

    fn at(x: f32, top_h: f32) -> Self {
        Pipe {
            x,
            top_h,
            bottom_y: top_h + PIPE_GAP,
            bottom_h: WORLD_HEIGHT - top_h - PIPE_GAP,
            passed: false,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn top_h(&self) -> f32 {
        self.top_h
    }

    pub fn bottom_y(&self) -> f32 {
        self.bottom_y
    }

    pub fn bottom_h(&self) -> f32 {
        self.bottom_h
    }

    fn trailing_edge(&self) -> f32 {
        self.x + PIPE_WIDTH
    }

    /// Both solid segments span the pipe's full horizontal extent, so one
    /// interval test plus the gap test is the complete overlap check.
    pub fn hits(&self, bird: &Bird) -> bool {
        let overlap_x = bird.x() < self.x + PIPE_WIDTH && bird.x() + bird.size() > self.x;
        overlap_x && (bird.y() < self.top_h || bird.y() + bird.size() > self.bottom_y)
    }

    /// True the first time the trailing edge reaches the bird's leading
    /// edge. x only ever decreases, so a once-flag over `<=` is a crossing
    /// test that cannot miss a tick or fire twice, whatever the scroll
    /// speed.
    fn record_passage(&mut self, bird_x: f32) -> bool {
        if !self.passed && self.trailing_edge() <= bird_x {
            self.passed = true;
            return true;
        }
        false
    }
}

/// The live pipes, oldest first.
#[derive(Debug, Default)]
pub struct Pipes {
    pipes: VecDeque<Pipe>,
}

impl Pipes {
    pub fn new() -> Self {
        Pipes { pipes: VecDeque::new() }
    }

    pub fn push(&mut self, pipe: Pipe) {
        self.pipes.push_back(pipe);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    pub fn clear(&mut self) {
        self.pipes.clear();
    }

    /// Moves every pipe left, then drops the ones fully off screen, in one
    /// pass in insertion order.
    pub fn advance(&mut self, scroll_speed: f32) {
        for pipe in self.pipes.iter_mut() {
            pipe.x -= scroll_speed;
        }
        self.pipes.retain(|pipe| pipe.trailing_edge() > 0.0);
    }

    pub fn collides(&self, bird: &Bird) -> bool {
        self.pipes.iter().any(|pipe| pipe.hits(bird))
    }

    /// Number of pipes whose trailing edge crossed the bird this tick.
    pub fn record_passages(&mut self, bird_x: f32) -> usize {
        self.pipes.iter_mut().map(|pipe| pipe.record_passage(bird_x)).filter(|passed| *passed).count()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::constants::game::{BIRD_SIZE, BIRD_X};

    #[test]
    fn test_spawn_geometry() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let pipe = Pipe::spawn(&mut rng);
            assert_eq!(pipe.x(), WORLD_WIDTH);
            assert!(pipe.top_h() >= PIPE_TOP_MIN as f32);
            assert!(pipe.top_h() < PIPE_TOP_MAX as f32);
            assert_eq!(pipe.bottom_y(), pipe.top_h() + PIPE_GAP);
            assert_eq!(pipe.bottom_h(), WORLD_HEIGHT - pipe.top_h() - PIPE_GAP);
            assert!(pipe.bottom_h() > 0.0);
        }
    }

    #[test]
    fn test_advance_moves_and_prunes() {
        let mut pipes = Pipes::new();
        pipes.push(Pipe::at(10.0, 100.0));
        pipes.push(Pipe::at(300.0, 100.0));

        pipes.advance(2.0);
        assert_eq!(pipes.len(), 2);
        let positions: Vec<f32> = pipes.iter().map(Pipe::x).collect();
        assert_eq!(positions, vec![8.0, 298.0]);

        // The first pipe leaves the world once its trailing edge hits zero.
        for _ in 0..34 {
            pipes.advance(2.0);
        }
        assert_eq!(pipes.len(), 1);
        assert_eq!(pipes.iter().next().map(Pipe::x), Some(230.0));
    }

    #[test]
    fn test_passage_recorded_exactly_once() {
        let mut pipes = Pipes::new();
        pipes.push(Pipe::at(BIRD_X - PIPE_WIDTH + 3.0, 100.0));

        assert_eq!(pipes.record_passages(BIRD_X), 0);
        pipes.advance(2.0);
        // Trailing edge now at BIRD_X + 1, still ahead of the bird.
        assert_eq!(pipes.record_passages(BIRD_X), 0);
        pipes.advance(2.0);
        // Crossed between ticks without ever being exactly equal.
        assert_eq!(pipes.record_passages(BIRD_X), 1);
        pipes.advance(2.0);
        assert_eq!(pipes.record_passages(BIRD_X), 0);
    }

    #[test]
    fn test_hits_top_segment() {
        // Bird hugging the ceiling, pipe overlapping its x-span.
        let pipe = Pipe::at(BIRD_X, 100.0);
        let mut bird = Bird::new();
        bird.place_at(0.0, 0.0);
        assert!(pipe.hits(&bird));
    }

    #[test]
    fn test_no_hit_inside_gap() {
        let pipe = Pipe::at(BIRD_X, 100.0);
        let mut bird = Bird::new();
        // Bottom edge flush against the lower segment still counts as clear.
        bird.place_at(pipe.bottom_y() - BIRD_SIZE, 0.0);
        assert!(!pipe.hits(&bird));

        // One unit lower pokes into the solid segment.
        bird.place_at(pipe.bottom_y() - BIRD_SIZE + 1.0, 0.0);
        assert!(pipe.hits(&bird));
    }

    #[test]
    fn test_no_hit_outside_horizontal_span() {
        let pipe = Pipe::at(BIRD_X + BIRD_SIZE, 100.0);
        let mut bird = Bird::new();
        bird.place_at(0.0, 0.0);
        // Leading edge exactly on the pipe's left edge is not yet overlap.
        assert!(!pipe.hits(&bird));
    }
}
