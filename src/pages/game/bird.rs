use crate::constants::game::{BIRD_INITIAL_Y, BIRD_SIZE, BIRD_X, FLAP_VELOCITY, GRAVITY};

/// The player-controlled falling body. Horizontal position is fixed for the
/// whole session; only the height and the vertical velocity ever change.
#[derive(Debug)]
pub struct Bird {
    y: f32,
    velocity: f32,
}

impl Bird {
    pub fn new() -> Self {
        Bird { y: BIRD_INITIAL_Y, velocity: 0.0 }
    }

    pub fn x(&self) -> f32 {
        BIRD_X
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn size(&self) -> f32 {
        BIRD_SIZE
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// One gravity step: velocity first, then position.
    pub fn integrate(&mut self) {
        self.velocity += GRAVITY;
        self.y += self.velocity;
    }

    /// Replaces the current velocity, it does not accumulate.
    pub fn flap(&mut self) {
        self.velocity = FLAP_VELOCITY;
    }

    pub fn is_grounded(&self, floor_y: f32) -> bool {
        self.y + BIRD_SIZE >= floor_y
    }

    pub fn reset(&mut self) {
        self.y = BIRD_INITIAL_Y;
        self.velocity = 0.0;
    }

    #[cfg(test)]
    pub(crate) fn place_at(&mut self, y: f32, velocity: f32) {
        self.y = y;
        self.velocity = velocity;
    }
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::constants::game::WORLD_HEIGHT;

    #[test]
    fn test_gravity_accumulates_each_step() {
        let mut bird = Bird::new();
        let mut previous = bird.velocity();
        for _ in 0..10 {
            bird.integrate();
            assert_eq!(bird.velocity(), previous + GRAVITY);
            previous = bird.velocity();
        }
    }

    #[test]
    fn test_position_follows_velocity() {
        let mut bird = Bird::new();
        bird.integrate();
        assert_eq!(bird.velocity(), GRAVITY);
        assert_eq!(bird.y(), BIRD_INITIAL_Y + GRAVITY);
    }

    #[test]
    fn test_flap_overrides_velocity() {
        let mut bird = Bird::new();
        for _ in 0..30 {
            bird.integrate();
        }
        assert!(bird.velocity() > 0.0);
        bird.flap();
        assert_eq!(bird.velocity(), FLAP_VELOCITY);

        // A second flap while already rising still pins the velocity.
        bird.flap();
        assert_eq!(bird.velocity(), FLAP_VELOCITY);
    }

    #[test]
    fn test_grounded_at_floor_contact() {
        let mut bird = Bird::new();
        assert!(!bird.is_grounded(WORLD_HEIGHT));

        bird.place_at(WORLD_HEIGHT - BIRD_SIZE - 0.5, 0.0);
        assert!(!bird.is_grounded(WORLD_HEIGHT));

        bird.place_at(WORLD_HEIGHT - BIRD_SIZE, 0.0);
        assert!(bird.is_grounded(WORLD_HEIGHT));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut bird = Bird::new();
        bird.flap();
        for _ in 0..5 {
            bird.integrate();
        }
        bird.reset();
        assert_eq!(bird.y(), BIRD_INITIAL_Y);
        assert_eq!(bird.velocity(), 0.0);
    }
}
