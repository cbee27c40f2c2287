/// The simulation runs in a fixed 480x640 world, y growing downward.
/// Rendering scales world units to terminal cells; the simulation itself
/// never sees cells.
pub const WORLD_WIDTH: f32 = 480.0;
pub const WORLD_HEIGHT: f32 = 640.0;

pub const GRAVITY: f32 = 0.25;
pub const FLAP_VELOCITY: f32 = -4.6;

pub const BIRD_X: f32 = 50.0;
pub const BIRD_SIZE: f32 = 30.0;
pub const BIRD_INITIAL_Y: f32 = 150.0;

pub const PIPE_WIDTH: f32 = 60.0;
pub const PIPE_GAP: f32 = 140.0;
/// Gap position is sampled as an integer in [PIPE_TOP_MIN, PIPE_TOP_MAX).
pub const PIPE_TOP_MIN: u32 = 50;
pub const PIPE_TOP_MAX: u32 = 300;
pub const PIPE_SCROLL_SPEED: f32 = 2.0;
pub const PIPE_SPAWN_INTERVAL: u64 = 90;

// Wing down while falling, wing up while rising. The face layer is drawn
// on top with transparent whitespace.
pub const BIRD_BODY_FALLING: &str = "(  )>\n ~~";
pub const BIRD_BODY_RISING: &str = "(  )>\n ^^";
pub const BIRD_FACE: &str = "  o";

/// Decorative clouds, fixed world positions.
pub const CLOUDS: [(f32, f32); 2] = [(80.0, 80.0), (250.0, 100.0)];
pub const CLOUD_TEXT: &str = r#"
  .--.
 (    ).
(___(__)
"#;
