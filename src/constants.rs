// --- Global Simulation Constants ---
pub const BACKGROUND_COLOR: wgpu::Color = wgpu::Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 800;

// Logical board dimensions. The strip view looks best at a 5:1 aspect so the
// texture is not stretched along the ring.
pub const BOARD_HEIGHT: usize = 10;
pub const BOARD_WIDTH: usize = BOARD_HEIGHT * 5;

// Samples per cell edge in the display field.
pub const TEX_SCALE: usize = 32;

// Decay factor applied to losing cells under the fade rule.
pub const FADE_CONST: f32 = 0.5;

// Seconds per generation.
pub const PERIOD: f64 = 1.0 / 30.0;

// Probability that a seeded interior cell starts alive.
pub const INITIAL_DENSITY: f64 = 0.5;

// --- Strip geometry (display mesh) ---
// Segment count around the ring; higher = smoother twist.
pub const STRIP_STEPS: usize = 300;
pub const STRIP_RADIUS: f32 = 0.6;
pub const STRIP_THICKNESS: f32 = 0.8;

pub const FPS_UPDATE_INTERVAL_SECS: f64 = 2.0;

// Every step is logged at debug level; info milestones come every N
// generations so default logging stays quiet.
pub const GENERATION_LOG_INTERVAL: u64 = 300;
