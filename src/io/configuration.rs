//! Search constants and runtime configuration defaults

// Per-round search behaviour
/// Number of random trials rendered and scored in every round
pub const TRIALS_PER_ROUND: usize = 100;
/// Smallest scale factor drawn for a trial (inclusive)
pub const MIN_TRIAL_SCALE: f64 = 0.5;
/// Largest scale factor drawn for a trial (inclusive)
pub const MAX_TRIAL_SCALE: f64 = 1.5;
/// Upper bound of the rotation drawn for a trial, in degrees (exclusive)
pub const FULL_TURN_DEGREES: f64 = 360.0;
/// Percentile of the darkening deficit a pixel must exceed to become a stamp center
pub const CANDIDATE_PERCENTILE: f64 = 95.0;

// Canvas and stencil
/// Brightness of an untouched canvas pixel
pub const BLANK_BRIGHTNESS: u8 = u8::MAX;
/// Brightness written under a stamped stencil
pub const INK_BRIGHTNESS: u8 = 0;
/// Value of foreground pixels in a generated stencil
pub const STENCIL_FOREGROUND: u8 = u8::MAX;

// Structural similarity parameters
/// Side length of the square SSIM window
pub const SSIM_WINDOW: usize = 7;
/// SSIM luminance stabilizer coefficient
pub const SSIM_K1: f64 = 0.01;
/// SSIM contrast stabilizer coefficient
pub const SSIM_K2: f64 = 0.03;
/// Dynamic range of 8-bit rasters
pub const DATA_RANGE: f64 = 255.0;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Default values for configurable parameters
/// Fixed seed for reproducible searches
pub const DEFAULT_SEED: u64 = 42;
/// Default maximum number of committed stamps
pub const DEFAULT_MAX_SHAPES: usize = 100;
/// Default side length of the generated star stencil
pub const DEFAULT_TEMPLATE_SIZE: usize = 50;

// Output settings
/// Suffix added to rendered canvas filenames
pub const OUTPUT_SUFFIX: &str = "_stencil";
/// Suffix added to placement history filenames
pub const HISTORY_SUFFIX: &str = "_placements";
/// Suffix added to replay animation filenames
pub const REPLAY_SUFFIX: &str = "_replay";
/// Image extensions picked up when the target is a directory
pub const INPUT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 200;
/// How many frame delays the last replay frame is held for
pub const FINAL_FRAME_HOLD: u32 = 10;
