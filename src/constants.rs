pub const DEFAULT_ROUNDS: usize = 500;
pub const DEFAULT_SUBSET_SIZE: usize = 8;
pub const DEFAULT_MAX_RETRIES: usize = 10;
pub const DEFAULT_INTERVAL_LOW: f64 = 0.025;
pub const DEFAULT_INTERVAL_HIGH: f64 = 0.975;
pub const MAJORITY: f64 = 0.5;
