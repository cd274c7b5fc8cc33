//! Mathematical constants and crate-wide defaults

/// 0.5 ln(2π)
pub const HALF_LN_2PI: f64 = 0.918_938_533_204_672_7;

/// Seed of the random source a regressor creates when none is supplied
pub const DEFAULT_SEED: u64 = 0;

/// Amplitude of the diagonal jitter added to the posterior covariance before
/// sampling
pub const DEFAULT_REG: f64 = 1E-12;

/// Tolerance used when checking that a covariance matrix is symmetric and
/// positive semi-definite
pub const PSD_TOL: f64 = 1E-8;
