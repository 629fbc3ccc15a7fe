//! Configuration and system parameters for MCGS

/// Selects how the backward sweep is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Sweep every block backward, matching the textbook symmetric sweep.
    Reference,
    /// Skip the terminal block in the backward sweep when setup has
    /// verified that revisiting it would be a no-op.
    Optimized,
}

/// System parameters for performance tuning
#[derive(Debug, Clone)]
pub struct SystemParameters {
    /// Number of worker threads the parallel kernels may use
    pub n_threads: usize,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            n_threads: num_cpus::get(), // Use all available cores
        }
    }
}

/// Seed used when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 123456789;

/// Number of coloring rounds that draw their candidate colors randomly.
pub const RANDOMIZED_ROUNDS: usize = 8;

/// Size of the color range the randomized rounds draw from.
pub const RANDOMIZED_COLORS: usize = 8;

/// Configuration for coloring setup and the sweep kernels
#[derive(Debug, Clone)]
pub struct McgsConfig {
    /// System parameters for performance tuning
    pub system_params: SystemParameters,

    /// Seed for candidate color draws; row hash keys are seeded at matrix
    /// construction
    pub seed: u64,

    /// Backward sweep bound selection
    pub sweep_mode: SweepMode,

    /// Rounds that draw candidate colors from the randomized range
    pub randomized_rounds: usize,

    /// Size of the randomized color range; sequential candidates start
    /// here once randomness stops helping
    pub randomized_colors: usize,
}

impl Default for McgsConfig {
    fn default() -> Self {
        Self {
            system_params: SystemParameters::default(),
            seed: DEFAULT_SEED,
            sweep_mode: SweepMode::Optimized,
            randomized_rounds: RANDOMIZED_ROUNDS,
            randomized_colors: RANDOMIZED_COLORS,
        }
    }
}

impl McgsConfig {
    /// Create a config with a specific seed, keeping the other defaults
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Create a config running the textbook backward sweep
    pub fn reference() -> Self {
        Self {
            sweep_mode: SweepMode::Reference,
            ..Self::default()
        }
    }
}
