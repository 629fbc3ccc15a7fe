// Matrix data structures and operations

pub mod config;
pub mod ell;
pub mod permute;
pub mod reference;

pub use config::{McgsConfig, SweepMode, SystemParameters};
pub use ell::{Coloring, EllMatrix, HaloPart, INVALID_INDEX};
pub use permute::{apply_permutation, permute_vector, unpermute_vector};
pub use reference::reference_symgs;
