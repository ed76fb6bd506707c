pub mod errors;
mod reed_solomon;

pub use reed_solomon::{BlockErasureIndices, ReedSolomon};
