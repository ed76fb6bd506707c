//! A facade over rayon.
//!
//! Crates in this workspace iterate through this facade so that the
//! `multithreaded` feature can swap plain iterators for rayon's parallel
//! iterators without touching any call site. Numeric results are identical
//! either way; only the schedule changes.

#[cfg(feature = "multithreaded")]
mod multi_threaded;
#[cfg(not(feature = "multithreaded"))]
mod single_threaded;

#[cfg(feature = "multithreaded")]
pub use multi_threaded::*;
#[cfg(not(feature = "multithreaded"))]
pub use single_threaded::*;

pub mod prelude {
    #[cfg(feature = "multithreaded")]
    pub use rayon::prelude::*;

    pub use crate::{MaybeParallelRefExt, *};
}
