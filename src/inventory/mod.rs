//! Inventory query pipeline.
//!
//! Raw parameters flow through [`filter`] (normalization), [`predicate`]
//! (condition and ordering) and, once the store has answered, [`shape`]
//! (wire representation).

pub mod filter;
pub mod predicate;
pub mod shape;

pub use filter::{Bounds, CarFilter, RawCarFilter, RawSimilarQuery, SimilarLimits, SimilarQuery};
pub use shape::CarDto;
