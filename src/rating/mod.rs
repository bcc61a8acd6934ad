//! Bayesian (mean, variance) rating per (memoryId, kernelId) pair, with
//! Thompson-sampling exploration.

pub mod store;

pub use store::{
    initialize_rating, thompson_sample, thompson_to_unit_interval, update_rating,
};
