//! Inference over a trained pipeline
//!
//! [`Observation`] is the single-reading input, [`LocationInput`] models a
//! location picked from the vocabulary or typed freely, and [`Predictor`]
//! owns the loaded artifacts and answers prediction calls.

mod observation;
mod predictor;

pub use observation::{LocationInput, Observation};
pub use predictor::Predictor;
