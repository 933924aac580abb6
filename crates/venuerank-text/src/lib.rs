//! Venue title normalization and match tracing primitives.
//!
//! Everything here is pure, synchronous, and total over arbitrary string
//! input: malformed titles normalize to empty or sparse strings rather than
//! erroring. The canonical form produced by [`normalize`] is the comparison
//! key used by every matching strategy downstream.

mod normalize;
mod trace;

pub use normalize::{clean_title, extract_acronym, normalize, significant_tokens};
pub use trace::MatchTrace;
