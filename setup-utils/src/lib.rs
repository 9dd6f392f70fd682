//! Shared building blocks for the phase 2 ceremony: errors, point and field
//! encodings, the transcript hash, the deterministic stream cipher RNG and the
//! pairing based ratio checks.

pub mod codec;
pub use codec::*;

pub mod elements;
pub use elements::*;

pub mod errors;
pub use errors::*;

pub mod hash;
pub use hash::*;

pub mod helpers;
pub use helpers::*;

mod progress;
pub use progress::*;

pub mod rng;
pub use rng::ChaChaRng;
