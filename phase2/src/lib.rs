//! The circuit specific second phase of a Groth16 setup ceremony.
//!
//! Starting from the output of a powers of tau ceremony and a circuit, the
//! participants take turns multiplying `delta` by a secret factor. Every
//! contribution ships a proof of knowledge so that the whole ceremony can be
//! replayed and checked without learning any factor.

pub mod accumulator;
pub use accumulator::*;

pub mod circuit;
pub use circuit::*;

pub mod environment;
pub use environment::*;

pub mod keypair;
pub use keypair::*;

pub mod lagrange;
pub use lagrange::*;

pub mod linear_combination;
pub use linear_combination::*;

pub mod parameters;
pub use parameters::*;

pub(crate) mod polynomial;

pub mod powersoftau;
pub use powersoftau::*;

pub mod protocol;
pub use protocol::*;

pub mod transcript;
pub use transcript::*;
