pub mod claims;
pub mod signer;

pub use claims::AssertionClaims;
pub use signer::{Rs256Signer, SignAssertion};
