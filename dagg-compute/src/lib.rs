pub mod numeric;
pub mod scalar;

pub use numeric::*;
