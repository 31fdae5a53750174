#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use kinalg_lapack as lapack;

#[doc(inline)]
pub use kinalg_linalg as linalg;
