#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use manhattan_3d as m3d;

#[doc(inline)]
pub use manhattan_align as align;
