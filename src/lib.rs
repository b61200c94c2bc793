#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Usually, we need to use `crate` in the crate itself and use `simple_hydrator`
// in doc testing and derive expansions. An `extern self` ensures that
// `simple_hydrator` can be used as an alias for `crate` in both positions.
extern crate self as simple_hydrator;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod hydrator;
mod impls;
mod ty;
mod value;

pub mod cast;
pub mod hash;
pub mod info;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use error::HydrateError;
pub use hydrator::Hydrator;
pub use info::Hydrate;
pub use ty::{Param, Type};
pub use value::{CastValue, DataMap, HydrateValue};

pub use simple_hydrator_derive as derive;
