//! Derive macros for `simple_hydrator`.
//!
//! See following macros:
//!
//! - [`Hydrate`]
//! - [`HydrateEnum`]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

// -----------------------------------------------------------------------------
// Modules

mod hydrate;
mod hydrate_enum;

// -----------------------------------------------------------------------------
// Macros

/// # Field-Table Derivation
///
/// `#[derive(Hydrate)]` implements `simple_hydrator::Hydrate` for a
/// struct with named fields, generating one field setter per field. The
/// setters are generated inside the defining module, so field visibility
/// does not restrict what a `Hydrator` can write.
///
/// Every field type must implement `simple_hydrator::HydrateValue`.
///
/// ```rust, ignore
/// #[derive(Hydrate)]
/// struct Person {
///     age: i64,                 // private fields are fine
///     pub name: String,
/// }
/// ```
///
/// Generic structs, tuple structs and unit structs are not supported.
#[proc_macro_derive(Hydrate)]
pub fn derive_hydrate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    hydrate::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// # Hydratable-Enum Derivation
///
/// `#[derive(HydrateEnum)]` implements `simple_hydrator::registry::HydrateEnum`
/// and `simple_hydrator::HydrateValue` for an enum with unit variants.
/// Members are matched by underlying value: integer raw values against
/// the declared discriminants, string raw values against variant names.
///
/// ```rust, ignore
/// #[derive(HydrateEnum)]
/// enum Status {
///     Inactive = 0,
///     Active = 1,
/// }
/// ```
///
/// With the `auto_register` feature (on by default in `simple_hydrator`),
/// the type is also submitted for collection into every registry created
/// through `EnumRegistry::with_registered`.
///
/// Discriminants must be integer literals; data-carrying variants and
/// generic enums are not supported.
#[proc_macro_derive(HydrateEnum)]
pub fn derive_hydrate_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    hydrate_enum::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
