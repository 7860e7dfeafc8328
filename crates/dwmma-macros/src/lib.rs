//! Derive macros for the dwmma workspace.
//!
//! Provides `#[derive(Choice)]`, which implements `dwmma_core::ChoiceValue`
//! for unit-only enums so they can back a `ChoiceParameter`.
//!
//! ```ignore
//! use dwmma_macros::Choice;
//!
//! #[derive(Copy, Clone, PartialEq, Choice)]
//! pub enum Layout {
//!     #[name = "6 Points, 1 junction distance"]
//!     SixNear,
//!     #[default]
//!     #[name = "30 Points, 3 junctions distance"]
//!     ThirtyFar,
//! }
//! ```
//!
//! # Attributes
//!
//! - `#[name = "..."]` - display label; defaults to the variant identifier.
//! - `#[default]` - default variant; defaults to the first variant.

use proc_macro::TokenStream;

mod choice;

/// Derive `ChoiceValue` for a unit-only enum.
#[proc_macro_derive(Choice, attributes(name, default))]
pub fn derive_choice(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    match choice::derive_choice_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
