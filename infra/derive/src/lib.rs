#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate in the workspace:
//!
//! * [`rolo_error`] turns an enum into a `thiserror` error with `.context(..)` support.
//! * [`rolo_slice`] turns a struct into an `Arc`-backed feature slice handle.
//! * [`main`] bootstraps a profiled Tokio runtime (re-exported as `rolo_runtime::main`).
//!
//! Examples are `ignore`d here because proc-macro crates cannot use their own output.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the Tokio runtime from an `async fn main`.
///
/// # Arguments
///
/// * `server` - multi-threaded profile tuned for the HTTP server.
/// * `compact` - small footprint profile for command line tools.
/// * no argument - [`RuntimeConfig::default`](../rolo_runtime/struct.RuntimeConfig.html).
///
/// # Examples
///
/// ```rust,ignore
/// #[rolo_runtime::main(server)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Declares a domain error enum.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait with `.context(..)` for `Result<T, ErrorName>` and, for every
///   variant with a `source` field, for `Result<T, SourceError>`.
/// * `From<SourceError>` for variants with a `source` (or `#[source]`/`#[from]`) field.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }` variant
///   exists.
/// * A private `format_context` helper used inside `#[error(..)]` strings.
///
/// # Requirements
///
/// Variants must use named fields. Variants with a source must also carry
/// `context: Option<Cow<'static, str>>`. Only one `#[rolo_error]` enum per module.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[rolo_derive::rolo_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load() -> Result<Vec<u8>, StoreError> {
///     std::fs::read("clients.json").context("Reading client dump")
/// }
/// ```
#[proc_macro_attribute]
pub fn rolo_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Declares a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` wraps it in an `Arc`,
/// dereferences to it and implements `FeatureSlice` so it can be registered in
/// the server state.
///
/// # Example
/// ```rust,ignore
/// #[rolo_derive::rolo_slice]
/// pub struct Clients {
///     pub page_size: usize,
/// }
///
/// let slice = Clients::new(ClientsInner { page_size: 10 });
/// ```
#[proc_macro_attribute]
pub fn rolo_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
