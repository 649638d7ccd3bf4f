#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the EcoPoint workspace.
//!
//! * [`eco_error`] turns a plain enum into a context-aware error type.
//! * [`main`] bootstraps `async fn main` on a profiled Tokio runtime
//!   (re-exported as `eco_runtime::main`).

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, parse_macro_input};

/// Attribute macro to bootstrap a profiled Tokio runtime.
///
/// Turns an `async fn main` returning a `Result` into a plain `fn main` that
/// builds the runtime from an `eco_runtime::RuntimeConfig` preset and blocks on
/// the body.
///
/// # Arguments
///
/// * `interactive` - Few workers, small stacks; tuned for CLI and UI hosts.
/// * `default` - Worker count detected from available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[eco_runtime::main(interactive)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro for domain error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * A `<Name>Ext` trait with `.context(...)` for `Result<T, Name>` and for
///   `Result<T, Source>` of every variant that wraps a `source`.
/// * `From<Source>` for every variant with a `source` field.
/// * `From<&'static str>` / `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper for the `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields. A variant with a `source` (or a field
/// marked `#[source]`/`#[from]`) must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[eco_derive::eco_error]
/// pub enum FetchError {
///     #[error("Transport failure{}: {source}", format_context(.context))]
///     Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// async fn regions(client: &reqwest::Client) -> Result<String, FetchError> {
///     client.get("https://example.org").send().await.context("GET regions")?;
///     Err("unreachable branch".into())
/// }
/// ```
#[proc_macro_attribute]
pub fn eco_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
