use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, Ident, ItemFn, ReturnType, Type};

const PROFILES: &str = "interactive, default";

/// Expands `#[eco_runtime::main(<profile>)]`.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    if input.sig.asyncness.is_none() {
        return Error::new_spanned(
            input.sig.fn_token,
            "#[eco_runtime::main] expects an `async fn`",
        )
        .to_compile_error();
    }

    if !returns_result(&input.sig.output) {
        return Error::new_spanned(
            &input.sig.output,
            "#[eco_runtime::main] expects the function to return a `Result`",
        )
        .to_compile_error();
    }

    let preset = match profile_preset(args) {
        Ok(preset) => preset,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn { attrs, vis, sig, block } = input;
    let name = &sig.ident;
    let output = &sig.output;

    quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let runtime = ::eco_runtime::build_runtime(&#preset)?;
            runtime.block_on(async move #block)
        }
    }
}

fn profile_preset(args: TokenStream) -> syn::Result<TokenStream> {
    if args.is_empty() {
        return Ok(quote! { ::eco_runtime::RuntimeConfig::default() });
    }

    let profile: Ident = syn::parse2(args)?;
    match profile.to_string().as_str() {
        "interactive" => Ok(quote! { ::eco_runtime::RuntimeConfig::interactive() }),
        "default" => Ok(quote! { ::eco_runtime::RuntimeConfig::default() }),
        other => Err(Error::new_spanned(
            &profile,
            format!("unknown runtime profile `{other}`; expected one of: {PROFILES}"),
        )),
    }
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = ty.as_ref() else {
        return false;
    };
    path.path.segments.last().is_some_and(|segment| segment.ident == "Result")
}
