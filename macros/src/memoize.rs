use syn::parse::{Parse, ParseStream};
use syn::visit::{self, Visit};

use super::*;

mod kw {
    syn::custom_keyword!(enabled);
    syn::custom_keyword!(fallible);
}

/// The arguments to `#[memoize]`.
pub struct Meta {
    enabled: Option<syn::Expr>,
    fallible: bool,
}

impl Parse for Meta {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut meta = Meta { enabled: None, fallible: false };
        while !input.is_empty() {
            if let Some(expr) = utils::parse_key_value::<kw::enabled, syn::Expr>(input)? {
                meta.enabled = Some(expr);
            } else if utils::parse_flag::<kw::fallible>(input)? {
                meta.fallible = true;
            } else {
                return Err(input.error("memofn: expected `enabled = ..` or `fallible`"));
            }
        }
        Ok(meta)
    }
}

/// Memoize a function.
pub fn expand(meta: Meta, mut func: syn::ItemFn) -> Result<proc_macro2::TokenStream> {
    if !func.sig.generics.params.is_empty() {
        bail!(func.sig.generics, "generic functions are not supported");
    }

    if let Some(asyncness) = &func.sig.asyncness {
        bail!(asyncness, "async functions are not supported");
    }

    let mut args = vec![];
    let mut types = vec![];
    for input in &func.sig.inputs {
        let typed = match input {
            syn::FnArg::Typed(typed) => typed,
            syn::FnArg::Receiver(_) => {
                bail!(input, "methods are not supported")
            }
        };

        let name = match typed.pat.as_ref() {
            syn::Pat::Ident(syn::PatIdent {
                by_ref: None,
                mutability: None,
                ident,
                subpat: None,
                ..
            }) => ident,
            pat => bail!(pat, "only simple identifiers are supported"),
        };

        let ty = typed.ty.as_ref();
        check_type(ty)?;
        args.push(name);
        types.push(ty);
    }

    let output: syn::Type = match &func.sig.output {
        syn::ReturnType::Default => parse_quote! { () },
        syn::ReturnType::Type(_, ty) => ty.as_ref().clone(),
    };
    if let syn::Type::ImplTrait(_) = output {
        bail!(output, "`impl Trait` return types are not supported");
    }

    // The cache is keyed by a tuple of all arguments.
    let arg_tuple = quote! { (#(#args,)*) };
    let key = quote! { (#(#types,)*) };

    // Only the `Ok` part of a fallible function is stored.
    let (value, entry) = if meta.fallible {
        (
            quote! { <#output as ::memofn::internal::Fallible>::Value },
            quote! { ::memofn::internal::try_memoized },
        )
    } else {
        (quote! { #output }, quote! { ::memofn::internal::memoized })
    };

    // Construct assertions that the arguments fulfill the necessary bounds.
    let bounds = types.iter().map(|ty| {
        quote! {
            ::memofn::internal::assert_key::<#ty>();
        }
    });

    let enabled = meta.enabled.unwrap_or_else(|| parse_quote! { true });

    // Construct the inner closure.
    let body = &func.block;
    let closure = quote! { |#arg_tuple: #key| -> #output #body };

    // Adjust the function's body.
    func.block = parse_quote! { {
        static __CACHE: ::memofn::internal::StaticCache<#key, #value> =
            ::memofn::internal::Lazy::new(::std::default::Default::default);

        #(#bounds)*
        ::memofn::internal::assert_value::<#value>();

        #entry(&*__CACHE, #arg_tuple, #enabled, #closure)
    } };

    Ok(quote! { #func })
}

/// Reject argument types that cannot live in a static cache.
fn check_type(ty: &syn::Type) -> Result<()> {
    let mut checker = TypeChecker { error: None };
    checker.visit_type(ty);
    match checker.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Finds the first part of a type that borrows non-statically or is opaque.
struct TypeChecker {
    error: Option<Error>,
}

impl TypeChecker {
    fn reject<T: quote::ToTokens>(&mut self, item: &T, message: &str) {
        if self.error.is_none() {
            self.error = Some(Error::new_spanned(item, format!("memofn: {message}")));
        }
    }
}

impl<'ast> Visit<'ast> for TypeChecker {
    fn visit_type_reference(&mut self, reference: &'ast syn::TypeReference) {
        if reference.lifetime.is_none() {
            self.reject(reference, "only `'static` references are supported");
        }
        visit::visit_type_reference(self, reference);
    }

    fn visit_lifetime(&mut self, lifetime: &'ast syn::Lifetime) {
        if lifetime.ident != "static" {
            self.reject(lifetime, "only `'static` references are supported");
        }
    }

    fn visit_type_impl_trait(&mut self, ty: &'ast syn::TypeImplTrait) {
        self.reject(ty, "`impl Trait` arguments are not supported");
    }

    // Function pointers and `Fn(..)` bounds may borrow in their signature
    // and still be `'static` themselves.
    fn visit_type_bare_fn(&mut self, _: &'ast syn::TypeBareFn) {}

    fn visit_parenthesized_generic_arguments(
        &mut self,
        _: &'ast syn::ParenthesizedGenericArguments,
    ) {
    }
}
