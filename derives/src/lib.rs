//! Derive macros for iregistry
//!
//! This crate provides procedural macros for the iregistry container.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, GenericParam, LitStr, Meta, TypeParam};

/// Generates an `Injectable` implementation that fills each field from a
/// named container entry.
///
/// - `#[inject(name = "key")]` resolves the field from `key`.
/// - `#[inject]` resolves the field from its own name.
/// - fields without the attribute are set to `Default::default()`.
///
/// Injected fields must implement `iregistry::Resolvable`, i.e. be `Arc<T>`
/// or `Option<Arc<T>>`.
#[proc_macro_derive(Injectable, attributes(inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = input.ident;

    let fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(named) => named.named,
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "Injectable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "Injectable can only be derived for structs",
            ))
        }
    };

    let generics = input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut where_predicates: Vec<syn::WherePredicate> = where_clause
        .map(|w| w.predicates.iter().cloned().collect())
        .unwrap_or_else(Vec::new);

    for param in generics.params.iter() {
        if let GenericParam::Type(TypeParam { ident, .. }) = param {
            where_predicates.push(syn::parse_quote!(#ident: Send + Sync + 'static));
        }
    }

    let mut field_inits = Vec::new();
    for field in fields.iter() {
        field_inits.push(field_init(field)?);
    }

    let where_clause = if !where_predicates.is_empty() {
        quote! { where #(#where_predicates),* }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl #impl_generics ::iregistry::Injectable for #name #ty_generics #where_clause {
            fn inject<C: ::iregistry::Container + ?Sized>(
                container: &C,
            ) -> ::iregistry::RegistryResult<Self> {
                ::core::result::Result::Ok(Self {
                    #(#field_inits,)*
                })
            }
        }
    })
}

fn field_init(field: &Field) -> syn::Result<TokenStream2> {
    // Named fields always carry an ident.
    let Some(field_name) = field.ident.as_ref() else {
        return Err(syn::Error::new(field.span(), "expected a named field"));
    };
    let field_ty = &field.ty;

    let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("inject")) else {
        return Ok(quote! {
            #field_name: ::core::default::Default::default()
        });
    };

    let default_key = LitStr::new(&field_name.unraw().to_string(), field_name.span());
    let key = match &attr.meta {
        Meta::Path(_) => default_key,
        Meta::List(_) => {
            let mut key = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    key = Some(meta.value()?.parse::<LitStr>()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported inject option, expected `name = \"...\"`"))
                }
            })?;
            key.unwrap_or(default_key)
        }
        Meta::NameValue(nv) => {
            return Err(syn::Error::new(
                nv.span(),
                "use #[inject(name = \"...\")] or a bare #[inject]",
            ))
        }
    };

    Ok(quote! {
        #field_name: <#field_ty as ::iregistry::Resolvable>::resolve_from(container, #key)?
    })
}
