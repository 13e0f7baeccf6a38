extern crate proc_macro;
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DataEnum, DeriveInput, Fields, Path, parse_macro_input};

/// Derives `into_trait_object` and `as_trait_object` for an enum whose
/// variants each wrap a single type implementing the trait named by
/// `#[trait_name(TraitName)]`.
#[proc_macro_derive(IntoTraitObject, attributes(trait_name))]
pub fn derive_into_trait_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let enum_name = &input.ident;
    let trait_name = find_trait_name(input)?;

    let Data::Enum(DataEnum { variants, .. }) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "IntoTraitObject can only be derived for enums",
        ));
    };

    for variant in variants {
        match &variant.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {}
            _ => {
                return Err(syn::Error::new(
                    variant.span(),
                    "IntoTraitObject variants must wrap exactly one value",
                ));
            }
        }
    }

    let owned_arms = variants.iter().map(|v| {
        let vname = &v.ident;
        quote! {
            #enum_name::#vname(inner) => Box::new(inner) as Box<dyn #trait_name>
        }
    });
    let borrowed_arms = variants.iter().map(|v| {
        let vname = &v.ident;
        quote! {
            #enum_name::#vname(inner) => inner as &dyn #trait_name
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #enum_name #ty_generics #where_clause {
            pub fn into_trait_object(self) -> Box<dyn #trait_name> {
                match self {
                    #(#owned_arms),*
                }
            }

            pub fn as_trait_object(&self) -> &dyn #trait_name {
                match self {
                    #(#borrowed_arms),*
                }
            }
        }
    })
}

fn find_trait_name(input: &DeriveInput) -> syn::Result<Path> {
    let mut trait_name: Option<Path> = None;
    for attr in &input.attrs {
        if attr.path().is_ident("trait_name") {
            attr.parse_nested_meta(|meta| {
                trait_name = Some(meta.path.clone());
                Ok(())
            })?;
        }
    }
    trait_name.ok_or_else(|| {
        syn::Error::new(
            input.span(),
            "You must specify #[trait_name(TraitName)] on the enum when using #[derive(IntoTraitObject)]",
        )
    })
}
