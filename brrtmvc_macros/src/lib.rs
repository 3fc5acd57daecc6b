//! Derive support for `brrtmvc::ioc::Inject`.
//!
//! ```rust,ignore
//! #[derive(Default, Inject)]
//! struct Users {
//!     #[inject]
//!     directory: Option<Arc<dyn UserDirectory>>,
//!     #[inject(name = "app")]
//!     config: Option<Arc<App>>,
//! }
//! ```
//!
//! Every `#[inject]` field must be an `Option<Arc<T>>`. The slot name is the
//! field name unless overridden with `name = "..."`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Type};

fn is_option(ty: &Type) -> bool {
    if let Type::Path(p) = ty {
        if let Some(seg) = p.path.segments.last() {
            return seg.ident == "Option";
        }
    }
    false
}

/// Slot name from `#[inject]` / `#[inject(name = "...")]`, `None` if the field is not marked.
fn slot_name(field: &syn::Field) -> syn::Result<Option<String>> {
    let Some(ident) = &field.ident else {
        return Ok(None);
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("inject") {
            continue;
        }
        let mut name = ident.to_string();
        if !matches!(attr.meta, syn::Meta::Path(_)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    name = lit.value();
                    Ok(())
                } else {
                    Err(meta.error("unsupported inject option, expected `name = \"...\"`"))
                }
            })?;
        }
        return Ok(Some(name));
    }
    Ok(None)
}

#[proc_macro_derive(Inject, attributes(inject))]
pub fn derive_inject(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    match expand(&input) {
        Ok(ts) => ts.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Inject can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Inject can only be derived for structs",
            ))
        }
    };

    let mut assignments = Vec::new();
    for field in fields {
        let Some(slot) = slot_name(field)? else {
            continue;
        };
        if !is_option(&field.ty) {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "#[inject] fields must be of type Option<Arc<T>>",
            ));
        }
        let ident = &field.ident;
        assignments.push(quote! {
            self.#ident = slots.resolve(#slot)?;
        });
    }

    Ok(quote! {
        impl #impl_generics ::brrtmvc::ioc::Inject for #name #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn inject(
                &mut self,
                slots: &::brrtmvc::ioc::Slots<'_>,
            ) -> ::std::result::Result<(), ::brrtmvc::ioc::ContainerError> {
                #(#assignments)*
                ::std::result::Result::Ok(())
            }
        }
    })
}
