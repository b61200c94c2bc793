use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

/// Implement `Hydrate` for a named-field struct.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`#[derive(Hydrate)]` only supports structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`#[derive(Hydrate)]` requires named fields",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "`#[derive(Hydrate)]` does not support generic types",
        ));
    }

    let ident = &input.ident;
    let name = ident.to_string();

    let mut field_infos = Vec::with_capacity(fields.named.len());
    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let field_name = field_ident.to_string();
        field_infos.push(quote! {
            simple_hydrator::info::FieldInfo::new(#field_name, |target, value| {
                let target =
                    simple_hydrator::__macro_exports::downcast_target::<#ident>(target)?;
                target.#field_ident = simple_hydrator::HydrateValue::from_cast(value)?;
                ::core::result::Result::Ok(())
            })
        });
    }

    Ok(quote! {
        const _: () = {
            impl simple_hydrator::Hydrate for #ident {
                fn struct_info() -> &'static simple_hydrator::info::StructInfo {
                    static FIELDS: &[simple_hydrator::info::FieldInfo] = &[
                        #(#field_infos),*
                    ];
                    static INFO: simple_hydrator::info::StructInfo =
                        simple_hydrator::info::StructInfo::new(
                            ::core::concat!(::core::module_path!(), "::", #name),
                            #name,
                            FIELDS,
                        );
                    &INFO
                }
            }
        };
    })
}
