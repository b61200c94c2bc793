use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Expr, ExprLit, ExprUnary, Fields, Ident, Lit, UnOp};

/// Implement `HydrateEnum` and `HydrateValue` for a unit-variant enum.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`#[derive(HydrateEnum)]` only supports enums",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "`#[derive(HydrateEnum)]` does not support generic types",
        ));
    }

    let ident = &input.ident;
    let name = ident.to_string();

    let mut next_discriminant: i64 = 0;
    let mut member_arms = Vec::with_capacity(data.variants.len() * 2);
    let mut value_arms = Vec::with_capacity(data.variants.len() * 2);
    for variant in &data.variants {
        if !matches!(&variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "`#[derive(HydrateEnum)]` only supports unit variants",
            ));
        }
        if let Some((_, expr)) = &variant.discriminant {
            next_discriminant = parse_discriminant(expr)?;
        }

        let discriminant = next_discriminant;
        let variant_ident = &variant.ident;
        let variant_name = variant_ident.to_string();

        // Arms for the registry lookup, boxing the member.
        member_arms.push(MemberArms {
            by_int: quote! {
                #discriminant => ::core::result::Result::Ok(
                    simple_hydrator::CastValue::boxed(#ident::#variant_ident)
                ),
            },
            by_name: quote! {
                #variant_name => ::core::result::Result::Ok(
                    simple_hydrator::CastValue::boxed(#ident::#variant_ident)
                ),
            },
        });
        // Arms for the typed write path, yielding the member itself.
        value_arms.push(MemberArms {
            by_int: quote! {
                #discriminant => ::core::result::Result::Ok(#ident::#variant_ident),
            },
            by_name: quote! {
                #variant_name => ::core::result::Result::Ok(#ident::#variant_ident),
            },
        });

        next_discriminant = discriminant.wrapping_add(1);
    }

    let member_int_arms = member_arms.iter().map(|arms| &arms.by_int);
    let member_name_arms = member_arms.iter().map(|arms| &arms.by_name);
    let value_int_arms = value_arms.iter().map(|arms| &arms.by_int);
    let value_name_arms = value_arms.iter().map(|arms| &arms.by_name);

    let auto_register = auto_register_impl(ident);

    Ok(quote! {
        const _: () = {
            const TYPE_PATH: &str = ::core::concat!(::core::module_path!(), "::", #name);

            impl simple_hydrator::registry::HydrateEnum for #ident {
                fn enum_meta() -> &'static simple_hydrator::registry::EnumMeta {
                    static META: simple_hydrator::registry::EnumMeta =
                        simple_hydrator::registry::EnumMeta::new(TYPE_PATH, #name, |value| {
                            if let ::core::option::Option::Some(raw) = value.as_i64() {
                                return match raw {
                                    #(#member_int_arms)*
                                    _ => ::core::result::Result::Err(
                                        simple_hydrator::HydrateError::UnknownEnumMember {
                                            type_path: TYPE_PATH,
                                            value: value.clone(),
                                        },
                                    ),
                                };
                            }
                            if let ::core::option::Option::Some(raw) = value.as_str() {
                                return match raw {
                                    #(#member_name_arms)*
                                    _ => ::core::result::Result::Err(
                                        simple_hydrator::HydrateError::UnknownEnumMember {
                                            type_path: TYPE_PATH,
                                            value: value.clone(),
                                        },
                                    ),
                                };
                            }
                            ::core::result::Result::Err(
                                simple_hydrator::HydrateError::UnknownEnumMember {
                                    type_path: TYPE_PATH,
                                    value: value.clone(),
                                },
                            )
                        });
                    &META
                }
            }

            impl simple_hydrator::HydrateValue for #ident {
                fn from_cast(
                    value: simple_hydrator::CastValue,
                ) -> ::core::result::Result<Self, simple_hydrator::HydrateError> {
                    let value = match value.take::<Self>() {
                        ::core::result::Result::Ok(value) => {
                            return ::core::result::Result::Ok(value);
                        }
                        ::core::result::Result::Err(value) => value,
                    };
                    match value {
                        simple_hydrator::CastValue::Int(raw) => match raw {
                            #(#value_int_arms)*
                            _ => ::core::result::Result::Err(
                                simple_hydrator::HydrateError::UnknownEnumMember {
                                    type_path: TYPE_PATH,
                                    value: ::core::convert::From::from(raw),
                                },
                            ),
                        },
                        simple_hydrator::CastValue::Str(raw) => match raw.as_str() {
                            #(#value_name_arms)*
                            _ => ::core::result::Result::Err(
                                simple_hydrator::HydrateError::UnknownEnumMember {
                                    type_path: TYPE_PATH,
                                    value: ::core::convert::From::from(raw.clone()),
                                },
                            ),
                        },
                        other => ::core::result::Result::Err(
                            simple_hydrator::HydrateError::MismatchedTypes {
                                expected: TYPE_PATH,
                                found: other.kind(),
                            },
                        ),
                    }
                }
            }
        };

        #auto_register
    })
}

struct MemberArms {
    by_int: TokenStream,
    by_name: TokenStream,
}

fn parse_discriminant(expr: &Expr) -> syn::Result<i64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(lit), ..
        }) => lit.base10_parse::<i64>(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => Ok(-parse_discriminant(expr)?),
        other => Err(syn::Error::new_spanned(
            other,
            "enum discriminants must be integer literals",
        )),
    }
}

/// Generate the `auto_register` submission.
#[cfg(feature = "auto_register")]
fn auto_register_impl(ident: &Ident) -> TokenStream {
    quote! {
        simple_hydrator::__macro_exports::inventory::submit! {
            simple_hydrator::__macro_exports::EnumRegistration(
                <#ident as simple_hydrator::registry::HydrateEnum>::enum_meta
            )
        }
    }
}

/// Generate the `auto_register` submission.
#[cfg(not(feature = "auto_register"))]
fn auto_register_impl(_: &Ident) -> TokenStream {
    TokenStream::new()
}
