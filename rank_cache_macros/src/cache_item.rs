use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident};

/// Field roles a `#[cache(...)]` attribute can assign.
const ROLES: &[&str] = &["id", "owner", "created_at", "updated_at", "rank"];

pub fn derive_cache_item(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match resolve_fields(&input, &["id", "owner", "created_at", "updated_at"]) {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };
    let id = &fields[0];
    let owner = &fields[1];
    let created_at = &fields[2];
    let updated_at = &fields[3];

    let expanded = quote! {
        impl #impl_generics rank_cache::CacheItem for #name #ty_generics #where_clause {
            fn id(&self) -> rank_cache::ItemId {
                self.#id
            }

            fn owner_id(&self) -> &str {
                &self.#owner
            }

            fn created_at(&self) -> ::std::option::Option<::std::time::SystemTime> {
                self.#created_at
            }

            fn updated_at(&self) -> ::std::option::Option<::std::time::SystemTime> {
                self.#updated_at
            }
        }
    };

    TokenStream::from(expanded)
}

pub fn derive_rankable(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let rank = match resolve_fields(&input, &["rank"]) {
        Ok(mut fields) => fields.remove(0),
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl #impl_generics rank_cache::RankableItem for #name #ty_generics #where_clause {
            fn rank(&self) -> ::std::option::Option<rank_cache::Rank> {
                self.#rank
            }

            fn set_rank(&mut self, rank: rank_cache::Rank) {
                self.#rank = ::std::option::Option::Some(rank);
            }
        }
    };

    TokenStream::from(expanded)
}

/// Resolves each requested role to a field: first a field tagged
/// `#[cache(role)]`, then the conventional field name for the role.
fn resolve_fields(input: &DeriveInput, roles: &[&str]) -> syn::Result<Vec<Ident>> {
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "cache item derives require a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "cache item derives only support structs",
            ))
        }
    };

    let mut tagged: Vec<(String, Ident)> = Vec::new();
    for field in named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        for attr in &field.attrs {
            if !attr.path().is_ident("cache") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                let role = meta
                    .path
                    .get_ident()
                    .map(|i| i.to_string())
                    .unwrap_or_default();
                if !ROLES.contains(&role.as_str()) {
                    return Err(meta.error(format!(
                        "unknown cache field role, expected one of: {}",
                        ROLES.join(", ")
                    )));
                }
                tagged.push((role, ident.clone()));
                Ok(())
            })?;
        }
    }

    roles
        .iter()
        .map(|role| {
            if let Some((_, ident)) = tagged.iter().find(|(r, _)| r == role) {
                return Ok(ident.clone());
            }
            let conventional = conventional_name(role);
            named
                .iter()
                .filter_map(|f| f.ident.as_ref())
                .find(|ident| *ident == conventional)
                .cloned()
                .ok_or_else(|| {
                    syn::Error::new(
                        Span::call_site(),
                        format!(
                            "no field marked #[cache({})] and no field named `{}` on {}",
                            role, conventional, input.ident
                        ),
                    )
                })
        })
        .collect()
}

fn conventional_name(role: &str) -> &str {
    match role {
        "owner" => "owner_id",
        other => other,
    }
}
