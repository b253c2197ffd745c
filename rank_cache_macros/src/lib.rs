mod cache_item;

use proc_macro::TokenStream;

/// Derive macro for the `CacheItem` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, CacheItem)]
/// struct FixedCost {
///     pub id: i64,
///     #[cache(owner)]
///     pub user_id: String,
///     pub created_at: Option<SystemTime>,
///     pub updated_at: Option<SystemTime>,
///     pub name: String,
/// }
/// ```
///
/// Fields default to `id`, `owner_id`, `created_at` and `updated_at`.
/// `#[cache(id)]`, `#[cache(owner)]`, `#[cache(created_at)]` and
/// `#[cache(updated_at)]` select a differently named field.
#[proc_macro_derive(CacheItem, attributes(cache))]
pub fn derive_cache_item(input: TokenStream) -> TokenStream {
    cache_item::derive_cache_item(input)
}

/// Derive macro for the `RankableItem` trait.
///
/// The rank field must be an `Option<Rank>`. It defaults to a field named
/// `rank`; `#[cache(rank)]` selects another one.
#[proc_macro_derive(Rankable, attributes(cache))]
pub fn derive_rankable(input: TokenStream) -> TokenStream {
    cache_item::derive_rankable(input)
}
