mod record;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Record)]
// ============================================================================

/// Derive `HasId`, `HasCreatedAt`, `Filterable` and `Record` for a struct.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Record)]
/// #[record(resource = "customers")]
/// struct Customer {
///     #[record(id)]
///     id: String,
///     #[record(search)]
///     name: String,
///     #[record(search, unique)]
///     email: String,
///     #[record(filter)]
///     status: CustomerStatus,
///     #[record(filter = "type")]
///     customer_type: CustomerType,
///     #[record(created_at)]
///     created_at: Option<DateTime<Utc>>,
/// }
/// ```
///
/// Keys are the serialized field names: a field's `#[serde(rename = "...")]`,
/// else the struct's `#[serde(rename_all = "...")]` applied to the field name,
/// else the field name itself. With `rename_all = "camelCase"`, `first_name`
/// is searched, sorted and reported as `firstName`, matching patches and
/// validation errors.
///
/// Struct-level options:
/// - `resource = "..."`: collection / endpoint name (default: snake_case name + "s")
/// - `sort = "key"`: default ascending sort by that field instead of newest-first
///
/// Field-level options:
/// - `id`: identifier field (default: the field named `id`)
/// - `created_at`: timestamp used for newest-first ordering (default: field named `created_at`)
/// - `search`: included in free-text search
/// - `filter` / `filter = "key"`: exposed as an exact-match filter
/// - `unique`: must be unique (case-insensitive) across the resource
/// - `sortable`: available as an explicit sort key
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input)
}
