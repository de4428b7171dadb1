//! Console resources.
//!
//! One explicit struct per resource, all sharing the [`Record`](crate::Record)
//! traits via `#[derive(Record)]` and checked locally via
//! [`Validate`](crate::validate::Validate).

mod asset;
mod customer;
mod field_mapping;
mod omnichannel;
mod pick_list;
mod sync_log;

pub use asset::{AssetKind, DigitalAsset};
pub use customer::{Customer, CustomerStatus, CustomerType};
pub use field_mapping::{FieldMapping, MappingEntity};
pub use omnichannel::{FulfillmentChannel, OmnichannelOrder, OrderStatus};
pub use pick_list::{PickList, PickStatus};
pub use sync_log::{SyncDirection, SyncLog, SyncStatus};
