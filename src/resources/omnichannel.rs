use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::record::Timestamp;
use crate::validate::{Validate, ValidationErrors, Validator};
use crate::Record;

/// BOPIS (buy online, pick up in store) or BORIS (buy online, return in store).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentChannel {
    #[default]
    Bopis,
    Boris,
}

impl FulfillmentChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentChannel::Bopis => "bopis",
            FulfillmentChannel::Boris => "boris",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

crate::impl_field_value!(FulfillmentChannel, OrderStatus);

/// An in-store pickup or return order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
#[record(resource = "omnichannel_orders")]
pub struct OmnichannelOrder {
    #[serde(
        default,
        deserialize_with = "crate::record::id::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[record(search, unique)]
    pub order_number: String,
    #[record(search)]
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[record(search)]
    pub customer_email: Option<String>,
    #[record(filter)]
    pub channel: FulfillmentChannel,
    #[serde(default)]
    #[record(filter)]
    pub status: OrderStatus,
    #[record(search, filter = "store")]
    pub store_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl OmnichannelOrder {
    pub fn new(
        order_number: impl Into<String>,
        customer_name: impl Into<String>,
        channel: FulfillmentChannel,
        store_code: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            order_number: order_number.into(),
            customer_name: customer_name.into(),
            customer_email: None,
            channel,
            status: OrderStatus::default(),
            store_code: store_code.into(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Validate for OmnichannelOrder {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .required("orderNumber", &self.order_number)
            .required("customerName", &self.customer_name)
            .optional_email("customerEmail", self.customer_email.as_deref())
            .required("storeCode", &self.store_code)
            .finish()
    }
}
