use std::borrow::Cow;

use chrono::{DateTime, Utc};

/// Timestamp type used for record creation times.
pub type Timestamp = DateTime<Utc>;

/// Comparable key produced for sorting.
///
/// Text keys are lowercased so alphabetical sorting ignores case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Number(i128),
    Text(String),
    Time(Timestamp),
}

/// A field value the filter/sort engine can read.
pub trait FieldValue {
    /// Text form used by search and exact-match filters.
    fn text(&self) -> Option<Cow<'_, str>>;

    fn sort_key(&self) -> Option<SortKey> {
        self.text().map(|text| SortKey::Text(text.to_lowercase()))
    }
}

impl FieldValue for String {
    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl FieldValue for &str {
    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl FieldValue for bool {
    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(if *self { "true" } else { "false" }))
    }

    fn sort_key(&self) -> Option<SortKey> {
        Some(SortKey::Number(i128::from(*self)))
    }
}

impl FieldValue for Timestamp {
    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.to_rfc3339()))
    }

    fn sort_key(&self) -> Option<SortKey> {
        Some(SortKey::Time(*self))
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn text(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(FieldValue::text)
    }

    fn sort_key(&self) -> Option<SortKey> {
        self.as_ref().and_then(FieldValue::sort_key)
    }
}

macro_rules! integer_field_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn text(&self) -> Option<Cow<'_, str>> {
                    Some(Cow::Owned(self.to_string()))
                }

                fn sort_key(&self) -> Option<SortKey> {
                    Some(SortKey::Number(i128::from(*self)))
                }
            }
        )+
    };
}

integer_field_value!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Implement [`FieldValue`] for enums exposing `fn as_str(&self) -> &'static str`.
#[macro_export]
macro_rules! impl_field_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FieldValue for $ty {
                fn text(&self) -> ::core::option::Option<::std::borrow::Cow<'_, str>> {
                    ::core::option::Option::Some(::std::borrow::Cow::Borrowed(self.as_str()))
                }
            }
        )+
    };
}

/// Conversion of a record's timestamp field.
pub trait IntoTimestamp {
    fn timestamp(&self) -> Option<Timestamp>;
}

impl IntoTimestamp for Timestamp {
    fn timestamp(&self) -> Option<Timestamp> {
        Some(*self)
    }
}

impl IntoTimestamp for Option<Timestamp> {
    fn timestamp(&self) -> Option<Timestamp> {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_sort_keys_ignore_case() {
        assert_eq!("Banana".to_string().sort_key(), "banana".to_string().sort_key());
        assert!("apple".to_string().sort_key() < "Banana".to_string().sort_key());
    }

    #[test]
    fn numbers_sort_numerically() {
        assert!(9u32.sort_key() < 10u32.sort_key());
    }

    #[test]
    fn missing_option_has_no_key() {
        let missing: Option<String> = None;
        assert!(missing.text().is_none());
        assert!(missing.sort_key().is_none());
    }
}
