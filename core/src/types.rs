//! Payload DTOs for the Gumroad API.
//!
//! # Design
//! The API grows fields over time and documents few of them as guaranteed.
//! Each model names the fields callers commonly use, all optional except the
//! identifier, and keeps everything else in `extra` so nothing the server
//! sent is lost. Write payloads skip unset fields so partial updates only
//! touch what the caller set.
//!
//! Counters and flags are read leniently: the API sends some of them as
//! strings (`"sales_count": "0"`, `"required": "true"`), so numeric and
//! boolean fields accept either form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub custom_permalink: Option<String>,
    /// Price in the smallest unit of `currency`.
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub formatted_price: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub published: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub short_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub sales_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub sales_usd_cents: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantCategory {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price_difference_cents: Option<i64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub max_purchase_count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A discount on one product, or on all products when `universal`.
///
/// Exactly one of `amount_cents` and `percent_off` is normally set,
/// depending on whether the code is a fixed amount or a percentage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferCode {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount_cents: Option<i64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub percent_off: Option<i64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub max_purchase_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub universal: Option<bool>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub times_used: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Custom fields are addressed by name; they have no separate id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomField {
    pub name: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub required: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub twitter_handle: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sale {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub order_id: Option<u64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub refunded: Option<bool>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub partially_refunded: Option<bool>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub shipped: Option<bool>,
    #[serde(default)]
    pub tracking_url: Option<String>,
    #[serde(default)]
    pub license_key: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscriber {
    pub id: String,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub purchase_ids: Vec<String>,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub cancelled_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The purchase a license key belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Purchase {
    #[serde(default)]
    pub sale_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub license_key: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub refunded: Option<bool>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub chargebacked: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of the license endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LicenseVerification {
    pub purchase: Purchase,
    /// How many times the license has been verified with
    /// `increment_uses_count` set.
    pub uses: u64,
}

/// Normalized result of every deletion: only the envelope message survives.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Write payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantCategoryInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_difference_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_purchase_count: Option<u64>,
}

/// Whether `amount_off` is in cents or percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferType {
    #[default]
    Cents,
    Percent,
}

/// Offer codes default to a fixed amount in cents when `offer_type` is unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferCodeInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_off: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_type: Option<OfferType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_purchase_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub universal: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomFieldInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Deserializers for values the API may send as JSON strings.
pub(crate) mod lenient {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// A number, a numeric string, or null / `""` for absent.
    pub(crate) fn number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let text = match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(other) => {
                return Err(D::Error::custom(format!("expected a number, got {other}")))
            }
        };
        text.parse()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid number `{text}`: {e}")))
    }

    /// A boolean or the strings `"true"` / `"false"`.
    pub(crate) fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(Value::String(s)) => match s.trim() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                "" => Ok(None),
                other => Err(D::Error::custom(format!("expected a boolean, got `{other}`"))),
            },
            Some(other) => Err(D::Error::custom(format!("expected a boolean, got {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn product_needs_only_an_id() {
        let product: Product = serde_json::from_value(json!({"id": "abc"})).unwrap();
        assert_eq!(product.id, "abc");
        assert!(product.name.is_none());
        assert!(product.tags.is_empty());
        assert!(product.extra.is_empty());
    }

    #[test]
    fn unknown_product_fields_land_in_extra() {
        let product: Product = serde_json::from_value(json!({
            "id": "abc",
            "name": "Ebook",
            "custom_receipt": "Thanks!",
            "file_info": {"Size": "1 MB"}
        }))
        .unwrap();
        assert_eq!(product.name.as_deref(), Some("Ebook"));
        assert_eq!(product.extra["custom_receipt"], "Thanks!");
        assert_eq!(product.extra["file_info"]["Size"], "1 MB");
    }

    #[test]
    fn extra_fields_are_serialized_back_inline() {
        let product: Product =
            serde_json::from_value(json!({"id": "abc", "deleted": false})).unwrap();
        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["deleted"], false);
        assert_eq!(back["id"], "abc");
    }

    #[test]
    fn product_rejects_missing_id() {
        let result: Result<Product, _> = serde_json::from_value(json!({"name": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn inputs_skip_unset_fields() {
        let input = VariantInput {
            name: Some("Large".to_string()),
            ..VariantInput::default()
        };
        assert_eq!(serde_json::to_value(&input).unwrap(), json!({"name": "Large"}));
    }

    #[test]
    fn offer_type_is_lowercase() {
        let input = OfferCodeInput {
            name: Some("SPRING".to_string()),
            amount_off: Some(10),
            offer_type: Some(OfferType::Percent),
            ..OfferCodeInput::default()
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"name": "SPRING", "amount_off": 10, "offer_type": "percent"})
        );
    }

    #[test]
    fn product_counters_may_be_strings() {
        let product: Product = serde_json::from_value(json!({
            "id": "abc",
            "price": 100,
            "sales_count": "0",
            "sales_usd_cents": "1500",
            "published": true
        }))
        .unwrap();
        assert_eq!(product.sales_count, Some(0));
        assert_eq!(product.sales_usd_cents, Some(1500));
        assert_eq!(product.price, Some(100));

        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["sales_count"], 0);
    }

    #[test]
    fn flags_may_be_strings() {
        let field: CustomField =
            serde_json::from_value(json!({"name": "Shirt size", "required": "true"})).unwrap();
        assert_eq!(field.required, Some(true));

        let code: OfferCode =
            serde_json::from_value(json!({"id": "OC1", "universal": "false", "times_used": "2"}))
                .unwrap();
        assert_eq!(code.universal, Some(false));
        assert_eq!(code.times_used, Some(2));
    }

    #[test]
    fn null_and_empty_strings_are_absent() {
        let sale: Sale = serde_json::from_value(json!({
            "id": "S1",
            "price": null,
            "order_id": "",
            "shipped": null
        }))
        .unwrap();
        assert_eq!(sale.price, None);
        assert_eq!(sale.order_id, None);
        assert_eq!(sale.shipped, None);
    }

    #[test]
    fn garbage_counters_are_still_rejected() {
        let result: Result<Product, _> =
            serde_json::from_value(json!({"id": "abc", "sales_count": "many"}));
        assert!(result.is_err());

        let result: Result<CustomField, _> =
            serde_json::from_value(json!({"name": "x", "required": "maybe"}));
        assert!(result.is_err());
    }
}
