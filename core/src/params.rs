//! Path identifiers and query parameters for the endpoint wrappers.
//!
//! Identifier structs are checked before any request is built: an empty id
//! is rejected with [`GumroadError::MissingIdentifier`] instead of producing
//! a path such as `/products//enable`. Every id is percent-encoded as a
//! single path segment.

use serde::{Deserialize, Serialize};

use crate::envelope::Params;
use crate::error::GumroadError;

/// Validate `value` and encode it as one path segment.
pub(crate) fn segment(name: &'static str, value: &str) -> Result<String, GumroadError> {
    if value.trim().is_empty() {
        return Err(GumroadError::MissingIdentifier(name));
    }
    Ok(urlencoding::encode(value).into_owned())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub product_id: String,
}

impl ProductRef {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
        }
    }

    pub(crate) fn path(&self) -> Result<String, GumroadError> {
        Ok(format!("/products/{}", segment("product_id", &self.product_id)?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCategoryRef {
    pub product_id: String,
    pub variant_category_id: String,
}

impl VariantCategoryRef {
    pub fn new(product_id: impl Into<String>, variant_category_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            variant_category_id: variant_category_id.into(),
        }
    }

    pub(crate) fn path(&self) -> Result<String, GumroadError> {
        Ok(format!(
            "/products/{}/variant_categories/{}",
            segment("product_id", &self.product_id)?,
            segment("variant_category_id", &self.variant_category_id)?
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRef {
    pub product_id: String,
    pub variant_category_id: String,
    pub variant_id: String,
}

impl VariantRef {
    pub fn new(
        product_id: impl Into<String>,
        variant_category_id: impl Into<String>,
        variant_id: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            variant_category_id: variant_category_id.into(),
            variant_id: variant_id.into(),
        }
    }

    pub(crate) fn path(&self) -> Result<String, GumroadError> {
        let category = VariantCategoryRef::new(
            self.product_id.as_str(),
            self.variant_category_id.as_str(),
        );
        Ok(format!(
            "{}/variants/{}",
            category.path()?,
            segment("variant_id", &self.variant_id)?
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferCodeRef {
    pub product_id: String,
    pub offer_code_id: String,
}

impl OfferCodeRef {
    pub fn new(product_id: impl Into<String>, offer_code_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            offer_code_id: offer_code_id.into(),
        }
    }

    pub(crate) fn path(&self) -> Result<String, GumroadError> {
        Ok(format!(
            "/products/{}/offer_codes/{}",
            segment("product_id", &self.product_id)?,
            segment("offer_code_id", &self.offer_code_id)?
        ))
    }
}

/// Custom fields are addressed by their (possibly multi-word) name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldRef {
    pub product_id: String,
    pub custom_field_name: String,
}

impl CustomFieldRef {
    pub fn new(product_id: impl Into<String>, custom_field_name: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            custom_field_name: custom_field_name.into(),
        }
    }

    pub(crate) fn path(&self) -> Result<String, GumroadError> {
        Ok(format!(
            "/products/{}/custom_fields/{}",
            segment("product_id", &self.product_id)?,
            segment("custom_field_name", &self.custom_field_name)?
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRef {
    pub sale_id: String,
}

impl SaleRef {
    pub fn new(sale_id: impl Into<String>) -> Self {
        Self {
            sale_id: sale_id.into(),
        }
    }

    pub(crate) fn path(&self) -> Result<String, GumroadError> {
        Ok(format!("/sales/{}", segment("sale_id", &self.sale_id)?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberRef {
    pub subscriber_id: String,
}

impl SubscriberRef {
    pub fn new(subscriber_id: impl Into<String>) -> Self {
        Self {
            subscriber_id: subscriber_id.into(),
        }
    }

    pub(crate) fn path(&self) -> Result<String, GumroadError> {
        Ok(format!(
            "/subscribers/{}",
            segment("subscriber_id", &self.subscriber_id)?
        ))
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Filters for listing sales. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesQuery {
    pub after: Option<String>,
    pub before: Option<String>,
    pub product_id: Option<String>,
    pub email: Option<String>,
    pub order_id: Option<String>,
    /// Cursor returned as `next_page_key` by the previous page.
    pub page_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscribersQuery {
    pub email: Option<String>,
    pub paginated: Option<bool>,
    pub page_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipmentParams {
    pub tracking_url: Option<String>,
}

/// Omitting `amount_cents` refunds the full amount.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefundParams {
    pub amount_cents: Option<i64>,
}

/// Identifies a license key and the product it was sold for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseParams {
    pub product_id: Option<String>,
    pub product_permalink: Option<String>,
    pub license_key: String,
    /// Only meaningful for verification; the server defaults to `true`.
    pub increment_uses_count: Option<bool>,
}

impl LicenseParams {
    pub fn for_product(product_id: impl Into<String>, license_key: impl Into<String>) -> Self {
        Self {
            product_id: Some(product_id.into()),
            license_key: license_key.into(),
            ..Self::default()
        }
    }

    pub fn for_permalink(permalink: impl Into<String>, license_key: impl Into<String>) -> Self {
        Self {
            product_permalink: Some(permalink.into()),
            license_key: license_key.into(),
            ..Self::default()
        }
    }

    pub fn increment_uses_count(mut self, increment: bool) -> Self {
        self.increment_uses_count = Some(increment);
        self
    }

    pub(crate) fn to_params(&self) -> Result<Params, GumroadError> {
        if self.license_key.trim().is_empty() {
            return Err(GumroadError::MissingIdentifier("license_key"));
        }
        Params::from_serializable(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_path_nests_all_identifiers() {
        let path = VariantRef::new("P1", "VC1", "V1").path().unwrap();
        assert_eq!(path, "/products/P1/variant_categories/VC1/variants/V1");
    }

    #[test]
    fn custom_field_name_is_percent_encoded() {
        let path = CustomFieldRef::new("P1", "Shirt size/fit").path().unwrap();
        assert_eq!(path, "/products/P1/custom_fields/Shirt%20size%2Ffit");
    }

    #[test]
    fn empty_identifier_is_rejected() {
        let err = VariantRef::new("P1", "", "V1").path().unwrap_err();
        assert!(matches!(err, GumroadError::MissingIdentifier("variant_category_id")));

        let err = ProductRef::default().path().unwrap_err();
        assert!(matches!(err, GumroadError::MissingIdentifier("product_id")));
    }

    #[test]
    fn sale_and_subscriber_paths() {
        assert_eq!(SaleRef::new("S1").path().unwrap(), "/sales/S1");
        assert_eq!(SubscriberRef::new("SUB1").path().unwrap(), "/subscribers/SUB1");
        assert_eq!(
            OfferCodeRef::new("P1", "OC1").path().unwrap(),
            "/products/P1/offer_codes/OC1"
        );
    }

    #[test]
    fn license_params_require_a_key() {
        let err = LicenseParams::for_product("P1", "").to_params().unwrap_err();
        assert!(matches!(err, GumroadError::MissingIdentifier("license_key")));
    }

    #[test]
    fn license_params_flatten_to_query() {
        let params = LicenseParams::for_product("P1", "KEY-1")
            .increment_uses_count(false)
            .to_params()
            .unwrap();
        assert_eq!(params.get("product_id"), Some("P1"));
        assert_eq!(params.get("license_key"), Some("KEY-1"));
        assert_eq!(params.get("increment_uses_count"), Some("false"));
        assert_eq!(params.get("product_permalink"), None);
    }
}
