//! Asynchronous client for the Gumroad v2 REST API.
//!
//! # Overview
//! Covers products, variant categories, variants, offer codes, custom
//! fields, the authenticated user, sales, subscribers and license keys.
//! Every operation takes typed identifiers, issues exactly one HTTP request
//! with the access token as a query parameter, and unwraps the API's
//! `{ "success": bool, "message"?: string, ... }` envelope into a typed
//! result or a [`GumroadError`].
//!
//! # Design
//! - `envelope` builds `HttpRequest` values and interprets `HttpResponse`
//!   values as plain data; it never touches the network.
//! - `transport` is the single I/O seam. [`ReqwestTransport`] is the
//!   default; tests plug in in-memory transports.
//! - `GumroadClient::request` joins the two and is the only place a request
//!   is issued. The endpoint wrappers project one field out of its result.
//!
//! ```no_run
//! use gumroad_core::{GumroadClient, GumroadConfig, ProductRef};
//!
//! # async fn run() -> Result<(), gumroad_core::GumroadError> {
//! let client = GumroadClient::new(GumroadConfig::new("ACCESS_TOKEN"))?;
//! let product = client.get_product(&ProductRef::new("A-m3CDDC5dlrSdKZp0RFhA==")).await?;
//! println!("{}", product.name.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
mod endpoints;
pub mod envelope;
pub mod error;
pub mod http;
pub mod params;
pub mod transport;
pub mod types;

pub use client::GumroadClient;
pub use config::{GumroadConfig, DEFAULT_BASE_URL};
pub use envelope::{Envelope, Params, RequestOptions};
pub use error::GumroadError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{
    CustomFieldRef, LicenseParams, OfferCodeRef, ProductRef, RefundParams, SaleRef, SalesQuery,
    ShipmentParams, SubscriberRef, SubscribersQuery, VariantCategoryRef, VariantRef,
};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    CustomField, CustomFieldInput, Deleted, LicenseVerification, OfferCode, OfferCodeInput,
    OfferType, Product, Purchase, Sale, Subscriber, User, Variant, VariantCategory,
    VariantCategoryInput, VariantInput,
};
