//! Endpoint wrappers.
//!
//! Each operation validates its identifiers, builds one path, issues one
//! [`GumroadClient::request`](crate::GumroadClient::request) and projects one
//! field out of the envelope. Errors pass through unchanged.

mod custom_fields;
mod licenses;
mod offer_codes;
mod products;
mod sales;
mod subscribers;
mod user;
mod variant_categories;
mod variants;

use serde_json::Value;

use crate::envelope::Envelope;
use crate::error::GumroadError;
use crate::types::{lenient, Deleted, LicenseVerification, Purchase};

/// Deletions keep only the envelope message, whatever else was sent.
fn deleted(envelope: Envelope) -> Deleted {
    Deleted {
        message: envelope.message.unwrap_or_default(),
    }
}

fn license_verification(envelope: &Envelope) -> Result<LicenseVerification, GumroadError> {
    let purchase: Purchase = envelope.project("purchase")?;
    let uses = envelope.field("uses").cloned().unwrap_or(Value::Null);
    let uses: Option<u64> = lenient::number(uses).map_err(|e| {
        GumroadError::MalformedResponse(format!("field `uses`: {e}"))
    })?;
    Ok(LicenseVerification {
        purchase,
        uses: uses.unwrap_or_default(),
    })
}
