//! Saved Contact

use serde::{Deserialize, Serialize};

/// Contact and address details remembered between orders so a repeat order
/// starts pre-filled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedContact {
    /// Contact phone
    pub phone: String,

    /// Delivery address
    pub address: String,

    /// Delivery latitude, when the address was geocoded
    pub latitude: Option<f64>,

    /// Delivery longitude, when the address was geocoded
    pub longitude: Option<f64>,

    /// City the geocoder placed the address in
    pub city: Option<String>,

    /// Recipient name
    pub recipient_name: String,

    /// Courier comment
    pub delivery_comment: String,
}
