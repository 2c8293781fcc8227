//! Geolocation fix model.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair recording where an expense or report was produced.
///
/// # Example
///
/// ```
/// use expense_report::models::GeolocationFix;
///
/// let fix = GeolocationFix::new(23.810332, 90.412518);
/// assert_eq!(fix.report_line(), "Location: Lat 23.8103, Lon 90.4125");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeolocationFix {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Reverse-geocoded city, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Reverse-geocoded country, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl GeolocationFix {
    /// Creates a fix without city/country enrichment.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            city: None,
            country: None,
        }
    }

    /// The report header line, coordinates at four decimal places.
    pub fn report_line(&self) -> String {
        format!(
            "Location: Lat {:.4}, Lon {:.4}",
            self.latitude, self.longitude
        )
    }

    /// Full-precision description handed to the translation assistant.
    pub fn describe(&self) -> String {
        format!("Latitude: {}, Longitude: {}", self.latitude, self.longitude)
    }
}
