//! GeoIP2 web service response structures
//!
//! The Country, City and Insights endpoints all answer with the same
//! document shape; the endpoints differ only in how many of the facets
//! they fill in. [`Response`] models the union of them.
//!
//! Every scalar is an `Option`: `None` means the service sent nothing for
//! it, and nothing is written for it when the record is serialized again.
//! Nested facets are always present and default to empty.
//!
//! ```rust
//! use geoip2_web::geoip2::Response;
//!
//! let body = r#"{"country": {"iso_code": "US", "names": {"en": "United States"}}}"#;
//! let response: Response = serde_json::from_str(body).unwrap();
//!
//! assert_eq!(response.country.iso_code.as_deref(), Some("US"));
//! assert_eq!(response.country.names.english(), Some("United States"));
//! assert!(response.city.is_empty());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Localized names keyed by locale code (`"en"`, `"zh-CN"`, ...).
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Names(BTreeMap<String, String>);

impl Names {
    /// Name for the given locale code.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// English name (en)
    #[must_use]
    pub fn english(&self) -> Option<&str> {
        self.get("en")
    }

    /// Iterates over `(locale, name)` pairs in locale order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of locales present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no names are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Names {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Names(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Country, City or Insights web service response.
///
/// Which facets are filled in depends on the endpoint: Country answers
/// only continent, country, registered/represented country and a small
/// set of traits, while Insights adds confidence scores and the full
/// network traits on top of City.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Response {
    /// City data for the IP address.
    #[serde(default, skip_serializing_if = "City::is_empty")]
    pub city: City,
    /// Continent data for the IP address.
    #[serde(default, skip_serializing_if = "Continent::is_empty")]
    pub continent: Continent,
    /// Country where MaxMind believes the IP is located.
    #[serde(default, skip_serializing_if = "Country::is_empty")]
    pub country: Country,
    /// Location data including coordinates and time zone.
    #[serde(default, skip_serializing_if = "Location::is_empty")]
    pub location: Location,
    /// Postal code data for the IP address.
    #[serde(default, skip_serializing_if = "Postal::is_empty")]
    pub postal: Postal,
    /// Country where the ISP has registered the IP block.
    /// May differ from `country` (e.g., for mobile networks or VPNs).
    #[serde(default, skip_serializing_if = "RegisteredCountry::is_empty")]
    pub registered_country: RegisteredCountry,
    /// Country represented by users of this IP (e.g., military base or embassy).
    #[serde(default, skip_serializing_if = "RepresentedCountry::is_empty")]
    pub represented_country: RepresentedCountry,
    /// Subdivisions (states, provinces, etc.) ordered from largest to smallest.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subdivisions: Vec<Subdivision>,
    /// Network and risk traits of the IP address.
    #[serde(default, skip_serializing_if = "Traits::is_empty")]
    pub traits: Traits,
    /// Account metadata echoed by the service.
    #[serde(default, skip_serializing_if = "MaxMind::is_empty")]
    pub maxmind: MaxMind,
}

impl Response {
    /// The most specific subdivision, if any.
    #[must_use]
    pub fn most_specific_subdivision(&self) -> Option<&Subdivision> {
        self.subdivisions.last()
    }
}

/// City data for an IP address.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct City {
    /// Confidence score (0-100) that the city is correct. Insights only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    /// GeoNames ID for the city.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geoname_id: Option<u32>,
    /// Localized city names.
    #[serde(default, skip_serializing_if = "Names::is_empty")]
    pub names: Names,
}

impl City {
    /// Returns true if all fields are empty/None.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Continent data for an IP address.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Continent {
    /// Two-character continent code (e.g., "NA" for North America, "EU" for Europe).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// GeoNames ID for the continent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geoname_id: Option<u32>,
    /// Localized continent names.
    #[serde(default, skip_serializing_if = "Names::is_empty")]
    pub names: Names,
}

impl Continent {
    /// Returns true if all fields are empty/None.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Country data for an IP address.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Country {
    /// Confidence score (0-100) that the country is correct. Insights only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    /// GeoNames ID for the country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geoname_id: Option<u32>,
    /// True if the country is a member state of the European Union.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_in_european_union: Option<bool>,
    /// Two-character ISO 3166-1 alpha-2 country code.
    /// See <https://en.wikipedia.org/wiki/ISO_3166-1_alpha-2>.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_code: Option<String>,
    /// Localized country names.
    #[serde(default, skip_serializing_if = "Names::is_empty")]
    pub names: Names,
}

impl Country {
    /// Returns true if all fields are empty/None.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Country in which the ISP has registered the IP block.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct RegisteredCountry {
    /// GeoNames ID for the registered country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geoname_id: Option<u32>,
    /// True if the registered country is a member state of the European Union.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_in_european_union: Option<bool>,
    /// Two-character ISO 3166-1 alpha-2 country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_code: Option<String>,
    /// Localized country names.
    #[serde(default, skip_serializing_if = "Names::is_empty")]
    pub names: Names,
}

impl RegisteredCountry {
    /// Returns true if all fields are empty/None.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Represented country data.
///
/// The represented country is the country represented by something like a
/// military base or embassy.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct RepresentedCountry {
    /// GeoNames ID for the represented country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geoname_id: Option<u32>,
    /// True if the represented country is a member state of the European Union.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_in_european_union: Option<bool>,
    /// Two-character ISO 3166-1 alpha-2 country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_code: Option<String>,
    /// Localized country names.
    #[serde(default, skip_serializing_if = "Names::is_empty")]
    pub names: Names,
    /// Type of entity representing the country (e.g., "military").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub representation_type: Option<String>,
}

impl RepresentedCountry {
    /// Returns true if all fields are empty/None.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Location data for an IP address.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Location {
    /// Approximate accuracy radius in kilometers around the coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_radius: Option<u16>,
    /// The average income in US dollars associated with the IP address.
    /// Insights only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_income: Option<u32>,
    /// Approximate latitude of the location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Approximate longitude of the location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Metro code for the location, used for targeting advertisements.
    ///
    /// **Deprecated:** Metro codes are no longer maintained and should not be used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metro_code: Option<u16>,
    /// The estimated number of people per square kilometer. Insights only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population_density: Option<u32>,
    /// IANA time zone name (e.g., "America/New_York").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl Location {
    /// Returns true if all fields are None.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Postal data for an IP address.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Postal {
    /// Postal code for the location. Not available for all countries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Confidence score (0-100) that the postal code is correct. Insights only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
}

impl Postal {
    /// Returns true if all fields are None.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Subdivision (state, province, etc.) data for an IP address.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Subdivision {
    /// Confidence score (0-100) that the subdivision is correct. Insights only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    /// GeoNames ID for the subdivision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geoname_id: Option<u32>,
    /// ISO 3166-2 subdivision code (up to 3 characters).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_code: Option<String>,
    /// Localized subdivision names.
    #[serde(default, skip_serializing_if = "Names::is_empty")]
    pub names: Names,
}

impl Subdivision {
    /// Returns true if all fields are empty/None.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Network and risk traits of the queried IP address.
///
/// The Country and City endpoints fill in only a handful of these; the
/// ISP, organization and anonymizer fields come from Insights.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Traits {
    /// The autonomous system number (ASN) for the IP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autonomous_system_number: Option<u32>,
    /// The organization associated with the registered ASN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autonomous_system_organization: Option<String>,
    /// The connection type. Possible values include "Dialup", "Cable/DSL",
    /// "Corporate", "Cellular", and "Satellite".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    /// The second-level domain associated with the IP address
    /// (e.g., "example.com").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// The IP address the record is for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// True if the IP belongs to any sort of anonymous network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_anonymous: Option<bool>,
    /// **Deprecated:** use the other anonymizer flags instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_anonymous_proxy: Option<bool>,
    /// True if the IP is registered to an anonymous VPN provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_anonymous_vpn: Option<bool>,
    /// True if the IP belongs to an anycast network.
    /// See <https://en.wikipedia.org/wiki/Anycast>.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_anycast: Option<bool>,
    /// True if the IP belongs to a hosting or VPN provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hosting_provider: Option<bool>,
    /// True if MaxMind believes the IP is a legitimate proxy, such as an
    /// internal VPN used by a corporation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_legitimate_proxy: Option<bool>,
    /// True if the IP belongs to a public proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public_proxy: Option<bool>,
    /// True if the IP is on a suspected anonymizing network and belongs to
    /// a residential ISP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_residential_proxy: Option<bool>,
    /// **Deprecated:** satellite providers are no longer flagged separately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_satellite_provider: Option<bool>,
    /// True if the IP is a Tor exit node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_tor_exit_node: Option<bool>,
    /// The name of the ISP associated with the IP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isp: Option<String>,
    /// The mobile country code (MCC) associated with the IP.
    /// See <https://en.wikipedia.org/wiki/Mobile_country_code>.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_country_code: Option<String>,
    /// The mobile network code (MNC) associated with the IP.
    /// See <https://en.wikipedia.org/wiki/Mobile_network_code>.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_network_code: Option<String>,
    /// The network in CIDR notation associated with the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// The name of the organization associated with the IP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Risk indicator from 0 to 99.99 of how likely the IP is to be static.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_ip_score: Option<f64>,
    /// Estimated number of users sharing the IP address over the past 24 hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_count: Option<u32>,
    /// The user type associated with the IP address. Possible values include
    /// "business", "cafe", "cellular", "college", "government", "hosting",
    /// "library", "military", "residential", "router", "school",
    /// "search_engine_spider", and "traveler".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
}

impl Traits {
    /// Returns true if all fields are None.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Account metadata from the `maxmind` key of a response.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MaxMind {
    /// Approximate number of queries left on the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queries_remaining: Option<u64>,
}

impl MaxMind {
    /// Returns true if all fields are None.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
