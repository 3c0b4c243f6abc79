//! Geolocation hints forwarded by the edge proxy.
//!
//! The proxy annotates every request with `x-vercel-ip-*` headers; we never
//! resolve addresses ourselves. Absent or empty headers simply mean the
//! field is unknown.

use rocket::http::{HeaderMap, RawStr};
use rocket::request::{FromRequest, Outcome, Request};
use serde::Serialize;

pub const COUNTRY_HEADER: &str = "x-vercel-ip-country";
const CITY_HEADER: &str = "x-vercel-ip-city";
const COUNTRY_REGION_HEADER: &str = "x-vercel-ip-country-region";
const EDGE_REGION_HEADER: &str = "x-vercel-edge-region";
const LATITUDE_HEADER: &str = "x-vercel-ip-latitude";
const LONGITUDE_HEADER: &str = "x-vercel-ip-longitude";

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoInfo {
    pub city: Option<String>,
    pub country: Option<String>,
    pub country_region: Option<String>,
    pub region: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl GeoInfo {
    pub fn from_headers(headers: &HeaderMap<'_>) -> Self {
        GeoInfo {
            // City names arrive percent-encoded ("S%C3%A3o%20Paulo").
            city: header_value(headers, CITY_HEADER)
                .map(|city| RawStr::new(&city).percent_decode_lossy().into_owned()),
            country: header_value(headers, COUNTRY_HEADER),
            country_region: header_value(headers, COUNTRY_REGION_HEADER),
            region: header_value(headers, EDGE_REGION_HEADER),
            latitude: header_value(headers, LATITUDE_HEADER),
            longitude: header_value(headers, LONGITUDE_HEADER),
        }
    }
}

fn header_value(headers: &HeaderMap<'_>, name: &str) -> Option<String> {
    headers
        .get_one(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Request guard bundling the proxy geo headers with the client's language
/// and user agent. Always succeeds; missing headers become `None`.
#[derive(Debug, Default)]
pub struct ClientGeo {
    pub info: GeoInfo,
    pub accept_language: Option<String>,
    pub user_agent: Option<String>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientGeo {
    type Error = std::convert::Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let headers = request.headers();
        Outcome::Success(ClientGeo {
            info: GeoInfo::from_headers(headers),
            accept_language: header_value(headers, "accept-language"),
            user_agent: header_value(headers, "user-agent"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::http::Header;

    fn header_map(pairs: &[(&'static str, &'static str)]) -> HeaderMap<'static> {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.add(Header::new(*name, *value));
        }
        map
    }

    #[test]
    fn reads_trimmed_values_and_skips_blanks() {
        let map = header_map(&[
            ("x-vercel-ip-country", " SE "),
            ("x-vercel-ip-city", ""),
            ("x-vercel-ip-latitude", "59.3293"),
        ]);
        let info = GeoInfo::from_headers(&map);
        assert_eq!(info.country.as_deref(), Some("SE"));
        assert_eq!(info.city, None);
        assert_eq!(info.latitude.as_deref(), Some("59.3293"));
        assert_eq!(info.longitude, None);
    }

    #[test]
    fn city_is_percent_decoded() {
        let map = header_map(&[("x-vercel-ip-city", "S%C3%A3o%20Paulo")]);
        let info = GeoInfo::from_headers(&map);
        assert_eq!(info.city.as_deref(), Some("S\u{e3}o Paulo"));
    }
}
