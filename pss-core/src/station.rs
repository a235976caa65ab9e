use crate::{
    error::Result,
    geo::Located,
    payload::{self, Row},
};
use chrono::{DateTime, Utc};
use log::warn;
use pss_utils::dates::parse_timestamp;
use serde::{Deserialize, Serialize};

/// A stream temperature reading from a USGS gauging station.
///
/// Readings have no identity across fetches; each fetch replaces the set.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct StationReading {
    /// USGS site number, empty when the proxy omits it
    pub site_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_celsius: f64,
    pub observed_at: DateTime<Utc>,
}

impl Located for StationReading {
    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }
}

fn row_to_reading(row: &Row) -> Option<StationReading> {
    let observed_raw = payload::string(row, &["observedAt", "observed_at", "dateTime"])?;
    Some(StationReading {
        site_code: payload::string(row, &["siteCode", "site_code"]).unwrap_or_default(),
        latitude: payload::number(row, &["latitude", "lat"])?,
        longitude: payload::number(row, &["longitude", "lon", "lng"])?,
        temperature_celsius: payload::number(row, &["temperatureCelsius", "temperature_celsius"])?,
        observed_at: parse_timestamp(&observed_raw).ok()?,
    })
}

/// Convert a `/api/usgs` response body into station readings.
///
/// Rows missing a coordinate, a finite temperature, or an RFC 3339
/// `observedAt` are dropped.
pub fn parse_station_payload(body: &str) -> Result<Vec<StationReading>> {
    let rows = payload::parse_rows(body, "/api/usgs")?;
    let total = rows.len();
    let readings: Vec<StationReading> = rows.iter().filter_map(row_to_reading).collect();
    if readings.len() < total {
        warn!(
            "[PSS] usgs: dropped {} of {} malformed station rows",
            total - readings.len(),
            total
        );
    }
    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use chrono::TimeZone;

    // Shape served by /api/usgs (temperature parameter 00010)
    const BODY: &str = r#"[
        {"siteCode":"12200500","latitude":48.445,"longitude":-122.336,"temperatureCelsius":11.2,"observedAt":"2024-09-01T12:00:00Z"},
        {"siteCode":"12113000","latitude":"47.465","longitude":"-122.244","temperatureCelsius":"14.9","observedAt":"2024-09-01T05:15:00.000-07:00"},
        {"siteCode":"12089500","latitude":46.923,"longitude":-122.551,"temperatureCelsius":null,"observedAt":"2024-09-01T12:00:00Z"},
        {"siteCode":"12101500","latitude":47.2,"longitude":-122.3,"temperatureCelsius":12.0,"observedAt":"last tuesday"},
        {"latitude":47.6,"longitude":-122.0,"temperatureCelsius":9.5,"observedAt":"2024-09-01T12:00:00Z"}
    ]"#;

    #[test]
    fn test_parse_station_payload() {
        let readings = parse_station_payload(BODY).unwrap();
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].site_code, "12200500");
        assert!((readings[1].temperature_celsius - 14.9).abs() < f64::EPSILON);
        assert_eq!(
            readings[1].observed_at,
            Utc.with_ymd_and_hms(2024, 9, 1, 12, 15, 0).unwrap()
        );
        assert_eq!(readings[2].site_code, "");
    }

    #[test]
    fn test_parse_station_payload_empty_array() {
        assert!(parse_station_payload("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_station_payload_garbage() {
        assert!(matches!(
            parse_station_payload("Service Unavailable"),
            Err(DashboardError::DataUnavailable(_))
        ));
    }
}
