/// Groundwater Aggregation API Client
///
/// Retrieves national, state, district, and station-level groundwater data
/// from the aggregation service. Response structures mirror the service's
/// JSON contract field for field.
///
/// Endpoints:
/// - /api/summary/{national,districts,states}
/// - /api/stations/{alerts,list,{id}/timeseries}
/// - /api/alerts/{critical,by-type,future-risk}
/// - /api/reports/metadata

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::cache::{EndpointClass, QueryKey};
use crate::config::ApiConfig;
use crate::model::{ApiError, GeoEntity, LatLon};

// ---------------------------------------------------------------------------
// API Response Structures
// ---------------------------------------------------------------------------

/// Nationwide rollup shown on the dashboard header.
#[derive(Debug, Clone, Deserialize)]
pub struct NationalSummary {
    pub total_stations: u32,
    pub stressed_percentage: f64,
    pub average_gavi: f64,
    pub active_critical_alerts: u32,
    pub year: i32,
}

/// One district's stress aggregate.
#[derive(Debug, Clone, Deserialize)]
pub struct DistrictStress {
    pub state: String,
    pub district: String,
    pub total_stations: u32,
    pub avg_gavi: f64,
    pub stressed_ratio: f64,
    pub critical_alerts: u32,
    pub depletion_alerts: u32,
    pub stress_category: Option<String>,
    pub future_risk_flag: Option<String>,
}

/// One state's rollup.
#[derive(Debug, Clone, Deserialize)]
pub struct StateSummary {
    pub state: String,
    pub total_stations: u32,
    pub avg_gavi: f64,
    pub stressed_percentage: f64,
    pub critical_alerts: u32,
    pub depletion_alerts: u32,
    pub recovery_signals: u32,
}

/// A station currently carrying an alert.
#[derive(Debug, Clone, Deserialize)]
pub struct StationAlert {
    pub station_id: String,
    pub state: String,
    pub district: String,
    pub latitude: f64,
    pub longitude: f64,
    pub year: i32,
    pub gavi: f64,
    pub water_level: f64,
    pub alert: String,
    pub alert_severity: String,
}

/// A station row from the full listing.
#[derive(Debug, Clone, Deserialize)]
pub struct StationListItem {
    pub station_id: String,
    pub state: String,
    pub district: String,
    pub latitude: f64,
    pub longitude: f64,
    pub latest_gavi: f64,
    pub latest_alert: String,
}

/// One historical reading in a station's series.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesPoint {
    pub year: i32,
    pub water_level: f64,
    pub gavi: f64,
    pub alert: Option<String>,
}

/// One forecast point in a station's series.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPoint {
    pub year: i32,
    pub predicted_water_level: f64,
    pub predicted_gavi: f64,
    pub forecast_alert: String,
    pub confidence: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationBaseline {
    pub min_water_level: f64,
    pub max_water_level: f64,
    pub avg_water_level: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationCurrentStatus {
    pub latest_year: i32,
    pub latest_gavi: f64,
    pub latest_alert: String,
}

/// Full per-station history with forecast and baseline.
#[derive(Debug, Clone, Deserialize)]
pub struct StationTimeSeries {
    pub station_id: String,
    pub state: String,
    pub district: String,
    pub latitude: f64,
    pub longitude: f64,
    pub historical: Vec<TimeSeriesPoint>,
    pub forecast: Vec<ForecastPoint>,
    pub baseline: StationBaseline,
    pub current_status: StationCurrentStatus,
    pub explanation: String,
}

/// Districts ranked by current and projected critical alerts.
#[derive(Debug, Clone, Deserialize)]
pub struct TopAffectedDistrict {
    pub state: String,
    pub district: String,
    pub current_critical: u32,
    pub future_critical_1y: u32,
    pub stressed_ratio: f64,
    pub avg_gavi: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CriticalAlertsSummary {
    pub current_critical_count: u32,
    pub future_critical_1y: u32,
    pub future_critical_3y: u32,
    pub top_affected_districts: Vec<TopAffectedDistrict>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertTypeStats {
    pub count: u32,
    pub percentage: f64,
}

/// Alert counts by type for the current year.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertDistribution {
    pub year: i32,
    pub total_stations: u32,
    pub alert_distribution: HashMap<String, AlertTypeStats>,
}

/// Projected alert mix at a forecast horizon ("1y" or "3y").
#[derive(Debug, Clone, Deserialize)]
pub struct FutureRisk {
    pub horizon: String,
    pub total_stations: u32,
    pub future_alert_distribution: HashMap<String, AlertTypeStats>,
    pub top_10_states_at_risk: HashMap<String, u32>,
}

/// Downloadable report descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportMetadata {
    pub report_type: String,
    pub description: String,
    pub record_count: u64,
    pub last_updated: String,
    pub available: bool,
}

// ---------------------------------------------------------------------------
// Query Parameters
// ---------------------------------------------------------------------------

/// Optional filters for the district summary endpoint.
#[derive(Debug, Clone, Default)]
pub struct DistrictQuery {
    pub state: Option<String>,
    pub min_stressed_ratio: Option<f64>,
    pub sort_by: Option<String>,
    pub limit: Option<u32>,
}

impl DistrictQuery {
    fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(ref state) = self.state {
            pairs.push(("state".to_string(), state.clone()));
        }
        if let Some(ratio) = self.min_stressed_ratio {
            pairs.push(("min_stressed_ratio".to_string(), ratio.to_string()));
        }
        if let Some(ref sort_by) = self.sort_by {
            pairs.push(("sort_by".to_string(), sort_by.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

/// Optional filters for station endpoints.
#[derive(Debug, Clone, Default)]
pub struct StationQuery {
    pub state: Option<String>,
    pub district: Option<String>,
    pub alert_type: Option<String>,
    pub limit: Option<u32>,
}

impl StationQuery {
    fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(ref state) = self.state {
            pairs.push(("state".to_string(), state.clone()));
        }
        if let Some(ref district) = self.district {
            pairs.push(("district".to_string(), district.clone()));
        }
        if let Some(ref alert_type) = self.alert_type {
            pairs.push(("alert_type".to_string(), alert_type.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct ApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ApiClient {
    /// Builds a client from the configured base URL and timeout.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Performs one GET and returns the raw JSON body.
    fn get_json(&self, path: &str, params: &[(String, String)]) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http(status.as_u16()));
        }

        response
            .json::<Value>()
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    fn get_typed<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, ApiError> {
        let raw = self.get_json(path, params)?;
        serde_json::from_value(raw).map_err(|e| ApiError::Parse(e.to_string()))
    }

    // -- Summary endpoints --

    pub fn national_summary(&self) -> Result<NationalSummary, ApiError> {
        self.get_typed("/api/summary/national", &[])
    }

    pub fn district_summary(&self, query: &DistrictQuery) -> Result<Vec<DistrictStress>, ApiError> {
        self.get_typed("/api/summary/districts", &query.to_pairs())
    }

    pub fn state_summary(&self) -> Result<Vec<StateSummary>, ApiError> {
        self.get_typed("/api/summary/states", &[])
    }

    // -- Station endpoints --

    pub fn station_alerts(&self, query: &StationQuery) -> Result<Vec<StationAlert>, ApiError> {
        self.get_typed("/api/stations/alerts", &query.to_pairs())
    }

    pub fn station_list(&self, query: &StationQuery) -> Result<Vec<StationListItem>, ApiError> {
        self.get_typed("/api/stations/list", &query.to_pairs())
    }

    pub fn station_timeseries(&self, station_id: &str) -> Result<StationTimeSeries, ApiError> {
        self.get_typed(&format!("/api/stations/{}/timeseries", station_id), &[])
    }

    // -- Alert endpoints --

    pub fn critical_alerts(&self) -> Result<CriticalAlertsSummary, ApiError> {
        self.get_typed("/api/alerts/critical", &[])
    }

    pub fn alert_distribution(&self) -> Result<AlertDistribution, ApiError> {
        self.get_typed("/api/alerts/by-type", &[])
    }

    pub fn future_risk(&self, horizon: &str) -> Result<FutureRisk, ApiError> {
        self.get_typed(
            "/api/alerts/future-risk",
            &[("horizon".to_string(), horizon.to_string())],
        )
    }

    // -- Report endpoints --

    pub fn report_metadata(&self) -> Result<Vec<ReportMetadata>, ApiError> {
        self.get_typed("/api/reports/metadata", &[])
    }

    /// Executes the fetch a cache key stands for and returns the raw JSON
    /// body for the cache to hold. Keyed parameters ride along as the
    /// normalized query string the key carries.
    pub fn fetch_for_key(&self, key: &QueryKey) -> Result<Value, ApiError> {
        let params = decode_params(&key.params);
        match key.class {
            EndpointClass::NationalSummary => self.get_json("/api/summary/national", &params),
            EndpointClass::DistrictSummary => self.get_json("/api/summary/districts", &params),
            EndpointClass::StateSummary => self.get_json("/api/summary/states", &params),
            EndpointClass::StationAlerts => self.get_json("/api/stations/alerts", &params),
            EndpointClass::StationList => self.get_json("/api/stations/list", &params),
            EndpointClass::StationTimeSeries => {
                // The station id rides in the key's params.
                let station_id = params
                    .iter()
                    .find(|(name, _)| name == "station_id")
                    .map(|(_, value)| value.clone())
                    .ok_or_else(|| {
                        ApiError::Request("timeseries key missing station_id".to_string())
                    })?;
                self.get_json(&format!("/api/stations/{}/timeseries", station_id), &[])
            }
            EndpointClass::CriticalAlerts => self.get_json("/api/alerts/critical", &params),
            EndpointClass::AlertDistribution => self.get_json("/api/alerts/by-type", &params),
            EndpointClass::FutureRisk => self.get_json("/api/alerts/future-risk", &params),
            EndpointClass::ReportMetadata => self.get_json("/api/reports/metadata", &params),
        }
    }
}

/// Splits a normalized `name=value&name=value` key parameter string back
/// into pairs.
fn decode_params(params: &str) -> Vec<(String, String)> {
    if params.is_empty() {
        return Vec::new();
    }
    params
        .split('&')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Key Constructors
// ---------------------------------------------------------------------------

/// Cache key for the district summary endpoint with its filters.
pub fn district_summary_key(query: &DistrictQuery) -> QueryKey {
    let pairs = query.to_pairs();
    let borrowed: Vec<(&str, &str)> = pairs
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    QueryKey::with_params(EndpointClass::DistrictSummary, &borrowed)
}

/// Cache key for the station alerts endpoint with its filters.
pub fn station_alerts_key(query: &StationQuery) -> QueryKey {
    let pairs = query.to_pairs();
    let borrowed: Vec<(&str, &str)> = pairs
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    QueryKey::with_params(EndpointClass::StationAlerts, &borrowed)
}

/// Cache key for one station's time series.
pub fn station_timeseries_key(station_id: &str) -> QueryKey {
    QueryKey::with_params(
        EndpointClass::StationTimeSeries,
        &[("station_id", station_id)],
    )
}

// ---------------------------------------------------------------------------
// Entity Adapters
// ---------------------------------------------------------------------------

/// District aggregates as map entities. No ground-truth coordinates here;
/// placement falls to the coordinate resolver.
pub fn entities_from_districts(rows: &[DistrictStress]) -> Vec<GeoEntity> {
    rows.iter()
        .map(|row| GeoEntity::district(&row.state, &row.district, row.avg_gavi, row.total_stations))
        .collect()
}

/// Alerting stations as map entities with their reported coordinates.
pub fn entities_from_alerts(rows: &[StationAlert]) -> Vec<GeoEntity> {
    rows.iter()
        .map(|row| {
            GeoEntity::station(
                &row.station_id,
                &row.state,
                &row.district,
                LatLon::new(row.latitude, row.longitude),
                row.gavi,
                Some(&row.alert),
            )
        })
        .collect()
}

/// Listed stations as map entities. "NO_ALERT" is the service's explicit
/// none marker and maps to an absent alert.
pub fn entities_from_station_list(rows: &[StationListItem]) -> Vec<GeoEntity> {
    rows.iter()
        .map(|row| {
            let alert = if row.latest_alert == "NO_ALERT" {
                None
            } else {
                Some(row.latest_alert.as_str())
            };
            GeoEntity::station(
                &row.station_id,
                &row.state,
                &row.district,
                LatLon::new(row.latitude, row.longitude),
                row.latest_gavi,
                alert,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_district_stress_parses_service_payload() {
        let raw = json!([{
            "state": "Gujarat",
            "district": "Vadodara",
            "total_stations": 14,
            "avg_gavi": 38.2,
            "stressed_ratio": 0.64,
            "critical_alerts": 3,
            "depletion_alerts": 5,
            "stress_category": "stressed",
            "future_risk_flag": null
        }]);
        let rows: Vec<DistrictStress> =
            serde_json::from_value(raw).expect("district payload should parse");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].district, "Vadodara");
        assert_eq!(rows[0].stress_category.as_deref(), Some("stressed"));
        assert!(rows[0].future_risk_flag.is_none());
    }

    #[test]
    fn test_station_timeseries_parses_nested_sections() {
        let raw = json!({
            "station_id": "GW001234",
            "state": "Punjab",
            "district": "Ludhiana",
            "latitude": 30.9010,
            "longitude": 75.8573,
            "historical": [
                {"year": 2022, "water_level": 12.4, "gavi": 41.0, "alert": "DEPLETION_WARNING"},
                {"year": 2023, "water_level": 13.1, "gavi": 37.5, "alert": null}
            ],
            "forecast": [
                {"year": 2024, "predicted_water_level": 13.8, "predicted_gavi": 34.0,
                 "forecast_alert": "DEPLETION_WARNING", "confidence": "medium"}
            ],
            "baseline": {"min_water_level": 9.0, "max_water_level": 15.0, "avg_water_level": 12.0},
            "current_status": {"latest_year": 2023, "latest_gavi": 37.5, "latest_alert": "NO_ALERT"},
            "explanation": "Declining trend over the observation window."
        });
        let series: StationTimeSeries =
            serde_json::from_value(raw).expect("timeseries payload should parse");
        assert_eq!(series.historical.len(), 2);
        assert!(series.historical[1].alert.is_none());
        assert_eq!(series.forecast[0].confidence, "medium");
        assert_eq!(series.current_status.latest_year, 2023);
    }

    #[test]
    fn test_alert_distribution_parses_keyed_map() {
        let raw = json!({
            "year": 2023,
            "total_stations": 5260,
            "alert_distribution": {
                "CRITICAL_GROUNDWATER": {"count": 412, "percentage": 7.8},
                "NO_ALERT": {"count": 3100, "percentage": 58.9}
            }
        });
        let dist: AlertDistribution =
            serde_json::from_value(raw).expect("distribution payload should parse");
        assert_eq!(dist.alert_distribution["CRITICAL_GROUNDWATER"].count, 412);
    }

    #[test]
    fn test_district_query_serializes_only_set_filters() {
        let query = DistrictQuery {
            state: Some("Bihar".to_string()),
            limit: Some(10),
            ..Default::default()
        };
        let pairs = query.to_pairs();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&("state".to_string(), "Bihar".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "10".to_string())));
    }

    #[test]
    fn test_timeseries_key_round_trips_station_id() {
        let key = station_timeseries_key("GW009876");
        assert_eq!(key.class, EndpointClass::StationTimeSeries);
        let params = decode_params(&key.params);
        assert_eq!(
            params,
            vec![("station_id".to_string(), "GW009876".to_string())]
        );
    }

    #[test]
    fn test_entities_from_districts_have_no_coordinates() {
        let rows = vec![DistrictStress {
            state: "Gujarat".to_string(),
            district: "Vadodara".to_string(),
            total_stations: 14,
            avg_gavi: 38.2,
            stressed_ratio: 0.64,
            critical_alerts: 3,
            depletion_alerts: 5,
            stress_category: None,
            future_risk_flag: None,
        }];
        let entities = entities_from_districts(&rows);
        assert_eq!(entities.len(), 1);
        assert!(entities[0].coordinate.is_none());
        assert_eq!(entities[0].station_count, 14);
        assert_eq!(entities[0].gavi, 38.2);
    }

    #[test]
    fn test_entities_from_station_list_map_no_alert_to_none() {
        let rows = vec![
            StationListItem {
                station_id: "GW000001".to_string(),
                state: "Kerala".to_string(),
                district: "Thiruvananthapuram".to_string(),
                latitude: 8.5241,
                longitude: 76.9366,
                latest_gavi: 82.0,
                latest_alert: "NO_ALERT".to_string(),
            },
            StationListItem {
                station_id: "GW000002".to_string(),
                state: "Punjab".to_string(),
                district: "Ludhiana".to_string(),
                latitude: 30.9010,
                longitude: 75.8573,
                latest_gavi: 21.0,
                latest_alert: "CRITICAL_GROUNDWATER".to_string(),
            },
        ];
        let entities = entities_from_station_list(&rows);
        assert!(entities[0].alert.is_none());
        assert_eq!(entities[1].alert.as_deref(), Some("CRITICAL_GROUNDWATER"));
        assert!(entities[1].coordinate.is_some());
    }

    // Live API tests. Run against a local aggregation service:
    //   cargo test --release -- --ignored

    #[test]
    #[ignore]
    fn test_live_national_summary() {
        let client = ApiClient::new(&ApiConfig::default()).expect("client should build");
        let summary = client.national_summary().expect("national summary fetch");
        assert!(summary.total_stations > 0);
        println!(
            "National: {} stations, avg GAVI {:.1}, {} critical alerts",
            summary.total_stations, summary.average_gavi, summary.active_critical_alerts
        );
    }

    #[test]
    #[ignore]
    fn test_live_district_summary() {
        let client = ApiClient::new(&ApiConfig::default()).expect("client should build");
        let rows = client
            .district_summary(&DistrictQuery::default())
            .expect("district summary fetch");
        assert!(!rows.is_empty());
        for row in rows.iter().take(5) {
            println!(
                "{} / {}: {} stations, avg GAVI {:.1}",
                row.state, row.district, row.total_stations, row.avg_gavi
            );
        }
    }
}
