/// HTTP ingest from the groundwater aggregation API.
///
/// The `api` submodule owns the wire types and the blocking client. All
/// fetches funnel through `ApiClient::fetch_for_key`, which pairs with the
/// query cache: the cache schedules fetches by key, the client executes
/// them and hands back raw JSON values for the cache to hold.

pub mod api;

pub use api::{
    entities_from_alerts, entities_from_districts, entities_from_station_list, ApiClient,
    DistrictQuery, StationQuery,
};
