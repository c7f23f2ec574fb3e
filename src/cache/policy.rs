/// Staleness and retention policy per endpoint class.
///
/// Timing windows reflect data volatility: alert-driven endpoints go stale
/// in minutes so the dashboard tracks a developing situation, while report
/// metadata and per-station history change rarely and can live longer. The
/// table below is the single declared policy - call sites never carry their
/// own timing constants.

use chrono::Duration;

// ---------------------------------------------------------------------------
// Endpoint classes
// ---------------------------------------------------------------------------

/// Logical endpoint classes of the aggregation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointClass {
    NationalSummary,
    DistrictSummary,
    StateSummary,
    StationAlerts,
    StationTimeSeries,
    StationList,
    CriticalAlerts,
    AlertDistribution,
    FutureRisk,
    ReportMetadata,
}

impl EndpointClass {
    /// Every class, for exhaustiveness checks and policy sweeps.
    pub const ALL: &'static [EndpointClass] = &[
        EndpointClass::NationalSummary,
        EndpointClass::DistrictSummary,
        EndpointClass::StateSummary,
        EndpointClass::StationAlerts,
        EndpointClass::StationTimeSeries,
        EndpointClass::StationList,
        EndpointClass::CriticalAlerts,
        EndpointClass::AlertDistribution,
        EndpointClass::FutureRisk,
        EndpointClass::ReportMetadata,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointClass::NationalSummary => "national-summary",
            EndpointClass::DistrictSummary => "districts",
            EndpointClass::StateSummary => "states",
            EndpointClass::StationAlerts => "station-alerts",
            EndpointClass::StationTimeSeries => "station-timeseries",
            EndpointClass::StationList => "station-list",
            EndpointClass::CriticalAlerts => "critical-alerts",
            EndpointClass::AlertDistribution => "alerts-by-type",
            EndpointClass::FutureRisk => "future-risk",
            EndpointClass::ReportMetadata => "report-metadata",
        }
    }
}

impl std::fmt::Display for EndpointClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Policy table
// ---------------------------------------------------------------------------

/// Timing policy for one endpoint class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Data older than this is served stale and refreshed in the
    /// background.
    pub stale_after: Duration,
    /// An entry unobserved for this long is evicted outright.
    pub expire_after: Duration,
}

/// The declared policy for an endpoint class.
pub fn policy_for(class: EndpointClass) -> CachePolicy {
    let minutes = |stale: i64, expire: i64| CachePolicy {
        stale_after: Duration::minutes(stale),
        expire_after: Duration::minutes(expire),
    };
    match class {
        // Fast-changing alert endpoints: short windows.
        EndpointClass::StationAlerts | EndpointClass::CriticalAlerts => minutes(3, 10),
        // Aggregate summaries: moderate windows.
        EndpointClass::NationalSummary
        | EndpointClass::DistrictSummary
        | EndpointClass::StateSummary
        | EndpointClass::StationList
        | EndpointClass::AlertDistribution
        | EndpointClass::FutureRisk => minutes(5, 10),
        // Slow-changing history and metadata: long windows.
        EndpointClass::StationTimeSeries | EndpointClass::ReportMetadata => minutes(10, 30),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
