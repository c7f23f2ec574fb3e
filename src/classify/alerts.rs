/// Alert code display descriptors.
///
/// The aggregation service tags each station with a discrete alert code.
/// This module maps the known codes to display metadata (label, color,
/// icon, severity rank, description). Any code outside the known set -
/// including an absent or empty code - resolves to a single default
/// descriptor rather than an error, so the lookup is total.
///
/// The lookup is pure, synchronous, and stable: the same input always
/// returns the same descriptor.

// ---------------------------------------------------------------------------
// Severity ranks
// ---------------------------------------------------------------------------

/// Operational severity of an alert, ascending. `Unknown` sorts above
/// `Critical` only because it must sit somewhere in the derive order; it
/// carries no operational meaning beyond "unrecognized".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlertSeverity {
    None,
    Low,
    Medium,
    High,
    Critical,
    Unknown,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::None => "none",
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
            AlertSeverity::Unknown => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// Display metadata for one alert code.
pub struct AlertDescriptor {
    pub code: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
    pub severity: AlertSeverity,
    pub description: &'static str,
}

/// All known alert codes. Process-wide read-only configuration; there is no
/// reload or mutation path. `NORMAL` and `NO_ALERT` are distinct codes with
/// identical display treatment.
pub static ALERT_DESCRIPTORS: &[AlertDescriptor] = &[
    AlertDescriptor {
        code: "CRITICAL_GROUNDWATER",
        label: "Critical Groundwater",
        color: "#d32f2f",
        icon: "🔴",
        severity: AlertSeverity::Critical,
        description: "GAVI below 25 - immediate intervention required",
    },
    AlertDescriptor {
        code: "DEPLETION_WARNING",
        label: "Depletion Warning",
        color: "#f57c00",
        icon: "🟠",
        severity: AlertSeverity::High,
        description: "GAVI below 50 and declining trend",
    },
    AlertDescriptor {
        code: "SUDDEN_DROP",
        label: "Sudden Drop",
        color: "#fbc02d",
        icon: "🟡",
        severity: AlertSeverity::Medium,
        description: "Water level dropped by ≥2m year-over-year",
    },
    AlertDescriptor {
        code: "RECOVERY_SIGNAL",
        label: "Recovery Signal",
        color: "#388e3c",
        icon: "🟢",
        severity: AlertSeverity::Low,
        description: "Water level improved by ≥1m",
    },
    AlertDescriptor {
        code: "NORMAL",
        label: "Normal",
        color: "#9e9e9e",
        icon: "⚪",
        severity: AlertSeverity::None,
        description: "Station within normal parameters",
    },
    AlertDescriptor {
        code: "NO_ALERT",
        label: "No Alert",
        color: "#9e9e9e",
        icon: "⚪",
        severity: AlertSeverity::None,
        description: "Station within normal parameters",
    },
];

/// Fallback for codes outside the known set. Never `None`, never a panic.
pub static DEFAULT_ALERT: AlertDescriptor = AlertDescriptor {
    code: "",
    label: "Unknown Alert",
    color: "#757575",
    icon: "⚫",
    severity: AlertSeverity::Unknown,
    description: "Unknown alert type",
};

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Maps an alert code to its display descriptor. Total: an unrecognized,
/// empty, or absent code returns `DEFAULT_ALERT`.
pub fn classify_alert(code: Option<&str>) -> &'static AlertDescriptor {
    let Some(code) = code else {
        return &DEFAULT_ALERT;
    };
    ALERT_DESCRIPTORS
        .iter()
        .find(|d| d.code == code)
        .unwrap_or(&DEFAULT_ALERT)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
