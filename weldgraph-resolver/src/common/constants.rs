//! Reserved identifiers used by the integrated-unit enhancer.

/// Placeholder GIN recorded when an integrated power source needs no
/// separate wire feeder. Reserved: never present in the product catalog.
pub const NO_FEEDER_REQUIRED_GIN: &str = "NO-FEEDER-REQUIRED";

/// Placeholder GIN recorded when an integrated power source needs no
/// separate cooling unit. Reserved: never present in the product catalog.
pub const NO_COOLER_REQUIRED_GIN: &str = "NO-COOLER-REQUIRED";

/// Line-number tags marking synthetic records appended by the enhancer.
pub const AUTO_FEEDER_LINE_NO: &str = "AUTO-F";
pub const AUTO_COOLER_LINE_NO: &str = "AUTO-C";

/// Power sources known to ship as self-contained all-in-one units.
pub const DEFAULT_INTEGRATED_UNITS: &[&str] = &["0445100880", "0445250880", "0700300989"];

/// Customer bucket for orders whose lines carry no customer id.
pub const UNKNOWN_CUSTOMER_ID: &str = "UNKNOWN";
