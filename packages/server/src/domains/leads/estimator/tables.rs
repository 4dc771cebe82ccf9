//! Curated market data backing the estimator.
//!
//! Known-system entries come from publicly available hospital press releases;
//! the per-state distributions are industry market-share estimates. All tables
//! are plain data injected at construction so tests can substitute their own.

use crate::domains::leads::models::{ClinicSize, EmrSystem};

/// Column order for every 5-wide probability/modifier row.
pub const SYSTEM_ORDER: [EmrSystem; 5] = [
    EmrSystem::Epic,
    EmrSystem::Cerner,
    EmrSystem::Athena,
    EmrSystem::EClinicalWorks,
    EmrSystem::Other,
];

/// Major health systems with known practice-management platforms.
/// Matched as case-insensitive substrings of the organization name.
pub const KNOWN_HOSPITAL_SYSTEMS: &[(&str, EmrSystem, f64)] = &[
    // Epic shops
    ("mayo clinic", EmrSystem::Epic, 0.95),
    ("cleveland clinic", EmrSystem::Epic, 0.95),
    ("johns hopkins", EmrSystem::Epic, 0.95),
    ("kaiser permanente", EmrSystem::Epic, 0.95),
    ("intermountain", EmrSystem::Epic, 0.95),
    ("providence", EmrSystem::Epic, 0.90),
    ("advocate", EmrSystem::Epic, 0.90),
    ("aurora health", EmrSystem::Epic, 0.90),
    ("cedars-sinai", EmrSystem::Epic, 0.90),
    ("mount sinai", EmrSystem::Epic, 0.90),
    ("ucsf", EmrSystem::Epic, 0.90),
    ("ucla health", EmrSystem::Epic, 0.90),
    ("stanford health", EmrSystem::Epic, 0.90),
    ("duke health", EmrSystem::Epic, 0.90),
    ("university of michigan", EmrSystem::Epic, 0.90),
    ("upmc", EmrSystem::Epic, 0.90),
    ("partners healthcare", EmrSystem::Epic, 0.90),
    ("mass general", EmrSystem::Epic, 0.90),
    ("brigham", EmrSystem::Epic, 0.90),
    ("northwestern medicine", EmrSystem::Epic, 0.90),
    ("rush", EmrSystem::Epic, 0.85),
    ("atrium health", EmrSystem::Epic, 0.85),
    ("geisinger", EmrSystem::Epic, 0.90),
    ("scripps", EmrSystem::Epic, 0.85),
    ("sharp healthcare", EmrSystem::Epic, 0.85),
    // Cerner (Oracle Health) shops
    ("hca healthcare", EmrSystem::Cerner, 0.90),
    ("community health systems", EmrSystem::Cerner, 0.85),
    ("us department of veterans affairs", EmrSystem::Cerner, 0.95),
    ("va health", EmrSystem::Cerner, 0.95),
    ("department of defense", EmrSystem::Cerner, 0.90),
    ("tricare", EmrSystem::Cerner, 0.85),
    ("adventist health", EmrSystem::Cerner, 0.85),
    ("bon secours", EmrSystem::Cerner, 0.85),
    ("christus health", EmrSystem::Cerner, 0.85),
    ("lifepoint", EmrSystem::Cerner, 0.80),
    // Athena (smaller practice networks)
    ("one medical", EmrSystem::Athena, 0.85),
    ("citymd", EmrSystem::Athena, 0.80),
];

/// Per-state market share over [Epic, Cerner, Athena, eClinicalWorks, Other].
pub const STATE_EMR_DISTRIBUTION: &[(&str, [f64; 5])] = &[
    // Northeast
    ("NY", [0.55, 0.20, 0.15, 0.07, 0.03]),
    ("MA", [0.65, 0.15, 0.12, 0.05, 0.03]),
    ("PA", [0.50, 0.25, 0.12, 0.08, 0.05]),
    ("NJ", [0.50, 0.22, 0.15, 0.08, 0.05]),
    ("CT", [0.55, 0.18, 0.15, 0.07, 0.05]),
    ("MD", [0.52, 0.20, 0.15, 0.08, 0.05]),
    // Midwest
    ("IL", [0.45, 0.30, 0.12, 0.08, 0.05]),
    ("OH", [0.40, 0.35, 0.12, 0.08, 0.05]),
    ("MI", [0.45, 0.28, 0.14, 0.08, 0.05]),
    ("IN", [0.38, 0.32, 0.15, 0.10, 0.05]),
    ("WI", [0.55, 0.22, 0.12, 0.06, 0.05]),
    ("MN", [0.60, 0.18, 0.12, 0.05, 0.05]),
    ("MO", [0.35, 0.40, 0.12, 0.08, 0.05]),
    ("KS", [0.30, 0.45, 0.12, 0.08, 0.05]),
    // South
    ("TX", [0.35, 0.28, 0.20, 0.12, 0.05]),
    ("FL", [0.38, 0.25, 0.22, 0.10, 0.05]),
    ("GA", [0.40, 0.25, 0.20, 0.10, 0.05]),
    ("NC", [0.45, 0.22, 0.18, 0.10, 0.05]),
    ("TN", [0.38, 0.28, 0.18, 0.10, 0.06]),
    ("VA", [0.42, 0.28, 0.16, 0.09, 0.05]),
    ("SC", [0.38, 0.25, 0.20, 0.12, 0.05]),
    ("AL", [0.35, 0.28, 0.20, 0.12, 0.05]),
    ("LA", [0.32, 0.30, 0.20, 0.12, 0.06]),
    // West
    ("CA", [0.55, 0.18, 0.15, 0.08, 0.04]),
    ("WA", [0.55, 0.20, 0.14, 0.06, 0.05]),
    ("OR", [0.52, 0.22, 0.14, 0.07, 0.05]),
    ("CO", [0.48, 0.25, 0.15, 0.07, 0.05]),
    ("AZ", [0.42, 0.25, 0.18, 0.10, 0.05]),
    ("NV", [0.40, 0.25, 0.20, 0.10, 0.05]),
    ("UT", [0.55, 0.20, 0.14, 0.06, 0.05]),
];

/// Fallback distribution for states without dedicated data.
pub const DEFAULT_DISTRIBUTION: [f64; 5] = [0.40, 0.25, 0.18, 0.12, 0.05];

/// Size keywords scanned in order; the first match wins, with a fixed
/// confidence per set.
pub const SIZE_KEYWORDS: &[(ClinicSize, f64, &[&str])] = &[
    (
        ClinicSize::Large,
        0.75,
        &[
            "hospital",
            "medical center",
            "health system",
            "health network",
            "healthcare system",
            "university",
            "regional",
            "memorial",
            "multispecialty",
        ],
    ),
    (
        ClinicSize::Medium,
        0.75,
        &[
            "group",
            "associates",
            "partners",
            "physicians",
            "specialists",
            "clinic group",
            "medical associates",
            "health partners",
        ],
    ),
    (
        ClinicSize::Small,
        0.65,
        &[
            "clinic",
            "practice",
            "family",
            "office",
            "care center",
            "wellness",
            "health center",
        ],
    ),
    (ClinicSize::Solo, 0.65, &["md", "do", "physician", "doctor"]),
];

/// Size impact on system selection, over [Epic, Cerner, Athena,
/// eClinicalWorks, Other]. Larger practices favor enterprise platforms.
pub const SIZE_EMR_MODIFIERS: &[(ClinicSize, [f64; 5])] = &[
    (ClinicSize::Large, [1.4, 1.3, 0.5, 0.3, 0.5]),
    (ClinicSize::Medium, [1.1, 1.1, 1.2, 0.9, 0.8]),
    (ClinicSize::Small, [0.6, 0.7, 1.5, 1.4, 1.2]),
    (ClinicSize::Solo, [0.3, 0.4, 1.3, 1.8, 1.5]),
];

/// Physician-credential tokens for the short-name Solo heuristic.
pub const CREDENTIAL_TOKENS: &[&str] = &["dr.", "md", "do", "m.d.", "d.o."];
