//! Deterministic practice-size and system estimation.
//!
//! Both estimators are pure functions over their inputs plus the injected
//! [`EstimatorTables`]; no shared state, no network access. They run once per
//! ingested record and are not re-run after enrichment.

pub mod tables;

use crate::domains::leads::models::{ClinicSize, EmrSystem};

pub use tables::SYSTEM_ORDER;

/// Immutable estimator configuration. `Default` carries the curated data;
/// tests can substitute their own tables.
#[derive(Debug, Clone, Copy)]
pub struct EstimatorTables {
    pub known_systems: &'static [(&'static str, EmrSystem, f64)],
    pub state_distributions: &'static [(&'static str, [f64; 5])],
    pub default_distribution: [f64; 5],
    pub size_keywords: &'static [(ClinicSize, f64, &'static [&'static str])],
    pub size_modifiers: &'static [(ClinicSize, [f64; 5])],
    pub credential_tokens: &'static [&'static str],
}

impl Default for EstimatorTables {
    fn default() -> Self {
        Self {
            known_systems: tables::KNOWN_HOSPITAL_SYSTEMS,
            state_distributions: tables::STATE_EMR_DISTRIBUTION,
            default_distribution: tables::DEFAULT_DISTRIBUTION,
            size_keywords: tables::SIZE_KEYWORDS,
            size_modifiers: tables::SIZE_EMR_MODIFIERS,
            credential_tokens: tables::CREDENTIAL_TOKENS,
        }
    }
}

/// Clinic size estimate with confidence score
#[derive(Debug, Clone, PartialEq)]
pub struct SizeEstimate {
    pub size: ClinicSize,
    pub confidence: f64,
    pub reasoning: String,
}

/// Practice-management system estimate with confidence score
#[derive(Debug, Clone, PartialEq)]
pub struct SystemEstimate {
    pub system: EmrSystem,
    pub confidence: f64,
    pub reasoning: String,
}

pub struct Estimator {
    tables: EstimatorTables,
}

impl Estimator {
    pub fn new(tables: EstimatorTables) -> Self {
        Self { tables }
    }

    /// Estimate clinic size from the organization name.
    ///
    /// Ordered keyword scan (Large, Medium, Small, Solo), then a short-name
    /// physician-credential check, then a low-confidence Small default.
    pub fn estimate_clinic_size(&self, organization_name: &str) -> SizeEstimate {
        let org_lower = organization_name.to_lowercase();

        for (size, confidence, keywords) in self.tables.size_keywords {
            for keyword in *keywords {
                if org_lower.contains(keyword) {
                    return SizeEstimate {
                        size: *size,
                        confidence: *confidence,
                        reasoning: format!(
                            "Organization name contains '{}' indicating {} practice",
                            keyword, size
                        ),
                    };
                }
            }
        }

        let word_count = organization_name.split_whitespace().count();
        let has_credential = self
            .tables
            .credential_tokens
            .iter()
            .any(|token| org_lower.contains(token));
        if word_count <= 4 && has_credential {
            return SizeEstimate {
                size: ClinicSize::Solo,
                confidence: 0.60,
                reasoning: "Organization name appears to be a single physician practice"
                    .to_string(),
            };
        }

        SizeEstimate {
            size: ClinicSize::Small,
            confidence: 0.45,
            reasoning: "Unable to determine size from organization name, defaulting to Small"
                .to_string(),
        }
    }

    /// Estimate the practice-management system from organization, state, and
    /// clinic size.
    ///
    /// A known-system substring match is authoritative and short-circuits the
    /// regional model. Otherwise the per-state distribution is weighted by
    /// size modifiers, renormalized, and the arg-max wins with confidence
    /// `min(0.85, 0.50 + margin over the runner-up)`.
    pub fn estimate_system(
        &self,
        organization_name: &str,
        state: &str,
        clinic_size: ClinicSize,
    ) -> SystemEstimate {
        let org_lower = organization_name.to_lowercase();

        for (name, system, confidence) in self.tables.known_systems {
            if org_lower.contains(name) {
                tracing::info!(
                    system_name = *name,
                    emr = %system,
                    confidence,
                    "Known system match"
                );
                return SystemEstimate {
                    system: *system,
                    confidence: *confidence,
                    reasoning: format!("Matched known health system: {}", title_case(name)),
                };
            }
        }

        let state_key = state.to_uppercase();
        let distribution = self
            .tables
            .state_distributions
            .iter()
            .find(|(s, _)| *s == state_key)
            .map(|(_, d)| *d)
            .unwrap_or(self.tables.default_distribution);
        let modifiers = self
            .modifiers_for(clinic_size)
            .or_else(|| self.modifiers_for(ClinicSize::Small))
            .unwrap_or([1.0; 5]);

        let mut weighted = [0.0_f64; 5];
        let mut total = 0.0_f64;
        for i in 0..5 {
            weighted[i] = distribution[i] * modifiers[i];
            total += weighted[i];
        }
        for w in &mut weighted {
            *w /= total;
        }

        // First max wins ties, preserving the fixed system order.
        let mut best = 0;
        for i in 1..5 {
            if weighted[i] > weighted[best] {
                best = i;
            }
        }

        let mut sorted = weighted;
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        let margin = sorted[0] - sorted[1];
        let confidence = ((0.50 + margin).min(0.85) * 100.0).round() / 100.0;

        SystemEstimate {
            system: SYSTEM_ORDER[best],
            confidence,
            reasoning: format!(
                "Based on {} state market data and {} practice patterns",
                state, clinic_size
            ),
        }
    }

    /// Run both estimators for one ingested record.
    pub fn estimate(&self, organization_name: &str, state: &str) -> (SizeEstimate, SystemEstimate) {
        let size = self.estimate_clinic_size(organization_name);
        let system = self.estimate_system(organization_name, state, size.size);
        tracing::debug!(
            organization = organization_name,
            clinic_size = %size.size,
            size_confidence = size.confidence,
            emr = %system.system,
            emr_confidence = system.confidence,
            "Estimated provider systems"
        );
        (size, system)
    }

    fn modifiers_for(&self, size: ClinicSize) -> Option<[f64; 5]> {
        self.tables
            .size_modifiers
            .iter()
            .find(|(s, _)| *s == size)
            .map(|(_, m)| *m)
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(EstimatorTables::default())
    }
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> Estimator {
        Estimator::default()
    }

    #[test]
    fn test_medium_keyword_match() {
        let est = estimator().estimate_clinic_size("Springfield Medical Group");
        assert_eq!(est.size, ClinicSize::Medium);
        assert_eq!(est.confidence, 0.75);
        assert!(est.reasoning.contains("'group'"));
    }

    #[test]
    fn test_group_keyword_is_medium() {
        let est = estimator().estimate_clinic_size("Springfield Orthopedic Group");
        assert_eq!(est.size, ClinicSize::Medium);
        assert_eq!(est.confidence, 0.75);
        assert!(est.reasoning.contains("'group'"));
    }

    #[test]
    fn test_hospital_is_large() {
        let est = estimator().estimate_clinic_size("St. Mary's Hospital");
        assert_eq!(est.size, ClinicSize::Large);
        assert_eq!(est.confidence, 0.75);
    }

    #[test]
    fn test_short_credentialed_name_is_solo() {
        let est = estimator().estimate_clinic_size("Dr. Jane Smith");
        assert_eq!(est.size, ClinicSize::Solo);
        assert_eq!(est.confidence, 0.60);
    }

    #[test]
    fn test_unknown_name_defaults_small() {
        let est = estimator().estimate_clinic_size("Zenith Werks");
        assert_eq!(est.size, ClinicSize::Small);
        assert_eq!(est.confidence, 0.45);
    }

    #[test]
    fn test_known_system_short_circuits() {
        let est = estimator().estimate_system("Mayo Clinic Rochester", "MN", ClinicSize::Large);
        assert_eq!(est.system, EmrSystem::Epic);
        assert_eq!(est.confidence, 0.95);
        assert_eq!(est.reasoning, "Matched known health system: Mayo Clinic");
    }

    #[test]
    fn test_regional_estimate_kansas_solo() {
        let est = estimator().estimate_system("Prairie Health", "KS", ClinicSize::Solo);
        // KS is Cerner-heavy; solo modifiers do not fully offset it
        assert_eq!(est.system, EmrSystem::Cerner);
        assert_eq!(est.confidence, 0.54);
        assert!(est.reasoning.contains("KS state market data"));
        assert!(est.reasoning.contains("Solo practice patterns"));
    }

    #[test]
    fn test_unlisted_state_uses_default_distribution() {
        let est = estimator().estimate_system("Summit Care", "AK", ClinicSize::Large);
        assert_eq!(est.system, EmrSystem::Epic);
        assert_eq!(est.confidence, 0.73);
    }

    #[test]
    fn test_confidence_capped() {
        let est = estimator().estimate_system("North Star Medicine", "MN", ClinicSize::Large);
        assert_eq!(est.system, EmrSystem::Epic);
        assert_eq!(est.confidence, 0.85);
    }

    #[test]
    fn test_injected_tables_override_curated_data() {
        const CUSTOM_SYSTEMS: &[(&str, EmrSystem, f64)] =
            &[("acme care", EmrSystem::Other, 0.70)];
        let tables = EstimatorTables {
            known_systems: CUSTOM_SYSTEMS,
            ..EstimatorTables::default()
        };
        let est = Estimator::new(tables).estimate_system("Acme Care West", "MN", ClinicSize::Small);
        assert_eq!(est.system, EmrSystem::Other);
        assert_eq!(est.confidence, 0.70);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("mayo clinic"), "Mayo Clinic");
        assert_eq!(title_case("cedars-sinai"), "Cedars-Sinai");
        assert_eq!(title_case("upmc"), "Upmc");
    }
}
