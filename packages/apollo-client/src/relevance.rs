//! Healthcare relevance classification.
//!
//! Keyword tables are plain data handed to the client at construction, so
//! tests can substitute their own.

use crate::types::RawPerson;

/// Medical role titles that score full title weight.
const MEDICAL_TITLES: &[&str] = &[
    "physician",
    "doctor",
    "surgeon",
    "md",
    "medical director",
    "cardiologist",
    "neurologist",
    "clinical",
    "assistant professor",
    "fellow",
    "palliative care",
    "hospitalist",
    "resident",
    "nurse",
    "rn",
    "pa",
    "nurse practitioner",
    "therapist",
    "internist",
    "pediatrician",
    "psychiatrist",
    "dentist",
    "optometrist",
    "pharmacist",
    "radiologist",
    "pathologist",
];

/// Shorter title list used to sanity-check an already-matched person.
const MEDICAL_TITLE_HINTS: &[&str] = &[
    "physician",
    "doctor",
    "surgeon",
    "md",
    "medical director",
    "cardiologist",
    "neurologist",
    "clinical",
    "nurse",
    "rn",
    "pa",
];

/// Organization name fragments that score org weight.
const HEALTHCARE_ORGS: &[&str] = &[
    "hospital",
    "medical",
    "health",
    "clinic",
    "healthcare",
    "physician",
    "university",
    "care center",
    "practice",
    "hospice",
    "palliative",
];

/// Organization name fragments that classify an org as medical.
const MEDICAL_ORGS: &[&str] = &[
    "hospital",
    "medical center",
    "clinic",
    "healthcare",
    "health",
    "physician",
    "doctors",
    "md",
    "medicine",
    "university hospital",
    "medical group",
    "primary care",
    "cardiology",
    "oncology",
    "surgery",
    "surgical",
    "orthopedic",
    "emergency",
    "ent",
    "radiology",
    "pathology",
    "psychiatry",
    "neurology",
    "pediatric",
    "cancer center",
    "research center",
    "medical school",
    "nursing",
    "dental",
    "optometry",
    "physical therapy",
    "therapy",
    "rehab",
    "urgent care",
    "family medicine",
    "internal medicine",
    "surgery center",
    "veterans affairs",
    "va hospital",
    "va medical",
    "kaiser",
    "aetna",
    "cigna",
    "united health",
    "anthem",
    "humana",
    "blue cross",
    "mount sinai",
    "mjhs",
    "nyc health",
    "health system",
    "medical practice",
];

/// Clear non-medical fragments. Never override a medical match.
const NON_MEDICAL_ORGS: &[&str] = &[
    "school",
    "university",
    "college",
    "education",
    "manufacturing",
    "distribution",
    "logistics",
    "retail",
    "finance",
    "insurance",
    "real estate",
    "construction",
    "technology",
    "software",
    "consulting",
    "marketing",
    "publishing",
    "media",
    "entertainment",
    "restaurant",
    "bank",
    "credit union",
    "automotive",
];

/// Placeholder organization names that carry no matching signal.
const GENERIC_ORGS: &[&str] = &[
    "private practice",
    "individual practice",
    "no nppes org data",
    "not available",
    "n/a",
    "",
];

/// Keyword tables driving relevance classification and scoring.
#[derive(Debug, Clone)]
pub struct RelevanceTables {
    pub medical_titles: &'static [&'static str],
    pub medical_title_hints: &'static [&'static str],
    pub healthcare_orgs: &'static [&'static str],
    pub medical_orgs: &'static [&'static str],
    pub non_medical_orgs: &'static [&'static str],
    pub generic_orgs: &'static [&'static str],
}

impl Default for RelevanceTables {
    fn default() -> Self {
        Self {
            medical_titles: MEDICAL_TITLES,
            medical_title_hints: MEDICAL_TITLE_HINTS,
            healthcare_orgs: HEALTHCARE_ORGS,
            medical_orgs: MEDICAL_ORGS,
            non_medical_orgs: NON_MEDICAL_ORGS,
            generic_orgs: GENERIC_ORGS,
        }
    }
}

impl RelevanceTables {
    /// True when an organization name is a placeholder with no matching value.
    pub fn is_generic_organization(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        self.generic_orgs.iter().any(|g| *g == name)
    }

    /// True when a title contains one of the short medical role hints.
    pub fn has_medical_title(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.medical_title_hints.iter().any(|k| title.contains(k))
    }

    /// Classify an organization as medical from its name and the matched
    /// email's domain. An exclusion keyword only disqualifies when no
    /// medical keyword matched the name.
    pub fn is_medical_organization(&self, org_name: &str, email_domain: &str) -> bool {
        let org = org_name.trim().to_lowercase();
        let domain = email_domain.trim().to_lowercase();
        if org.is_empty() && domain.is_empty() {
            return false;
        }

        let medical_org = self.medical_orgs.iter().any(|k| org.contains(k));
        let medical_domain = domain.ends_with(".org")
            || domain.ends_with(".healthcare")
            || domain.ends_with(".medical")
            || domain.contains("health")
            || domain.contains("hospital")
            || domain.contains("clinic")
            || domain.contains("medical");

        if !medical_org && self.non_medical_orgs.iter().any(|k| org.contains(k)) {
            return false;
        }

        medical_org || medical_domain
    }

    /// Healthcare relevance score for a search candidate, in `[0.0, 1.0]`.
    ///
    /// Weighted sum: 0.6 for a medical role title (with lower partial
    /// credits for care- and professor-of-medicine-style titles), 0.3 for a
    /// healthcare organization, 0.2 when the source flags a known email.
    pub fn healthcare_score(&self, person: &RawPerson) -> f64 {
        let mut score: f64 = 0.0;
        let title = person.title.to_lowercase();
        let org_name = person
            .organization
            .as_ref()
            .map(|o| o.name.to_lowercase())
            .unwrap_or_default();

        if self.medical_titles.iter().any(|k| title.contains(k)) {
            score += 0.6;
        } else if title.contains("care")
            && (title.contains("health") || title.contains("medical") || title.contains("hospice"))
        {
            score += 0.5;
        } else if title.contains("professor")
            && (title.contains("medicine")
                || title.contains("health")
                || title.contains("clinical"))
        {
            score += 0.3;
        }

        if self.healthcare_orgs.iter().any(|k| org_name.contains(k)) {
            score += 0.3;
        }

        if person.has_email {
            score += 0.2;
        }

        score.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawOrganization;

    fn person(title: &str, org: &str, has_email: bool) -> RawPerson {
        RawPerson {
            title: title.to_string(),
            organization: Some(RawOrganization {
                name: org.to_string(),
                ..Default::default()
            }),
            has_email,
            ..Default::default()
        }
    }

    #[test]
    fn test_score_medical_title_org_and_email() {
        let tables = RelevanceTables::default();
        let p = person("Cardiologist", "Novi Heart Clinic", true);
        assert!((tables.healthcare_score(&p) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_partial_credit_titles() {
        let tables = RelevanceTables::default();
        let care = person("Director of Health Care Services", "Acme Corp", false);
        assert!((tables.healthcare_score(&care) - 0.5).abs() < f64::EPSILON);

        let professor = person("Professor of Medicine", "Acme Corp", false);
        assert!((tables.healthcare_score(&professor) - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_non_medical_person() {
        let tables = RelevanceTables::default();
        let p = person("Software Engineer", "Acme Corp", false);
        assert!(tables.healthcare_score(&p) < 0.6);
    }

    #[test]
    fn test_generic_organization_names() {
        let tables = RelevanceTables::default();
        assert!(tables.is_generic_organization("Private Practice"));
        assert!(tables.is_generic_organization(" N/A "));
        assert!(tables.is_generic_organization(""));
        assert!(!tables.is_generic_organization("Novi Medical Group"));
    }

    #[test]
    fn test_is_medical_organization() {
        let tables = RelevanceTables::default();
        assert!(tables.is_medical_organization("Springfield Hospital", ""));
        assert!(tables.is_medical_organization("", "mjhs.org"));
        assert!(tables.is_medical_organization("", "novihealth.com"));
        assert!(!tables.is_medical_organization("Acme Software", "acme.com"));
        assert!(!tables.is_medical_organization("", ""));
    }

    #[test]
    fn test_exclusion_never_overrides_medical_match() {
        let tables = RelevanceTables::default();
        // "university" is an exclusion keyword, "university hospital" is medical.
        assert!(tables.is_medical_organization("State University Hospital", "example.com"));
        assert!(!tables.is_medical_organization("State University", "example.com"));
    }
}
