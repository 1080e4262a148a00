//! Query domain classification.

/// Thematic domain of a search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Medical,
    General,
}

/// Vocabulary that marks a query as biomedical.
const MEDICAL_TERMS: &[&str] = &[
    "cancer",
    "medical",
    "medicine",
    "health",
    "disease",
    "clinical",
    "tumor",
    "patient",
    "diagnosis",
    "treatment",
    "therapy",
    "biomedical",
    "healthcare",
];

/// Classify a query as medical or general.
///
/// Case-insensitive substring match against a fixed vocabulary; no remote
/// call. arXiv has weak biomedical coverage, so the orchestrator uses this to
/// decide whether arXiv participates in the fan-out.
pub fn detect_domain(query: &str) -> Domain {
    let lower = query.to_lowercase();

    if MEDICAL_TERMS.iter().any(|term| lower.contains(term)) {
        Domain::Medical
    } else {
        Domain::General
    }
}
