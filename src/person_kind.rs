use crate::errors::PipelineError;

/// PSC kind codes published by Companies House, with the person type shown
/// to clients. Beneficial owners use the same types as PSCs.
pub const PERSON_KIND_TYPES: &[(&str, &str)] = &[
    ("individual-person-with-significant-control", "individual"),
    ("individual-beneficial-owner", "individual"),
    (
        "corporate-entity-person-with-significant-control",
        "corporate entity",
    ),
    ("corporate-entity-beneficial-owner", "corporate entity"),
    ("legal-person-person-with-significant-control", "legal person"),
    ("legal-person-beneficial-owner", "legal person"),
    ("super-secure-person-with-significant-control", "super secure"),
    ("super-secure-beneficial-owner", "super secure"),
];

/// Resolves a raw PSC kind code to its person type.
pub fn person_type(company_number: &str, kind: &str) -> Result<&'static str, PipelineError> {
    let kind = kind.trim();
    PERSON_KIND_TYPES
        .iter()
        .find(|(code, _)| *code == kind)
        .map(|(_, person_type)| *person_type)
        .ok_or_else(|| PipelineError::UnknownPersonKind {
            company_number: company_number.to_string(),
            kind: kind.to_string(),
        })
}
