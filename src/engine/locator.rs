//! Field discovery: scan probe → classified candidates → alias filtering.
//!
//! The scan enumerates control-like elements in document order and
//! classifies each exactly once. Candidate matching is a pure function of
//! the squashed attribute blob against the field's squashed alias set, so a
//! field can resolve to several candidates on one page (visible control plus
//! hidden mirror input); the pipeline attempts all of them.

use crate::driver::{DriverError, PageDriver};
use crate::engine::classify::{Candidate, ControlKind, ControlMeta};
use crate::engine::fields::SemanticField;
use crate::engine::normalize::squash;
use crate::driver::script;

/// Scan the page (or a stamped subtree when `scope_ref` is set) and return
/// classified candidates in document order. Disabled controls are dropped
/// at the source.
pub async fn scan(
    driver: &dyn PageDriver,
    scope_ref: Option<u32>,
) -> Result<Vec<Candidate>, DriverError> {
    let raw = driver.eval(&script::scan_controls(scope_ref)).await?;
    let metas: Vec<ControlMeta> = serde_json::from_value(raw)
        .map_err(|e| DriverError::ProbeShape(format!("scan probe: {e}")))?;
    Ok(metas
        .into_iter()
        .filter(|m| !m.disabled && m.ref_id > 0)
        .map(Candidate::new)
        .collect())
}

/// Whether a candidate's attribute blob contains any alias of the field.
///
/// Both sides are squashed, so `first_name`, `firstName`, and `First Name`
/// in the markup all hit the same alias token.
pub fn matches_field(candidate: &Candidate, field: SemanticField) -> bool {
    let blob = squash(&candidate.meta.blob);
    if blob.is_empty() {
        return false;
    }
    field.squashed_aliases().iter().any(|a| blob.contains(a))
}

/// All candidates matching a field, document order preserved.
pub fn find_candidates<'a>(
    candidates: &'a [Candidate],
    field: SemanticField,
) -> Vec<&'a Candidate> {
    candidates
        .iter()
        .filter(|c| matches_field(c, field))
        .collect()
}

/// The radio subset of a field's candidates, treated as one group.
pub fn radio_group<'a>(
    candidates: &'a [Candidate],
    field: SemanticField,
) -> Vec<&'a Candidate> {
    find_candidates(candidates, field)
        .into_iter()
        .filter(|c| c.kind == ControlKind::Radio)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(blob: &str) -> Candidate {
        Candidate::new(ControlMeta {
            ref_id: 1,
            tag: "input".to_string(),
            input_type: "text".to_string(),
            blob: blob.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_alias_containment_is_separator_insensitive() {
        assert!(matches_field(&cand("first_name given"), SemanticField::FirstName));
        assert!(matches_field(&cand("applicant firstName"), SemanticField::FirstName));
        assert!(matches_field(&cand("First Name *"), SemanticField::FirstName));
        assert!(!matches_field(&cand("company name"), SemanticField::FirstName));
    }

    #[test]
    fn test_multiple_candidates_preserved_in_order() {
        let cands = vec![cand("email address"), cand("unrelated"), cand("work email")];
        let found = find_candidates(&cands, SemanticField::Email);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].meta.blob, "email address");
    }

    #[test]
    fn test_empty_blob_never_matches() {
        assert!(!matches_field(&cand(""), SemanticField::FullName));
    }

    #[test]
    fn test_radio_group_filters_kind() {
        let mut radio = ControlMeta {
            ref_id: 2,
            tag: "input".to_string(),
            input_type: "radio".to_string(),
            blob: "gender".to_string(),
            ..Default::default()
        };
        radio.value = "female".to_string();
        let cands = vec![cand("gender identity"), Candidate::new(radio)];
        let group = radio_group(&cands, SemanticField::Gender);
        assert_eq!(group.len(), 1);
        assert_eq!(group[0].meta.value, "female");
    }
}
