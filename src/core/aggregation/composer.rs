//! Read views over patients and physicians
//!
//! Each function returns the pipeline for one retrieval endpoint. Joins are
//! left joins: a patient with no requisitions still appears, with empty
//! `requisitions` and `tests` arrays.

use super::pipeline::Pipeline;
use crate::domain::{Collection, PatientId, PhysicianId};

/// Patients with their requisitions, tests and address
pub fn patient_listing() -> Pipeline {
    with_patient_joins(Pipeline::on(Collection::Patients))
}

/// One patient with requisitions (each carrying its `physician`), tests and
/// address
pub fn patient_detail(id: PatientId) -> Pipeline {
    Pipeline::on(Collection::Patients)
        .match_id(id)
        .lookup(Collection::Requisitions, "_id", "patientId", "requisitions")
        .lookup(
            Collection::Physicians,
            "requisitions.physicianId",
            "_id",
            "physicianDetails",
        )
        .lookup(Collection::Tests, "requisitions._id", "requisitionId", "tests")
        .lookup(Collection::Addresses, "addressId", "_id", "address")
        .unwind_preserving("address")
        .embed_matching("requisitions", "physicianDetails", "physicianId", "physician")
        .exclude(&["physicianDetails"])
}

/// Physicians with their address and requisitions
pub fn physician_listing() -> Pipeline {
    Pipeline::on(Collection::Physicians)
        .lookup(Collection::Addresses, "addressId", "_id", "address")
        .unwind_preserving("address")
        .lookup(Collection::Requisitions, "_id", "physicianId", "requisitions")
}

/// One physician with address and requisitions (each carrying its `patient`)
pub fn physician_detail(id: PhysicianId) -> Pipeline {
    Pipeline::on(Collection::Physicians)
        .match_id(id)
        .lookup(Collection::Addresses, "addressId", "_id", "address")
        .unwind_preserving("address")
        .lookup(Collection::Requisitions, "_id", "physicianId", "requisitions")
        .lookup(
            Collection::Patients,
            "requisitions.patientId",
            "_id",
            "patientDetails",
        )
        .embed_matching("requisitions", "patientDetails", "patientId", "patient")
        .exclude(&["patientDetails"])
}

fn with_patient_joins(pipeline: Pipeline) -> Pipeline {
    pipeline
        .lookup(Collection::Requisitions, "_id", "patientId", "requisitions")
        .lookup(Collection::Tests, "requisitions._id", "requisitionId", "tests")
        .lookup(Collection::Addresses, "addressId", "_id", "address")
        .unwind_preserving("address")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregation::pipeline::Stage;

    #[test]
    fn test_listing_has_no_match_stage() {
        let pipeline = patient_listing();
        assert_eq!(pipeline.root(), Collection::Patients);
        assert!(!pipeline
            .stages()
            .iter()
            .any(|s| matches!(s, Stage::MatchId(_))));
    }

    #[test]
    fn test_patient_detail_starts_with_match_and_drops_intermediate() {
        let id = PatientId::generate();
        let pipeline = patient_detail(id);
        let stages = pipeline.stages();

        assert_eq!(stages[0], Stage::MatchId(*id.as_object_id()));
        assert_eq!(
            stages.last(),
            Some(&Stage::Exclude(vec!["physicianDetails".to_string()]))
        );
    }

    #[test]
    fn test_patient_detail_embeds_physician_after_unwind() {
        let stages = patient_detail(PatientId::generate()).stages().to_vec();
        let unwind = stages
            .iter()
            .position(|s| matches!(s, Stage::Unwind { .. }))
            .unwrap();
        let embed = stages
            .iter()
            .position(|s| matches!(s, Stage::EmbedMatching { .. }))
            .unwrap();
        assert!(unwind < embed);
    }

    #[test]
    fn test_physician_detail_embeds_patient() {
        let pipeline = physician_detail(PhysicianId::generate());
        assert_eq!(pipeline.root(), Collection::Physicians);
        assert!(pipeline.stages().iter().any(|s| matches!(
            s,
            Stage::EmbedMatching { as_field, key, .. } if as_field == "patient" && key == "patientId"
        )));
    }
}
