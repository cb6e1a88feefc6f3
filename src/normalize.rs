//! Record normalization into the canonical output shape.
//!
//! `Class Name` values in SDD exports pack several fields into one
//! dash-separated string, e.g. `Scratch-A1-x-Long Scratch`: part 0 is the
//! class, the first character of part 1 is the grade and part 3 is the
//! defect name. Rows whose class part is empty are dropped.

use crate::models::{CanonicalRecord, RawRecord, Section};

/// Fields derived from a raw `Class Name` value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassNameParts {
    pub class_name: String,
    pub grade_defect: String,
    pub defect_name: String,
}

impl ClassNameParts {
    /// Split a raw value; null reads as empty
    pub fn parse(raw: Option<&str>) -> Self {
        let raw = raw.unwrap_or("").trim();
        let parts: Vec<&str> = raw.split('-').collect();

        let part = |idx: usize| parts.get(idx).map(|p| p.trim()).unwrap_or("");

        Self {
            class_name: part(0).to_string(),
            grade_defect: part(1).chars().next().map(String::from).unwrap_or_default(),
            defect_name: part(3).to_string(),
        }
    }
}

/// Map one raw row to a canonical record, or `None` when its class is empty
pub fn normalize_record(
    record: &RawRecord,
    coil_no: &str,
    section: Section,
) -> Option<CanonicalRecord> {
    let parts = ClassNameParts::parse(record.class_name.as_deref());
    if parts.class_name.is_empty() {
        return None;
    }

    Some(CanonicalRecord {
        coil_no: coil_no.to_string(),
        class_name: parts.class_name,
        defect_name: parts.defect_name,
        grade_defect: parts.grade_defect,
        section,
        distance_from_he_cgl_m: record.top_m.clone(),
        distance_left_mm: record.distance_left_mm.clone(),
        distance_right_mm: record.distance_right_mm.clone(),
        distance_center_mm: record.distance_center_mm.clone(),
        height: record.height_mm.clone(),
        width: record.width_mm.clone(),
        segment_width_ratio: record.segment_width_ratio.clone(),
        orientation: record.orientation.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(class_name: Option<&str>) -> RawRecord {
        RawRecord {
            defect_no: Some("7".to_string()),
            class_name: class_name.map(str::to_string),
            top_m: Some("120.5".to_string()),
            distance_left_mm: Some("310".to_string()),
            distance_right_mm: Some("890".to_string()),
            distance_center_mm: Some("-290".to_string()),
            height_mm: Some("4.2".to_string()),
            width_mm: None,
            segment_width_ratio: Some("0.35".to_string()),
            orientation: Some("45".to_string()),
        }
    }

    #[test]
    fn test_full_class_name() {
        let parts = ClassNameParts::parse(Some("A-B1-X-DefectXYZ"));
        assert_eq!(parts.class_name, "A");
        assert_eq!(parts.grade_defect, "B");
        assert_eq!(parts.defect_name, "DefectXYZ");
    }

    #[test]
    fn test_class_name_without_dashes() {
        let parts = ClassNameParts::parse(Some("A"));
        assert_eq!(parts.class_name, "A");
        assert_eq!(parts.grade_defect, "");
        assert_eq!(parts.defect_name, "");
    }

    #[test]
    fn test_parts_are_trimmed() {
        let parts = ClassNameParts::parse(Some("  Scratch - 2x - mid -  Long Scratch "));
        assert_eq!(parts.class_name, "Scratch");
        assert_eq!(parts.grade_defect, "2");
        assert_eq!(parts.defect_name, "Long Scratch");
    }

    #[test]
    fn test_blank_grade_part_gives_empty_grade() {
        let parts = ClassNameParts::parse(Some("Dent-   -x-Deep"));
        assert_eq!(parts.grade_defect, "");
        assert_eq!(parts.defect_name, "Deep");
    }

    #[test]
    fn test_ineligible_class_names_are_dropped() {
        for class_name in [None, Some(""), Some("   "), Some("-"), Some("-B1-X-Y")] {
            assert_eq!(
                normalize_record(&raw(class_name), "KE5538", Section::Top),
                None,
                "{:?} should be dropped",
                class_name
            );
        }
    }

    #[test]
    fn test_fields_pass_through_unchanged() {
        let record = normalize_record(&raw(Some("Hole-C3-z-Pin Hole")), "KE5538", Section::Bottom)
            .unwrap();

        assert_eq!(record.coil_no, "KE5538");
        assert_eq!(record.class_name, "Hole");
        assert_eq!(record.grade_defect, "C");
        assert_eq!(record.defect_name, "Pin Hole");
        assert_eq!(record.section, Section::Bottom);
        assert_eq!(record.distance_from_he_cgl_m.as_deref(), Some("120.5"));
        assert_eq!(record.distance_left_mm.as_deref(), Some("310"));
        assert_eq!(record.distance_right_mm.as_deref(), Some("890"));
        assert_eq!(record.distance_center_mm.as_deref(), Some("-290"));
        assert_eq!(record.height.as_deref(), Some("4.2"));
        assert_eq!(record.width, None);
        assert_eq!(record.segment_width_ratio.as_deref(), Some("0.35"));
        assert_eq!(record.orientation.as_deref(), Some("45"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let source = raw(Some("Scale-A-y-Rolled In"));
        let first = normalize_record(&source, "AB0001", Section::Top);
        let second = normalize_record(&source, "AB0001", Section::Top);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_cells_follow_output_order() {
        let record = normalize_record(&raw(Some("Hole-C3")), "", Section::Top).unwrap();
        let cells = record.cells();

        assert_eq!(cells[0], None);
        assert_eq!(cells[1], Some("Hole"));
        assert_eq!(cells[2], None);
        assert_eq!(cells[3], Some("C"));
        assert_eq!(cells[4], Some("Top"));
        assert_eq!(cells[5], Some("120.5"));
        assert_eq!(cells[10], None);
        assert_eq!(cells[12], Some("45"));
    }
}
