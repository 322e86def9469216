use hcm_model::{MappingResult, Row};

/// Project source rows onto target field names using `result`'s mappings.
///
/// Row order and count are preserved. Unmapped targets are absent from the
/// output rows; a mapped source column missing from a row yields `None`.
pub fn transform_rows(rows: &[Row], result: &MappingResult) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            result
                .mappings
                .iter()
                .map(|m| (m.target.as_str(), row.get(&m.source)))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use hcm_model::{Mapping, TargetSlot};

    use super::*;

    #[test]
    fn renames_columns_and_keeps_row_count() {
        let mut result = MappingResult::new(
            "candidate",
            vec!["PERSON ID".to_string(), "NOTES".to_string()],
            vec![TargetSlot {
                name: "CANDIDATE_ID".to_string(),
                required: true,
            }],
            0.7,
        );
        result.mappings.push(Mapping::manual("PERSON ID", "CANDIDATE_ID"));
        result.refresh_unmapped();

        let rows: Vec<Row> = vec![
            [("PERSON ID", Some("C-1")), ("NOTES", Some("x"))].into_iter().collect(),
            [("NOTES", Some("y"))].into_iter().collect(),
        ];
        let out = transform_rows(&rows, &result);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].get("CANDIDATE_ID"), Some("C-1"));
        assert_eq!(out[0].len(), 1);
        assert_eq!(out[1].get("CANDIDATE_ID"), None);
        assert!(out[1].cells.contains_key("CANDIDATE_ID"));
    }
}
