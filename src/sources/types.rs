use crate::error::SourceError;
use crate::models::Property;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Row limit used when the caller does not pick one
pub const DEFAULT_FETCH_LIMIT: usize = 100;

/// One batch of records returned by a source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchPage {
    /// Rows returned, capped at the requested limit
    pub records: Vec<Property>,
    /// Total matching rows at the source; may exceed `records.len()`
    pub count: usize,
}

impl FetchPage {
    pub fn new(records: Vec<Property>, count: usize) -> Self {
        Self { records, count }
    }
}

/// Check that every id in a batch is unique.
pub fn ensure_unique_ids(records: &[Property]) -> Result<(), SourceError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id.as_str()) {
            return Err(SourceError::InvalidRecord {
                id: record.id.clone(),
                reason: "duplicate id".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let records = vec![
            Property::new("a", "A", 1.0, "Oslo", "flat"),
            Property::new("b", "B", 1.0, "Oslo", "flat"),
            Property::new("a", "A again", 1.0, "Oslo", "flat"),
        ];

        let err = ensure_unique_ids(&records).unwrap_err();
        assert_eq!(err.to_string(), "invalid listing a: duplicate id");
        assert!(ensure_unique_ids(&records[..2]).is_ok());
    }
}
