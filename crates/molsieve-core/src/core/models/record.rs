use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("A record needs at least a structure and an identifier, got {0} field(s)")]
    TooFewFields(usize),
}

/// One candidate molecule as read from a batch file.
///
/// Field layout:
///
/// | index          | meaning                         |
/// |----------------|---------------------------------|
/// | `0`            | structure notation              |
/// | `1`            | identifier                      |
/// | `2 .. n-2`     | free-form metadata (n ≥ 5)      |
/// | `n-2`          | fitness / score (n ≥ 4)         |
/// | `n-1`          | diversity score (n ≥ 3)         |
///
/// Records are never modified once created; classification hands them back
/// unchanged in one of the outcome buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    pub fn new(fields: Vec<String>) -> Result<Self, RecordError> {
        if fields.len() < 2 {
            return Err(RecordError::TooFewFields(fields.len()));
        }
        Ok(Self { fields })
    }

    /// Convenience constructor for the bare `structure, identifier` form.
    pub fn bare(structure: &str, identifier: &str) -> Self {
        Self {
            fields: vec![structure.to_string(), identifier.to_string()],
        }
    }

    /// Returns a new record with `field` appended.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn structure(&self) -> &str {
        &self.fields[0]
    }

    pub fn identifier(&self) -> &str {
        &self.fields[1]
    }

    pub fn metadata(&self) -> &[String] {
        let n = self.fields.len();
        if n >= 4 { &self.fields[2..n - 2] } else { &[] }
    }

    pub fn fitness(&self) -> Option<&str> {
        let n = self.fields.len();
        (n >= 4).then(|| self.fields[n - 2].as_str())
    }

    pub fn diversity(&self) -> Option<&str> {
        let n = self.fields.len();
        (n >= 3).then(|| self.fields[n - 1].as_str())
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> Record {
        Record::new(fields.iter().map(|f| f.to_string()).collect()).unwrap()
    }

    #[test]
    fn bare_record_has_no_optional_fields() {
        let r = Record::bare("CCO", "mol_001");
        assert_eq!(r.structure(), "CCO");
        assert_eq!(r.identifier(), "mol_001");
        assert!(r.metadata().is_empty());
        assert_eq!(r.fitness(), None);
        assert_eq!(r.diversity(), None);
    }

    #[test]
    fn three_fields_carry_only_diversity() {
        let r = record(&["CCO", "id", "0.4"]);
        assert_eq!(r.diversity(), Some("0.4"));
        assert_eq!(r.fitness(), None);
        assert!(r.metadata().is_empty());
    }

    #[test]
    fn four_fields_carry_fitness_and_diversity() {
        let r = record(&["CCO", "id", "-7.1", "0.4"]);
        assert_eq!(r.fitness(), Some("-7.1"));
        assert_eq!(r.diversity(), Some("0.4"));
        assert!(r.metadata().is_empty());
    }

    #[test]
    fn metadata_sits_between_identifier_and_scores() {
        let r = record(&["CCO", "id", "parentA", "parentB", "-7.1", "0.4"]);
        assert_eq!(r.metadata(), &["parentA".to_string(), "parentB".to_string()]);
        assert_eq!(r.fitness(), Some("-7.1"));
    }

    #[test]
    fn fewer_than_two_fields_are_rejected() {
        assert_eq!(
            Record::new(vec!["CCO".to_string()]),
            Err(RecordError::TooFewFields(1))
        );
    }
}
