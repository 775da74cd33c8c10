use crate::{Row, Table};

/// Free-text row filter. An empty term matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    term: String,
}

impl FilterState {
    /// The normalized (trimmed, lowercased) term.
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }

    pub fn set_term(&mut self, raw: &str) {
        self.term = raw.trim().to_lowercase();
    }

    pub fn matches(&self, row: &Row) -> bool {
        self.term.is_empty() || row.text().to_lowercase().contains(&self.term)
    }

    /// Toggles row visibility in place and returns the number of visible rows.
    pub(crate) fn apply(&self, table: &mut Table) -> usize {
        let mut visible = 0;
        for row in table.rows_mut() {
            let matched = self.matches(row);
            row.set_hidden(!matched);
            visible += usize::from(matched);
        }
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["kepoi_name", "prediction"]);
        table.push_row(["K00752.01", "Confirmed"]).unwrap();
        table.push_row(["K00753.01", "False Positive"]).unwrap();
        table.push_row(["K00754.01", "Candidate"]).unwrap();
        table
    }

    #[test]
    fn term_is_case_insensitive_and_trimmed() {
        let mut table = sample();
        let mut filter = FilterState::default();
        filter.set_term("  CONFIRMED ");
        assert_eq!(filter.term(), "confirmed");
        assert_eq!(filter.apply(&mut table), 1);
        assert!(!table.rows()[0].is_hidden());
        assert!(table.rows()[1].is_hidden());
    }

    #[test]
    fn incremental_terms_narrow_then_widen() {
        let mut table = sample();
        let mut filter = FilterState::default();
        for (term, expected) in [("k", 3), ("k0075", 3), ("k00753", 1), ("k0075", 3), ("", 3)] {
            filter.set_term(term);
            assert_eq!(filter.apply(&mut table), expected, "term {term:?}");
        }
    }
}
