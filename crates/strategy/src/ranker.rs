use common::models::Candidate;

/// Picks the candidate with the highest up-probability.
///
/// The sort is stable, so equal probabilities keep their original order and
/// the first one encountered wins. `None` means there is nothing to trade.
pub fn select_top(mut candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.sort_by(|a, b| b.probability().total_cmp(&a.probability()));
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(symbol: &str, probability: f64) -> Candidate {
        Candidate::new(symbol, probability, 10.0)
    }

    #[test]
    fn highest_probability_wins() {
        let top = select_top(vec![
            candidate("A", 0.9),
            candidate("B", 0.4),
            candidate("C", 0.95),
        ])
        .unwrap();
        assert_eq!(top.symbol(), "C");
        assert_eq!(top.probability(), 0.95);
    }

    #[test]
    fn ties_go_to_first_encountered() {
        let top = select_top(vec![
            candidate("A", 0.7),
            candidate("B", 0.8),
            candidate("C", 0.8),
        ])
        .unwrap();
        assert_eq!(top.symbol(), "B");
    }

    #[test]
    fn empty_set_is_no_candidate() {
        assert!(select_top(Vec::new()).is_none());
    }
}
