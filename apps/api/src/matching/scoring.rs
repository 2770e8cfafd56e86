#[derive(Debug, Clone)]
pub struct ScoringWeights {
    pub keyword: f64,
    pub skills: f64,
    pub requirements: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword: 0.4,
            skills: 0.3,
            requirements: 0.3,
        }
    }
}

/// Matched/total counts for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coverage {
    pub matched: usize,
    pub total: usize,
}

impl Coverage {
    pub fn new(matched: usize, total: usize) -> Self {
        Self { matched, total }
    }

    /// Percentage rounded to an integer. `None` when there was nothing to match.
    pub fn percent(&self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let ratio = self.matched.min(self.total) as f64 / self.total as f64;
        Some((ratio * 100.0).round() as u8)
    }
}

/// Combined score: 0.4*keyword + 0.3*skills + 0.3*requirements.
///
/// Categories without a sub-score are left out and the remaining weights are
/// renormalized. Returns `None` when no category has a sub-score.
pub fn compute_combined_score(
    keyword: Option<u8>,
    skills: Option<u8>,
    requirements: Option<u8>,
    weights: &ScoringWeights,
) -> Option<u8> {
    let parts = [
        (keyword, weights.keyword),
        (skills, weights.skills),
        (requirements, weights.requirements),
    ];

    let (weighted, total_weight) = parts
        .iter()
        .filter_map(|(score, weight)| score.map(|s| (f64::from(s) * weight, *weight)))
        .fold((0.0_f64, 0.0_f64), |(acc, w), (s, weight)| (acc + s, w + weight));

    if total_weight <= 0.0 {
        return None;
    }
    Some((weighted / total_weight).round().clamp(0.0, 100.0) as u8)
}
