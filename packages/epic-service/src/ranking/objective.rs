use crate::ranking::ScoredItem;

/// `Σ scores[i] / log2(i + 2)` over the first `k` positions.
pub fn dcg_at_k(scores: &[f64], k: usize) -> f64 {
	discounted(scores.iter().copied(), k)
}

/// DCG@k over the ideal (descending) DCG@k.
///
/// Returns 1.0 for an empty list, `k == 0`, or a non-positive ideal DCG: with no preference
/// signal every order is optimal.
pub fn ndcg_at_k(scores: &[f64], k: usize) -> f64 {
	if scores.is_empty() || k == 0 {
		return 1.0;
	}

	let mut ideal = scores.to_vec();

	ideal.sort_by(|a, b| b.total_cmp(a));

	let ideal_dcg = dcg_at_k(&ideal, k);

	if ideal_dcg <= 0.0 {
		return 1.0;
	}

	dcg_at_k(scores, k) / ideal_dcg
}

fn discounted<I>(scores: I, k: usize) -> f64
where
	I: Iterator<Item = f64>,
{
	scores.take(k).enumerate().map(|(idx, score)| score / ((idx + 2) as f64).log2()).sum()
}

/// NDCG@k with the ideal DCG fixed up front; every permutation of the list shares it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NdcgObjective {
	k: usize,
	ideal_dcg: f64,
}
impl NdcgObjective {
	pub(crate) fn new(items: &[ScoredItem], k: usize) -> Self {
		let mut ideal: Vec<f64> = items.iter().map(|item| item.score).collect();

		ideal.sort_by(|a, b| b.total_cmp(a));

		Self { k, ideal_dcg: dcg_at_k(&ideal, k) }
	}

	pub(crate) fn evaluate(&self, items: &[ScoredItem]) -> f64 {
		if items.is_empty() || self.k == 0 || self.ideal_dcg <= 0.0 {
			return 1.0;
		}

		discounted(items.iter().map(|item| item.score), self.k) / self.ideal_dcg
	}
}
