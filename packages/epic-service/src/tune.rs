use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{EpicService, Result, SearchStrategy, TuningGrid, TuningReport, ranking};
use epic_domain::Filter;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TuneRequest {
	#[serde(default)]
	pub filter: Map<String, Value>,
}

impl EpicService {
	/// Grid-searches annealing schedules over the linear candidates for `filter`.
	pub fn tune(&self, req: TuneRequest) -> Result<TuningReport> {
		let filter = Filter::from_map(&req.filter)?;
		let candidates = self.retrieval.search(&filter, SearchStrategy::Linear, None);

		if candidates.count() < 5 {
			tracing::warn!(
				candidates = candidates.count(),
				"Few tuning candidates. Consider relaxing the filter."
			);
		}

		let scored = self.ranker.score_candidates(&candidates.ids, filter.category());

		ranking::tune_simulated_annealing(&scored, &TuningGrid::from_config(&self.cfg))
	}
}
