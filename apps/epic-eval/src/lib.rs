use std::{
	collections::{BTreeMap, BTreeSet},
	fs,
	path::{Path, PathBuf},
};

use clap::Parser;
use color_eyre::eyre;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use epic_config::Config;
use epic_domain::{Catalog, Filter, Item};
use epic_service::{
	EpicService, RankRequest, RankingStrategy, SearchStrategy, TuningGrid, TuningReport,
	ranking::tune_simulated_annealing,
};

#[derive(Debug, Parser)]
#[command(
	version = epic_cli::VERSION,
	rename_all = "kebab",
	styles = epic_cli::styles(),
)]
pub struct Args {
	/// Built-in defaults apply when omitted.
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: Option<PathBuf>,
	#[arg(long, short = 'd', value_name = "FILE")]
	pub dataset: PathBuf,
	#[arg(long, value_name = "N", default_value_t = 1)]
	pub runs_per_query: u32,
	/// Overrides `ranking.k` for queries that do not set their own.
	#[arg(long, value_name = "N")]
	pub k: Option<u32>,
	/// Grid-search annealing schedules for every query.
	#[arg(long)]
	pub tune: bool,
}

#[derive(Debug, Deserialize)]
struct EvalDataset {
	name: Option<String>,
	items: Vec<Item>,
	queries: Vec<EvalQuery>,
}

#[derive(Debug, Deserialize)]
struct EvalQuery {
	id: Option<String>,
	#[serde(default)]
	filter: Map<String, Value>,
	/// Defaults to the filter's category.
	target_category: Option<String>,
	k: Option<u32>,
	max_results: Option<usize>,
	seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct EvalOutput {
	dataset: EvalDatasetInfo,
	settings: EvalSettings,
	summary: EvalSummary,
	queries: Vec<QueryReport>,
}

#[derive(Debug, Serialize)]
struct EvalDatasetInfo {
	name: String,
	item_count: usize,
	query_count: usize,
}

#[derive(Debug, Serialize)]
struct EvalSettings {
	config_path: Option<String>,
	policy_id: String,
	runs_per_query: u32,
	generated_at: String,
}

#[derive(Debug, Serialize)]
struct EvalSummary {
	/// True when every strategy returned the linear match set for every query.
	retrieval_sets_agree: bool,
	retrieval: Vec<RetrievalSummary>,
	ranking: Vec<RankingSummary>,
}

#[derive(Debug, Serialize)]
struct RetrievalSummary {
	strategy: SearchStrategy,
	mean_scanned: f64,
	latency_ms_p50: f64,
	latency_ms_p95: f64,
}

#[derive(Debug, Serialize)]
struct RankingSummary {
	strategy: RankingStrategy,
	mean_ndcg: f64,
	mean_iterations: f64,
	latency_ms_p50: f64,
	latency_ms_p95: f64,
}

#[derive(Debug, Serialize)]
struct QueryReport {
	id: String,
	filter: Map<String, Value>,
	candidate_count: usize,
	sets_agree: bool,
	retrieval: Vec<RetrievalRun>,
	ranking: Vec<RankingRun>,
	#[serde(skip_serializing_if = "Option::is_none")]
	tuning: Option<TuningReport>,
}

#[derive(Debug, Serialize)]
struct RetrievalRun {
	strategy: SearchStrategy,
	count: usize,
	scanned: usize,
	latency_ms: f64,
}

#[derive(Debug, Serialize)]
struct RankingRun {
	strategy: RankingStrategy,
	ndcg: f64,
	iterations: u32,
	latency_ms: f64,
	ranked_ids: Vec<String>,
}

/// Latency samples per strategy across all queries and runs.
#[derive(Default)]
struct Samples {
	retrieval: BTreeMap<&'static str, Vec<f64>>,
	ranking: BTreeMap<&'static str, Vec<f64>>,
}

pub fn run(args: Args) -> color_eyre::Result<()> {
	let config = match &args.config {
		Some(path) => epic_config::load(path)?,
		None => Config::default(),
	};

	epic_cli::init_tracing(&config.service.log_level);

	let dataset = load_dataset(&args.dataset)?;
	let output = evaluate(config, dataset, &args)?;
	let json = serde_json::to_string_pretty(&output)?;

	println!("{json}");

	Ok(())
}

fn load_dataset(path: &Path) -> color_eyre::Result<EvalDataset> {
	let raw = fs::read_to_string(path)?;
	let dataset: EvalDataset = serde_json::from_str(&raw)?;

	if dataset.items.is_empty() {
		return Err(eyre::eyre!("Dataset must include at least one item."));
	}
	if dataset.queries.is_empty() {
		return Err(eyre::eyre!("Dataset must include at least one query."));
	}

	Ok(dataset)
}

fn evaluate(config: Config, dataset: EvalDataset, args: &Args) -> color_eyre::Result<EvalOutput> {
	let default_k = args.k.unwrap_or(config.ranking.k);
	let grid = TuningGrid::from_config(&config);
	let item_count = dataset.items.len();
	let service = EpicService::new(config, Catalog::build(dataset.items))?;
	let runs = args.runs_per_query.max(1);
	let mut samples = Samples::default();
	let mut queries = Vec::with_capacity(dataset.queries.len());

	if service.catalog().len() < item_count {
		tracing::warn!(
			items = item_count,
			unique = service.catalog().len(),
			"Dataset contains duplicate item IDs. Later entries win."
		);
	}

	for (idx, query) in dataset.queries.into_iter().enumerate() {
		let id = query.id.clone().unwrap_or_else(|| format!("q{}", idx + 1));
		let report = eval_query(&service, id, query, default_k, runs, &mut samples)?;
		let report = if args.tune {
			let tuning = tune_query(&service, &report, &grid)?;

			QueryReport { tuning, ..report }
		} else {
			report
		};

		queries.push(report);
	}

	let summary = summarize(&queries, &samples);
	let generated_at = OffsetDateTime::now_utc().format(&Rfc3339)?;

	Ok(EvalOutput {
		dataset: EvalDatasetInfo {
			name: dataset.name.unwrap_or_else(|| "unnamed".to_string()),
			item_count,
			query_count: queries.len(),
		},
		settings: EvalSettings {
			config_path: args.config.as_ref().map(|path| path.display().to_string()),
			policy_id: service.policy_id().to_string(),
			runs_per_query: runs,
			generated_at,
		},
		summary,
		queries,
	})
}

fn eval_query(
	service: &EpicService,
	id: String,
	query: EvalQuery,
	default_k: u32,
	runs: u32,
	samples: &mut Samples,
) -> color_eyre::Result<QueryReport> {
	let filter = Filter::from_map(&query.filter)
		.map_err(|err| eyre::eyre!("Query {id:?} has an invalid filter: {err}"))?;
	let mut retrieval = Vec::with_capacity(SearchStrategy::ALL.len());
	let mut expected: Option<BTreeSet<String>> = None;
	let mut sets_agree = true;

	for strategy in SearchStrategy::ALL {
		let mut latency_total_ms = 0.0_f64;
		let mut last = None;

		for _ in 0..runs {
			let result = service.retrieval().search(&filter, strategy, None);
			let latency_ms = result.elapsed.as_secs_f64() * 1_000.0;

			latency_total_ms += latency_ms;
			samples.retrieval.entry(strategy.as_str()).or_default().push(latency_ms);
			last = Some(result);
		}

		let result = last.ok_or_else(|| eyre::eyre!("No search results were collected."))?;
		let ids: BTreeSet<String> = result.ids.iter().cloned().collect();

		if expected.as_ref().is_some_and(|expected| *expected != ids) {
			tracing::warn!(query = %id, strategy = %strategy, "Strategy match set diverges.");

			sets_agree = false;
		}
		if expected.is_none() {
			expected = Some(ids);
		}

		retrieval.push(RetrievalRun {
			strategy,
			count: result.count(),
			scanned: result.scanned,
			latency_ms: latency_total_ms / runs as f64,
		});
	}

	let candidates = service.retrieval().search(&filter, SearchStrategy::Linear, None);
	let target_category = query.target_category.or_else(|| filter.category().map(str::to_string));
	let k = query.k.unwrap_or(default_k).max(1) as usize;
	let mut ranking = Vec::with_capacity(RankingStrategy::ALL.len());

	for strategy in RankingStrategy::ALL {
		let request = RankRequest {
			strategy,
			target_category: target_category.clone(),
			max_results: query.max_results,
			k,
			seed: query.seed,
		};
		let mut latency_total_ms = 0.0_f64;
		let mut last = None;

		for _ in 0..runs {
			let ranked = service.ranker().rank(&candidates, &request)?;
			let latency_ms = ranked.elapsed.as_secs_f64() * 1_000.0;

			latency_total_ms += latency_ms;
			samples.ranking.entry(strategy.as_str()).or_default().push(latency_ms);
			last = Some(ranked);
		}

		let ranked = last.ok_or_else(|| eyre::eyre!("No ranked results were collected."))?;

		ranking.push(RankingRun {
			strategy,
			ndcg: ranked.objective_value,
			iterations: ranked.iterations,
			latency_ms: latency_total_ms / runs as f64,
			ranked_ids: ranked.ids().map(str::to_string).collect(),
		});
	}

	Ok(QueryReport {
		id,
		filter: filter.to_map(),
		candidate_count: candidates.count(),
		sets_agree,
		retrieval,
		ranking,
		tuning: None,
	})
}

fn tune_query(
	service: &EpicService,
	report: &QueryReport,
	grid: &TuningGrid,
) -> color_eyre::Result<Option<TuningReport>> {
	let filter = Filter::from_map(&report.filter)?;
	let candidates = service.retrieval().search(&filter, SearchStrategy::Linear, None);
	let scored = service.ranker().score_candidates(&candidates.ids, filter.category());

	if scored.is_empty() {
		tracing::warn!(query = %report.id, "No candidates to tune.");

		return Ok(None);
	}

	Ok(Some(tune_simulated_annealing(&scored, grid)?))
}

fn summarize(queries: &[QueryReport], samples: &Samples) -> EvalSummary {
	let count = queries.len().max(1) as f64;
	let retrieval = SearchStrategy::ALL
		.into_iter()
		.map(|strategy| {
			let scanned = queries
				.iter()
				.flat_map(|query| &query.retrieval)
				.filter(|run| run.strategy == strategy)
				.map(|run| run.scanned as f64)
				.sum::<f64>();
			let (p50, p95) = latency_percentiles(samples.retrieval.get(strategy.as_str()));

			RetrievalSummary {
				strategy,
				mean_scanned: scanned / count,
				latency_ms_p50: p50,
				latency_ms_p95: p95,
			}
		})
		.collect();
	let ranking = RankingStrategy::ALL
		.into_iter()
		.map(|strategy| {
			let runs: Vec<&RankingRun> = queries
				.iter()
				.flat_map(|query| &query.ranking)
				.filter(|run| run.strategy == strategy)
				.collect();
			let (p50, p95) = latency_percentiles(samples.ranking.get(strategy.as_str()));

			RankingSummary {
				strategy,
				mean_ndcg: runs.iter().map(|run| run.ndcg).sum::<f64>() / count,
				mean_iterations: runs.iter().map(|run| run.iterations as f64).sum::<f64>() / count,
				latency_ms_p50: p50,
				latency_ms_p95: p95,
			}
		})
		.collect();

	EvalSummary {
		retrieval_sets_agree: queries.iter().all(|query| query.sets_agree),
		retrieval,
		ranking,
	}
}

fn latency_percentiles(samples: Option<&Vec<f64>>) -> (f64, f64) {
	let mut sorted = samples.cloned().unwrap_or_default();

	sorted.sort_by(|a, b| a.total_cmp(b));

	(percentile(&sorted, 0.50), percentile(&sorted, 0.95))
}

fn percentile(values: &[f64], percentile: f64) -> f64 {
	if values.is_empty() {
		return 0.0;
	}

	let clamped = percentile.clamp(0.0, 1.0);
	let pos = clamped * (values.len() as f64 - 1.0);
	let lower = pos.floor() as usize;
	let upper = pos.ceil() as usize;

	if lower == upper {
		values[lower]
	} else {
		let weight = pos - lower as f64;
		values[lower] * (1.0 - weight) + values[upper] * weight
	}
}
