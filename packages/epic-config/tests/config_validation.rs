use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use epic_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &[&str], key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let mut table = root.as_table_mut().expect("Template config must be a table.");

	for name in section {
		table = table
			.get_mut(*name)
			.and_then(Value::as_table_mut)
			.expect("Template config must include the requested section.");
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("epic_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> epic_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = epic_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

#[test]
fn sample_config_loads() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Sample config must load.");

	assert_eq!(cfg.retrieval.default_strategy, "bfs");
	assert_eq!(cfg.ranking.default_strategy, "hill_climbing");
	assert_eq!(cfg.ranking.k, 10);
	assert_eq!(cfg.tuning.initial_temps.len(), 4);
}

#[test]
fn empty_file_falls_back_to_defaults() {
	let cfg = load_payload(String::new()).expect("Empty config must load with defaults.");

	assert_eq!(cfg.service.log_level, "info");
	assert_eq!(cfg.retrieval.default_strategy, "linear");
	assert!((cfg.retrieval.category_penalty - 100.0).abs() < 1e-12);
	assert!((cfg.retrieval.store_penalty - 75.0).abs() < 1e-12);
	assert!((cfg.scoring.weights.rating - 0.35).abs() < 1e-12);
	assert_eq!(cfg.ranking.hill_climbing.patience, 50);
	assert_eq!(cfg.ranking.simulated_annealing.max_iterations, 2_000);
}

#[test]
fn strategy_names_are_normalized() {
	let payload =
		sample_toml_with(&["ranking"], "default_strategy", Value::String(" Baseline ".to_string()));
	let cfg = load_payload(payload).expect("Mixed-case strategy must normalize.");

	assert_eq!(cfg.ranking.default_strategy, "baseline");
}

#[test]
fn unknown_retrieval_strategy_is_rejected() {
	let payload =
		sample_toml_with(&["retrieval"], "default_strategy", Value::String("astar".to_string()));
	let err = load_payload(payload).expect_err("Expected retrieval strategy validation error.");

	assert!(
		err.to_string().contains("retrieval.default_strategy must be one of"),
		"Unexpected error: {err}"
	);
}

#[test]
fn negative_weight_is_rejected() {
	let payload = sample_toml_with(&["scoring", "weights"], "price", Value::Float(-0.1));
	let err = load_payload(payload).expect_err("Expected weight validation error.");

	assert!(
		err.to_string().contains("scoring.weights.price must be zero or greater."),
		"Unexpected error: {err}"
	);
}

#[test]
fn all_zero_weights_are_rejected() {
	let mut cfg = Config::default();

	cfg.scoring.weights.price = 0.0;
	cfg.scoring.weights.rating = 0.0;
	cfg.scoring.weights.popularity = 0.0;
	cfg.scoring.weights.category_match = 0.0;
	cfg.scoring.weights.richness = 0.0;

	let err = epic_config::validate(&cfg).expect_err("Expected all-zero weights error.");

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error: {err:?}");
	assert_eq!(err.to_string(), "scoring.weights must not all be zero.");
}

#[test]
fn richness_blend_cannot_exceed_one() {
	let payload =
		sample_toml_with(&["scoring", "richness"], "feature_weight", Value::Float(0.5));
	let err = load_payload(payload).expect_err("Expected richness blend validation error.");

	assert!(err.to_string().contains("must sum to 1.0 or less."), "Unexpected error: {err}");
}

#[test]
fn ranking_k_must_be_positive() {
	let payload = sample_toml_with(&["ranking"], "k", Value::Integer(0));
	let err = load_payload(payload).expect_err("Expected ranking.k validation error.");

	assert!(
		err.to_string().contains("ranking.k must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn hill_climbing_patience_must_be_positive() {
	let payload = sample_toml_with(&["ranking", "hill_climbing"], "patience", Value::Integer(0));
	let err = load_payload(payload).expect_err("Expected patience validation error.");

	assert!(
		err.to_string().contains("ranking.hill_climbing.patience must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn annealing_min_temp_must_be_positive() {
	let payload =
		sample_toml_with(&["ranking", "simulated_annealing"], "min_temp", Value::Float(0.0));
	let err = load_payload(payload).expect_err("Expected min_temp validation error.");

	assert!(
		err.to_string().contains("min_temp must be a finite number greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn tuning_grid_values_are_validated() {
	let payload = sample_toml_with(
		&["tuning"],
		"cooling_rates",
		Value::Array(vec![Value::Float(0.99), Value::Float(1.5)]),
	);
	let err = load_payload(payload).expect_err("Expected tuning grid validation error.");

	assert!(
		err.to_string().contains("tuning cooling_rate must be in the range (0.0, 1.0)."),
		"Unexpected error: {err}"
	);
}

#[test]
fn empty_tuning_grid_is_rejected() {
	let payload = sample_toml_with(&["tuning"], "min_temps", Value::Array(Vec::new()));
	let err = load_payload(payload).expect_err("Expected empty grid validation error.");

	assert!(
		err.to_string().contains("tuning.min_temps must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("epic_config_test_missing_file.toml");
	let err = epic_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn malformed_toml_reports_parse_error() {
	let err = load_payload("[ranking\nk = 1".to_string()).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
}
