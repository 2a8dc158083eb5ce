use std::time::Duration;

use serde::{Deserialize, Deserializer, Serializer};

/// Serializes as fractional milliseconds.
pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_f64(value.as_nanos() as f64 / 1_000_000.0)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = f64::deserialize(deserializer)?;

	Duration::try_from_secs_f64(raw / 1_000.0).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use serde::{Deserialize, Serialize};

	#[derive(Debug, PartialEq, Serialize, Deserialize)]
	struct Timed {
		#[serde(with = "crate::duration_ms")]
		elapsed: Duration,
	}

	#[test]
	fn serializes_fractional_milliseconds() {
		let value = serde_json::to_value(Timed { elapsed: Duration::from_micros(1_500) })
			.expect("Duration must serialize.");

		assert_eq!(value, serde_json::json!({ "elapsed": 1.5 }));
	}

	#[test]
	fn negative_milliseconds_are_rejected() {
		let result: Result<Timed, _> =
			serde_json::from_value(serde_json::json!({ "elapsed": -1.0 }));

		assert!(result.is_err(), "Negative durations must be rejected.");
	}
}
