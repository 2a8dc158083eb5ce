use std::fmt::{Display, Formatter};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which strategy family a name was resolved against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyDomain {
	Retrieval,
	Ranking,
}
impl StrategyDomain {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Retrieval => "retrieval",
			Self::Ranking => "ranking",
		}
	}

	pub fn choices(self) -> &'static str {
		match self {
			Self::Retrieval => "linear, bfs, dfs, priority",
			Self::Ranking => "baseline, hill_climbing, simulated_annealing",
		}
	}
}
impl Display for StrategyDomain {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
	Validation,
	NotFound,
	UnknownStrategy,
	Ranking,
	Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	Validation { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Unknown {domain} strategy {name:?}. Choose from: {}.", .domain.choices())]
	UnknownStrategy { domain: StrategyDomain, name: String },
	#[error("Ranking error: {message}")]
	Ranking { message: String },
	#[error("Internal error: {message}")]
	Internal { message: String },
}
impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Validation { .. } => ErrorKind::Validation,
			Self::NotFound { .. } => ErrorKind::NotFound,
			Self::UnknownStrategy { .. } => ErrorKind::UnknownStrategy,
			Self::Ranking { .. } => ErrorKind::Ranking,
			Self::Internal { .. } => ErrorKind::Internal,
		}
	}

	/// Unknown ranking strategies belong to the ranking failure family.
	pub fn is_ranking_error(&self) -> bool {
		match self {
			Self::Ranking { .. } => true,
			Self::UnknownStrategy { domain, .. } => *domain == StrategyDomain::Ranking,
			_ => false,
		}
	}
}
impl From<epic_domain::Error> for Error {
	fn from(err: epic_domain::Error) -> Self {
		match err {
			epic_domain::Error::Validation { message } => Self::Validation { message },
			epic_domain::Error::NotFound { id } =>
				Self::NotFound { message: format!("item {id:?} does not exist.") },
		}
	}
}

impl From<epic_config::Error> for Error {
	fn from(err: epic_config::Error) -> Self {
		Self::Validation { message: err.to_string() }
	}
}
