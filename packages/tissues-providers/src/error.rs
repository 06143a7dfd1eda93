pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("Backend unavailable ({status}): {message}")]
	Unavailable { status: u16, message: String },
	#[error("Backend rejected the request ({status}): {message}")]
	Rejected { status: u16, message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
}
impl Error {
	/// Whether the backend lacked the compute to serve the request, as opposed to the
	/// request itself being wrong.
	pub fn is_unavailable(&self) -> bool {
		match self {
			Self::Unavailable { .. } => true,
			Self::Reqwest(err) => err.is_timeout() || err.is_connect(),
			_ => false,
		}
	}
}
