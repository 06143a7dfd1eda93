use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Magenta.on_default() | Effects::BOLD)
		.usage(AnsiColor::Magenta.on_default() | Effects::BOLD)
		.literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

/// Falls back to `info` when the directive does not parse.
pub fn log_filter(directive: &str) -> EnvFilter {
	EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Later calls leave the first one in place.
pub fn init_tracing(directive: &str) {
	let _ = tracing_subscriber::fmt().with_env_filter(log_filter(directive)).try_init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invalid_directive_falls_back_to_info() {
		assert_eq!(log_filter("tissues_api=loud").to_string(), "info");
		assert_eq!(log_filter("debug").to_string(), "debug");
	}
}
