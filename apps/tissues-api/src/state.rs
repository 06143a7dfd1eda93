use std::sync::Arc;

use tissues_service::{Providers, TissuesService};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TissuesService>,
}
impl AppState {
	pub fn new(config: tissues_config::Config) -> color_eyre::Result<Self> {
		Self::with_providers(config, Providers::default())
	}

	pub fn with_providers(
		config: tissues_config::Config,
		providers: Providers,
	) -> color_eyre::Result<Self> {
		let service = TissuesService::with_providers(config, providers)?;

		Ok(Self { service: Arc::new(service) })
	}
}
