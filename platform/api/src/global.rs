use crate::config::ApiConfig;
use crate::credentials::CredentialVerifier;
use crate::places::PlacesClient;
use crate::vision::VisionClient;

/// Outbound collaborators the handlers talk to. They are constructed once at
/// startup and can be swapped for fakes.
pub trait ApiState {
	fn vision(&self) -> &dyn VisionClient;
	fn credentials(&self) -> &dyn CredentialVerifier;
	fn places(&self) -> &dyn PlacesClient;
}

pub trait ApiGlobal:
	common::global::GlobalCtx
	+ common::global::GlobalConfigProvider<ApiConfig>
	+ common::global::GlobalDb
	+ common::global::GlobalConfig
	+ ApiState
	+ Send
	+ Sync
	+ 'static
{
}

impl<T> ApiGlobal for T where
	T: common::global::GlobalCtx
		+ common::global::GlobalConfigProvider<ApiConfig>
		+ common::global::GlobalDb
		+ common::global::GlobalConfig
		+ ApiState
		+ Send
		+ Sync
		+ 'static
{
}
