use std::str::FromStr;

use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

type ReloadHandle = Box<dyn Fn(&str) -> Result<(), LoggingError> + Sync + Send>;

static RELOAD_HANDLE: OnceCell<ReloadHandle> = OnceCell::new();

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
	#[default]
	Default,
	Json,
	Pretty,
	Compact,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
	#[error("invalid logging filter: {0}")]
	InvalidFilter(#[from] tracing_subscriber::filter::ParseError),
	#[error("failed to init logger: {0}")]
	Init(#[from] tracing_subscriber::util::TryInitError),
	#[error("failed to reload logger: {0}")]
	Reload(#[from] tracing_subscriber::reload::Error),
}

/// Installs the global subscriber on the first call; later calls only swap the
/// env filter, the mode of the first call sticks.
macro_rules! install {
	($builder:expr) => {{
		let builder = $builder.with_line_number(true).with_file(true).with_filter_reloading();
		let handle = builder.reload_handle();

		builder.finish().try_init()?;

		Ok::<_, LoggingError>(Box::new(move |level: &str| {
			handle.reload(EnvFilter::from_str(level)?)?;
			Ok(())
		}) as ReloadHandle)
	}};
}

pub fn init(level: &str, mode: Mode) -> Result<(), LoggingError> {
	let reload = RELOAD_HANDLE.get_or_try_init(|| {
		let env_filter = EnvFilter::from_str(level)?;
		let fmt = tracing_subscriber::fmt().with_env_filter(env_filter);

		match mode {
			Mode::Default => install!(fmt),
			Mode::Json => install!(fmt.json()),
			Mode::Pretty => install!(fmt.pretty()),
			Mode::Compact => install!(fmt.compact()),
		}
	})?;

	reload(level)
}
