//! tracing初期化

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "ecosort=info,tower_http=info";
const VERBOSE_FILTER: &str = "ecosort=debug,tower_http=debug";

/// `RUST_LOG`が設定されていればそれを優先
pub fn init(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // テスト等で二重初期化されても無視
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}
