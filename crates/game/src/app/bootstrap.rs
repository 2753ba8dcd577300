use engine::{Game, LoopConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay::{self, MapDataError};

const SEED_ENV_VAR: &str = "PALLET_SEED";
const DEBUG_ENV_VAR: &str = "PALLET_DEBUG";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) game: Box<dyn Game>,
}

pub(crate) fn build_app() -> Result<AppWiring, MapDataError> {
    init_tracing();
    info!("=== Pallet Startup ===");

    let options = read_session_options(
        std::env::var(SEED_ENV_VAR).ok().as_deref(),
        std::env::var(DEBUG_ENV_VAR).ok().as_deref(),
    );

    let game = gameplay::build_game(options.seed, options.debug)?;
    let config = LoopConfig {
        window_title: "Pallet".to_string(),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        game: Box::new(game),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SessionOptions {
    seed: Option<u64>,
    debug: bool,
}

fn read_session_options(seed_raw: Option<&str>, debug_raw: Option<&str>) -> SessionOptions {
    let options = SessionOptions {
        seed: parse_seed(seed_raw),
        debug: parse_debug(debug_raw),
    };
    info!(seed = ?options.seed, debug = options.debug, "session_options");
    options
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Unparseable seeds fall back to an OS-seeded session.
fn parse_seed(raw: Option<&str>) -> Option<u64> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
    match raw.parse::<u64>() {
        Ok(seed) => Some(seed),
        Err(err) => {
            warn!(var = SEED_ENV_VAR, value = raw, error = %err, "invalid_seed_ignored");
            None
        }
    }
}

fn parse_debug(raw: Option<&str>) -> bool {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return false;
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => true,
        "0" | "false" => false,
        _ => {
            warn!(var = DEBUG_ENV_VAR, value = raw, "invalid_debug_flag_ignored");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_parses_trimmed_integers() {
        assert_eq!(parse_seed(Some(" 42 ")), Some(42));
        assert_eq!(parse_seed(Some("0")), Some(0));
    }

    #[test]
    fn missing_or_invalid_seed_is_none() {
        assert_eq!(parse_seed(None), None);
        assert_eq!(parse_seed(Some("")), None);
        assert_eq!(parse_seed(Some("-3")), None);
        assert_eq!(parse_seed(Some("abc")), None);
    }

    #[test]
    fn debug_flag_accepts_one_and_true() {
        assert!(parse_debug(Some("1")));
        assert!(parse_debug(Some("TRUE")));
        assert!(!parse_debug(Some("0")));
        assert!(!parse_debug(Some("yes")));
        assert!(!parse_debug(None));
    }

    #[test]
    fn session_options_combine_seed_and_debug_flag() {
        assert_eq!(
            read_session_options(Some("99"), Some("true")),
            SessionOptions {
                seed: Some(99),
                debug: true
            }
        );
        assert_eq!(
            read_session_options(None, Some("nope")),
            SessionOptions {
                seed: None,
                debug: false
            }
        );
    }
}
