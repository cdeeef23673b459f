use log::warn;

use crate::market::interval::Interval;

/// Default universe used when `SYMBOLS` is unset. Treated as ordinary configuration,
/// not a design contract — any top-N list would do.
const DEFAULT_SYMBOLS: [&str; 10] = [
    "BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT", "XRPUSDT", "ADAUSDT", "DOGEUSDT", "AVAXUSDT",
    "DOTUSDT", "LINKUSDT",
];

const DEFAULT_PORT: u16 = 8080;

/// Resolved process configuration. Built once in `main` from the environment and
/// shared read-only through `AppState` — replaces the scattered
/// `dotenv_codegen::dotenv!()` calls with one typed entry point.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub symbols: Vec<String>,
    pub api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let parsed_symbols: Vec<String> = std::env::var("SYMBOLS")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let symbols = if parsed_symbols.is_empty() {
            if std::env::var("SYMBOLS").is_ok() {
                warn!("SYMBOLS env var set but contained no usable entries, falling back to defaults");
            }
            DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
        } else {
            parsed_symbols
        };

        let api_key = std::env::var("API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        Self {
            port,
            symbols,
            api_key,
        }
    }

    /// The fixed interval set this system subscribes to and serves. Not
    /// configurable via environment.
    pub fn intervals(&self) -> &'static [Interval] {
        &Interval::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_are_the_fixed_set() {
        let cfg = Config {
            port: 1,
            symbols: vec![],
            api_key: None,
        };
        assert_eq!(cfg.intervals(), &Interval::ALL);
    }

    fn parse_symbols(raw: &str) -> Vec<String> {
        let parsed: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if parsed.is_empty() {
            DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
        } else {
            parsed
        }
    }

    #[test]
    fn parses_and_uppercases_a_csv_list() {
        assert_eq!(parse_symbols("btcusdt, ethusdt"), vec!["BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn all_delimiter_value_falls_back_to_defaults() {
        let expected: Vec<String> = DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect();
        assert_eq!(parse_symbols(", , ,"), expected);
    }
}
