//! Configuration validation.
//!
//! Validates every recognised field before the engine is built, so the engine
//! itself never re-checks timeframe or parameter ranges.

use crate::domain::error::TraderError;
use crate::domain::strategy::Timeframe;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;

pub fn validate_trader_config(config: &dyn ConfigPort) -> Result<(), TraderError> {
    validate_timeframe(config)?;
    validate_symbols(config)?;
    validate_positive_int(config, "general", "poll_interval_secs")?;
    validate_positive_int(config, "general", "bar_count")?;
    validate_ema_period(config)?;
    validate_fib_retrace(config)?;
    validate_positive_int(config, "strategy", "swing_window")?;
    validate_stop_buffer(config)?;
    validate_risk_per_trade(config)?;
    validate_cooldown(config)?;
    Ok(())
}

pub fn validate_paper_config(config: &dyn ConfigPort) -> Result<(), TraderError> {
    match config.get_string("paper", "data_dir") {
        Some(s) if !s.trim().is_empty() => {}
        _ => {
            return Err(TraderError::ConfigMissing {
                section: "paper".to_string(),
                key: "data_dir".to_string(),
            });
        }
    }

    let balance = optional_float(config, "paper", "balance")?.unwrap_or(0.0);
    if !(balance > 0.0) {
        return Err(TraderError::ConfigInvalid {
            section: "paper".to_string(),
            key: "balance".to_string(),
            reason: "balance must be positive".to_string(),
        });
    }

    let spread = optional_float(config, "paper", "spread_points")?.unwrap_or(0.0);
    if !(spread >= 0.0) {
        return Err(TraderError::ConfigInvalid {
            section: "paper".to_string(),
            key: "spread_points".to_string(),
            reason: "spread_points must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, TraderError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(TraderError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_timeframe(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let value = required(config, "general", "timeframe")?;
    value
        .parse::<Timeframe>()
        .map(|_| ())
        .map_err(|e| TraderError::ConfigInvalid {
            section: "general".to_string(),
            key: "timeframe".to_string(),
            reason: e.to_string(),
        })
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let value = required(config, "general", "symbols")?;
    parse_symbols(&value)
        .map(|_| ())
        .map_err(|e| TraderError::ConfigInvalid {
            section: "general".to_string(),
            key: "symbols".to_string(),
            reason: e.to_string(),
        })
}

/// Optional keys: absent is fine, present must be >= 1.
fn validate_positive_int(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), TraderError> {
    if config.get_string(section, key).is_none() {
        return Ok(());
    }
    if config.get_int(section, key, 0) < 1 {
        return Err(TraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must be a positive integer", key),
        });
    }
    Ok(())
}

fn validate_ema_period(config: &dyn ConfigPort) -> Result<(), TraderError> {
    required(config, "strategy", "ema_period")?;
    validate_positive_int(config, "strategy", "ema_period")
}

fn validate_fib_retrace(config: &dyn ConfigPort) -> Result<(), TraderError> {
    required(config, "strategy", "fib_retrace")?;
    let value = config.get_double("strategy", "fib_retrace", f64::NAN);
    if !(0.0..=1.0).contains(&value) {
        return Err(TraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "fib_retrace".to_string(),
            reason: "fib_retrace must be between 0 and 1".to_string(),
        });
    }
    Ok(())
}

fn validate_stop_buffer(config: &dyn ConfigPort) -> Result<(), TraderError> {
    match optional_float(config, "strategy", "stop_buffer_points")? {
        Some(value) if !(value >= 0.0) => Err(TraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "stop_buffer_points".to_string(),
            reason: "stop_buffer_points must be non-negative".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_risk_per_trade(config: &dyn ConfigPort) -> Result<(), TraderError> {
    required(config, "risk", "max_risk_per_trade")?;
    let value = optional_float(config, "risk", "max_risk_per_trade")?.unwrap_or(f64::NAN);
    if !(value > 0.0 && value <= 1.0) {
        return Err(TraderError::ConfigInvalid {
            section: "risk".to_string(),
            key: "max_risk_per_trade".to_string(),
            reason: "max_risk_per_trade must be greater than 0 and at most 1".to_string(),
        });
    }
    Ok(())
}

/// `None` when the key is absent; a present value must parse as a number.
fn optional_float(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, TraderError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| TraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} is not a number: {}", key, raw.trim()),
        })
}

fn validate_cooldown(config: &dyn ConfigPort) -> Result<(), TraderError> {
    if config.get_string("risk", "reentry_cooldown_cycles").is_none() {
        return Ok(());
    }
    if config.get_int("risk", "reentry_cooldown_cycles", -1) < 0 {
        return Err(TraderError::ConfigInvalid {
            section: "risk".to_string(),
            key: "reentry_cooldown_cycles".to_string(),
            reason: "reentry_cooldown_cycles must be a non-negative integer".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    const BASE: &str = "[general]\ntimeframe = H1\nsymbols = EURUSD,GBPUSD\n\n[strategy]\nema_period = 50\nfib_retrace = 0.618\n\n[risk]\nmax_risk_per_trade = 0.01\n";

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn with(extra_section: &str, line: &str) -> FileConfigAdapter {
        make_config(&format!("{BASE}\n[{extra_section}]\n{line}\n"))
    }

    fn replaced(from: &str, to: &str) -> FileConfigAdapter {
        make_config(&BASE.replace(from, to))
    }

    #[test]
    fn valid_config_passes() {
        let config = make_config(
            r#"
[general]
timeframe = M15
symbols = EURUSD, GBPUSD, XAUUSD
poll_interval_secs = 60
bar_count = 500

[strategy]
ema_period = 50
fib_retrace = 0.5
swing_window = 20
stop_buffer_points = 10

[risk]
max_risk_per_trade = 0.02
reentry_cooldown_cycles = 0
"#,
        );
        assert!(validate_trader_config(&config).is_ok());
    }

    #[test]
    fn minimal_config_passes() {
        assert!(validate_trader_config(&make_config(BASE)).is_ok());
    }

    #[test]
    fn missing_timeframe_fails() {
        let err = validate_trader_config(&replaced("timeframe = H1\n", "")).unwrap_err();
        assert!(matches!(err, TraderError::ConfigMissing { key, .. } if key == "timeframe"));
    }

    #[test]
    fn unknown_timeframe_fails() {
        let err = validate_trader_config(&replaced("H1", "W1")).unwrap_err();
        assert!(matches!(err, TraderError::ConfigInvalid { key, .. } if key == "timeframe"));
    }

    #[test]
    fn missing_symbols_fails() {
        let err =
            validate_trader_config(&replaced("symbols = EURUSD,GBPUSD\n", "")).unwrap_err();
        assert!(matches!(err, TraderError::ConfigMissing { key, .. } if key == "symbols"));
    }

    #[test]
    fn duplicate_symbols_fail() {
        let err = validate_trader_config(&replaced("EURUSD,GBPUSD", "EURUSD,eurusd")).unwrap_err();
        assert!(matches!(err, TraderError::ConfigInvalid { key, .. } if key == "symbols"));
    }

    #[test]
    fn missing_ema_period_fails() {
        let err = validate_trader_config(&replaced("ema_period = 50\n", "")).unwrap_err();
        assert!(matches!(err, TraderError::ConfigMissing { key, .. } if key == "ema_period"));
    }

    #[test]
    fn zero_ema_period_fails() {
        let err = validate_trader_config(&replaced("ema_period = 50", "ema_period = 0")).unwrap_err();
        assert!(matches!(err, TraderError::ConfigInvalid { key, .. } if key == "ema_period"));
    }

    #[test]
    fn non_numeric_ema_period_fails() {
        let err =
            validate_trader_config(&replaced("ema_period = 50", "ema_period = fifty")).unwrap_err();
        assert!(matches!(err, TraderError::ConfigInvalid { key, .. } if key == "ema_period"));
    }

    #[test]
    fn fib_retrace_out_of_range_fails() {
        for bad in ["1.5", "-0.1", "abc", "nan"] {
            let cfg = replaced("fib_retrace = 0.618", &format!("fib_retrace = {bad}"));
            let err = validate_trader_config(&cfg).unwrap_err();
            assert!(matches!(err, TraderError::ConfigInvalid { key, .. } if key == "fib_retrace"));
        }
    }

    #[test]
    fn fib_retrace_bounds_accepted() {
        for ok in ["0", "1", "0.0", "1.0"] {
            let cfg = replaced("fib_retrace = 0.618", &format!("fib_retrace = {ok}"));
            assert!(validate_trader_config(&cfg).is_ok());
        }
    }

    #[test]
    fn zero_swing_window_fails() {
        let cfg = replaced("fib_retrace = 0.618", "fib_retrace = 0.618\nswing_window = 0");
        let err = validate_trader_config(&cfg).unwrap_err();
        assert!(matches!(err, TraderError::ConfigInvalid { key, .. } if key == "swing_window"));
    }

    #[test]
    fn negative_stop_buffer_fails() {
        let cfg = replaced("fib_retrace = 0.618", "fib_retrace = 0.618\nstop_buffer_points = -1");
        let err = validate_trader_config(&cfg).unwrap_err();
        assert!(
            matches!(err, TraderError::ConfigInvalid { key, .. } if key == "stop_buffer_points")
        );
    }

    #[test]
    fn nan_or_garbage_stop_buffer_fails() {
        for bad in ["nan", "NaN", "abc"] {
            let cfg = replaced(
                "fib_retrace = 0.618",
                &format!("fib_retrace = 0.618\nstop_buffer_points = {bad}"),
            );
            let err = validate_trader_config(&cfg).unwrap_err();
            assert!(
                matches!(err, TraderError::ConfigInvalid { key, .. } if key == "stop_buffer_points")
            );
        }
    }

    #[test]
    fn risk_out_of_range_fails() {
        for bad in ["0", "-0.01", "1.5", "nan", "abc"] {
            let cfg = replaced(
                "max_risk_per_trade = 0.01",
                &format!("max_risk_per_trade = {bad}"),
            );
            let err = validate_trader_config(&cfg).unwrap_err();
            assert!(
                matches!(err, TraderError::ConfigInvalid { key, .. } if key == "max_risk_per_trade")
            );
        }
    }

    #[test]
    fn missing_risk_fails() {
        let err =
            validate_trader_config(&replaced("max_risk_per_trade = 0.01\n", "")).unwrap_err();
        assert!(
            matches!(err, TraderError::ConfigMissing { key, .. } if key == "max_risk_per_trade")
        );
    }

    #[test]
    fn negative_cooldown_fails() {
        let cfg = replaced(
            "max_risk_per_trade = 0.01",
            "max_risk_per_trade = 0.01\nreentry_cooldown_cycles = -3",
        );
        let err = validate_trader_config(&cfg).unwrap_err();
        assert!(
            matches!(err, TraderError::ConfigInvalid { key, .. } if key == "reentry_cooldown_cycles")
        );
    }

    #[test]
    fn zero_poll_interval_fails() {
        let cfg = replaced("timeframe = H1", "timeframe = H1\npoll_interval_secs = 0");
        let err = validate_trader_config(&cfg).unwrap_err();
        assert!(
            matches!(err, TraderError::ConfigInvalid { key, .. } if key == "poll_interval_secs")
        );
    }

    #[test]
    fn valid_paper_config_passes() {
        let cfg = with("paper", "data_dir = ./data\nbalance = 10000\nspread_points = 2");
        assert!(validate_paper_config(&cfg).is_ok());
    }

    #[test]
    fn paper_without_data_dir_fails() {
        let cfg = with("paper", "balance = 10000");
        let err = validate_paper_config(&cfg).unwrap_err();
        assert!(matches!(err, TraderError::ConfigMissing { key, .. } if key == "data_dir"));
    }

    #[test]
    fn paper_non_positive_balance_fails() {
        let cfg = with("paper", "data_dir = ./data\nbalance = 0");
        let err = validate_paper_config(&cfg).unwrap_err();
        assert!(matches!(err, TraderError::ConfigInvalid { key, .. } if key == "balance"));
    }

    #[test]
    fn paper_nan_values_fail() {
        let cfg = with("paper", "data_dir = ./data\nbalance = nan");
        let err = validate_paper_config(&cfg).unwrap_err();
        assert!(matches!(err, TraderError::ConfigInvalid { key, .. } if key == "balance"));

        let cfg = with("paper", "data_dir = ./data\nbalance = 100\nspread_points = nan");
        let err = validate_paper_config(&cfg).unwrap_err();
        assert!(matches!(err, TraderError::ConfigInvalid { key, .. } if key == "spread_points"));
    }

    #[test]
    fn paper_negative_spread_fails() {
        let cfg = with("paper", "data_dir = ./data\nbalance = 100\nspread_points = -1");
        let err = validate_paper_config(&cfg).unwrap_err();
        assert!(matches!(err, TraderError::ConfigInvalid { key, .. } if key == "spread_points"));
    }
}
