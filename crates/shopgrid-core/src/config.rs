use crate::app_config::{AppConfig, Environment};
use crate::{ConfigError, GridConfig};

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed or the grid geometry is
/// degenerate.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed or the grid geometry is
/// degenerate.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SHOPGRID_ENV", "development"));
    let bind_addr = parse_addr("SHOPGRID_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SHOPGRID_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("SHOPGRID_DATA_DIR", "./data"));

    let reference = GridConfig::reference_deployment();
    let grid = GridConfig {
        lat_start: parse_f64("SHOPGRID_GRID_LAT_START", &reference.lat_start.to_string())?,
        lat_inc: parse_f64("SHOPGRID_GRID_LAT_INC", &reference.lat_inc.to_string())?,
        lat_count: parse_usize("SHOPGRID_GRID_LAT_COUNT", &reference.lat_count.to_string())?,
        lng_start: parse_f64("SHOPGRID_GRID_LNG_START", &reference.lng_start.to_string())?,
        lng_inc: parse_f64("SHOPGRID_GRID_LNG_INC", &reference.lng_inc.to_string())?,
        lng_count: parse_usize("SHOPGRID_GRID_LNG_COUNT", &reference.lng_count.to_string())?,
    };
    validate_grid(&grid)?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        data_dir,
        grid,
    })
}

/// A zero-cell or non-positive-increment grid can never place a product;
/// refuse it at startup rather than serving empty results.
fn validate_grid(grid: &GridConfig) -> Result<(), ConfigError> {
    let invalid = |var: &str, reason: &str| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: reason.to_string(),
    };

    if !(grid.lat_inc.is_finite() && grid.lat_inc > 0.0) {
        return Err(invalid("SHOPGRID_GRID_LAT_INC", "must be a positive number"));
    }
    if !(grid.lng_inc.is_finite() && grid.lng_inc > 0.0) {
        return Err(invalid("SHOPGRID_GRID_LNG_INC", "must be a positive number"));
    }
    if grid.lat_count == 0 {
        return Err(invalid("SHOPGRID_GRID_LAT_COUNT", "must be at least 1"));
    }
    if grid.lng_count == 0 {
        return Err(invalid("SHOPGRID_GRID_LNG_COUNT", "must be at least 1"));
    }
    if !grid.lat_start.is_finite() {
        return Err(invalid("SHOPGRID_GRID_LAT_START", "must be a finite number"));
    }
    if !grid.lng_start.is_finite() {
        return Err(invalid("SHOPGRID_GRID_LNG_START", "must be a finite number"));
    }
    Ok(())
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("unknown"), Environment::Development);
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.data_dir.to_string_lossy(), "./data");
        assert_eq!(cfg.grid, GridConfig::reference_deployment());
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = HashMap::new();
        map.insert("SHOPGRID_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPGRID_BIND_ADDR"),
            "expected InvalidEnvVar(SHOPGRID_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_overrides_grid_geometry() {
        let mut map = HashMap::new();
        map.insert("SHOPGRID_GRID_LAT_START", "10.5");
        map.insert("SHOPGRID_GRID_LAT_COUNT", "4");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!((cfg.grid.lat_start - 10.5).abs() < f64::EPSILON);
        assert_eq!(cfg.grid.lat_count, 4);
        // Untouched axes keep the reference defaults.
        assert_eq!(cfg.grid.lng_count, 10);
    }

    #[test]
    fn build_app_config_fails_with_non_numeric_increment() {
        let mut map = HashMap::new();
        map.insert("SHOPGRID_GRID_LAT_INC", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPGRID_GRID_LAT_INC"),
            "expected InvalidEnvVar(SHOPGRID_GRID_LAT_INC), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_zero_cell_grid() {
        let mut map = HashMap::new();
        map.insert("SHOPGRID_GRID_LNG_COUNT", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPGRID_GRID_LNG_COUNT"),
            "expected InvalidEnvVar(SHOPGRID_GRID_LNG_COUNT), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_negative_increment() {
        let mut map = HashMap::new();
        map.insert("SHOPGRID_GRID_LNG_INC", "-0.01");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPGRID_GRID_LNG_INC"),
            "expected InvalidEnvVar(SHOPGRID_GRID_LNG_INC), got: {result:?}"
        );
    }
}
