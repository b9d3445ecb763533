//! TOML configuration loading.
//!
//! # Format
//!
//! Every key of [`SimConfig`] is optional; missing keys keep their default.
//! Unknown keys are rejected so typos surface immediately.
//!
//! ```toml
//! tick_length = 1000
//! end_time    = 3_600_000
//! seed        = 7
//! vehicles    = 3
//! min_point   = { x = 0.0, y = 0.0 }
//! max_point   = { x = 20.0, y = 20.0 }
//! ```

use std::path::Path;

use pd_core::SimConfig;

use crate::ConfigResult;

/// Read and validate a configuration file.
pub fn load_config(path: &Path) -> ConfigResult<SimConfig> {
    let text = std::fs::read_to_string(path)?;
    parse_config(&text)
}

/// Like [`load_config`] but from an in-memory string.
pub fn parse_config(text: &str) -> ConfigResult<SimConfig> {
    let config: SimConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}
