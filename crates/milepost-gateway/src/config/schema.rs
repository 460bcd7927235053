use serde::Deserialize;

use milepost_core::error::{MilepostError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub limit: LimitSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MilepostError::BadRequest("version must be 1".into()));
        }
        self.gateway.validate()?;
        self.limit.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.is_empty() {
            return Err(MilepostError::BadRequest(
                "gateway.listen must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Fixed-window quota applied to every client identity. One global quota for
/// all routes; per-route or per-role quotas would hang off this section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitSection {
    #[serde(default = "default_limit_enabled")]
    pub enabled: bool,

    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

impl Default for LimitSection {
    fn default() -> Self {
        Self {
            enabled: default_limit_enabled(),
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
        }
    }
}

impl LimitSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=86400).contains(&self.window_secs) {
            return Err(MilepostError::BadRequest(
                "limit.window_secs must be between 1 and 86400".into(),
            ));
        }
        if self.max_requests == 0 {
            return Err(MilepostError::BadRequest(
                "limit.max_requests must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_limit_enabled() -> bool {
    true
}
fn default_window_secs() -> u64 {
    900
}
fn default_max_requests() -> u32 {
    100
}
