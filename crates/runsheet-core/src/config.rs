//! Engine settings.
//!
//! Every section has defaults, so an empty config is valid. Frontends
//! deserialize this from whatever format they read (the CLI uses TOML).

use serde::{Deserialize, Serialize};

use crate::error::{Result, RunsheetError};
use crate::horizontal::HorizontalConfig;
use crate::pdf::PageConfig;
use crate::vertical::VerticalConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub vertical: VerticalConfig,
    pub horizontal: HorizontalConfig,
    pub page: PageConfig,
}

impl EngineConfig {
    /// Reject settings no layout can honour.
    pub fn validate(&self) -> Result<()> {
        if self.vertical.hour_height.is_nan() || self.vertical.hour_height <= 0.0 {
            return Err(RunsheetError::InvalidRange(format!(
                "vertical hour_height must be positive, got {}",
                self.vertical.hour_height
            )));
        }
        self.vertical.default_window.validate("vertical")?;
        self.horizontal.default_window.validate("horizontal")?;
        self.page.validate()
    }
}
