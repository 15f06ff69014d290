//! Service and bus configuration.

use serde::{Deserialize, Serialize};

use crate::error::BusError;
use crate::event::ServiceId;

/// Configuration for the in-process bus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Capacity of per-subscriber broadcast buffers.
    pub channel_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

/// Per-instance service configuration, loadable from TOML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// This instance's identifier on the bus. Must be unique per
    /// instance, or self-origin filtering breaks down.
    pub service_id: String,
    #[serde(default)]
    pub bus: BusConfig,
}

impl ServiceConfig {
    /// Parse a TOML configuration document.
    pub fn from_toml_str(input: &str) -> Result<Self, BusError> {
        toml::from_str(input).map_err(|e| BusError::Config(e.to_string()))
    }

    /// The instance identifier as a [`ServiceId`].
    pub fn service_id(&self) -> ServiceId {
        ServiceId::new(&self.service_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_sections() {
        let config = ServiceConfig::from_toml_str("service_id = \"wms-1\"").unwrap();
        assert_eq!(config.service_id().as_str(), "wms-1");
        assert_eq!(config.bus.channel_capacity, 1024);
    }

    #[test]
    fn explicit_bus_section_overrides() {
        let config = ServiceConfig::from_toml_str(
            "service_id = \"wfs-2\"\n\n[bus]\nchannel_capacity = 64\n",
        )
        .unwrap();
        assert_eq!(config.bus.channel_capacity, 64);
    }

    #[test]
    fn missing_service_id_is_an_error() {
        let err = ServiceConfig::from_toml_str("").unwrap_err();
        assert!(matches!(err, BusError::Config(_)));
    }
}
