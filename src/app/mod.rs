//! Application wiring: configuration and collaborators in, sessions out.

mod host;
mod services;
mod session;

pub use host::{DesktopHost, HostContext};
pub use services::AppServices;
pub use session::{Session, SessionEvent};

use crate::config::Config;
use crate::error::StartupError;

/// Configuration plus the services built from it.
pub struct Application {
    config: Config,
    services: AppServices,
}

impl Application {
    /// Validate `config` and open the stores it points at.
    pub fn open(config: Config) -> Result<Self, StartupError> {
        config.validate()?;
        let services = AppServices::open(&config)?;
        Ok(Self { config, services })
    }

    /// Application whose stores live only in memory.
    pub fn in_memory(config: Config) -> Self {
        let services = AppServices::in_memory(&config);
        Self { config, services }
    }

    pub fn with_services(config: Config, services: AppServices) -> Self {
        Self { config, services }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn services(&self) -> &AppServices {
        &self.services
    }
}
