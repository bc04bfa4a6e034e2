//! Orchestrator configuration

use neurolink_core::{BootPolicy, FaultPolicy, TickBudget};

/// Line emitted on the console once the startup delay has elapsed
pub const DEFAULT_BANNER: &str = "Neurolink ESP32-S3: boot";

/// Console baud rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Delay before the banner, giving the console time to become ready
pub const DEFAULT_BOOT_DELAY_MS: u32 = 200;

/// Configuration for the root orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    pub banner: &'static str,
    pub baud_rate: u32,
    pub boot_delay_ms: u32,
    /// Per-leaf tick budget; `None` disables overrun reporting
    pub tick_budget: Option<TickBudget>,
    pub policy: FaultPolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            banner: DEFAULT_BANNER,
            baud_rate: DEFAULT_BAUD_RATE,
            boot_delay_ms: DEFAULT_BOOT_DELAY_MS,
            tick_budget: None,
            policy: FaultPolicy::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::default()
    }
}

/// Builder for ergonomic orchestrator configuration construction.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfigBuilder {
    config: OrchestratorConfig,
}

impl OrchestratorConfigBuilder {
    /// Sets the boot banner.
    pub fn banner(mut self, banner: &'static str) -> Self {
        self.config.banner = banner;
        self
    }

    /// Sets the console baud rate.
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.config.baud_rate = baud_rate;
        self
    }

    /// Sets the delay before the banner is emitted.
    pub fn boot_delay_ms(mut self, millis: u32) -> Self {
        self.config.boot_delay_ms = millis;
        self
    }

    /// Sets the per-leaf tick budget.
    pub fn tick_budget(mut self, budget: TickBudget) -> Self {
        self.config.tick_budget = Some(budget);
        self
    }

    /// Sets what happens when a module fails its setup.
    pub fn on_setup_failure(mut self, policy: BootPolicy) -> Self {
        self.config.policy.on_setup_failure = policy;
        self
    }

    /// Sets how many times a failed setup is retried.
    pub fn setup_retries(mut self, retries: u8) -> Self {
        self.config.policy.setup_retries = retries;
        self
    }

    /// Replaces the whole fault policy.
    pub fn policy(mut self, policy: FaultPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Builds the orchestrator configuration.
    pub fn build(self) -> OrchestratorConfig {
        self.config
    }
}
