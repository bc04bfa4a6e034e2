//! Network subsystem
//!
//! The protocol stack comes up first; network management and the data
//! distribution service sit on top of it.

use crate::{leaf_module, Context, Lifecycle, ModuleId, ModuleStatus, NlResult, Supervised};

leaf_module! {
    /// Link, transport, and framing layers
    ProtocolStack => ProtocolStack
}

leaf_module! {
    /// Peer discovery, addressing, and link supervision
    NetworkManagement => NetworkManagement
}

leaf_module! {
    /// Publish/subscribe data distribution
    DataDistributionService => DataDistributionService
}

/// Aggregator for the network leaves
pub struct NetworkSubsystem {
    protocol_stack: Supervised<ProtocolStack>,
    network_mgmt: Supervised<NetworkManagement>,
    data_distribution: Supervised<DataDistributionService>,
}

impl NetworkSubsystem {
    pub const fn new() -> Self {
        Self {
            protocol_stack: Supervised::new(ProtocolStack::new()),
            network_mgmt: Supervised::new(NetworkManagement::new()),
            data_distribution: Supervised::new(DataDistributionService::new()),
        }
    }

    pub fn statuses(&self) -> [ModuleStatus; 3] {
        [
            self.protocol_stack.status(),
            self.network_mgmt.status(),
            self.data_distribution.status(),
        ]
    }
}

impl Default for NetworkSubsystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle for NetworkSubsystem {
    fn id(&self) -> ModuleId {
        ModuleId::NetworkSubsystem
    }

    fn initialize(&mut self, ctx: &mut Context<'_>) -> NlResult<()> {
        self.protocol_stack.initialize(ctx)?;
        self.network_mgmt.initialize(ctx)?;
        self.data_distribution.initialize(ctx)?;
        log::debug!("network subsystem up");
        Ok(())
    }

    fn tick(&mut self, ctx: &mut Context<'_>) -> NlResult<()> {
        self.protocol_stack.tick(ctx)?;
        self.network_mgmt.tick(ctx)?;
        self.data_distribution.tick(ctx)
    }
}
