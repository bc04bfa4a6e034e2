//! Support subsystem

use crate::{leaf_module, Context, Lifecycle, ModuleId, ModuleStatus, NlResult, Supervised};

leaf_module! {
    /// Inventory and supply tracking
    LogisticsSystem => LogisticsSystem
}

leaf_module! {
    /// Self-test and service records
    MaintenanceSystem => MaintenanceSystem
}

leaf_module! {
    /// Operator training and simulation mode
    TrainingSystem => TrainingSystem
}

/// Aggregator for the support leaves
pub struct SupportSubsystem {
    logistics: Supervised<LogisticsSystem>,
    maintenance: Supervised<MaintenanceSystem>,
    training: Supervised<TrainingSystem>,
}

impl SupportSubsystem {
    pub const fn new() -> Self {
        Self {
            logistics: Supervised::new(LogisticsSystem::new()),
            maintenance: Supervised::new(MaintenanceSystem::new()),
            training: Supervised::new(TrainingSystem::new()),
        }
    }

    pub fn statuses(&self) -> [ModuleStatus; 3] {
        [
            self.logistics.status(),
            self.maintenance.status(),
            self.training.status(),
        ]
    }
}

impl Default for SupportSubsystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle for SupportSubsystem {
    fn id(&self) -> ModuleId {
        ModuleId::SupportSubsystem
    }

    fn initialize(&mut self, ctx: &mut Context<'_>) -> NlResult<()> {
        self.logistics.initialize(ctx)?;
        self.maintenance.initialize(ctx)?;
        self.training.initialize(ctx)?;
        log::debug!("support subsystem up");
        Ok(())
    }

    fn tick(&mut self, ctx: &mut Context<'_>) -> NlResult<()> {
        self.logistics.tick(ctx)?;
        self.maintenance.tick(ctx)?;
        self.training.tick(ctx)
    }
}
