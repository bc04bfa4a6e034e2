//! Hardware subsystem
//!
//! Physical layer of the unit. Protection and power come up before the HMI,
//! communication hardware, and sensors; the core processing unit is last.

use crate::{leaf_module, Context, Lifecycle, ModuleId, ModuleStatus, NlResult, Supervised};

leaf_module! {
    /// Enclosure protection and tamper sensing
    ProtectionStructure => ProtectionStructure
}

leaf_module! {
    /// Battery, rails, and power sequencing
    PowerManagement => PowerManagement
}

leaf_module! {
    /// Operator display and input devices
    HmiUnit => HmiUnit
}

leaf_module! {
    /// Radio and wired communication hardware
    CommunicationModule => CommunicationModule
}

leaf_module! {
    /// Attached sensor devices
    SensorSuite => SensorSuite
}

leaf_module! {
    /// Main processing and co-processors
    CoreProcessingUnit => CoreProcessingUnit
}

/// Aggregator for the hardware leaves
///
/// Fields are declared in initialization order.
pub struct HardwareSubsystem {
    protection: Supervised<ProtectionStructure>,
    power: Supervised<PowerManagement>,
    hmi: Supervised<HmiUnit>,
    comm: Supervised<CommunicationModule>,
    sensors: Supervised<SensorSuite>,
    cpu: Supervised<CoreProcessingUnit>,
}

impl HardwareSubsystem {
    pub const fn new() -> Self {
        Self {
            protection: Supervised::new(ProtectionStructure::new()),
            power: Supervised::new(PowerManagement::new()),
            hmi: Supervised::new(HmiUnit::new()),
            comm: Supervised::new(CommunicationModule::new()),
            sensors: Supervised::new(SensorSuite::new()),
            cpu: Supervised::new(CoreProcessingUnit::new()),
        }
    }

    /// Status of every leaf in declared order
    pub fn statuses(&self) -> [ModuleStatus; 6] {
        [
            self.protection.status(),
            self.power.status(),
            self.hmi.status(),
            self.comm.status(),
            self.sensors.status(),
            self.cpu.status(),
        ]
    }
}

impl Default for HardwareSubsystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle for HardwareSubsystem {
    fn id(&self) -> ModuleId {
        ModuleId::HardwareSubsystem
    }

    fn initialize(&mut self, ctx: &mut Context<'_>) -> NlResult<()> {
        self.protection.initialize(ctx)?;
        self.power.initialize(ctx)?;
        self.hmi.initialize(ctx)?;
        self.comm.initialize(ctx)?;
        self.sensors.initialize(ctx)?;
        self.cpu.initialize(ctx)?;
        log::debug!("hardware subsystem up");
        Ok(())
    }

    fn tick(&mut self, ctx: &mut Context<'_>) -> NlResult<()> {
        self.protection.tick(ctx)?;
        self.power.tick(ctx)?;
        self.hmi.tick(ctx)?;
        self.comm.tick(ctx)?;
        self.sensors.tick(ctx)?;
        self.cpu.tick(ctx)
    }
}
