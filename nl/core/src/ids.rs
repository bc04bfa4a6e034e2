//! Module and subsystem identifiers

use core::fmt;

/// Subsystem group a module belongs to, listed in root order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    Hardware,
    Software,
    Support,
    Network,
}

impl Group {
    /// All groups in the order the root orchestrator visits them
    pub const ALL: [Group; 4] = [Group::Hardware, Group::Software, Group::Support, Group::Network];

    /// Leaf modules of this group in declared order
    pub const fn members(self) -> &'static [ModuleId] {
        match self {
            Group::Hardware => &[
                ModuleId::ProtectionStructure,
                ModuleId::PowerManagement,
                ModuleId::HmiUnit,
                ModuleId::CommunicationModule,
                ModuleId::SensorSuite,
                ModuleId::CoreProcessingUnit,
            ],
            Group::Software => &[
                ModuleId::OsLayer,
                ModuleId::SecurityFramework,
                ModuleId::Middleware,
                ModuleId::AppLayer,
            ],
            Group::Support => &[
                ModuleId::LogisticsSystem,
                ModuleId::MaintenanceSystem,
                ModuleId::TrainingSystem,
            ],
            Group::Network => &[
                ModuleId::ProtocolStack,
                ModuleId::NetworkManagement,
                ModuleId::DataDistributionService,
            ],
        }
    }

    /// Identifier of the aggregator owning this group
    pub const fn subsystem(self) -> ModuleId {
        match self {
            Group::Hardware => ModuleId::HardwareSubsystem,
            Group::Software => ModuleId::SoftwareSubsystem,
            Group::Support => ModuleId::SupportSubsystem,
            Group::Network => ModuleId::NetworkSubsystem,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Group::Hardware => "hardware",
            Group::Software => "software",
            Group::Support => "support",
            Group::Network => "network",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of every lifecycle-bearing unit in the system
///
/// Leaves come first in global declared order, followed by the four
/// subsystem aggregators. The raw value is stable and fits a 32-bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ModuleId {
    ProtectionStructure = 0,
    PowerManagement = 1,
    HmiUnit = 2,
    CommunicationModule = 3,
    SensorSuite = 4,
    CoreProcessingUnit = 5,
    OsLayer = 6,
    SecurityFramework = 7,
    Middleware = 8,
    AppLayer = 9,
    LogisticsSystem = 10,
    MaintenanceSystem = 11,
    TrainingSystem = 12,
    ProtocolStack = 13,
    NetworkManagement = 14,
    DataDistributionService = 15,
    HardwareSubsystem = 16,
    SoftwareSubsystem = 17,
    SupportSubsystem = 18,
    NetworkSubsystem = 19,
}

impl ModuleId {
    /// Number of identifiers
    pub const COUNT: usize = 20;

    /// Leaf modules in global declared order
    pub const LEAVES: [ModuleId; 16] = [
        ModuleId::ProtectionStructure,
        ModuleId::PowerManagement,
        ModuleId::HmiUnit,
        ModuleId::CommunicationModule,
        ModuleId::SensorSuite,
        ModuleId::CoreProcessingUnit,
        ModuleId::OsLayer,
        ModuleId::SecurityFramework,
        ModuleId::Middleware,
        ModuleId::AppLayer,
        ModuleId::LogisticsSystem,
        ModuleId::MaintenanceSystem,
        ModuleId::TrainingSystem,
        ModuleId::ProtocolStack,
        ModuleId::NetworkManagement,
        ModuleId::DataDistributionService,
    ];

    /// Subsystem aggregators in root order
    pub const SUBSYSTEMS: [ModuleId; 4] = [
        ModuleId::HardwareSubsystem,
        ModuleId::SoftwareSubsystem,
        ModuleId::SupportSubsystem,
        ModuleId::NetworkSubsystem,
    ];

    /// Get the raw identifier value
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Look up an identifier by raw value
    pub const fn from_raw(raw: u8) -> Option<Self> {
        if (raw as usize) < Self::LEAVES.len() {
            Some(Self::LEAVES[raw as usize])
        } else if (raw as usize) < Self::COUNT {
            Some(Self::SUBSYSTEMS[raw as usize - Self::LEAVES.len()])
        } else {
            None
        }
    }

    /// Single-bit mask for filter sets
    pub const fn mask(self) -> u32 {
        1 << self.raw()
    }

    pub const fn is_leaf(self) -> bool {
        (self as u8) < ModuleId::HardwareSubsystem as u8
    }

    /// Group the module belongs to; aggregators belong to their own group
    pub const fn group(self) -> Group {
        match self {
            ModuleId::ProtectionStructure
            | ModuleId::PowerManagement
            | ModuleId::HmiUnit
            | ModuleId::CommunicationModule
            | ModuleId::SensorSuite
            | ModuleId::CoreProcessingUnit
            | ModuleId::HardwareSubsystem => Group::Hardware,
            ModuleId::OsLayer
            | ModuleId::SecurityFramework
            | ModuleId::Middleware
            | ModuleId::AppLayer
            | ModuleId::SoftwareSubsystem => Group::Software,
            ModuleId::LogisticsSystem
            | ModuleId::MaintenanceSystem
            | ModuleId::TrainingSystem
            | ModuleId::SupportSubsystem => Group::Support,
            ModuleId::ProtocolStack
            | ModuleId::NetworkManagement
            | ModuleId::DataDistributionService
            | ModuleId::NetworkSubsystem => Group::Network,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ModuleId::ProtectionStructure => "protection_structure",
            ModuleId::PowerManagement => "power_management",
            ModuleId::HmiUnit => "hmi_unit",
            ModuleId::CommunicationModule => "communication_module",
            ModuleId::SensorSuite => "sensor_suite",
            ModuleId::CoreProcessingUnit => "core_processing_unit",
            ModuleId::OsLayer => "os_layer",
            ModuleId::SecurityFramework => "security_framework",
            ModuleId::Middleware => "middleware",
            ModuleId::AppLayer => "app_layer",
            ModuleId::LogisticsSystem => "logistics_system",
            ModuleId::MaintenanceSystem => "maintenance_system",
            ModuleId::TrainingSystem => "training_system",
            ModuleId::ProtocolStack => "protocol_stack",
            ModuleId::NetworkManagement => "network_management",
            ModuleId::DataDistributionService => "data_distribution",
            ModuleId::HardwareSubsystem => "hardware",
            ModuleId::SoftwareSubsystem => "software",
            ModuleId::SupportSubsystem => "support",
            ModuleId::NetworkSubsystem => "network",
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ModuleId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.name());
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Group {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.name());
    }
}
