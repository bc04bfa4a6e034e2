#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # Neurolink Modules
//!
//! The lifecycle-bearing units of the control device. Sixteen leaf modules
//! are grouped under four subsystem aggregators; each aggregator owns its
//! leaves by value and forwards `initialize` and `tick` to them in a fixed
//! declared order that encodes dependency precedence, e.g. protection and
//! power before compute and the protocol stack before the layers above it.
//!
//! Leaf modules are extension points: their lifecycle bodies are where
//! device drivers, protocol engines, and policies plug in.

pub mod hardware;
pub mod network;
pub mod software;
pub mod support;

pub use neurolink_core::*;

pub use hardware::HardwareSubsystem;
pub use network::NetworkSubsystem;
pub use software::SoftwareSubsystem;
pub use support::SupportSubsystem;

/// Declares a leaf module with empty lifecycle hooks
#[macro_export]
macro_rules! leaf_module {
    ($(#[$meta:meta])* $name:ident => $id:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        pub struct $name {
            _private: (),
        }

        impl $name {
            pub const fn new() -> Self {
                Self { _private: () }
            }
        }

        impl $crate::Lifecycle for $name {
            fn id(&self) -> $crate::ModuleId {
                $crate::ModuleId::$id
            }

            fn initialize(&mut self, _ctx: &mut $crate::Context<'_>) -> $crate::NlResult<()> {
                Ok(())
            }

            fn tick(&mut self, _ctx: &mut $crate::Context<'_>) -> $crate::NlResult<()> {
                Ok(())
            }
        }
    };
}
