//! Software subsystem
//!
//! OS services and the security framework come up before middleware and the
//! application layer that depend on them.

use crate::{leaf_module, Context, Lifecycle, ModuleId, ModuleStatus, NlResult, Supervised};

leaf_module! {
    /// Operating system services
    OsLayer => OsLayer
}

leaf_module! {
    /// Key storage, authentication, and integrity checks
    SecurityFramework => SecurityFramework
}

leaf_module! {
    /// Messaging and service plumbing between OS and applications
    Middleware => Middleware
}

leaf_module! {
    /// Mission applications
    AppLayer => AppLayer
}

/// Aggregator for the software leaves
pub struct SoftwareSubsystem {
    os: Supervised<OsLayer>,
    security: Supervised<SecurityFramework>,
    middleware: Supervised<Middleware>,
    app: Supervised<AppLayer>,
}

impl SoftwareSubsystem {
    pub const fn new() -> Self {
        Self {
            os: Supervised::new(OsLayer::new()),
            security: Supervised::new(SecurityFramework::new()),
            middleware: Supervised::new(Middleware::new()),
            app: Supervised::new(AppLayer::new()),
        }
    }

    /// Status of every leaf in declared order
    pub fn statuses(&self) -> [ModuleStatus; 4] {
        [
            self.os.status(),
            self.security.status(),
            self.middleware.status(),
            self.app.status(),
        ]
    }
}

impl Default for SoftwareSubsystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle for SoftwareSubsystem {
    fn id(&self) -> ModuleId {
        ModuleId::SoftwareSubsystem
    }

    fn initialize(&mut self, ctx: &mut Context<'_>) -> NlResult<()> {
        self.os.initialize(ctx)?;
        self.security.initialize(ctx)?;
        self.middleware.initialize(ctx)?;
        self.app.initialize(ctx)?;
        log::debug!("software subsystem up");
        Ok(())
    }

    fn tick(&mut self, ctx: &mut Context<'_>) -> NlResult<()> {
        self.os.tick(ctx)?;
        self.security.tick(ctx)?;
        self.middleware.tick(ctx)?;
        self.app.tick(ctx)
    }
}
