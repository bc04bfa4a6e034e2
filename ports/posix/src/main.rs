use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use neurolink_core::{BootPolicy, LifecycleHook, NoHook, TickBudget};
use neurolink_posix::{install_stop_handler, run_host, HostConfig, StdPlatform};
use neurolink_sched::{OrchestratorConfig, DEFAULT_BOOT_DELAY_MS};
use neurolink_trace::{SharedTrace, TraceRecord};

static TRACE: SharedTrace<1024> = SharedTrace::new();

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SetupFailure {
    Halt,
    Degrade,
}

impl From<SetupFailure> for BootPolicy {
    fn from(value: SetupFailure) -> Self {
        match value {
            SetupFailure::Halt => BootPolicy::Halt,
            SetupFailure::Degrade => BootPolicy::Degrade,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the Neurolink lifecycle runtime on the host")]
struct Opts {
    /// Stop after this many sweeps
    #[arg(long, value_name = "N")]
    iterations: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_BOOT_DELAY_MS, value_name = "MS")]
    boot_delay_ms: u32,

    /// Per-module tick budget; overruns are logged and counted
    #[arg(long, value_name = "US")]
    tick_budget_us: Option<u64>,

    #[arg(long, value_enum, default_value_t = SetupFailure::Halt)]
    on_setup_failure: SetupFailure,

    #[arg(long, default_value_t = 0, value_name = "N")]
    setup_retries: u8,

    /// Controlled restarts allowed after fatal faults
    #[arg(long, default_value_t = 0, value_name = "N")]
    max_restarts: u32,

    /// Record a lifecycle trace and print a summary at exit
    #[arg(long)]
    trace: bool,
}

impl Opts {
    fn host_config(&self) -> HostConfig {
        let mut builder = OrchestratorConfig::builder()
            .boot_delay_ms(self.boot_delay_ms)
            .on_setup_failure(self.on_setup_failure.into())
            .setup_retries(self.setup_retries);
        if let Some(micros) = self.tick_budget_us {
            builder = builder.tick_budget(TickBudget::from_micros(micros));
        }

        HostConfig {
            orchestrator: builder.build(),
            iterations: self.iterations,
            max_restarts: self.max_restarts,
        }
    }
}

fn print_trace_summary() {
    let (total, dropped) = TRACE.with(|buf| (buf.total(), buf.dropped()));
    let (mut inits, mut ticks) = (0u64, 0u64);
    let mut notable = Vec::new();
    while let Some(record) = TRACE.pop() {
        match record {
            TraceRecord::Initialize { .. } => inits += 1,
            TraceRecord::Tick { .. } => ticks += 1,
            TraceRecord::Fault { .. } | TraceRecord::Overrun { .. } => notable.push(record),
        }
    }

    println!("trace: {total} records ({dropped} dropped), kept {inits} init, {ticks} tick");
    for record in notable {
        println!("  {record}");
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();
    let config = opts.host_config();

    let stop = install_stop_handler().context("setting up Ctrl-C handling")?;
    let mut hook: Box<dyn LifecycleHook> = if opts.trace {
        Box::new(&TRACE)
    } else {
        Box::new(NoHook)
    };

    let result = run_host(&config, StdPlatform::stdout, &mut *hook, &stop);
    if opts.trace {
        print_trace_summary();
    }

    let report = result.context("neurolink run failed")?;
    if report.interrupted {
        println!("stopped after {} sweeps", report.sweeps);
    }
    if report.restarts > 0 {
        println!("restarts: {}", report.restarts);
    }
    println!("{}", report.stats);
    Ok(())
}
