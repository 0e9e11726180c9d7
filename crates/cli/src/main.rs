use clap::{Parser, Subcommand};
use dns_harness_application::{ExchangeQueues, ResponseCounter, ResponseDecider};
use dns_harness_domain::{CliOverrides, HarnessConfig, HarnessError, ResponderId, TestDomain};
use dns_harness_infrastructure::{Harness, ProcessSupervisor, ResponderPair};
use std::sync::Arc;
use tracing::{error, info};

mod bootstrap;

#[derive(Parser)]
#[command(name = "dns-harness")]
#[command(version)]
#[command(about = "Scripted upstream responders for DNS proxy regression tests")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Responder port (UDP and TCP)
    #[arg(short = 'p', long, global = true)]
    responder_port: Option<u16>,

    /// Port the system under test listens on
    #[arg(long, global = true)]
    sut_port: Option<u16>,

    /// Binary of the system under test
    #[arg(long, global = true)]
    sut_binary: Option<String>,

    /// Domain whose queries are answered from the script queue
    #[arg(long, global = true)]
    test_domain: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run only the UDP and TCP responders
    Serve,
    /// Start the responders and the system under test, then wait for Ctrl-C
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        responder_port: cli.responder_port,
        sut_port: cli.sut_port,
        sut_binary: cli.sut_binary.clone(),
        test_domain: cli.test_domain.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!("Starting dns-harness v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Command::Serve => serve(config).await,
        Command::Run => run(config).await,
    };

    if let Err(e) = result {
        error!(error = %e, "dns-harness failed");
        std::process::exit(e.exit_code());
    }

    info!("Shutdown complete");
    Ok(())
}

async fn serve(config: HarnessConfig) -> Result<(), HarnessError> {
    let decider = ResponseDecider::new(
        ResponderId::udp(),
        TestDomain::new(&config.responder.test_domain)?,
        Arc::new(ExchangeQueues::new()),
        Arc::new(ResponseCounter::new()),
    );

    let pair = ResponderPair::bind_with(
        config.responder.socket_addr()?,
        &decider,
        config.responder.tcp_backlog,
        config.responder.tcp_session_timeout(),
    )?;
    let addr = pair.local_addr()?;
    let mut tasks = pair.spawn();

    info!(address = %addr, test_domain = %decider.test_domain(), "Responders ready");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Received SIGINT, shutting down"),
        _ = &mut tasks.udp => error!("UDP responder stopped"),
        _ = &mut tasks.tcp => error!("TCP responder stopped"),
    }

    tasks.abort();
    Ok(())
}

async fn run(config: HarnessConfig) -> Result<(), HarnessError> {
    let supervisor = ProcessSupervisor::new(config.sut.resolved_binary())
        .quiet(config.sut.quiet)
        .startup_grace(config.sut.startup_grace());

    let mut harness = Harness::start(config, Some(Box::new(supervisor))).await?;

    info!(
        sut = %harness.client().sut_addr(),
        responders = %harness.responder_addr(),
        "Harness running, press Ctrl-C to stop"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
    }

    harness.stop().await
}
