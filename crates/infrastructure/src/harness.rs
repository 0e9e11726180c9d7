//! Suite-level fixture: responders, the SUT and the client driver wired
//! together around one pair of exchange queues and one response counter.

use dns_harness_application::ports::SutProcess;
use dns_harness_application::{ExchangeQueues, ResponseCounter, ResponseDecider};
use dns_harness_domain::{HarnessConfig, HarnessError, ResponderId, TestDomain};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::dns::client::{ClientDriver, QueryOptions};
use crate::dns::responder::{ResponderPair, ResponderTasks};
use crate::sut::SutConfigTemplate;

pub struct Harness {
    config: HarnessConfig,
    queues: Arc<ExchangeQueues>,
    counter: Arc<ResponseCounter>,
    responder_addr: SocketAddr,
    responders: ResponderTasks,
    client: ClientDriver,
    sut: Option<Box<dyn SutProcess>>,
}

impl Harness {
    /// Start responders, then the SUT (when given), then the client socket.
    ///
    /// Without a SUT the client driver talks to the responders directly,
    /// which is how the harness tests itself.
    pub async fn start(
        config: HarnessConfig,
        mut sut: Option<Box<dyn SutProcess>>,
    ) -> Result<Self, HarnessError> {
        config.validate()?;

        let queues = Arc::new(ExchangeQueues::new());
        let counter = Arc::new(ResponseCounter::new());

        let test_domain = TestDomain::new(&config.responder.test_domain)?;
        let decider = ResponseDecider::new(
            ResponderId::udp(),
            test_domain,
            queues.clone(),
            counter.clone(),
        );

        let pair = ResponderPair::bind_with(
            config.responder.socket_addr()?,
            &decider,
            config.responder.tcp_backlog,
            config.responder.tcp_session_timeout(),
        )?;
        let responder_addr = pair.local_addr()?;
        let responders = pair.spawn();

        // Past this point the responders own the port; every failure must
        // release it before returning.
        let connected =
            connect_through_sut(&config, sut.as_deref_mut(), responder_addr, &queues).await;
        let (client_target, client) = match connected {
            Ok(connected) => connected,
            Err(e) => {
                warn!(error = %e, "Harness start-up failed, releasing responders");
                if let Some(sut) = sut.as_mut() {
                    if let Err(stop_err) = sut.stop().await {
                        warn!(error = %stop_err, "Failed to stop system under test");
                    }
                }
                responders.shutdown().await;
                return Err(e);
            }
        };

        info!(
            responders = %responder_addr,
            target = %client_target,
            test_domain = %decider.test_domain(),
            "Harness ready"
        );

        Ok(Self {
            config,
            queues,
            counter,
            responder_addr,
            responders,
            client,
            sut,
        })
    }

    /// Forget whatever a previous test left behind.
    pub fn begin_test(&self) {
        self.counter.reset();
        self.queues.clear();
    }

    pub fn client(&self) -> &ClientDriver {
        &self.client
    }

    pub fn queues(&self) -> &Arc<ExchangeQueues> {
        &self.queues
    }

    pub fn counter(&self) -> &Arc<ResponseCounter> {
        &self.counter
    }

    pub fn responder_addr(&self) -> SocketAddr {
        self.responder_addr
    }

    pub fn responders_running(&self) -> bool {
        self.responders.is_running()
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Query options carrying the configured client timeout.
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions::default().with_timeout(self.config.client.timeout())
    }

    /// Stop the SUT. Responders keep running until the runtime ends.
    pub async fn stop(&mut self) -> Result<(), HarnessError> {
        if let Some(sut) = self.sut.as_mut() {
            sut.stop().await?;
        }
        Ok(())
    }
}

/// Start the SUT when there is one and connect the client to whichever
/// address it should talk to.
async fn connect_through_sut(
    config: &HarnessConfig,
    sut: Option<&mut (dyn SutProcess + 'static)>,
    responder_addr: SocketAddr,
    queues: &Arc<ExchangeQueues>,
) -> Result<(SocketAddr, ClientDriver), HarnessError> {
    let client_target = match sut {
        Some(sut) => {
            let config_path = PathBuf::from(&config.sut.config_path);
            load_template(config)?.write_to(
                &config_path,
                &[("responder_port", responder_addr.port().to_string())],
            )?;

            let listen_addr = config.sut.listen_addr()?;
            sut.start(&config_path, listen_addr, &config.sut.acl).await?;
            listen_addr
        }
        None => responder_addr,
    };

    let client = ClientDriver::connect(client_target, queues.clone()).await?;
    Ok((client_target, client))
}

fn load_template(config: &HarnessConfig) -> Result<SutConfigTemplate, HarnessError> {
    if config.sut.template_path.is_empty() {
        Ok(SutConfigTemplate::dnsdist_default())
    } else {
        SutConfigTemplate::from_file(Path::new(&config.sut.template_path))
    }
}
