#![allow(dead_code)]
pub mod builders;
pub mod forwarding_proxy;

pub use builders::*;
pub use forwarding_proxy::ForwardingProxy;

use dns_harness_application::{ExchangeQueues, ResponseCounter, ResponseDecider};
use dns_harness_domain::{ResponderId, TestDomain};
use dns_harness_infrastructure::{ResponderPair, ResponderTasks};
use std::net::SocketAddr;
use std::sync::{Arc, Once};

/// Install a global subscriber whose output is captured per test.
pub fn subscribe() {
    static INSTALL_TRACING_SUBSCRIBER: Once = Once::new();
    INSTALL_TRACING_SUBSCRIBER.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).unwrap();
    });
}

/// A responder pair listening on an ephemeral loopback port.
pub struct Responders {
    pub addr: SocketAddr,
    pub queues: Arc<ExchangeQueues>,
    pub counter: Arc<ResponseCounter>,
    pub tasks: ResponderTasks,
}

impl Drop for Responders {
    fn drop(&mut self) {
        self.tasks.abort();
    }
}

pub fn spawn_responders() -> Responders {
    subscribe();

    let queues = Arc::new(ExchangeQueues::new());
    let counter = Arc::new(ResponseCounter::new());
    let decider = ResponseDecider::new(
        ResponderId::udp(),
        TestDomain::default(),
        queues.clone(),
        counter.clone(),
    );

    let pair = ResponderPair::bind("127.0.0.1:0".parse().unwrap(), &decider).unwrap();
    let addr = pair.local_addr().unwrap();

    Responders {
        addr,
        queues,
        counter,
        tasks: pair.spawn(),
    }
}
