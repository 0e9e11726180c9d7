//! Response decision shared by the UDP and TCP responders.
//!
//! A query for a name inside the test domain is answered with the next
//! scripted response when one is queued. Anything else (health checks,
//! queries a test did not script) gets a synthesized default answer.

use dns_harness_domain::{HarnessError, ResponderId, TestDomain};
use hickory_proto::op::{Edns, Message, MessageType};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{DNSClass, RData, Record, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use tracing::debug;

use crate::services::{ExchangeQueues, ResponseCounter};

/// TTL of the synthesized A/AAAA answers.
pub const DEFAULT_ANSWER_TTL: u32 = 3600;

/// Advertised payload size when the query carried EDNS.
pub const DEFAULT_EDNS_PAYLOAD: u16 = 8192;

/// Decode a wire message and check it carries exactly one question.
pub fn decode_query(bytes: &[u8]) -> Result<Message, HarnessError> {
    let message = Message::from_vec(bytes).map_err(|e| HarnessError::Decode(e.to_string()))?;

    match message.queries().len() {
        1 => Ok(message),
        count => Err(HarnessError::QuestionCount(count)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePath {
    /// Served from the scripted-response queue.
    Scripted,
    /// Synthesized locally.
    Default,
}

#[derive(Debug)]
pub struct Reply {
    pub message: Message,
    pub path: ResponsePath,
}

#[derive(Clone)]
pub struct ResponseDecider {
    identity: ResponderId,
    test_domain: TestDomain,
    queues: Arc<ExchangeQueues>,
    counter: Arc<ResponseCounter>,
}

impl ResponseDecider {
    pub fn new(
        identity: ResponderId,
        test_domain: TestDomain,
        queues: Arc<ExchangeQueues>,
        counter: Arc<ResponseCounter>,
    ) -> Self {
        Self {
            identity,
            test_domain,
            queues,
            counter,
        }
    }

    /// Same queues, counter and test domain under another identity.
    pub fn with_identity(&self, identity: ResponderId) -> Self {
        Self {
            identity,
            ..self.clone()
        }
    }

    pub fn identity(&self) -> &ResponderId {
        &self.identity
    }

    pub fn test_domain(&self) -> &TestDomain {
        &self.test_domain
    }

    /// Answer a decoded single-question query.
    ///
    /// On the scripted path the popped response takes the query's id, the
    /// query itself is queued for the test to inspect and the counter for
    /// this responder goes up by one. The default path touches neither
    /// queue nor counter.
    pub fn respond(&self, query: Message) -> Reply {
        if self.in_test_domain(&query) {
            if let Some(mut response) = self.queues.pop_response() {
                response.set_id(query.id());
                debug!(
                    responder = %self.identity,
                    id = query.id(),
                    name = %first_name(&query),
                    "Serving scripted response"
                );
                self.queues.push_query(query);
                self.counter.increment(&self.identity);
                return Reply {
                    message: response,
                    path: ResponsePath::Scripted,
                };
            }
        }

        debug!(
            responder = %self.identity,
            id = query.id(),
            name = %first_name(&query),
            "Serving default response"
        );
        Reply {
            message: default_response(&query),
            path: ResponsePath::Default,
        }
    }

    fn in_test_domain(&self, query: &Message) -> bool {
        query
            .queries()
            .first()
            .is_some_and(|q| self.test_domain.contains(&q.name().to_ascii()))
    }
}

/// The reply given to health checks and unscripted queries: 127.0.0.1 for
/// IN A, ::1 for IN AAAA, an empty answer otherwise.
pub fn default_response(query: &Message) -> Message {
    let mut response = Message::new();
    response
        .set_id(query.id())
        .set_message_type(MessageType::Response)
        .set_op_code(query.op_code())
        .set_recursion_desired(query.recursion_desired());
    response.add_queries(query.queries().iter().cloned());

    if let Some(question) = query.queries().first() {
        if question.query_class() == DNSClass::IN {
            let rdata = match question.query_type() {
                RecordType::A => Some(RData::A(A(Ipv4Addr::LOCALHOST))),
                RecordType::AAAA => Some(RData::AAAA(AAAA(Ipv6Addr::LOCALHOST))),
                _ => None,
            };
            if let Some(rdata) = rdata {
                response.add_answer(Record::from_rdata(
                    question.name().clone(),
                    DEFAULT_ANSWER_TTL,
                    rdata,
                ));
            }
        }
    }

    if query.extensions().is_some() {
        let mut edns = Edns::new();
        edns.set_max_payload(DEFAULT_EDNS_PAYLOAD);
        response.set_edns(edns);
    }

    response
}

fn first_name(query: &Message) -> String {
    query
        .queries()
        .first()
        .map(|q| q.name().to_ascii())
        .unwrap_or_default()
}
