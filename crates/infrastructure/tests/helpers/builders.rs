use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::TXT;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::time::Duration;

pub const SHORT_TIMEOUT: Duration = Duration::from_millis(300);

pub fn name(domain: &str) -> Name {
    Name::from_ascii(domain).unwrap()
}

pub fn query(domain: &str, record_type: RecordType) -> Message {
    query_with_id(domain, record_type, 0x1234)
}

pub fn query_with_id(domain: &str, record_type: RecordType, id: u16) -> Message {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(Query::query(name(domain), record_type));
    message
}

pub fn query_with_edns(domain: &str, record_type: RecordType) -> Message {
    let mut message = query(domain, record_type);
    let mut edns = Edns::new();
    edns.set_max_payload(1232);
    message.set_edns(edns);
    message
}

/// A query with `count` identical questions for `domain`.
pub fn query_with_questions(domain: &str, count: usize) -> Message {
    let mut message = Message::new();
    message
        .set_id(0x2222)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query);
    for _ in 0..count {
        message.add_query(Query::query(name(domain), RecordType::A));
    }
    message
}

/// A scripted TXT answer. Its id deliberately differs from the queries
/// built above.
pub fn txt_response(domain: &str, text: &str) -> Message {
    let mut message = Message::new();
    message
        .set_id(0xbeef)
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query);
    message.add_query(Query::query(name(domain), RecordType::TXT));
    message.add_answer(Record::from_rdata(
        name(domain),
        3600,
        RData::TXT(TXT::new(vec![text.to_string()])),
    ));
    message
}

pub fn first_txt(message: &Message) -> Option<String> {
    message.answers().iter().find_map(|record| match record.data() {
        RData::TXT(txt) => Some(
            txt.iter()
                .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
                .collect(),
        ),
        _ => None,
    })
}

pub fn first_ip(message: &Message) -> Option<std::net::IpAddr> {
    message.answers().iter().find_map(|record| match record.data() {
        RData::A(a) => Some(std::net::IpAddr::V4(a.0)),
        RData::AAAA(aaaa) => Some(std::net::IpAddr::V6(aaaa.0)),
        _ => None,
    })
}
