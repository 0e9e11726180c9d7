#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::TXT;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};

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

pub fn query_with_class(domain: &str, record_type: RecordType, class: DNSClass) -> Message {
    let mut question = Query::query(name(domain), record_type);
    question.set_query_class(class);

    let mut message = Message::new();
    message.set_id(0x4242).set_message_type(MessageType::Query);
    message.add_query(question);
    message
}

/// A scripted TXT answer for `domain`, carrying a deliberately wrong id.
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
