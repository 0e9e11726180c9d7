mod decide_response;

pub use decide_response::{
    decode_query, default_response, Reply, ResponseDecider, ResponsePath, DEFAULT_ANSWER_TTL,
    DEFAULT_EDNS_PAYLOAD,
};
