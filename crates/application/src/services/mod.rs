mod exchange_queues;
mod response_counter;

pub use exchange_queues::ExchangeQueues;
pub use response_counter::ResponseCounter;
