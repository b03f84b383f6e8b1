mod consumer;
mod discovery;
mod kvform;

pub use consumer::HttpConsumer;
