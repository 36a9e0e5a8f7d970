mod match_queue;

pub use match_queue::*;
