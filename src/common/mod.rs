mod queue;

pub use queue::BroadcastQueue;
