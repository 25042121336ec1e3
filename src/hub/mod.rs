pub mod drivers;
pub mod sink;

pub use drivers::node_definitions;
pub use sink::NodeSink;
