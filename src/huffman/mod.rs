pub mod codes;
pub mod frequency;
pub mod queue;
pub mod tree;

pub use codes::{Code, CodeTable, MAX_CODE_LENGTH};
pub use frequency::Histogram;
pub use queue::{PriorityQueue, QueueEntry};
pub use tree::{HuffmanNode, HuffmanTree};
