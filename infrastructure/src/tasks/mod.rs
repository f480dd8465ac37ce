//! Per-agent FIFO task queues.
//!
//! Tasks bypass the channel bus: they are pushed by the `task` handler and
//! popped by the addressed agent at its own pace.

mod file;
mod memory;

pub use file::FileTaskQueue;
pub use memory::InMemoryTaskQueue;
