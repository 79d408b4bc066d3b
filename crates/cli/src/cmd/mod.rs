mod lock;

pub use lock::{LockArgs, cmd_lock};
