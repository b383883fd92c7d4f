mod server;

pub use server::{running_pid, Daemon};
