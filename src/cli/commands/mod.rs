mod jobs;
mod sweep;

pub use jobs::cmd_list_jobs;
pub use sweep::cmd_sweep;
