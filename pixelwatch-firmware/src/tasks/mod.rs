//! Embassy async tasks
//!
//! Each task runs on its own executor and communicates through the
//! statics in `channels`.

pub mod pulse;
pub mod render_loop;
pub mod render_worker;

pub use pulse::pulse_task;
pub use render_loop::render_loop_task;
pub use render_worker::render_worker_task;
