//! Render supervisor
//!
//! Decouples asking for a frame ([`RenderTrigger`]) from performing the
//! blocking hardware flush ([`RenderWorker`]). The two only share a
//! [`RenderShared`].

pub mod shared;
pub mod state;
pub mod trigger;
pub mod worker;

pub use shared::{HoldGate, RenderShared};
pub use state::RenderState;
pub use trigger::{RenderTrigger, Tick};
pub use worker::{FlushOutcome, RenderWorker};
