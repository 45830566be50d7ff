//! Render worker task
//!
//! Runs alone on core 1. A jammed flush parks this executor and nothing
//! else; the main loop on core 0 keeps supervising it.

use defmt::*;
use pixelwatch_core::render::RenderWorker;

use crate::channels::RENDER;
use crate::config::{CHANNEL_COUNT, FORCE_UNLOCK};
use crate::display::DisplayRenderer;

/// Render worker task
#[embassy_executor::task]
pub async fn render_worker_task(renderer: DisplayRenderer) {
    info!(
        "Render worker started: {} channels, unlock {}",
        CHANNEL_COUNT,
        if FORCE_UNLOCK { "enabled" } else { "disabled" }
    );

    RenderWorker::new(&RENDER, renderer, CHANNEL_COUNT, FORCE_UNLOCK)
        .run()
        .await
}
