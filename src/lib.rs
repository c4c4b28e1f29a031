//! Dino Dash core crate.
//!
//! A single-screen endless runner: the dino jumps over incoming cacti, the
//! score ticks up for every cactus that scrolls off the left edge, and the
//! scroll speed ramps with score. All game rules live in [`runner::sim`] and
//! are free of browser APIs so they run under plain `cargo test`; the DOM
//! wiring and the `requestAnimationFrame` loop live in [`runner`].

use wasm_bindgen::prelude::*;

pub mod runner;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Wire up the DOM and kick off sprite loading. The frame loop starts only
/// once the dino sprite sheet reports loaded.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    runner::start_runner_mode()
}
