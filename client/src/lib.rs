//! Bookclub web client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Built twice: as an `rlib` with `ssr` for the server to render, and as a
//! `cdylib` with `hydrate` for the browser. Browser-only code sits behind
//! `#[cfg(feature = "hydrate")]` with inert SSR stand-ins.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
