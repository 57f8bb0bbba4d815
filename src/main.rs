//! HyperTunnel entry point
//!
//! On the web this mounts the particle background and the mini-game onto the
//! host page. Natively it runs a short headless simulation for smoke testing.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::MouseEvent;

    use hypertunnel::platform::web::{MiniGame, ParticleBackground, Subscription};

    const BACKGROUND_CANVAS: &str = "background";
    const GAME_CANVAS: &str = "play-canvas";
    const TOGGLE_BUTTON: &str = "play-toggle";
    const SCORE_LABEL: &str = "play-score";

    /// Everything mounted on the page. Fields drop in order, controls first.
    struct App {
        controls: Vec<Subscription>,
        game: Rc<MiniGame>,
        background: Option<ParticleBackground>,
    }

    thread_local! {
        static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    }

    fn toggle_label(playing: bool) -> &'static str {
        if playing { "Pause" } else { "Resume" }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("HyperTunnel starting...");

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // The background is decoration; the page still works without it
        let background = match ParticleBackground::mount(BACKGROUND_CANVAS) {
            Ok(background) => Some(background),
            Err(e) => {
                log::warn!("Particle background unavailable: {:?}", e);
                None
            }
        };

        let game = Rc::new(MiniGame::mount(GAME_CANVAS)?);

        if let Some(label) = document.get_element_by_id(SCORE_LABEL) {
            game.set_score_observer(move |score| {
                label.set_text_content(Some(&score.to_string()));
            });
        }

        let mut controls = Vec::new();
        if let Some(button) = document.get_element_by_id(TOGGLE_BUTTON) {
            button.set_text_content(Some(toggle_label(game.is_playing())));
            let target = button.clone();
            let game = Rc::downgrade(&game);
            controls.push(Subscription::listen(
                &button,
                "click",
                move |_: MouseEvent| {
                    if let Some(game) = game.upgrade() {
                        let playing = game.toggle();
                        target.set_text_content(Some(toggle_label(playing)));
                    }
                },
            )?);
        }

        APP.with(|app| {
            *app.borrow_mut() = Some(App {
                controls,
                game,
                background,
            });
        });

        log::info!("HyperTunnel running!");
        Ok(())
    }

    pub fn unmount() {
        let app = APP.with(|app| app.borrow_mut().take());
        if let Some(App {
            controls,
            game,
            background,
        }) = app
        {
            drop(controls);
            match Rc::try_unwrap(game) {
                Ok(mut game) => game.dispose(),
                Err(_) => log::warn!("Mini-game still shared at unmount"),
            }
            if let Some(mut background) = background {
                background.dispose();
            }
            log::info!("HyperTunnel unmounted");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

/// Tear down everything mounted by `wasm_main`
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn unmount() {
    wasm_app::unmount();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("HyperTunnel (native) starting...");
    log::info!("Rendering requires a browser - build for wasm32 to play");

    run_headless(0x5eed, 600);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Step the simulation for `frames` frames at 60 fps while the pointer sweeps
/// back and forth across the bottom of an 800x600 surface.
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(seed: u64, frames: u32) {
    use glam::Vec2;
    use hypertunnel::input::{ClientRect, apply_pointer};
    use hypertunnel::sim::{Bounds, GameState, frame_dt, step};

    let rect = ClientRect::new(0.0, 0.0, 800.0, 600.0);
    let mut state = GameState::new(seed, Bounds::new(rect.width, rect.height));
    let dt = frame_dt(1000.0 / 60.0);

    let (mut collected, mut hits) = (0u32, 0u32);
    for frame in 0..frames {
        let phase = (frame as f32 / 120.0) * std::f32::consts::TAU;
        let pointer = Vec2::new(400.0 + phase.sin() * 350.0, 480.0);
        apply_pointer(&mut state.player, pointer, rect);

        let report = step(&mut state, dt);
        collected += report.collected;
        hits += report.hits;
    }

    log::info!(
        "Headless run: {} frames, {} orbs collected, {} hazard hits, final score {}",
        state.frames,
        collected,
        hits,
        state.score
    );
    println!("Final score: {}", state.score);
}
