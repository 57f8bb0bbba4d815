//! Browser glue (wasm32 only)

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, MouseEvent, PointerEvent};

use crate::background::{BackgroundScene, ParticleField, SceneParams};
use crate::driver::{AnimationDriver, FrameScheduler};
use crate::input::{ClientRect, apply_pointer, normalized_offset};
use crate::renderer::{ParticleRenderState, render_frame};
use crate::settings::Settings;
use crate::sim::{Bounds, GameState, step};

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type ScoreObserver = Rc<RefCell<Option<Box<dyn FnMut(u64)>>>>;

// ============================================================================
// DOM HELPERS
// ============================================================================

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{}", id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("#{} is not a canvas", id)))
}

/// High resolution timestamp on the same timeline as rAF callbacks
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

fn client_rect(element: &web_sys::Element) -> ClientRect {
    let rect = element.get_bounding_client_rect();
    ClientRect::new(
        rect.left() as f32,
        rect.top() as f32,
        rect.width() as f32,
        rect.height() as f32,
    )
}

/// Match the canvas backing store to its CSS size times `pixel_ratio`
fn fit_canvas(canvas: &HtmlCanvasElement, pixel_ratio: f64) -> (u32, u32) {
    let width = (f64::from(canvas.client_width()) * pixel_ratio) as u32;
    let height = (f64::from(canvas.client_height()) * pixel_ratio) as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    (width, height)
}

// ============================================================================
// SUBSCRIPTIONS
// ============================================================================

/// An event listener that is removed on [`dispose`](Self::dispose) or drop
pub struct Subscription {
    target: EventTarget,
    event: &'static str,
    callback: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

impl Subscription {
    /// Listen for `event` on `target`. Events that are not an `E` are ignored.
    pub fn listen<E>(
        target: &EventTarget,
        event: &'static str,
        mut handler: impl FnMut(E) + 'static,
    ) -> Result<Self, JsValue>
    where
        E: JsCast + 'static,
    {
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            if let Ok(event) = event.dyn_into::<E>() {
                handler(event);
            }
        });
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback: Some(callback),
        })
    }

    pub fn dispose(&mut self) {
        if let Some(callback) = self.callback.take() {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.event, callback.as_ref().unchecked_ref());
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ============================================================================
// FRAME SCHEDULING
// ============================================================================

/// `requestAnimationFrame` backed scheduler. The callback lives in a shared
/// slot filled once the owning component exists.
pub struct RafScheduler {
    window: web_sys::Window,
    callback: FrameSlot,
}

impl RafScheduler {
    fn new(window: web_sys::Window, callback: FrameSlot) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for RafScheduler {
    type Handle = i32;

    fn schedule(&mut self) -> i32 {
        let slot = self.callback.borrow();
        let Some(callback) = slot.as_ref() else {
            log::warn!("Frame requested before callback was installed");
            return 0;
        };
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .unwrap_or_else(|e| {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                0
            })
    }

    fn cancel(&mut self, handle: i32) {
        let _ = self.window.cancel_animation_frame(handle);
    }
}

// ============================================================================
// MINI-GAME
// ============================================================================

struct GameInner {
    state: GameState,
    driver: AnimationDriver<RafScheduler>,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    settings: Settings,
    last_published: Option<u64>,
}

impl GameInner {
    /// Step, paint, and return the score if it should be published
    fn on_frame(&mut self, timestamp: f64) -> Option<u64> {
        let Self {
            state,
            driver,
            ctx,
            settings,
            ..
        } = self;
        let ran = driver.frame(timestamp, |dt| {
            step(state, dt);
            render_frame(ctx, state, timestamp, settings);
        });

        if !ran || self.last_published == Some(self.state.score) {
            return None;
        }
        self.last_published = Some(self.state.score);
        Some(self.state.score)
    }

    fn resize(&mut self) {
        let (width, height) = fit_canvas(&self.canvas, 1.0);
        self.state.resize(Bounds::new(width as f32, height as f32));
    }
}

/// The HyperTunnel mini-game mounted on a 2D canvas
#[wasm_bindgen]
pub struct MiniGame {
    inner: Rc<RefCell<GameInner>>,
    frame_slot: FrameSlot,
    observer: ScoreObserver,
    subscriptions: Vec<Subscription>,
    disposed: bool,
}

#[wasm_bindgen]
impl MiniGame {
    /// Mount on the canvas with the given element id and start playing
    pub fn mount(canvas_id: &str) -> Result<MiniGame, JsValue> {
        let window = window()?;
        let canvas = canvas_by_id(canvas_id)?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let (width, height) = fit_canvas(&canvas, 1.0);
        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();

        let frame_slot: FrameSlot = Rc::new(RefCell::new(None));
        let inner = Rc::new(RefCell::new(GameInner {
            state: GameState::new(seed, Bounds::new(width as f32, height as f32)),
            driver: AnimationDriver::new(RafScheduler::new(window.clone(), frame_slot.clone())),
            canvas: canvas.clone(),
            ctx,
            settings,
            last_published: None,
        }));
        let observer: ScoreObserver = Rc::new(RefCell::new(None));

        {
            let inner = Rc::downgrade(&inner);
            let observer = observer.clone();
            *frame_slot.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
                let Some(inner) = inner.upgrade() else { return };
                // Borrow released before calling out to the observer
                let published = inner.borrow_mut().on_frame(timestamp);
                if let Some(score) = published {
                    if let Ok(mut observer) = observer.try_borrow_mut() {
                        if let Some(notify) = observer.as_mut() {
                            notify(score);
                        }
                    }
                }
            }));
        }

        let mut subscriptions = Vec::new();
        {
            let inner = inner.clone();
            let target = canvas.clone();
            subscriptions.push(Subscription::listen(
                &canvas,
                "mousemove",
                move |event: MouseEvent| {
                    let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                    let rect = client_rect(&target);
                    apply_pointer(&mut inner.borrow_mut().state.player, client, rect);
                },
            )?);
        }
        {
            let inner = inner.clone();
            subscriptions.push(Subscription::listen(
                &window,
                "resize",
                move |_: web_sys::Event| inner.borrow_mut().resize(),
            )?);
        }

        inner.borrow_mut().driver.start(now_ms());
        log::info!(
            "Mini-game mounted on #{} ({}x{}, seed {})",
            canvas_id,
            width,
            height,
            inner.borrow().state.seed
        );

        Ok(MiniGame {
            inner,
            frame_slot,
            observer,
            subscriptions,
            disposed: false,
        })
    }

    /// Flip play/pause. Returns true if the game is now running.
    pub fn toggle(&self) -> bool {
        self.inner.borrow_mut().driver.toggle(now_ms())
    }

    pub fn is_playing(&self) -> bool {
        self.inner.borrow().driver.is_running()
    }

    pub fn score(&self) -> f64 {
        self.inner.borrow().state.score as f64
    }

    /// Register a JS callback that receives the score after a frame.
    ///
    /// Called on the first frame and then only on frames where the score
    /// changed; repeating an unchanged score is skipped.
    pub fn on_score(&self, callback: js_sys::Function) {
        self.set_score_observer(move |score| {
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_f64(score as f64));
        });
    }

    /// Stop the loop and release listeners. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        match self.inner.try_borrow_mut() {
            Ok(mut inner) => inner.driver.teardown(),
            Err(_) => log::warn!("Mini-game disposed while busy"),
        }
        for subscription in &mut self.subscriptions {
            subscription.dispose();
        }
        self.subscriptions.clear();
        self.frame_slot.borrow_mut().take();
        // Disposing from inside the observer leaves it to be dropped with us
        if let Ok(mut observer) = self.observer.try_borrow_mut() {
            observer.take();
        }
        log::info!("Mini-game disposed");
    }
}

impl MiniGame {
    /// Rust-side score observer, called after the frame that changed the score
    pub fn set_score_observer(&self, observer: impl FnMut(u64) + 'static) {
        *self.observer.borrow_mut() = Some(Box::new(observer));
    }
}

impl Drop for MiniGame {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ============================================================================
// PARTICLE BACKGROUND
// ============================================================================

struct BackgroundInner {
    scene: BackgroundScene,
    render_state: Option<ParticleRenderState>,
    driver: AnimationDriver<RafScheduler>,
    canvas: HtmlCanvasElement,
    start_ms: f64,
    pixel_ratio: f64,
    disposed: bool,
}

impl BackgroundInner {
    fn on_frame(&mut self, timestamp: f64) {
        let Self {
            scene,
            render_state,
            driver,
            start_ms,
            ..
        } = self;
        driver.frame(timestamp, |_| {
            let t = ((timestamp - *start_ms) / 1000.0) as f32;
            scene.update(t);
            if let Some(render_state) = render_state.as_mut() {
                render_state.render_or_recover(scene);
            }
        });
    }

    fn resize(&mut self) {
        let (width, height) = fit_canvas(&self.canvas, self.pixel_ratio);
        self.scene.set_viewport(width, height);
        if let Some(render_state) = self.render_state.as_mut() {
            render_state.resize(width, height);
        }
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.driver.teardown();
        if let Some(render_state) = self.render_state.take() {
            render_state.dispose();
        }
    }
}

/// Decorative WebGPU point cloud behind the hero section
#[wasm_bindgen]
pub struct ParticleBackground {
    inner: Rc<RefCell<BackgroundInner>>,
    frame_slot: FrameSlot,
    subscriptions: Vec<Subscription>,
    disposed: bool,
}

#[wasm_bindgen]
impl ParticleBackground {
    /// Mount on the canvas with the given element id. GPU setup finishes asynchronously;
    /// frames before that only advance the scene.
    pub fn mount(canvas_id: &str) -> Result<ParticleBackground, JsValue> {
        let window = window()?;
        let canvas = canvas_by_id(canvas_id)?;
        let settings = Settings::load();

        let pixel_ratio = window.device_pixel_ratio().min(settings.quality.max_pixel_ratio());
        let (width, height) = fit_canvas(&canvas, pixel_ratio);

        let mut scene = BackgroundScene::new(SceneParams::default());
        scene.set_viewport(width, height);
        scene.parallax = settings.parallax_enabled();
        scene.spin = !settings.reduced_motion;

        let frame_slot: FrameSlot = Rc::new(RefCell::new(None));
        let inner = Rc::new(RefCell::new(BackgroundInner {
            scene,
            render_state: None,
            driver: AnimationDriver::new(RafScheduler::new(window.clone(), frame_slot.clone())),
            canvas: canvas.clone(),
            start_ms: now_ms(),
            pixel_ratio,
            disposed: false,
        }));

        {
            let inner = Rc::downgrade(&inner);
            *frame_slot.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
                if let Some(inner) = inner.upgrade() {
                    inner.borrow_mut().on_frame(timestamp);
                }
            }));
        }

        let mut subscriptions = Vec::new();
        {
            let inner = inner.clone();
            let target = canvas.clone();
            subscriptions.push(Subscription::listen(
                &window,
                "pointermove",
                move |event: PointerEvent| {
                    let client = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                    let offset = normalized_offset(client, client_rect(&target));
                    inner.borrow_mut().scene.set_pointer(offset);
                },
            )?);
        }
        {
            let inner = inner.clone();
            subscriptions.push(Subscription::listen(
                &window,
                "resize",
                move |_: web_sys::Event| inner.borrow_mut().resize(),
            )?);
        }

        let seed = js_sys::Date::now() as u64;
        let field = ParticleField::generate(settings.quality.background_particles(), seed);
        wasm_bindgen_futures::spawn_local(init_gpu(inner.clone(), canvas, width, height, field));

        inner.borrow_mut().driver.start(now_ms());
        log::info!(
            "Particle background mounted on #{} ({}x{} @{}x)",
            canvas_id,
            width,
            height,
            pixel_ratio
        );

        Ok(ParticleBackground {
            inner,
            frame_slot,
            subscriptions,
            disposed: false,
        })
    }

    /// Stop the loop, release listeners and GPU resources. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        match self.inner.try_borrow_mut() {
            Ok(mut inner) => inner.dispose(),
            Err(_) => log::warn!("Particle background disposed while busy"),
        }
        for subscription in &mut self.subscriptions {
            subscription.dispose();
        }
        self.subscriptions.clear();
        self.frame_slot.borrow_mut().take();
        log::info!("Particle background disposed");
    }
}

impl Drop for ParticleBackground {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Create the wgpu surface and pipeline, then hand them to the running loop
async fn init_gpu(
    inner: Rc<RefCell<BackgroundInner>>,
    canvas: HtmlCanvasElement,
    width: u32,
    height: u32,
    field: ParticleField,
) {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
        ..Default::default()
    });

    let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas)) {
        Ok(surface) => surface,
        Err(e) => {
            log::error!("Failed to create particle surface: {}", e);
            return;
        }
    };

    let adapter = match instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
    {
        Ok(adapter) => adapter,
        Err(e) => {
            log::error!("No GPU adapter for particle background: {}", e);
            return;
        }
    };
    log::info!("Using adapter: {:?}", adapter.get_info().name);

    let render_state = match ParticleRenderState::new(surface, &adapter, width, height, &field).await {
        Ok(render_state) => render_state,
        Err(e) => {
            log::error!("Failed to create GPU device: {}", e);
            return;
        }
    };

    let mut inner = inner.borrow_mut();
    if inner.disposed {
        // Torn down while we were waiting on the GPU
        render_state.dispose();
        return;
    }
    inner.render_state = Some(render_state);
    // The window may have been resized during setup
    inner.resize();
}
