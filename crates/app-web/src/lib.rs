#![cfg(target_arch = "wasm32")]
mod frame;
mod render;
mod ui;

use app_core::{
    generate_needles, generate_ornaments, ModeSource, MorphEngine, MorphParams, SceneConfig,
    StarAnimator, StarParams,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("app-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    {
        let dpr = window.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let width = (rect.width() * dpr) as u32;
        let height = (rect.height() * dpr) as u32;
        canvas.set_width(width.max(1));
        canvas.set_height(height.max(1));
        // Listen for window resize and update canvas backing size
        let canvas_resize = canvas.clone();
        let resize_closure = Closure::wrap(Box::new(move || {
            if let Some(w) = web::window() {
                let dpr = w.device_pixel_ratio();
                let rect = canvas_resize.get_bounding_client_rect();
                let w_px = (rect.width() * dpr) as u32;
                let h_px = (rect.height() * dpr) as u32;
                canvas_resize.set_width(w_px.max(1));
                canvas_resize.set_height(h_px.max(1));
            }
        }) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())
            .ok();
        resize_closure.forget();
    }

    // Build the particle collections from one seeded source so a reload
    // reproduces the same scene.
    let config = SceneConfig::default();
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(42);
    let needles = MorphEngine::new(
        generate_needles(config.needle_count, &config, &mut rng),
        MorphParams::default(),
    )?;
    let ornaments = MorphEngine::new(
        generate_ornaments(config.ornament_count, &config, &mut rng),
        MorphParams::default(),
    )?;
    let star = StarAnimator::new(StarParams::default())?;
    log::info!(
        "[scene] needles={} ornaments={}",
        needles.len(),
        ornaments.len()
    );

    let mode = Rc::new(RefCell::new(ModeSource::default()));
    let needle_capacity = needles.len();
    let ornament_capacity = ornaments.len();

    // Click anywhere on the canvas toggles the formation
    {
        let mode_click = mode.clone();
        let document_click = document.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::MouseEvent| {
            let mut m = mode_click.borrow_mut();
            m.toggle();
            log::info!("[click] mode -> {:?}", m.read());
            ui::set_mode_hint(&document_click, m.read());
        }) as Box<dyn FnMut(_)>);
        canvas
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        closure.forget();
    }

    // 't' and space toggle too, for keyboard users
    {
        let mode_key = mode.clone();
        let document_key = document.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            let key = ev.key();
            if key == "t" || key == "T" || key == " " {
                let mut m = mode_key.borrow_mut();
                m.toggle();
                log::info!("[key] mode -> {:?}", m.read());
                ui::set_mode_hint(&document_key, m.read());
            }
        }) as Box<dyn FnMut(_)>);
        window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    ui::set_mode_hint(&document, mode.borrow().read());

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        needles,
        ornaments,
        star,
        mode,
        canvas.clone(),
    )));
    frame::start_loop(frame_ctx.clone());

    // The GPU arrives asynchronously; frames are skipped until it is ready.
    {
        let frame_ctx = frame_ctx.clone();
        spawn_local(async move {
            if let Some(gpu) = frame::init_gpu(&canvas, needle_capacity, ornament_capacity).await {
                frame_ctx.borrow_mut().gpu = Some(gpu);
                log::info!("[gpu] renderer ready");
            }
        });
    }

    Ok(())
}
