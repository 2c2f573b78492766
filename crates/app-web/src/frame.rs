//! Per-frame driver: advances the animators, packs instance data and hands
//! it to the renderer, hooked into `requestAnimationFrame`.

use crate::render::{self, SceneInstances};
use app_core::{
    Camera, FormationMode, InstanceRaw, ModeSource, MorphEngine, StarAnimator, CAMERA_DISTANCE,
    CAMERA_HEIGHT, CAMERA_ORBIT_RATE, GOLD_METALLIC,
};
use glam::Vec3;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub needles: MorphEngine,
    pub ornaments: MorphEngine,
    pub star: StarAnimator,
    pub mode: Rc<RefCell<ModeSource>>,

    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'static>>,

    last_instant: Instant,
    start_instant: Instant,
    orbit_angle: f32,
    // Reused each frame so the packing step does not allocate.
    needle_scratch: Vec<InstanceRaw>,
    ornament_scratch: Vec<InstanceRaw>,
}

fn pack_instances(out: &mut Vec<InstanceRaw>, engine: &MorphEngine) {
    out.clear();
    out.extend(
        engine
            .transforms()
            .iter()
            .zip(engine.records())
            .map(|(t, r)| t.to_raw(r.color)),
    );
}

fn orbit_camera(angle: f32, aspect: f32) -> Camera {
    Camera {
        eye: Vec3::new(
            angle.sin() * CAMERA_DISTANCE,
            CAMERA_HEIGHT,
            angle.cos() * CAMERA_DISTANCE,
        ),
        target: Vec3::ZERO,
        up: Vec3::Y,
        aspect,
        fovy_radians: 45_f32.to_radians(),
        znear: 0.1,
        zfar: 200.0,
    }
}

impl FrameContext {
    pub fn new(
        needles: MorphEngine,
        ornaments: MorphEngine,
        star: StarAnimator,
        mode: Rc<RefCell<ModeSource>>,
        canvas: web::HtmlCanvasElement,
    ) -> Self {
        let now = Instant::now();
        let needle_scratch = Vec::with_capacity(needles.len());
        let ornament_scratch = Vec::with_capacity(ornaments.len());
        Self {
            needles,
            ornaments,
            star,
            mode,
            canvas,
            gpu: None,
            last_instant: now,
            start_instant: now,
            orbit_angle: 0.0,
            needle_scratch,
            ornament_scratch,
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        // Renderer not mounted yet: skip the frame; nothing to show it on.
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let elapsed = (now - self.start_instant).as_secs_f32();
        let mode = self.mode.borrow().read();

        self.needles.advance(dt, elapsed, mode);
        self.ornaments.advance(dt, elapsed, mode);
        self.star.advance(dt, mode);

        // Slow auto-orbit once the tree is formed; hold still while scattered.
        if mode == FormationMode::Formed {
            self.orbit_angle += dt * CAMERA_ORBIT_RATE;
        }

        let needles_changed = self.needles.take_dirty();
        if needles_changed {
            pack_instances(&mut self.needle_scratch, &self.needles);
        }
        let ornaments_changed = self.ornaments.take_dirty();
        if ornaments_changed {
            pack_instances(&mut self.ornament_scratch, &self.ornaments);
        }
        let star_raw = [self.star.transform().to_raw(GOLD_METALLIC)];

        let w = self.canvas.width();
        let h = self.canvas.height();
        gpu.resize_if_needed(w, h);
        let camera = orbit_camera(self.orbit_angle, gpu.aspect());
        let scene = SceneInstances {
            needles: needles_changed.then_some(self.needle_scratch.as_slice()),
            ornaments: ornaments_changed.then_some(self.ornament_scratch.as_slice()),
            star: Some(&star_raw),
        };
        if let Err(e) = gpu.render(camera.view_proj().to_cols_array_2d(), &scene) {
            log::error!("render error: {:?}", e);
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    needle_capacity: usize,
    ornament_capacity: usize,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, needle_capacity, ornament_capacity).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}
