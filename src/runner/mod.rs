//! Browser glue for the endless runner: canvas and button wiring, sprite
//! loading, input listeners, rendering, and the `requestAnimationFrame`
//! loop. All game rules live in [`sim`]; this module only feeds inputs into
//! the simulation and draws whatever state it holds each frame.
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlImageElement, window,
};

pub mod sim;

use sim::{Phase, RUN_FRAMES, RunnerState, Tuning};

/// Everything the frame loop needs each tick.
struct RunnerApp {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dino_img: HtmlImageElement,
    cactus_img: HtmlImageElement,
    state: RunnerState,
}

thread_local! {
    static RUNNER: std::cell::RefCell<Option<RunnerApp>> = std::cell::RefCell::new(None);
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

const START_BTN_POS: &str = "left:50%; top:72%; transform:translateX(-50%);";
const RESTART_BTN_POS: &str = "left:50%; top:72%; transform:translateX(-50%);";
const THEME_BTN_POS: &str = "right:16px; top:12px;";

#[wasm_bindgen]
pub fn start_runner_mode() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let tuning = Tuning::default();

    // Create / reuse the game canvas
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("dd-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("dd-canvas");
        c.set_width(tuning.canvas_width as u32);
        c.set_height(tuning.canvas_height as u32);
        c.set_attribute("style", &canvas_style(false)).ok();
        doc.body().unwrap().append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas.get_context("2d")?.unwrap().dyn_into()?;
    ctx.set_font("20px Arial");

    let start_btn = ensure_button(&doc, "dd-start", "Start", START_BTN_POS, true)?;
    let restart_btn = ensure_button(&doc, "dd-restart", "Restart", RESTART_BTN_POS, false)?;
    let theme_btn = ensure_button(&doc, "dd-theme", "Theme", THEME_BTN_POS, true)?;

    let dino_img = HtmlImageElement::new()?;
    let cactus_img = HtmlImageElement::new()?;

    RUNNER.with(|cell| {
        cell.replace(Some(RunnerApp {
            canvas: canvas.clone(),
            ctx,
            dino_img: dino_img.clone(),
            cactus_img: cactus_img.clone(),
            state: RunnerState::new(tuning),
        }))
    });

    // Keyboard: Space queues a jump. The grounded + started guard runs
    // inside request_jump at event time.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if evt.code() == "Space" {
                RUNNER.with(|cell| {
                    if let Some(app) = cell.borrow_mut().as_mut() {
                        app.state.request_jump();
                    }
                });
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Touch on the canvas jumps too (mobile)
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            evt.prevent_default();
            RUNNER.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    app.state.request_jump();
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Start: hide both run buttons and begin a fresh run
    {
        let start_el = start_btn.clone();
        let restart_el = restart_btn.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            RUNNER.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    app.state.start();
                }
            });
            set_button_visible(&start_el, START_BTN_POS, false);
            set_button_visible(&restart_el, RESTART_BTN_POS, false);
        }) as Box<dyn FnMut(_)>);
        start_btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Restart: same as Start minus the Start button (already hidden)
    {
        let restart_el = restart_btn.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            RUNNER.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    app.state.start();
                }
            });
            set_button_visible(&restart_el, RESTART_BTN_POS, false);
        }) as Box<dyn FnMut(_)>);
        restart_btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Theme: flip the flag and toggle the presentational class on the page
    // containers and the canvas. Game logic only reads the flag in render.
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            let dark = RUNNER.with(|cell| {
                cell.borrow_mut()
                    .as_mut()
                    .map(|app| app.state.toggle_theme())
                    .unwrap_or(false)
            });
            if let Some(doc) = window().and_then(|w| w.document()) {
                if let Some(body) = doc.body() {
                    body.class_list().toggle_with_force("dark-mode", dark).ok();
                }
                if let Some(container) = doc.get_element_by_id("dd-container") {
                    container
                        .class_list()
                        .toggle_with_force("dark-mode", dark)
                        .ok();
                }
                if let Some(canvas) = doc.get_element_by_id("dd-canvas") {
                    canvas.class_list().toggle_with_force("dark-mode", dark).ok();
                    canvas.set_attribute("style", &canvas_style(dark)).ok();
                }
            }
        }) as Box<dyn FnMut(_)>);
        theme_btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Sprite loading. The frame loop starts only once the dino sheet is in;
    // a load failure is fatal for startup: log it and withhold the loop.
    {
        let closure = Closure::wrap(Box::new(move || {
            web_sys::console::log_1(&"dino sprite loaded".into());
            start_frame_loop();
        }) as Box<dyn FnMut()>);
        dino_img.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move || {
            web_sys::console::error_1(
                &"failed to load dino sprite; game loop not started".into(),
            );
        }) as Box<dyn FnMut()>);
        dino_img.add_event_listener_with_callback("error", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move || {
            web_sys::console::log_1(&"cactus sprite loaded".into());
        }) as Box<dyn FnMut()>);
        cactus_img.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    dino_img.set_src("dino.png");
    cactus_img.set_src("cactus.png");

    Ok(())
}

fn start_frame_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        RUNNER.with(|cell| {
            if let Some(app) = cell.borrow_mut().as_mut() {
                frame_tick(app);
            }
        });
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

/// One animation frame: advance the simulation (a no-op unless a run is
/// active), draw, then sync DOM controls to the current phase. The loop
/// keeps rescheduling itself regardless of phase.
fn frame_tick(app: &mut RunnerApp) {
    app.state.tick();
    render(app);
    sync_controls(&app.state);
}

/// Show the Restart button while the run is over. Kept per-frame so the
/// control always reflects the phase, whichever path set it.
fn sync_controls(state: &RunnerState) {
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id("dd-restart") {
            set_button_visible(&el, RESTART_BTN_POS, state.phase == Phase::Over);
        }
    }
}

/// Pure read of the simulation state onto the canvas.
fn render(app: &RunnerApp) {
    let state = &app.state;
    let ctx = &app.ctx;
    let w = app.canvas.width() as f64;
    let h = app.canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, w, h);

    // Dino, using the current run-cycle column of the sprite sheet
    let frame_x = RUN_FRAMES[state.anim_frame] as f64 * state.dino.width;
    ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
        &app.dino_img,
        frame_x,
        0.0,
        state.dino.width,
        state.dino.height,
        state.dino.x,
        state.dino.y,
        state.dino.width,
        state.dino.height,
    )
    .ok();

    for ob in &state.obstacles {
        ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &app.cactus_img,
            ob.x,
            ob.y,
            ob.width,
            ob.height,
        )
        .ok();
    }

    // Score in the theme-dependent color
    ctx.set_fill_style_str(if state.dark_theme { "#ffffff" } else { "#000000" });
    ctx.fill_text(&format!("Score: {}", state.score), 10.0, 20.0).ok();

    if state.phase == Phase::Over {
        ctx.fill_text("Game Over", w / 2.0 - 50.0, h / 2.0).ok();
    }
}

fn canvas_style(dark: bool) -> String {
    let bg = if dark { "#1b1b1b" } else { "#f7f7f7" };
    format!(
        "position:fixed; left:50%; top:45%; transform:translate(-50%,-50%); \
         border:2px solid #222; border-radius:12px; background:{bg}; z-index:20;"
    )
}

fn button_style(position: &str, visible: bool) -> String {
    format!(
        "position:fixed; {position} font-family:'Fira Code', monospace; font-size:16px; \
         padding:6px 14px; border-radius:6px; border:1px solid #333; cursor:pointer; \
         z-index:30; display:{};",
        if visible { "inline-block" } else { "none" }
    )
}

fn set_button_visible(el: &Element, position: &str, visible: bool) {
    el.set_attribute("style", &button_style(position, visible)).ok();
}

/// Look a control up by id, creating and styling it if the host page does
/// not provide one.
fn ensure_button(
    doc: &Document,
    id: &str,
    label: &str,
    position: &str,
    visible: bool,
) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element("button")?;
    el.set_id(id);
    el.set_text_content(Some(label));
    el.set_attribute("style", &button_style(position, visible)).ok();
    if let Some(body) = doc.body() {
        body.append_child(&el)?;
    }
    Ok(el)
}
