//! Page controller.
//!
//! Wires a file input, an output element, a label and two scale buttons to
//! the conversion pipeline. State lives in a [`ViewState`]; the DOM is only
//! ever written from its rendered form.
//!
//! # Example
//!
//! ```typescript
//! import init, { App } from '@pixel-shadow/wasm';
//!
//! await init();
//! const app = new App(
//!   { input: 'file', output: 'output', increase: 'plus', decrease: 'minus', label: 'scale' },
//!   { confirm_threshold_bytes: 1000000 },
//! );
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use pixel_shadow_core::load::{Encoding, FileContents, LoadError};
use pixel_shadow_core::pipeline::{
    failure_message, Pipeline, PipelineConfig, PipelineError, PipelineOutput, RunGuard, RunTicket,
};
use pixel_shadow_core::scale::ScaleAction;
use pixel_shadow_core::view::{RenderedView, ViewState};
use serde::Deserialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event, EventTarget, File, HtmlElement, HtmlInputElement};

use crate::decode::load_image_element;
use crate::extract::extract_image_pixels;
use crate::load::read_file_as;
use crate::types::{js_error_message, options_from_js};

/// Attribute on the output element holding the persisted scale.
const SCALE_ATTRIBUTE: &str = "data-scale";

/// Element ids the controller binds to.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct PageIds {
    input: String,
    output: String,
    increase: String,
    decrease: String,
    label: String,
}

impl Default for PageIds {
    fn default() -> Self {
        Self {
            input: "file".to_string(),
            output: "output".to_string(),
            increase: "plus".to_string(),
            decrease: "minus".to_string(),
            label: "scale".to_string(),
        }
    }
}

/// Run the browser pipeline for one file.
///
/// `checkpoint` is called after every suspension point; an error from it
/// aborts the run.
pub(crate) async fn convert_file(
    file: &File,
    pipeline: &Pipeline,
    checkpoint: impl Fn() -> Result<(), PipelineError>,
) -> Result<PipelineOutput, PipelineError> {
    let url = match read_file_as(file, Encoding::DataUrl).await? {
        FileContents::DataUrl(url) => url,
        other => return Err(LoadError::InvalidArgument(other.encoding().to_string()).into()),
    };
    checkpoint()?;

    let image = load_image_element(&url).await?;
    checkpoint()?;

    let grid = extract_image_pixels(&image)?;
    pipeline.encode_grid(&grid, confirm_large_buffer)
}

fn confirm_large_buffer(bytes: usize) -> bool {
    let message = format!(
        "This image has {} bytes of pixel data and may take a while to convert. Continue?",
        bytes
    );
    web_sys::window()
        .and_then(|window| window.confirm_with_message(&message).ok())
        .unwrap_or(false)
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Convert a file to a `box-shadow` value without binding to any page elements.
///
/// # Errors
///
/// Rejects if the file cannot be read or decoded, or the user declines to
/// convert a large image.
#[wasm_bindgen]
pub async fn file_to_box_shadow(file: File, config: JsValue) -> Result<String, JsValue> {
    let config: PipelineConfig = options_from_js(config)?;
    convert_file(&file, &Pipeline::new(config), || Ok(()))
        .await
        .map(|output| output.box_shadow)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The elements written on render, plus what was last written to them.
struct Page {
    output: HtmlElement,
    label: HtmlElement,
    shown: RefCell<Option<RenderedView>>,
}

impl Page {
    /// Write the parts of `view` that changed since the last render.
    fn render(&self, view: RenderedView) -> Result<(), JsValue> {
        let mut shown = self.shown.borrow_mut();
        let previous = shown.as_ref();
        let style = self.output.style();

        if previous.map_or(true, |p| p.box_shadow != view.box_shadow) {
            style.set_property("box-shadow", &view.box_shadow)?;
        }
        if previous.map_or(true, |p| p.transform != view.transform) {
            style.set_property("transform", &view.transform)?;
        }
        if previous.map_or(true, |p| p.scale_attribute != view.scale_attribute) {
            self.output
                .set_attribute(SCALE_ATTRIBUTE, &view.scale_attribute)?;
        }
        if previous.map_or(true, |p| p.label != view.label) {
            self.label.set_text_content(Some(&view.label));
        }

        *shown = Some(view);
        Ok(())
    }

    fn render_or_log(&self, view: RenderedView) {
        if let Err(e) = self.render(view) {
            log::error!("render failed: {}", js_error_message(&e));
        }
    }
}

struct AppState {
    view: ViewState,
    guard: RunGuard,
    pipeline: Pipeline,
}

/// A mounted page controller. Keep it alive for the life of the page:
/// dropping it invalidates the event handlers.
#[wasm_bindgen]
pub struct App {
    state: Rc<RefCell<AppState>>,
    _listeners: Vec<Closure<dyn FnMut(Event)>>,
}

#[wasm_bindgen]
impl App {
    /// Bind to the page.
    ///
    /// # Arguments
    ///
    /// * `ids` - `{ input, output, increase, decrease, label }` element ids
    ///   (defaults: `file`, `output`, `plus`, `minus`, `scale`)
    /// * `config` - Optional pipeline configuration
    #[wasm_bindgen(constructor)]
    pub fn new(ids: JsValue, config: JsValue) -> Result<App, JsValue> {
        let ids: PageIds = options_from_js(ids)?;
        let config: PipelineConfig = options_from_js(config)?;

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let input: HtmlInputElement = element_by_id(&document, &ids.input)?;
        let increase: HtmlElement = element_by_id(&document, &ids.increase)?;
        let decrease: HtmlElement = element_by_id(&document, &ids.decrease)?;
        let page = Rc::new(Page {
            output: element_by_id(&document, &ids.output)?,
            label: element_by_id(&document, &ids.label)?,
            shown: RefCell::new(None),
        });

        let persisted = page.output.get_attribute(SCALE_ATTRIBUTE);
        let view = ViewState::from_scale_attribute(persisted.as_deref(), config.scale);
        page.render(view.render())?;

        let state = Rc::new(RefCell::new(AppState {
            view,
            guard: RunGuard::new(),
            pipeline: Pipeline::new(config),
        }));

        let listeners = vec![
            listen(
                &input,
                "change",
                on_file_change(input.clone(), Rc::clone(&state), Rc::clone(&page)),
            )?,
            listen(
                &increase,
                "click",
                on_scale(ScaleAction::Increase, Rc::clone(&state), Rc::clone(&page)),
            )?,
            listen(
                &decrease,
                "click",
                on_scale(ScaleAction::Decrease, Rc::clone(&state), Rc::clone(&page)),
            )?,
        ];

        log::info!("mounted on #{} -> #{}", ids.input, ids.output);
        Ok(App {
            state,
            _listeners: listeners,
        })
    }

    /// Current display scale.
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.state.borrow().view.scale().size()
    }

    /// The `box-shadow` value currently shown.
    #[wasm_bindgen(getter)]
    pub fn box_shadow(&self) -> String {
        self.state.borrow().view.box_shadow().to_string()
    }
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{} has the wrong type", id)))
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: Box<dyn FnMut(Event)>,
) -> Result<Closure<dyn FnMut(Event)>, JsValue> {
    let closure = Closure::wrap(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    Ok(closure)
}

fn on_file_change(
    input: HtmlInputElement,
    state: Rc<RefCell<AppState>>,
    page: Rc<Page>,
) -> Box<dyn FnMut(Event)> {
    Box::new(move |_event: Event| {
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        let (ticket, pipeline) = {
            let mut s = state.borrow_mut();
            (s.guard.begin(), s.pipeline.clone())
        };
        log::info!("converting {} (run {})", file.name(), ticket.generation());

        let state = Rc::clone(&state);
        let page = Rc::clone(&page);
        spawn_local(async move {
            let result = convert_file(&file, &pipeline, || state.borrow().guard.check(ticket)).await;
            finish_run(result, ticket, &state, &page);
        });
    })
}

fn finish_run(
    result: Result<PipelineOutput, PipelineError>,
    ticket: RunTicket,
    state: &RefCell<AppState>,
    page: &Page,
) {
    let mut s = state.borrow_mut();
    let outcome = result.and_then(|output| {
        s.guard.check(ticket)?;
        Ok(output)
    });

    match outcome {
        Ok(output) => {
            log::info!(
                "run {}: {}x{} image, {} shadows",
                ticket.generation(),
                output.width,
                output.height,
                output.shadow_count
            );
            s.view.set_box_shadow(output.box_shadow);
            page.render_or_log(s.view.render());
        }
        Err(err) if err.is_silent() => {
            log::info!("run {}: {}", ticket.generation(), err);
        }
        Err(err) => {
            drop(s);
            log::warn!("run {} failed: {}", ticket.generation(), err);
            alert(&failure_message(&err));
        }
    }
}

fn on_scale(
    action: ScaleAction,
    state: Rc<RefCell<AppState>>,
    page: Rc<Page>,
) -> Box<dyn FnMut(Event)> {
    Box::new(move |_event: Event| {
        let mut s = state.borrow_mut();
        match s.view.apply_scale(action) {
            Ok(size) => {
                log::debug!("scale set to {}", size);
                page.render_or_log(s.view.render());
            }
            Err(err) => log::debug!("{}", err),
        }
    })
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn build_page() -> Document {
        let document = web_sys::window().unwrap().document().unwrap();
        let body = document.body().unwrap();
        body.set_inner_html(
            r#"<input type="file" id="file">
<div id="output"></div>
<button id="plus">+</button>
<button id="minus">-</button>
<span id="scale"></span>"#,
        );
        document
    }

    fn click(document: &Document, id: &str) {
        let button: HtmlElement = element_by_id(document, id).unwrap();
        button.click();
    }

    #[wasm_bindgen_test]
    fn test_mount_renders_initial_scale() {
        let document = build_page();
        let app = App::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
        assert_eq!(app.scale(), 1.0);

        let label: HtmlElement = element_by_id(&document, "scale").unwrap();
        assert_eq!(label.text_content().as_deref(), Some("1x"));
    }

    #[wasm_bindgen_test]
    fn test_scale_buttons() {
        let document = build_page();
        let app = App::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();

        click(&document, "plus");
        assert_eq!(app.scale(), 1.2);

        for _ in 0..5 {
            click(&document, "minus");
        }
        assert_eq!(app.scale(), 0.5);

        let output: HtmlElement = element_by_id(&document, "output").unwrap();
        assert_eq!(output.get_attribute(SCALE_ATTRIBUTE).as_deref(), Some("0.5"));
    }

    #[wasm_bindgen_test]
    fn test_mount_missing_element() {
        let _document = build_page();
        let ids = js_sys::Object::new();
        js_sys::Reflect::set(&ids, &"input".into(), &"nope".into()).unwrap();
        assert!(App::new(ids.into(), JsValue::UNDEFINED).is_err());
    }
}
