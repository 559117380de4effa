use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Function, Reflect};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use web_sys::{console, Element, Event};

use paycard_core::{Card, CardOptions, ElementId, EventKind, InputEvent, MountTargets};

mod dom;

pub use dom::DomSurface;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[paycard] {}", record.args()));
        match record.level() {
            log::Level::Error => console::error_1(&line),
            log::Level::Warn => console::warn_1(&line),
            log::Level::Info => console::info_1(&line),
            log::Level::Debug | log::Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Route `log` records to the browser console. Later mounts only adjust the level.
fn init_logging(debug: bool) {
    if log::set_logger(&LOGGER).is_err() {
        log::trace!("console logger already installed");
    }
    log::set_max_level(if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });
}

struct Mounted {
    card: Card,
    surface: DomSurface,
}

fn dispatch(state: &Weak<RefCell<Mounted>>, event: InputEvent) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let (document, events) = {
        // Input events raised while the card is busy (e.g. a listener setting a
        // field value) are dropped.
        let Ok(mut mounted) = state.try_borrow_mut() else {
            return;
        };
        let Mounted { card, surface } = &mut *mounted;
        card.handle(surface, event);
        (surface.document().clone(), surface.take_pending())
    };
    for event in &events {
        dom::publish(&document, event);
    }
}

/// Browser paste events fire before the pasted text lands in the input, so
/// the value is re-read on the next tick.
fn schedule_input(state: Weak<RefCell<Mounted>>, target: ElementId) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let tick = Closure::once_into_js(move || {
        dispatch(&state, InputEvent::new(target, EventKind::Input));
    });
    if let Err(err) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(tick.unchecked_ref::<Function>(), 0)
    {
        log::warn!("setTimeout failed: {err:?}");
    }
}

struct Listener {
    target: Element,
    dom_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// A card mounted into the page. Listeners are removed when the widget is
/// freed or [`PaycardWidget::destroy`] is called; the rendered markup stays.
#[wasm_bindgen]
pub struct PaycardWidget {
    state: Rc<RefCell<Mounted>>,
    listeners: Vec<Listener>,
}

impl PaycardWidget {
    fn attach(card: Card, surface: DomSurface) -> Self {
        let inputs: Vec<(ElementId, Element)> = card
            .input_elements()
            .into_iter()
            .filter_map(|id| surface.element(id).map(|el| (id, el)))
            .collect();
        let state = Rc::new(RefCell::new(Mounted { card, surface }));

        let mut listeners = Vec::with_capacity(inputs.len() * EventKind::DOM_TYPES.len());
        for (id, el) in inputs {
            for dom_type in EventKind::DOM_TYPES {
                let Some(kind) = EventKind::from_dom_type(dom_type) else {
                    continue;
                };
                let weak = Rc::downgrade(&state);
                let callback = Closure::<dyn FnMut(Event)>::new(move |_ev: Event| {
                    dispatch(&weak, InputEvent::new(id, kind));
                    if kind == EventKind::Paste {
                        schedule_input(weak.clone(), id);
                    }
                });
                if let Err(err) =
                    el.add_event_listener_with_callback(dom_type, callback.as_ref().unchecked_ref())
                {
                    log::warn!("addEventListener({dom_type}) failed: {err:?}");
                    continue;
                }
                listeners.push(Listener {
                    target: el.clone(),
                    dom_type,
                    callback,
                });
            }
        }
        Self { state, listeners }
    }
}

#[wasm_bindgen]
impl PaycardWidget {
    /// Detected network id (`"visa"`, ..., `"unknown"`).
    #[wasm_bindgen]
    pub fn network(&self) -> String {
        self.state.borrow().card.network().id().to_string()
    }

    #[wasm_bindgen(js_name = is_flipped)]
    pub fn is_flipped(&self) -> bool {
        self.state.borrow().card.is_flipped()
    }

    /// Effective options after merging over the defaults.
    #[wasm_bindgen]
    pub fn options(&self) -> Result<JsValue, JsError> {
        let state = self.state.borrow();
        swb::to_value(state.card.options()).map_err(|e| JsError::new(&format!("options error: {e}")))
    }

    /// Stop listening to the form.
    #[wasm_bindgen]
    pub fn destroy(&mut self) {
        for l in self.listeners.drain(..) {
            if let Err(err) = l
                .target
                .remove_event_listener_with_callback(l.dom_type, l.callback.as_ref().unchecked_ref())
            {
                log::warn!("removeEventListener({}) failed: {err:?}", l.dom_type);
            }
        }
    }
}

impl Drop for PaycardWidget {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn option_field(options: &JsValue, key: &str) -> JsValue {
    if jsvalue_is_undefined_or_null(options) {
        return JsValue::UNDEFINED;
    }
    Reflect::get(options, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

/// Mount a card. `options.form` and `options.container` are selectors or
/// elements; every other key overrides the default [`CardOptions`].
///
/// Returns `undefined` when the card cannot be mounted (the reason is logged
/// to the console), and throws only for malformed options.
#[wasm_bindgen(js_name = mount_card)]
pub fn mount_card(options: JsValue) -> Result<Option<PaycardWidget>, JsError> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let opts: CardOptions = if jsvalue_is_undefined_or_null(&options) {
        CardOptions::default()
    } else {
        swb::from_value(options.clone())
            .map_err(|e| JsError::new(&format!("card options error: {e}")))?
    };
    init_logging(opts.debug);

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsError::new("mount_card: no document available"))?;
    let mut surface = DomSurface::new(document);
    let targets = MountTargets {
        form: surface.resolve(&option_field(&options, "form")),
        container: surface.resolve(&option_field(&options, "container")),
    };

    let card = match Card::mount(&mut surface, targets, opts) {
        Ok(card) => card,
        Err(_) => return Ok(None),
    };
    let replayed = surface.take_pending();
    let document = surface.document().clone();
    let widget = PaycardWidget::attach(card, surface);
    for event in &replayed {
        dom::publish(&document, event);
    }
    Ok(Some(widget))
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
