#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use paycard_wasm::{abi_version, mount_card};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, Event, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// A fresh form + container under `<body>`, ids suffixed with `tag`.
fn page(tag: &str, number: &str) -> (Element, Element) {
    let doc = document();
    let body = doc.body().unwrap();
    let form = doc.create_element("form").unwrap();
    form.set_id(&format!("form-{tag}"));
    form.set_inner_html(&format!(
        r#"<input name="number" value="{number}"><input name="expiry"><input name="cvc"><input name="name">"#
    ));
    let container = doc.create_element("div").unwrap();
    container.set_id(&format!("card-{tag}"));
    body.append_child(&form).unwrap();
    body.append_child(&container).unwrap();
    (form, container)
}

fn options(form: &str, container: &str) -> JsValue {
    let obj = js_sys::Object::new();
    js_sys::Reflect::set(&obj, &"form".into(), &form.into()).unwrap();
    js_sys::Reflect::set(&obj, &"container".into(), &container.into()).unwrap();
    obj.into()
}

fn mount(form: &str, container: &str) -> Option<paycard_wasm::PaycardWidget> {
    match mount_card(options(form, container)) {
        Ok(widget) => widget,
        Err(_) => panic!("options rejected"),
    }
}

fn input(form: &Element, name: &str) -> HtmlInputElement {
    form.query_selector(&format!(r#"input[name="{name}"]"#))
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap()
}

/// Resolves after the callbacks already queued with `setTimeout(0)` have run.
async fn next_tick() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
fn abi_version_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn mount_renders_and_syncs_prefilled_number() {
    let (form, container) = page("prefilled", "4242424242424242");
    let widget = mount("#form-prefilled", "#card-prefilled").expect("mounted");
    assert_eq!(widget.network(), "visa");
    assert_eq!(
        container.get_attribute("data-jp-card-initialized").as_deref(),
        Some("true")
    );
    let display = container.query_selector(".jp-card-number").unwrap().unwrap();
    assert_eq!(display.text_content().unwrap(), "4242 4242 4242 4242");
    assert_eq!(input(&form, "number").value(), "4242 4242 4242 4242");
}

#[wasm_bindgen_test]
fn keyup_updates_display_and_cvc_focus_flips() {
    let (form, container) = page("typing", "");
    let widget = mount("#form-typing", "#card-typing").expect("mounted");

    let name = input(&form, "name");
    name.set_value("Ada");
    name.dispatch_event(&Event::new("keyup").unwrap()).unwrap();
    let display = container.query_selector(".jp-card-name").unwrap().unwrap();
    assert_eq!(display.text_content().unwrap(), "Ada");

    let cvc = input(&form, "cvc");
    cvc.dispatch_event(&Event::new("focus").unwrap()).unwrap();
    assert!(widget.is_flipped());
    let card = container.query_selector(".jp-card").unwrap().unwrap();
    assert!(card.class_list().contains("jp-card-flipped"));
    cvc.dispatch_event(&Event::new("blur").unwrap()).unwrap();
    assert!(!widget.is_flipped());
}

#[wasm_bindgen_test]
fn missing_form_returns_none() {
    let widget = mount("#no-such-form", "#no-such-card");
    assert!(widget.is_none());
}

#[wasm_bindgen_test]
fn second_mount_on_same_container_returns_none() {
    let (_form, container) = page("twice", "");
    let first = mount("#form-twice", "#card-twice");
    assert!(first.is_some());
    let second = mount("#form-twice", "#card-twice");
    assert!(second.is_none());
    assert_eq!(container.query_selector_all(".jp-card").unwrap().length(), 1);
}

#[wasm_bindgen_test]
fn card_type_listener_can_query_the_widget() {
    let (form, _container) = page("listener", "");
    let widget = Rc::new(mount("#form-listener", "#card-listener").expect("mounted"));
    let seen = Rc::new(RefCell::new(Vec::<String>::new()));

    let listener = {
        let widget = Rc::clone(&widget);
        let seen = Rc::clone(&seen);
        Closure::<dyn FnMut(Event)>::new(move |_ev: Event| {
            seen.borrow_mut().push(widget.network());
        })
    };
    let doc = document();
    doc.add_event_listener_with_callback("card-type-changed", listener.as_ref().unchecked_ref())
        .unwrap();

    let number = input(&form, "number");
    number.set_value("4242");
    number.dispatch_event(&Event::new("keyup").unwrap()).unwrap();

    doc.remove_event_listener_with_callback("card-type-changed", listener.as_ref().unchecked_ref())
        .unwrap();
    assert_eq!(seen.borrow().last().map(String::as_str), Some("visa"));
    assert_eq!(widget.network(), "visa");
}

#[wasm_bindgen_test]
async fn paste_rereads_the_value_on_the_next_tick() {
    let (form, container) = page("paste", "");
    let _widget = mount("#form-paste", "#card-paste").expect("mounted");

    let number = input(&form, "number");
    number.dispatch_event(&Event::new("paste").unwrap()).unwrap();
    number.set_value("4242424242424242");
    let display = container.query_selector(".jp-card-number").unwrap().unwrap();
    assert_ne!(display.text_content().unwrap(), "4242 4242 4242 4242");

    next_tick().await;
    assert_eq!(display.text_content().unwrap(), "4242 4242 4242 4242");
    assert_eq!(number.value(), "4242 4242 4242 4242");
}
