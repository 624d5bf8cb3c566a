//! Browser fetch transport for the remote physics endpoint
//!
//! `send` spawns a future that posts the ball and parks the outcome in a
//! shared slot; `poll` takes it on a later frame. Requests that have not
//! settled after [`REQUEST_TIMEOUT_MS`] are aborted and reported as
//! transport errors.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Request, RequestInit, Response, Window};

use crate::error::{Error, Result};
use crate::protocol::{self, UpdateBallRequest};
use crate::sim::{Ball2d, Transport};

/// Fetches still pending after this are aborted
pub const REQUEST_TIMEOUT_MS: i32 = 1000;

type Slot = Rc<RefCell<Option<Result<Ball2d>>>>;

pub struct FetchTransport {
    url: String,
    slot: Slot,
}

impl FetchTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            slot: Rc::new(RefCell::new(None)),
        }
    }
}

impl Transport for FetchTransport {
    fn send(&mut self, request: UpdateBallRequest) {
        let url = self.url.clone();
        let slot = self.slot.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = post_ball(&url, &request).await;
            *slot.borrow_mut() = Some(outcome);
        });
    }

    fn poll(&mut self) -> Option<Result<Ball2d>> {
        self.slot.borrow_mut().take()
    }
}

fn js_error(value: JsValue) -> Error {
    Error::Transport(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

async fn post_ball(url: &str, request: &UpdateBallRequest) -> Result<Ball2d> {
    let body = protocol::encode_request(request)?;
    let window = web_sys::window().ok_or_else(|| Error::Transport("no window".to_string()))?;

    let controller = AbortController::new().map_err(js_error)?;
    let signal = controller.signal();

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));
    init.set_signal(Some(&signal));

    let req = Request::new_with_str_and_init(url, &init).map_err(js_error)?;
    req.headers()
        .set("Content-Type", "application/json")
        .map_err(js_error)?;

    let abort = Closure::once(move || controller.abort());
    let timer = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            abort.as_ref().unchecked_ref(),
            REQUEST_TIMEOUT_MS,
        )
        .map_err(js_error)?;

    let outcome = fetch_ball(&window, &req).await;
    window.clear_timeout_with_handle(timer);
    drop(abort);

    outcome.map_err(|e| {
        if signal.aborted() {
            Error::Transport(format!("no reply within {} ms", REQUEST_TIMEOUT_MS))
        } else {
            e
        }
    })
}

async fn fetch_ball(window: &Window, req: &Request) -> Result<Ball2d> {
    let resp: Response = JsFuture::from(window.fetch_with_request(req))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;

    if !resp.ok() {
        return Err(Error::Status(resp.status()));
    }

    let text = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    let text = text
        .as_string()
        .ok_or_else(|| Error::Transport("response body is not text".to_string()))?;
    protocol::decode_reply(&text)
}
