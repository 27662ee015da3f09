//! TauEngine: `LogicEngine` over a Tau Prolog session
//!
//! Tau Prolog reports results through `{ success, error, fail, limit }`
//! callback objects. Each call here wraps one callback round-trip in a
//! `js_sys::Promise` and awaits it, so the session protocol sees plain
//! futures. A `limit` answer (`null`) is shown and then ends the goal.
//!
//! # Usage (TypeScript)
//! ```typescript
//! import pl from 'tau-prolog';
//! import init, { KinlogWorkbench } from 'kinlog';
//!
//! await init();
//! const workbench = new KinlogWorkbench(pl.create(), {});
//! ```

use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::session::{EngineError, LogicEngine};

#[wasm_bindgen]
extern "C" {
    /// A Tau Prolog session, as returned by `pl.create()`
    #[derive(Debug, Clone)]
    pub type TauSession;

    #[wasm_bindgen(method)]
    fn consult(this: &TauSession, program: &str, options: &Object);

    #[wasm_bindgen(method)]
    fn query(this: &TauSession, goal: &str, options: &Object);

    #[wasm_bindgen(method)]
    fn answer(this: &TauSession, options: &Object);

    #[wasm_bindgen(method)]
    fn format_answer(this: &TauSession, answer: &JsValue) -> String;
}

/// Options object for one callback round-trip.
///
/// Tau calls exactly one of the callbacks; the closures are owned here and
/// freed when the round-trip is dropped, called or not.
struct Callbacks {
    options: Object,
    closures: Vec<Closure<dyn FnMut(JsValue)>>,
}

impl Callbacks {
    fn new() -> Self {
        Self {
            options: Object::new(),
            closures: Vec::with_capacity(4),
        }
    }

    fn register(&mut self, name: &str, closure: Closure<dyn FnMut(JsValue)>) {
        // Setting a property on a fresh plain object cannot fail
        let _ = Reflect::set(&self.options, &JsValue::from_str(name), closure.as_ref());
        self.closures.push(closure);
    }

    /// Callback that settles the promise with its first argument
    fn settle_with_arg(&mut self, name: &str, settle: Function) {
        self.register(
            name,
            Closure::once(move |value: JsValue| {
                let _ = settle.call1(&JsValue::NULL, &value);
            }),
        );
    }

    /// Callback that settles the promise with a fixed value
    fn settle_with(&mut self, name: &str, settle: Function, value: JsValue) {
        self.register(
            name,
            Closure::once(move |_: JsValue| {
                let _ = settle.call1(&JsValue::NULL, &value);
            }),
        );
    }

    fn options(&self) -> &Object {
        &self.options
    }
}

pub struct TauEngine {
    session: TauSession,
}

impl TauEngine {
    pub fn new(session: TauSession) -> Self {
        Self { session }
    }

    fn engine_error(&self, err: &JsValue) -> EngineError {
        match err.as_string() {
            Some(message) => EngineError::new(message),
            None => EngineError::new(self.session.format_answer(err)),
        }
    }

    /// Run `consult`/`query`, which both take `{ success, error }`
    async fn call(&self, invoke: impl FnOnce(&TauSession, &Object)) -> Result<(), EngineError> {
        let mut callbacks = Callbacks::new();
        let promise = Promise::new(&mut |resolve, reject| {
            callbacks.settle_with("success", resolve, JsValue::UNDEFINED);
            callbacks.settle_with_arg("error", reject);
        });
        invoke(&self.session, callbacks.options());

        let settled = JsFuture::from(promise).await;
        drop(callbacks);

        settled.map(|_| ()).map_err(|err| self.engine_error(&err))
    }
}

impl LogicEngine for TauEngine {
    type Answer = JsValue;

    async fn consult(&mut self, program: &str) -> Result<(), EngineError> {
        self.call(|session, options| session.consult(program, options)).await
    }

    async fn query(&mut self, goal: &str) -> Result<(), EngineError> {
        self.call(|session, options| session.query(goal, options)).await
    }

    async fn next_answer(&mut self) -> Option<JsValue> {
        let mut callbacks = Callbacks::new();
        let promise = Promise::new(&mut |resolve, _reject| {
            // Errors come back as answers: formatting them yields the
            // "uncaught exception" text the session looks for
            callbacks.settle_with_arg("success", resolve.clone());
            callbacks.settle_with_arg("error", resolve.clone());
            callbacks.settle_with("fail", resolve.clone(), JsValue::FALSE);
            // Step limit: Tau formats a null answer as "limit exceeded"
            callbacks.settle_with("limit", resolve, JsValue::NULL);
        });
        self.session.answer(callbacks.options());

        let settled = JsFuture::from(promise).await;
        drop(callbacks);

        match settled {
            Ok(answer) if answer.as_bool() == Some(false) => None,
            Ok(answer) => Some(answer),
            Err(_) => None,
        }
    }

    fn format_answer(&self, answer: Option<&JsValue>) -> String {
        match answer {
            Some(answer) => self.session.format_answer(answer),
            None => self.session.format_answer(&JsValue::FALSE),
        }
    }

    fn ends_stream(&self, answer: &JsValue) -> bool {
        answer.is_null()
    }
}
