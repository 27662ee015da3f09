//! WASM API for the Workbench
//!
//! `KinlogWorkbench` is the stateful object the form instantiates once.
//! Async operations return promises; rows, reports and notifications
//! cross the boundary as plain objects via `serde-wasm-bindgen`.
//!
//! Async methods hold the workbench borrow across awaits, so an
//! overlapping call fails with the busy error instead of interleaving.
#![allow(clippy::await_holding_refcell_ref)]

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use super::tau::{TauEngine, TauSession};
use crate::config::KinlogConfig;
use crate::relatives::{relation_options, FieldEdit, RecordDraft, RecordId};
use crate::session::QueryStats;
use crate::workbench::Workbench;

/// Resolution value of `sendQuery`
#[derive(Serialize)]
struct QueryResult {
    response: String,
    stats: QueryStats,
}

const BUSY: &str = "KinlogWorkbench is busy with another operation";

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_id(id: &str) -> Result<RecordId, JsValue> {
    id.parse::<RecordId>()
        .map_err(|e| JsValue::from_str(&format!("Invalid record id {:?}: {}", id, e)))
}

#[wasm_bindgen(js_name = KinlogWorkbench)]
pub struct WorkbenchHandle {
    inner: Rc<RefCell<Workbench<TauEngine>>>,
}

impl WorkbenchHandle {
    fn workbench(&self) -> Result<RefMut<'_, Workbench<TauEngine>>, JsValue> {
        self.inner.try_borrow_mut().map_err(|_| JsValue::from_str(BUSY))
    }
}

#[wasm_bindgen(js_class = KinlogWorkbench)]
impl WorkbenchHandle {
    /// Wrap a Tau Prolog session. `config` may be `undefined` or a partial
    /// `KinlogConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(session: TauSession, config: JsValue) -> Result<WorkbenchHandle, JsValue> {
        let config: KinlogConfig = if config.is_undefined() || config.is_null() {
            KinlogConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };

        Ok(WorkbenchHandle {
            inner: Rc::new(RefCell::new(Workbench::new(TauEngine::new(session), config))),
        })
    }

    // ========================================================================
    // File menu
    // ========================================================================

    /// Load file contents. Resolves to `{ fileName, records, consulted, skipped }`
    #[wasm_bindgen(js_name = openFile)]
    pub fn open_file(&self, file_name: String, text: String) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let mut workbench = inner.try_borrow_mut().map_err(|_| JsValue::from_str(BUSY))?;
            let report = workbench.open_file(&file_name, &text).await.map_err(to_js)?;
            serde_wasm_bindgen::to_value(&report).map_err(to_js)
        })
    }

    /// Resolves to `{ fileName, content, mimeType, consulted }` for download
    #[wasm_bindgen(js_name = saveFile)]
    pub fn save_file(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let mut workbench = inner.try_borrow_mut().map_err(|_| JsValue::from_str(BUSY))?;
            let saved = workbench.save_file().await.map_err(to_js)?;
            serde_wasm_bindgen::to_value(&saved).map_err(to_js)
        })
    }

    #[wasm_bindgen(js_name = removeFile)]
    pub fn remove_file(&self) -> Result<(), JsValue> {
        self.workbench()?.remove_file();
        Ok(())
    }

    #[wasm_bindgen(js_name = canSave)]
    pub fn can_save(&self) -> bool {
        self.inner.try_borrow().map(|w| w.can_save()).unwrap_or(false)
    }

    // ========================================================================
    // Table
    // ========================================================================

    /// Current rows: `[{ id, name, relativeName, relation }]`
    #[wasm_bindgen]
    pub fn rows(&self) -> Result<JsValue, JsValue> {
        let workbench = self.inner.try_borrow().map_err(|_| JsValue::from_str(BUSY))?;
        serde_wasm_bindgen::to_value(&workbench.records()).map_err(to_js)
    }

    /// Add `{ name, relativeName, relation }`; returns the new row id
    #[wasm_bindgen(js_name = addRecord)]
    pub fn add_record(&self, draft: JsValue) -> Result<String, JsValue> {
        let draft: RecordDraft = serde_wasm_bindgen::from_value(draft)
            .map_err(|e| JsValue::from_str(&format!("Invalid record: {}", e)))?;
        Ok(self.workbench()?.add_record(draft).to_string())
    }

    /// Apply `{ field: "name" | "relativeName" | "relation", value }`
    #[wasm_bindgen(js_name = updateField)]
    pub fn update_field(&self, id: &str, edit: JsValue) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        let edit: FieldEdit = serde_wasm_bindgen::from_value(edit)
            .map_err(|e| JsValue::from_str(&format!("Invalid edit: {}", e)))?;
        Ok(self.workbench()?.update_field(id, edit))
    }

    /// Remove rows by id; returns how many were removed
    #[wasm_bindgen(js_name = removeRecords)]
    pub fn remove_records(&self, ids: Vec<String>) -> Result<usize, JsValue> {
        let ids = ids
            .iter()
            .map(|id| parse_id(id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.workbench()?.remove_records(&ids))
    }

    #[wasm_bindgen(js_name = appendRules)]
    pub fn append_rules(&self, text: &str) -> Result<(), JsValue> {
        self.workbench()?.append_rules(text);
        Ok(())
    }

    #[wasm_bindgen(js_name = buildDocument)]
    pub fn build_document(&self) -> Result<String, JsValue> {
        let workbench = self.inner.try_borrow().map_err(|_| JsValue::from_str(BUSY))?;
        Ok(workbench.build_document())
    }

    /// Drain pending toasts: `[{ kind: "success" | "error", message }]`
    #[wasm_bindgen(js_name = takeNotifications)]
    pub fn take_notifications(&self) -> Result<JsValue, JsValue> {
        let notifications = self.workbench()?.take_notifications();
        serde_wasm_bindgen::to_value(&notifications).map_err(to_js)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Run a goal. Resolves to `{ response, stats }`
    #[wasm_bindgen(js_name = sendQuery)]
    pub fn send_query(&self, goal: String) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let mut workbench = inner.try_borrow_mut().map_err(|_| JsValue::from_str(BUSY))?;
            let stats = workbench.send_query(&goal).await.map_err(to_js)?;
            let result = QueryResult {
                response: workbench.response_text().to_string(),
                stats,
            };
            serde_wasm_bindgen::to_value(&result).map_err(to_js)
        })
    }

    /// Text of the response area
    #[wasm_bindgen]
    pub fn response(&self) -> Result<String, JsValue> {
        let workbench = self.inner.try_borrow().map_err(|_| JsValue::from_str(BUSY))?;
        Ok(workbench.response_text().to_string())
    }

    #[wasm_bindgen(js_name = clearResponses)]
    pub fn clear_responses(&self) -> Result<(), JsValue> {
        self.workbench()?.clear_responses();
        Ok(())
    }
}

/// Select-box options: `[{ value, label }]`
#[wasm_bindgen(js_name = relationOptions)]
pub fn js_relation_options() -> JsValue {
    serde_wasm_bindgen::to_value(&relation_options()).unwrap_or(JsValue::NULL)
}
