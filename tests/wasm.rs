//! Browser-side smoke tests for the `KinlogWorkbench` handle.
//!
//! Run with `wasm-pack test --node`. A tiny JS object stands in for the
//! Tau Prolog session.
#![cfg(target_arch = "wasm32")]

use kinlog::{
    LoadReport, Messages, Notification, NotificationKind, RecordDraft, RelativeRecord, TauSession,
    WorkbenchHandle,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

#[wasm_bindgen(inline_js = r#"
export function fakeSession() {
    return {
        left: [],
        consult(program, opts) {
            if (program.includes(':- broken')) { opts.error('syntax error'); return; }
            opts.success();
        },
        query(goal, opts) {
            if (!goal.endsWith('.')) { opts.error('syntax error'); return; }
            if (goal === 'true.') {
                this.left = [{ kind: 'success', value: 'true' }];
            } else if (goal === 'boom.') {
                this.left = [{ kind: 'error', value: { thrown: 'error(oops, here)' } }];
            } else if (goal === 'deep.') {
                this.left = [{ kind: 'success', value: 'true' }, { kind: 'limit' }, { kind: 'success', value: 'true' }];
            } else {
                this.left = [];
            }
            opts.success();
        },
        answer(opts) {
            const next = this.left.shift();
            if (!next) { opts.fail(); return; }
            if (next.kind === 'error') { opts.error(next.value); return; }
            if (next.kind === 'limit') { opts.limit(); return; }
            opts.success(next.value);
        },
        format_answer(answer) {
            if (answer === false) return 'false.';
            if (answer === null) return 'limit exceeded ;';
            if (answer && answer.thrown) return 'uncaught exception: ' + answer.thrown;
            return String(answer) + '.';
        },
    };
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = fakeSession)]
    fn fake_session() -> TauSession;
}

const FAMILY: &str = "relative(anna, boris, mother).\r\n\r\nrules.\r\n";

#[wasm_bindgen_test]
async fn open_then_list_rows() {
    let workbench = WorkbenchHandle::new(fake_session(), JsValue::UNDEFINED).unwrap();
    JsFuture::from(workbench.open_file("family.pl".into(), FAMILY.into()))
        .await
        .unwrap();

    let rows: Vec<RelativeRecord> = serde_wasm_bindgen::from_value(workbench.rows().unwrap()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].relative_name, "boris");
    assert!(workbench.can_save());
}

#[wasm_bindgen_test]
async fn query_fills_response() {
    let workbench = WorkbenchHandle::new(fake_session(), JsValue::UNDEFINED).unwrap();
    JsFuture::from(workbench.send_query("true.".into())).await.unwrap();
    assert_eq!(workbench.response().unwrap(), "true.");

    JsFuture::from(workbench.send_query("nothing.".into())).await.unwrap();
    assert_eq!(workbench.response().unwrap(), "false.");

    workbench.clear_responses().unwrap();
    assert_eq!(workbench.response().unwrap(), "");
}

#[wasm_bindgen_test]
async fn rejected_query_rejects_promise() {
    let workbench = WorkbenchHandle::new(fake_session(), JsValue::UNDEFINED).unwrap();
    let result = JsFuture::from(workbench.send_query("true".into())).await;
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn save_without_file_is_disabled() {
    let workbench = WorkbenchHandle::new(fake_session(), JsValue::UNDEFINED).unwrap();
    assert!(!workbench.can_save());
}

#[wasm_bindgen_test]
async fn engine_exception_rejects_and_replaces_response() {
    let workbench = WorkbenchHandle::new(fake_session(), JsValue::UNDEFINED).unwrap();
    JsFuture::from(workbench.send_query("true.".into())).await.unwrap();

    let result = JsFuture::from(workbench.send_query("boom.".into())).await;
    let err = result.unwrap_err().as_string().unwrap();
    assert!(err.contains("uncaught exception: error(oops, here)"), "{err}");
    assert_eq!(workbench.response().unwrap(), Messages::default().query_failed);

    let notifications: Vec<Notification> =
        serde_wasm_bindgen::from_value(workbench.take_notifications().unwrap()).unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Error);
}

#[wasm_bindgen_test]
async fn step_limit_is_shown_and_ends_goal() {
    let workbench = WorkbenchHandle::new(fake_session(), JsValue::UNDEFINED).unwrap();
    JsFuture::from(workbench.send_query("deep.".into())).await.unwrap();
    assert_eq!(workbench.response().unwrap(), "true.\r\nlimit exceeded ;");
}

#[wasm_bindgen_test]
async fn consult_failure_still_opens_rows() {
    let workbench = WorkbenchHandle::new(fake_session(), JsValue::UNDEFINED).unwrap();
    let text = "relative(anna, boris, mother).\r\n\r\nrules.\r\nx :- broken.\r\n";
    let report = JsFuture::from(workbench.open_file("family.pl".into(), text.into()))
        .await
        .unwrap();

    let report: LoadReport = serde_wasm_bindgen::from_value(report).unwrap();
    assert!(!report.consulted);
    assert_eq!(report.records, 1);

    let notifications: Vec<Notification> =
        serde_wasm_bindgen::from_value(workbench.take_notifications().unwrap()).unwrap();
    assert_eq!(notifications, vec![Notification::error(Messages::default().consult_failed)]);
}

#[wasm_bindgen_test]
fn added_rows_get_distinct_ids() {
    let workbench = WorkbenchHandle::new(fake_session(), JsValue::UNDEFINED).unwrap();
    let draft = serde_wasm_bindgen::to_value(&RecordDraft::default()).unwrap();

    let first = workbench.add_record(draft.clone()).unwrap();
    let second = workbench.add_record(draft).unwrap();
    assert_ne!(first, second);
}
