//! KinLog: Family Relations Table + Prolog Query Session
//!
//! A Rust/WASM core for the family-relations Prolog workbench form.
//!
//! # Architecture
//!
//! ## Document Components
//! - `relation.rs` - Relation vocabulary (predicate atoms + UI labels)
//! - `record.rs` - RelativeRecord rows, drafts and field edits
//! - `codec.rs` - FactCodec: row <-> `relative(name, relative, relation).`
//! - `document.rs` - DocumentSplitter: fact lines / sentinel / rule text
//!
//! ## Session Components
//! - `engine.rs` - LogicEngine trait (the external Prolog engine seam)
//! - `protocol.rs` - QuerySession: consult, query, pull-based answer stream
//! - `response.rs` - ResponseBuffer for the response area
//!
//! ## Application
//! - `table/` - RelativesTable state controller + notifications
//! - `workbench.rs` - Workbench: open / save / query flow
//! - `wasm/` - Tau Prolog adapter and the `KinlogWorkbench` JS handle
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import pl from 'tau-prolog';
//! import init, { KinlogWorkbench, relationOptions } from 'kinlog';
//!
//! await init();
//!
//! const workbench = new KinlogWorkbench(pl.create(), { session: { maxAnswers: 50 } });
//!
//! // File picker hands over the text of a .pl file
//! await workbench.openFile('family.pl', text);
//! console.log(workbench.rows());     // [{ id, name, relativeName, relation }]
//!
//! workbench.addRecord({ name: 'vera', relativeName: 'anna', relation: 'daughter' });
//! const saved = await workbench.saveFile(); // { fileName, content, mimeType }
//!
//! const { response } = await workbench.sendQuery('relative(anna, X, mother).');
//! console.log(workbench.takeNotifications());
//! ```

pub mod config;
pub mod console;
pub mod relatives;
pub mod session;
pub mod table;
pub mod workbench;
pub mod wasm;

// Public exports
pub use config::*;
pub use relatives::*;
pub use session::*;
pub use table::*;
pub use workbench::*;
pub use wasm::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("kinlog v{}", env!("CARGO_PKG_VERSION"))
}
