//! WebAssembly bindings for xmlstats
//!
//! Exposes the scanner to JavaScript. It's only compiled when targeting wasm32.

#![cfg(target_arch = "wasm32")]

use crate::{scan, ScanReport};
use wasm_bindgen::prelude::*;

// Set panic hook for better error messages in browser
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

// Use smaller allocator for WASM
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Result type for JavaScript interop
#[wasm_bindgen]
#[derive(Debug)]
pub struct StatsResult {
    report: Option<ScanReport>,
    error: Option<String>,
}

#[wasm_bindgen]
impl StatsResult {
    #[wasm_bindgen(getter)]
    pub fn success(&self) -> bool {
        self.report.is_some()
    }

    #[wasm_bindgen(getter, js_name = letterCount)]
    pub fn letter_count(&self) -> usize {
        self.report.as_ref().map_or(0, |r| r.stats.letter_count)
    }

    #[wasm_bindgen(getter, js_name = totalLinkCount)]
    pub fn total_link_count(&self) -> usize {
        self.report.as_ref().map_or(0, |r| r.stats.total_link_count)
    }

    #[wasm_bindgen(getter, js_name = brokenLinkCount)]
    pub fn broken_link_count(&self) -> usize {
        self.report.as_ref().map_or(0, |r| r.stats.broken_link_count)
    }

    #[wasm_bindgen(getter, js_name = brokenLinks)]
    pub fn broken_links(&self) -> Vec<String> {
        self.report
            .as_ref()
            .map(|r| r.broken_links.clone())
            .unwrap_or_default()
    }

    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }
}

/// Scan a document; never throws, failures are reported through `error`
#[wasm_bindgen]
pub fn analyze(document: &str) -> StatsResult {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    match scan(document) {
        Ok(report) => StatsResult {
            report: Some(report),
            error: None,
        },
        Err(e) => StatsResult {
            report: None,
            error: Some(e.format_with_context(document)),
        },
    }
}

/// Scan a document and return the stats as a plain object
/// (`{ letterCount, totalLinkCount, brokenLinkCount, brokenLinks }`); throws the
/// error message on malformed input.
#[wasm_bindgen(js_name = computeStats)]
pub fn compute_stats_js(document: &str) -> Result<JsValue, JsValue> {
    let report = scan(document).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
