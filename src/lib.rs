extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::error::Error;
pub use grammar::pipeline::{Pipeline, Sections};
pub use grammar::Grammar;

/// Runs the whole pipeline and returns the report as JSON.
#[wasm_bindgen]
pub fn ll1_report_to_json(grammar: &str) -> String {
    let g = crate::Grammar::parse(grammar);
    if g.start_symbol().is_none() {
        return "{\"error\":\"grammar has no production\"}".to_string();
    }
    Pipeline::run(g).to_json(Sections::default())
}
