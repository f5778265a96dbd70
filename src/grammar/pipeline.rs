use serde::Serialize;

use super::{
    ll1_parsing_table::LL1ParsingTable,
    nullable_first_follow::NullableFirstFollow,
    pretty_print::{NonTerminalOutputVec, ProductionOutputVec},
    Grammar,
};

pub const ORIGINAL_STAGE: &str = "Original Grammar";
pub const FACTORED_STAGE: &str = "After Left Factoring";
pub const NON_RECURSIVE_STAGE: &str = "After Left Recursion Removal";

/// The grammar as it looked after each transformation, plus everything
/// derived from the final one.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub original: Grammar,
    pub factored: Grammar,
    pub grammar: Grammar,
    pub nff: NullableFirstFollow,
    pub table: LL1ParsingTable,
}

/// Which parts of the report to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections {
    pub productions: bool,
    pub sets: bool,
    pub table: bool,
}

impl Default for Sections {
    fn default() -> Self {
        Self {
            productions: true,
            sets: true,
            table: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PipelineOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<ProductionOutputVec<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<NonTerminalOutputVec<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<&'a LL1ParsingTable>,
    pub ll1: bool,
}

impl Pipeline {
    pub fn run(mut grammar: Grammar) -> Self {
        let original = grammar.clone();
        grammar.left_factor();
        let factored = grammar.clone();
        grammar.eliminate_left_recursion();

        let nff = grammar.calculate_nullable_first_follow();
        let table = grammar.generate_ll1_parsing_table(&nff);

        Self {
            original,
            factored,
            grammar,
            nff,
            table,
        }
    }

    pub fn stages(&self) -> Vec<ProductionOutputVec> {
        vec![
            self.original.to_production_output_vec(ORIGINAL_STAGE),
            self.factored.to_production_output_vec(FACTORED_STAGE),
            self.grammar.to_production_output_vec(NON_RECURSIVE_STAGE),
        ]
    }

    pub fn to_output(&self, sections: Sections) -> PipelineOutput {
        PipelineOutput {
            stages: sections.productions.then(|| self.stages()),
            sets: sections
                .sets
                .then(|| self.nff.to_non_terminal_output_vec()),
            table: sections.table.then_some(&self.table),
            ll1: self.table.is_ll1(),
        }
    }

    pub fn to_json(&self, sections: Sections) -> String {
        serde_json::to_string(&self.to_output(sections)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::{
        pipeline::{Pipeline, Sections},
        Grammar,
    };

    #[test]
    fn stages_are_snapshots() {
        let p = Pipeline::run(Grammar::parse("A -> A a | A b | c"));

        assert_eq!(p.original.productions.len(), 1);
        assert_eq!(p.factored.productions.len(), 2);
        assert_eq!(p.grammar.productions.len(), 3);
        assert!(!p.grammar.has_left_recursion());
    }

    #[test]
    fn json_carries_every_part() {
        let json = Pipeline::run(Grammar::parse("S -> a | a b")).to_json(Sections::default());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["stages"].as_array().unwrap().len(), 3);
        assert_eq!(value["ll1"], serde_json::Value::Bool(true));
        assert_eq!(value["table"]["terminals"][0], "a");
    }

    #[test]
    fn json_keeps_only_selected_sections() {
        let sections = Sections {
            productions: false,
            sets: true,
            table: false,
        };
        let json = Pipeline::run(Grammar::parse("S -> a")).to_json(sections);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value.get("stages").is_none());
        assert!(value.get("table").is_none());
        assert_eq!(value["sets"]["data"][0]["name"], "S");
    }
}
