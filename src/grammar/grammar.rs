use std::collections::HashMap;

use indexmap::IndexSet;

use super::EPSILON;

pub type Alternative = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub left: String,
    pub rights: Vec<Alternative>,
}

impl Production {
    pub fn new(left: String, rights: Vec<Alternative>) -> Self {
        Self { left, rights }
    }
}

/// How a symbol name is read against the current non-terminal registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol<'a> {
    NonTerminal(&'a str),
    Terminal(&'a str),
    Epsilon,
}

#[derive(Debug, Clone, Default)]
pub struct Grammar {
    pub productions: Vec<Production>,
    pub non_terminals: IndexSet<String>,
    /// Position of the first production record for each left side.
    positions: HashMap<String, usize>,
}

pub fn epsilon() -> Alternative {
    vec![EPSILON.to_string()]
}

pub fn is_epsilon(alternative: &[String]) -> bool {
    alternative.iter().all(|s| s == EPSILON)
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_symbol(&self) -> Option<&str> {
        self.non_terminals.first().map(|s| s.as_str())
    }

    pub fn is_non_terminal(&self, name: &str) -> bool {
        self.non_terminals.contains(name)
    }

    pub fn classify<'a>(&self, name: &'a str) -> Symbol<'a> {
        if name == EPSILON {
            Symbol::Epsilon
        } else if self.is_non_terminal(name) {
            Symbol::NonTerminal(name)
        } else {
            Symbol::Terminal(name)
        }
    }

    pub fn production(&self, left: &str) -> Option<&Production> {
        self.positions.get(left).map(|&idx| &self.productions[idx])
    }

    /// Appends alternatives to the first record of `left`, creating the record
    /// and registering `left` as a non-terminal when it is new.
    pub fn add_production(&mut self, left: &str, rights: Vec<Alternative>) {
        self.non_terminals.insert(left.to_string());
        if let Some(&idx) = self.positions.get(left) {
            self.productions[idx].rights.extend(rights);
            return;
        }
        self.positions
            .insert(left.to_string(), self.productions.len());
        self.productions
            .push(Production::new(left.to_string(), rights));
    }

    pub fn replace_alternatives(&mut self, left: &str, rights: Vec<Alternative>) {
        if let Some(&idx) = self.positions.get(left) {
            self.productions[idx].rights = rights;
        } else {
            self.add_production(left, rights);
        }
    }

    /// Picks `base'`, `base''`, ... until the name is unused, and reserves it.
    pub fn fresh_non_terminal(&mut self, base: &str) -> String {
        let mut name = format!("{}'", base);
        while self.non_terminals.contains(&name) {
            name.push('\'');
        }
        self.non_terminals.insert(name.clone());
        name
    }

    /// Terminals in order of first appearance across all alternatives, with
    /// `$` appended when the grammar does not already use it.
    pub fn terminals(&self) -> IndexSet<&str> {
        let mut terminals: IndexSet<&str> = self
            .productions
            .iter()
            .flat_map(|p| p.rights.iter())
            .flat_map(|right| right.iter())
            .filter_map(|s| match self.classify(s) {
                Symbol::Terminal(t) => Some(t),
                _ => None,
            })
            .collect();
        terminals.insert(super::END_MARK);
        terminals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_names_skip_taken_ones() {
        let mut g = Grammar::new();
        g.add_production("A", vec![vec!["a".to_string()]]);
        g.add_production("A'", vec![vec!["b".to_string()]]);

        assert_eq!(g.fresh_non_terminal("A"), "A''");
        assert_eq!(g.fresh_non_terminal("A"), "A'''");
        assert!(g.is_non_terminal("A''"));
    }

    #[test]
    fn duplicate_left_sides_share_the_first_record() {
        let mut g = Grammar::new();
        g.add_production("S", vec![vec!["a".to_string()]]);
        g.add_production("T", vec![vec!["t".to_string()]]);
        g.add_production("S", vec![vec!["b".to_string()]]);

        assert_eq!(g.productions.len(), 2);
        assert_eq!(g.production("S").unwrap().rights.len(), 2);
        assert_eq!(g.start_symbol(), Some("S"));
    }

    #[test]
    fn classify_symbols() {
        let mut g = Grammar::new();
        g.add_production("S", vec![vec!["x".to_string()]]);

        assert_eq!(g.classify("S"), Symbol::NonTerminal("S"));
        assert_eq!(g.classify("x"), Symbol::Terminal("x"));
        assert_eq!(g.classify(EPSILON), Symbol::Epsilon);
    }
}
