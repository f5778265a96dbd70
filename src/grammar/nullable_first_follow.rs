use indexmap::{IndexMap, IndexSet};

use super::{
    grammar::{is_epsilon, Symbol},
    Grammar, END_MARK,
};

pub type SymbolSet = IndexSet<String>;

/// NULLABLE, FIRST and FOLLOW keyed by non-terminal name, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullableFirstFollow {
    pub nullable: IndexMap<String, bool>,
    pub first: IndexMap<String, SymbolSet>,
    pub follow: IndexMap<String, SymbolSet>,
}

impl NullableFirstFollow {
    pub fn is_nullable(&self, non_terminal: &str) -> bool {
        self.nullable.get(non_terminal).copied().unwrap_or(false)
    }

    pub fn first_of(&self, non_terminal: &str) -> Option<&SymbolSet> {
        self.first.get(non_terminal)
    }

    pub fn follow_of(&self, non_terminal: &str) -> Option<&SymbolSet> {
        self.follow.get(non_terminal)
    }
}

impl Grammar {
    pub fn calculate_nullable_first_follow(&self) -> NullableFirstFollow {
        let nullable = self.calculate_nullable();
        let first = self.calculate_first(&nullable);
        let follow = self.calculate_follow(&nullable, &first);
        NullableFirstFollow {
            nullable,
            first,
            follow,
        }
    }

    /// True when every symbol of `production` can derive ε.
    pub fn is_production_nullable(
        &self,
        production: &[String],
        nullable: &IndexMap<String, bool>,
    ) -> bool {
        production.iter().all(|s| match self.classify(s) {
            Symbol::Epsilon => true,
            Symbol::Terminal(_) => false,
            Symbol::NonTerminal(nt) => nullable.get(nt).copied().unwrap_or(false),
        })
    }

    /// FIRST of a symbol sequence against the current FIRST sets.
    pub fn calculate_first_for_production(
        &self,
        production: &[String],
        nullable: &IndexMap<String, bool>,
        first: &IndexMap<String, SymbolSet>,
    ) -> SymbolSet {
        let mut result = SymbolSet::new();
        for symbol in production {
            match self.classify(symbol) {
                Symbol::Epsilon => continue,
                Symbol::Terminal(t) => {
                    result.insert(t.to_string());
                    break;
                }
                Symbol::NonTerminal(nt) => {
                    if let Some(set) = first.get(nt) {
                        result.extend(set.iter().cloned());
                    }
                    if !nullable.get(nt).copied().unwrap_or(false) {
                        break;
                    }
                }
            }
        }
        result
    }

    fn calculate_nullable(&self) -> IndexMap<String, bool> {
        let mut nullable: IndexMap<String, bool> = self
            .non_terminals
            .iter()
            .map(|nt| (nt.clone(), false))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                if nullable[production.left.as_str()] {
                    continue;
                }
                let is_nullable = production
                    .rights
                    .iter()
                    .any(|right| self.is_production_nullable(right, &nullable));
                if is_nullable {
                    nullable.insert(production.left.clone(), true);
                    changed = true;
                }
            }
        }
        nullable
    }

    fn calculate_first(&self, nullable: &IndexMap<String, bool>) -> IndexMap<String, SymbolSet> {
        let mut first: IndexMap<String, SymbolSet> = self
            .non_terminals
            .iter()
            .map(|nt| (nt.clone(), SymbolSet::new()))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                for right in production.rights.iter().filter(|r| !is_epsilon(r)) {
                    let additions = self.calculate_first_for_production(right, nullable, &first);
                    let set = first.entry(production.left.clone()).or_default();
                    for t in additions {
                        changed |= set.insert(t);
                    }
                }
            }
        }
        first
    }

    fn calculate_follow(
        &self,
        nullable: &IndexMap<String, bool>,
        first: &IndexMap<String, SymbolSet>,
    ) -> IndexMap<String, SymbolSet> {
        let mut follow: IndexMap<String, SymbolSet> = self
            .non_terminals
            .iter()
            .map(|nt| (nt.clone(), SymbolSet::new()))
            .collect();
        match self.start_symbol() {
            Some(start) => {
                follow
                    .entry(start.to_string())
                    .or_default()
                    .insert(END_MARK.to_string());
            }
            None => return follow,
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                for right in production.rights.iter().filter(|r| !is_epsilon(r)) {
                    for (k, symbol) in right.iter().enumerate() {
                        let b = match self.classify(symbol) {
                            Symbol::NonTerminal(nt) => nt,
                            _ => continue,
                        };
                        let rest = &right[k + 1..];
                        let mut additions = self.calculate_first_for_production(rest, nullable, first);
                        if self.is_production_nullable(rest, nullable) {
                            if let Some(left_follow) = follow.get(production.left.as_str()) {
                                additions.extend(left_follow.iter().cloned());
                            }
                        }
                        let set = follow.entry(b.to_string()).or_default();
                        for t in additions {
                            changed |= set.insert(t);
                        }
                    }
                }
            }
        }
        follow
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::SymbolSet;
    use crate::grammar::Grammar;

    const EXPRESSION: &str = "E -> T E2
E2 -> + T E2 | ε
T -> F T2
T2 -> * F T2 | ε
F -> ( E ) | id";

    fn set(items: &[&str]) -> SymbolSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn expression_grammar_sets() {
        let g = Grammar::parse(EXPRESSION);
        let nff = g.calculate_nullable_first_follow();

        assert!(!nff.is_nullable("E"));
        assert!(nff.is_nullable("E2"));
        assert!(nff.is_nullable("T2"));

        assert_eq!(nff.first_of("E").unwrap(), &set(&["(", "id"]));
        assert_eq!(nff.first_of("E2").unwrap(), &set(&["+"]));
        assert_eq!(nff.first_of("T2").unwrap(), &set(&["*"]));

        assert_eq!(nff.follow_of("E").unwrap(), &set(&["$", ")"]));
        assert_eq!(nff.follow_of("E2").unwrap(), &set(&["$", ")"]));
        assert_eq!(nff.follow_of("T").unwrap(), &set(&["+", "$", ")"]));
        assert_eq!(nff.follow_of("T2").unwrap(), &set(&["+", "$", ")"]));
        assert_eq!(nff.follow_of("F").unwrap(), &set(&["*", "+", "$", ")"]));
    }

    #[test]
    fn nullable_through_non_terminals() {
        let g = Grammar::parse("S -> A B c\nA -> B B\nB -> b | ε");
        let nff = g.calculate_nullable_first_follow();

        assert!(nff.is_nullable("B"));
        assert!(nff.is_nullable("A"));
        assert!(!nff.is_nullable("S"));
        assert_eq!(nff.first_of("S").unwrap(), &set(&["b", "c"]));
        assert_eq!(nff.follow_of("A").unwrap(), &set(&["b", "c"]));
        assert_eq!(nff.follow_of("B").unwrap(), &set(&["b", "c"]));
    }

    #[test]
    fn sets_do_not_depend_on_rule_order() {
        let reordered = "E -> T E2
F -> ( E ) | id
T2 -> ε | * F T2
T -> F T2
E2 -> ε | + T E2";
        let a = Grammar::parse(EXPRESSION).calculate_nullable_first_follow();
        let b = Grammar::parse(reordered).calculate_nullable_first_follow();

        assert_eq!(a, b);
    }

    #[test]
    fn recomputing_gives_the_same_sets() {
        let g = Grammar::parse(EXPRESSION);

        assert_eq!(
            g.calculate_nullable_first_follow(),
            g.calculate_nullable_first_follow()
        );
    }

    #[test]
    fn alternative_first_is_subset_of_owner_first() {
        let g = Grammar::parse("S -> A a | b S | ε\nA -> c | S d");
        let nff = g.calculate_nullable_first_follow();

        for production in &g.productions {
            let owner = nff.first_of(&production.left).unwrap();
            for right in &production.rights {
                let first = g.calculate_first_for_production(right, &nff.nullable, &nff.first);
                assert!(first.is_subset(owner), "{:?} of {}", right, production.left);
            }
        }
    }
}
