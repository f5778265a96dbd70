use super::{
    grammar::{epsilon, is_epsilon, Alternative},
    Grammar,
};

impl Grammar {
    /// Rewrites `A -> A a | b` into `A -> b A'`, `A' -> a A' | ε`.
    ///
    /// Only immediate left recursion is removed. Non-terminals created by this
    /// pass are not visited again.
    pub fn eliminate_left_recursion(&mut self) {
        let lefts: Vec<String> = self.productions.iter().map(|p| p.left.clone()).collect();

        for left in lefts {
            let old_productions = match self.production(&left) {
                Some(production) => production.rights.clone(),
                None => continue,
            };

            let old_len = old_productions.len();
            let mut recursive_productions: Vec<Alternative> = Vec::new();
            let mut productions: Vec<Alternative> = Vec::new();
            for production in old_productions {
                if production.first() == Some(&left) {
                    if production.len() > 1 {
                        recursive_productions.push(production[1..].to_vec());
                    }
                } else {
                    productions.push(production);
                }
            }

            if recursive_productions.is_empty() {
                // only `A -> A` cycles were dropped
                if productions.len() != old_len {
                    self.replace_alternatives(&left, productions);
                }
                continue;
            }

            let left_prime = self.fresh_non_terminal(&left);
            for production in &mut productions {
                if is_epsilon(production) {
                    production.clear();
                }
                production.push(left_prime.clone());
            }
            for production in &mut recursive_productions {
                production.push(left_prime.clone());
            }
            recursive_productions.push(epsilon());

            self.replace_alternatives(&left, productions);
            self.add_production(&left_prime, recursive_productions);
        }
    }

    pub fn has_left_recursion(&self) -> bool {
        self.productions
            .iter()
            .any(|p| p.rights.iter().any(|right| right.first() == Some(&p.left)))
    }
}
