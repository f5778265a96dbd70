use std::collections::VecDeque;

use indexmap::IndexMap;

use super::{
    grammar::{epsilon, is_epsilon, Alternative},
    Grammar, EPSILON,
};

impl Grammar {
    /// Factors out leading symbols shared by several alternatives of the same
    /// non-terminal. Every non-terminal introduced here is factored in turn.
    pub fn left_factor(&mut self) {
        let mut queue: VecDeque<String> =
            self.productions.iter().map(|p| p.left.clone()).collect();

        while let Some(left) = queue.pop_front() {
            let rights: Vec<Alternative> = match self.production(&left) {
                Some(production) => production.rights.iter().map(|r| strip_epsilon(r)).collect(),
                None => continue,
            };

            let mut groups: IndexMap<&str, Vec<&Alternative>> = IndexMap::new();
            for right in &rights {
                if let Some(first) = right.first() {
                    groups.entry(first.as_str()).or_default().push(right);
                }
            }

            let mut new_rights: Vec<Alternative> = Vec::new();
            for (first, group) in groups {
                if group.len() == 1 {
                    new_rights.push(group[0].clone());
                    continue;
                }
                // after stripping, only bare ε alternatives start with ε
                if first == EPSILON {
                    new_rights.push(epsilon());
                    continue;
                }

                let left_prime = self.fresh_non_terminal(&left);
                let suffixes: Vec<Alternative> = group
                    .iter()
                    .map(|right| {
                        if right.len() > 1 {
                            right[1..].to_vec()
                        } else {
                            epsilon()
                        }
                    })
                    .collect();
                self.add_production(&left_prime, suffixes);
                new_rights.push(vec![first.to_string(), left_prime.clone()]);
                queue.push_back(left_prime);
            }

            self.replace_alternatives(&left, new_rights);
        }
    }
}

/// Drops leading ε symbols from an alternative that has other symbols.
fn strip_epsilon(right: &[String]) -> Alternative {
    if is_epsilon(right) {
        return epsilon();
    }
    right
        .iter()
        .skip_while(|s| s.as_str() == EPSILON)
        .cloned()
        .collect()
}
