use std::{fs, path::Path};

use super::{
    error::Error,
    grammar::{epsilon, Alternative},
    Grammar,
};

const ARROW: &str = "->";

impl Grammar {
    pub fn parse(grammar: &str) -> Self {
        Self::from_lines(grammar.lines())
    }

    /// Reads `LHS -> ALT | ALT ...` rules. Lines without an arrow are skipped.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut g = Self::new();

        for line in lines {
            let line = line.as_ref().trim();
            let (left, rights) = match line.split_once(ARROW) {
                Some(parts) => parts,
                None => continue,
            };
            let left = left.trim();

            let mut alternatives: Vec<Alternative> = rights
                .split('|')
                .map(|right| {
                    right
                        .split_whitespace()
                        .map(|s| s.to_string())
                        .collect::<Alternative>()
                })
                .filter(|right| !right.is_empty())
                .collect();
            if alternatives.is_empty() {
                alternatives.push(epsilon());
            }

            g.add_production(left, alternatives);
        }

        g
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::grammar::{Grammar, EPSILON};

    fn names(g: &Grammar) -> Vec<&str> {
        g.non_terminals.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn simple_parse() {
        let g = Grammar::parse("S -> a");

        assert_eq!(names(&g), vec!["S"]);
        assert_eq!(g.production("S").unwrap().rights, vec![vec!["a"]]);
    }

    #[test]
    fn simple_parse_with_space() {
        let g = Grammar::parse("  S   ->  a   b |c  ");

        assert_eq!(
            g.production("S").unwrap().rights,
            vec![vec!["a", "b"], vec!["c"]]
        );
    }

    #[test]
    fn lines_without_arrow_are_skipped() {
        let g = Grammar::parse("# comment\n\n  \nS -> A b\nA -> a\n| c");

        assert_eq!(names(&g), vec!["S", "A"]);
        assert_eq!(g.productions.len(), 2);
        assert_eq!(g.production("A").unwrap().rights, vec![vec!["a"]]);
    }

    #[test]
    fn empty_parse() {
        let g = Grammar::parse("  \n  ");

        assert!(g.productions.is_empty());
        assert_eq!(g.start_symbol(), None);
    }

    #[test]
    fn empty_right_side_is_epsilon() {
        let g = Grammar::parse("S ->\nT -> a | | b");

        assert_eq!(g.production("S").unwrap().rights, vec![vec![EPSILON]]);
        assert_eq!(
            g.production("T").unwrap().rights,
            vec![vec!["a"], vec!["b"]]
        );
    }

    #[test]
    fn non_terminals_in_first_seen_order() {
        let g = Grammar::parse("B -> A\nA -> a\nB -> b\nC -> c");

        assert_eq!(names(&g), vec!["B", "A", "C"]);
        assert_eq!(
            g.production("B").unwrap().rights,
            vec![vec!["A"], vec!["b"]]
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Grammar::from_file("this/grammar/does/not/exist.txt").unwrap_err();
        assert!(err.to_string().starts_with("Error opening"));
    }
}
