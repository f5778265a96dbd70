use crowbook_text_processing::escape;
use serde::Serialize;

use super::{nullable_first_follow::NullableFirstFollow, Grammar, EPSILON};

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize) -> String {
        let rights = self
            .rights
            .iter()
            .map(|right| right.join(" "))
            .collect::<Vec<_>>()
            .join(" | ");
        format!("{:>width$} -> {}", self.left, rights, width = left_width)
    }

    pub fn to_latex(&self) -> String {
        let left = format!("{} & \\rightarrow &", escape::tex(self.left));
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| escape::tex(*s))
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        let output = left + &right;
        output.replace(EPSILON, "\\epsilon")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutputVec<'a> {
    pub stage: &'a str,
    pub productions: Vec<ProductionOutput<'a>>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.chars().count())
            .max()
            .unwrap_or(0);
        std::iter::once(format!("{}:", self.stage))
            .chain(self.productions.iter().map(|s| s.to_plaintext(left_max_len)))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        if self.productions.is_empty() {
            return format!("\\paragraph{{{}}}", escape::tex(self.stage));
        }
        let body = std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|s| s.to_latex()))
            .collect::<Vec<String>>()
            .join("\\\\\n");
        format!(
            "\\paragraph{{{}}}\n{}\n\\end{{array}}\\]",
            escape::tex(self.stage),
            body
        )
    }
}

impl Grammar {
    pub fn to_production_output_vec<'a>(&'a self, stage: &'a str) -> ProductionOutputVec<'a> {
        let productions = self
            .productions
            .iter()
            .map(|production| ProductionOutput {
                left: production.left.as_str(),
                rights: production
                    .rights
                    .iter()
                    .map(|right| right.iter().map(|s| s.as_str()).collect())
                    .collect(),
            })
            .collect();
        ProductionOutputVec { stage, productions }
    }
}

#[derive(Debug, Serialize)]
struct NonTerminalOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl NonTerminalOutput<'_> {
    fn to_latex(&self) -> String {
        fn f(a: &[&str]) -> String {
            a.iter()
                .map(|s| escape::tex(*s))
                .collect::<Vec<_>>()
                .join(r"\ ")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Debug, Serialize)]
pub struct NonTerminalOutputVec<'a> {
    data: Vec<NonTerminalOutput<'a>>,
}

impl NonTerminalOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let nullable = self
            .data
            .iter()
            .filter(|nt| nt.nullable)
            .map(|nt| nt.name)
            .collect::<Vec<_>>()
            .join(", ");
        let first = self
            .data
            .iter()
            .map(|nt| format!("First({}) = {{ {} }}", nt.name, nt.first.join(", ")));
        let follow = self
            .data
            .iter()
            .map(|nt| format!("Follow({}) = {{ {} }}", nt.name, nt.follow.join(", ")));

        std::iter::once(format!("Nullable: {{ {} }}", nullable))
            .chain(std::iter::once(String::new()))
            .chain(std::iter::once("First Sets:".to_string()))
            .chain(first)
            .chain(std::iter::once(String::new()))
            .chain(std::iter::once("Follow Sets:".to_string()))
            .chain(follow)
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl NullableFirstFollow {
    pub fn to_non_terminal_output_vec(&self) -> NonTerminalOutputVec {
        let data = self
            .nullable
            .iter()
            .map(|(name, &nullable)| NonTerminalOutput {
                name: name.as_str(),
                nullable,
                first: self
                    .first_of(name)
                    .map(|set| set.iter().map(|s| s.as_str()).collect())
                    .unwrap_or_default(),
                follow: self
                    .follow_of(name)
                    .map(|set| set.iter().map(|s| s.as_str()).collect())
                    .unwrap_or_default(),
            })
            .collect();
        NonTerminalOutputVec { data }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::grammar::Grammar;

    #[test]
    fn productions_one_per_line() {
        let g = Grammar::parse("S -> a S | ε\nAB -> b");

        assert_eq!(
            g.to_production_output_vec("Original Grammar").to_plaintext(),
            "Original Grammar:\n S -> a S | ε\nAB -> b"
        );
    }

    #[test]
    fn productions_latex_uses_epsilon() {
        let g = Grammar::parse("S -> a | ε");
        let latex = g.to_production_output_vec("Original Grammar").to_latex();

        assert!(latex.contains("S & \\rightarrow &a \\mid \\epsilon"));
    }

    #[test]
    fn sets_in_discovery_order() {
        let g = Grammar::parse("S -> A b\nA -> a | ε");
        let output = g
            .calculate_nullable_first_follow()
            .to_non_terminal_output_vec()
            .to_plaintext();

        assert_eq!(
            output,
            "Nullable: { A }\n\
             \n\
             First Sets:\n\
             First(S) = { a, b }\n\
             First(A) = { a }\n\
             \n\
             Follow Sets:\n\
             Follow(S) = { $ }\n\
             Follow(A) = { b }"
        );
    }

    #[test]
    fn sets_as_json() {
        let g = Grammar::parse("S -> a");
        let json = g
            .calculate_nullable_first_follow()
            .to_non_terminal_output_vec()
            .to_json();

        assert_eq!(
            json,
            r#"{"data":[{"name":"S","nullable":false,"first":["a"],"follow":["$"]}]}"#
        );
    }
}
