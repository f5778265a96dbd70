use std::fmt::Display;

use crowbook_text_processing::escape::tex as escape_tex;
use serde::Serialize;

use crate::Grammar;

use super::{grammar::Alternative, nullable_first_follow::NullableFirstFollow, EPSILON};

/// One alternative of one production record, identified by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableEntry {
    pub production: usize,
    pub alternative: usize,
    pub left: String,
    pub right: Alternative,
}

impl Display for TableEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.left, self.right.join(" "))
    }
}

/// Two alternatives competing for `[non_terminal, terminal]`. `kept` is the
/// one that stays in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub non_terminal: String,
    pub terminal: String,
    pub kept: TableEntry,
    pub rejected: TableEntry,
}

impl Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Conflict at [{}, {}]: {} and {}",
            self.non_terminal, self.terminal, self.kept, self.rejected
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LL1Row {
    pub left: String,
    pub cells: Vec<Option<TableEntry>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LL1ParsingTable {
    pub terminals: Vec<String>,
    pub rows: Vec<LL1Row>,
    pub conflicts: Vec<Conflict>,
}

const NOT_LL1_WARNING: &str = "Warning: Grammar is not LL(1) due to conflicts.";

impl LL1ParsingTable {
    pub fn is_ll1(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn get(&self, non_terminal: &str, terminal: &str) -> Option<&TableEntry> {
        let col = self.terminals.iter().position(|t| t == terminal)?;
        self.rows
            .iter()
            .find(|row| row.left == non_terminal)
            .and_then(|row| row.cells[col].as_ref())
    }

    /// First writer wins; a different alternative for a taken cell is a conflict.
    fn assign(&mut self, row: usize, terminal: &str, entry: &TableEntry) {
        let col = match self.terminals.iter().position(|t| t == terminal) {
            Some(col) => col,
            None => return,
        };
        let left = &self.rows[row].left;
        match &self.rows[row].cells[col] {
            Some(kept) if kept != entry => {
                let conflict = Conflict {
                    non_terminal: left.clone(),
                    terminal: terminal.to_string(),
                    kept: kept.clone(),
                    rejected: entry.clone(),
                };
                self.conflicts.push(conflict);
            }
            Some(_) => {}
            None => self.rows[row].cells[col] = Some(entry.clone()),
        }
    }

    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().cloned());
        let mut output: Vec<Vec<String>> = vec![header];
        for row in &self.rows {
            let mut line: Vec<String> = vec![row.left.clone()];
            line.extend(row.cells.iter().map(|cell| match cell {
                Some(entry) => entry.to_string(),
                None => String::new(),
            }));
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| {
                output
                    .iter()
                    .map(|line| line[j].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let mut lines: Vec<String> = output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect();

        if !self.is_ll1() {
            lines.extend(self.conflicts.iter().map(|c| c.to_string()));
            lines.push(NOT_LL1_WARNING.to_string());
        }
        lines.join("\n")
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|t| format!("\\text{{{}}}", escape_tex(t.as_str()))),
        );
        let header = header.join(" & ");

        let mut output: Vec<String> = Vec::new();
        for row in &self.rows {
            let mut line: Vec<String> = vec![escape_tex(row.left.as_str()).to_string()];
            line.extend(row.cells.iter().map(|cell| match cell {
                Some(entry) => entry_to_latex(entry),
                None => String::new(),
            }));
            output.push(line.join(" & "));
        }
        let output = output.join("\\\\\n");

        let mut latex = header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]";
        for conflict in &self.conflicts {
            latex.push_str(&format!(
                "\n\n\\noindent\\textbf{{Conflict}} at $[{}, \\text{{{}}}]$: ${}$ and ${}$",
                escape_tex(conflict.non_terminal.as_str()),
                escape_tex(conflict.terminal.as_str()),
                entry_to_latex(&conflict.kept),
                entry_to_latex(&conflict.rejected),
            ));
        }
        latex
    }
}

fn entry_to_latex(entry: &TableEntry) -> String {
    let right = entry
        .right
        .iter()
        .map(|s| escape_tex(s.as_str()).to_string())
        .collect::<Vec<_>>()
        .join(" \\ ");
    format!("{} \\rightarrow {}", escape_tex(entry.left.as_str()), right)
        .replace(EPSILON, "\\epsilon")
}

impl Grammar {
    pub fn generate_ll1_parsing_table(&self, nff: &NullableFirstFollow) -> LL1ParsingTable {
        let terminals: Vec<String> = self.terminals().iter().map(|t| t.to_string()).collect();
        let rows: Vec<LL1Row> = self
            .non_terminals
            .iter()
            .map(|nt| LL1Row {
                left: nt.clone(),
                cells: vec![None; terminals.len()],
            })
            .collect();
        let mut table = LL1ParsingTable {
            terminals,
            rows,
            conflicts: Vec::new(),
        };

        for (production_idx, production) in self.productions.iter().enumerate() {
            let row = match self.non_terminals.get_index_of(production.left.as_str()) {
                Some(row) => row,
                None => continue,
            };
            for (alternative_idx, right) in production.rights.iter().enumerate() {
                let entry = TableEntry {
                    production: production_idx,
                    alternative: alternative_idx,
                    left: production.left.clone(),
                    right: right.clone(),
                };

                let first = self.calculate_first_for_production(right, &nff.nullable, &nff.first);
                for t in &first {
                    table.assign(row, t, &entry);
                }

                if self.is_production_nullable(right, &nff.nullable) {
                    if let Some(follow) = nff.follow_of(&production.left) {
                        for t in follow {
                            table.assign(row, t, &entry);
                        }
                    }
                }
            }
        }

        table
    }
}
