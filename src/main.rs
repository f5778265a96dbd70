use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process,
};

use clap::{Parser, ValueEnum};
use ll1_course_helper::{Error, Grammar, Pipeline, Sections};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Section {
    /// Productions after each transformation
    Prod,
    /// Nullable, first and follow
    Nff,
    /// LL(1) parsing table
    Ll1,
}

enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Grammar file (default: stdin)
    grammar: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print in LaTeX format
    #[arg(short, long, conflicts_with = "json")]
    latex: bool,

    /// Print in JSON format
    #[arg(short, long)]
    json: bool,

    /// Sections to print
    #[arg(
        short,
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [Section::Prod, Section::Nff, Section::Ll1]
    )]
    sections: Vec<Section>,
}

fn read_grammar(path: Option<&Path>) -> Result<Grammar, Error> {
    match path {
        Some(path) => Grammar::from_file(path),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|source| Error::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(Grammar::parse(&input))
        }
    }
}

fn render(p: &Pipeline, sections: &[Section], format: &OutputFormat) -> String {
    if let OutputFormat::JSON = format {
        let selected = Sections {
            productions: sections.contains(&Section::Prod),
            sets: sections.contains(&Section::Nff),
            table: sections.contains(&Section::Ll1),
        };
        return p.to_json(selected);
    }

    let mut parts: Vec<String> = Vec::new();
    for section in sections {
        match section {
            Section::Prod => {
                for stage in p.stages() {
                    parts.push(match format {
                        OutputFormat::LaTeX => stage.to_latex(),
                        _ => stage.to_plaintext(),
                    });
                }
            }
            Section::Nff => {
                let t = p.nff.to_non_terminal_output_vec();
                parts.push(match format {
                    OutputFormat::LaTeX => t.to_latex(),
                    _ => t.to_plaintext(),
                });
            }
            Section::Ll1 => parts.push(match format {
                OutputFormat::LaTeX => p.table.to_latex(),
                _ => format!("LL(1) Parsing Table:\n{}", p.table.to_plaintext()),
            }),
        }
    }
    parts.join("\n\n")
}

fn main() {
    let cli = Cli::parse();

    let output_format = if cli.latex {
        OutputFormat::LaTeX
    } else if cli.json {
        OutputFormat::JSON
    } else {
        OutputFormat::Plain
    };

    let g = match read_grammar(cli.grammar.as_deref()) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let pipeline = Pipeline::run(g);
    let report = render(&pipeline, &cli.sections, &output_format);

    match &cli.output {
        Some(path) => {
            if let Err(source) = fs::write(path, report + "\n") {
                eprintln!(
                    "{}",
                    Error::Io {
                        path: path.clone(),
                        source
                    }
                );
                process::exit(1);
            }
            println!("Processing complete. Output written to {}", path.display());
        }
        None => println!("{}", report),
    }
}
