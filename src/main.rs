//! Diaglyph CLI
//!
//! Reads a diagram document (JSON wire format) from a file or stdin and
//! writes the rendered SVG to stdout.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;

use diaglyph::{DiagramModel, DiagramView, NotationType, StencilCache, Theme};

#[derive(Parser)]
#[command(name = "diaglyph")]
#[command(about = "Render diagram documents to SVG")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Theme file for color palette (TOML format)
    #[arg(short, long)]
    theme: Option<PathBuf>,

    /// Override the document's notation type (e.g. "business-process")
    #[arg(short, long)]
    notation: Option<String>,

    /// Insert line breaks between SVG elements
    #[arg(short, long)]
    pretty: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let theme = match &cli.theme {
        Some(path) => match Theme::from_file(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error loading theme '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Theme::default(),
    };

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut model = match DiagramModel::from_json(&source) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Error: invalid diagram document: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(name) = &cli.notation {
        match NotationType::parse(name) {
            Some(notation) => model.notation_type = notation,
            None => {
                eprintln!("Error: unknown notation '{}'", name);
                std::process::exit(1);
            }
        }
    }

    let mut view = DiagramView::new(theme, StencilCache::new());
    view.draw_diagram(&model);
    let svg = view.to_svg();
    if cli.pretty {
        println!("{}", svg.replace("><", ">\n<"));
    } else {
        println!("{}", svg);
    }
}
