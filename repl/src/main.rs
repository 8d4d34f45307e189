mod config;
mod editor;

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::process;

use emlogo::{
    Lexer, LineCursor, LineSource, Node, Parsed, Reader, ReaderLines, Word, ranked, tally_with,
};
use tracing::debug;

use config::{Config, Mode};
use editor::EditorLines;

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // Only initialize if RUST_LOG is set
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn is_bye(tree: &Node) -> bool {
    match tree.children() {
        Some([Node::Atom(word)]) => *word == Word::from_text("bye"),
        _ => false,
    }
}

fn report(parsed: &Parsed) {
    for warning in &parsed.warnings {
        eprintln!("warning: {warning}");
    }
}

fn echo<L: LineSource>(reader: &mut Reader<L>, stop_on_bye: bool) -> Result<(), String> {
    while let Some(parsed) = reader.read().map_err(|e| e.to_string())? {
        report(&parsed);
        if stop_on_bye && is_bye(&parsed.tree) {
            break;
        }
        if parsed.tree.children().is_some_and(|c| !c.is_empty()) {
            println!("{}", parsed.tree);
        }
    }
    Ok(())
}

fn repl(config: &Config) -> Result<(), String> {
    let lines = EditorLines::new(config.history.clone()).map_err(|e| e.to_string())?;
    let mut reader = Reader::new(lines).map_err(|e| e.to_string())?;

    println!("Emlogo reader");
    println!("Type lines to see how they are read, or bye to quit");
    println!();

    echo(&mut reader, true)
}

fn run_file(path: &Path) -> Result<(), String> {
    let file = File::open(path)
        .map_err(|e| format!("Failed to read file '{}': {e}", path.display()))?;
    debug!(path = %path.display(), "reading file");

    let mut reader =
        Reader::new(ReaderLines::new(BufReader::new(file))).map_err(|e| e.to_string())?;
    echo(&mut reader, false)
}

fn run_count(path: Option<&Path>) -> Result<(), String> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Failed to read file '{}': {e}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("Failed to read stdin: {e}"))?;
            text
        }
    };

    let mut cursor = LineCursor::new().map_err(|e| e.to_string())?;
    cursor.load(&text).map_err(|e| e.to_string())?;
    let mut lexer = Lexer::new(cursor).map_err(|e| e.to_string())?;

    let counts = tally_with(&mut lexer, |word, count| {
        println!(
            "Type: {} Hash: {} Text: {}, Count: {}",
            word.kind(),
            word.hash_code(),
            word,
            count
        );
    })
    .map_err(|e| e.to_string())?;

    println!();
    println!("{} distinct words", counts.len());
    for (word, count) in ranked(&counts) {
        println!("{count:>6} {word}");
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  emlogo                  Start interactive reader");
    eprintln!("  emlogo <file>           Read a file and print its trees");
    eprintln!("  emlogo --count [file]   Count words in a file (or stdin)");
    eprintln!("  emlogo --help           Show this help message");
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            print_usage();
            process::exit(1);
        }
    };

    let result = match &config.mode {
        Mode::Help => {
            print_usage();
            Ok(())
        }
        Mode::Interactive => repl(&config),
        Mode::File(path) => run_file(path),
        Mode::Count(path) => run_count(path.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1);
    }
}
