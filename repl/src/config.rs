use std::path::PathBuf;

const HISTORY_FILE: &str = ".emlogo_history";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Read lines from the terminal and echo each tree.
    Interactive,
    /// Read a file line by line and print each tree.
    File(PathBuf),
    /// Count words from a file, or stdin when no file is given.
    Count(Option<PathBuf>),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    /// Where interactive history is kept, if a home directory exists.
    pub history: Option<PathBuf>,
}

impl Config {
    /// Build a configuration from command-line arguments, program name
    /// excluded.
    pub fn from_args(args: &[String]) -> Result<Config, String> {
        let mode = match args {
            [] => Mode::Interactive,
            [flag] if flag == "--help" || flag == "-h" => Mode::Help,
            [flag] if flag == "--count" => Mode::Count(None),
            [flag, file] if flag == "--count" => Mode::Count(Some(PathBuf::from(file))),
            [flag] if flag.starts_with('-') => return Err(format!("Unknown option: {flag}")),
            [file] => Mode::File(PathBuf::from(file)),
            _ => return Err("Too many arguments".to_string()),
        };

        Ok(Config {
            mode,
            history: dirs::home_dir().map(|home| home.join(HISTORY_FILE)),
        })
    }
}
