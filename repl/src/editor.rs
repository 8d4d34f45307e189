//! Terminal line source backed by rustyline.

use std::io;
use std::path::PathBuf;

use emlogo::LineSource;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::warn;

const PROMPT: &str = "? ";
const CONTINUATION_PROMPT: &str = "> ";

pub struct EditorLines {
    editor: DefaultEditor,
    history: Option<PathBuf>,
}

impl EditorLines {
    pub fn new(history: Option<PathBuf>) -> Result<Self, ReadlineError> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = &history
            && let Err(e) = editor.load_history(path)
            && !is_missing_file(&e)
        {
            warn!(error = %e, path = %path.display(), "could not load history");
        }
        Ok(EditorLines { editor, history })
    }
}

/// A missing history file is normal on first run.
fn is_missing_file(e: &ReadlineError) -> bool {
    matches!(e, ReadlineError::Io(e) if e.kind() == io::ErrorKind::NotFound)
}

impl LineSource for EditorLines {
    fn next_line(&mut self, depth: usize) -> Option<String> {
        let prompt = if depth == 0 { PROMPT } else { CONTINUATION_PROMPT };
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty()
                    && let Err(e) = self.editor.add_history_entry(line.as_str())
                {
                    warn!(error = %e, "could not record history");
                }
                Some(line)
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => None,
            Err(e) => {
                warn!(error = %e, "terminal read failed");
                None
            }
        }
    }
}

impl Drop for EditorLines {
    fn drop(&mut self) {
        if let Some(path) = &self.history
            && let Err(e) = self.editor.save_history(path)
        {
            warn!(error = %e, path = %path.display(), "could not save history");
        }
    }
}
