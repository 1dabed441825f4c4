use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Result, anyhow};

use crate::types::error::S3kitError;

/// Trait for handling user prompts, enabling testability.
///
/// The default implementation ([`StdioPromptHandler`]) uses stdin/stdout.
/// Tests can provide custom implementations to avoid blocking on user input.
pub trait PromptHandler: Send + Sync {
    /// Display `prompt` and read one line of user input, trimmed.
    fn read_line(&self, prompt: &str) -> Result<String>;
}

pub struct StdioPromptHandler;

impl PromptHandler for StdioPromptHandler {
    fn read_line(&self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        std::io::stdout().flush()?;

        let mut input = String::new();
        let read = std::io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Err(anyhow!(S3kitError::Io(
                "stdin closed before an answer was given".to_string()
            )));
        }
        Ok(input.trim().to_string())
    }
}

/// Ask whether files may be created in `current_dir`.
///
/// Repeats the question until the answer is `y`/`yes` or `n`/`no`
/// (case-insensitive).
pub fn confirm_current_directory(handler: &dyn PromptHandler, current_dir: &Path) -> Result<bool> {
    println!();
    println!("WARNING: No target directory specified.");
    println!(
        "Files will be created in the current directory: {}",
        current_dir.display()
    );

    loop {
        let answer = handler
            .read_line("Do you want to continue? (y/n): ")?
            .to_lowercase();
        match answer.as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("Please enter 'y' or 'n'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct ScriptedPromptHandler {
        answers: Mutex<Vec<&'static str>>,
        asked: AtomicU32,
    }

    impl ScriptedPromptHandler {
        fn new(mut answers: Vec<&'static str>) -> Self {
            answers.reverse();
            Self {
                answers: Mutex::new(answers),
                asked: AtomicU32::new(0),
            }
        }
    }

    impl PromptHandler for ScriptedPromptHandler {
        fn read_line(&self, _prompt: &str) -> Result<String> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            self.answers
                .lock()
                .unwrap()
                .pop()
                .map(|answer| answer.trim().to_string())
                .ok_or_else(|| anyhow!("no more answers"))
        }
    }

    #[test]
    fn yes_confirms() {
        for answer in ["y", "Y", "yes", " YES "] {
            let handler = ScriptedPromptHandler::new(vec![answer]);
            assert!(confirm_current_directory(&handler, Path::new("/tmp")).unwrap());
        }
    }

    #[test]
    fn no_declines() {
        for answer in ["n", "No"] {
            let handler = ScriptedPromptHandler::new(vec![answer]);
            assert!(!confirm_current_directory(&handler, Path::new("/tmp")).unwrap());
        }
    }

    #[test]
    fn asks_again_until_answer_is_recognized() {
        let handler = ScriptedPromptHandler::new(vec!["maybe", "", "n"]);

        assert!(!confirm_current_directory(&handler, Path::new("/tmp")).unwrap());
        assert_eq!(handler.asked.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn read_failure_is_propagated() {
        let handler = ScriptedPromptHandler::new(vec![]);

        assert!(confirm_current_directory(&handler, Path::new("/tmp")).is_err());
    }
}
