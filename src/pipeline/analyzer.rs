//! Analyzer capability and bundled implementations
//!
//! The annotation engine itself lives outside this crate. The pipeline only
//! relies on the positional contract of [`Analyzer::analyze`]: one result per
//! input text, in input order.

use crate::storage::{ArticleRecord, DatasetStore, StorageError};
use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Errors reported by analyzers
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Failed to run analyzer '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Analyzer '{program}' failed ({status}): {stderr}")]
    Command {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Analyzer '{program}' produced output that is not UTF-8")]
    Encoding { program: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Annotation of one text, in CoNLL-U form
///
/// Trailing newlines are stripped on construction; the store appends exactly
/// one when the annotation is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedText {
    conllu: String,
}

impl AnnotatedText {
    pub fn new(conllu: impl Into<String>) -> Self {
        let mut conllu = conllu.into();
        let trimmed_len = conllu.trim_end_matches(['\n', '\r']).len();
        conllu.truncate(trimmed_len);
        Self { conllu }
    }

    pub fn as_str(&self) -> &str {
        &self.conllu
    }

    /// Token lines, skipping comments and sentence breaks
    pub fn token_lines(&self) -> impl Iterator<Item = &str> {
        self.conllu
            .lines()
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
    }
}

impl fmt::Display for AnnotatedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.conllu)
    }
}

/// Linguistic analyzer supplied to the annotation pipeline
pub trait Analyzer {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Annotates `texts`, returning results in the same order
    ///
    /// Implementations should return one result per text. Callers tolerate
    /// fewer results and leave the unmatched tail unannotated.
    fn analyze(&self, texts: &[String]) -> Result<Vec<AnnotatedText>, AnalyzerError>;

    /// Persists the annotation attached to `article`, if any
    fn persist(
        &self,
        article: &ArticleRecord,
        store: &dyn DatasetStore,
    ) -> Result<(), AnalyzerError> {
        if let Some(annotation) = &article.annotation {
            store.write_annotation(article.id, annotation.as_str())?;
        }
        Ok(())
    }
}

/// Built-in analyzer producing surface-level CoNLL-U
///
/// Splits sentences on `.`, `!`, `?` and `…`, separates words from
/// punctuation, lowercases lemmas and tags `PUNCT`, `NUM` or `X`. Morphology
/// and syntax columns are left as `_`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenAnalyzer;

impl TokenAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Annotates a single text
    pub fn annotate(&self, text: &str) -> AnnotatedText {
        let mut blocks = Vec::new();

        for (index, sentence) in split_sentences(text).iter().enumerate() {
            let mut block = Vec::with_capacity(sentence.len() + 2);
            block.push(format!("# sent_id = {}", index + 1));
            block.push(format!("# text = {}", sentence.join(" ")));

            for (position, token) in sentence.iter().enumerate() {
                block.push(format!(
                    "{}\t{}\t{}\t{}\t_\t_\t_\t_\t_\t_",
                    position + 1,
                    token,
                    token.to_lowercase(),
                    universal_tag(token)
                ));
            }

            blocks.push(block.join("\n"));
        }

        AnnotatedText::new(blocks.join("\n\n"))
    }
}

impl Analyzer for TokenAnalyzer {
    fn name(&self) -> &str {
        "token"
    }

    fn analyze(&self, texts: &[String]) -> Result<Vec<AnnotatedText>, AnalyzerError> {
        Ok(texts.iter().map(|text| self.annotate(text)).collect())
    }
}

fn is_sentence_end(token: &str) -> bool {
    matches!(token, "." | "!" | "?" | "…")
}

fn universal_tag(token: &str) -> &'static str {
    if token.chars().all(|c| !c.is_alphanumeric()) {
        "PUNCT"
    } else if token.chars().all(|c| c.is_ascii_digit()) {
        "NUM"
    } else {
        "X"
    }
}

/// Splits text into sentences of tokens
fn split_sentences(text: &str) -> Vec<Vec<String>> {
    let mut sentences = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut word = String::new();

    let flush_word = |word: &mut String, current: &mut Vec<String>| {
        if !word.is_empty() {
            current.push(std::mem::take(word));
        }
    };

    for c in text.chars() {
        if c.is_alphanumeric() {
            word.push(c);
            continue;
        }

        flush_word(&mut word, &mut current);

        if c.is_whitespace() {
            continue;
        }

        let token = c.to_string();
        let ends = is_sentence_end(&token);
        current.push(token);
        if ends {
            sentences.push(std::mem::take(&mut current));
        }
    }

    flush_word(&mut word, &mut current);
    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

/// Analyzer delegating to an external program
///
/// Each text is written to the program's stdin; its stdout is taken as the
/// annotation. Suitable for command-line taggers such as UDPipe.
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
    program: String,
    args: Vec<String>,
}

impl CommandAnalyzer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn run_one(&self, text: &str) -> Result<AnnotatedText, AnalyzerError> {
        let spawn_error = |source| AnalyzerError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // Feed stdin from another thread so a chatty child cannot block on a full stdout pipe
        let stdin = child.stdin.take();
        let input = text.to_string();
        let writer = std::thread::spawn(move || -> std::io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(input.as_bytes())?;
            }
            Ok(())
        });

        let output = child.wait_with_output().map_err(spawn_error)?;
        let write_result = writer.join().unwrap_or_else(|_| {
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "stdin writer panicked",
            ))
        });

        if !output.status.success() {
            return Err(AnalyzerError::Command {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        // A program may exit successfully without consuming all of its input
        match write_result {
            Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(spawn_error(e)),
            _ => {}
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| AnalyzerError::Encoding {
            program: self.program.clone(),
        })?;

        Ok(AnnotatedText::new(stdout))
    }
}

impl Analyzer for CommandAnalyzer {
    fn name(&self) -> &str {
        &self.program
    }

    fn analyze(&self, texts: &[String]) -> Result<Vec<AnnotatedText>, AnalyzerError> {
        texts.iter().map(|text| self.run_one(text)).collect()
    }
}
