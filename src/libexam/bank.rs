use log::{debug, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub question: String,
    pub answer: String,
}

pub type Bank = Vec<Entry>;

#[derive(Debug, Error)]
pub enum BankError {
    #[error("The file '{}' was not found.", .path.display())]
    NotFound { path: PathBuf },
    #[error("An unexpected error occurred while reading '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Entry {
    /// Builds an entry from two raw lines, `None` if either is blank once trimmed.
    pub fn from_lines(question: &str, answer: &str) -> Option<Entry> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(Entry {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }
}

/// Pairs lines (0,1), (2,3), ... into entries. A blank line still takes up
/// its slot, so it drops the pair it lands in. An odd trailing line is ignored.
/// `\r\n`, `\n` and a lone `\r` all end a line.
pub fn parse(content: &str) -> Bank {
    let content = content.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = content.lines().collect();
    lines
        .chunks_exact(2)
        .filter_map(|pair| Entry::from_lines(pair[0], pair[1]))
        .collect()
}

pub fn load(path: impl AsRef<Path>) -> Result<Bank, BankError> {
    let path = path.as_ref();
    let now = Instant::now();
    debug!("[Bank] Reading question bank at {:?}", path);

    if path.is_dir() {
        warn!("[Bank] {:?} is a directory.", path);
        return Err(BankError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!("[Bank] {:?} does not exist.", path);
            return Err(BankError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(err) => {
            warn!("[Bank] Cannot read {:?}: {:?}", path, err);
            return Err(BankError::Read {
                path: path.to_path_buf(),
                source: err,
            });
        }
    };

    let bank = parse(&content);
    debug!(
        "[Bank] Loaded {} entries from {} lines in {} ms.",
        bank.len(),
        content.lines().count(),
        now.elapsed().as_millis()
    );
    Ok(bank)
}
