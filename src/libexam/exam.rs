use crate::libexam::bank::Entry;
use log::{debug, warn};
use rand::seq::index;
use rand::Rng;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const SEPARATOR_WIDTH: usize = 30;

#[derive(Debug, Error)]
pub enum ExamError {
    #[error("cannot pick {requested} questions from a bank of {available}")]
    InvalidCount { requested: usize, available: usize },
    #[error("Could not write to the file {}. Details: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Exam {
    pub professor: String,
    pub entries: Vec<Entry>,
}

impl Exam {
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "--- Exam for Professor {} ---", self.professor)?;
        writeln!(out, "--- Number of Questions: {} ---", self.entries.len())?;
        writeln!(out)?;

        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(out, "Question {}: {}", i + 1, entry.question)?;
            writeln!(out, "Answer {}: {}", i + 1, entry.answer)?;
            writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        }
        Ok(())
    }

    /// Creates or truncates `path`. Output left behind by a failed write is unspecified.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ExamError> {
        let path = path.as_ref();
        let to_write_error = |source: io::Error| {
            warn!("[Exam] Writing {:?} failed: {:?}", path, source);
            ExamError::Write {
                path: path.to_path_buf(),
                source,
            }
        };

        let file = File::create(path).map_err(to_write_error)?;
        let mut out = BufWriter::new(file);
        self.write_to(&mut out).map_err(to_write_error)?;
        out.flush().map_err(to_write_error)?;

        debug!(
            "[Exam] Saved {} questions to {:?}",
            self.entries.len(),
            path
        );
        Ok(())
    }
}

/// Picks `count` distinct entries uniformly at random, in the order they were drawn.
pub fn compose<R: Rng + ?Sized>(
    professor: &str,
    bank: &[Entry],
    count: usize,
    rng: &mut R,
) -> Result<Exam, ExamError> {
    if count == 0 || count > bank.len() {
        return Err(ExamError::InvalidCount {
            requested: count,
            available: bank.len(),
        });
    }

    let picked = index::sample(rng, bank.len(), count);
    debug!("[Exam] Picked indices {:?}", picked.clone().into_vec());

    Ok(Exam {
        professor: professor.to_string(),
        entries: picked.into_iter().map(|i| bank[i].clone()).collect(),
    })
}

pub fn compose_to_file<R: Rng + ?Sized>(
    professor: &str,
    bank: &[Entry],
    count: usize,
    path: impl AsRef<Path>,
    rng: &mut R,
) -> Result<Exam, ExamError> {
    let exam = compose(professor, bank, count, rng)?;
    exam.save(path)?;
    Ok(exam)
}
