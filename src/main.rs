use clap::Parser;
use env_logger::Env;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use thiserror::Error;

mod cli;
mod libexam;

use crate::cli::Console;

#[derive(Debug, PartialEq)]
pub(crate) enum Choice {
    Yes,
    No,
    Unrecognized,
}

#[derive(Parser, Debug)]
#[command(name = "Professor Assistant")]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "error")]
    log_level: String,
    /// Seed for question sampling, for reproducible exams.
    #[arg(short, long)]
    seed: Option<u64>,
}

impl Choice {
    pub fn from_str(input: &str) -> Choice {
        match input.trim().to_lowercase().as_str() {
            "yes" | "y" => Choice::Yes,
            "no" | "n" => Choice::No,
            _ => Choice::Unrecognized,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("input closed")]
    InputClosed,
    #[error("cannot read input: {0}")]
    Input(String),
    #[error("cannot write to the console")]
    Console(#[from] io::Error),
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let mut rng = match args.seed {
        Some(seed) => {
            debug!("[Setup] Sampling with seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let mut console = Console::new(io::stdin().lock(), io::stdout());
    match cli::session_loop(&mut console, &mut rng) {
        Err(Error::InputClosed) => {
            warn!("[Setup] Input closed before the session finished.");
            Ok(())
        }
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_accepts_yes_and_no_forms() {
        for input in ["yes", "y", "YES", "Y", " Yes ", "yEs"] {
            assert_eq!(Choice::from_str(input), Choice::Yes, "{input:?}");
        }
        for input in ["no", "n", "NO", "N", "\tNo\n"] {
            assert_eq!(Choice::from_str(input), Choice::No, "{input:?}");
        }
    }

    #[test]
    fn test_choice_rejects_anything_else() {
        for input in ["", "yeah", "nope", "ye", "1", "y e s", "sure"] {
            assert_eq!(Choice::from_str(input), Choice::Unrecognized, "{input:?}");
        }
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["professor-assistant"]).unwrap();
        assert_eq!(args.log_level, "error");
        assert_eq!(args.seed, None);

        let args =
            Args::try_parse_from(["professor-assistant", "-l", "debug", "--seed", "9"]).unwrap();
        assert_eq!(args.log_level, "debug");
        assert_eq!(args.seed, Some(9));
    }
}
