use crate::libexam::bank::{self, Bank};
use crate::libexam::exam;
use crate::{Choice, Error};
use colored::Colorize;
use log::{debug, warn};
use rand::Rng;
use std::fmt::Display;
use std::io::{self, Read, Write};
use std::num::IntErrorKind;
use text_io::try_read;

const DEFAULT_NAME: &str = "Professor";

#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum ValidationError {
    #[error("Path cannot be empty. Please try again.")]
    EmptyBankPath,
    #[error("The output file name cannot be empty.")]
    EmptyOutputPath,
    #[error("Invalid input. Please enter a whole number.")]
    NotANumber,
    #[error("Please enter a number between 1 and {max}.")]
    OutOfRange { max: usize },
    #[error("Invalid input. Please answer with 'Yes' or 'No'.")]
    UnrecognizedChoice,
}

enum State {
    Greeting,
    AwaitStartChoice,
    AwaitBankPath,
    AwaitCount(Bank),
    AwaitOutputPath(Bank, usize),
    Composing {
        bank: Bank,
        count: usize,
        output: String,
    },
    AwaitContinueChoice,
    Terminated,
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Greeting => "Greeting",
            State::AwaitStartChoice => "AwaitStartChoice",
            State::AwaitBankPath => "AwaitBankPath",
            State::AwaitCount(_) => "AwaitCount",
            State::AwaitOutputPath(..) => "AwaitOutputPath",
            State::Composing { .. } => "Composing",
            State::AwaitContinueChoice => "AwaitContinueChoice",
            State::Terminated => "Terminated",
        }
    }
}

pub(crate) struct Console<R: Read, W: Write> {
    input: io::Bytes<R>,
    output: W,
}

impl<R: Read, W: Write> Console<R, W> {
    pub fn new(reader: R, output: W) -> Self {
        Self {
            input: reader.bytes(),
            output,
        }
    }

    pub fn say(&mut self, message: impl Display) -> Result<(), Error> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    pub fn error(&mut self, message: impl Display) -> Result<(), Error> {
        self.say(message.to_string().bright_red())
    }

    /// Prints `prompt` and reads one trimmed line back.
    pub fn ask(&mut self, prompt: &str) -> Result<String, Error> {
        write!(self.output, "{} ", prompt.cyan())?;
        self.output.flush()?;

        let mut seen_any = false;
        let mut bytes = self
            .input
            .by_ref()
            .map_while(Result::ok)
            .inspect(|_| seen_any = true);
        let line: Result<String, _> = try_read!("{}\n", bytes);
        drop(bytes);
        if !seen_any {
            return Err(Error::InputClosed);
        }
        let line = match line {
            Ok(line) => line,
            Err(text_io::Error::InvalidUtf8(raw)) => {
                warn!("[Session] Read a line that is not valid UTF-8: {:?}", raw);
                String::from_utf8_lossy(&raw).into_owned()
            }
            Err(e) => return Err(Error::Input(format!("{:?}", e))),
        };
        debug!("[Session] Read {:?}", line);
        Ok(line.trim().to_string())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

/// Upper-cases the first letter of every run of letters and lower-cases the rest.
pub(crate) fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Falls back to "Professor" when the operator leaves the name blank.
pub(crate) fn display_name(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        title_case(trimmed)
    }
}

pub(crate) fn require_non_empty(input: &str, err: ValidationError) -> Result<&str, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(err)
    } else {
        Ok(trimmed)
    }
}

pub(crate) fn parse_count(input: &str, available: usize) -> Result<usize, ValidationError> {
    let out_of_range = ValidationError::OutOfRange { max: available };
    let count = match input.trim().parse::<i64>() {
        Ok(count) => count,
        Err(e) => {
            return match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Err(out_of_range),
                _ => Err(ValidationError::NotANumber),
            }
        }
    };
    match usize::try_from(count) {
        Ok(count) if (1..=available).contains(&count) => Ok(count),
        _ => Err(out_of_range),
    }
}

fn ask_start_choice<R: Read, W: Write>(console: &mut Console<R, W>) -> Result<Choice, Error> {
    loop {
        let input = console.ask(
            "Do you want me to help you create an exam (Yes to proceed | No to quit the program)?",
        )?;
        match Choice::from_str(&input) {
            Choice::Unrecognized => console.error(ValidationError::UnrecognizedChoice)?,
            choice => return Ok(choice),
        }
    }
}

pub(crate) fn session_loop<R: Read, W: Write, G: Rng + ?Sized>(
    console: &mut Console<R, W>,
    rng: &mut G,
) -> Result<(), Error> {
    let mut professor = String::from(DEFAULT_NAME);
    let mut state = State::Greeting;

    loop {
        debug!("[Session] Entering {}", state.name());
        state = match state {
            State::Greeting => {
                console.say(format!(
                    "Welcome to professor assistant version {}.{}.",
                    env!("CARGO_PKG_VERSION_MAJOR"),
                    env!("CARGO_PKG_VERSION_MINOR")
                ))?;
                let input = console.ask("Please Enter Your Name:")?;
                if input.is_empty() {
                    console.say(format!(
                        "Hello! Since you didn't enter a name, I'll call you {}.",
                        DEFAULT_NAME
                    ))?;
                }
                professor = display_name(&input);
                console.say(
                    format!(
                        "Hello Professor {}, I am here to help you create exams from a question bank.",
                        professor
                    )
                    .green(),
                )?;
                State::AwaitStartChoice
            }
            State::AwaitStartChoice => match ask_start_choice(console)? {
                Choice::No => {
                    say_goodbye(console, &professor)?;
                    State::Terminated
                }
                _ => State::AwaitBankPath,
            },
            State::AwaitBankPath => {
                let input = console.ask("Please Enter the Path to the Question Bank.")?;
                match require_non_empty(&input, ValidationError::EmptyBankPath) {
                    Err(e) => {
                        console.error(e)?;
                        State::AwaitBankPath
                    }
                    Ok(path) => match bank::load(path) {
                        Ok(bank) => {
                            console.say(
                                "Yes, indeed the path you provided includes questions and answers."
                                    .green(),
                            )?;
                            if bank.is_empty() {
                                warn!("[Session] {:?} holds no question-answer pairs.", path);
                                console.error(
                                    "Cannot create an exam. The question bank is empty or could not be loaded correctly.",
                                )?;
                                State::AwaitContinueChoice
                            } else {
                                State::AwaitCount(bank)
                            }
                        }
                        Err(e) => {
                            console.error(format!("ERROR: {}", e))?;
                            console.say("Please check the path and try again.")?;
                            State::AwaitBankPath
                        }
                    },
                }
            }
            State::AwaitCount(bank) => {
                let available = bank.len();
                console.say(format!(
                    "There are {} question-answer pairs available in the bank.",
                    available
                ))?;
                let input = console.ask(&format!(
                    "How many question-answer pairs do you want to include in your exam (1 to {})?",
                    available
                ))?;
                match parse_count(&input, available) {
                    Ok(count) => State::AwaitOutputPath(bank, count),
                    Err(e) => {
                        console.error(e)?;
                        State::AwaitCount(bank)
                    }
                }
            }
            State::AwaitOutputPath(bank, count) => {
                let input = console.ask("Where do you want to save your exam?")?;
                match require_non_empty(&input, ValidationError::EmptyOutputPath) {
                    Ok(output) => State::Composing {
                        bank,
                        count,
                        output: output.to_string(),
                    },
                    Err(e) => {
                        console.error(e)?;
                        State::AwaitOutputPath(bank, count)
                    }
                }
            }
            State::Composing {
                bank,
                count,
                output,
            } => {
                match exam::compose_to_file(&professor, &bank, count, &output, &mut *rng) {
                    Ok(_) => console.say(
                        format!(
                            "Congratulations Professor {}. Your exam is created and saved in {}.",
                            professor, output
                        )
                        .green(),
                    )?,
                    Err(e) => console.error(format!("ERROR: {}", e))?,
                }
                State::AwaitContinueChoice
            }
            State::AwaitContinueChoice => {
                let input = console.ask(
                    "Do you want me to help you create another exam (Yes to proceed | No to quit the program)?",
                )?;
                match Choice::from_str(&input) {
                    Choice::No => {
                        say_goodbye(console, &professor)?;
                        State::Terminated
                    }
                    _ => State::AwaitStartChoice,
                }
            }
            State::Terminated => return Ok(()),
        };
    }
}

fn say_goodbye<R: Read, W: Write>(console: &mut Console<R, W>, professor: &str) -> Result<(), Error> {
    console.say(format!("Thank you professor {}. Have a good day!", professor).cyan())
}
