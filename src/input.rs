use std::io::{self, BufRead, Write};

use crate::domain::LightSpec;

#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("interactive input closed before a valid value was supplied")]
    Closed,
    #[error("failed to read interactive input: {0}")]
    Io(#[from] io::Error),
}

/// Validators are pure and separated from the read loop so they can be tested
/// without a terminal. Each returns the feedback line shown on rejection.
pub fn parse_number(raw: &str) -> Result<f64, &'static str> {
    raw.trim()
        .parse()
        .map_err(|_| "Invalid input. Please enter a numeric value.")
}

pub fn non_empty(raw: &str) -> Result<String, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err("Input cannot be empty.")
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn parse_count(raw: &str) -> Result<usize, &'static str> {
    match raw.trim().parse::<i64>() {
        Err(_) => Err("Invalid input. Please enter an integer."),
        Ok(n) if n < 1 => Err("Enter a number greater than 0."),
        Ok(n) => Ok(n as usize),
    }
}

/// Blocking prompt loop over a line-oriented input/output pair.
///
/// Each request re-prompts until a line passes its validator; there is no
/// retry bound, since the loop is user-driven. End of input mid-prompt is the
/// one failure mode, surfaced as `InputError::Closed`.
pub struct Collector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Collector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask<T>(
        &mut self,
        prompt: &str,
        validate: impl Fn(&str) -> Result<T, &'static str>,
    ) -> Result<T, InputError> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(InputError::Closed);
            }

            match validate(&line) {
                Ok(value) => return Ok(value),
                Err(feedback) => writeln!(self.output, "{feedback}")?,
            }
        }
    }

    /// Re-prompts until the line parses as a real number.
    pub fn number(&mut self, prompt: &str) -> Result<f64, InputError> {
        self.ask(prompt, parse_number)
    }

    /// Re-prompts until the trimmed line is non-empty.
    pub fn text(&mut self, prompt: &str) -> Result<String, InputError> {
        self.ask(prompt, non_empty)
    }

    /// Re-prompts until the line parses as an integer >= 1.
    pub fn count(&mut self, prompt: &str) -> Result<usize, InputError> {
        self.ask(prompt, parse_count)
    }

    /// Collect the raw fields for one light. The electricity rate is shared
    /// across the whole run, so it is passed in rather than prompted here.
    pub fn light_spec(&mut self, rate_per_kwh: f64) -> Result<LightSpec, InputError> {
        writeln!(self.output, "\nEnter details for one light:")?;
        let brand = self.text("Brand: ")?;
        let lumens = self.number("Lumens: ")?;
        let wattage = self.number("Watts: ")?;
        let hours_per_day = self.number("Usage hours per day: ")?;

        Ok(LightSpec {
            brand,
            lumens,
            wattage,
            hours_per_day,
            rate_per_kwh,
        })
    }
}
