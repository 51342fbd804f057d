//! Key token parsing
//!
//! A key line is a whitespace separated list of keys: `12.5 × 3 =`.
//! Multi-character numeric literals expand into one digit event per
//! character, everything else must name a single key.

use anyhow::{Context, Result};
use regex::Regex;
use scholar_calc::{Digit, InputEvent};

pub struct KeyParser {
    number: Regex,
}

impl KeyParser {
    pub fn new() -> Result<Self> {
        let number = Regex::new(r"^(?:[0-9]+\.?[0-9]*|\.[0-9]+)$")?;
        Ok(Self { number })
    }

    /// Parse a whole line; nothing is returned unless every token is valid
    pub fn parse_line(&self, line: &str) -> Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        for token in line.split_whitespace() {
            self.parse_token(token, &mut events)?;
        }
        Ok(events)
    }

    fn parse_token(&self, token: &str, events: &mut Vec<InputEvent>) -> Result<()> {
        if token.len() > 1 && self.number.is_match(token) {
            events.extend(token.chars().map(|c| match Digit::from_char(c) {
                Some(digit) => InputEvent::Digit(digit),
                None => InputEvent::DecimalPoint,
            }));
            return Ok(());
        }

        let event = token
            .parse::<InputEvent>()
            .with_context(|| format!("Invalid key '{}'", token))?;
        events.push(event);
        Ok(())
    }
}
