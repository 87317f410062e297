// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Interactive resolution of ambiguous keyword properties.
//!
//! When the inspected FITS files don't agree on a keyword's type, unit or
//! description, the user picks the right one from a ranked menu. The reader
//! and writer are injected so the menu logic is testable.

use std::io::{self, BufRead, Write};

/// One candidate answer, with how often it was observed and up to a few
/// example values backing it.
#[derive(Debug, Clone)]
pub(crate) struct Choice<T> {
    pub(crate) label: String,
    pub(crate) value: T,
    pub(crate) count: u64,
    pub(crate) examples: Vec<String>,
}

/// The outcome of a resolution: one of the offered choices, or a manually
/// entered value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Resolution<T> {
    Choice(T),
    Manual(String),
}

/// Sort candidates by how often they were observed, most common first. The
/// sort is stable so ties keep their order of first appearance.
pub(crate) fn rank_choices<T>(mut choices: Vec<Choice<T>>) -> Vec<Choice<T>> {
    choices.sort_by(|a, b| b.count.cmp(&a.count));
    choices
}

/// Ask the user to pick between candidates. An empty answer takes the first
/// (most common) option; with `manual_input`, answering `M` lets the user
/// type the value instead.
pub(crate) fn resolve_ambiguity<T: Clone>(
    keyword: &str,
    subject: &str,
    choices: Vec<Choice<T>>,
    manual_input: bool,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<Resolution<T>> {
    let choices = rank_choices(choices);
    if choices.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("no candidate {subject} for keyword {keyword}"),
        ));
    }

    writeln!(output, "Multiple {subject} found for keyword {keyword}")?;
    for (i, choice) in choices.iter().enumerate() {
        writeln!(
            output,
            "[{i}] {} ({} occurrences) e.g. {:?}",
            choice.label, choice.count, choice.examples
        )?;
    }
    if manual_input {
        writeln!(output, "[M] manual input")?;
    }

    loop {
        write!(
            output,
            "Please enter one of the options between [] or enter for first one: "
        )?;
        output.flush()?;
        let selection = read_line(input)?;
        let selection = selection.trim();

        if selection.is_empty() {
            return Ok(Resolution::Choice(choices[0].value.clone()));
        }
        if let Ok(index) = selection.parse::<usize>() {
            if let Some(choice) = choices.get(index) {
                return Ok(Resolution::Choice(choice.value.clone()));
            }
        }
        if manual_input && selection == "M" {
            write!(output, "Please enter the {subject}: ")?;
            output.flush()?;
            let value = read_line(input)?;
            return Ok(Resolution::Manual(value.trim().to_string()));
        }
        writeln!(output, "Invalid selection {selection}")?;
    }
}

fn read_line(input: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no more input while resolving an ambiguity",
        ));
    }
    Ok(line)
}
