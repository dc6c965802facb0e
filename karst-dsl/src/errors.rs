//  ERRORS.rs
//    by Lut99
//
//  Created:
//    04 Mar 2025, 10:02:55
//  Last edited:
//    21 Aug 2025, 11:04:19
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines errors originating from the `karst-dsl` crate.
//

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FResult};

use console::{style, Style};

use crate::ast::spec::TextRange;


/***** HELPER FUNCTIONS *****/
/// Computes the length of the number as if it was a string.
///
/// # Arguments
/// - `n`: The number to compute the length of.
///
/// # Returns
/// The number of digits in the number.
#[inline]
fn num_len(n: usize) -> usize {
    ((n as f64).log10() + 1.0) as usize
}

/// Writes the given range of the given source to the given formatter.
///
/// # Arguments
/// - `f`: The Formatter to write to.
/// - `range`: The TextRange to print in the given source text.
/// - `source`: The source text to print.
/// - `colour`: The Style to print the markers with (i.e., red for error, yellow for warning, etc).
///
/// # Errors
/// This function errors if we failed to write to the given writer.
fn print_range(f: &mut Formatter<'_>, range: TextRange, source: &str, colour: Style) -> FResult {
    // Find the line in the source text on which the range starts
    let line: &str = match source.split('\n').nth(range.start.line0()) {
        Some(line) => line.trim_end_matches('\r'),
        None => return writeln!(f, " {} (position {} is out-of-bounds for the source text)", style("|").blue().bright(), range),
    };

    // Compute the part of the line to highlight
    let hl_start : usize = range.start.col0().min(line.len());
    let hl_end   : usize = if range.start.line == range.end.line { range.end.col1().min(line.len()) } else { line.len() };

    // Print the line itself, with the highlighted part in colour
    let line_nr: String = format!("{}", range.start.line1());
    write!(f, "{} {}", style(format!(" {line_nr} |")).blue().bright(), &line[..hl_start])?;
    write!(f, "{}", colour.apply_to(&line[hl_start..hl_end]))?;
    writeln!(f, "{}", &line[hl_end..])?;

    // Print the marker line beneath it
    writeln!(f, " {} {} {}{}",
        (0..line_nr.len()).map(|_| ' ').collect::<String>(),
        style("|").blue().bright(),
        (0..hl_start).map(|_| ' ').collect::<String>(),
        colour.apply_to((hl_start..hl_end.max(hl_start + 1)).map(|_| '^').collect::<String>()),
    )?;

    // If the range spans multiple lines, print a continuation marker
    if range.start.line != range.end.line {
        writeln!(f, "{} {}", style(format!(" {} |", (0..num_len(range.end.line1())).map(|_| ' ').collect::<String>())).blue().bright(), colour.apply_to("..."))?;
    }

    // Done
    Ok(())
}





/***** AUXILLARY *****/
/// The pretty formatter for most errors.
#[derive(Debug)]
pub struct PrettyErrorFormatter<'e, 'f, 's> {
    /// The error to format.
    err    : &'e dyn PrettyError,

    /// The name of the file we are compiling.
    file   : &'f str,
    /// The source text to use as context.
    source : &'s str,
}
impl<'e, 'f, 's> Display for PrettyErrorFormatter<'e, 'f, 's> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        // Get the ranges to print
        let (main, notes): ((String, Option<TextRange>), Vec<(String, TextRange)>) = self.err.ranges();

        // Print the main error
        if let Some(range) = main.1 {
            // Write the top line
            writeln!(f, "{}: {}: {}", style(format!("{}:{}:{}", self.file, range.start.line1(), range.start.col1())).bold(), style("error").red().bold(), main.0)?;

            // Write the range
            print_range(f, range, self.source, Style::new().red().bold())?;
            writeln!(f)?;
        } else {
            // Write the top line without context
            writeln!(f, "{}: {}: {}", style(self.file), style("error").red().bold(), main.0)?;
            writeln!(f)?;
        }

        // Now print any additional notes
        for (msg, range) in notes {
            // Write the top line
            writeln!(f, "{}: {}: {}", style(format!("{}:{}:{}", self.file, range.start.line1(), range.start.col1())).bold(), style("note").green().bold(), msg)?;

            // Write the range
            print_range(f, range, self.source, Style::new().green().bold())?;
            writeln!(f)?;
        }

        // Done
        Ok(())
    }
}



/// Trait for an error that can print itself very prettily from some source text.
pub trait PrettyError: Error {
    // Child-implemented
    /// Returns the ranges that this error concerns itself with.
    ///
    /// Specifically, it can return one "main error range", and then zero or more "note ranges" that provide additional context.
    ///
    /// # Returns
    /// A tuple with the main error range (if any) and the vector with note texts and note ranges, respectively.
    ///
    /// Note that an empty main error range implies this error variant does not relate to source.
    fn ranges(&self) -> ((String, Option<TextRange>), Vec<(String, TextRange)>);


    // Globally provided
    /// Returns a formatter for an Error that writes it to stderr with some additional context information attached to it.
    ///
    /// # Arguments
    /// - `file`: Some name that represents the source. Typically the filename for a file, or something like "<stdin>" for stdin.
    /// - `source`: The source text to use for context. We assume that the positions in this error match that of the given source text.
    ///
    /// # Returns
    /// A `PrettyErrorFormatter` that implements Display.
    #[inline]
    fn display_with_source<'e, 'f, 's>(&'e self, file: &'f str, source: &'s str) -> PrettyErrorFormatter<'e, 'f, 's> where Self: Sized { PrettyErrorFormatter{ err: self, file, source } }
}





/***** LIBRARY *****/
/// Defines the most toplevel errors for this crate.
#[derive(Clone, Debug)]
pub enum DslError {
    /// Encountered a character that does not start any token.
    UnexpectedChar{ c: char, range: TextRange },
    /// A string literal ran until the end of the line or file.
    UnterminatedString{ range: TextRange },
    /// A string literal carried an escape sequence we don't know.
    IllegalEscape{ c: char, range: TextRange },
    /// A natural literal does not fit in 64 bits.
    NaturalOverflow{ raw: String, range: TextRange },

    /// The parser found a token it did not expect.
    UnexpectedToken{ got: String, expected: &'static str, range: TextRange },
    /// The parser ran out of tokens while expecting more.
    UnexpectedEof{ expected: &'static str },
    /// A procedure carried both a linkage name and a body.
    ExternProcedureWithBody{ range: TextRange },
    /// A procedure carried neither a linkage name nor a body.
    ProcedureWithoutBody{ range: TextRange },

    /// A module configuration file names a target kind we don't know.
    UnknownTargetKind{ name: String, range: TextRange },
}
impl PrettyError for DslError {
    fn ranges(&self) -> ((String, Option<TextRange>), Vec<(String, TextRange)>) {
        use DslError::*;
        match self {
            UnexpectedChar{ range, .. }     => ((self.to_string(), Some(*range)), vec![]),
            UnterminatedString{ range }     => ((self.to_string(), Some(*range)), vec![]),
            IllegalEscape{ range, .. }      => ((self.to_string(), Some(*range)), vec![]),
            NaturalOverflow{ range, .. }    => ((self.to_string(), Some(*range)), vec![]),
            UnexpectedToken{ range, .. }    => ((self.to_string(), Some(*range)), vec![]),
            UnexpectedEof{ .. }             => ((self.to_string(), None), vec![]),
            ExternProcedureWithBody{ range } => ((self.to_string(), Some(*range)), vec![]),
            ProcedureWithoutBody{ range }   => ((self.to_string(), Some(*range)), vec![]),
            UnknownTargetKind{ range, .. }  => ((self.to_string(), Some(*range)), vec![]),
        }
    }
}
impl Display for DslError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        use DslError::*;
        match self {
            UnexpectedChar{ c, .. }           => write!(f, "Syntax error: Unexpected character {c:?}"),
            UnterminatedString{ .. }          => write!(f, "Syntax error: Unterminated string literal"),
            IllegalEscape{ c, .. }            => write!(f, "Syntax error: Illegal escape sequence '\\{c}' in string literal"),
            NaturalOverflow{ raw, .. }        => write!(f, "Syntax error: Natural literal '{raw}' does not fit in 64 bits"),
            UnexpectedToken{ got, expected, .. } => write!(f, "Syntax error: Expected {expected}, got {got}"),
            UnexpectedEof{ expected }         => write!(f, "Syntax error: Expected {expected}, got end-of-file"),
            ExternProcedureWithBody{ .. }     => write!(f, "An extern procedure cannot have a body"),
            ProcedureWithoutBody{ .. }        => write!(f, "A procedure without a body must have an extern linkage name"),
            UnknownTargetKind{ name, .. }     => write!(f, "Unknown target kind '{name}' (expected 'executable' or 'library')"),
        }
    }
}
impl Error for DslError {}
