//! Terminal output for the CLI

use crate::query::{SkippedClause, Token};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn color_choice(color: bool) -> ColorChoice {
    if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Print top-level tokens, one per line, prefixed with their operator
pub fn print_tokens(tokens: &[Token<'_>], color: bool) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color_choice(color));

    for (i, token) in tokens.iter().enumerate() {
        let keyword = if i == 0 { "" } else { token.operator.keyword() };
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(stdout, "{:<4}", keyword)?;
        stdout.reset()?;
        writeln!(stdout, "{}", token.text)?;
    }

    Ok(())
}

/// Print highlight terms, one per line
pub fn print_terms(terms: &[String]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    for term in terms {
        writeln!(lock, "{}", term)?;
    }
    Ok(())
}

/// Report dropped clauses and unbalanced input on stderr
pub fn print_warnings(skipped: &[SkippedClause], unbalanced: bool, color: bool) -> io::Result<()> {
    let mut stderr = StandardStream::stderr(color_choice(color));

    for clause in skipped {
        write_warning_label(&mut stderr)?;
        write!(stderr, "{}: ", clause.reason)?;
        stderr.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        writeln!(stderr, "{}", clause.token)?;
        stderr.reset()?;
    }

    if unbalanced {
        write_warning_label(&mut stderr)?;
        writeln!(stderr, "unbalanced parentheses or quotes")?;
    }

    Ok(())
}

fn write_warning_label(stream: &mut StandardStream) -> io::Result<()> {
    stream.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    write!(stream, "warning")?;
    stream.reset()?;
    write!(stream, ": ")
}
