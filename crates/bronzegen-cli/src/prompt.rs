//! Terminal prompt helpers for the interactive flows

use std::io::{self, BufRead, Write};

/// Read a trimmed line of input after printing `message`
pub fn input(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    read_trimmed(&mut io::stdin().lock())
}

/// Prompt until the user enters a number in `1..=max`; returns the number
pub fn select_number(message: &str, max: usize) -> io::Result<usize> {
    select_number_from(&mut io::stdin().lock(), message, max)
}

/// Show a numbered list and prompt for one item; returns its index
pub fn select_index(message: &str, items: &[String]) -> io::Result<usize> {
    for (i, item) in items.iter().enumerate() {
        println!("{}. {}", i + 1, item);
    }
    Ok(select_number(message, items.len())? - 1)
}

fn select_number_from(
    reader: &mut impl BufRead,
    message: &str,
    max: usize,
) -> io::Result<usize> {
    loop {
        print!("{}", message);
        io::stdout().flush()?;

        let answer = read_trimmed(reader)?;
        match answer.parse::<usize>() {
            Ok(choice) if (1..=max).contains(&choice) => return Ok(choice),
            Ok(_) => println!("Invalid selection. Please try again."),
            Err(_) => println!("Please enter a valid number."),
        }
    }
}

/// Read one line; a zero-byte read means the stream is closed and becomes
/// an error so callers abort instead of reprompting forever.
fn read_trimmed(reader: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input stream closed",
        ));
    }
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn read_trimmed_strips_whitespace() {
        let mut reader = Cursor::new("  2  \n");
        assert_eq!(read_trimmed(&mut reader).unwrap(), "2");
    }

    #[test]
    fn closed_stream_is_an_error() {
        let mut reader = Cursor::new("");
        let err = read_trimmed(&mut reader).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn select_retries_then_accepts() {
        let mut reader = Cursor::new("abc\n9\n2\n");
        let choice = select_number_from(&mut reader, "pick: ", 3).unwrap();
        assert_eq!(choice, 2);
    }

    #[test]
    fn select_terminates_when_input_runs_out() {
        // Invalid answer followed by end of stream: the loop must stop
        // with an error rather than spin on the exhausted reader.
        let mut reader = Cursor::new("abc\n");
        let err = select_number_from(&mut reader, "pick: ", 3).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
