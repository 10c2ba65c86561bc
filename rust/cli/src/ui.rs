//! Terminal message helpers shared by the command handlers.

use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Warns when seat rotation cannot give every seat the same number of games.
pub fn warn_uneven_rotation(
    err: &mut dyn Write,
    games: u32,
    table_sizes: &[usize],
) -> std::io::Result<()> {
    let uneven: Vec<String> = table_sizes
        .iter()
        .filter(|&&k| games as usize % k != 0)
        .map(|k| k.to_string())
        .collect();
    if uneven.is_empty() {
        return Ok(());
    }
    display_warning(
        err,
        &format!(
            "{} games per matchup does not divide evenly across tables of {}; first-seat counts will differ",
            games,
            uneven.join(", ")
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_error_prefixes_message() {
        let mut buf = Vec::new();
        write_error(&mut buf, "boom").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Error: boom\n");
    }

    #[test]
    fn uneven_rotation_warns_once_per_call() {
        let mut buf = Vec::new();
        warn_uneven_rotation(&mut buf, 10, &[2, 3, 4]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("WARNING:"));
        assert!(text.contains("tables of 3, 4"));

        let mut buf = Vec::new();
        warn_uneven_rotation(&mut buf, 12, &[2, 3, 4]).unwrap();
        assert!(buf.is_empty());
    }
}
