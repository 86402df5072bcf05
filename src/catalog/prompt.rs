use crate::model::Publication;
use std::io::{self, BufRead, Write};

/// Lists the hits and reads an index until a valid one is entered
///
/// Returns `Ok(None)` when input ends before a valid choice.
pub fn choose<'a, R: BufRead, W: Write>(
    hits: &'a [Publication],
    mut input: R,
    mut output: W,
) -> io::Result<Option<&'a Publication>> {
    if hits.is_empty() {
        return Ok(None);
    }

    loop {
        for (index, publication) in hits.iter().enumerate() {
            writeln!(output, "{}-{}", index, publication.title)?;
        }
        writeln!(output)?;
        write!(
            output,
            "Insert the number of the publication you want to download: "
        )?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match line.trim().parse::<usize>() {
            Ok(index) if index < hits.len() => return Ok(Some(&hits[index])),
            _ => writeln!(output, "\nInvalid choice: {:?}\n", line.trim())?,
        }
    }
}
