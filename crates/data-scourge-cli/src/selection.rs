use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::io::{self, Write};

/// Parse a selection such as `1,3,5-7` or `all` into sorted zero-based indices.
/// Empty input selects nothing.
pub fn parse_selection(raw: &str, len: usize) -> Result<Vec<usize>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    if raw.eq_ignore_ascii_case("all") {
        return Ok((0..len).collect());
    }

    let mut selected = BTreeSet::new();
    for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_number(start, len)?, parse_number(end, len)?),
            None => {
                let number = parse_number(part, len)?;
                (number, number)
            }
        };
        if start > end {
            bail!("Range '{}' runs backwards", part);
        }
        selected.extend((start..=end).map(|number| number - 1));
    }

    Ok(selected.into_iter().collect())
}

fn parse_number(raw: &str, len: usize) -> Result<usize> {
    let number: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a file number", raw.trim()))?;
    if number == 0 || number > len {
        bail!("File number {} is out of range 1-{}", number, len);
    }
    Ok(number)
}

pub fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(default.unwrap_or(false));
        }

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
