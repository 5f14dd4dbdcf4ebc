// src/cli/prompt.rs
use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};

/// Ask a yes/no question; anything but `y`/`yes` declines.
pub fn confirm(question: &str) -> bool {
    ask(&mut io::stdin().lock(), &mut io::stderr(), &format!("{question} [y/N] "))
        .map(|answer| is_yes(&answer))
        .unwrap_or(false)
}

pub fn password(given: Option<String>) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }
    let answer = ask(&mut io::stdin().lock(), &mut io::stderr(), "Password: ")?;
    if answer.is_empty() {
        bail!("Password is required");
    }
    Ok(answer)
}

/// Password plus its confirmation. A given password confirms itself.
pub fn new_password(given: Option<String>) -> Result<(String, String)> {
    if let Some(password) = given {
        return Ok((password.clone(), password));
    }
    let password = password(None)?;
    let confirmation = ask(&mut io::stdin().lock(), &mut io::stderr(), "Confirm password: ")?;
    Ok((password, confirmation))
}

fn ask(input: &mut impl BufRead, output: &mut impl Write, prompt: &str) -> Result<String> {
    output.write_all(prompt.as_bytes()).context("Failed to write prompt")?;
    output.flush().context("Failed to flush prompt")?;
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read answer")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
