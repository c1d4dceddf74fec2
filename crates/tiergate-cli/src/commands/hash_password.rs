//! `tiergate hash-password` - Produce an Argon2 hash for a `users` entry.

use anyhow::{Context, bail};
use std::io::BufRead;

pub fn run(password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => {
            eprintln!("Password (read from stdin):");
            read_line(std::io::stdin().lock())?
        }
    };

    println!("{}", hash(&password)?);
    Ok(())
}

fn read_line(mut input: impl BufRead) -> anyhow::Result<String> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn hash(password: &str) -> anyhow::Result<String> {
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(tiergate_auth::hash_password(password)?)
}
