//! Interactive question flow for when the user gives no flags.
//!
//! Generic over the reader and writer so the flow can be driven from tests.
//! Every function returns `Ok(None)` when input ends (Ctrl-D), which the
//! caller treats as a cancellation.

use anyhow::Result;
use s2r_core::config::{LICENSE_OPTIONS, SUPPORTED_LANGUAGES};
use std::io::{BufRead, Write};

/// Minimum description length accepted interactively.
const MIN_DESCRIPTION_CHARS: usize = 11;

/// Everything the interactive flow collects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub name: String,
    pub description: String,
    pub language: String,
    pub license: String,
    pub scan: bool,
}

/// Ask every project question in order.
pub fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<Answers>> {
    let Some(name) = text(input, out, "What is your project name?", |s| {
        (s.is_empty()).then_some("Please enter a name.")
    })?
    else {
        return Ok(None);
    };

    let Some(description) = text(input, out, "Describe your project in one sentence", |s| {
        (s.chars().count() < MIN_DESCRIPTION_CHARS)
            .then_some("Please write at least a short sentence (more than 10 characters).")
    })?
    else {
        return Ok(None);
    };

    let mut languages: Vec<&str> = SUPPORTED_LANGUAGES.to_vec();
    languages.push("Other");
    let Some(mut language) = choose(
        input,
        out,
        "What is the primary programming language?",
        &languages,
        None,
    )?
    else {
        return Ok(None);
    };
    if language == "Other" {
        let Some(custom) = text(input, out, "Which language? (leave blank to skip)", |_| None)?
        else {
            return Ok(None);
        };
        language = custom;
    }

    let Some(license) = choose(
        input,
        out,
        "What license do you want to use?",
        LICENSE_OPTIONS,
        Some(0),
    )?
    else {
        return Ok(None);
    };

    let Some(scan) = confirm(
        input,
        out,
        "Scan the project directory for project files?",
        true,
    )?
    else {
        return Ok(None);
    };

    Ok(Some(Answers {
        name,
        description,
        language,
        license,
        scan,
    }))
}

/// Yes/no question. Empty input picks `default`.
pub fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
    default: bool,
) -> Result<Option<bool>> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        let Some(line) = read_line(input, out, &format!("{prompt} {hint}: "))? else {
            return Ok(None);
        };
        match line.to_lowercase().as_str() {
            "" => return Ok(Some(default)),
            "y" | "yes" => return Ok(Some(true)),
            "n" | "no" => return Ok(Some(false)),
            _ => writeln!(out, "  Please answer y or n.")?,
        }
    }
}

/// Free-text question, re-asked until `invalid` returns `None`.
fn text<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
    invalid: impl Fn(&str) -> Option<&'static str>,
) -> Result<Option<String>> {
    loop {
        let Some(line) = read_line(input, out, &format!("{prompt}: "))? else {
            return Ok(None);
        };
        match invalid(&line) {
            Some(reason) => writeln!(out, "  {reason}")?,
            None => return Ok(Some(line)),
        }
    }
}

/// Numbered single choice. Accepts a number or an option name (any case).
fn choose<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
    options: &[&str],
    default: Option<usize>,
) -> Result<Option<String>> {
    writeln!(out, "{prompt}")?;
    for (i, option) in options.iter().enumerate() {
        let marker = if default == Some(i) { " (default)" } else { "" };
        writeln!(out, "  {}) {}{}", i + 1, option, marker)?;
    }
    loop {
        let Some(line) = read_line(input, out, "> ")? else {
            return Ok(None);
        };
        if line.is_empty()
            && let Some(d) = default
        {
            return Ok(Some(options[d].to_string()));
        }
        if let Ok(n) = line.parse::<usize>()
            && (1..=options.len()).contains(&n)
        {
            return Ok(Some(options[n - 1].to_string()));
        }
        if let Some(option) = options.iter().find(|o| o.eq_ignore_ascii_case(&line)) {
            return Ok(Some((*option).to_string()));
        }
        writeln!(out, "  Enter a number between 1 and {}.", options.len())?;
    }
}

fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> Result<Option<String>> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(script: &str) -> (Option<Answers>, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let answers = ask(&mut input, &mut out).unwrap();
        (answers, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_full_flow_with_defaults() {
        let (answers, _) = run(
            "AmazonPriceScraper\nA Python script that scrapes Amazon prices and saves them to CSV\n1\n\n\n",
        );
        assert_eq!(
            answers,
            Some(Answers {
                name: "AmazonPriceScraper".to_string(),
                description: "A Python script that scrapes Amazon prices and saves them to CSV"
                    .to_string(),
                language: "Python".to_string(),
                license: "MIT".to_string(),
                scan: true,
            })
        );
    }

    #[test]
    fn test_reasks_invalid_answers() {
        let (answers, out) = run("\ndemo\ntoo short\nA long enough description\nrust\n99\n2\nn\n");
        let answers = answers.unwrap();
        assert_eq!(answers.name, "demo");
        assert_eq!(answers.description, "A long enough description");
        assert_eq!(answers.language, "Rust");
        assert_eq!(answers.license, "Apache-2.0");
        assert!(!answers.scan);
        assert!(out.contains("Please enter a name."));
        assert!(out.contains("more than 10 characters"));
        assert!(out.contains("Enter a number between 1 and"));
    }

    #[test]
    fn test_other_language_asks_free_text() {
        let other = SUPPORTED_LANGUAGES.len() + 1;
        let script = format!("demo\nA long enough description\n{other}\nElixir\n\ny\n");
        let (answers, _) = run(&script);
        assert_eq!(answers.unwrap().language, "Elixir");
    }

    #[test]
    fn test_eof_cancels() {
        let (answers, _) = run("demo\n");
        assert_eq!(answers, None);
    }

    #[test]
    fn test_confirm_default_and_explicit() {
        let mut out = Vec::new();
        let mut input = Cursor::new(b"\nmaybe\nyes\n".to_vec());
        assert_eq!(
            confirm(&mut input, &mut out, "Overwrite?", false).unwrap(),
            Some(false)
        );
        assert_eq!(
            confirm(&mut input, &mut out, "Overwrite?", false).unwrap(),
            Some(true)
        );
        assert!(String::from_utf8(out).unwrap().contains("[y/N]"));
    }
}
