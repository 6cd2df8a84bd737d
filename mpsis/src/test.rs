//! Provides a test procedure for assembly fixtures.
//!
//! A fixture is an assembly file whose `;!` comments state what assembling it
//! should produce:
//!
//! - `;! PROFILE wide29` selects the word format (default `label25`);
//! - `;! WORDS n` and `;! POSITION n` check the number of emitted words
//!   and the final position counter;
//! - `;! LINE k 0101...` checks the output line at position `k`;
//! - `;! ERROR kind` expects assembly to fail with the given error;
//! - `;! MARKER text` checks the marker lines written on failure, in order.

use crate::{
    assemble::{AssemblerError, LineError, assemble},
    profile::Profile,
};

#[derive(Debug)]
pub enum TestError {
    AssemblerError(AssemblerError),
    InvalidComment(String),
    InvalidParams(&'static str, String),
    UnexpectedSuccess(&'static str),
}

#[derive(Debug, Default)]
struct Expectations {
    profile: Profile,
    words: Option<usize>,
    position: Option<usize>,
    lines: Vec<(usize, String)>,
    error: Option<String>,
    markers: Vec<String>,
}

pub fn test(src: &str) -> Result<(), TestError> {
    let expected = expectations(src)?;
    let result = assemble(src, expected.profile);

    let Some(kind) = &expected.error else {
        let assembled = result.map_err(TestError::AssemblerError)?;
        for (position, info) in assembled.info().iter().enumerate() {
            println!("{position:>3}: {:<29} {}", info.bits, info.summary);
        }
        if let Some(words) = expected.words {
            assert_eq!(assembled.words().count(), words, "word count mismatch");
        }
        if let Some(position) = expected.position {
            assert_eq!(assembled.position(), position, "position mismatch");
        }
        let lines = assembled.lines();
        for (position, bits) in &expected.lines {
            assert_eq!(
                lines.get(*position),
                Some(bits),
                "mismatch on line {position}"
            );
        }
        return Ok(());
    };

    let err = match result {
        Ok(_) => return Err(TestError::UnexpectedSuccess("error expected")),
        Err(err) => err,
    };
    println!("{err}");
    assert_eq!(error_kind(&err.error), kind.as_str(), "error kind mismatch");
    if !expected.markers.is_empty() {
        assert_eq!(err.marker_lines(), expected.markers, "marker mismatch");
    }
    Ok(())
}

fn expectations(src: &str) -> Result<Expectations, TestError> {
    let mut expected = Expectations::default();
    for line in src.lines() {
        let Some(comment) = line.trim_start().strip_prefix(";!") else {
            continue;
        };
        let comment = comment.trim();
        let Some((kwd, params)) = comment.split_once(' ') else {
            return Err(TestError::InvalidComment(comment.to_owned()));
        };
        let params = params.trim();
        match kwd.to_uppercase().as_ref() {
            "PROFILE" => {
                expected.profile = params
                    .parse()
                    .map_err(|()| TestError::InvalidParams("profile", params.to_owned()))?;
            }
            "WORDS" => expected.words = Some(parse_count("words", params)?),
            "POSITION" => expected.position = Some(parse_count("position", params)?),
            "LINE" => {
                let Some((position, bits)) = params.split_once(' ') else {
                    return Err(TestError::InvalidParams("line", params.to_owned()));
                };
                expected
                    .lines
                    .push((parse_count("line", position)?, bits.trim().to_owned()));
            }
            "ERROR" => expected.error = Some(params.to_owned()),
            "MARKER" => expected.markers.push(params.to_owned()),
            _ => return Err(TestError::InvalidComment(comment.to_owned())),
        }
    }
    Ok(expected)
}

fn parse_count(name: &'static str, params: &str) -> Result<usize, TestError> {
    params
        .parse::<usize>()
        .map_err(|x| TestError::InvalidParams(name, x.to_string()))
}

fn error_kind(error: &LineError) -> &'static str {
    match error {
        LineError::ParseError(_) => "ParseError",
        LineError::UnknownMnemonic(_) => "UnknownMnemonic",
        LineError::WrongArgumentCount { .. } => "WrongArgumentCount",
        LineError::UnsupportedOperands { .. } => "UnsupportedOperands",
        LineError::InvalidOperand(_) => "InvalidOperand",
        LineError::ExpectedAddress(_) => "ExpectedAddress",
        LineError::ZeroAddress(_) => "ZeroAddress",
        LineError::InvalidShiftAmount(_) => "InvalidShiftAmount",
        LineError::LabelNotFound(_) => "LabelNotFound",
        LineError::TargetOutOfRange(_) => "TargetOutOfRange",
    }
}

mod fixtures {
    include!(concat!(env!("OUT_DIR"), "/tests.rs"));
}
