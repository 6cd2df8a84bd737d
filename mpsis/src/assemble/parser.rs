//! A line parser for MPSIS assembly.
//!
//! Each line holds one mnemonic followed by whitespace-separated argument tokens.
//! A token is any run of characters other than whitespace and `;`; what it means
//! is up to the mnemonic that takes it. Blank lines are skipped and `;` starts a comment.

use std::fmt::Display;

use chumsky::{
    input::{Stream, ValueInput},
    prelude::*,
};
use logos::Logos;

use crate::assemble::{AssemblerError, LineError, syntax::AsmLine};

/// Parse a whole source text. Stops at the first malformed line.
pub fn parse(src: &str) -> Result<Vec<AsmLine>, AssemblerError> {
    let mut lines = Vec::new();
    for (index, text) in src.split('\n').enumerate() {
        if let Some(line) = parse_line(index + 1, text)? {
            lines.push(line);
        }
    }
    Ok(lines)
}

/// Parse a single line of source, without its newline.
/// Returns `None` for a line with no instruction on it.
pub fn parse_line(line_number: usize, text: &str) -> Result<Option<AsmLine>, AssemblerError> {
    let token_iter = Token::lexer(text).spanned().map(|(tok, span)| match tok {
        Ok(tok) => (tok, span.into()),
        Err(err) => (Token::Error(err), span.into()),
    });

    let token_stream =
        Stream::from_iter(token_iter).map((0..text.len()).into(), |(t, s): (_, _)| (t, s));

    let instr = parser().parse(token_stream).into_result().map_err(|errs| {
        let error = errs
            .into_iter()
            .next()
            .map(|err| format!("{line_number}:{}: {err}", err.span().start + 1))
            .unwrap_or_else(|| "unexpected input".to_owned());
        AssemblerError {
            line_number,
            error: LineError::ParseError(error),
        }
    })?;

    Ok(instr.map(|(mnemonic, args)| AsmLine {
        line_number,
        mnemonic: mnemonic.to_owned(),
        args: args.into_iter().map(str::to_owned).collect(),
    }))
}

#[derive(Logos, Clone, PartialEq)]
#[logos(error(LexError, LexError::from_lexer))]
enum Token<'a> {
    Error(LexError),

    #[regex(r"[^ \t\f\r\n;]+", allow_greedy = true)]
    Word(&'a str),

    #[regex(r"[ \t\f\r]+")]
    Whitespace,

    #[regex(r";[^\n]*", allow_greedy = true)]
    Comment,
}

#[derive(Default, Debug, Clone, PartialEq)]
enum LexError {
    Error(String),
    #[default]
    Other,
}

impl LexError {
    fn from_lexer<'a>(lex: &mut logos::Lexer<'a, Token<'a>>) -> Self {
        match lex.slice().chars().next() {
            Some(c) => LexError::Error(format!("invalid character {c:?}")),
            None => LexError::Other,
        }
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::Error(s) => write!(f, "{s}"),
            LexError::Other => write!(f, "error"),
        }
    }
}

impl<'a> Display for Token<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Error(err) => write!(f, "{err}"),
            Token::Word(x) => write!(f, "{x}"),
            Token::Whitespace => write!(f, "whitespace"),
            Token::Comment => write!(f, "comment"),
        }
    }
}

fn parser<'tokens, 'src: 'tokens, I>()
-> impl Parser<'tokens, I, Option<(&'src str, Vec<&'src str>)>, extra::Err<Rich<'tokens, Token<'src>>>>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
{
    let word = select! { Token::Word(x) => x };
    let instr = word.clone().then(
        whitespace()
            .ignore_then(word)
            .repeated()
            .collect::<Vec<_>>(),
    );

    whitespace()
        .or_not()
        .ignore_then(instr.or_not())
        .then_ignore(whitespace().or_not())
        .then_ignore(select! { Token::Comment => () }.or_not())
        .then_ignore(end())
}

fn whitespace<'tokens, 'src: 'tokens, I>()
-> impl Parser<'tokens, I, (), extra::Err<Rich<'tokens, Token<'src>>>>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = SimpleSpan>,
{
    select! {
        Token::Whitespace => ()
    }
}
