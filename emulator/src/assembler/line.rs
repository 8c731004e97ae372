//! Source line parsing
//!
//! A non-blank line is a mnemonic followed by two whitespace-separated
//! operands, with an optional comma after the first one. Parsing is zero
//! copy: the mnemonic in the resulting [`Line`] borrows from the input.

use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, digit1, space0, space1};
use nom::combinator::{map, map_res, opt};
use nom::sequence::{delimited, preceded, terminated, tuple};
use nom::IResult;

use crate::constants::Word;

/// A single operand token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    /// `r` followed by a decimal index
    Register(Word),

    /// A plain decimal literal: an immediate value or a memory address
    Literal(Word),
}

/// A parsed source line: the mnemonic and its two operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    pub mnemonic: &'a str,
    pub operands: (Operand, Operand),
}

fn parse_number(input: &str) -> IResult<&str, Word> {
    map_res(digit1, str::parse)(input)
}

pub(crate) fn parse_register(input: &str) -> IResult<&str, Word> {
    preceded(char('r'), parse_number)(input)
}

fn parse_operand(input: &str) -> IResult<&str, Operand> {
    alt((
        map(parse_register, Operand::Register),
        map(parse_number, Operand::Literal),
    ))(input)
}

fn parse_mnemonic(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphabetic() || c == '_')(input)
}

/// Parse a whole line. A blank line yields `None`.
pub(crate) fn parse_line(input: &str) -> IResult<&str, Option<Line<'_>>> {
    let content = map(
        tuple((
            parse_mnemonic,
            space1,
            terminated(parse_operand, opt(char(','))),
            space1,
            parse_operand,
        )),
        |(mnemonic, _, first, _, second)| Line {
            mnemonic,
            operands: (first, second),
        },
    );

    delimited(space0, opt(content), space0)(input)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_register_test() {
        assert_eq!(parse_register("r84"), Ok(("", 84)));
        assert_eq!(parse_register("r0,"), Ok((",", 0)));
        assert!(parse_register("84").is_err());
        assert!(parse_register("r").is_err());
    }

    #[test]
    fn parse_operand_test() {
        assert_eq!(parse_operand("r12"), Ok(("", Operand::Register(12))));
        assert_eq!(parse_operand("667,"), Ok((",", Operand::Literal(667))));
    }

    #[test]
    fn parse_line_test() {
        let (rest, line) = parse_line("LOAD_CONST 234, r84").unwrap();
        assert_eq!(rest, "");
        assert_eq!(
            line,
            Some(Line {
                mnemonic: "LOAD_CONST",
                operands: (Operand::Literal(234), Operand::Register(84)),
            })
        );
    }

    #[test]
    fn comma_is_optional() {
        let (_, with_comma) = parse_line("SQRT r1, r2").unwrap();
        let (_, without_comma) = parse_line("SQRT r1 r2").unwrap();
        assert_eq!(with_comma, without_comma);
    }

    #[test]
    fn surrounding_whitespace() {
        let (rest, line) = parse_line("  STORE_MEM r20, 500  ").unwrap();
        assert_eq!(rest, "");
        assert_eq!(
            line,
            Some(Line {
                mnemonic: "STORE_MEM",
                operands: (Operand::Register(20), Operand::Literal(500)),
            })
        );
    }

    #[test]
    fn blank_lines() {
        assert_eq!(parse_line(""), Ok(("", None)));
        assert_eq!(parse_line("   "), Ok(("", None)));
    }
}
