//! Formats persisted argument lists without their Rust types.
//!
//! The format string uses `{}` replacement fields, in the manner of `format!`.
//! A field may name an argument by position, `{1}`, and may carry one
//! presentation type after a colon:
//!
//! - `b`, `o`, `x`, `X`: integers in binary, octal, or hex.
//! - `e`, `E`: floats in exponent form with 6 decimals and an at least 2-digit exponent,
//!   e.g. `1.000000e+01`.
//!
//! Vectors and arrays print as `{a;b}`, tuples as `(a;b)`, with the
//! presentation type applied to each element.

use anyhow::{anyhow, Result};
use itertools::Itertools;
use log::debug;
use persist_types::serde::{Reader, Shape, TypeId, UtilityTypeId, WriteLen};
use persist_types::types::Value;
use std::io::Write;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum Presentation {
    Default,
    Binary,
    Octal,
    LowerHex,
    UpperHex,
    LowerExp,
    UpperExp,
}

impl Presentation {
    fn parse(spec: &str) -> Result<Self> {
        let p = match spec {
            "" => Self::Default,
            "b" => Self::Binary,
            "o" => Self::Octal,
            "x" => Self::LowerHex,
            "X" => Self::UpperHex,
            "e" => Self::LowerExp,
            "E" => Self::UpperExp,
            _ => return Err(anyhow!("Unsupported format spec {:?}", spec)),
        };
        Ok(p)
    }
}

#[derive(PartialEq, Eq, Debug)]
enum Piece<'a> {
    Literal(&'a str),
    Escaped(char),
    Field { arg: usize, pres: Presentation },
}

fn parse_format(format: &str) -> Result<Vec<Piece<'_>>> {
    let mut pieces = vec![];
    let mut rest = format;
    let mut next_arg = 0;
    let mut manual = None::<bool>;
    while let Some(i) = rest.find(['{', '}']) {
        if i > 0 {
            pieces.push(Piece::Literal(&rest[..i]));
        }
        let brace = &rest[i..];
        if brace.starts_with("{{") {
            pieces.push(Piece::Escaped('{'));
            rest = &brace[2..];
        } else if brace.starts_with("}}") {
            pieces.push(Piece::Escaped('}'));
            rest = &brace[2..];
        } else if brace.starts_with('}') {
            return Err(anyhow!("Unmatched '}}' at {} in {:?}", format.len() - brace.len(), format));
        } else {
            let end = brace
                .find('}')
                .ok_or(anyhow!("Unterminated field in {:?}", format))?;
            let field = &brace[1..end];
            let (index, spec) = field.split_once(':').unwrap_or((field, ""));
            let arg = if index.is_empty() {
                if manual == Some(true) {
                    return Err(anyhow!("Cannot mix automatic and manual field numbering"));
                }
                manual = Some(false);
                next_arg += 1;
                next_arg - 1
            } else {
                if manual == Some(false) {
                    return Err(anyhow!("Cannot mix automatic and manual field numbering"));
                }
                manual = Some(true);
                index
                    .parse::<usize>()
                    .map_err(|_| anyhow!("Invalid argument index {:?}", index))?
            };
            pieces.push(Piece::Field {
                arg,
                pres: Presentation::parse(spec)?,
            });
            rest = &brace[end + 1..];
        }
    }
    if !rest.is_empty() {
        pieces.push(Piece::Literal(rest));
    }
    Ok(pieces)
}

/// A format string bound to the descriptor of the arguments it formats.
pub struct Printer<'a> {
    pieces: Vec<Piece<'a>>,
    args: Vec<Shape>,
}

impl<'a> Printer<'a> {
    /// `descriptor` must be an argument list descriptor, as made by [`crate::descriptor`].
    pub fn new(format: &'a str, descriptor: &[u8]) -> Result<Self> {
        let shape = Shape::parse(descriptor)?;
        let args = match shape {
            Shape::Members {
                id: TypeId::Utility(UtilityTypeId::TypeList),
                members,
            } => members,
            other => return Err(anyhow!("Not an argument list: {:?}", other)),
        };
        let pieces = parse_format(format)?;
        for piece in pieces.iter() {
            if let Piece::Field { arg, .. } = piece {
                if *arg >= args.len() {
                    return Err(anyhow!(
                        "Argument {} is referenced, but only {} are described",
                        arg,
                        args.len()
                    ));
                }
            }
        }
        Ok(Self { pieces, args })
    }

    /// Reads one argument list from `r` and writes it formatted to `w`.
    pub fn print<R: Reader + ?Sized, W: Write>(&self, r: &mut R, w: &mut W) -> Result<WriteLen> {
        let vals = self
            .args
            .iter()
            .map(|shape| Value::read(shape, r))
            .collect::<Result<Vec<_>>>()?;
        debug!("Printing {} arguments", vals.len());

        let mut out = String::new();
        for piece in self.pieces.iter() {
            match piece {
                Piece::Literal(s) => out.push_str(s),
                Piece::Escaped(c) => out.push(*c),
                Piece::Field { arg, pres } => format_value(&mut out, &vals[*arg], *pres)?,
            }
        }
        w.write_all(out.as_bytes())?;
        Ok(WriteLen::new_manual(out.len()))
    }

    pub fn print_to_string<R: Reader + ?Sized>(&self, r: &mut R) -> Result<String> {
        let mut buf = vec![];
        self.print(r, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

fn format_value(out: &mut String, val: &Value, pres: Presentation) -> Result<()> {
    match (val, pres) {
        (Value::Array(vals), _) => format_seq(out, vals, pres, '{', '}'),
        (Value::Tuple(vals), _) => format_seq(out, vals, pres, '(', ')'),
        (_, Presentation::Default) => {
            out.push_str(&val.to_string());
            Ok(())
        }
        (Value::Single(_) | Value::Double(_), Presentation::LowerExp | Presentation::UpperExp) => {
            let f = val.as_f64().unwrap_or_default();
            let s = exp_notation(f);
            if pres == Presentation::UpperExp {
                out.push_str(&s.to_uppercase());
            } else {
                out.push_str(&s);
            }
            Ok(())
        }
        (
            _,
            Presentation::Binary
            | Presentation::Octal
            | Presentation::LowerHex
            | Presentation::UpperHex,
        ) => {
            let i = val
                .as_i128()
                .ok_or(anyhow!("{:?} cannot be formatted as an integer", val))?;
            if i < 0 {
                out.push('-');
            }
            let u = i.unsigned_abs();
            let s = match pres {
                Presentation::Binary => format!("{:b}", u),
                Presentation::Octal => format!("{:o}", u),
                Presentation::LowerHex => format!("{:x}", u),
                _ => format!("{:X}", u),
            };
            out.push_str(&s);
            Ok(())
        }
        (_, _) => Err(anyhow!("{:?} cannot be formatted with {:?}", val, pres)),
    }
}

fn format_seq(
    out: &mut String,
    vals: &[Value],
    pres: Presentation,
    open: char,
    close: char,
) -> Result<()> {
    out.push(open);
    let parts = vals
        .iter()
        .map(|val| {
            let mut s = String::new();
            format_value(&mut s, val, pres)?;
            Ok(s)
        })
        .collect::<Result<Vec<_>>>()?;
    out.push_str(&parts.iter().join(";"));
    out.push(close);
    Ok(())
}

/// `d.dddddde+XX`: 6 decimals, a signed exponent of at least 2 digits.
fn exp_notation(f: f64) -> String {
    if f.is_nan() {
        return "nan".into();
    }
    if f.is_infinite() {
        return if f < 0.0 { "-inf".into() } else { "inf".into() };
    }
    let s = format!("{:.6e}", f);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s,
    }
}
