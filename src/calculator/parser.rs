//! Recursive-descent parser over a closed grammar.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '//' | '%') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('**' unary)?
//! primary := NUMBER | IDENT | IDENT '(' [expr (',' expr)*] ')' | '(' expr ')'
//! ```
//!
//! Nothing outside this grammar has a representation in [`Expr`], so
//! attribute access, subscripts, assignment and statements cannot be
//! expressed at all.

use super::error::CalcError;
use super::lexer::{Spanned, Token, tokenize};
use super::number::Number;

/// Nesting limit for parentheses, unary chains and call arguments.
const MAX_DEPTH: usize = 200;

/// Limit on the height of the finished tree. Chained binary operators build
/// left-deep trees without recursing in the parser, so they are counted here.
const MAX_HEIGHT: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Expr {
    Number(Number),
    Name(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

pub(crate) fn parse(input: &str) -> Result<Expr, CalcError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        position: 0,
        depth: 0,
        height: 0,
    };
    let expr = parser.expr()?;
    match parser.tokens.get(parser.position) {
        None => Ok(expr),
        Some(extra) => Err(unexpected(extra)),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    position: usize,
    depth: usize,
    height: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|spanned| &spanned.token)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.position).cloned();
        if spanned.is_some() {
            self.position += 1;
        }
        spanned
    }

    fn expect(&mut self, expected: Token) -> Result<(), CalcError> {
        match self.advance() {
            Some(spanned) if spanned.token == expected => Ok(()),
            Some(spanned) => Err(unexpected(&spanned)),
            None => Err(end_of_input()),
        }
    }

    fn descend(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(too_deep());
        }
        self.grow()
    }

    fn ascend(&mut self) {
        self.depth -= 1;
        self.height -= 1;
    }

    /// Account for one more level of tree height.
    fn grow(&mut self) -> Result<(), CalcError> {
        self.height += 1;
        if self.height > MAX_HEIGHT {
            return Err(too_deep());
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, CalcError> {
        let mut lhs = self.term()?;
        let mut chained = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.position += 1;
            self.grow()?;
            chained += 1;
            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs);
        }
        self.height -= chained;
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, CalcError> {
        let mut lhs = self.unary()?;
        let mut chained = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::DoubleSlash) => BinaryOp::FloorDiv,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => break,
            };
            self.position += 1;
            self.grow()?;
            chained += 1;
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
        self.height -= chained;
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, CalcError> {
        let op = match self.peek() {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Minus,
            _ => return self.power(),
        };
        self.position += 1;
        self.descend()?;
        let operand = self.unary()?;
        self.ascend();
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn power(&mut self) -> Result<Expr, CalcError> {
        let base = self.primary()?;
        if self.peek() != Some(&Token::DoubleStar) {
            return Ok(base);
        }
        self.position += 1;
        // Right-associative, and the exponent may carry its own sign.
        self.descend()?;
        let exponent = self.unary()?;
        self.ascend();
        Ok(binary(BinaryOp::Pow, base, exponent))
    }

    fn primary(&mut self) -> Result<Expr, CalcError> {
        let spanned = self.advance().ok_or_else(end_of_input)?;
        match spanned.token {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Ident(name) => {
                if self.peek() == Some(&Token::LeftParen) {
                    self.position += 1;
                    let args = self.arguments()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Name(name))
                }
            }
            Token::LeftParen => {
                self.descend()?;
                let inner = self.expr()?;
                self.ascend();
                self.expect(Token::RightParen)?;
                Ok(inner)
            }
            _ => Err(unexpected(&spanned)),
        }
    }

    /// Arguments after an opening parenthesis, through the closing one.
    fn arguments(&mut self) -> Result<Vec<Expr>, CalcError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RightParen) {
            self.position += 1;
            return Ok(args);
        }

        self.descend()?;
        loop {
            args.push(self.expr()?);
            match self.advance() {
                Some(Spanned {
                    token: Token::Comma,
                    ..
                }) => {
                    // Trailing comma before the closing parenthesis.
                    if self.peek() == Some(&Token::RightParen) {
                        self.position += 1;
                        break;
                    }
                }
                Some(Spanned {
                    token: Token::RightParen,
                    ..
                }) => break,
                Some(other) => return Err(unexpected(&other)),
                None => return Err(end_of_input()),
            }
        }
        self.ascend();
        Ok(args)
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn unexpected(spanned: &Spanned) -> CalcError {
    CalcError::invalid(format!(
        "invalid syntax: unexpected '{}' (at position {})",
        spanned.token,
        spanned.offset + 1
    ))
}

fn too_deep() -> CalcError {
    CalcError::invalid("expression is nested too deeply")
}

fn end_of_input() -> CalcError {
    CalcError::invalid("invalid syntax: unexpected end of expression")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int(i: i64) -> Expr {
        Expr::Number(Number::Int(i))
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parse("1 + 2 * 3").unwrap(),
            binary(BinaryOp::Add, int(1), binary(BinaryOp::Mul, int(2), int(3)))
        );
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(
            parse("2 ** 3 ** 2").unwrap(),
            binary(BinaryOp::Pow, int(2), binary(BinaryOp::Pow, int(3), int(2)))
        );
    }

    #[test]
    fn test_unary_minus_below_power() {
        assert_eq!(
            parse("-2 ** 2").unwrap(),
            Expr::Unary {
                op: UnaryOp::Minus,
                operand: Box::new(binary(BinaryOp::Pow, int(2), int(2))),
            }
        );
        assert_eq!(
            parse("2 ** -1").unwrap(),
            binary(
                BinaryOp::Pow,
                int(2),
                Expr::Unary {
                    op: UnaryOp::Minus,
                    operand: Box::new(int(1)),
                }
            )
        );
    }

    #[test]
    fn test_calls() {
        assert_eq!(
            parse("pow(2, 8)").unwrap(),
            Expr::Call {
                name: "pow".to_string(),
                args: vec![int(2), int(8)],
            }
        );
        assert_eq!(
            parse("gcd()").unwrap(),
            Expr::Call {
                name: "gcd".to_string(),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_syntax_errors() {
        for input in ["2 +* 2", "(1 + 2", "1 + 2)", "sin(1,", "1 2", "*3", "()", "f(,)"] {
            let err = parse(input).unwrap_err();
            assert!(err.is_invalid(), "{input} should be invalid");
        }
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(500), ")".repeat(500));
        assert!(parse(&deep).unwrap_err().is_invalid());
        let ok = format!("{}1{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(parse(&ok).unwrap(), int(1));
    }

    #[test]
    fn test_long_operator_chains() {
        let long = format!("{}1", "1+".repeat(100_000));
        assert_eq!(
            parse(&long).unwrap_err().to_string(),
            "Invalid expression: expression is nested too deeply"
        );
        let products = format!("{}2", "2*".repeat(100_000));
        assert!(parse(&products).unwrap_err().is_invalid());

        // Chains nested inside parentheses share the same budget.
        let mixed = format!("({}1)", "1-".repeat(1000));
        assert!(parse(&mixed).unwrap_err().is_invalid());
        assert!(parse(&format!("{}1", "1+".repeat(999))).is_ok());
    }

    #[test]
    fn test_sibling_chains_do_not_accumulate() {
        let chain = format!("{}1", "1+".repeat(900));
        let siblings = format!("max({chain}, {chain}) * ({chain})");
        assert!(parse(&siblings).is_ok());
    }
}
