//! Atom selection language.
//!
//! A VMD-flavoured subset that covers what protocol parameters use in practice:
//!
//! - `all`, `none`
//! - `protein`, `backbone`, `sidechain`, `water`, `hydrogen`, `noh`
//! - `name CA CB`, `resname ALA GLY`, `chain A B`, `segname L`/`segid L`, `element C N`
//! - `resid 5 10-20 30:40 50 to 60`, `index 0 4-9` (0-based atom index)
//!
//! Combinators are `and`, `or`, `not` and parentheses, with the usual precedence
//! (`not` binds tighter than `and`, which binds tighter than `or`). Keywords are
//! case-insensitive; name values are matched exactly.

use crate::core::models::atom::Atom;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Selection expression is empty")]
    Empty,
    #[error("Unexpected end of selection '{expr}'")]
    UnexpectedEnd { expr: String },
    #[error("Unexpected token '{token}' in selection '{expr}'")]
    UnexpectedToken { token: String, expr: String },
    #[error("Keyword '{keyword}' requires at least one value in selection '{expr}'")]
    MissingValue { keyword: String, expr: String },
    #[error("Invalid {keyword} value '{value}' in selection '{expr}'")]
    InvalidValue {
        keyword: &'static str,
        value: String,
        expr: String,
    },
    #[error("Unbalanced parentheses in selection '{expr}'")]
    UnbalancedParentheses { expr: String },
    #[error("Selection '{expr}' is nested too deeply")]
    TooDeep { expr: String },
}

/// Maximum combined depth of `not` and parentheses in one expression.
pub const MAX_NESTING: usize = 128;

/// An inclusive integer range as written in a `resid` or `index` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub start: i64,
    pub end: i64,
}

impl IntRange {
    fn contains(&self, value: i64) -> bool {
        value >= self.start && value <= self.end
    }
}

/// A parsed selection expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    All,
    None,
    Protein,
    Backbone,
    Sidechain,
    Water,
    Hydrogen,
    Name(Vec<String>),
    ResName(Vec<String>),
    Chain(Vec<char>),
    SegName(Vec<String>),
    Element(Vec<String>),
    ResId(Vec<IntRange>),
    Index(Vec<IntRange>),
    Not(Box<Selection>),
    And(Box<Selection>, Box<Selection>),
    Or(Box<Selection>, Box<Selection>),
}

impl Selection {
    /// Tests one atom. `index` is the atom's 0-based position in its molecule.
    pub fn matches(&self, index: usize, atom: &Atom) -> bool {
        match self {
            Self::All => true,
            Self::None => false,
            Self::Protein => atom.is_protein(),
            Self::Backbone => atom.is_backbone(),
            Self::Sidechain => atom.is_protein() && !atom.is_backbone() && !atom.is_hydrogen(),
            Self::Water => atom.is_water(),
            Self::Hydrogen => atom.is_hydrogen(),
            Self::Name(names) => names.iter().any(|n| *n == atom.name),
            Self::ResName(names) => names.iter().any(|n| *n == atom.resname),
            Self::Chain(ids) => ids.contains(&atom.chain),
            Self::SegName(names) => names.iter().any(|n| *n == atom.segid),
            Self::Element(elems) => elems.iter().any(|e| e.eq_ignore_ascii_case(&atom.element)),
            Self::ResId(ranges) => ranges.iter().any(|r| r.contains(atom.resid as i64)),
            Self::Index(ranges) => ranges.iter().any(|r| r.contains(index as i64)),
            Self::Not(inner) => !inner.matches(index, atom),
            Self::And(l, r) => l.matches(index, atom) && r.matches(index, atom),
            Self::Or(l, r) => l.matches(index, atom) || r.matches(index, atom),
        }
    }
}

const KEYWORDS: &[&str] = &[
    "and", "or", "not", "(", ")", "all", "none", "protein", "backbone", "sidechain", "water",
    "hydrogen", "noh", "name", "resname", "resid", "chain", "segname", "segid", "element",
    "index",
];

fn is_keyword(token: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(token))
}

/// Parses a selection expression.
pub fn parse(expr: &str) -> Result<Selection, SelectionError> {
    let tokens = tokenize(expr);
    if tokens.is_empty() {
        return Err(SelectionError::Empty);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        expr,
    };
    let sel = parser.parse_or()?;
    if let Some(token) = parser.peek() {
        return Err(if token == ")" {
            SelectionError::UnbalancedParentheses { expr: expr.into() }
        } else {
            SelectionError::UnexpectedToken {
                token: token.to_string(),
                expr: expr.into(),
            }
        });
    }
    Ok(sel)
}

fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for ch in input.chars() {
        if ch.is_whitespace() || ch == '(' || ch == ')' {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            if ch == '(' || ch == ')' {
                tokens.push(ch.to_string());
            }
        } else {
            word.push(ch);
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

struct Parser<'a> {
    tokens: Vec<String>,
    pos: usize,
    depth: usize,
    expr: &'a str,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn peek_is(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|t| t.eq_ignore_ascii_case(keyword))
    }

    fn advance(&mut self) -> Option<String> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, SelectionError>,
    ) -> Result<T, SelectionError> {
        if self.depth >= MAX_NESTING {
            return Err(SelectionError::TooDeep {
                expr: self.expr.into(),
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_or(&mut self) -> Result<Selection, SelectionError> {
        let mut left = self.parse_and()?;
        while self.peek_is("or") {
            self.advance();
            let right = self.parse_and()?;
            left = Selection::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Selection, SelectionError> {
        let mut left = self.parse_not()?;
        while self.peek_is("and") {
            self.advance();
            let right = self.parse_not()?;
            left = Selection::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Selection, SelectionError> {
        if self.peek_is("not") {
            self.advance();
            let inner = self.nested(Self::parse_not)?;
            return Ok(Selection::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Selection, SelectionError> {
        let token = self.advance().ok_or_else(|| SelectionError::UnexpectedEnd {
            expr: self.expr.into(),
        })?;

        match token.to_ascii_lowercase().as_str() {
            "(" => {
                let inner = self.nested(Self::parse_or)?;
                match self.advance() {
                    Some(t) if t == ")" => Ok(inner),
                    _ => Err(SelectionError::UnbalancedParentheses {
                        expr: self.expr.into(),
                    }),
                }
            }
            "all" => Ok(Selection::All),
            "none" => Ok(Selection::None),
            "protein" => Ok(Selection::Protein),
            "backbone" => Ok(Selection::Backbone),
            "sidechain" => Ok(Selection::Sidechain),
            "water" => Ok(Selection::Water),
            "hydrogen" => Ok(Selection::Hydrogen),
            "noh" => Ok(Selection::Not(Box::new(Selection::Hydrogen))),
            "name" => Ok(Selection::Name(self.parse_values(&token)?)),
            "resname" => Ok(Selection::ResName(self.parse_values(&token)?)),
            "segname" | "segid" => Ok(Selection::SegName(self.parse_values(&token)?)),
            "element" => Ok(Selection::Element(self.parse_values(&token)?)),
            "chain" => {
                let values = self.parse_values(&token)?;
                let mut ids = Vec::with_capacity(values.len());
                for value in values {
                    let mut chars = value.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => ids.push(c),
                        _ => {
                            return Err(SelectionError::InvalidValue {
                                keyword: "chain",
                                value,
                                expr: self.expr.into(),
                            });
                        }
                    }
                }
                Ok(Selection::Chain(ids))
            }
            "resid" => Ok(Selection::ResId(self.parse_ranges(&token, "resid")?)),
            "index" => Ok(Selection::Index(self.parse_ranges(&token, "index")?)),
            ")" => Err(SelectionError::UnbalancedParentheses {
                expr: self.expr.into(),
            }),
            _ => Err(SelectionError::UnexpectedToken {
                token,
                expr: self.expr.into(),
            }),
        }
    }

    /// Consumes non-keyword values following a keyword (`name CA CB C`).
    fn parse_values(&mut self, keyword: &str) -> Result<Vec<String>, SelectionError> {
        let mut values = Vec::new();
        while let Some(token) = self.peek() {
            if is_keyword(token) {
                break;
            }
            values.push(token.to_string());
            self.pos += 1;
        }
        if values.is_empty() {
            return Err(SelectionError::MissingValue {
                keyword: keyword.to_string(),
                expr: self.expr.into(),
            });
        }
        Ok(values)
    }

    fn parse_ranges(
        &mut self,
        keyword: &str,
        kind: &'static str,
    ) -> Result<Vec<IntRange>, SelectionError> {
        let values = self.parse_values(keyword)?;
        let expr = self.expr;
        let invalid = |value: &str| SelectionError::InvalidValue {
            keyword: kind,
            value: value.to_string(),
            expr: expr.into(),
        };

        let mut ranges = Vec::new();
        let mut iter = values.iter().peekable();
        while let Some(value) = iter.next() {
            if iter.peek().is_some_and(|next| next.eq_ignore_ascii_case("to")) {
                iter.next();
                let end_value = iter.next().ok_or_else(|| invalid(value))?;
                let start: i64 = value.parse().map_err(|_| invalid(value))?;
                let end: i64 = end_value.parse().map_err(|_| invalid(end_value))?;
                ranges.push(IntRange { start, end });
                continue;
            }
            ranges.push(parse_range(value).ok_or_else(|| invalid(value))?);
        }
        Ok(ranges)
    }
}

// "5", "-3", "1-10", "1:10", "-5-5"
fn parse_range(value: &str) -> Option<IntRange> {
    if let Ok(n) = value.parse::<i64>() {
        return Some(IntRange { start: n, end: n });
    }
    let sep = value
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '-' || c == ':')
        .map(|(i, _)| i)?;
    let start = value[..sep].parse().ok()?;
    let end = value[sep + 1..].parse().ok()?;
    Some(IntRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::molecule::Molecule;
    use nalgebra::Point3;

    fn atom(name: &str, resname: &str, resid: i32, chain: char, segid: &str) -> Atom {
        let mut atom = Atom::new(0, name, resname, resid, chain);
        atom.segid = segid.to_string();
        atom
    }

    fn sample_molecule() -> Molecule {
        let mut mol = Molecule::new();
        let atoms = [
            atom("N", "ALA", 1, 'A', "P"),
            atom("CA", "ALA", 1, 'A', "P"),
            atom("CB", "ALA", 1, 'A', "P"),
            atom("HA", "ALA", 1, 'A', "P"),
            atom("CA", "GLY", 2, 'A', "P"),
            atom("C1", "LIG", 100, 'B', "L"),
            atom("H1", "LIG", 100, 'B', "L"),
            atom("O2", "LIG", 100, 'B', "L"),
            atom("OH2", "TIP3", 200, 'W', "W"),
        ];
        for a in atoms {
            mol.add_atom(a, Point3::origin());
        }
        mol
    }

    #[test]
    fn keyword_classes_select_expected_atoms() {
        let mol = sample_molecule();
        assert_eq!(mol.indices("all").unwrap().len(), 9);
        assert!(mol.indices("none").unwrap().is_empty());
        assert_eq!(mol.indices("protein").unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(mol.indices("backbone").unwrap(), vec![0, 1, 4]);
        assert_eq!(mol.indices("sidechain").unwrap(), vec![2]);
        assert_eq!(mol.indices("water").unwrap(), vec![8]);
        assert_eq!(mol.indices("hydrogen").unwrap(), vec![3, 6]);
    }

    #[test]
    fn protein_and_name_ca_selects_alpha_carbons() {
        let mol = sample_molecule();
        assert_eq!(mol.indices("protein and name CA").unwrap(), vec![1, 4]);
    }

    #[test]
    fn segname_and_noh_selects_ligand_heavy_atoms() {
        let mol = sample_molecule();
        assert_eq!(mol.indices("segname L and noh").unwrap(), vec![5, 7]);
        assert_eq!(mol.indices("segid L and noh").unwrap(), vec![5, 7]);
    }

    #[test]
    fn resid_and_index_accept_ranges() {
        let mol = sample_molecule();
        assert_eq!(mol.indices("resid 2 100").unwrap(), vec![4, 5, 6, 7]);
        assert_eq!(mol.indices("resid 1-2").unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(mol.indices("resid 100 to 200").unwrap(), vec![5, 6, 7, 8]);
        assert_eq!(mol.indices("index 0 7:8").unwrap(), vec![0, 7, 8]);
    }

    #[test]
    fn precedence_is_not_then_and_then_or() {
        let mol = sample_molecule();
        // chain W or (chain B and (not name H1))
        assert_eq!(
            mol.indices("chain W or chain B and not name H1").unwrap(),
            vec![5, 7, 8]
        );
        assert_eq!(
            mol.indices("(chain W or chain B) and not hydrogen").unwrap(),
            vec![5, 7, 8]
        );
    }

    #[test]
    fn keywords_are_case_insensitive_but_values_are_exact() {
        let mol = sample_molecule();
        assert_eq!(mol.indices("NAME CA AND RESNAME GLY").unwrap(), vec![4]);
        assert!(mol.indices("name ca").unwrap().is_empty());
    }

    #[test]
    fn negative_resid_parses_as_single_value() {
        assert_eq!(parse_range("-3"), Some(IntRange { start: -3, end: -3 }));
        assert_eq!(parse_range("-5-5"), Some(IntRange { start: -5, end: 5 }));
        assert_eq!(parse_range("x"), None);
    }

    #[test]
    fn malformed_expressions_are_rejected() {
        assert_eq!(parse("   "), Err(SelectionError::Empty));
        assert!(matches!(
            parse("name"),
            Err(SelectionError::MissingValue { .. })
        ));
        assert!(matches!(
            parse("protein and"),
            Err(SelectionError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            parse("(protein"),
            Err(SelectionError::UnbalancedParentheses { .. })
        ));
        assert!(matches!(
            parse("protein)"),
            Err(SelectionError::UnbalancedParentheses { .. })
        ));
        assert!(matches!(
            parse("resid abc"),
            Err(SelectionError::InvalidValue { keyword: "resid", .. })
        ));
        assert!(matches!(
            parse("chain AB"),
            Err(SelectionError::InvalidValue { keyword: "chain", .. })
        ));
        assert!(matches!(
            parse("banana"),
            Err(SelectionError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let nested = format!("{}all{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(
            parse(&nested),
            Err(SelectionError::TooDeep { .. })
        ));
        let negated = format!("{}protein", "not ".repeat(10_000));
        assert!(matches!(
            parse(&negated),
            Err(SelectionError::TooDeep { .. })
        ));

        let shallow = format!("{}all{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(parse(&shallow), Ok(Selection::All));
    }
}
