//! Lexer for one line of domain-level notation.
//!
//! A strand is written as `<d1 d2 ... dn>`, where every domain is a name of
//! letters and digits, optionally followed by `^` (toehold), `*`
//! (complementary) and `!label` (bonded to the other domain with the same
//! label). A trailing newline attaches the running input count as the
//! origin tag of the strand.

use crate::Color;
use crate::Domain;
use crate::Strand;
use crate::StructureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the opening `<`.
    Start,
    /// Reading a domain name.
    Name,
    /// After `^` or `*`.
    Modifier,
    /// Reading a bond label after `!`.
    Label,
    /// After the closing `>`.
    Closed,
}

#[derive(Debug, Default)]
struct DomainBuilder {
    name: String,
    toehold: bool,
    complementary: bool,
    bond: Option<String>,
}

impl DomainBuilder {
    fn finish(&mut self, line: &str) -> Result<Domain, StructureError> {
        let b = std::mem::take(self);
        if b.name.is_empty() {
            return Err(StructureError::parse(line, "empty domain name"));
        }
        let domain = Domain::new(b.name, b.toehold, b.complementary);
        match b.bond {
            Some(label) if label.is_empty() => {
                Err(StructureError::parse(line, "empty bond label"))
            }
            Some(label) => Ok(domain.with_bond(label)),
            None => Ok(domain),
        }
    }
}

/// Lexes one notation line into a Strand.
///
/// If the line ends with `\n`, `count` is attached as origin tag.
pub fn lex_strand(line: &str, count: Color) -> Result<Strand, StructureError> {
    lex(line, Some(count))
}

impl TryFrom<&str> for Strand {
    type Error = StructureError;

    /// Lexes a strand without attaching an origin tag.
    fn try_from(line: &str) -> Result<Self, Self::Error> {
        lex(line, None)
    }
}

fn lex(line: &str, count: Option<Color>) -> Result<Strand, StructureError> {
    let mut strand = Strand::default();
    let mut current = DomainBuilder::default();
    let mut state = State::Start;

    for ch in line.chars() {
        match (state, ch) {
            (State::Start, '<') => {
                current = DomainBuilder::default();
                state = State::Name;
            }
            (State::Start | State::Closed, ' ' | '\t' | '\r') => (),
            (State::Start, c) => {
                return Err(StructureError::parse(line, format!("unexpected '{}' before '<'", c.escape_default())));
            }
            (State::Name, c) if c.is_ascii_alphanumeric() || c == '_' => current.name.push(c),
            (State::Label, c) if c.is_ascii_alphanumeric() || c == '_' => {
                if let Some(label) = current.bond.as_mut() {
                    label.push(c);
                }
            }
            (State::Name | State::Modifier, '^') => {
                current.toehold = true;
                state = State::Modifier;
            }
            (State::Name | State::Modifier, '*') => {
                current.complementary = true;
                state = State::Modifier;
            }
            (State::Name | State::Modifier, '!') => {
                current.bond = Some(String::new());
                state = State::Label;
            }
            (State::Name | State::Modifier | State::Label, ' ') => {
                strand.push(current.finish(line)?);
                state = State::Name;
            }
            (State::Name | State::Modifier | State::Label, '>') => {
                strand.push(current.finish(line)?);
                state = State::Closed;
            }
            (State::Closed, '\n') => {
                if let Some(count) = count {
                    strand.add_color(count);
                }
            }
            (State::Name | State::Modifier | State::Label, '\n') => {
                return Err(StructureError::parse(line, "unterminated strand, missing '>'"));
            }
            (State::Closed, c) => {
                return Err(StructureError::parse(line, format!("unexpected '{c}' after '>'")));
            }
            (_, c) => {
                return Err(StructureError::parse(line, format!("unexpected '{}'", c.escape_default())));
            }
        }
    }

    match state {
        State::Closed => Ok(strand),
        State::Start => Err(StructureError::parse(line, "no strand found, missing '<'")),
        _ => Err(StructureError::parse(line, "unterminated strand, missing '>'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_plain_strand() {
        let s = lex_strand("<a b c>", 1).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.domains()[1].name(), "b");
        assert!(s.colors().is_empty());
    }

    #[test]
    fn test_lex_modifiers_and_bonds() {
        let s = Strand::try_from("<t^ a* x1^*!12 b!k>").unwrap();
        let d = s.domains();
        assert!(d[0].is_toehold() && !d[0].is_complementary());
        assert!(d[1].is_complementary() && !d[1].is_bonded());
        assert_eq!(d[2].name(), "x1");
        assert!(d[2].is_toehold() && d[2].is_complementary());
        assert_eq!(d[2].bond_label(), Some("12"));
        assert_eq!(d[3].bond_label(), Some("k"));
        assert_eq!(s.to_string(), "<t^ a* x1^*!12 b!k>");
    }

    #[test]
    fn test_lex_newline_attaches_count() {
        let s = lex_strand("<a b!1>\n", 7).unwrap();
        assert_eq!(s.color(), Some(7));
        let s = Strand::try_from("<a b!1>\n").unwrap();
        assert_eq!(s.color(), None);
    }

    #[test]
    fn test_lex_tolerates_surrounding_whitespace() {
        let s = lex_strand("  <a b>  \r\n", 2).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.color(), Some(2));
    }

    #[test]
    fn test_lex_rejects_malformed_input() {
        for bad in ["<a b", "a b>", "", "<a  b>", "<>", "<a b!>", "<a> x", "<a^b>", "<a<b>", "<a b\n>"] {
            let err = Strand::try_from(bad);
            assert!(matches!(err, Err(StructureError::Parse { .. })), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_parse_error_names_line() {
        let err = lex_strand("<a b\n", 1).unwrap_err();
        assert_eq!(err, StructureError::Parse {
            line: "<a b".to_string(),
            reason: "unterminated strand, missing '>'".to_string(),
        });
    }
}
