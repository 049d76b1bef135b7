//! Domains: the typed segments a strand is made of.

use std::fmt;

/// A single domain of a strand, e.g. `a`, `t^*` or `b!1`.
///
/// The bond label is only meaningful within the block (or canonical form)
/// it was read from; it pairs this domain with the one other domain that
/// carries the same label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain {
    name: String,
    toehold: bool,
    complementary: bool,
    bond: Option<String>,
}

impl Domain {
    pub fn new(name: impl Into<String>, toehold: bool, complementary: bool) -> Self {
        Domain {
            name: name.into(),
            toehold,
            complementary,
            bond: None,
        }
    }

    /// Same domain, bonded under the given label.
    pub fn with_bond(mut self, label: impl Into<String>) -> Self {
        self.bond = Some(label.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_toehold(&self) -> bool {
        self.toehold
    }

    pub fn is_complementary(&self) -> bool {
        self.complementary
    }

    pub fn is_bonded(&self) -> bool {
        self.bond.is_some()
    }

    /// The bond label, if bonded.
    pub fn bond_label(&self) -> Option<&str> {
        self.bond.as_deref()
    }

    /// Two domains are of the same type if they only differ in bond state.
    pub fn same_type(&self, other: &Domain) -> bool {
        self.name == other.name
            && self.toehold == other.toehold
            && self.complementary == other.complementary
    }

    /// Writes the unbonded part of the notation (`name`, `^`, `*`).
    pub fn write_type(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.toehold {
            f.write_char('^')?;
        }
        if self.complementary {
            f.write_char('*')?;
        }
        Ok(())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_type(f)?;
        if let Some(label) = &self.bond {
            write!(f, "!{label}")?;
        }
        Ok(())
    }
}
