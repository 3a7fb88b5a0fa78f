//! LOINC identifier classification.
//!
//! LOINC reserves dedicated prefixes for its auxiliary code families: `LP`
//! (parts), `LG` (groups), `LL` (answer lists), `LA` (answers). Plain
//! measurement codes carry no special prefix. Classification is derived
//! purely from the identifier's literal prefix after trimming; no external
//! lookup is performed.
//!
//! An empty identifier passes every type filter. This permissive default is
//! intentional and matches upstream behavior: rows with a missing candidate
//! identifier are never dropped by a filter.

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

/// The LOINC code family an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoincType {
    /// Regular measurement code (no `LP`/`LG`/`LL`/`LA` prefix).
    Loinc,
    /// Part code (`LP` prefix).
    Part,
    /// Group code (`LG` prefix).
    Group,
    /// Answer list code (`LL` prefix).
    List,
    /// Answer code (`LA` prefix).
    Answers,
}

/// Classifies an identifier by its literal prefix.
///
/// Total over all strings: anything without one of the four reserved
/// prefixes (including the empty string) classifies as [`LoincType::Loinc`].
pub fn classify(code: &str) -> LoincType {
    let code = code.trim();
    if code.starts_with("LP") {
        LoincType::Part
    } else if code.starts_with("LG") {
        LoincType::Group
    } else if code.starts_with("LL") {
        LoincType::List
    } else if code.starts_with("LA") {
        LoincType::Answers
    } else {
        LoincType::Loinc
    }
}

impl LoincType {
    /// Returns true when `code` belongs to this family.
    ///
    /// An empty (or all-whitespace) identifier matches every family.
    pub fn matches(self, code: &str) -> bool {
        let code = code.trim();
        if code.is_empty() {
            return true;
        }
        classify(code) == self
    }
}

/// Applies an optional type filter; `None` matches everything.
pub fn matches_filter(code: &str, filter: Option<LoincType>) -> bool {
    match filter {
        None => true,
        Some(loinc_type) => loinc_type.matches(code),
    }
}

impl fmt::Display for LoincType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoincType::Loinc => "LOINC",
            LoincType::Part => "Part",
            LoincType::Group => "Group",
            LoincType::List => "List",
            LoincType::Answers => "Answers",
        };
        f.write_str(name)
    }
}

impl FromStr for LoincType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOINC" => Ok(LoincType::Loinc),
            "Part" => Ok(LoincType::Part),
            "Group" => Ok(LoincType::Group),
            "List" => Ok(LoincType::List),
            "Answers" => Ok(LoincType::Answers),
            other => Err(format!(
                "unknown LOINC type '{other}' (expected LOINC, Part, Group, List or Answers)"
            )),
        }
    }
}
