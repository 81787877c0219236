//! Chemical compositions: element-count maps with formula parsing and
//! reduced (formula-unit-independent) forms.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{HullbenchError, Result};

/// Ratios in reduced compositions are rounded to this many decimal places so
/// that compositions differing only by formula-unit count hash to the same
/// grouping key.
const REDUCTION_DECIMALS: i32 = 8;

/// A chemical composition: mapping from element symbol to atom count.
///
/// Counts are f64 to admit fractional occupancies. Element order is
/// canonical (alphabetical) via the underlying `BTreeMap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Composition {
    counts: BTreeMap<String, f64>,
}

impl Composition {
    /// Builds a composition from explicit element counts.
    ///
    /// Zero or negative counts and empty maps are rejected: an entry's
    /// energy is meaningless without at least one atom.
    pub fn new(counts: BTreeMap<String, f64>) -> Result<Self> {
        if counts.is_empty() {
            return Err(HullbenchError::parse("composition has no elements"));
        }
        for (el, &count) in &counts {
            if !(count > 0.0) || !count.is_finite() {
                return Err(HullbenchError::parse(format!(
                    "element '{el}' has non-positive count {count}"
                )));
            }
        }
        Ok(Self { counts })
    }

    /// Single-element convenience constructor.
    pub fn of_element(element: impl Into<String>, count: f64) -> Result<Self> {
        let mut counts = BTreeMap::new();
        counts.insert(element.into(), count);
        Self::new(counts)
    }

    /// Total number of atoms per formula unit.
    pub fn num_atoms(&self) -> f64 {
        self.counts.values().sum()
    }

    /// Count for one element, 0.0 if absent.
    pub fn count(&self, element: &str) -> f64 {
        self.counts.get(element).copied().unwrap_or(0.0)
    }

    /// Iterator over (element symbol, count) in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.counts.iter().map(|(el, &count)| (el.as_str(), count))
    }

    /// Element symbols in canonical order.
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Number of distinct elements.
    pub fn num_elements(&self) -> usize {
        self.counts.len()
    }

    /// Whether this composition contains exactly one element.
    pub fn is_element(&self) -> bool {
        self.counts.len() == 1
    }

    /// The single element symbol, if `is_element`.
    pub fn single_element(&self) -> Option<&str> {
        if self.is_element() {
            self.counts.keys().next().map(String::as_str)
        } else {
            None
        }
    }

    /// Reduced composition: counts divided by the smallest count, so the
    /// result is independent of formula-unit count. Fe2O2 and FeO reduce to
    /// the same composition; Fe2O3 reduces to Fe1O1.5.
    pub fn reduced(&self) -> Composition {
        let min = self
            .counts
            .values()
            .copied()
            .fold(f64::INFINITY, f64::min);
        let scale = 10f64.powi(REDUCTION_DECIMALS);
        let counts = self
            .counts
            .iter()
            .map(|(el, &count)| (el.clone(), ((count / min) * scale).round() / scale))
            .collect();
        // counts stay positive under division by the positive minimum
        Composition { counts }
    }

    /// Canonical string key of the reduced composition, used to group
    /// entries independent of formula-unit count.
    pub fn reduction_key(&self) -> String {
        let reduced = self.reduced();
        let mut key = String::new();
        for (el, count) in reduced.iter() {
            key.push_str(el);
            key.push(':');
            key.push_str(&format!("{:.prec$};", count, prec = REDUCTION_DECIMALS as usize));
        }
        key
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (el, count) in self.iter() {
            if (count - 1.0).abs() < 1e-12 {
                write!(f, "{el}")?;
            } else if (count - count.round()).abs() < 1e-9 {
                write!(f, "{el}{}", count.round() as i64)?;
            } else {
                write!(f, "{el}{count}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Composition {
    type Err = HullbenchError;

    /// Parses formula strings like `Fe2O3`, `LiFePO4` or `Ca(OH)2`.
    /// Counts may be fractional (`Fe0.5O`). Whitespace is ignored.
    fn from_str(formula: &str) -> Result<Self> {
        let chars: Vec<char> = formula.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.is_empty() {
            return Err(HullbenchError::parse("empty formula"));
        }
        let mut counts = BTreeMap::new();
        let mut pos = 0;
        parse_group(&chars, &mut pos, 1.0, &mut counts, formula)?;
        if pos != chars.len() {
            return Err(HullbenchError::parse(format!(
                "unexpected character '{}' at position {pos} in '{formula}'"
            , chars[pos])));
        }
        Composition::new(counts)
    }
}

/// Parses a sequence of element/group tokens until end of input or a
/// closing parenthesis, accumulating counts scaled by `multiplier`.
fn parse_group(
    chars: &[char],
    pos: &mut usize,
    multiplier: f64,
    counts: &mut BTreeMap<String, f64>,
    formula: &str,
) -> Result<()> {
    while *pos < chars.len() {
        match chars[*pos] {
            '(' => {
                *pos += 1;
                let mut inner = BTreeMap::new();
                parse_group(chars, pos, 1.0, &mut inner, formula)?;
                if *pos >= chars.len() || chars[*pos] != ')' {
                    return Err(HullbenchError::parse(format!(
                        "unbalanced parentheses in '{formula}'"
                    )));
                }
                *pos += 1;
                let group_count = parse_count(chars, pos)?.unwrap_or(1.0);
                for (el, count) in inner {
                    *counts.entry(el).or_insert(0.0) += count * group_count * multiplier;
                }
            }
            ')' => return Ok(()),
            c if c.is_ascii_uppercase() => {
                let mut symbol = String::new();
                symbol.push(c);
                *pos += 1;
                while *pos < chars.len() && chars[*pos].is_ascii_lowercase() {
                    symbol.push(chars[*pos]);
                    *pos += 1;
                }
                let count = parse_count(chars, pos)?.unwrap_or(1.0);
                *counts.entry(symbol).or_insert(0.0) += count * multiplier;
            }
            c => {
                return Err(HullbenchError::parse(format!(
                    "unexpected character '{c}' in '{formula}'"
                )))
            }
        }
    }
    Ok(())
}

/// Parses an optional numeric count (integer or decimal) at `pos`.
///
/// `Ok(None)` means no count is present (implied 1); a digit/dot run that
/// is not a valid number (`1.2.3`, a bare `.`) is an error, never a
/// silent default.
fn parse_count(chars: &[char], pos: &mut usize) -> Result<Option<f64>> {
    let start = *pos;
    while *pos < chars.len() && (chars[*pos].is_ascii_digit() || chars[*pos] == '.') {
        *pos += 1;
    }
    if *pos == start {
        return Ok(None);
    }
    let text: String = chars[start..*pos].iter().collect();
    match text.parse() {
        Ok(count) => Ok(Some(count)),
        Err(_) => Err(HullbenchError::parse(format!("invalid count '{text}'"))),
    }
}
