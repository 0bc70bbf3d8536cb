//! Database models

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Organizational unit a person belongs to
///
/// `Lead` marks the organizational root (the branch manager); exactly one
/// person carries it and that person is excluded from all aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Unit {
    Mbm,
    Bos,
    Social,
    Sgk,
    Lead,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Mbm => "MBM",
            Unit::Bos => "BOS",
            Unit::Social => "SOCIAL",
            Unit::Sgk => "SGK",
            Unit::Lead => "LEAD",
        }
    }

    /// The units that appear on dashboards (everything except LEAD)
    pub const DASHBOARD_UNITS: [Unit; 4] = [Unit::Mbm, Unit::Bos, Unit::Social, Unit::Sgk];
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MBM" => Ok(Unit::Mbm),
            "BOS" => Ok(Unit::Bos),
            "SOCIAL" => Ok(Unit::Social),
            "SGK" => Ok(Unit::Sgk),
            "LEAD" => Ok(Unit::Lead),
            other => Err(Error::InvalidInput(format!("Unknown unit: {}", other))),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product value kind: money amounts vs unit counts
///
/// Affects display formatting only; aggregation math is kind-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Money,
    Unit,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Money => "money",
            ProductKind::Unit => "unit",
        }
    }
}

impl FromStr for ProductKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "money" => Ok(ProductKind::Money),
            "unit" => Ok(ProductKind::Unit),
            other => Err(Error::InvalidInput(format!("Unknown product kind: {}", other))),
        }
    }
}

/// Leaderboard category, stored per person at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Mikro,
    Operasional,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Mikro => "MIKRO",
            Category::Operasional => "OPERASIONAL",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MIKRO" => Ok(Category::Mikro),
            "OPERASIONAL" => Ok(Category::Operasional),
            other => Err(Error::InvalidInput(format!("Unknown category: {}", other))),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A branch employee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub role: String,
    pub unit: Unit,
    pub category: Category,
}

/// A configured product column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub kind: ProductKind,
}

/// A single dated record of a person earning an amount against a product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub person_id: String,
    pub product: String,
    /// Non-negative; non-finite values are treated as 0 by aggregation
    pub amount: f64,
    /// Calendar date, ISO 8601 `YYYY-MM-DD`
    pub date: String,
}

/// Standing goal per person per product; absent pair reads as 0
pub type TargetMap = HashMap<String, HashMap<String, f64>>;

/// Permission per person per product; absent pair reads as false
pub type AllowedMap = HashMap<String, HashMap<String, bool>>;
