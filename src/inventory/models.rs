use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PileError;

pub type BatteryId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatteryKind {
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "9V", alias = "NineV")]
    NineV,
    #[serde(rename = "CR2032")]
    Cr2032,
    Other,
}

impl std::fmt::Display for BatteryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatteryKind::Aa => write!(f, "AA"),
            BatteryKind::Aaa => write!(f, "AAA"),
            BatteryKind::NineV => write!(f, "9V"),
            BatteryKind::Cr2032 => write!(f, "CR2032"),
            BatteryKind::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for BatteryKind {
    type Err = PileError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AA" => Ok(BatteryKind::Aa),
            "AAA" => Ok(BatteryKind::Aaa),
            "9V" | "NINEV" => Ok(BatteryKind::NineV),
            "CR2032" => Ok(BatteryKind::Cr2032),
            "OTHER" => Ok(BatteryKind::Other),
            _ => Err(PileError::Validation(format!("unknown battery kind: {}", s))),
        }
    }
}

/// A tracked household battery
///
/// Expiry is never stored: it is derived from `expiry_date` at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    pub id: BatteryId,
    pub kind: BatteryKind,
    pub brand: String,
    pub location: String,
    pub date_added: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub recycled: bool,
    pub recycled_at: Option<DateTime<Utc>>,
}

impl Battery {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|expiry| now > expiry)
    }

    /// Expiry status frozen at the moment of recycling (display only)
    pub fn was_expired_when_recycled(&self) -> Option<bool> {
        self.recycled_at.map(|at| self.is_expired_at(at))
    }

    /// Returns false if the battery was already recycled
    pub(crate) fn mark_recycled(&mut self, now: DateTime<Utc>) -> bool {
        if self.recycled {
            return false;
        }
        self.recycled = true;
        self.recycled_at = Some(now);
        true
    }
}

/// Which partition of the inventory to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatteryFilter {
    ActiveOnly,
    RecycledOnly,
    #[default]
    All,
}

impl BatteryFilter {
    pub fn matches(&self, battery: &Battery) -> bool {
        match self {
            BatteryFilter::ActiveOnly => !battery.recycled,
            BatteryFilter::RecycledOnly => battery.recycled,
            BatteryFilter::All => true,
        }
    }
}

/// Partition counts shown above the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InventorySummary {
    pub active: usize,
    pub expired: usize,
    pub recycled: usize,
}
