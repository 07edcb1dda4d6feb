// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length units accepted in plan input. Internally everything is millimeters.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MM_PER_FOOT: f64 = 304.8;
const MM_PER_INCH: f64 = 25.4;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Mm,
    Cm,
    M,
    Ft,
    In,
}

impl LengthUnit {
    /// Millimeters in one of this unit
    pub fn mm_factor(self) -> f64 {
        match self {
            LengthUnit::Mm => 1.0,
            LengthUnit::Cm => 10.0,
            LengthUnit::M => 1000.0,
            LengthUnit::Ft => MM_PER_FOOT,
            LengthUnit::In => MM_PER_INCH,
        }
    }

    pub fn to_mm(self, value: f64) -> f64 {
        value * self.mm_factor()
    }

    pub fn from_mm(self, value_mm: f64) -> f64 {
        value_mm / self.mm_factor()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::M => "m",
            LengthUnit::Ft => "ft",
            LengthUnit::In => "in",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LengthUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" => Ok(LengthUnit::Mm),
            "cm" => Ok(LengthUnit::Cm),
            "m" => Ok(LengthUnit::M),
            "ft" => Ok(LengthUnit::Ft),
            "in" => Ok(LengthUnit::In),
            _ => Err(Error::UnknownUnit(s.to_string())),
        }
    }
}

pub fn area_mm2_to_m2(area_mm2: f64) -> f64 {
    area_mm2 / 1_000_000.0
}

pub fn area_mm2_to_ft2(area_mm2: f64) -> f64 {
    area_mm2 / (MM_PER_FOOT * MM_PER_FOOT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_conversion_factors() {
        assert_relative_eq!(LengthUnit::M.to_mm(2.7), 2700.0);
        assert_relative_eq!(LengthUnit::Ft.to_mm(10.0), 3048.0);
        assert_relative_eq!(LengthUnit::In.from_mm(254.0), 10.0);
        assert_relative_eq!(LengthUnit::Cm.from_mm(LengthUnit::Cm.to_mm(42.0)), 42.0);
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!("M".parse::<LengthUnit>().unwrap(), LengthUnit::M);
        assert_eq!(" ft ".parse::<LengthUnit>().unwrap(), LengthUnit::Ft);
        assert_eq!(
            "yd".parse::<LengthUnit>(),
            Err(Error::UnknownUnit("yd".to_string()))
        );
    }

    #[test]
    fn test_area_helpers() {
        assert_relative_eq!(area_mm2_to_m2(12_000_000.0), 12.0);
        assert_relative_eq!(area_mm2_to_ft2(MM_PER_FOOT * MM_PER_FOOT * 3.0), 3.0);
    }
}
