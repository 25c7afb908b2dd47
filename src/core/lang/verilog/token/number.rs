//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use std::fmt::Display;

#[derive(Debug, PartialEq, Clone)]
pub enum Number {
    /// `42`, `1_000`
    Decimal(String),
    /// `8'hFF`, `'b1010`, `4'sd3`
    Based(String),
    /// `'0`, `'1`, `'x`, `'z`
    Unbased(String),
    /// `1.5`, `2e-3`
    Real(String),
}

impl Number {
    /// Computes the integer value of the number when it is fully known.
    ///
    /// Returns `None` for real numbers and for based numbers containing unknown
    /// (`x`) or high-impedance (`z`) digits.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Decimal(s) => s.replace('_', "").parse::<i64>().ok(),
            Self::Based(s) => {
                let (_, rest) = s.split_once('\'')?;
                let rest = rest.trim_start_matches(['s', 'S']);
                let mut chars = rest.chars();
                let radix = match chars.next()? {
                    'd' | 'D' => 10,
                    'h' | 'H' => 16,
                    'o' | 'O' => 8,
                    'b' | 'B' => 2,
                    _ => return None,
                };
                let digits: String = chars.filter(|c| c != &'_').collect();
                i64::from_str_radix(&digits, radix).ok()
            }
            Self::Unbased(_) | Self::Real(_) => None,
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decimal(s) | Self::Based(s) | Self::Unbased(s) | Self::Real(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn integer_values() {
        assert_eq!(Number::Decimal("1_024".to_string()).as_integer(), Some(1024));
        assert_eq!(Number::Based("8'hFF".to_string()).as_integer(), Some(255));
        assert_eq!(Number::Based("4'sb1010".to_string()).as_integer(), Some(10));
        assert_eq!(Number::Based("'o17".to_string()).as_integer(), Some(15));
        assert_eq!(Number::Based("4'bx01z".to_string()).as_integer(), None);
        assert_eq!(Number::Real("1.5".to_string()).as_integer(), None);
    }
}
