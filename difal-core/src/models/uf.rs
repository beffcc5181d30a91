use std::fmt;

use serde::{Deserialize, Serialize};

/// The five IBGE macro-regions, used by the inter-state rate rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    North,
    Northeast,
    CenterWest,
    Southeast,
    South,
}

/// A Brazilian federative unit (state or federal district).
///
/// Serialized as the two-letter code ("SP", "BA", ...), which is also the
/// key format used by the rate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Uf {
    Ac,
    Al,
    Ap,
    Am,
    Ba,
    Ce,
    Df,
    Es,
    Go,
    Ma,
    Mt,
    Ms,
    Mg,
    Pa,
    Pb,
    Pr,
    Pe,
    Pi,
    Rj,
    Rn,
    Rs,
    Ro,
    Rr,
    Sc,
    Sp,
    Se,
    To,
}

impl Uf {
    /// Every UF, in the conventional display order (alphabetical by
    /// state name, not by code).
    pub const ALL: [Uf; 27] = [
        Uf::Ac,
        Uf::Al,
        Uf::Ap,
        Uf::Am,
        Uf::Ba,
        Uf::Ce,
        Uf::Df,
        Uf::Es,
        Uf::Go,
        Uf::Ma,
        Uf::Mt,
        Uf::Ms,
        Uf::Mg,
        Uf::Pa,
        Uf::Pb,
        Uf::Pr,
        Uf::Pe,
        Uf::Pi,
        Uf::Rj,
        Uf::Rn,
        Uf::Rs,
        Uf::Ro,
        Uf::Rr,
        Uf::Sc,
        Uf::Sp,
        Uf::Se,
        Uf::To,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ac => "AC",
            Self::Al => "AL",
            Self::Ap => "AP",
            Self::Am => "AM",
            Self::Ba => "BA",
            Self::Ce => "CE",
            Self::Df => "DF",
            Self::Es => "ES",
            Self::Go => "GO",
            Self::Ma => "MA",
            Self::Mt => "MT",
            Self::Ms => "MS",
            Self::Mg => "MG",
            Self::Pa => "PA",
            Self::Pb => "PB",
            Self::Pr => "PR",
            Self::Pe => "PE",
            Self::Pi => "PI",
            Self::Rj => "RJ",
            Self::Rn => "RN",
            Self::Rs => "RS",
            Self::Ro => "RO",
            Self::Rr => "RR",
            Self::Sc => "SC",
            Self::Sp => "SP",
            Self::Se => "SE",
            Self::To => "TO",
        }
    }

    pub fn region(&self) -> Region {
        match self {
            Self::Ac | Self::Am | Self::Ap | Self::Pa | Self::Ro | Self::Rr | Self::To => {
                Region::North
            }
            Self::Al
            | Self::Ba
            | Self::Ce
            | Self::Ma
            | Self::Pb
            | Self::Pe
            | Self::Pi
            | Self::Rn
            | Self::Se => Region::Northeast,
            Self::Df | Self::Go | Self::Mt | Self::Ms => Region::CenterWest,
            Self::Es | Self::Mg | Self::Rj | Self::Sp => Region::Southeast,
            Self::Pr | Self::Rs | Self::Sc => Region::South,
        }
    }

    /// Parses a two-letter code, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        let code = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|uf| uf.as_str().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Uf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_codes_in_any_case() {
        assert_eq!(Uf::parse("SP"), Some(Uf::Sp));
        assert_eq!(Uf::parse("sp"), Some(Uf::Sp));
        assert_eq!(Uf::parse(" ba "), Some(Uf::Ba));
        assert_eq!(Uf::parse("XX"), None);
        assert_eq!(Uf::parse(""), None);
    }

    #[test]
    fn as_str_round_trips_every_uf() {
        for uf in Uf::ALL {
            assert_eq!(Uf::parse(uf.as_str()), Some(uf));
        }
    }

    #[test]
    fn all_lists_the_27_federative_units() {
        assert_eq!(Uf::ALL.len(), 27);
    }

    #[test]
    fn regions_match_the_ibge_division() {
        assert_eq!(Uf::Sp.region(), Region::Southeast);
        assert_eq!(Uf::Es.region(), Region::Southeast);
        assert_eq!(Uf::Am.region(), Region::North);
        assert_eq!(Uf::Ba.region(), Region::Northeast);
        assert_eq!(Uf::Df.region(), Region::CenterWest);
        assert_eq!(Uf::Rs.region(), Region::South);
    }

    #[test]
    fn serializes_as_the_two_letter_code() {
        assert_eq!(serde_json::to_string(&Uf::Sp).unwrap(), "\"SP\"");
        assert_eq!(serde_json::from_str::<Uf>("\"MG\"").unwrap(), Uf::Mg);
    }
}
