use std::fmt;
use std::str::FromStr;

use crate::errors::CpxError;

/// Complex SV subtypes handled by the sequence builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpxType {
    DelInvDel,
    InvDup,
    DelInvDup,
    DupInvDup,
    DupInv,
    DupInvDel,
}

/// Which `DUP` occurrences flank the inversion in the ALT core. Indices are
/// 0-based occurrences of the `DUP` label for the variant's `CHR2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DupLayout {
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl CpxType {
    pub const ALL: [CpxType; 6] = [
        CpxType::DelInvDel,
        CpxType::InvDup,
        CpxType::DelInvDup,
        CpxType::DupInvDup,
        CpxType::DupInv,
        CpxType::DupInvDel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CpxType::DelInvDel => "delINVdel",
            CpxType::InvDup => "INVdup",
            CpxType::DelInvDup => "delINVdup",
            CpxType::DupInvDup => "dupINVdup",
            CpxType::DupInv => "dupINV",
            CpxType::DupInvDel => "dupINVdel",
        }
    }

    pub fn dup_layout(&self) -> DupLayout {
        match self {
            CpxType::DelInvDel => DupLayout { left: None, right: None },
            CpxType::InvDup | CpxType::DelInvDup => DupLayout {
                left: None,
                right: Some(0),
            },
            // first DUP is the left copy, second the right one
            CpxType::DupInvDup => DupLayout {
                left: Some(0),
                right: Some(1),
            },
            CpxType::DupInv | CpxType::DupInvDel => DupLayout {
                left: Some(0),
                right: None,
            },
        }
    }
}

impl FromStr for CpxType {
    type Err = CpxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CpxType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CpxError::UnsupportedCpxType {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for CpxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One complex SV: `[pos, end)` on `chrom`, with its sub-event intervals
/// encoded in `intervals` and looked up under `chrom2`.
#[derive(Debug, Clone, PartialEq)]
pub struct CpxVariant {
    pub chrom: String,
    pub pos: i64,
    pub end: i64,
    pub chrom2: String,
    pub cpx_type: CpxType,
    pub intervals: String,
}

impl CpxVariant {
    /// Parse a tab-separated `CHR POS END CHR2 CPX_TYPE CPX_INTERVALS` line.
    /// Extra trailing columns are ignored.
    pub fn from_tsv_line(line: &str) -> Result<Self, CpxError> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 6 {
            return Err(CpxError::InvalidRecord {
                msg: format!("expected 6 tab-separated columns, found {}", fields.len()),
            });
        }
        let coordinate = |name: &str, value: &str| -> Result<i64, CpxError> {
            value.trim().parse().map_err(|_| CpxError::InvalidRecord {
                msg: format!("{name} '{value}' is not an integer"),
            })
        };

        Ok(CpxVariant {
            chrom: fields[0].trim().to_string(),
            pos: coordinate("POS", fields[1])?,
            end: coordinate("END", fields[2])?,
            chrom2: fields[3].trim().to_string(),
            cpx_type: fields[4].trim().parse()?,
            intervals: fields[5].trim().to_string(),
        })
    }

    /// Short identifier used in logs and FASTA headers.
    pub fn id(&self) -> String {
        format!("{}:{}-{}:{}", self.chrom, self.pos, self.end, self.cpx_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("delINVdel", None, None)]
    #[case("INVdup", None, Some(0))]
    #[case("delINVdup", None, Some(0))]
    #[case("dupINVdup", Some(0), Some(1))]
    #[case("dupINV", Some(0), None)]
    #[case("dupINVdel", Some(0), None)]
    fn dup_layout_per_subtype(
        #[case] name: &str,
        #[case] left: Option<usize>,
        #[case] right: Option<usize>,
    ) {
        let cpx_type: CpxType = name.parse().unwrap();
        assert_eq!(cpx_type.as_str(), name);
        assert_eq!(cpx_type.dup_layout(), DupLayout { left, right });
    }

    #[test]
    fn unsupported_subtypes() {
        for name in ["INVdel", "dupinvdup", "", "CTX_PQ/QP"] {
            assert_eq!(
                name.parse::<CpxType>().unwrap_err(),
                CpxError::UnsupportedCpxType { value: name.to_string() }
            );
        }
    }

    #[test]
    fn parse_tsv_line() {
        let line = "chr1\t1000000\t1000500\tchr1\tdelINVdel\tINV_1:1000100-1000400,\tPASS";
        let variant = CpxVariant::from_tsv_line(line).unwrap();
        assert_eq!(variant.chrom, "chr1");
        assert_eq!(variant.pos, 1_000_000);
        assert_eq!(variant.end, 1_000_500);
        assert_eq!(variant.chrom2, "chr1");
        assert_eq!(variant.cpx_type, CpxType::DelInvDel);
        assert_eq!(variant.intervals, "INV_1:1000100-1000400,");
        assert_eq!(variant.id(), "chr1:1000000-1000500:delINVdel");
    }

    #[test]
    fn parse_tsv_line_errors() {
        assert!(matches!(
            CpxVariant::from_tsv_line("chr1\t10\t20"),
            Err(CpxError::InvalidRecord { .. })
        ));
        assert!(matches!(
            CpxVariant::from_tsv_line("chr1\tten\t20\tchr1\tdupINV\tINV_1:10-20"),
            Err(CpxError::InvalidRecord { .. })
        ));
        assert!(matches!(
            CpxVariant::from_tsv_line("chr1\t10\t20\tchr1\tINS\tINV_1:10-20"),
            Err(CpxError::UnsupportedCpxType { .. })
        ));
    }
}
