use thiserror::Error;

/// Broad category of a [`CpxError`], used by callers to decide whether a
/// variant is skipped or the failure is treated as a defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller or input data defect.
    Precondition,
    /// Expected rejection of an individual variant.
    DataQuality,
    /// Defect in the window sizing arithmetic.
    Postcondition,
    /// Failure of the reference sequence provider.
    Provider,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CpxError {
    #[error("variant span {span} must be non-negative and shorter than the window size {window}")]
    SpanTooLong { span: i64, window: usize },
    #[error("unsupported CPX_TYPE '{value}'")]
    UnsupportedCpxType { value: String },
    #[error("malformed CPX_INTERVALS token '{token}': {msg}")]
    MalformedIntervals { token: String, msg: String },
    #[error("CPX_INTERVALS has no occurrence {occurrence} of {label}_{chrom}")]
    MissingInterval {
        label: String,
        chrom: String,
        occurrence: usize,
    },
    #[error("chromosome {chrom} has no length or centromere entry")]
    UnknownChromosome { chrom: String },
    #[error("invalid variant record: {msg}")]
    InvalidRecord { msg: String },
    #[error("N composition {fraction:.4} of the REF window exceeds {max:.4}")]
    AmbiguousBases { fraction: f64, max: f64 },
    #[error("variant core of length {core_len} does not fit in window size {window}")]
    CoreTooLong { core_len: usize, window: usize },
    #[error("{what} [{start}, {end}) falls outside {chrom} (length {chrom_len})")]
    OutOfBounds {
        what: &'static str,
        chrom: String,
        start: i64,
        end: i64,
        chrom_len: i64,
    },
    #[error("{what} has length {actual}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("sequence fetch failed: {0}")]
    Provider(String),
}

impl CpxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CpxError::SpanTooLong { .. }
            | CpxError::UnsupportedCpxType { .. }
            | CpxError::MalformedIntervals { .. }
            | CpxError::MissingInterval { .. }
            | CpxError::UnknownChromosome { .. }
            | CpxError::InvalidRecord { .. } => ErrorKind::Precondition,
            CpxError::AmbiguousBases { .. } => ErrorKind::DataQuality,
            CpxError::CoreTooLong { .. }
            | CpxError::OutOfBounds { .. }
            | CpxError::LengthMismatch { .. } => ErrorKind::Postcondition,
            CpxError::Provider(_) => ErrorKind::Provider,
        }
    }
}

pub(crate) fn malformed(token: &str, msg: &str) -> CpxError {
    CpxError::MalformedIntervals {
        token: token.to_owned(),
        msg: msg.to_owned(),
    }
}
