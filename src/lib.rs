//! Fixed-length REF/ALT sequence windows for complex structural variants
//! built from nested deletion, inversion and duplication sub-events.

pub mod assemble;
pub mod errors;
pub mod genome;
pub mod intervals;
pub mod io;
pub mod position;
pub mod sequence;
pub mod variant;

pub use assemble::{SequenceBuilder, SequencePair, WindowConfig};
pub use errors::{CpxError, ErrorKind};
pub use genome::{ChromInfo, ChromosomeTable};
pub use variant::{CpxType, CpxVariant};
