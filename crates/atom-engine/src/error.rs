use thiserror::Error;

use crate::api::types::{BodyId, ElectronId};

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the session and catalog.
///
/// The simulator and validator themselves never fail; everything here comes
/// from input crossing the session boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// A coordinate handed in by the UI layer was NaN or infinite.
    #[error("non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f32, y: f32 },

    /// No live body carries this id.
    #[error("unknown body {0:?}")]
    UnknownBody(BodyId),

    /// No live electron carries this id.
    #[error("unknown electron {0:?}")]
    UnknownElectron(ElectronId),

    /// Catalog data parsed but is unusable (empty, or mass below atomic number).
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::NonFiniteCoordinate { x: f32::NAN, y: 3.0 };
        let msg = format!("{e}");
        assert!(msg.contains("non-finite"));
        assert!(msg.contains("NaN"));

        let e = Error::UnknownBody(BodyId(7));
        assert!(format!("{e}").contains('7'));
    }

    #[test]
    fn json_errors_convert() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let e: Error = parse.unwrap_err().into();
        assert!(matches!(e, Error::Json(_)));
    }
}
