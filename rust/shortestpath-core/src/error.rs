#[derive(Debug, thiserror::Error)]
pub enum PathfinderError {
    #[error("a search needs at least one target tile")]
    NoTargets,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("unknown transport kind '{0}'")]
    InvalidTransportKind(String),
    #[error("unknown comparison '{comparison}' in requirement on '{key}'")]
    InvalidComparison { key: String, comparison: String },
    #[error("tile ({x}, {y}, {plane}) is outside the addressable range")]
    InvalidTile { x: i32, y: i32, plane: i32 },
    #[error("transport {id} has only some of its origin columns set")]
    PartialOrigin { id: i64 },
    #[error("transport {id} of kind '{kind}' has no origin")]
    MissingOrigin { id: i64, kind: &'static str },
    #[error("{column} {value} of transport {id} is out of range")]
    OutOfRange { id: i64, column: &'static str, value: i64 },
}
