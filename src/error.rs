// seating-chart: error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed layout: {0}")]
    MalformedLayout(String),
    #[error("Group '{group}' is reserved ('e' = empty desk, 'x' = no desk); don't use it in the roster")]
    ReservedGroupUsed { group: String },
    #[error(
        "Groups in roster and layout don't match (missing from layout: [{}], missing from roster: [{}])",
        .missing_from_layout.join(", "),
        .missing_from_roster.join(", ")
    )]
    GroupSetMismatch {
        /// Roster groups, plus `e`/`x`, with no cell in the layout
        missing_from_layout: Vec<String>,
        /// Layout symbols no roster record uses
        missing_from_roster: Vec<String>,
    },
    #[error("Count for group '{group}' doesn't match: {roster} in roster, {layout} in layout")]
    GroupCountMismatch {
        group: String,
        roster: usize,
        layout: usize,
    },
    #[error("Teacher desk ({teacher_desk}px) is wider than the student desks ({canvas}px)")]
    LayoutTooNarrow { canvas: u32, teacher_desk: u32 },
    #[error("Font doesn't exist: {0}")]
    MissingFont(String),
    #[error("Failed to load font: {0}")]
    FontError(String),
    #[error("Invalid config: {0}")]
    ConfigError(String),
    #[error("Failed to read roster file: {0}")]
    RosterError(String),
    #[error("Failed to read layout file: {0}")]
    LayoutError(String),
    #[error("Assignment invariant violated: {0}")]
    AssignmentInvariant(String),
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
