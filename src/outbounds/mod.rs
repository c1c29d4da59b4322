/// +----------------------------------------------------------+
/// | MODULES                                                  |
/// +----------+-------+-------+------------------------------+
/// | Exports:                                                 |
/// |   - render                                               |
/// |   - reports                                              |
/// +----------------------------------------------------------+

/// Plain-text renderings for the terminal.
pub mod render;

/// Serializable reports for `--json` output.
pub mod reports;

pub use self::reports::{BookReport, LevelReport, LoadReport, to_json};
