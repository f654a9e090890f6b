mod engine;
mod error;
mod types;

pub use engine::Editor;
pub use error::{SaveError, SaveErrorKind};
pub use types::{
    FileInfo, PlayerRecord, PlayerRoster, PlayerUpgrades, SkippedPlayer, WorldRecord,
};
