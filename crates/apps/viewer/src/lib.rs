//! Headless defence-diplomacy map viewer.
//!
//! The [`Session`] turns [`Message`]s into [`Command`]s for whatever map and
//! UI surface drives it.

pub mod assets;
pub mod config;
pub mod message;
pub mod session;
pub mod sidebar;
pub mod source;
pub mod surface;

pub use assets::{FileAssetLoader, HttpAssetLoader, NoAssets, loader_for};
pub use config::{CONFIG_ENV, ConfigError, DATA_ENV, MapConfig, ViewerConfig};
pub use message::Message;
pub use session::{LoadState, Session, startup_from_config, startup_messages};
pub use sidebar::{CheckItem, FilterPanelView, PanelState, SidebarEntry, SidebarView, YearSliderView};
pub use source::{DataSource, DataSourceError, FileSource, HttpSource, StaticSource, load_dataset, source_for};
pub use surface::{Command, Cursor, MapSurface, PopupId, RecordingSurface};
