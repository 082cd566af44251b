pub mod classifier;
pub mod flags;
pub mod icons;
pub mod layer;
pub mod popup;
pub mod spider;
pub mod symbology;

pub use classifier::{Classifier, ClassifierConfig};
pub use flags::{FallbackGlyph, Flag, FlagConfig, FlagGrid};
pub use icons::{AssetError, AssetLoader, Bitmap, IconCatalog, LoadedImage, load_images};
pub use layer::*;
pub use popup::PopupContent;
pub use spider::{PinStyle, SpiderPin, spider_pins};
pub use symbology::{IconKey, IconVariant, SymbolStyle};
