//! Card image resolution

use perkpack_core::AssetHandle;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Short frame names usable in place of a path
pub const BUILTIN_FRAMES: [(&str, &str); 5] = [
    ("basic", "PerkCard_Frame_Basic.png"),
    ("advanced", "PerkCard_Frame_Advanced.png"),
    ("experimental", "PerkCard_Frame_Experimental.png"),
    ("item", "PerkCard_Frame_Item.png"),
    ("timed", "PerkCard_Frame_Timed.png"),
];

/// File name of a built-in frame, matched case-insensitively
pub fn builtin_frame(name: &str) -> Option<&'static str> {
    let name = name.trim();
    BUILTIN_FRAMES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, file)| *file)
}

/// Turns an image path into a displayable handle
pub trait ImageLoader {
    fn load(&self, path: &Path) -> Option<AssetHandle>;
}

/// Accepts any existing file; decoding is left to the host
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn load(&self, path: &Path) -> Option<AssetHandle> {
        path.is_file().then(|| AssetHandle::new(path))
    }
}

/// Resolves asset references for one content package
#[derive(Debug)]
pub struct AssetLocator<'a, L: ImageLoader + ?Sized> {
    images: &'a L,
    frames_dir: PathBuf,
    assets_dir: PathBuf,
}

impl<'a, L: ImageLoader + ?Sized> AssetLocator<'a, L> {
    pub fn new(images: &'a L, frames_dir: impl Into<PathBuf>, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            images,
            frames_dir: frames_dir.into(),
            assets_dir: assets_dir.into(),
        }
    }

    /// Built-in frame names first, then paths inside the package asset folder
    pub fn resolve(&self, reference: &str) -> Option<AssetHandle> {
        if let Some(file) = builtin_frame(reference) {
            return self.images.load(&self.frames_dir.join(file));
        }
        self.images.load(&self.assets_dir.join(reference.trim()))
    }

    pub fn resolve_icon(&self, perk: &str, reference: &str) -> Option<AssetHandle> {
        self.resolve(reference).or_else(|| {
            debug!(perk, reference, "icon not found");
            None
        })
    }

    pub fn resolve_card(&self, perk: &str, reference: &str) -> Option<AssetHandle> {
        self.resolve(reference).or_else(|| {
            debug!(perk, reference, "card image not found");
            None
        })
    }

    /// An unresolved frame is reported but never fails the perk
    pub fn resolve_frame(&self, perk: &str, reference: &str) -> Option<AssetHandle> {
        self.resolve(reference).or_else(|| {
            warn!(
                perk,
                reference, "frame is neither a built-in frame nor a file in the asset folder"
            );
            None
        })
    }
}
