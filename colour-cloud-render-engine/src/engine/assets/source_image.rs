use bevy::prelude::*;

/// Resized pixels of the most recently relayed image, plus the texture
/// handle the 2D panel displays. The selection mask compositor rewrites the
/// texture from `rgba` on every selection change; `rgba` itself always holds
/// the unmasked source.
#[derive(Resource, Default)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub handle: Handle<Image>,
}

impl SourceImage {
    pub fn is_loaded(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
