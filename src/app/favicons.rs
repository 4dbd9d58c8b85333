//! Favicon texture loading

use super::App;
use eframe::egui;
use tracing::debug;

impl App {
    /// Texture for the best icon currently known for `guid`.
    pub(crate) fn favicon_texture(
        &mut self,
        ctx: &egui::Context,
        guid: &str,
    ) -> Option<egui::TextureHandle> {
        let icon = self.controller.best_icon(guid)?;
        let key = format!("{}|{}", guid, icon.url);

        if let Some(cached) = self.favicon_textures.get(&key) {
            return cached.clone();
        }

        let texture = match image::load_from_memory(&icon.data) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let size = [rgba.width() as usize, rgba.height() as usize];
                let pixels = rgba.into_raw();
                Some(ctx.load_texture(
                    key.clone(),
                    egui::ColorImage::from_rgba_unmultiplied(size, &pixels),
                    egui::TextureOptions::LINEAR,
                ))
            }
            Err(e) => {
                debug!(url = %icon.url, error = %e, "Icon did not decode");
                None
            }
        };
        self.favicon_textures.insert(key, texture.clone());
        texture
    }
}
