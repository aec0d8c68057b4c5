//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer};
use crate::text_layout::{ParleyMeasure, baseline};
use kurbo::{Affine, Point, Rect, Shape as KurboShape, Stroke, Vec2};
use parley::layout::PositionedLayoutItem;
use pasteboard_core::canvas::CanvasDocument;
use pasteboard_core::shapes::{DropShadow, Image, Shape, ShapeId, ShapeTrait, Text};
use peniko::{Brush, Color, Fill};
use std::collections::HashMap;
use std::sync::Arc;
use vello::Scene;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Transformer and rubber band color.
    selection_color: Color,
    text: ParleyMeasure,
    /// GPU image handles keyed by node, so each bitmap uploads once.
    image_cache: HashMap<ShapeId, peniko::ImageData>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap an image node's decoded pixels without copying them.
fn image_data(image: &Image) -> peniko::ImageData {
    peniko::ImageData {
        data: peniko::Blob::new(Arc::new(image.pixels().clone())),
        format: peniko::ImageFormat::Rgba8,
        width: image.source_width,
        height: image.source_height,
        alpha_type: peniko::ImageAlphaType::Alpha,
    }
}

/// Glyph copy offsets approximating a blur of the given size: the origin
/// plus two rings of eight at half and full radius.
fn blur_taps(blur: f64) -> Vec<Vec2> {
    let radius = blur / 2.0;
    let mut taps = vec![Vec2::ZERO];
    if radius < 0.5 {
        return taps;
    }
    for (ring, twist) in [(0.5, 0.0), (1.0, std::f64::consts::FRAC_PI_8)] {
        for step in 0..8 {
            let angle = step as f64 * std::f64::consts::FRAC_PI_4 + twist;
            taps.push(Vec2::from_angle(angle) * radius * ring);
        }
    }
    taps
}

/// Alpha per copy so that `taps` stacked copies reach `alpha` where all overlap.
fn tap_alpha(alpha: f32, taps: usize) -> f32 {
    if taps <= 1 {
        return alpha;
    }
    1.0 - (1.0 - alpha.clamp(0.0, 1.0)).powf(1.0 / taps as f32)
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            text: ParleyMeasure::new(),
            image_cache: HashMap::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Drop cached bitmaps of deleted nodes.
    pub fn prune_cache(&mut self, document: &CanvasDocument) {
        self.image_cache.retain(|id, _| document.contains(*id));
    }

    fn cached_image(&mut self, image: &Image) -> peniko::ImageData {
        self.image_cache
            .entry(image.id())
            .or_insert_with(|| image_data(image))
            .clone()
    }

    fn render_shape(&mut self, shape: &Shape, transform: Affine) {
        if let Some(shadow) = &shape.attrs().shadow {
            self.render_shadow(shape, shadow, transform);
        }
        match shape {
            Shape::Image(image) => self.render_image(image, transform),
            Shape::Text(text) => {
                let brush = Brush::Solid(text.fill.into());
                self.render_text(text, transform, &brush, &[Vec2::ZERO]);
            }
        }
    }

    /// Blurred box under images; a spread of faint glyph copies under text.
    fn render_shadow(&mut self, shape: &Shape, shadow: &DropShadow, transform: Affine) {
        let color = shadow.effective_color();
        let offset = Affine::translate(shadow.offset);
        match shape {
            Shape::Image(image) => {
                self.scene.draw_blurred_rounded_rect(
                    transform * offset,
                    image.bounds(),
                    color,
                    0.0,
                    shadow.blur / 2.0,
                );
            }
            Shape::Text(text) => {
                let taps = blur_taps(shadow.blur);
                let alpha = tap_alpha(color.components[3], taps.len());
                let brush = Brush::Solid(color.with_alpha(alpha));
                self.render_text(text, transform * offset, &brush, &taps);
            }
        }
    }

    fn render_image(&mut self, image: &Image, transform: Affine) {
        let image_data = self.cached_image(image);
        let bounds = image.bounds();
        let scale_x = bounds.width() / image_data.width as f64;
        let scale_y = bounds.height() / image_data.height as f64;
        let image_transform = transform
            * Affine::translate((bounds.x0, bounds.y0))
            * Affine::scale_non_uniform(scale_x, scale_y);

        self.scene.draw_image(&peniko::ImageBrush::from(image_data), image_transform);
    }

    /// Draw a text node's glyphs, one line every `line_px`, once per offset.
    fn render_text(&mut self, text: &Text, transform: Affine, brush: &Brush, offsets: &[Vec2]) {
        if text.content.is_empty() {
            return;
        }
        let layout = self.text.layout(text, &text.content, brush.clone());
        let scale = text.attrs.scale;
        let copies: Vec<Affine> = offsets
            .iter()
            .map(|offset| {
                transform
                    * Affine::translate(text.attrs.position.to_vec2() + *offset)
                    * Affine::scale_non_uniform(scale.x, scale.y)
            })
            .collect();

        for (index, line) in layout.lines().enumerate() {
            let y = baseline(text, index) as f32;
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let run = glyph_run.run();
                let glyph_xform = run
                    .synthesis()
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: y - glyph.y,
                        }
                    })
                    .collect();

                if glyphs.is_empty() {
                    continue;
                }
                for copy in &copies {
                    self.scene
                        .draw_glyphs(run.font())
                        .brush(brush)
                        .hint(true)
                        .transform(*copy)
                        .glyph_transform(glyph_xform)
                        .font_size(run.font_size())
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.iter().copied());
                }
            }
        }
    }

    /// Transformer border and anchor squares, in screen space.
    fn render_transformer(&mut self, ctx: &RenderContext, transform: Affine) {
        let canvas = ctx.canvas;
        let transformer = &canvas.transformer;
        if !transformer.is_active() || !transformer.is_visible() {
            return;
        }
        let Some(bounds) = transformer.screen_bounds(&canvas.document, &canvas.camera) else {
            return;
        };

        self.scene
            .stroke(&Stroke::new(1.0), transform, self.selection_color, None, &bounds.to_path(0.1));
        for handle in transformer.handles(&canvas.document, &canvas.camera) {
            let rect = Rect::from_center_size(handle.position, (ctx.handle_size, ctx.handle_size));
            self.scene.fill(Fill::NonZero, transform, Color::WHITE, None, &rect);
            self.scene
                .stroke(&Stroke::new(1.0), transform, self.selection_color, None, &rect);
        }
    }

    /// Rubber band: translucent fill with a dashed border of constant screen width.
    fn render_selection_rect(&mut self, rect: Rect, transform: Affine, zoom: f64) {
        let fill_color = Color::from_rgba8(59, 130, 246, 25);
        let path = rect.to_path(0.1);
        self.scene.fill(Fill::NonZero, transform, fill_color, None, &path);

        let stroke_width = 1.0 / zoom;
        let dash_len = 4.0 / zoom;
        let stroke = Stroke::new(stroke_width).with_dashes(0.0, &[dash_len, dash_len]);
        self.scene.stroke(&stroke, transform, self.selection_color, None, &path);
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        self.selection_color = ctx.selection_color;

        let root = Affine::scale(ctx.scale_factor);
        let camera_transform = root * ctx.canvas.camera.transform();

        let viewport = Rect::from_origin_size(Point::ZERO, ctx.viewport_size);
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, ctx.background_color, None, &viewport);

        for shape in ctx.canvas.document.shapes_ordered() {
            if !shape.attrs().visible || ctx.editing_shape_id == Some(shape.id()) {
                continue;
            }
            self.render_shape(shape, camera_transform);
        }

        self.render_transformer(ctx, root);

        if let Some(rect) = ctx.selection_rect {
            self.render_selection_rect(rect, camera_transform, ctx.canvas.camera.zoom);
        }
    }
}
