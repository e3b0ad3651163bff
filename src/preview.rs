// Preview module for rendering the current image inside the terminal

use crate::domain::FileEntry;
use crate::tui::helpers::format_file_size;
use image::{DynamicImage, GenericImageView, Pixel};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Preview content for one file at one size
#[derive(Debug, Clone)]
pub enum PreviewContent {
    /// Half-block image lines
    Image {
        width: u32,
        height: u32,
        lines: Vec<Line<'static>>,
    },
    /// Plain description lines for files that are not shown as an image
    Info(Vec<String>),
}

/// Loads an image from a file path
pub fn load_image(path: &Path) -> io::Result<DynamicImage> {
    image::open(path).map_err(|e| io::Error::other(format!("Image loading error: {}", e)))
}

/// Calculates new dimensions to fit image within max width and height while preserving aspect ratio
pub fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if original_width == 0 || original_height == 0 {
        return (0, 0);
    }

    let width_ratio = max_width as f64 / original_width as f64;
    let height_ratio = max_height as f64 / original_height as f64;

    let ratio = width_ratio.min(height_ratio);

    if ratio >= 1.0 {
        (original_width, original_height)
    } else {
        let new_width = (original_width as f64 * ratio) as u32;
        let new_height = (original_height as f64 * ratio) as u32;
        (new_width.max(1), new_height.max(1))
    }
}

/// Converts an image to styled lines using the upper half block (▀): the
/// foreground is the upper pixel and the background the lower one, so each
/// cell shows two pixels.
pub fn image_to_halfblock_lines(img: &DynamicImage, width: u32, height: u32) -> Vec<Line<'static>> {
    let height = if height % 2 == 0 { height } else { height + 1 };

    // Triangle is fast enough for large photos
    let img = img.resize_exact(width, height, image::imageops::FilterType::Triangle);
    let img = img.to_rgb8();

    let term_height = height / 2;
    let mut lines = Vec::with_capacity(term_height as usize);

    for y in 0..term_height {
        let upper_y = y * 2;
        let lower_y = upper_y + 1;

        let spans: Vec<Span<'static>> = (0..width)
            .map(|x| {
                let upper = img.get_pixel(x, upper_y).to_rgb();
                let lower = if lower_y < height {
                    img.get_pixel(x, lower_y).to_rgb()
                } else {
                    upper
                };

                Span::styled(
                    "▀",
                    Style::default()
                        .fg(Color::Rgb(upper[0], upper[1], upper[2]))
                        .bg(Color::Rgb(lower[0], lower[1], lower[2])),
                )
            })
            .collect();

        lines.push(Line::from(spans));
    }

    lines
}

fn info_lines(file: &FileEntry, note: Option<String>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(note) = note {
        lines.push(note);
        lines.push(String::new());
    }
    lines.push(format!("Name:     {}", file.name));
    lines.push(format!("Path:     {}", file.current_path().display()));
    lines.push(format!("Size:     {}", format_file_size(file.size)));
    lines.push(format!(
        "Modified: {}",
        file.modified_date.format("%Y-%m-%d %H:%M")
    ));
    lines
}

/// Builds a preview fitting `cols` x `rows` terminal cells
pub fn generate_preview(file: &FileEntry, cols: u16, rows: u16, decode: bool) -> PreviewContent {
    if !decode || !file.is_image() {
        return PreviewContent::Info(info_lines(file, None));
    }

    let img = match load_image(file.current_path()) {
        Ok(img) => img,
        Err(e) => {
            debug!(path = %file.current_path().display(), error = %e, "preview decode failed");
            return PreviewContent::Info(info_lines(file, Some(format!("[!] {}", e))));
        }
    };

    let (original_width, original_height) = img.dimensions();
    let (width, height) = calculate_resize_dimensions(
        original_width,
        original_height,
        cols as u32,
        rows as u32 * 2,
    );

    if width == 0 || height == 0 {
        return PreviewContent::Info(info_lines(file, Some("[!] Empty image".to_string())));
    }

    PreviewContent::Image {
        width: original_width,
        height: original_height,
        lines: image_to_halfblock_lines(&img, width, height),
    }
}

/// Remembers the last preview so redraws do not decode again
#[derive(Debug, Default)]
pub struct PreviewCache {
    key: Option<(PathBuf, u16, u16)>,
    content: Option<PreviewContent>,
    decode: bool,
}

impl PreviewCache {
    pub fn new(decode: bool) -> Self {
        Self {
            key: None,
            content: None,
            decode,
        }
    }

    pub fn get(&mut self, file: &FileEntry, cols: u16, rows: u16) -> &PreviewContent {
        let key = (file.current_path().to_path_buf(), cols, rows);
        if self.key.as_ref() != Some(&key) || self.content.is_none() {
            self.content = Some(generate_preview(file, cols, rows, self.decode));
            self.key = Some(key);
        }
        self.content.get_or_insert_with(|| PreviewContent::Info(Vec::new()))
    }
}
