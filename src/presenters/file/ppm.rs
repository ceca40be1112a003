use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::controllers::ports::file_presenter::FilePresenterPort;
use crate::core::data::colour::Colour;
use crate::core::data::pixel_buffer::PixelBuffer;

/// Writes binary PPM (P6) images. Unwritten pixels come out white, like a
/// cleared canvas.
#[derive(Debug, Clone, Copy)]
pub struct PpmFilePresenter {
    background: Colour,
}

impl Default for PpmFilePresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl PpmFilePresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_background(Colour::WHITE)
    }

    #[must_use]
    pub fn with_background(background: Colour) -> Self {
        Self { background }
    }

    pub fn encode(&self, buffer: &PixelBuffer, out: &mut impl Write) -> std::io::Result<()> {
        // P6 header: magic, dimensions, max colour value
        writeln!(out, "P6")?;
        writeln!(out, "{} {}", buffer.width(), buffer.height())?;
        writeln!(out, "255")?;
        out.write_all(&buffer.to_rgb_bytes(self.background))
    }
}

impl FilePresenterPort for PpmFilePresenter {
    fn present(&self, buffer: &PixelBuffer, filepath: &Path) -> std::io::Result<()> {
        if let Some(parent) = filepath.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = BufWriter::new(fs::File::create(filepath)?);
        self.encode(buffer, &mut file)?;
        file.flush()
    }
}
