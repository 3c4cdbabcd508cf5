//! Plain-text PPM (`P3`) output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write 8-bit RGB pixels as a `P3` image.
///
/// `pixels` must be row-major starting from the top scanline.
pub fn write_ppm<W: Write>(
    writer: &mut W,
    width: u32,
    height: u32,
    pixels: &[[u8; 3]],
) -> io::Result<()> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("expected {} pixels for {}x{}, got {}", expected, width, height, pixels.len()),
        ));
    }

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", width, height)?;
    writeln!(writer, "255")?;

    for [r, g, b] in pixels {
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    Ok(())
}

/// Write a `P3` image to a file.
pub fn save_ppm(path: impl AsRef<Path>, width: u32, height: u32, pixels: &[[u8; 3]]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_ppm(&mut writer, width, height, pixels)?;
    writer.flush()
}
