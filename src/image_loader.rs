use crate::error::ScriptError;
use image::io::Reader as ImageReader;
use ndarray::Array2;
use std::path::Path;

/// Loads an image file as an 8-bit grayscale pixel matrix.
///
/// Any format the decoder recognizes is accepted; color images are
/// converted to luma. The matrix is laid out `(rows, cols)`, matching the
/// image's `(height, width)`.
pub fn load_gray_image(path: &Path) -> Result<Array2<u8>, ScriptError> {
    if !path.is_file() {
        return Err(ScriptError::InvalidInputPath(path.to_path_buf()));
    }

    let img = ImageReader::open(path)?
        .decode()
        .map_err(|source| ScriptError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
    let gray = img.into_luma8();

    let (width, height) = gray.dimensions();
    Ok(Array2::from_shape_fn(
        (height as usize, width as usize),
        |(r, c)| gray.get_pixel(c as u32, r as u32).0[0],
    ))
}
