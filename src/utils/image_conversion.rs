//! Conversion of OpenCV frames into model input tensors.

use crate::{utils::safe_cast::usize_to_i32, Error, Result};
use ndarray::Array4;
use opencv::core::{Mat, Size, Vec3f, CV_32FC3, CV_8UC3};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;

/// Memory layout expected by a model input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// Batch, height, width, channels
    Nhwc,
    /// Batch, channels, height, width
    Nchw,
}

/// Resize a BGR frame, convert it to RGB and scale every channel value `v`
/// to `v * scale + offset`, producing a single-image batch tensor.
///
/// # Errors
///
/// Returns an error if the frame is empty, not 8-bit 3-channel, or an OpenCV
/// operation fails.
#[allow(clippy::cast_sign_loss)] // Sizes are validated positive
pub fn bgr_mat_to_tensor(
    image: &Mat,
    size: Size,
    scale: f64,
    offset: f64,
    layout: TensorLayout,
) -> Result<Array4<f32>> {
    if image.empty() || image.typ() != CV_8UC3 {
        return Err(Error::InvalidInput(format!(
            "Expected non-empty 8-bit BGR image, got {}x{} of type {}",
            image.cols(),
            image.rows(),
            image.typ()
        )));
    }
    if size.width <= 0 || size.height <= 0 {
        return Err(Error::InvalidInput(format!(
            "Invalid tensor size {}x{}",
            size.width, size.height
        )));
    }

    let mut resized = Mat::default();
    imgproc::resize(
        image,
        &mut resized,
        size,
        0.0,
        0.0,
        InterpolationFlags::INTER_LINEAR as i32,
    )?;

    let mut rgb = Mat::default();
    imgproc::cvt_color(&resized, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

    let mut float_image = Mat::default();
    rgb.convert_to(&mut float_image, CV_32FC3, scale, offset)?;

    let pixels = float_image.data_typed::<Vec3f>()?;
    let data: Vec<f32> = pixels.iter().flat_map(|p| [p[0], p[1], p[2]]).collect();

    let (height, width) = (size.height as usize, size.width as usize);
    let array = Array4::from_shape_vec((1, height, width, 3), data)
        .map_err(|e| Error::ModelInputError(format!("Failed to create input tensor: {e}")))?;

    Ok(match layout {
        TensorLayout::Nhwc => array,
        TensorLayout::Nchw => array.permuted_axes([0, 3, 1, 2]).as_standard_layout().to_owned(),
    })
}

/// Pixel size of a square tensor side as an OpenCV `Size`
///
/// # Errors
///
/// Returns an error if `side` does not fit in i32.
pub fn square_size(side: usize) -> Result<Size> {
    let side = usize_to_i32(side)?;
    Ok(Size::new(side, side))
}
