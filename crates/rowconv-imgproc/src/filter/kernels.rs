/// Horizontal-gradient Sobel kernel, indexed as `[row][col]`.
///
/// Responds positively to intensity increasing from left to right.
pub const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

/// Apply a 3x3 kernel to a neighborhood and clamp the response to the u8 range.
///
/// # Arguments
///
/// * `kernel` - The 3x3 kernel.
/// * `neighborhood` - The three rows (above, center, below) of three samples each.
///
/// # Returns
///
/// The weighted sum clamped to `[0, 255]`.
#[inline]
pub fn apply_kernel3(kernel: &[[i32; 3]; 3], neighborhood: [&[u8]; 3]) -> u8 {
    let mut sum = 0i32;
    for (k_row, px_row) in kernel.iter().zip(neighborhood) {
        for (k, &px) in k_row.iter().zip(px_row) {
            sum += k * px as i32;
        }
    }
    sum.clamp(0, 255) as u8
}
