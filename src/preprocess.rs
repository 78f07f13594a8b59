//! OCR前の画像前処理
//!
//! - none: 前処理なし（元画像をそのままOCRに渡す）
//! - enhance: グレースケール化 → コントラスト強調 → シャープ化 → 2倍拡大
//!
//! 以下は enhance の後に行う:
//! - basic: ヒストグラム平坦化 → メディアンでノイズ除去 → 固定閾値150で二値化
//! - adaptive: ガウシアンぼかし → 適応的閾値処理
//! - otsu: ガウシアンぼかし → 大津の二値化
//!
//! 注意（OpenCVでよく使う手順とは異なる）:
//! - 二値化はすべて拡大後の画像に対して行う
//! - basic は CLAHE ではなく全体のヒストグラム平坦化、NL-means ではなくメディアンフィルタ
//! - adaptive はガウス重みではなく平均ベースの適応的閾値で、オフセット（C=2）はない

use crate::error::{NamaeError, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageFormat};
use imageproc::contrast::{adaptive_threshold, equalize_histogram, otsu_level, threshold, ThresholdType};
use imageproc::filter::{gaussian_blur_f32, median_filter};
use std::path::Path;
use tempfile::NamedTempFile;

const CONTRAST: f32 = 50.0;
const SHARPEN_SIGMA: f32 = 1.0;
const UPSCALE: u32 = 2;
const BASIC_THRESHOLD: u8 = 150;
const BLUR_SIGMA: f32 = 1.1;
/// 11x11 ブロック
const ADAPTIVE_BLOCK_RADIUS: u32 = 5;

/// 前処理方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreprocessMethod {
    /// 元画像をそのまま使う
    None,
    /// 画質向上のみ
    #[default]
    Enhance,
    Basic,
    Adaptive,
    Otsu,
}

impl std::str::FromStr for PreprocessMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(PreprocessMethod::None),
            "enhance" => Ok(PreprocessMethod::Enhance),
            "basic" => Ok(PreprocessMethod::Basic),
            "adaptive" => Ok(PreprocessMethod::Adaptive),
            "otsu" => Ok(PreprocessMethod::Otsu),
            _ => Err(format!(
                "Unknown preprocess method: {}. Use none, enhance, basic, adaptive, or otsu",
                s
            )),
        }
    }
}

impl std::fmt::Display for PreprocessMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreprocessMethod::None => write!(f, "none"),
            PreprocessMethod::Enhance => write!(f, "enhance"),
            PreprocessMethod::Basic => write!(f, "basic"),
            PreprocessMethod::Adaptive => write!(f, "adaptive"),
            PreprocessMethod::Otsu => write!(f, "otsu"),
        }
    }
}

/// 画質向上
pub fn enhance(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    let contrasted = imageops::contrast(&gray, CONTRAST);
    let sharpened = imageops::unsharpen(&contrasted, SHARPEN_SIGMA, 0);
    let (width, height) = sharpened.dimensions();
    imageops::resize(
        &sharpened,
        width * UPSCALE,
        height * UPSCALE,
        FilterType::Lanczos3,
    )
}

/// 方式別の二値化
pub fn binarize(gray: &GrayImage, method: PreprocessMethod) -> GrayImage {
    match method {
        PreprocessMethod::None | PreprocessMethod::Enhance => gray.clone(),
        PreprocessMethod::Basic => {
            let equalized = equalize_histogram(gray);
            let denoised = median_filter(&equalized, 1, 1);
            threshold(&denoised, BASIC_THRESHOLD, ThresholdType::Binary)
        }
        PreprocessMethod::Adaptive => {
            let blurred = gaussian_blur_f32(gray, BLUR_SIGMA);
            adaptive_threshold(&blurred, ADAPTIVE_BLOCK_RADIUS)
        }
        PreprocessMethod::Otsu => {
            let blurred = gaussian_blur_f32(gray, BLUR_SIGMA);
            let level = otsu_level(&blurred);
            threshold(&blurred, level, ThresholdType::Binary)
        }
    }
}

/// 画像を読み込んで前処理する
///
/// `None` でも画質向上は行う。元画像をそのまま使う判断は呼び出し側で行う。
pub fn prepare_image(path: &Path, method: PreprocessMethod) -> Result<GrayImage> {
    let image = image::open(path)
        .map_err(|e| NamaeError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    Ok(binarize(&enhance(&image), method))
}

/// 前処理済み画像を一時PNGに書き出す（ドロップ時に削除される）
pub fn write_temp_png(image: &GrayImage) -> Result<NamedTempFile> {
    let file = tempfile::Builder::new()
        .prefix("namae-ocr-")
        .suffix(".png")
        .tempfile()?;
    image
        .save_with_format(file.path(), ImageFormat::Png)
        .map_err(|e| NamaeError::ImageLoad(format!("一時画像の書き込みに失敗: {}", e)))?;
    Ok(file)
}
