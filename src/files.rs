//! Image file discovery, loading and saving

use crate::error::Error;
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::{Path, PathBuf};

/// Input extensions accepted for enhancement and OCR
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Suffix added to enhanced copies of an input file
pub const ENHANCED_SUFFIX: &str = "_enhanced";

/// Check the file extension against the supported list (case-insensitive)
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Resolve an input path to the list of images it names.
///
/// A file yields itself when its extension is supported. A directory
/// yields the supported files inside it, descending into subdirectories
/// when `recursive` is set. Results are sorted.
pub fn collect_image_paths(input: &Path, recursive: bool) -> Result<Vec<PathBuf>, Error> {
    if input.is_file() {
        if is_supported_image(input) {
            return Ok(vec![input.to_path_buf()]);
        }
        tracing::warn!("Skipping unsupported file: {}", input.display());
        return Ok(Vec::new());
    }

    if !input.is_dir() {
        return Err(Error::NotFound(input.to_path_buf()));
    }

    let mut paths = Vec::new();
    collect_from_dir(input, recursive, &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn collect_from_dir(dir: &Path, recursive: bool, paths: &mut Vec<PathBuf>) -> Result<(), Error> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect_from_dir(&path, recursive, paths)?;
            }
        } else if is_supported_image(&path) {
            paths.push(path);
        }
    }
    Ok(())
}

/// Where to write the processed version of `input`.
///
/// With no output, the file lands next to the input as
/// `<stem><suffix><ext>`. An existing directory receives that same file
/// name. Anything else is used as the output path verbatim.
pub fn output_path(input: &Path, output: Option<&Path>, suffix: &str) -> PathBuf {
    let file_name = suffixed_file_name(input, suffix);
    match output {
        None => input.with_file_name(file_name),
        Some(dir) if dir.is_dir() => dir.join(file_name),
        Some(path) => path.to_path_buf(),
    }
}

/// `<stem><suffix><ext>` for the given path
pub fn suffixed_file_name(path: &Path, suffix: &str) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    }
}

/// Replace the extension of `path` after appending `suffix` to its stem
pub fn sibling_path(path: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}{}.{}", stem, suffix, extension))
}

/// Load an image from disk as RGB
pub fn load_image(path: &Path) -> Result<DynamicImage, Error> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let image = image::open(path)?;
    tracing::debug!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );
    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

/// Save an image, creating parent directories as needed.
/// Alpha is dropped for JPEG targets, which cannot store it.
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let is_jpeg = matches!(ImageFormat::from_path(path), Ok(ImageFormat::Jpeg));
    if is_jpeg && image.color().has_alpha() {
        DynamicImage::ImageRgb8(image.to_rgb8()).save(path)?;
    } else {
        image.save(path)?;
    }

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_supported_extensions_ignore_case() {
        assert!(is_supported_image(Path::new("scan.PNG")));
        assert!(is_supported_image(Path::new("dir/photo.JpEg")));
        assert!(is_supported_image(Path::new("page.tif")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("README")));
    }

    #[test]
    fn test_collect_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        touch(&dir.path().join("b.png"));
        touch(&dir.path().join("a.JPG"));
        touch(&dir.path().join("skip.txt"));
        touch(&nested.join("c.webp"));

        let flat = collect_image_paths(dir.path(), false).unwrap();
        assert_eq!(flat, vec![dir.path().join("a.JPG"), dir.path().join("b.png")]);

        let deep = collect_image_paths(dir.path(), true).unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&nested.join("c.webp")));
    }

    #[test]
    fn test_collect_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("one.bmp");
        let text = dir.path().join("one.txt");
        touch(&image);
        touch(&text);

        assert_eq!(collect_image_paths(&image, false).unwrap(), vec![image]);
        assert!(collect_image_paths(&text, false).unwrap().is_empty());
    }

    #[test]
    fn test_collect_missing_path() {
        let err = collect_image_paths(Path::new("/no/such/dir"), true).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_output_path_rules() {
        let dir = tempfile::tempdir().unwrap();
        let input = Path::new("/scans/page.png");

        assert_eq!(
            output_path(input, None, ENHANCED_SUFFIX),
            PathBuf::from("/scans/page_enhanced.png")
        );
        assert_eq!(
            output_path(input, Some(dir.path()), ENHANCED_SUFFIX),
            dir.path().join("page_enhanced.png")
        );
        assert_eq!(
            output_path(input, Some(Path::new("/out/final.jpg")), ENHANCED_SUFFIX),
            PathBuf::from("/out/final.jpg")
        );
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_path(Path::new("/out/page_enhanced.jpg"), "_comparison", "png"),
            PathBuf::from("/out/page_enhanced_comparison.png")
        );
    }

    #[test]
    fn test_load_missing_image() {
        let err = load_image(Path::new("/missing.png")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_save_rgba_as_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("out.jpg");
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([10, 200, 30, 128])));

        save_image(&img, &path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (8, 8));
    }
}
