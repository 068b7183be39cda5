mod common;

use common::{write_garbage, write_png};
use image_viewer::{ImageSource, ViewerError};

#[test]
fn test_prepare_keeps_small_images() {
    let file = write_png("small", 80, 60, [10, 20, 30, 255]);
    let prepared = ImageSource::new(file.path(), 1600).prepare().unwrap();

    assert_eq!(prepared.source_size, (80, 60));
    assert_eq!(prepared.target_size, (80, 60));
    assert!(!prepared.was_resampled());
}

#[test]
fn test_prepare_downsamples_landscape() {
    let file = write_png("landscape", 300, 200, [10, 20, 30, 255]);
    let prepared = ImageSource::new(file.path(), 160).prepare().unwrap();

    assert!(prepared.was_resampled());
    assert_eq!(prepared.target_size, (160, 107));
    assert_eq!(
        (prepared.image.width(), prepared.image.height()),
        (160, 107)
    );
}

#[test]
fn test_prepare_downsamples_portrait() {
    let file = write_png("portrait", 200, 300, [10, 20, 30, 255]);
    let prepared = ImageSource::new(file.path(), 150).prepare().unwrap();

    assert_eq!(prepared.target_size, (100, 150));
}

#[test]
fn test_resampling_keeps_solid_colour() {
    let file = write_png("solid", 250, 250, [40, 80, 120, 255]);
    let prepared = ImageSource::new(file.path(), 100).prepare().unwrap();

    let rgba = prepared.image.to_rgba8();
    let centre = rgba.get_pixel(50, 50).0;
    for (got, want) in centre.iter().zip([40u8, 80, 120, 255]) {
        assert!((*got as i16 - want as i16).abs() <= 1, "{centre:?}");
    }
}

#[test]
fn test_missing_file_fails_with_io_error() {
    let source = ImageSource::new("/nowhere/at/all.png", 1600);
    assert!(matches!(source.prepare(), Err(ViewerError::Io { .. })));
}

#[test]
fn test_corrupt_file_fails_to_decode() {
    let file = write_garbage("pipeline_corrupt");
    let err = ImageSource::new(file.path(), 1600).decode().unwrap_err();

    assert!(matches!(err, ViewerError::Decode { .. }));
    assert_eq!(err.step(), "Image decode");
}

#[test]
fn test_format_is_detected_from_content() {
    let file = write_png("content_sniff", 12, 8, [1, 2, 3, 255]).rename_to_extension("dat");

    let image = ImageSource::new(file.path(), 1600).decode().unwrap();
    assert_eq!((image.width(), image.height()), (12, 8));
}

#[test]
fn test_temp_images_are_removed_on_drop() {
    let file = write_png("cleanup", 2, 2, [0, 0, 0, 255]);
    let path = file.path().to_path_buf();
    assert!(path.exists());

    drop(file);
    assert!(!path.exists());

    let renamed = write_garbage("cleanup_renamed").rename_to_extension("bin");
    let path = renamed.path().to_path_buf();
    drop(renamed);
    assert!(!path.exists());
}
