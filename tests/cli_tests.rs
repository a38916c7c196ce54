use image::{ImageFormat, Rgb, RgbImage};
use image_verify::PNG_SIGNATURE;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn imgverify(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_imgverify"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run imgverify")
}

fn verdict(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is a JSON verdict")
}

fn save_png(dir: &TempDir, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.path().join(name);
    img.save_with_format(&path, ImageFormat::Png).unwrap();
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// 10x8 image with a 2px black band on top.
fn banded() -> RgbImage {
    RgbImage::from_fn(10, 8, |_, y| if y < 2 { Rgb([0, 0, 0]) } else { Rgb([120, 120, 120]) })
}

#[test]
fn test_borders_expect_pass_and_fail() {
    let dir = TempDir::new().unwrap();
    let img = save_png(&dir, "banded.png", &banded());

    let ok = imgverify(&["borders", arg(&img), "--expect", "2", "0", "0", "0"]);
    assert_eq!(ok.status.code(), Some(0));
    let json = verdict(&ok);
    assert_eq!(json["check"], "borders");
    assert_eq!(json["pass"], true);
    assert_eq!(json["value"]["top"], 2);

    let bad = imgverify(&["borders", arg(&img), "--expect", "0", "2", "0", "0"]);
    assert_eq!(bad.status.code(), Some(1));
    assert_eq!(verdict(&bad)["pass"], false);
}

#[test]
fn test_grayscale_verdict() {
    let dir = TempDir::new().unwrap();
    let gray = save_png(&dir, "gray.png", &banded());
    let mut colour = banded();
    colour.put_pixel(5, 5, Rgb([255, 0, 0]));
    let colour = save_png(&dir, "colour.png", &colour);

    assert_eq!(imgverify(&["grayscale", arg(&gray)]).status.code(), Some(0));
    let out = imgverify(&["grayscale", arg(&colour)]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(verdict(&out)["value"], false);
}

#[test]
fn test_diff_threshold() {
    let dir = TempDir::new().unwrap();
    let a = save_png(&dir, "a.png", &banded());
    let mut changed = banded();
    changed.put_pixel(0, 7, Rgb([123, 120, 120]));
    let b = save_png(&dir, "b.png", &changed);

    let strict = imgverify(&["diff", arg(&a), arg(&b)]);
    assert_eq!(strict.status.code(), Some(1));
    assert_eq!(verdict(&strict)["value"], 9);

    let lenient = imgverify(&["diff", arg(&a), arg(&b), "--max-difference", "9"]);
    assert_eq!(lenient.status.code(), Some(0));
}

#[test]
fn test_diff_size_mismatch_is_an_error_unless_overlap() {
    let dir = TempDir::new().unwrap();
    let a = save_png(&dir, "a.png", &banded());
    let cropped = image::imageops::crop_imm(&banded(), 0, 0, 6, 6).to_image();
    let b = save_png(&dir, "b.png", &cropped);

    let strict = imgverify(&["diff", arg(&a), arg(&b)]);
    assert_eq!(strict.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&strict.stderr).contains("dimension mismatch"));

    assert_eq!(imgverify(&["diff", arg(&a), arg(&b), "--overlap"]).status.code(), Some(0));

    let config = dir.path().join("overlap.toml");
    std::fs::write(&config, "[analysis]\noverlap_only = true\n").unwrap();
    let configured = imgverify(&["--config", arg(&config), "diff", arg(&a), arg(&b)]);
    assert_eq!(configured.status.code(), Some(0));
    assert_eq!(verdict(&configured)["value"], 0);
}

#[test]
fn test_chunks_expect() {
    let dir = TempDir::new().unwrap();
    let mut blob = PNG_SIGNATURE.to_vec();
    for tag in [b"AAAA", b"BBBB", b"CCCC"] {
        blob.extend_from_slice(&0u32.to_be_bytes());
        blob.extend_from_slice(tag);
        blob.extend_from_slice(&[0; 4]);
    }
    let file = dir.path().join("chunks.bin");
    std::fs::write(&file, &blob).unwrap();

    let ok = imgverify(&["chunks", arg(&file), "--expect", "AAAA,BBBB,CCCC"]);
    assert_eq!(ok.status.code(), Some(0));
    assert_eq!(verdict(&ok)["value"], serde_json::json!(["AAAA", "BBBB", "CCCC"]));

    let short = imgverify(&["chunks", arg(&file), "--expect", "AAAA,BBBB"]);
    assert_eq!(short.status.code(), Some(1));
}

#[test]
fn test_dimensions_and_format_expectations() {
    let dir = TempDir::new().unwrap();
    let img = save_png(&dir, "p.png", &banded());

    let ok = imgverify(&["probe", arg(&img), "--width", "10", "--height", "8", "--format", "png"]);
    assert_eq!(ok.status.code(), Some(0));
    let json = verdict(&ok);
    assert_eq!(json["value"]["mime"], "image/png");

    let wrong = imgverify(&["probe", arg(&img), "--format", "webp"]);
    assert_eq!(wrong.status.code(), Some(1));
}

#[test]
fn test_missing_input_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.png");

    let out = imgverify(&["grayscale", arg(&missing)]);
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to read"));
}
