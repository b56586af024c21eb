use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GifMakerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        GifMakerError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        GifMakerError::structural("/frames", "mixed")
            .to_string()
            .contains("structural violation in '/frames'")
    );
    assert_eq!(GifMakerError::EmptyInput.to_string(), "no frames to encode");
}

#[test]
fn decode_keeps_path_and_source() {
    let err = GifMakerError::Decode {
        path: PathBuf::from("a/1.tif"),
        source: image::ImageError::IoError(std::io::Error::other("boom")),
    };
    let msg = err.to_string();
    assert!(msg.contains("a/1.tif"));
    assert!(msg.contains("boom"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GifMakerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
