use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(LuxError::location("x").to_string().contains("location error:"));
    assert!(LuxError::fades("x").to_string().contains("fades error:"));
    assert!(LuxError::window("x").to_string().contains("window error:"));
    assert!(LuxError::serde("x").to_string().contains("serialization error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LuxError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
