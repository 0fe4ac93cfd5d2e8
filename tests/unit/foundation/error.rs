use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GazelineError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        GazelineError::session("x")
            .to_string()
            .contains("session error:")
    );
    assert!(
        GazelineError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        GazelineError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GazelineError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
