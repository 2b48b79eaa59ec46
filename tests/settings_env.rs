use prefill::settings::FillerSettings;
use prefill::{Mode, PrefillError};

// Kept apart from the file-based settings tests, which read the same
// variables. Everything runs in one test so nothing else sees them.
#[test]
fn settings_load_from_prefixed_environment() {
    unsafe {
        std::env::set_var("PREFILL_TAG", "alt");
        std::env::set_var("PREFILL_MODE", "strict");
    }
    let settings = FillerSettings::load(None).expect("settings");
    assert_eq!(settings.tag, "alt");
    assert_eq!(settings.mode, Mode::Strict);
    assert!(settings.overlay.is_empty());

    let filler = settings.into_filler();
    assert_eq!(filler.tag(), "alt");
    assert_eq!(filler.mode(), Mode::Strict);

    unsafe { std::env::set_var("PREFILL_MODE", "sometimes") };
    let err = FillerSettings::load(None).unwrap_err();
    assert!(matches!(err, PrefillError::Config(_)));

    unsafe {
        std::env::remove_var("PREFILL_TAG");
        std::env::remove_var("PREFILL_MODE");
    }
    assert_eq!(FillerSettings::load(None).expect("settings"), FillerSettings::default());
}
