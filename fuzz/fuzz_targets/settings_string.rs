//! Fuzz the manager settings-string parser.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rdbms_connection_manager::ManagerConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(settings) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = ManagerConfig::from_settings_string(settings) {
        // Names are trimmed, and `false` always means the local domain
        if let Some(name) = config.domain.as_name() {
            assert_eq!(name, name.trim());
            assert!(!name.eq_ignore_ascii_case("false"));
        }
        assert!(config.groups.iter().all(|group| !group.is_empty()));
    }
});
