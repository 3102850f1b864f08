//! Fuzz JSON manager configuration and domain conversion.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rdbms_balancer::Domain;
use rdbms_connection_manager::ManagerConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    let _ = ManagerConfig::from_json_value(&value);

    if let Ok(domain) = Domain::try_from(&value) {
        let encoded = serde_json::to_value(&domain).unwrap();
        let decoded: Domain = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, domain);
    }
});
