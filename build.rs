fn main() {
    println!("cargo:rerun-if-env-changed=GATE_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=GATE_WIFI_PASSWORD");
    println!("cargo:rerun-if-env-changed=GATE_MQTT_URL");
    println!("cargo:rerun-if-env-changed=GATE_CONFIG_JSON");

    // Host builds (tests, simulation) have no ESP-IDF toolchain to describe.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
