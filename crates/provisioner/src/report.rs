//! Saída de terminal: banner da configuração e lista de achados.

use device_config::DeviceConfig;
use device_config::audit::{Finding, Severity};

fn icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "ℹ",
        Severity::Warning => "⚠",
        Severity::Error => "✖",
    }
}

pub fn print_findings(findings: &[Finding]) {
    if findings.is_empty() {
        println!("✔ Nenhum problema encontrado.");
        return;
    }
    for f in findings {
        println!("{} [{:?}] {}: {}", icon(f.severity), f.severity, f.field, f.message);
    }
}

/// Banner com a configuração. Senhas saem mascaradas via `Display` de `Secret`.
pub fn print_config(config: &DeviceConfig) {
    let user = if config.mqtt_username.is_empty() {
        "<anônimo>"
    } else {
        config.mqtt_username.as_str()
    };

    println!();
    println!("══════════════════════════════════════════════");
    println!("   ⚡ DHT LOGGER – {}", config.device_id);
    println!("══════════════════════════════════════════════");
    println!("  Wi-Fi:     {} (senha {})", config.wifi_ssid, config.wifi_password);
    println!(
        "  Broker:    {}:{}",
        config.mqtt_broker_host, config.mqtt_broker_port
    );
    println!("  Usuário:   {user} (senha {})", config.mqtt_password);
    println!("  Publica:   {}", config.mqtt_topic_data);
    println!("  ACK:       {}", config.mqtt_topic_ack);
    println!(
        "  NTP:       {} ({})",
        config.ntp_server,
        config.timezone_label()
    );
    println!(
        "  Sensor:    {} no GPIO{} (leitura a cada ≥{}s)",
        config.sensor_type,
        config.sensor_pin,
        config.sensor_type.min_sampling_interval().as_secs()
    );
    println!("══════════════════════════════════════════════");
    println!();
}
