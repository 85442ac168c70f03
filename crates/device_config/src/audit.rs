//! Auditoria – achados não fatais e severidade.
//!
//! Erros de validação entram como [`Severity::Error`]; o resto são avisos
//! sobre valores de exemplo esquecidos ou combinações arriscadas.

use crate::config::DeviceConfig;
use tracing::warn;

/// Nível do achado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Um achado da auditoria.
#[derive(Debug, Clone)]
pub struct Finding {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

/// Brokers públicos conhecidos: qualquer um lê o que não tiver credencial.
pub const PUBLIC_BROKERS: [&str; 4] = [
    "broker.emqx.io",
    "test.mosquitto.org",
    "broker.hivemq.com",
    "mqtt.eclipseprojects.io",
];

/// Audita a configuração e retorna os achados, erros primeiro.
pub fn audit(config: &DeviceConfig) -> Vec<Finding> {
    let mut findings: Vec<Finding> = config
        .violations()
        .into_iter()
        .map(|e| Finding {
            field: e.field().unwrap_or("?").to_string(),
            message: e.to_string(),
            severity: Severity::Error,
        })
        .collect();

    let example = DeviceConfig::example();

    if config.wifi_ssid == example.wifi_ssid {
        push(&mut findings, "wifi_ssid", "SSID do exemplo", Severity::Warning);
    }
    if config.wifi_password == example.wifi_password {
        push(
            &mut findings,
            "wifi_password",
            "senha Wi-Fi do exemplo",
            Severity::Warning,
        );
    }
    if config.device_id == example.device_id {
        push(
            &mut findings,
            "device_id",
            "device_id do exemplo; use um valor diferente por dispositivo",
            Severity::Info,
        );
    }

    let user = !config.mqtt_username.is_empty();
    let pass = !config.mqtt_password.is_empty();
    if user != pass {
        push(
            &mut findings,
            if user { "mqtt_password" } else { "mqtt_username" },
            "usuário e senha MQTT devem ser informados juntos",
            Severity::Warning,
        );
    }

    if is_public_broker(&config.mqtt_broker_host) {
        if !config.has_mqtt_credentials() {
            push(
                &mut findings,
                "mqtt_broker_host",
                "broker público sem credenciais: qualquer cliente lê os tópicos",
                Severity::Warning,
            );
        }
        if config.mqtt_broker_port == 1883 {
            push(
                &mut findings,
                "mqtt_broker_port",
                "porta 1883 trafega em texto puro num broker público",
                Severity::Warning,
            );
        }
    }

    for (field, topic) in [
        ("mqtt_topic_data", &config.mqtt_topic_data),
        ("mqtt_topic_ack", &config.mqtt_topic_ack),
    ] {
        if topic.starts_with('/') {
            push(
                &mut findings,
                field,
                "tópico iniciado por '/' cria um nível vazio",
                Severity::Info,
            );
        }
    }

    if config.gmt_offset_seconds % 900 != 0 {
        push(
            &mut findings,
            "gmt_offset_seconds",
            "fusos reais são múltiplos de 15 minutos (900 s)",
            Severity::Info,
        );
    }

    findings.sort_by(|a, b| b.severity.cmp(&a.severity));
    for f in findings.iter().filter(|f| f.severity == Severity::Warning) {
        warn!("{}: {}", f.field, f.message);
    }
    findings
}

fn push(findings: &mut Vec<Finding>, field: &str, message: &str, severity: Severity) {
    findings.push(Finding {
        field: field.into(),
        message: message.into(),
        severity,
    });
}

/// `true` se o host é um broker público conhecido.
pub fn is_public_broker(host: &str) -> bool {
    PUBLIC_BROKERS.iter().any(|b| b.eq_ignore_ascii_case(host))
}

/// Severidade mais alta da lista ([`Severity::Info`] se vazia).
pub fn worst(findings: &[Finding]) -> Severity {
    findings
        .iter()
        .map(|f| f.severity)
        .max()
        .unwrap_or(Severity::Info)
}
