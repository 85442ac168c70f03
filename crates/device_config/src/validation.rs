//! Regras de validação por campo de [`DeviceConfig`].

use crate::config::{ConfigError, DeviceConfig};
use crate::topic::{validate_topic_filter, validate_topic_name};

/// Limite do `device_id` (coluna `VARCHAR(11)` no banco do gateway).
pub const MAX_DEVICE_ID_LEN: usize = 11;

/// Limite do SSID em bytes (802.11).
pub const MAX_SSID_LEN: usize = 32;

/// Faixa da senha WPA2-PSK em caracteres.
pub const WPA_PASSWORD_LEN: (usize, usize) = (8, 63);

/// Limite de um hostname (RFC 1035).
pub const MAX_HOSTNAME_LEN: usize = 253;

/// Fusos reais vão de UTC-12 a UTC+14.
pub const GMT_OFFSET_RANGE: (i32, i32) = (-12 * 3600, 14 * 3600);

/// Horário de verão: no máximo ±2h.
pub const DAYLIGHT_OFFSET_RANGE: (i32, i32) = (-7200, 7200);

/// Maior GPIO entre as variantes do ESP32 (ESP32-S3: GPIO48).
pub const MAX_GPIO: u8 = 48;

impl DeviceConfig {
    /// Todas as violações encontradas, na ordem dos campos.
    pub fn violations(&self) -> Vec<ConfigError> {
        let checks = [
            check_ssid(&self.wifi_ssid),
            check_wifi_password(self.wifi_password.char_len()),
            check_host("mqtt_broker_host", &self.mqtt_broker_host),
            check_port(self.mqtt_broker_port),
            check_data_topic(&self.mqtt_topic_data),
            check_ack_topic(&self.mqtt_topic_ack, &self.mqtt_topic_data),
            check_host("ntp_server", &self.ntp_server),
            check_range(
                "gmt_offset_seconds",
                self.gmt_offset_seconds,
                GMT_OFFSET_RANGE,
            ),
            check_range(
                "daylight_offset_seconds",
                self.daylight_offset_seconds,
                DAYLIGHT_OFFSET_RANGE,
            ),
            check_pin(self.sensor_pin),
            check_device_id(&self.device_id),
        ];

        checks.into_iter().filter_map(Result::err).collect()
    }

    /// Falha na primeira violação.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.violations().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn check_ssid(ssid: &str) -> Result<(), ConfigError> {
    if ssid.is_empty() {
        return Err(ConfigError::invalid("wifi_ssid", "SSID vazio"));
    }
    if ssid.len() > MAX_SSID_LEN {
        return Err(ConfigError::invalid(
            "wifi_ssid",
            format!("{} bytes (máx. {MAX_SSID_LEN})", ssid.len()),
        ));
    }
    Ok(())
}

// Recebe só o tamanho: o valor nunca entra numa mensagem de erro.
fn check_wifi_password(len: usize) -> Result<(), ConfigError> {
    let (min, max) = WPA_PASSWORD_LEN;
    if len != 0 && !(min..=max).contains(&len) {
        return Err(ConfigError::invalid(
            "wifi_password",
            format!("senha WPA2 deve ter de {min} a {max} caracteres (tem {len}); vazia = rede aberta"),
        ));
    }
    Ok(())
}

fn check_host(field: &'static str, host: &str) -> Result<(), ConfigError> {
    if host.is_empty() {
        return Err(ConfigError::invalid(field, "host vazio"));
    }
    if host.contains("://") {
        return Err(ConfigError::invalid(
            field,
            format!("{host:?} contém esquema; informe só o host"),
        ));
    }
    if host.len() > MAX_HOSTNAME_LEN {
        return Err(ConfigError::invalid(
            field,
            format!("host com {} caracteres (máx. {MAX_HOSTNAME_LEN})", host.len()),
        ));
    }
    // Hostname, IPv4 ou IPv6 literal
    if let Some(bad) = host
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':')))
    {
        return Err(ConfigError::invalid(
            field,
            format!("caractere {bad:?} não permitido em {host:?}"),
        ));
    }
    Ok(())
}

fn check_port(port: u16) -> Result<(), ConfigError> {
    if port == 0 {
        return Err(ConfigError::invalid(
            "mqtt_broker_port",
            "0 fora de [1, 65535]",
        ));
    }
    Ok(())
}

fn check_data_topic(topic: &str) -> Result<(), ConfigError> {
    validate_topic_name(topic).map_err(|e| ConfigError::invalid("mqtt_topic_data", e.to_string()))
}

fn check_ack_topic(ack: &str, data: &str) -> Result<(), ConfigError> {
    validate_topic_filter(ack).map_err(|e| ConfigError::invalid("mqtt_topic_ack", e.to_string()))?;
    if ack == data {
        return Err(ConfigError::invalid(
            "mqtt_topic_ack",
            "igual ao tópico de dados; o dispositivo receberia as próprias leituras",
        ));
    }
    Ok(())
}

fn check_range(field: &'static str, value: i32, (min, max): (i32, i32)) -> Result<(), ConfigError> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::invalid(
            field,
            format!("{value} fora de [{min}, {max}]"),
        ));
    }
    Ok(())
}

fn check_pin(pin: u8) -> Result<(), ConfigError> {
    if pin > MAX_GPIO {
        return Err(ConfigError::invalid(
            "sensor_pin",
            format!("GPIO{pin} não existe (máx. GPIO{MAX_GPIO})"),
        ));
    }
    Ok(())
}

fn check_device_id(id: &str) -> Result<(), ConfigError> {
    let len = id.chars().count();
    if len == 0 {
        return Err(ConfigError::invalid("device_id", "identificador vazio"));
    }
    if len > MAX_DEVICE_ID_LEN {
        return Err(ConfigError::invalid(
            "device_id",
            format!("{id:?} tem {len} caracteres (máx. {MAX_DEVICE_ID_LEN})"),
        ));
    }
    if let Some(bad) = id.chars().find(|c| !c.is_ascii_graphic()) {
        return Err(ConfigError::invalid(
            "device_id",
            format!("caractere {bad:?} não permitido"),
        ));
    }
    Ok(())
}
