//! Configuração do gateway que recebe as leituras e responde o ACK.
//!
//! Lida só do ambiente (mesmas variáveis do serviço web), com os padrões
//! abaixo. Usada para conferir se um dispositivo e o gateway conversam.

use crate::audit::{Finding, Severity};
use crate::config::{ConfigError, DeviceConfig};
use crate::secret::Secret;
use crate::topic::{filter_matches, validate_topic_filter, validate_topic_name};

/// Banco onde o gateway grava `sensor_data`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Secret,
    pub database: String,
    pub pool_min: u32,
    pub pool_max: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 3306,
            user: "root".into(),
            password: "password".into(),
            database: "dht_logger".into(),
            pool_min: 5,
            pool_max: 20,
        }
    }
}

/// Lado servidor do par dispositivo ↔ gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Broker MQTT
    pub broker_host: String,
    /// Porta do broker (TLS)
    pub broker_port: u16,
    /// CA usada para validar o broker
    pub ca_cert_file: String,
    pub username: String,
    pub password: Secret,
    /// QoS de assinatura e publicação (0–2)
    pub qos: u8,
    pub keepalive_secs: u16,
    /// Filtro assinado para receber leituras
    pub topic_sensor_data: String,
    /// Tópico onde o ACK é publicado
    pub topic_ack: String,
    /// Tempo máximo para gravar a leitura antes de responder
    pub ack_timeout_secs: u32,
    pub database: DatabaseConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            broker_host: "broker.emqx.io".into(),
            broker_port: 8883,
            ca_cert_file: "/app/emqxsl-ca.crt".into(),
            username: String::new(),
            password: Secret::default(),
            qos: 1,
            keepalive_secs: 60,
            topic_sensor_data: "sensors/dht/data".into(),
            topic_ack: "sensors/dht/ack".into(),
            ack_timeout_secs: 3,
            database: DatabaseConfig::default(),
        }
    }
}

fn text(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut String) {
    if let Some(value) = lookup(key) {
        *target = value;
    }
}

fn number<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    target: &mut T,
) -> Result<(), ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(value) = lookup(key) {
        *target = value.trim().parse::<T>().map_err(|e| ConfigError::Malformed {
            field: key,
            value: value.clone(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

impl GatewayConfig {
    /// Lê as variáveis de ambiente do processo.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Aplica as variáveis sobre os padrões e valida.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        text(&lookup, "MQTT_BROKER_URL", &mut cfg.broker_host);
        number(&lookup, "MQTT_BROKER_PORT", &mut cfg.broker_port)?;
        text(&lookup, "MQTT_CA_CERT_FILE", &mut cfg.ca_cert_file);
        text(&lookup, "MQTT_USERNAME", &mut cfg.username);
        if let Some(pw) = lookup("MQTT_PASSWORD") {
            cfg.password = pw.into();
        }
        number(&lookup, "MQTT_QOS", &mut cfg.qos)?;
        number(&lookup, "MQTT_KEEPALIVE", &mut cfg.keepalive_secs)?;
        text(&lookup, "MQTT_TOPIC_SENSOR_DATA", &mut cfg.topic_sensor_data);
        text(&lookup, "MQTT_TOPIC_ACK", &mut cfg.topic_ack);
        number(&lookup, "MQTT_ACK_TIMEOUT", &mut cfg.ack_timeout_secs)?;

        let db = &mut cfg.database;
        text(&lookup, "MYSQL_HOST", &mut db.host);
        number(&lookup, "MYSQL_PORT", &mut db.port)?;
        text(&lookup, "MYSQL_USER", &mut db.user);
        if let Some(pw) = lookup("MYSQL_PASSWORD") {
            db.password = pw.into();
        }
        text(&lookup, "MYSQL_DATABASE", &mut db.database);

        cfg.validate()?;
        Ok(cfg)
    }

    /// Todas as violações do lado do gateway.
    pub fn violations(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.broker_host.is_empty() {
            errors.push(ConfigError::invalid("MQTT_BROKER_URL", "host vazio"));
        }
        if self.broker_port == 0 {
            errors.push(ConfigError::invalid("MQTT_BROKER_PORT", "0 fora de [1, 65535]"));
        }
        if self.qos > 2 {
            errors.push(ConfigError::invalid(
                "MQTT_QOS",
                format!("QoS {} inexistente (0, 1 ou 2)", self.qos),
            ));
        }
        if self.keepalive_secs == 0 {
            errors.push(ConfigError::invalid("MQTT_KEEPALIVE", "deve ser ≥ 1 s"));
        }
        if self.ack_timeout_secs == 0 {
            errors.push(ConfigError::invalid("MQTT_ACK_TIMEOUT", "deve ser ≥ 1 s"));
        }
        if let Err(e) = validate_topic_filter(&self.topic_sensor_data) {
            errors.push(ConfigError::invalid("MQTT_TOPIC_SENSOR_DATA", e.to_string()));
        }
        if let Err(e) = validate_topic_name(&self.topic_ack) {
            errors.push(ConfigError::invalid("MQTT_TOPIC_ACK", e.to_string()));
        }
        if self.database.port == 0 {
            errors.push(ConfigError::invalid("MYSQL_PORT", "0 fora de [1, 65535]"));
        }
        if self.database.pool_min > self.database.pool_max {
            errors.push(ConfigError::invalid(
                "MYSQL_POOL_MIN_SIZE",
                format!(
                    "mínimo {} maior que máximo {}",
                    self.database.pool_min, self.database.pool_max
                ),
            ));
        }

        errors
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.violations().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Confere se dispositivo e gateway usam o mesmo broker e tópicos compatíveis.
pub fn pairing_issues(device: &DeviceConfig, gateway: &GatewayConfig) -> Vec<Finding> {
    let mut issues = Vec::new();

    if !filter_matches(&gateway.topic_sensor_data, &device.mqtt_topic_data) {
        issues.push(Finding {
            field: "mqtt_topic_data".into(),
            message: format!(
                "gateway assina {:?}, dispositivo publica em {:?}",
                gateway.topic_sensor_data, device.mqtt_topic_data
            ),
            severity: Severity::Error,
        });
    }

    if !filter_matches(&device.mqtt_topic_ack, &gateway.topic_ack) {
        issues.push(Finding {
            field: "mqtt_topic_ack".into(),
            message: format!(
                "gateway publica ACK em {:?}, dispositivo assina {:?}",
                gateway.topic_ack, device.mqtt_topic_ack
            ),
            severity: Severity::Error,
        });
    }

    if !device
        .mqtt_broker_host
        .eq_ignore_ascii_case(&gateway.broker_host)
    {
        issues.push(Finding {
            field: "mqtt_broker_host".into(),
            message: format!(
                "broker diferente: dispositivo {:?}, gateway {:?}",
                device.mqtt_broker_host, gateway.broker_host
            ),
            severity: Severity::Warning,
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = GatewayConfig::default();
        let errors = config.violations();
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn env_values_override_defaults() {
        let cfg = GatewayConfig::from_lookup(lookup(&[
            ("MQTT_BROKER_PORT", "1883"),
            ("MQTT_QOS", "2"),
            ("MYSQL_PASSWORD", "segredo"),
            ("MQTT_TOPIC_SENSOR_DATA", "dht/+/data"),
        ]))
        .unwrap();
        assert_eq!(cfg.broker_port, 1883);
        assert_eq!(cfg.qos, 2);
        assert_eq!(cfg.database.password.expose(), "segredo");
        assert_eq!(cfg.topic_sensor_data, "dht/+/data");
        // Outros campos devem ter valor padrão
        assert_eq!(cfg.database.port, 3306);
        assert_eq!(cfg.keepalive_secs, 60);
    }

    #[test]
    fn malformed_number_fails() {
        let err = GatewayConfig::from_lookup(lookup(&[("MQTT_KEEPALIVE", "um minuto")])).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { field: "MQTT_KEEPALIVE", .. }));
    }

    #[test]
    fn qos_above_two_is_invalid() {
        let err = GatewayConfig::from_lookup(lookup(&[("MQTT_QOS", "3")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "MQTT_QOS", .. }));
    }

    #[test]
    fn defaults_do_not_pair_with_example_device() {
        // Os tópicos padrão dos dois lados são diferentes
        let issues = pairing_issues(&DeviceConfig::example(), &GatewayConfig::default());
        let fields: Vec<_> = issues.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, ["mqtt_topic_data", "mqtt_topic_ack"]);
    }

    #[test]
    fn wildcard_subscription_pairs() {
        let gateway = GatewayConfig {
            topic_sensor_data: "dht/+/data".into(),
            topic_ack: "dht/app/ack".into(),
            ..GatewayConfig::default()
        };
        assert!(pairing_issues(&DeviceConfig::example(), &gateway).is_empty());
    }

    #[test]
    fn different_broker_is_a_warning() {
        let gateway = GatewayConfig {
            broker_host: "mqtt.lab.local".into(),
            topic_sensor_data: "dht/#".into(),
            topic_ack: "dht/app/ack".into(),
            ..GatewayConfig::default()
        };
        let issues = pairing_issues(&DeviceConfig::example(), &gateway);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }
}
