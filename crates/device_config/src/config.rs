//! Configuração do dispositivo via arquivo TOML de segredos + variáveis de ambiente.
//!
//! Substitui o `secret.h` do firmware por uma struct carregada uma vez na
//! inicialização e passada por referência. O arquivo (`device.toml`) fica fora
//! do controle de versão; qualquer chave pode ser sobrescrita pelo ambiente
//! usando o nome da macro original (`WIFI_SSID`, `DEVICE_ID`, ...).

use crate::secret::Secret;
use crate::sensor::SensorType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Porta MQTT padrão (sem TLS).
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Nome do arquivo de segredos procurado ao lado do executável.
pub const DEFAULT_FILE_NAME: &str = "device.toml";

/// Erros de carga e validação da configuração.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Campo obrigatório ausente: `{field}`")]
    Missing { field: &'static str },

    #[error("Valor malformado em `{field}`: {value:?} ({reason})")]
    Malformed {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Valor inválido em `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Chave desconhecida: `{0}`")]
    UnknownKey(String),

    #[error("Erro ao acessar {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Erro ao parsear TOML: {0}")]
    Parse(String),

    #[error("Erro de serialização: {0}")]
    Serialize(String),
}

impl ConfigError {
    /// Campo associado ao erro, quando houver.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Missing { field } | Self::Malformed { field, .. } | Self::Invalid { field, .. } => {
                Some(*field)
            }
            Self::UnknownKey(key) => Some(key.as_str()),
            _ => None,
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Chave de configuração: nome no TOML, variável de ambiente e obrigatoriedade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub env: &'static str,
    pub required: bool,
}

const fn field(key: &'static str, env: &'static str, required: bool) -> FieldSpec {
    FieldSpec { key, env, required }
}

/// Todas as chaves aceitas, na ordem do `secret.h`.
pub const FIELDS: [FieldSpec; 14] = [
    field("wifi_ssid", "WIFI_SSID", true),
    field("wifi_password", "WIFI_PASSWORD", true),
    field("mqtt_broker_host", "MQTT_BROKER_HOST", true),
    field("mqtt_broker_port", "MQTT_BROKER_PORT", false),
    field("mqtt_username", "MQTT_USERNAME", false),
    field("mqtt_password", "MQTT_PASSWORD", false),
    field("mqtt_topic_data", "MQTT_TOPIC_DATA", true),
    field("mqtt_topic_ack", "MQTT_TOPIC_ACK", true),
    field("ntp_server", "NTP_SERVER", true),
    field("gmt_offset_seconds", "GMT_OFFSET_SEC", true),
    field("daylight_offset_seconds", "DAYLIGHT_OFFSET_SEC", true),
    field("sensor_pin", "DHT_PIN", true),
    field("sensor_type", "DHT_TYPE", true),
    field("device_id", "DEVICE_ID", true),
];

/// Configuração completa do dispositivo.
///
/// Só existe validada quando obtida por [`DeviceConfig::from_sources`] e
/// derivados; construída à mão, chame [`DeviceConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// SSID da rede Wi-Fi
    pub wifi_ssid: String,
    /// Senha Wi-Fi (vazia = rede aberta)
    pub wifi_password: Secret,
    /// Hostname ou IP do broker MQTT
    pub mqtt_broker_host: String,
    /// Porta TCP do broker
    pub mqtt_broker_port: u16,
    /// Usuário MQTT (opcional)
    pub mqtt_username: String,
    /// Senha MQTT (opcional)
    pub mqtt_password: Secret,
    /// Tópico onde o dispositivo publica as leituras
    pub mqtt_topic_data: String,
    /// Tópico (filtro) onde o dispositivo recebe o ACK
    pub mqtt_topic_ack: String,
    /// Servidor NTP
    pub ntp_server: String,
    /// Deslocamento do fuso em segundos (GMT+7 = 25200)
    pub gmt_offset_seconds: i32,
    /// Deslocamento do horário de verão em segundos
    pub daylight_offset_seconds: i32,
    /// GPIO do sensor
    pub sensor_pin: u8,
    /// Modelo do sensor
    pub sensor_type: SensorType,
    /// Identificador do dispositivo (máx. 11 caracteres, chave no banco)
    pub device_id: String,
}

// ──────────────────────────────────────────────
// Valores brutos (arquivo + ambiente)
// ──────────────────────────────────────────────

/// Valor escalar como veio da fonte: inteiro TOML ou texto.
#[derive(Clone)]
enum Scalar {
    Int(i64),
    Text(String),
}

/// Chaves conhecidas já mescladas, antes da conversão de tipos.
#[derive(Default)]
struct RawValues(BTreeMap<&'static str, Scalar>);

impl RawValues {
    fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| parse_error(content, &e))?;

        if let Some(key) = table.keys().find(|k| !FIELDS.iter().any(|f| f.key == k.as_str())) {
            return Err(ConfigError::UnknownKey(key.clone()));
        }

        let mut raw = Self::default();
        for def in &FIELDS {
            let scalar = match table.get(def.key) {
                None => continue,
                Some(toml::Value::Integer(n)) => Scalar::Int(*n),
                Some(toml::Value::String(s)) => Scalar::Text(s.clone()),
                // Só o tipo entra no erro, nunca o valor
                Some(other) => {
                    return Err(ConfigError::Malformed {
                        field: def.key,
                        value: other.type_str().to_string(),
                        reason: "esperado inteiro ou texto".into(),
                    });
                }
            };
            raw.0.insert(def.key, scalar);
        }
        Ok(raw)
    }

    fn overlay_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for def in &FIELDS {
            if let Some(value) = lookup(def.env) {
                debug!("{} sobrescrito por ${}", def.key, def.env);
                self.0.insert(def.key, Scalar::Text(value));
            }
        }
    }

    fn text(&self, key: &'static str) -> Result<String, ConfigError> {
        match self.0.get(key) {
            Some(Scalar::Text(s)) => Ok(s.clone()),
            Some(Scalar::Int(n)) => Ok(n.to_string()),
            None => Err(ConfigError::Missing { field: key }),
        }
    }

    fn text_or_default(&self, key: &'static str) -> Result<String, ConfigError> {
        if self.0.contains_key(key) {
            self.text(key)
        } else {
            Ok(String::new())
        }
    }

    fn int(&self, key: &'static str) -> Result<i64, ConfigError> {
        match self.0.get(key) {
            Some(Scalar::Int(n)) => Ok(*n),
            Some(Scalar::Text(s)) => s.trim().parse::<i64>().map_err(|e| {
                ConfigError::Malformed {
                    field: key,
                    value: s.clone(),
                    reason: e.to_string(),
                }
            }),
            None => Err(ConfigError::Missing { field: key }),
        }
    }

    fn int_in<T: TryFrom<i64>>(
        &self,
        key: &'static str,
        min: i64,
        max: i64,
    ) -> Result<T, ConfigError> {
        let n = self.int(key)?;
        if !(min..=max).contains(&n) {
            return Err(ConfigError::invalid(key, format!("{n} fora de [{min}, {max}]")));
        }
        T::try_from(n).map_err(|_| ConfigError::invalid(key, format!("{n} não cabe no tipo")))
    }

    fn into_config(self) -> Result<DeviceConfig, ConfigError> {
        let mqtt_broker_port = if self.0.contains_key("mqtt_broker_port") {
            self.int_in("mqtt_broker_port", 1, u16::MAX as i64)?
        } else {
            DEFAULT_MQTT_PORT
        };

        let sensor_type = {
            let raw = self.text("sensor_type")?;
            raw.parse::<SensorType>()
                .map_err(|e| ConfigError::Malformed {
                    field: "sensor_type",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?
        };

        Ok(DeviceConfig {
            wifi_ssid: self.text("wifi_ssid")?,
            wifi_password: self.text("wifi_password")?.into(),
            mqtt_broker_host: self.text("mqtt_broker_host")?,
            mqtt_broker_port,
            mqtt_username: self.text_or_default("mqtt_username")?,
            mqtt_password: self.text_or_default("mqtt_password")?.into(),
            mqtt_topic_data: self.text("mqtt_topic_data")?,
            mqtt_topic_ack: self.text("mqtt_topic_ack")?,
            ntp_server: self.text("ntp_server")?,
            gmt_offset_seconds: self.int_in(
                "gmt_offset_seconds",
                i32::MIN as i64,
                i32::MAX as i64,
            )?,
            daylight_offset_seconds: self.int_in(
                "daylight_offset_seconds",
                i32::MIN as i64,
                i32::MAX as i64,
            )?,
            sensor_pin: self.int_in("sensor_pin", 0, u8::MAX as i64)?,
            sensor_type,
            device_id: self.text("device_id")?,
        })
    }
}

/// Erro de sintaxe sem o trecho do arquivo: a linha pode conter uma senha.
fn parse_error(content: &str, err: &toml::de::Error) -> ConfigError {
    match err.span() {
        Some(span) => {
            let line = content
                .get(..span.start)
                .unwrap_or(content)
                .matches('\n')
                .count()
                + 1;
            ConfigError::Parse(format!("linha {line}: {}", err.message()))
        }
        None => ConfigError::Parse(err.message().to_string()),
    }
}

/// Grava um arquivo legível só pelo dono (0600 em Unix) desde a criação.
pub(crate) fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;

    // `mode` só vale na criação; um arquivo já existente mantém a permissão antiga
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)
}

// ──────────────────────────────────────────────
// Carga / gravação
// ──────────────────────────────────────────────

impl DeviceConfig {
    /// Mescla as fontes (arquivo, depois ambiente), converte e valida.
    ///
    /// `lookup` recebe o nome da variável de ambiente; injetável para testes.
    pub fn from_sources(
        toml: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self::parse_sources(toml, lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Só mescla e converte tipos; não aplica as regras de validação.
    ///
    /// Para ferramentas que querem listar todas as violações de uma vez.
    pub fn parse_sources(
        toml: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut raw = match toml {
            Some(content) => RawValues::from_toml(content)?,
            None => RawValues::default(),
        };
        raw.overlay_env(lookup);
        raw.into_config()
    }

    /// Carrega só do TOML, sem consultar o ambiente.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::from_sources(Some(content), |_| None)
    }

    /// Carrega só das variáveis de ambiente do processo.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(None, |key| std::env::var(key).ok())
    }

    /// Carrega o arquivo de segredos e aplica o ambiente por cima.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_sources(Some(&content), |key| std::env::var(key).ok())?;
        info!(
            "Configuração de {} carregada de {}",
            config.device_id,
            path.display()
        );
        Ok(config)
    }

    /// Lê arquivo + ambiente sem validar (ver [`parse_sources`](Self::parse_sources)).
    pub fn read_unchecked(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_sources(Some(&content), |key| std::env::var(key).ok())
    }

    /// Como [`load`](Self::load), mas usa só o ambiente se o arquivo não existir.
    pub fn load_or_env(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            info!("{} não encontrado, usando variáveis de ambiente", path.display());
            Self::from_env()
        }
    }

    /// Serializa em TOML (inclui os segredos em texto puro).
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Salva em arquivo TOML. Em Unix o arquivo fica com permissão 0600.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        write_private(path, content.as_bytes()).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do `device.toml`.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join(DEFAULT_FILE_NAME)
    }

    /// Modelo com os valores do `secret.example.h`.
    pub fn example() -> Self {
        Self {
            wifi_ssid: "Your-SSID-Name".into(),
            wifi_password: "Your-SSID-Password".into(),
            mqtt_broker_host: "broker.emqx.io".into(),
            mqtt_broker_port: DEFAULT_MQTT_PORT,
            mqtt_username: String::new(),
            mqtt_password: Secret::default(),
            mqtt_topic_data: "dht/sensors/data".into(),
            mqtt_topic_ack: "dht/app/ack".into(),
            ntp_server: "pool.ntp.org".into(),
            // GMT+7 (WIB)
            gmt_offset_seconds: 7 * 3600,
            daylight_offset_seconds: 0,
            sensor_pin: 4,
            sensor_type: SensorType::Dht22,
            device_id: "ESP32_01".into(),
        }
    }

    // ──────────────────────────────────────────
    // Tempo
    // ──────────────────────────────────────────

    /// Deslocamento total aplicado ao relógio NTP.
    pub fn utc_offset_seconds(&self) -> i32 {
        // Config não validada (`parse_sources`) pode trazer valores extremos
        self.gmt_offset_seconds
            .saturating_add(self.daylight_offset_seconds)
    }

    /// Rótulo legível do fuso, ex.: `UTC+07:00`.
    pub fn timezone_label(&self) -> String {
        let total = self.utc_offset_seconds();
        let sign = if total < 0 { '-' } else { '+' };
        let abs = total.unsigned_abs();
        format!("UTC{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
    }

    /// `true` se o usuário e a senha MQTT foram informados.
    pub fn has_mqtt_credentials(&self) -> bool {
        !self.mqtt_username.is_empty() && !self.mqtt_password.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const FULL: &str = r#"
wifi_ssid = "Lab-IoT"
wifi_password = "s3nha-forte"
mqtt_broker_host = "192.168.1.10"
mqtt_broker_port = 1883
mqtt_topic_data = "dht/sensors/data"
mqtt_topic_ack = "dht/app/ack"
ntp_server = "pool.ntp.org"
gmt_offset_seconds = 25200
daylight_offset_seconds = 0
sensor_pin = 4
sensor_type = "DHT22"
device_id = "ESP32_01"
"#;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn without(key: &str) -> String {
        FULL.lines()
            .filter(|l| !l.starts_with(&format!("{key} =")))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn loads_full_file() {
        let config = DeviceConfig::from_toml_str(FULL).unwrap();
        assert_eq!(config.device_id, "ESP32_01");
        assert_eq!(config.sensor_type, SensorType::Dht22);
        assert_eq!(config.gmt_offset_seconds, 25200);
        assert_eq!(config.wifi_password.expose(), "s3nha-forte");
        assert!(config.mqtt_username.is_empty());
        assert!(!config.has_mqtt_credentials());
    }

    #[test]
    fn optional_fields_use_defaults() {
        let config = DeviceConfig::from_toml_str(&without("mqtt_broker_port")).unwrap();
        assert_eq!(config.mqtt_broker_port, DEFAULT_MQTT_PORT);
        assert!(config.mqtt_password.is_empty());
    }

    #[test]
    fn every_required_field_is_reported_when_missing() {
        for def in FIELDS.iter().filter(|f| f.required) {
            let err = DeviceConfig::from_toml_str(&without(def.key)).unwrap_err();
            assert!(
                matches!(err, ConfigError::Missing { field } if field == def.key),
                "{}: {err}",
                def.key
            );
        }
    }

    #[test]
    fn non_numeric_port_is_malformed() {
        let content = FULL.replace("mqtt_broker_port = 1883", "mqtt_broker_port = \"abc\"");
        let err = DeviceConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { field: "mqtt_broker_port", .. }));
    }

    #[test]
    fn port_out_of_range_is_invalid() {
        for bad in ["0", "65536", "-1"] {
            let content = FULL.replace("mqtt_broker_port = 1883", &format!("mqtt_broker_port = {bad}"));
            let err = DeviceConfig::from_toml_str(&content).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { field: "mqtt_broker_port", .. }),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let content = FULL.replace("sensor_pin = 4", "sensor_pin = \"15\"");
        let config = DeviceConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.sensor_pin, 15);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let content = format!("{FULL}\nwifi_pass = \"x\"\n");
        let err = DeviceConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "wifi_pass"));
    }

    #[test]
    fn env_overrides_file() {
        let lookup = env(&[("DEVICE_ID", "ESP32_02"), ("DHT_TYPE", "dht11"), ("DHT_PIN", "5")]);
        let config = DeviceConfig::from_sources(Some(FULL), lookup).unwrap();
        assert_eq!(config.device_id, "ESP32_02");
        assert_eq!(config.sensor_type, SensorType::Dht11);
        assert_eq!(config.sensor_pin, 5);
        assert_eq!(config.mqtt_broker_host, "192.168.1.10");
    }

    #[test]
    fn env_only_configuration() {
        let lookup = env(&[
            ("WIFI_SSID", "Lab-IoT"),
            ("WIFI_PASSWORD", ""),
            ("MQTT_BROKER_HOST", "broker.local"),
            ("MQTT_TOPIC_DATA", "dht/sensors/data"),
            ("MQTT_TOPIC_ACK", "dht/app/ack"),
            ("NTP_SERVER", "pool.ntp.org"),
            ("GMT_OFFSET_SEC", "-10800"),
            ("DAYLIGHT_OFFSET_SEC", "0"),
            ("DHT_PIN", "4"),
            ("DHT_TYPE", "AM2302"),
            ("DEVICE_ID", "SALA_01"),
        ]);
        let config = DeviceConfig::from_sources(None, lookup).unwrap();
        assert_eq!(config.gmt_offset_seconds, -10800);
        assert_eq!(config.timezone_label(), "UTC-03:00");
        assert!(config.wifi_password.is_empty());
    }

    #[test]
    fn malformed_env_offset_fails() {
        let lookup = env(&[("GMT_OFFSET_SEC", "7h")]);
        let err = DeviceConfig::from_sources(Some(FULL), lookup).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { field: "gmt_offset_seconds", .. }));
    }

    #[test]
    fn unknown_sensor_type_is_malformed() {
        let content = FULL.replace("\"DHT22\"", "\"BME280\"");
        let err = DeviceConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { field: "sensor_type", .. }));
    }

    #[test]
    fn parse_sources_skips_validation() {
        let content = FULL.replace("\"ESP32_01\"", "\"ESP32_CLASSROOM\"");
        assert!(DeviceConfig::from_toml_str(&content).is_err());
        let config = DeviceConfig::parse_sources(Some(&content), |_| None).unwrap();
        assert_eq!(config.violations().len(), 1);
    }

    #[test]
    fn syntax_error_does_not_echo_secrets() {
        let content = without("wifi_password") + "\nwifi_password = \"Sup3rS3cretPW\n";
        let err = DeviceConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let msg = err.to_string();
        assert!(!msg.contains("Sup3rS3cretPW"), "{msg}");
        assert!(msg.contains("linha"), "{msg}");

        let content = without("mqtt_password") + "\nmqtt_password = \"MqttS3cr3t\" oops\n";
        let msg = DeviceConfig::from_toml_str(&content).unwrap_err().to_string();
        assert!(!msg.contains("MqttS3cr3t"), "{msg}");
    }

    #[test]
    fn float_offset_is_malformed() {
        let content = FULL.replace("gmt_offset_seconds = 25200", "gmt_offset_seconds = 25200.0");
        let err = DeviceConfig::from_toml_str(&content).unwrap_err();
        assert!(
            matches!(err, ConfigError::Malformed { field: "gmt_offset_seconds", ref value, .. } if value == "float"),
            "{err}"
        );
    }

    #[test]
    fn bool_port_is_malformed() {
        let content = FULL.replace("mqtt_broker_port = 1883", "mqtt_broker_port = true");
        let err = DeviceConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { field: "mqtt_broker_port", .. }));
    }

    #[test]
    fn non_scalar_secret_is_reported_by_type_only() {
        let content = without("wifi_password") + "\nwifi_password = [\"Sup3rS3cretPW\"]\n";
        let err = DeviceConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { field: "wifi_password", .. }));
        assert!(!err.to_string().contains("Sup3rS3cretPW"));
    }

    #[test]
    fn unknown_key_wins_over_bad_type() {
        let content = format!("{FULL}\ngmt_offset_seconds2 = 1.5\n");
        let err = DeviceConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "gmt_offset_seconds2"));
    }

    #[test]
    fn extreme_unchecked_offsets_do_not_overflow() {
        let mut config = DeviceConfig::example();
        config.gmt_offset_seconds = i32::MAX;
        config.daylight_offset_seconds = 7200;
        assert_eq!(config.utc_offset_seconds(), i32::MAX);
        config.gmt_offset_seconds = i32::MIN;
        config.daylight_offset_seconds = -7200;
        assert_eq!(config.utc_offset_seconds(), i32::MIN);
        assert!(config.timezone_label().starts_with("UTC-"));
    }

    #[test]
    fn roundtrip_toml() {
        let config = DeviceConfig::from_toml_str(FULL).unwrap();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = DeviceConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn example_is_loadable() {
        let example = DeviceConfig::example();
        let parsed = DeviceConfig::from_toml_str(&example.to_toml_string().unwrap()).unwrap();
        assert_eq!(example, parsed);
        assert_eq!(example.timezone_label(), "UTC+07:00");
    }

    #[test]
    fn debug_never_shows_passwords() {
        let config = DeviceConfig::from_toml_str(FULL).unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("s3nha-forte"));
        assert!(dbg.contains("ESP32_01"));
    }

    #[test]
    fn daylight_is_added_to_offset() {
        let mut config = DeviceConfig::example();
        config.gmt_offset_seconds = -5 * 3600;
        config.daylight_offset_seconds = 3600;
        assert_eq!(config.utc_offset_seconds(), -4 * 3600);
        assert_eq!(config.timezone_label(), "UTC-04:00");

        config.gmt_offset_seconds = 19800; // Índia
        config.daylight_offset_seconds = 0;
        assert_eq!(config.timezone_label(), "UTC+05:30");
    }
}
