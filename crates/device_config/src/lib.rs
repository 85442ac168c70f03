//! # Device Config
//!
//! Configuração tipada e validada do dispositivo DHT Logger (ESP32 + sensor
//! DHT). Substitui as constantes do `secret.h` por uma struct carregada de um
//! arquivo TOML de segredos e/ou variáveis de ambiente.
//!
//! ## Módulos
//! - [`config`] – `DeviceConfig`, carga, gravação e erros
//! - [`validation`] – Regras por campo (porta, `device_id`, fusos…)
//! - [`audit`] – Achados não fatais e severidade
//! - [`sensor`] – Modelos DHT suportados
//! - [`secret`] – Strings sensíveis mascaradas em logs
//! - [`topic`] – Nomes e filtros de tópico MQTT
//! - [`provision`] – Imagem binária para a partição de configuração
//! - [`gateway`] – Configuração do gateway e checagem de pareamento

pub mod audit;
pub mod config;
pub mod gateway;
pub mod provision;
pub mod secret;
pub mod sensor;
pub mod topic;
pub mod validation;

// Re-exports convenientes
pub use audit::{Finding, Severity, audit};
pub use config::{ConfigError, DeviceConfig};
pub use gateway::{GatewayConfig, pairing_issues};
pub use provision::{IMAGE_VERSION, ProvisionError, decode_image, encode_image, write_image};
pub use secret::Secret;
pub use sensor::SensorType;
pub use validation::MAX_DEVICE_ID_LEN;
