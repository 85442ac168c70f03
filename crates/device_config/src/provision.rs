//! Imagem binária de provisionamento.
//!
//! Gravada numa partição de configuração do ESP32 em vez de compilar os
//! segredos no firmware. Formato:
//!
//! ```text
//! ┌──────────┬─────────┬──────────────────────────┐
//! │ Magic(1) │ Ver.(1) │ bincode(DeviceConfig)    │
//! └──────────┴─────────┴──────────────────────────┘
//! ```
//!
//! - Magic byte `0x44` ('D') identifica uma imagem de dispositivo DHT
//! - Versão do formato (1 byte)
//! - Corpo serializado com bincode

use crate::config::{ConfigError, DeviceConfig, write_private};
use std::path::{Path, PathBuf};

/// Magic byte da imagem de configuração.
pub const MAGIC_BYTE: u8 = 0x44; // 'D'

/// Versão atual do formato.
pub const IMAGE_VERSION: u8 = 1;

/// Tamanho do header (magic + version).
const HEADER_SIZE: usize = 2;

/// Tamanho máximo da imagem (uma página NVS).
pub const MAX_IMAGE_SIZE: usize = 4096;

/// Erros da imagem de provisionamento.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Imagem muito curta ({0} bytes, mínimo {HEADER_SIZE})")]
    TooShort(usize),

    #[error("Imagem muito grande ({0} bytes, máximo {MAX_IMAGE_SIZE})")]
    TooLarge(usize),

    #[error("Magic byte inválido: 0x{0:02X} (esperado 0x{MAGIC_BYTE:02X})")]
    InvalidMagic(u8),

    #[error("Versão incompatível: {0} (suportada: {IMAGE_VERSION})")]
    VersionMismatch(u8),

    #[error("Erro de serialização: {0}")]
    Serialize(String),

    #[error("Erro de deserialização: {0}")]
    Deserialize(String),

    #[error("Configuração inválida: {0}")]
    Config(#[from] ConfigError),

    #[error("Erro ao gravar {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Codifica uma [`DeviceConfig`] válida para gravação.
///
/// Retorna bytes no formato: `[MAGIC][VERSION][bincode_payload...]`
pub fn encode_image(config: &DeviceConfig) -> Result<Vec<u8>, ProvisionError> {
    config.validate()?;

    let body = bincode::serialize(config).map_err(|e| ProvisionError::Serialize(e.to_string()))?;

    let mut frame = Vec::with_capacity(HEADER_SIZE + body.len());
    frame.push(MAGIC_BYTE);
    frame.push(IMAGE_VERSION);
    frame.extend_from_slice(&body);

    if frame.len() > MAX_IMAGE_SIZE {
        return Err(ProvisionError::TooLarge(frame.len()));
    }
    Ok(frame)
}

/// Codifica e grava a imagem em `path` com permissão 0600 (Unix).
///
/// A imagem carrega as senhas em texto puro. Retorna o tamanho gravado.
pub fn write_image(config: &DeviceConfig, path: &Path) -> Result<usize, ProvisionError> {
    let image = encode_image(config)?;
    write_private(path, &image).map_err(|source| ProvisionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.len())
}

/// Decodifica e valida uma imagem lida da partição.
///
/// Valida tamanho, magic byte e versão antes de deserializar.
pub fn decode_image(data: &[u8]) -> Result<DeviceConfig, ProvisionError> {
    if data.len() < HEADER_SIZE {
        return Err(ProvisionError::TooShort(data.len()));
    }
    if data.len() > MAX_IMAGE_SIZE {
        return Err(ProvisionError::TooLarge(data.len()));
    }

    let magic = data[0];
    if magic != MAGIC_BYTE {
        return Err(ProvisionError::InvalidMagic(magic));
    }

    let version = data[1];
    if version != IMAGE_VERSION {
        return Err(ProvisionError::VersionMismatch(version));
    }

    let config: DeviceConfig = bincode::deserialize(&data[HEADER_SIZE..])
        .map_err(|e| ProvisionError::Deserialize(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
