//! Modelos de sensor DHT suportados pelo firmware.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Tipo do sensor ligado ao `sensor_pin`.
///
/// AM2301 e AM2302 são aceitos como apelidos de DHT21 e DHT22.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorType {
    #[serde(rename = "DHT11")]
    Dht11,
    #[serde(rename = "DHT12")]
    Dht12,
    #[serde(rename = "DHT21", alias = "AM2301")]
    Dht21,
    #[serde(rename = "DHT22", alias = "AM2302")]
    Dht22,
}

/// Faixa de medição do sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementRange {
    /// Temperatura mínima/máxima (°C)
    pub temp_c: (f32, f32),
    /// Umidade relativa mínima/máxima (%)
    pub humidity: (f32, f32),
}

impl SensorType {
    pub const ALL: [SensorType; 4] = [Self::Dht11, Self::Dht12, Self::Dht21, Self::Dht22];

    /// Nome canônico, igual ao usado no firmware (`DHT22`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dht11 => "DHT11",
            Self::Dht12 => "DHT12",
            Self::Dht21 => "DHT21",
            Self::Dht22 => "DHT22",
        }
    }

    /// Intervalo mínimo entre leituras.
    pub fn min_sampling_interval(self) -> Duration {
        match self {
            Self::Dht11 => Duration::from_secs(1),
            Self::Dht12 | Self::Dht21 | Self::Dht22 => Duration::from_secs(2),
        }
    }

    pub fn range(self) -> MeasurementRange {
        match self {
            Self::Dht11 => MeasurementRange {
                temp_c: (0.0, 50.0),
                humidity: (20.0, 90.0),
            },
            Self::Dht12 => MeasurementRange {
                temp_c: (-20.0, 60.0),
                humidity: (20.0, 95.0),
            },
            Self::Dht21 | Self::Dht22 => MeasurementRange {
                temp_c: (-40.0, 80.0),
                humidity: (0.0, 100.0),
            },
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Erro de parse de [`SensorType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("tipo de sensor desconhecido: {0:?} (esperado DHT11, DHT12, DHT21/AM2301 ou DHT22/AM2302)")]
pub struct UnknownSensorType(pub String);

impl FromStr for SensorType {
    type Err = UnknownSensorType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DHT11" => Ok(Self::Dht11),
            "DHT12" => Ok(Self::Dht12),
            "DHT21" | "AM2301" => Ok(Self::Dht21),
            "DHT22" | "AM2302" => Ok(Self::Dht22),
            _ => Err(UnknownSensorType(s.to_string())),
        }
    }
}
