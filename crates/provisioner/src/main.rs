//! # DHT Provision
//!
//! Valida, mostra e exporta a configuração de um dispositivo DHT Logger.
//!
//! ## Uso
//! ```bash
//! dht-provision init                         # Cria device.toml a partir do exemplo
//! dht-provision check --config device.toml  # Valida e lista avisos
//! dht-provision export --out device.bin     # Gera a imagem para a partição
//! dht-provision pair                        # Compara com o gateway ($MQTT_*, $MYSQL_*)
//! ```

mod report;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use device_config::audit::{Severity, audit, worst};
use device_config::{DeviceConfig, GatewayConfig, decode_image, pairing_issues, write_image};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "dht-provision", version, about = "Configuração do dispositivo DHT Logger")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Valida a configuração e lista os achados
    Check {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Mostra a configuração (senhas mascaradas)
    Show {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Cria um device.toml com os valores de exemplo
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
        /// Sobrescreve o arquivo existente
        #[arg(long)]
        force: bool,
    },
    /// Gera a imagem binária de provisionamento
    Export {
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Decodifica e mostra uma imagem
    Inspect { image: PathBuf },
    /// Confere tópicos e broker contra o gateway
    Pair {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Erro: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Check { config } => {
            // Sem validar na carga: o audit lista todas as violações
            let config = match config.as_deref() {
                Some(p) => DeviceConfig::read_unchecked(p)?,
                None => {
                    let default = DeviceConfig::default_path();
                    if default.exists() {
                        DeviceConfig::read_unchecked(&default)?
                    } else {
                        DeviceConfig::parse_sources(None, |key| std::env::var(key).ok())?
                    }
                }
            };
            let findings = audit(&config);
            report::print_findings(&findings);
            Ok(exit_for(worst(&findings)))
        }
        Command::Show { config } => {
            let config = load(config.as_deref())?;
            report::print_config(&config);
            Ok(ExitCode::SUCCESS)
        }
        Command::Init { path, force } => {
            let path = path.unwrap_or_else(DeviceConfig::default_path);
            if path.exists() && !force {
                bail!("{} já existe (use --force para sobrescrever)", path.display());
            }
            DeviceConfig::example().save(&path)?;
            println!("Modelo criado em {}. Edite antes de gravar no dispositivo.", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Export { out, config } => {
            let config = load(config.as_deref())?;
            let written = write_image(&config, &out)?;
            info!(
                "→ {} bytes para {} | {} | {}",
                written,
                out.display(),
                config.device_id,
                config.sensor_type
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Inspect { image } => {
            let data = std::fs::read(&image)
                .with_context(|| format!("Falha ao ler {}", image.display()))?;
            let config = decode_image(&data)?;
            report::print_config(&config);
            Ok(ExitCode::SUCCESS)
        }
        Command::Pair { config } => {
            let device = load(config.as_deref())?;
            let gateway = GatewayConfig::from_env().context("Configuração do gateway")?;
            let issues = pairing_issues(&device, &gateway);
            if issues.is_empty() {
                println!("Dispositivo {} e gateway compatíveis.", device.device_id);
            } else {
                warn!("{} problema(s) de pareamento", issues.len());
            }
            report::print_findings(&issues);
            Ok(exit_for(worst(&issues)))
        }
    }
}

/// Arquivo explícito, senão `device.toml` ao lado do executável, senão ambiente.
fn load(path: Option<&Path>) -> Result<DeviceConfig> {
    let config = match path {
        Some(p) => DeviceConfig::load(p)?,
        None => DeviceConfig::load_or_env(&DeviceConfig::default_path())?,
    };
    Ok(config)
}

fn exit_for(severity: Severity) -> ExitCode {
    match severity {
        Severity::Error => ExitCode::FAILURE,
        Severity::Info | Severity::Warning => ExitCode::SUCCESS,
    }
}
