mod config;
mod error;
mod telemetry;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use vitrina_core::{BuildingStore, ExhibitId, ExhibitStore, HistoryRecord, HistoryStore, Placement};
use vitrina_relocation::{BuildingIndex, RelocationReport, RelocationRequest, Relocator};
use vitrina_rest::MuseumClient;

use crate::config::{load_config, resolve_connection};
use crate::error::VtrError;

#[derive(Parser)]
#[command(name = "vtr")]
#[command(about = "Museum exhibit placement and relocation", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "VITRINA_URL")]
    url: Option<String>,

    /// Bearer token for the backend
    #[arg(long, global = true, env = "VITRINA_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show where an exhibit is stored
    Locate { exhibit: ExhibitId },

    /// Move an exhibit to a new storage slot
    Relocate {
        exhibit: ExhibitId,

        #[arg(long)]
        building: u64,

        #[arg(long)]
        floor: u32,

        #[arg(long)]
        room: u32,

        #[arg(long)]
        showcase: u32,

        #[arg(long)]
        shelf: u32,

        /// Reason for the transfer, e.g. "Remont ishlari"
        #[arg(long)]
        reason: String,

        /// Responsible party; defaults to the configured operator
        #[arg(long)]
        responsible: Option<String>,

        #[arg(long)]
        note: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the relocation history visible to the configured operator
    History {
        /// Only this exhibit's lineage
        #[arg(long)]
        exhibit: Option<ExhibitId>,
    },

    /// Resubmit a history entry left unrecorded by `relocate`
    RecordHistory {
        /// JSON file holding the entry or a `relocate --json` report; `-` reads stdin
        file: PathBuf,
    },

    /// List buildings and their capacity
    Buildings,
}

/// Accepts either a bare history record or a relocation report carrying
/// `unrecordedHistory`.
fn parse_pending_history(content: &str) -> Result<HistoryRecord, VtrError> {
    let mut value: serde_json::Value = serde_json::from_str(content)?;
    if let Some(pending) = value.get_mut("unrecordedHistory").map(serde_json::Value::take) {
        value = pending;
    }
    Ok(serde_json::from_value(value)?)
}

fn read_input(file: &Path) -> Result<String, VtrError> {
    if file.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(std::fs::read_to_string(file)?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config()?;
    telemetry::init(config.log_level.as_deref().unwrap_or("info"));

    let connection = resolve_connection(cli.url, cli.token, &config);
    debug!(base_url = %connection.base_url, authenticated = connection.token.is_some(), "backend");
    let mut client = MuseumClient::new(connection.base_url);
    if let Some(token) = connection.token {
        client = client.with_token(token);
    }
    let relocator = Relocator::new(&client);

    match cli.command {
        Command::Locate { exhibit } => {
            let record = client
                .get_exhibit(exhibit)
                .await
                .map_err(VtrError::from)?
                .ok_or(VtrError::ExhibitNotFound(exhibit))?;
            let buildings = BuildingIndex::new(client.list_buildings().await.map_err(VtrError::from)?);
            let location = relocator
                .resolver()
                .resolve_current_location(exhibit)
                .await
                .map_err(VtrError::from)?;

            println!("{} [{}]: {}", record.name, exhibit, record.lifecycle);
            match location {
                Some(location) => {
                    println!("{}", buildings.snapshot(&location.placement));
                    if let Some(responsible) = location.responsible {
                        println!("responsible: {}", responsible);
                    }
                }
                None if record.lifecycle.is_placed() => {
                    warn!(exhibit, status = %record.lifecycle, "status says placed but no location exists");
                    println!("exhibit {} has no location", exhibit);
                }
                None => println!("exhibit {} has not been placed", exhibit),
            }
        }
        Command::Relocate {
            exhibit,
            building,
            floor,
            room,
            showcase,
            shelf,
            reason,
            responsible,
            note,
            json,
        } => {
            let responsible = responsible
                .or_else(|| config.operator.as_ref().map(|op| op.name.clone()))
                .ok_or(VtrError::ResponsibleMissing)?;
            let request = RelocationRequest {
                exhibit,
                destination: Placement::new(building, floor, room, showcase, shelf),
                reason,
                responsible,
                note,
            };

            let result = relocator.relocate(&request).await;

            if json {
                let report = RelocationReport::from_result(&result);
                println!("{}", serde_json::to_string_pretty(&report).map_err(VtrError::from)?);
            }

            let relocation = result.map_err(VtrError::from)?;
            if !json {
                match &relocation.previous {
                    Some(previous) => println!(
                        "moved exhibit {} from {} to {}",
                        exhibit, previous.placement, relocation.location.placement
                    ),
                    None => println!(
                        "placed exhibit {} at {}",
                        exhibit, relocation.location.placement
                    ),
                }
                for warning in &relocation.warnings {
                    eprintln!("warning: {}", warning);
                }
                if let Some(pending) = &relocation.unrecorded_history {
                    eprintln!(
                        "unrecorded history entry:\n{}",
                        serde_json::to_string_pretty(pending).map_err(VtrError::from)?
                    );
                }
            }
        }
        Command::History { exhibit } => {
            let viewer = config.operator.as_ref().ok_or(VtrError::OperatorNotConfigured)?;
            debug!(operator = %viewer.name, role = %viewer.role, "filtering history");
            let records = match exhibit {
                Some(exhibit) => relocator
                    .history_for_exhibit(exhibit)
                    .await
                    .map_err(VtrError::from)?,
                None => client.list_history().await.map_err(VtrError::from)?,
            };

            for record in viewer.visible_history(&records) {
                let from = record
                    .from
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "(new)".to_string());
                println!(
                    "{}  {} [{}]  {} -> {}  {} / {}",
                    record.recorded_at.format("%Y-%m-%d %H:%M"),
                    record.exhibit_name,
                    record.exhibit,
                    from,
                    record.to,
                    record.reason,
                    record.responsible
                );
            }
        }
        Command::RecordHistory { file } => {
            let pending = parse_pending_history(&read_input(&file)?)?;
            let stored = relocator
                .record_history(&pending)
                .await
                .map_err(VtrError::from)?;
            match stored.id {
                Some(id) => println!("recorded history entry {} for exhibit {}", id, stored.exhibit),
                None => println!("recorded history entry for exhibit {}", stored.exhibit),
            }
        }
        Command::Buildings => {
            for building in client.list_buildings().await.map_err(VtrError::from)? {
                println!(
                    "{:>4}  {}  floors {} / rooms {} / showcases {} / shelves {}",
                    building.id,
                    building.name,
                    building.floors,
                    building.rooms,
                    building.showcases,
                    building.shelves
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry() -> serde_json::Value {
        json!({
            "exhibit": 7,
            "exhibit_name": "Kumush ko'za",
            "reason": "Remont ishlari",
            "note": null,
            "recorded_at": "2025-03-01T09:30:00Z",
            "responsible": "A. Karimov",
            "from": null,
            "to": {
                "building": 1,
                "building_name": "Asosiy bino",
                "floor": 2,
                "room": 5,
                "showcase": 1,
                "shelf": 3
            }
        })
    }

    #[test]
    fn parses_bare_history_entry() {
        let record = parse_pending_history(&entry().to_string()).unwrap();
        assert_eq!(record.exhibit, 7);
        assert_eq!(record.id, None);
        assert!(record.is_first_placement());
    }

    #[test]
    fn parses_entry_out_of_relocation_report() {
        let report = json!({
            "success": true,
            "warnings": ["history write failed: unavailable"],
            "unrecordedHistory": entry()
        });

        let record = parse_pending_history(&report.to_string()).unwrap();
        assert_eq!(record.reason, "Remont ishlari");
        assert_eq!(record.to.building_name, "Asosiy bino");
    }

    #[test]
    fn report_without_entry_is_rejected() {
        let report = json!({ "success": true, "warnings": [] });
        assert!(matches!(
            parse_pending_history(&report.to_string()),
            Err(VtrError::Json(_))
        ));
    }
}
