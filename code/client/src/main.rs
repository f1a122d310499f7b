// This file defines the command-line client program for the smart-farm
// dashboard.
//
// This program can be used to query the simulated telemetry, toggle devices,
// select the active crop, run an AI analysis, and manage saved analysis
// snapshots, all over the demoserver's http interface.

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use farmlib::dashboard::{DashboardSnapshot, print_dashboard_snapshot};
use farmlib::prompt::DEFAULT_PROMPT_TEMPLATE;
use farmlib::types::{
    CropSelect, Device, DeviceToggle, DeviceToggleSet, PromptBody, SavedInsight,
};
use regex::Regex;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::env;
use std::fmt;

#[derive(Parser, Debug)]
#[command(about = "Smart-farm dashboard command-line client")]
struct Args {
    #[arg(long, help = "Hostname or IP address of the dashboard server")]
    addr: Option<String>,

    #[command(subcommand)]
    command: Commands,

    #[arg(long, help = "If true, output is printed in json format")]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get the current sensor reading, control state, and recent activity.
    State,
    /// Get the rolling per-channel history used for trend charts.
    History,
    /// Toggle devices. Commands look like <abbrev>[@0|1], e.g. "F" or "i@1".
    Ctl {
        #[arg(help = "A list of device commands of the form <abbrev>[@<0|1>]")]
        toggles: Vec<String>,
    },
    /// Get or set the selected crop.
    Crop {
        #[arg(help = "Crop display name to select; omit to print the current one")]
        name: Option<String>,
    },
    /// Run an AI environment analysis and print the advisory.
    Analyze,
    /// List, save, or delete saved advisory snapshots.
    Insights {
        #[command(subcommand)]
        action: InsightAction,
    },
    /// Get the advisory prompt template, replace it, or reset it.
    Prompt {
        #[arg(long, help = "File containing the new template")]
        template_file: Option<String>,
        #[arg(long, help = "Reset the template to the built-in default")]
        reset: bool,
    },
    /// Print the mock system log board.
    Logs,
    /// Print the government support postings board.
    Welfare,
}

#[derive(Subcommand, Debug)]
enum InsightAction {
    /// List saved snapshots, most recent first.
    List,
    /// Save the advisory currently shown on the dashboard.
    Save,
    /// Delete a saved snapshot by id.
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stderrlog::new()
        .module(module_path!())
        .verbosity(log::Level::Info)
        .init()
        .unwrap();

    let args = Args::parse();

    // The server address can be passed by flag or environment variable. Flag
    // takes precedence.
    let addr = args
        .addr
        .or(env::var("SMARTFARM_ADDR").ok())
        .expect("No address specified. Either pass --addr or set SMARTFARM_ADDR env var.");

    let client = reqwest::Client::new();

    match &args.command {
        Commands::State => {
            let text = get_text(&client, &addr, "state").await?;
            if args.json {
                println!("{text}");
            } else {
                let snap: DashboardSnapshot = serde_json::from_str(&text)?;
                println!("Dashboard State:");
                println!("================");
                print_dashboard_snapshot(&snap);
            }
        }
        Commands::History => {
            println!("{}", get_text(&client, &addr, "history").await?);
        }
        Commands::Ctl { toggles } => {
            log::info!("Connecting to dashboard at '{addr}'...");

            let cmds: Result<Vec<DeviceToggle>, CommandParseError> =
                toggles.iter().map(|x| parse_cmd(x)).collect();
            let cmd = match cmds {
                Ok(toggles) => DeviceToggleSet { toggles },
                Err(err) => {
                    return Err(anyhow!("Error parsing command(s): {err}"));
                }
            };

            let control_uri = format!("http://{addr}/control");
            let resp = client.post(control_uri).json(&cmd).send().await?;
            if resp.status() != StatusCode::OK {
                return Err(anyhow!("Control failed: {}", resp.text().await?));
            }
        }
        Commands::Crop { name } => match name {
            Some(name) => {
                let crop_uri = format!("http://{addr}/crop");
                let body = CropSelect { name: name.clone() };
                let resp = client.post(crop_uri).json(&body).send().await?;
                if resp.status() != StatusCode::OK {
                    return Err(anyhow!("Crop selection failed: {}", resp.text().await?));
                }
            }
            None => {
                println!("{}", get_text(&client, &addr, "crop").await?);
            }
        },
        Commands::Analyze => {
            let analyze_uri = format!("http://{addr}/analyze");
            let resp = client.post(analyze_uri).send().await?;
            if resp.status() != StatusCode::OK {
                return Err(anyhow!("Got bad response: {}", resp.text().await?));
            }
            let snap: DashboardSnapshot = resp.json().await?;
            match snap.advisory {
                Some(advisory) => println!("{advisory}"),
                None => println!("<no advisory>"),
            }
        }
        Commands::Insights { action } => match action {
            InsightAction::List => {
                let text = get_text(&client, &addr, "insights").await?;
                if args.json {
                    println!("{text}");
                } else {
                    let insights: Vec<SavedInsight> = serde_json::from_str(&text)?;
                    if insights.is_empty() {
                        println!("No saved insights.");
                    }
                    for insight in insights {
                        println!("[{}] {} ({})", insight.id, insight.crop, insight.timestamp);
                        println!("{}\n", insight.content);
                    }
                }
            }
            InsightAction::Save => {
                let insights_uri = format!("http://{addr}/insights");
                let resp = client.post(insights_uri).send().await?;
                if resp.status() != StatusCode::OK {
                    return Err(anyhow!("Save failed: {}", resp.text().await?));
                }
                let saved: SavedInsight = resp.json().await?;
                println!("Saved insight {}", saved.id);
            }
            InsightAction::Delete { id } => {
                let delete_uri = format!("http://{addr}/insights/{id}");
                let resp = client.delete(delete_uri).send().await?;
                if resp.status() != StatusCode::OK {
                    return Err(anyhow!("Delete failed: {}", resp.text().await?));
                }
            }
        },
        Commands::Prompt {
            template_file,
            reset,
        } => {
            let prompt_uri = format!("http://{addr}/prompt");
            let new_template = if *reset {
                Some(DEFAULT_PROMPT_TEMPLATE.to_string())
            } else if let Some(path) = template_file {
                Some(std::fs::read_to_string(path)?)
            } else {
                None
            };

            match new_template {
                Some(template) => {
                    let body = PromptBody { template };
                    let resp = client.post(prompt_uri).json(&body).send().await?;
                    if resp.status() != StatusCode::OK {
                        return Err(anyhow!("Got bad response: {}", resp.text().await?));
                    }
                }
                None => {
                    let resp = client.get(prompt_uri).send().await?;
                    if resp.status() != StatusCode::OK {
                        return Err(anyhow!("Got bad response: {}", resp.text().await?));
                    }
                    let body: PromptBody = resp.json().await?;
                    println!("{}", body.template);
                }
            }
        }
        Commands::Logs => {
            println!("{}", get_text(&client, &addr, "boards/logs").await?);
        }
        Commands::Welfare => {
            println!("{}", get_text(&client, &addr, "boards/welfare").await?);
        }
    }

    Ok(())
}

async fn get_text(client: &reqwest::Client, addr: &str, path: &str) -> anyhow::Result<String> {
    let uri = format!("http://{addr}/{path}");
    let resp = client.get(uri).send().await?;
    if resp.status() != StatusCode::OK {
        return Err(anyhow!("Got bad response: {}", resp.text().await?));
    }
    Ok(resp.text().await?)
}

#[derive(PartialEq, Debug)]
struct CommandParseError {
    msg: String,
}

impl CommandParseError {
    pub fn new(msg: &str) -> Self {
        Self { msg: msg.into() }
    }
}

impl fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}

// Parses a compact toggle command: a one-letter device abbreviation with an
// optional explicit @0/@1 value. Without an explicit value, an uppercase
// abbreviation means on and a lowercase one means off.
fn parse_cmd(cmd: &str) -> Result<DeviceToggle, CommandParseError> {
    if cmd.is_empty() {
        return Err(CommandParseError::new("Empty command"));
    }

    let abbrev_map = HashMap::from([
        ("i", Device::Irrigation),
        ("f", Device::Fan),
        ("l", Device::GrowLight),
        ("w", Device::Windows),
    ]);

    let re = Regex::new(r"^(?<abbrev>[a-zA-Z])(@(?<value>[01]))?$").unwrap();
    let caps = match re.captures(cmd) {
        Some(c) => c,
        None => {
            return Err(CommandParseError::new(&format!("Invalid command: '{cmd}'")));
        }
    };

    let abbrev = caps.name("abbrev").unwrap().as_str();
    let device = match abbrev_map.get(abbrev.to_lowercase().as_str()) {
        Some(device) => *device,
        None => {
            return Err(CommandParseError::new(&format!(
                "Invalid abbreviation: '{abbrev}'"
            )));
        }
    };

    let on = match caps.name("value") {
        Some(mstr) => mstr.as_str() == "1",
        // If no explicit value is given, uppercase means on.
        None => abbrev.chars().all(|x| x.is_uppercase()),
    };

    Ok(DeviceToggle { device, on })
}

#[cfg(test)]
mod parse_cmd {
    use super::*;

    #[test]
    fn explicit_value() {
        assert_eq!(
            parse_cmd("f@1"),
            Ok(DeviceToggle {
                device: Device::Fan,
                on: true,
            })
        );
        assert_eq!(
            parse_cmd("F@0"),
            Ok(DeviceToggle {
                device: Device::Fan,
                on: false,
            })
        );
    }

    #[test]
    fn uppercase_means_on() {
        assert_eq!(
            parse_cmd("I"),
            Ok(DeviceToggle {
                device: Device::Irrigation,
                on: true,
            })
        );
        assert_eq!(
            parse_cmd("w"),
            Ok(DeviceToggle {
                device: Device::Windows,
                on: false,
            })
        );
    }

    #[test]
    fn invalid_abbrev() {
        assert_eq!(
            parse_cmd("x"),
            Err(CommandParseError::new("Invalid abbreviation: 'x'")),
        );
    }

    #[test]
    fn invalid_command() {
        assert_eq!(
            parse_cmd("fan@yes"),
            Err(CommandParseError::new("Invalid command: 'fan@yes'"))
        );
    }
}
