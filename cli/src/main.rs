//! CLI entrypoint for assembly-vote
//!
//! This is the main binary that wires together all layers using
//! dependency injection. One command runs per invocation against the
//! snapshot store, which is saved again after mutating commands.

use anyhow::{Context, Result, anyhow, bail};
use assembly_application::{
    CastBallotInput, Engine, EnginePorts, EventSink, MeetingReader, MemberDirectory, NoEventSink,
};
use assembly_domain::{ManualTally, MeetingId, MemberId, MotionId, PresenceMode};
use assembly_infrastructure::{
    ConfigLoader, FileConfig, FileOutputFormat, InMemoryStore, JsonlEventLog, StoreSnapshot,
    SystemClock,
};
use assembly_presentation::{
    CastArgs, Cli, Command, ConsoleFormatter, ManualTallyArgs, OutputConfig, OutputFormat,
};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    let issues = config.validate();
    if !issues.is_empty() {
        let list: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
        bail!("Invalid configuration: {}", list.join("; "));
    }

    let output = OutputConfig::resolve(
        cli.output,
        config.output.format.map(|f| match f {
            FileOutputFormat::Full => OutputFormat::Full,
            FileOutputFormat::Json => OutputFormat::Json,
        }),
        config.output.color,
    );
    output.apply();

    if cli.command == Command::ShowConfig {
        println!("{}", show_config(&cli, &config, output.format));
        return Ok(());
    }

    // === Dependency Injection ===
    let snapshot_path = cli
        .store
        .clone()
        .unwrap_or_else(|| config.store.snapshot_path.clone());
    let snapshot = StoreSnapshot::load(&snapshot_path)
        .with_context(|| format!("Failed to load store {}", snapshot_path.display()))?;
    let store = Arc::new(InMemoryStore::from_snapshot(snapshot));

    let events: Arc<dyn EventSink> = match config
        .events
        .log_path
        .as_ref()
        .and_then(JsonlEventLog::open)
    {
        Some(log) => {
            debug!(path = %log.path().display(), "Event log opened");
            Arc::new(log)
        }
        None => Arc::new(NoEventSink),
    };

    let ports = EnginePorts::from_store(store.clone(), events, Arc::new(SystemClock));
    let engine = Engine::new(&ports, &config.to_engine_config());

    info!(store = %snapshot_path.display(), "Starting assembly-vote");

    let rendered = run(&cli.command, &engine, &store, output.format).await?;

    if cli.command.mutates() {
        store
            .snapshot()?
            .save(&snapshot_path)
            .with_context(|| format!("Failed to save store {}", snapshot_path.display()))?;
        debug!(store = %snapshot_path.display(), "Store saved");
    }

    print!("{}", rendered);
    Ok(())
}

/// Execute one command and render its result.
async fn run(
    command: &Command,
    engine: &Engine,
    store: &InMemoryStore,
    format: OutputFormat,
) -> Result<String> {
    let rendered = match command {
        Command::Cast(CastArgs {
            motion,
            member,
            choice,
            proxy_voter,
        }) => {
            let input = match proxy_voter {
                Some(voter) => CastBallotInput::by_proxy(
                    MotionId(*motion),
                    MemberId(*member),
                    MemberId(*voter),
                    *choice,
                ),
                None => CastBallotInput::direct(MotionId(*motion), MemberId(*member), *choice),
            };
            let out = engine
                .ballots
                .execute(input)
                .await
                .map_err(|e| rejected(e.code(), e))?;
            render(format, &out, ConsoleFormatter::ballot)
        }

        Command::Attend {
            meeting,
            member,
            mode,
        } => {
            set_attendance(store, MeetingId(*meeting), MemberId(*member), Some(*mode)).await?;
            render(
                format,
                &serde_json::json!({ "meeting": meeting, "member": member, "mode": mode }),
                |_| format!("member#{} attends meeting#{} ({})\n", member, meeting, mode),
            )
        }

        Command::Leave { meeting, member } => {
            set_attendance(store, MeetingId(*meeting), MemberId(*member), None).await?;
            render(
                format,
                &serde_json::json!({ "meeting": meeting, "member": member, "mode": null }),
                |_| format!("member#{} left meeting#{}\n", member, meeting),
            )
        }

        Command::Delegate {
            meeting,
            giver,
            receiver,
        } => {
            let out = engine
                .proxies
                .delegate(MeetingId(*meeting), MemberId(*giver), MemberId(*receiver))
                .await
                .map_err(|e| rejected(e.code(), e))?;
            render(format, &out, ConsoleFormatter::delegation)
        }

        Command::Revoke { meeting, giver } => {
            let revoked = engine
                .proxies
                .revoke(MeetingId(*meeting), MemberId(*giver))
                .await
                .map_err(|e| rejected(e.code(), e))?;
            render(
                format,
                &serde_json::json!({ "meeting": meeting, "giver": giver, "revoked": revoked }),
                |_| {
                    if revoked {
                        format!("member#{} no longer delegates\n", giver)
                    } else {
                        format!("member#{} had no active delegation\n", giver)
                    }
                },
            )
        }

        Command::Delegations { meeting } => {
            let rows = engine
                .proxies
                .delegations(MeetingId(*meeting))
                .await?;
            render(format, &rows, |rows| ConsoleFormatter::delegations(rows))
        }

        Command::Result { motion } => {
            let result = engine
                .results
                .execute(MotionId(*motion))
                .await
                .map_err(|e| rejected(e.code(), e))?;
            render(format, &result, ConsoleFormatter::motion_result)
        }

        Command::Consolidate { motion } => {
            let out = engine
                .consolidation
                .consolidate_motion(MotionId(*motion))
                .await
                .map_err(|e| rejected(e.code(), e))?;
            render(format, &out, ConsoleFormatter::consolidation)
        }

        Command::ConsolidateMeeting { meeting } => {
            let summary = engine
                .consolidation
                .consolidate_meeting(MeetingId(*meeting))
                .await
                .map_err(|e| rejected(e.code(), e))?;
            render(format, &summary, ConsoleFormatter::meeting_consolidation)
        }

        Command::Readiness { meeting } => {
            let (report, diff) = engine
                .tracker
                .observe(MeetingId(*meeting))
                .await
                .map_err(|e| rejected(e.code(), e))?;
            render(format, &report, |report| {
                ConsoleFormatter::readiness(report, &diff)
            })
        }

        Command::OpenMotion { motion } => {
            let opened = engine
                .motions
                .open(MotionId(*motion))
                .await
                .map_err(|e| rejected(e.code(), e))?;
            render(format, &opened, |m| format!("{} opened\n", m.id))
        }

        Command::CloseMotion { motion } => {
            let out = engine
                .motions
                .close(MotionId(*motion))
                .await
                .map_err(|e| rejected(e.code(), e))?;
            render(format, &out, ConsoleFormatter::close)
        }

        Command::ManualTally(ManualTallyArgs {
            motion,
            total,
            for_votes,
            against,
            abstain,
            clear,
        }) => {
            let motion = MotionId(*motion);
            if *clear {
                let had = engine
                    .motions
                    .clear_manual_tally(motion)
                    .await
                    .map_err(|e| rejected(e.code(), e))?;
                render(
                    format,
                    &serde_json::json!({ "motion": motion, "cleared": had }),
                    |_| format!("{} manual tally cleared\n", motion),
                )
            } else {
                let tally = ManualTally::new(total.unwrap_or(0), *for_votes, *against, *abstain);
                let consistent = engine
                    .motions
                    .record_manual_tally(motion, tally)
                    .await
                    .map_err(|e| rejected(e.code(), e))?;
                render(
                    format,
                    &serde_json::json!({ "motion": motion, "tally": tally, "consistent": consistent }),
                    |_| {
                        if consistent {
                            format!("{} manual tally recorded\n", motion)
                        } else {
                            format!(
                                "{} manual tally recorded but does not add up; ballots stay authoritative\n",
                                motion
                            )
                        }
                    },
                )
            }
        }

        Command::AdvanceMeeting { meeting, status } => {
            let record = engine
                .meetings
                .advance(MeetingId(*meeting), *status)
                .await
                .map_err(|e| rejected(e.code(), e))?;
            render(format, &record, ConsoleFormatter::meeting)
        }

        Command::President { meeting, name } => {
            let record = engine
                .meetings
                .record_president(MeetingId(*meeting), name)
                .await
                .map_err(|e| rejected(e.code(), e))?;
            render(format, &record, ConsoleFormatter::meeting)
        }

        Command::ShowConfig => bail!("show-config does not touch the store"),
    };
    Ok(rendered)
}

/// Attendance is recorded only for known members of the meeting's tenant.
async fn set_attendance(
    store: &InMemoryStore,
    meeting: MeetingId,
    member: MemberId,
    mode: Option<PresenceMode>,
) -> Result<()> {
    let record = store
        .meeting(meeting)
        .await?
        .ok_or_else(|| rejected("meeting_not_found", format!("{} not found", meeting)))?;
    if record.is_validated() {
        return Err(rejected(
            "meeting_validated",
            format!("{} is validated", meeting),
        ));
    }
    let person = store
        .member(member)
        .await?
        .ok_or_else(|| rejected("member_not_found", format!("{} not found", member)))?;
    if person.tenant != record.tenant {
        return Err(rejected(
            "foreign_tenant",
            format!("{} does not belong to the meeting's tenant", member),
        ));
    }
    store.set_attendance(meeting, member, mode)?;
    info!(meeting = %meeting, member = %member, mode = ?mode, "Attendance recorded");
    Ok(())
}

fn render<T: Serialize + ?Sized>(
    format: OutputFormat,
    value: &T,
    console: impl FnOnce(&T) -> String,
) -> String {
    match format {
        OutputFormat::Full => console(value),
        OutputFormat::Json => format!("{}\n", ConsoleFormatter::json(value)),
    }
}

fn rejected(code: &str, err: impl std::fmt::Display) -> anyhow::Error {
    anyhow!("{} [{}]", err, code)
}

fn show_config(cli: &Cli, config: &FileConfig, format: OutputFormat) -> String {
    let effective = ConsoleFormatter::json(config);
    match format {
        OutputFormat::Json => format!("{}\n", effective),
        OutputFormat::Full => {
            let mut lines = if cli.no_config {
                vec!["Configuration files disabled (--no-config)".to_string()]
            } else {
                ConfigLoader::config_sources(cli.config.as_ref())
            };
            let store: PathBuf = cli
                .store
                .clone()
                .unwrap_or_else(|| config.store.snapshot_path.clone());
            lines.push(format!("Store: {}", store.display()));
            lines.push(String::new());
            lines.push("Effective configuration:".to_string());
            lines.push(effective);
            lines.join("\n") + "\n"
        }
    }
}
